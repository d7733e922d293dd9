// Shapes of the Reddit API payloads we read, and their conversion into
// `HtmlSource`s. Only the fields we use are declared; serde ignores the rest.

use super::{HtmlSource, SourceError};
use serde::Deserialize;

/// Label given to the sidebar source.
pub const SIDEBAR_LABEL: &str = "sidebar";

// GET /r/{name}/about/rules
#[derive(Debug, Deserialize)]
struct RulesPayload {
    #[serde(default)]
    rules: Vec<RulePayload>,
}

#[derive(Debug, Deserialize)]
struct RulePayload {
    short_name: String,
    // Reddit sends null for rules without a description
    #[serde(default)]
    description_html: Option<String>,
}

// GET /r/{name}/about.json
#[derive(Debug, Deserialize)]
struct AboutPayload {
    data: AboutData,
}

#[derive(Debug, Deserialize)]
struct AboutData {
    #[serde(default)]
    description_html: Option<String>,
}

pub fn parse_rules(json: &str) -> Result<Vec<HtmlSource>, SourceError> {
    let payload: RulesPayload = serde_json::from_str(json)
        .map_err(|source| SourceError::Decode { what: "rules", source })?;

    Ok(payload
        .rules
        .into_iter()
        .map(|rule| HtmlSource::new(rule.short_name, rule.description_html.unwrap_or_default()))
        .collect())
}

pub fn parse_sidebar(json: &str) -> Result<HtmlSource, SourceError> {
    let payload: AboutPayload = serde_json::from_str(json)
        .map_err(|source| SourceError::Decode { what: "sidebar", source })?;

    Ok(HtmlSource::new(
        SIDEBAR_LABEL,
        payload.data.description_html.unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules() {
        let json = r#"{
            "rules": [
                {"short_name": "Be kind", "description_html": "&lt;a href=\"https://a.example\"&gt;a&lt;/a&gt;", "priority": 0},
                {"short_name": "No spam", "description_html": null},
                {"short_name": "Stay on topic"}
            ],
            "site_rules": ["Spam"]
        }"#;
        let rules = parse_rules(json).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].label, "Be kind");
        assert!(rules[0].raw_html.contains("https://a.example"));
        assert_eq!(rules[1], HtmlSource::new("No spam", ""));
        assert_eq!(rules[2].raw_html, "");
    }

    #[test]
    fn test_parse_sidebar() {
        let json = r#"{"kind": "t5", "data": {"description_html": "&lt;p&gt;hi&lt;/p&gt;"}}"#;
        let sidebar = parse_sidebar(json).unwrap();
        assert_eq!(sidebar.label, SIDEBAR_LABEL);
        assert_eq!(sidebar.raw_html, "&lt;p&gt;hi&lt;/p&gt;");

        let empty = parse_sidebar(r#"{"data": {"description_html": null}}"#).unwrap();
        assert_eq!(empty.raw_html, "");
    }

    #[test]
    fn test_bad_payload_is_an_error() {
        assert!(matches!(
            parse_sidebar(r#"{"message": "Forbidden"}"#),
            Err(SourceError::Decode { what: "sidebar", .. })
        ));
        assert!(parse_rules("not json").is_err());
    }
}
