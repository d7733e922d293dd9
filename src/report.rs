// src/report.rs
// =============================================================================
// Turns the broken links of a run into an issue title and a Markdown body.
//
// Body layout (a section is left out when it has nothing to show):
//
//   ## Broken URLs in Rules
//   * Rule Name: Be kind
//     - https://broken.example
//
//   ## Broken URLs in Sidebar
//     - https://also-broken.example
// =============================================================================

use crate::audit::SourceResult;
use chrono::{DateTime, SecondsFormat, Utc};

pub const RULES_HEADER: &str = "## Broken URLs in Rules";
pub const SIDEBAR_HEADER: &str = "## Broken URLs in Sidebar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub body: String,
    pub total_broken_count: usize,
}

// Renders the report body
//
// The count comes from the data, not from the rendered text. With nothing
// broken the body is empty and the caller must not publish anything.
pub fn build_report(broken_rule_results: &[SourceResult], broken_sidebar_urls: &[String]) -> RenderedReport {
    let total_broken_count = broken_rule_results
        .iter()
        .map(|r| r.broken_urls.len())
        .sum::<usize>()
        + broken_sidebar_urls.len();

    if total_broken_count == 0 {
        return RenderedReport { body: String::new(), total_broken_count };
    }

    let mut sections = Vec::new();

    if !broken_rule_results.is_empty() {
        let rules: Vec<String> = broken_rule_results
            .iter()
            .map(|rule| format!("* Rule Name: {}\n{}", rule.label, url_list(&rule.broken_urls)))
            .collect();
        sections.push(format!("{}\n{}", RULES_HEADER, rules.join("\n")));
    }

    if !broken_sidebar_urls.is_empty() {
        sections.push(format!("{}\n{}", SIDEBAR_HEADER, url_list(broken_sidebar_urls)));
    }

    RenderedReport { body: sections.join("\n\n"), total_broken_count }
}

fn url_list(urls: &[String]) -> String {
    urls.iter()
        .map(|url| format!("  - {}", url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Issue title, e.g. "3 Broken links on 2024-05-01T12:00:00.000Z".
pub fn issue_title(count: usize, at: DateTime<Utc>) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!(
        "{} Broken link{} on {}",
        count,
        plural,
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rule(label: &str, urls: &[&str]) -> SourceResult {
        SourceResult {
            label: label.to_string(),
            broken_urls: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn test_nothing_broken() {
        let rendered = build_report(&[], &[]);
        assert_eq!(rendered.total_broken_count, 0);
        assert!(rendered.body.is_empty());
    }

    #[test]
    fn test_both_sections() {
        let rules = vec![rule("Be kind", &["https://a.example"]), rule("No spam", &["https://b.example"])];
        let sidebar = vec!["https://c.example".to_string()];

        let rendered = build_report(&rules, &sidebar);

        assert_eq!(rendered.total_broken_count, 3);
        assert_eq!(
            rendered.body,
            "## Broken URLs in Rules\n\
             * Rule Name: Be kind\n  - https://a.example\n\
             * Rule Name: No spam\n  - https://b.example\n\
             \n\
             ## Broken URLs in Sidebar\n  - https://c.example"
        );
        assert_eq!(rendered.body.matches("## ").count(), 2);
    }

    #[test]
    fn test_rules_only_omits_sidebar_section() {
        let rendered = build_report(&[rule("R", &["https://x.example", "https://y.example"])], &[]);
        assert_eq!(rendered.total_broken_count, 2);
        assert!(rendered.body.contains(RULES_HEADER));
        assert!(!rendered.body.contains(SIDEBAR_HEADER));
    }

    #[test]
    fn test_sidebar_only_omits_rules_section() {
        let rendered = build_report(&[], &["https://x.example".to_string()]);
        assert_eq!(rendered.total_broken_count, 1);
        assert!(!rendered.body.contains(RULES_HEADER));
        assert_eq!(rendered.body, "## Broken URLs in Sidebar\n  - https://x.example");
    }

    #[test]
    fn test_build_is_deterministic() {
        let rules = vec![rule("R", &["https://x.example"])];
        assert_eq!(build_report(&rules, &[]), build_report(&rules, &[]));
    }

    #[test]
    fn test_issue_title() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(issue_title(1, at), "1 Broken link on 2024-05-01T12:00:00.000Z");
        assert_eq!(issue_title(3, at), "3 Broken links on 2024-05-01T12:00:00.000Z");
    }
}
