// Loads the rules / sidebar payloads from local JSON files.
//
// The files hold exactly what the Reddit API returns, so a saved
// `about/rules` and `about.json` response can be replayed offline.

use super::payload::{parse_rules, parse_sidebar};
use super::{SourceError, SubredditContent};
use std::path::Path;
use tracing::info;

pub fn load_from_files(rules_path: &Path, sidebar_path: &Path) -> Result<SubredditContent, SourceError> {
    info!(rules = %rules_path.display(), sidebar = %sidebar_path.display(), "loading content from files");

    let rules = parse_rules(&read(rules_path)?)?;
    let sidebar = parse_sidebar(&read(sidebar_path)?)?;

    Ok(SubredditContent { rules, sidebar })
}

fn read(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })
}
