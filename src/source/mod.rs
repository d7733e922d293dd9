// src/source/mod.rs
// =============================================================================
// This module produces the HTML we scan: a subreddit's rules and sidebar.
//
// Two ways in:
// - reddit: fetch the JSON payloads from the Reddit API
// - files: load the very same payloads from disk (offline runs, CI fixtures)
//
// Either way the result is a `SubredditContent`, so nothing downstream cares
// where the HTML came from.
// =============================================================================

mod files;
mod payload;
mod reddit;

pub use files::load_from_files;
pub use reddit::{RedditSource, DEFAULT_REDDIT_API};

use thiserror::Error;

/// One unit of content to scan: a rule's description or the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSource {
    pub label: String,
    pub raw_html: String,
}

impl HtmlSource {
    pub fn new(label: impl Into<String>, raw_html: impl Into<String>) -> Self {
        HtmlSource { label: label.into(), raw_html: raw_html.into() }
    }
}

/// Everything one audit run looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubredditContent {
    pub rules: Vec<HtmlSource>,
    pub sidebar: HtmlSource,
}

/// Errors while obtaining the content. These are fatal for a run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("could not decode {what} payload: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
