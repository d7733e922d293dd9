// src/source/reddit.rs
// =============================================================================
// This module fetches a subreddit's rules and sidebar from the Reddit API.
//
// Endpoints (relative to the API base, https://api.reddit.com by default):
//   /r/{name}/about/rules   -> {"rules": [{"short_name", "description_html"}]}
//   /r/{name}/about.json    -> {"data": {"description_html"}}
//
// Both calls are plain unauthenticated GETs. Reddit rejects requests without
// a User-Agent, so the client always sends one.
// =============================================================================

use super::payload::{parse_rules, parse_sidebar};
use super::{HtmlSource, SourceError, SubredditContent};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_REDDIT_API: &str = "https://api.reddit.com";

#[derive(Debug, Clone)]
pub struct RedditSource {
    client: Client,
    base: Url,
    subreddit: String,
}

impl RedditSource {
    // Parameters:
    //   client: shared reqwest client
    //   base_url: API root, e.g. "https://api.reddit.com"
    //   subreddit: "reactjs" or "r/reactjs"
    pub fn new(client: Client, base_url: &str, subreddit: &str) -> Result<Self, SourceError> {
        let base = Url::parse(base_url)?;
        Ok(RedditSource {
            client,
            base,
            subreddit: normalize_subreddit(subreddit),
        })
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    /// Fetches rules and sidebar. Any failure aborts the run.
    pub async fn fetch(&self) -> Result<SubredditContent, SourceError> {
        info!(subreddit = %self.subreddit, "fetching rules and sidebar");

        // The two requests are independent, so run them side by side
        let (rules, sidebar) = tokio::try_join!(self.fetch_rules(), self.fetch_sidebar())?;

        debug!(rules = rules.len(), "fetched subreddit content");
        Ok(SubredditContent { rules, sidebar })
    }

    pub async fn fetch_rules(&self) -> Result<Vec<HtmlSource>, SourceError> {
        let url = self.endpoint("about/rules");
        let body = self.get(url).await?;
        parse_rules(&body)
    }

    pub async fn fetch_sidebar(&self) -> Result<HtmlSource, SourceError> {
        let url = self.endpoint("about.json");
        let body = self.get(url).await?;
        parse_sidebar(&body)
    }

    fn endpoint(&self, tail: &str) -> Url {
        // Url::join would drop the last path segment of a base without a
        // trailing slash, so build the path explicitly.
        let path = format!(
            "{}/r/{}/{}",
            self.base.path().trim_end_matches('/'),
            self.subreddit,
            tail
        );
        let mut url = self.base.clone();
        url.set_path(&path);
        url
    }

    async fn get(&self, url: Url) -> Result<String, SourceError> {
        let shown = url.to_string();
        debug!(url = %shown, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Request { url: shown.clone(), source })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: shown,
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| SourceError::Request { url: shown, source })
    }
}

// "r/reactjs", "/r/reactjs/" and "reactjs" all mean the same subreddit
fn normalize_subreddit(name: &str) -> String {
    let trimmed = name.trim().trim_matches('/');
    trimmed
        .strip_prefix("r/")
        .unwrap_or(trimmed)
        .to_string()
}
