// src/audit.rs
// =============================================================================
// This module runs the link pipeline over every content source.
//
//   raw HTML -> extract_urls -> evaluate_batch -> broken URLs per source
//
// Rules are grouped by rule name; the sidebar is a single source, so its
// broken URLs are returned directly.
//
// Sources with no links at all are never probed, and sources whose links all
// turned out fine are dropped, so a `Report` only ever contains problems.
// =============================================================================

use crate::checker::{evaluate_batch, extract_urls, Prober};
use crate::source::{HtmlSource, SubredditContent};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

/// Broken links found in one source. Never empty once it reaches a Report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceResult {
    pub label: String,
    pub broken_urls: Vec<String>,
}

/// Everything that is broken after one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub broken_rule_results: Vec<SourceResult>,
    pub broken_sidebar_urls: Vec<String>,
    pub total_broken_count: usize,
}

impl Report {
    pub fn new(broken_rule_results: Vec<SourceResult>, broken_sidebar_urls: Vec<String>) -> Self {
        let total_broken_count = broken_rule_results
            .iter()
            .map(|r| r.broken_urls.len())
            .sum::<usize>()
            + broken_sidebar_urls.len();

        Report { broken_rule_results, broken_sidebar_urls, total_broken_count }
    }

    pub fn is_clean(&self) -> bool {
        self.total_broken_count == 0
    }
}

// Checks every rule description
//
// Sources are processed concurrently; each source's probing is independent,
// and the output keeps the order of `sources`.
pub async fn aggregate_rules<P: Prober + ?Sized>(
    prober: &P,
    sources: Vec<HtmlSource>,
    limit: Option<usize>,
) -> Vec<SourceResult> {
    // Extract once, and skip sources without links entirely
    let with_links: Vec<(String, Vec<String>)> = sources
        .into_iter()
        .filter_map(|source| {
            let urls = extract_urls(&source.raw_html);
            if urls.is_empty() {
                debug!(label = %source.label, "no links, skipping");
                None
            } else {
                Some((source.label, urls))
            }
        })
        .collect();

    let checks = with_links.into_iter().map(|(label, urls)| async move {
        debug!(label = %label, links = urls.len(), "checking rule");
        let broken = evaluate_batch(prober, urls, limit).await;
        SourceResult {
            label,
            broken_urls: broken.into_iter().map(|o| o.url).collect(),
        }
    });

    join_all(checks)
        .await
        .into_iter()
        .filter(|result| !result.broken_urls.is_empty())
        .collect()
}

// Checks the sidebar and returns its broken URLs
pub async fn aggregate_sidebar<P: Prober + ?Sized>(
    prober: &P,
    source: HtmlSource,
    limit: Option<usize>,
) -> Vec<String> {
    let urls = extract_urls(&source.raw_html);
    debug!(label = %source.label, links = urls.len(), "checking sidebar");

    evaluate_batch(prober, urls, limit)
        .await
        .into_iter()
        .map(|o| o.url)
        .collect()
}

/// Runs both paths over one subreddit's content.
pub async fn run_audit<P: Prober + ?Sized>(
    prober: &P,
    content: SubredditContent,
    limit: Option<usize>,
) -> Report {
    let SubredditContent { rules, sidebar } = content;

    let (broken_rules, broken_sidebar) = tokio::join!(
        aggregate_rules(prober, rules, limit),
        aggregate_sidebar(prober, sidebar, limit),
    );

    let report = Report::new(broken_rules, broken_sidebar);
    info!(
        broken = report.total_broken_count,
        rules_affected = report.broken_rule_results.len(),
        sidebar_broken = report.broken_sidebar_urls.len(),
        "audit finished"
    );
    report
}
