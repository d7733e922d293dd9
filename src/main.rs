// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging and parse command-line arguments using clap
// 2. Turn the arguments into an explicit AuditConfig
// 3. Fetch the content, run the audit, build the report
// 4. Publish the report only if something is broken
// 5. Exit with proper code (0 = nothing broken, 1 = broken links, 2 = error)
//
// The runtime is single-threaded on purpose: every probe is a future
// multiplexed on one thread, no worker threads are involved.
// =============================================================================

mod audit;
mod checker;
mod cli;
mod config;
mod publish;
mod report;
mod source;
mod telemetry;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use reqwest::Client;
use std::io::Write;
use std::time::Duration;
use tracing::info;

use checker::{HttpProber, Liveness, Prober};
use cli::{Cli, Commands};
use config::{AuditConfig, ContentOrigin, Destination};
use publish::{GithubIssuePublisher, Publisher, StdoutPublisher};
use source::RedditSource;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    telemetry::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err = unexpected error (fetching content, publishing, bad arguments)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit(args) => {
            let config = AuditConfig::try_from(args)?;
            let client = checker::http_client(config.timeout).context("could not build HTTP client")?;
            handle_audit(config, client, &mut std::io::stdout()).await
        }
        Commands::Probe { url, timeout } => {
            let client =
                checker::http_client(Duration::from_secs(timeout)).context("could not build HTTP client")?;
            Ok(handle_probe(&HttpProber::new(client), &url).await)
        }
    }
}

// Status lines for humans. With --json they go to the log instead, so that
// `out` only ever carries the JSON document.
fn progress(out: &mut dyn Write, json: bool, line: &str) -> Result<()> {
    if json {
        info!("{}", line);
    } else {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

// Handles the 'audit' subcommand
async fn handle_audit(config: AuditConfig, client: Client, out: &mut dyn Write) -> Result<i32> {
    let content = match &config.origin {
        ContentOrigin::Reddit { api_base, subreddit } => {
            let source = RedditSource::new(client.clone(), api_base, subreddit)?;
            progress(out, config.json, &format!("🔍 Auditing r/{}", source.subreddit()))?;
            source.fetch().await.context("could not fetch subreddit content")?
        }
        ContentOrigin::Files { rules, sidebar } => {
            progress(
                out,
                config.json,
                &format!("🔍 Auditing {} and {}", rules.display(), sidebar.display()),
            )?;
            source::load_from_files(rules, sidebar)?
        }
    };

    progress(
        out,
        config.json,
        &format!("📄 Found {} rule(s) and the sidebar to scan", content.rules.len()),
    )?;

    let prober = HttpProber::new(client.clone());
    let report = audit::run_audit(&prober, content, config.max_concurrency).await;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        print_table(out, &report)?;
    }

    let rendered = report::build_report(&report.broken_rule_results, &report.broken_sidebar_urls);
    if rendered.total_broken_count == 0 {
        progress(out, config.json, "✅ No broken links found")?;
        return Ok(0);
    }

    let title = report::issue_title(rendered.total_broken_count, Utc::now());
    let published = match &config.destination {
        Destination::GithubIssue { api_base, owner, repo, token } => {
            GithubIssuePublisher::new(client, api_base.as_str(), owner.as_str(), repo.as_str(), token.as_str())
                .publish(&title, &rendered.body)
                .await
                .context("could not open the GitHub issue")?
        }
        // The JSON document already is the output in this mode
        Destination::Stdout if config.json => None,
        Destination::Stdout => StdoutPublisher.publish(&title, &rendered.body).await?,
    };

    if let Some(link) = published {
        progress(out, config.json, &format!("📝 Opened {}", link))?;
    }
    info!(broken = rendered.total_broken_count, "report delivered");

    Ok(1)
}

// Handles the 'probe' subcommand
async fn handle_probe<P: Prober + ?Sized>(prober: &P, url: &str) -> i32 {
    match prober.probe(url).await {
        Liveness::Reachable { status } => {
            println!("✅ {} is reachable (HTTP {})", url, status);
            0
        }
        Liveness::Broken(reason) => {
            println!("❌ {} is broken: {}", url, reason);
            1
        }
    }
}

// Prints broken links as a human-readable table in the terminal
fn print_table(out: &mut dyn Write, report: &audit::Report) -> Result<()> {
    if report.is_clean() {
        return Ok(());
    }

    writeln!(out, "{:<30} {:<75}", "SOURCE", "URL")?;
    writeln!(out, "{}", "=".repeat(105))?;

    let rows = report
        .broken_rule_results
        .iter()
        .flat_map(|rule| rule.broken_urls.iter().map(move |url| (rule.label.as_str(), url)))
        .chain(report.broken_sidebar_urls.iter().map(|url| ("sidebar", url)));

    for (label, url) in rows {
        // Truncate labels that would break the column layout
        let label_display = if label.chars().count() > 27 {
            format!("{}...", label.chars().take(27).collect::<String>())
        } else {
            label.to_string()
        };
        writeln!(out, "{:<30} {:<75}", label_display, url)?;
    }

    writeln!(out)?;
    writeln!(out, "📊 Summary:")?;
    writeln!(out, "   📋 Rules affected: {}", report.broken_rule_results.len())?;
    writeln!(out, "   ❌ Broken: {}", report.total_broken_count)?;
    Ok(())
}
