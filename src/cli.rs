// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Values that usually come
// from a CI environment (tokens, repository, subreddit) can also be given as
// environment variables through clap's `env` attribute.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::publish::DEFAULT_GITHUB_API;
use crate::source::DEFAULT_REDDIT_API;

#[derive(Parser, Debug)]
#[command(
    name = "rules-link-guardian",
    version,
    about = "Audit a subreddit's rules and sidebar for broken links",
    long_about = "rules-link-guardian extracts every link from a subreddit's rules and sidebar, \
                  checks that each one still resolves, and opens a GitHub issue listing the broken ones."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the rules and sidebar of a subreddit
    ///
    /// Example: rules-link-guardian audit --subreddit reactjs --dry-run
    Audit(AuditArgs),

    /// Check a single URL and print whether it is reachable
    ///
    /// Example: rules-link-guardian probe https://react.dev
    Probe {
        /// URL to check
        url: String,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Subreddit to fetch from the Reddit API (e.g. "reactjs" or "r/reactjs")
    ///
    /// Ignored when --rules-file and --sidebar-file are given.
    #[arg(long, env = "SUBREDDIT")]
    pub subreddit: Option<String>,

    /// Saved `about/rules` JSON payload, instead of fetching
    #[arg(long, requires = "sidebar_file")]
    pub rules_file: Option<PathBuf>,

    /// Saved `about.json` JSON payload, instead of fetching
    #[arg(long, requires = "rules_file")]
    pub sidebar_file: Option<PathBuf>,

    /// Reddit API root
    #[arg(long, default_value = DEFAULT_REDDIT_API)]
    pub reddit_api: String,

    /// Token used to open the GitHub issue
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Owner of the repository that receives the issue
    #[arg(long, env = "GITHUB_OWNER")]
    pub owner: Option<String>,

    /// Repository that receives the issue
    #[arg(long, env = "GITHUB_REPO")]
    pub repo: Option<String>,

    /// GitHub API root
    #[arg(long, default_value = DEFAULT_GITHUB_API)]
    pub github_api: String,

    /// Print the report instead of opening an issue
    #[arg(long)]
    pub dry_run: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Maximum number of links probed at once within a source (default: no cap)
    #[arg(long)]
    pub max_concurrency: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_file_audit() {
        let cli = Cli::try_parse_from([
            "rules-link-guardian",
            "audit",
            "--rules-file",
            "rules.json",
            "--sidebar-file",
            "about.json",
            "--dry-run",
            "--max-concurrency",
            "4",
        ])
        .unwrap();

        let Commands::Audit(args) = cli.command else {
            panic!("expected audit");
        };
        assert_eq!(args.rules_file, Some(PathBuf::from("rules.json")));
        assert!(args.dry_run);
        assert_eq!(args.max_concurrency, Some(4));
        assert_eq!(args.timeout, 10);
        assert_eq!(args.reddit_api, DEFAULT_REDDIT_API);
    }

    #[test]
    fn test_rules_file_requires_sidebar_file() {
        let result = Cli::try_parse_from(["rules-link-guardian", "audit", "--rules-file", "rules.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_probe() {
        let cli = Cli::try_parse_from(["rules-link-guardian", "probe", "https://react.dev"]).unwrap();
        assert!(matches!(cli.command, Commands::Probe { ref url, timeout: 10 } if url == "https://react.dev"));
    }
}
