// src/config.rs
// =============================================================================
// Turns parsed CLI arguments into an explicit `AuditConfig`.
//
// Everything the pipeline needs is in this struct and passed down by value;
// nothing below `main` reads the environment or global state.
// =============================================================================

use crate::cli::AuditArgs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pass either --subreddit or both --rules-file and --sidebar-file")]
    MissingSource,

    #[error("{0} is required to open an issue (or pass --dry-run)")]
    MissingGithub(&'static str),

    #[error("--max-concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("--timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Where the rules and sidebar come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOrigin {
    Reddit { api_base: String, subreddit: String },
    Files { rules: PathBuf, sidebar: PathBuf },
}

/// Where a non-empty report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    GithubIssue {
        api_base: String,
        owner: String,
        repo: String,
        token: String,
    },
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub origin: ContentOrigin,
    pub destination: Destination,
    pub timeout: Duration,
    pub max_concurrency: Option<usize>,
    pub json: bool,
}

impl TryFrom<AuditArgs> for AuditConfig {
    type Error = ConfigError;

    fn try_from(args: AuditArgs) -> Result<Self, Self::Error> {
        let origin = match (args.subreddit, args.rules_file, args.sidebar_file) {
            (_, Some(rules), Some(sidebar)) => ContentOrigin::Files { rules, sidebar },
            (Some(subreddit), _, _) if !subreddit.trim().is_empty() => ContentOrigin::Reddit {
                api_base: args.reddit_api,
                subreddit,
            },
            _ => return Err(ConfigError::MissingSource),
        };

        let destination = if args.dry_run {
            Destination::Stdout
        } else {
            Destination::GithubIssue {
                api_base: args.github_api,
                owner: args.owner.ok_or(ConfigError::MissingGithub("--owner"))?,
                repo: args.repo.ok_or(ConfigError::MissingGithub("--repo"))?,
                token: args.github_token.ok_or(ConfigError::MissingGithub("--github-token"))?,
            }
        };

        if args.max_concurrency == Some(0) {
            return Err(ConfigError::ZeroConcurrency);
        }
        if args.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(AuditConfig {
            origin,
            destination,
            timeout: Duration::from_secs(args.timeout),
            max_concurrency: args.max_concurrency,
            json: args.json,
        })
    }
}
