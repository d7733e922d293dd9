// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes one HTTP HEAD request per URL (lightweight, no body download)
// - Classifies the answer: anything but a 4xx counts as reachable
// - Turns every failure (timeout, DNS, bad URL, ...) into data, not an error
// - Runs a whole batch concurrently and waits for *every* probe to settle
//
// The classification is fail-closed: if we cannot confirm that a link is
// alive, it is reported as broken.
//
// Rust concepts:
// - Traits: `Prober` lets tests swap the network for an in-memory fake
// - async/await + streams: for concurrent network I/O
// - catch_unwind: a panicking probe becomes an outcome instead of a crash
// =============================================================================

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use futures::FutureExt; // gives us .catch_unwind() on futures
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent sent with every probe and API call.
pub const USER_AGENT: &str = concat!("rules-link-guardian/", env!("CARGO_PKG_VERSION"));

/// Why a URL was judged broken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum BrokenReason {
    /// The server answered with a 4xx status (404, 410, 403, ...)
    ClientError(u16),
    /// Request timed out
    Timeout,
    /// Could not connect (DNS failure, refused, unreachable host)
    Connect,
    /// Too many redirects (redirect loop)
    Redirect,
    /// The URL could not be turned into a request (bad syntax, non-HTTP scheme)
    InvalidUrl,
    /// Any other transport error
    Request(String),
    /// The probe task itself failed before producing an answer
    Aborted(String),
}

impl fmt::Display for BrokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokenReason::ClientError(code) => write!(f, "HTTP {}", code),
            BrokenReason::Timeout => write!(f, "request timed out"),
            BrokenReason::Connect => write!(f, "connection failed"),
            BrokenReason::Redirect => write!(f, "too many redirects"),
            BrokenReason::InvalidUrl => write!(f, "invalid URL"),
            BrokenReason::Request(msg) => write!(f, "request failed: {}", msg),
            BrokenReason::Aborted(msg) => write!(f, "probe aborted: {}", msg),
        }
    }
}

/// The explicit result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    /// The server answered with a non-4xx status
    Reachable { status: u16 },
    /// The link is broken, or we could not prove otherwise
    Broken(BrokenReason),
}

impl Liveness {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Liveness::Reachable { .. })
    }
}

// The outcome for one URL in a batch
//
// `reason` is only set when `reachable` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub url: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BrokenReason>,
}

impl ProbeOutcome {
    pub fn new(url: String, liveness: Liveness) -> Self {
        let reachable = liveness.is_reachable();
        let reason = match liveness {
            Liveness::Broken(reason) => Some(reason),
            Liveness::Reachable { .. } => None,
        };
        ProbeOutcome { url, reachable, reason }
    }
}

/// Something that can tell whether a URL is alive.
///
/// Implementations must always resolve to a `Liveness`; a failure to reach
/// the URL is reported as `Liveness::Broken`, never as an error.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> Liveness;
}

// Probes URLs over the network with reqwest
//
// The client is cheap to clone (it's an Arc internally) and keeps its own
// connection pool, so one HttpProber is shared by every probe in a run.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Builds the one reqwest client a run shares: probes, Reddit and GitHub.
///
/// Requests give up after `timeout`; redirects follow reqwest's default
/// policy (at most 10 hops).
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Liveness {
        // HEAD is enough: we only care whether the resource exists
        let liveness = match self.client.head(url).send().await {
            Ok(response) => classify_status(response.status()),
            Err(e) => categorize_error(&e),
        };
        debug!(url, ?liveness, "probed");
        liveness
    }
}

// Analyzes an HTTP status code
//
// Only 4xx means broken. 5xx and 3xx responses are treated as "the link
// exists", matching how a reader would still land on the page eventually.
fn classify_status(status: StatusCode) -> Liveness {
    if status.is_client_error() {
        Liveness::Broken(BrokenReason::ClientError(status.as_u16()))
    } else {
        Liveness::Reachable { status: status.as_u16() }
    }
}

// Categorizes the different error types from reqwest
fn categorize_error(error: &reqwest::Error) -> Liveness {
    let reason = if error.is_timeout() {
        BrokenReason::Timeout
    } else if error.is_redirect() {
        BrokenReason::Redirect
    } else if error.is_connect() {
        BrokenReason::Connect
    } else if error.is_builder() {
        BrokenReason::InvalidUrl
    } else {
        BrokenReason::Request(error.to_string())
    };
    Liveness::Broken(reason)
}

// Checks a batch of URLs concurrently and returns only the broken ones
//
// Parameters:
//   prober: what performs each individual check
//   urls: the URLs to check, in document order
//   limit: optional cap on in-flight probes (None = all at once)
//
// Every probe runs to completion. If a probe panics, the panic is caught
// here and that URL is reported as `Aborted`; its siblings are unaffected.
// `.buffered()` (unlike the `.buffer_unordered()` a crawler would use) keeps
// the results in input order.
pub async fn evaluate_batch<P: Prober + ?Sized>(
    prober: &P,
    urls: Vec<String>,
    limit: Option<usize>,
) -> Vec<ProbeOutcome> {
    if urls.is_empty() {
        return Vec::new();
    }

    let width = limit.unwrap_or(urls.len()).max(1);
    let total = urls.len();

    let probes = urls.into_iter().map(|url| async move {
        let liveness = match AssertUnwindSafe(prober.probe(&url)).catch_unwind().await {
            Ok(liveness) => liveness,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(url = %url, error = %message, "probe task failed");
                Liveness::Broken(BrokenReason::Aborted(message))
            }
        };
        ProbeOutcome::new(url, liveness)
    });

    let settled: Vec<ProbeOutcome> = stream::iter(probes).buffered(width).collect().await;

    let broken: Vec<ProbeOutcome> = settled.into_iter().filter(|o| !o.reachable).collect();
    debug!(total, broken = broken.len(), "batch settled");
    broken
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
