// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - html: Extracts absolute links from (entity-escaped) HTML fragments
// - http: Probes links over HTTP and evaluates whole batches concurrently
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod html;
pub mod http;

pub use html::extract_urls;
pub use http::{evaluate_batch, http_client, HttpProber, Liveness, Prober, USER_AGENT};
