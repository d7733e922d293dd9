// src/test_support.rs
// =============================================================================
// Helpers shared by the unit tests. HTTP endpoints are mocked with wiremock.
// =============================================================================

use reqwest::Client;
use std::io::Write;
use std::time::Duration;

// A client that never goes through a proxy, so mock servers on 127.0.0.1
// are always reached directly
pub fn local_client(timeout: Duration) -> Client {
    Client::builder().no_proxy().timeout(timeout).build().unwrap()
}

pub fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}
