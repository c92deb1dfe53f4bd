use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::TransportError;

/// Issues the single GET a weather fetch needs.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Return the response body for `url`. An empty body is not an error here.
    async fn get(&self, url: Url) -> Result<String, TransportError>;
}

/// [`Transport`] backed by `reqwest`, using the client's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<String, TransportError> {
        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "weather response received");

        if !status.is_success() {
            return Err(TransportError::Status { status, body: truncate_body(&body) });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundary() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
