//! Shared HTTP plumbing for provider clients

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Why a provider request failed
#[derive(Debug)]
pub(crate) enum Failure {
    /// Request deadline elapsed
    Timeout,
    /// Anything else: connect error, non-2xx status, undecodable body
    Other(String),
}

impl Failure {
    /// Convert into an assistant error; `kind` builds the non-timeout variant
    pub(crate) fn into_error(
        self,
        operation: &str,
        timeout_secs: u64,
        kind: impl FnOnce(String) -> Error,
    ) -> Error {
        match self {
            Failure::Timeout => Error::timeout(operation, timeout_secs),
            Failure::Other(message) => kind(format!("{}: {}", operation, message)),
        }
    }
}

/// Build a pooled client with a per-request timeout
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_max_idle_per_host(5)
        .build()
        .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))
}

/// POST a JSON body and decode a JSON response
pub(crate) async fn post_json<B, R>(request: RequestBuilder, body: &B) -> std::result::Result<R, Failure>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = request.json(body).send().await.map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Failure::Other(format!("HTTP {} - {}", status, body)));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| Failure::Other(format!("failed to parse response: {}", e)))
}

fn classify(err: reqwest::Error) -> Failure {
    if err.is_timeout() {
        Failure::Timeout
    } else {
        Failure::Other(err.to_string())
    }
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:11434/", "/api/chat"),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            join_url("https://api.openai.com/v1", "embeddings"),
            "https://api.openai.com/v1/embeddings"
        );
    }

    #[test]
    fn test_failure_mapping() {
        let err = Failure::Timeout.into_error("chat request", 120, Error::model);
        assert!(matches!(err, Error::Timeout { secs: 120, .. }));

        let err = Failure::Other("HTTP 500".to_string()).into_error("chat request", 120, Error::model);
        match err {
            Error::ModelUnavailable(message) => assert_eq!(message, "chat request: HTTP 500"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
