//! Loading survey exports from disk or over HTTP.

mod auth;
mod basic;
mod client;

pub use auth::BearerToken;
pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use tracing::debug;

/// Issues a GET for `url` through `client` and returns the response body.
///
/// Non-success status codes are reported as errors rather than handing an
/// HTML error page to the CSV parser.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} returned {status}");
    }
    Ok(resp.bytes().await?)
}

/// Returns true when `location` should be fetched over HTTP instead of read from disk.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Loads a survey export from a local path or an HTTP(S) URL.
///
/// When `bearer_token` is set, remote requests carry it as an
/// `Authorization: Bearer` header. Local reads ignore it.
#[tracing::instrument(skip(bearer_token), fields(remote = is_remote(location)))]
pub async fn load_source(location: &str, bearer_token: Option<&str>) -> Result<Bytes> {
    let bytes = if is_remote(location) {
        match bearer_token {
            Some(token) => {
                let client = BearerToken::new(BasicClient::new(), token)?;
                fetch_bytes(&client, location).await?
            }
            None => fetch_bytes(&BasicClient::new(), location).await?,
        }
    } else {
        let data = tokio::fs::read(location)
            .await
            .with_context(|| format!("failed to read {location}"))?;
        Bytes::from(data)
    };

    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/export.csv"));
        assert!(is_remote("http://localhost:8080/form.csv"));
        assert!(!is_remote("hubspot.csv"));
        assert!(!is_remote("/data/httpdump.csv"));
    }

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = format!("{}/nps_trends_fetch_local.csv", env::temp_dir().display());
        fs::write(&path, "Rating,Date\n9,2022-01-01\n").unwrap();

        let bytes = load_source(&path, None).await.unwrap();
        assert!(bytes.starts_with(b"Rating,Date"));

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_rejects_invalid_bearer_token() {
        let result = load_source("https://example.com/export.csv", Some("bad\ntoken")).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bearer token"));
    }

    #[tokio::test]
    async fn test_load_source_missing_file_is_error() {
        let result = load_source("/definitely/not/here.csv", None).await;
        assert!(result.is_err());
    }
}
