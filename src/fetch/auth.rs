use super::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>`.
///
/// Used for private exports such as a CRM export endpoint or a sheet
/// published behind an access token.
pub struct BearerToken<C> {
    pub inner: C,
    value: HeaderValue,
}

impl<C> BearerToken<C> {
    /// Fails when `token` contains characters not allowed in a header value.
    pub fn new(inner: C, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("bearer token is not a valid HTTP header value")?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BearerToken<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_valid_token_builds_sensitive_header() {
        let client = BearerToken::new(BasicClient::new(), "abc.123-XYZ").unwrap();
        assert_eq!(client.value.to_str().unwrap(), "Bearer abc.123-XYZ");
        assert!(client.value.is_sensitive());
    }

    #[test]
    fn test_token_with_newline_is_error() {
        assert!(BearerToken::new(BasicClient::new(), "abc\n123").is_err());
    }
}
