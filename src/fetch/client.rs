use async_trait::async_trait;
use reqwest::{Request, Response};

/// Minimal request executor so auth wrappers can be layered over a client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
