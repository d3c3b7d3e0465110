use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used by the loader to issue its GET requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
