//! HTTP adapters for the deck generator's external services: the language
//! model that writes scripts, the stock-photo search, and the image
//! downloader.

pub mod fetch;
pub mod openai;
pub mod unsplash;

pub use fetch::HttpImageFetcher;
pub use openai::{OpenAiConfig, OpenAiScriptSource};
pub use unsplash::{UnsplashConfig, UnsplashImageSearch, PLACEHOLDER_IMAGE_URL};

use reqwest::blocking::{Client, Response};
use slides_core::{Error, Result};
use std::time::Duration;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("autoslides/", env!("CARGO_PKG_VERSION"));

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Upstream(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a non-success response into an [`Error::Upstream`] carrying the
/// status and body.
fn check_status(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(Error::Upstream(format!(
        "{} API error {}: {}",
        service,
        status.as_u16(),
        body
    )))
}
