//! Image search backed by the Unsplash photo search API.

use crate::{build_client, check_status};
use rand::seq::SliceRandom;
use reqwest::blocking::Client;
use serde::Deserialize;
use slides_core::request::{check_range, IMAGE_SEARCH_RANGE};
use slides_core::{Error, ImageSearch, Orientation, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Returned `count` times when a search finds nothing.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://dummyimage.com/800x600/cccccc/000000&text=No+image";

/// Unsplash caps `per_page` at 30.
const MAX_PER_PAGE: usize = 30;

/// Connection settings for [`UnsplashImageSearch`].
#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub access_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl UnsplashConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
    #[serde(default)]
    total_pages: usize,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Finds stock photos matching a slide title.
pub struct UnsplashImageSearch {
    config: UnsplashConfig,
    client: Client,
}

impl UnsplashImageSearch {
    pub fn new(config: UnsplashConfig) -> Result<Self> {
        if config.access_key.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "UNSPLASH_ACCESS_KEY is not set; create an app at https://unsplash.com/developers"
                    .to_string(),
            ));
        }
        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn search_page(
        &self,
        query: &str,
        page: usize,
        per_page: usize,
        orientation: Option<Orientation>,
    ) -> Result<SearchResponse> {
        let url = format!("{}/search/photos", self.config.base_url.trim_end_matches('/'));
        let mut params = vec![
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(orientation) = orientation {
            params.push(("orientation", orientation.as_str().to_string()));
        }

        let response = self
            .client
            .get(&url)
            .header("Accept-Version", "v1")
            .header("Authorization", format!("Client-ID {}", self.config.access_key))
            .query(&params)
            .send()
            .map_err(|e| Error::Upstream(format!("Unsplash request failed: {}", e)))?;
        let response = check_status("Unsplash", response)?;

        response
            .json()
            .map_err(|e| Error::Upstream(format!("Unexpected Unsplash response: {}", e)))
    }
}

impl ImageSearch for UnsplashImageSearch {
    fn search_images(
        &self,
        query: &str,
        count: usize,
        orientation: Option<Orientation>,
    ) -> Result<Vec<String>> {
        check_range("image count", count, &IMAGE_SEARCH_RANGE)?;

        let per_page = count.min(MAX_PER_PAGE);
        let mut collected = Vec::with_capacity(count);
        let mut page = 1;

        while collected.len() < count {
            let response = self.search_page(query, page, per_page, orientation)?;
            if response.results.is_empty() {
                break;
            }
            collected.extend(response.results.into_iter().map(|p| p.urls.regular));

            page += 1;
            if page > response.total_pages {
                break;
            }
        }

        if collected.is_empty() {
            log::warn!("No images found for '{}', using placeholders", query);
            return Ok(vec![PLACEHOLDER_IMAGE_URL.to_string(); count]);
        }

        collected.shuffle(&mut rand::rng());
        collected.truncate(count);
        log::debug!("Found {} images for '{}'", collected.len(), query);
        Ok(collected)
    }
}
