//! Catalog retrieval over HTTP.
//!
//! The landing page links to a versioned catalog script; the link is found by
//! regex and then fetched as text.

use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const DEFAULT_LANDING_URL: &str =
    "https://gemstore-live.ncplatform.net/?buildid=999999999999999999999";
pub const DEFAULT_CATALOG_PATTERN: &str = r"https://\S+catalog\S+\.js";

pub trait CatalogSource {
    /// Locate the current catalog script
    fn resolve_catalog_url(&self) -> Result<String>;

    /// Raw body of `url`
    fn fetch_text(&self, url: &str) -> Result<String>;
}

pub struct HttpSource {
    client: Client,
    landing_url: String,
    pattern: Regex,
}

impl HttpSource {
    pub fn new(landing_url: impl Into<String>, pattern: Regex, timeout: Duration) -> Result<Self> {
        let landing_url = landing_url.into();
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Fetch {
                url: landing_url.clone(),
                source,
            })?;

        Ok(HttpSource {
            client,
            landing_url,
            pattern,
        })
    }
}

impl CatalogSource for HttpSource {
    fn resolve_catalog_url(&self) -> Result<String> {
        let page = self.fetch_text(&self.landing_url)?;
        let url = find_catalog_url(&page, &self.pattern).ok_or_else(|| Error::SourceUnavailable {
            landing_url: self.landing_url.clone(),
        })?;
        info!(%url, "resolved catalog url");
        Ok(url.to_string())
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        let fetch_err = |source| Error::Fetch {
            url: url.to_string(),
            source,
        };

        debug!(%url, "fetching");
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|res| res.error_for_status())
            .and_then(|res| res.text())
            .map_err(fetch_err)?;
        debug!(%url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

/// First match of `pattern` in the landing page body
pub fn find_catalog_url<'a>(page: &'a str, pattern: &Regex) -> Option<&'a str> {
    pattern.find(page).map(|m| m.as_str())
}
