//! HTTP-backed renderer
//!
//! Fetches pages with `reqwest` and answers queries against the static markup.
//! No scripts run, so this suits archives that render their listings and
//! metadata server-side.

use crate::config::RendererConfig;
use crate::render::{Element, HtmlDocument, Query, RenderError, RenderResult, Renderer};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Example
///
/// ```no_run
/// use archive_harvester::config::RendererConfig;
/// use archive_harvester::render::build_http_client;
///
/// let client = build_http_client(&RendererConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RendererConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer that loads each address with a single GET request
pub struct HttpRenderer {
    client: Option<Client>,
    current: Option<HtmlDocument>,
}

impl HttpRenderer {
    pub fn new(config: &RendererConfig) -> RenderResult<Self> {
        let client = build_http_client(config)?;
        tracing::info!("HTTP renderer initialized (user agent: {})", config.user_agent);
        Ok(Self {
            client: Some(client),
            current: None,
        })
    }
}

impl Query for HttpRenderer {
    fn query(&self, selector: &str) -> RenderResult<Vec<Element>> {
        self.current
            .as_ref()
            .ok_or(RenderError::NoDocument)?
            .query(selector)
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&mut self, url: &str) -> RenderResult<()> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| RenderError::Other("renderer already released".to_string()))?;

        // Drop the previous page first so a failed navigation never leaves a
        // stale document behind for the next query.
        self.current = None;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| RenderError::Navigation {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|source| RenderError::Navigation {
                url: url.to_string(),
                source,
            })?;

        tracing::trace!("Loaded {} ({} bytes)", final_url, body.len());
        self.current = Some(HtmlDocument::new(body));
        Ok(())
    }

    fn content_preview(&self, max_chars: usize) -> String {
        self.current
            .as_ref()
            .map(|doc| doc.preview(max_chars))
            .unwrap_or_default()
    }

    fn release(&mut self) {
        self.current = None;
        if self.client.take().is_some() {
            tracing::info!("HTTP renderer closed");
        }
    }
}
