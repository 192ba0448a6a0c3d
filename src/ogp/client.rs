use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use url::Url;

use super::extract::{extract_og_data, resolve_image_url};
use super::OgpProvider;
use crate::config::Config;
use crate::error::{AppResult, FetchError};
use crate::models::{LinkTarget, OgpMetadata, ProviderPreview};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ScrapsOgpBot/1.0; +https://github.com/boykush/scraps)";

/// Where metadata comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OgpSource {
    /// Fetch the linked page and read its meta tags.
    Direct,
    /// Ask a provider endpoint: `GET <endpoint>?url=<target>` returning JSON.
    Provider(Url),
}

/// reqwest-backed [`OgpProvider`].
///
/// Cheaply cloneable; clones share one connection pool, so concurrent cards
/// fetch in parallel over the same client.
#[derive(Debug, Clone)]
pub struct OgpClient {
    http: ReqwestClient,
    source: OgpSource,
}

impl OgpClient {
    pub fn new(source: OgpSource, timeout: Duration, user_agent: &str) -> AppResult<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { http, source })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let source = match &config.provider_url {
            Some(endpoint) => OgpSource::Provider(endpoint.clone()),
            None => OgpSource::Direct,
        };
        Self::new(source, config.fetch_timeout, &config.user_agent)
    }

    pub fn source(&self) -> &OgpSource {
        &self.source
    }

    async fn fetch_direct(&self, target: &LinkTarget) -> Result<OgpMetadata, FetchError> {
        let response = self.http.get(target.as_str()).send().await.map_err(|e| {
            tracing::warn!(error = ?e, url = %target, "Failed to fetch URL for OGP card");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, url = %target, "Linked page returned error status");
            return Err(FetchError::InvalidResponse(format!("status {status}")));
        }

        let html = response.text().await?;
        extract_og_data(&html, target)
    }

    async fn fetch_from_provider(
        &self,
        endpoint: &Url,
        target: &LinkTarget,
    ) -> Result<OgpMetadata, FetchError> {
        let mut request_url = endpoint.clone();
        request_url
            .query_pairs_mut()
            .append_pair("url", target.as_str());

        let response = self.http.get(request_url).send().await.map_err(|e| {
            tracing::warn!(error = ?e, url = %target, "Failed to contact OGP provider");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, url = %target, "OGP provider returned error status");
            return Err(FetchError::InvalidResponse(format!("status {status}")));
        }

        let body: ProviderPreview = response.json().await.map_err(|e| {
            tracing::warn!(error = ?e, url = %target, "Failed to parse OGP provider response");
            FetchError::from(e)
        })?;

        into_metadata(body, target)
    }
}

#[async_trait]
impl OgpProvider for OgpClient {
    async fn fetch(&self, target: &LinkTarget) -> Result<OgpMetadata, FetchError> {
        tracing::debug!(url = %target, source = ?self.source, "Fetching OGP metadata");
        match &self.source {
            OgpSource::Direct => self.fetch_direct(target).await,
            OgpSource::Provider(endpoint) => self.fetch_from_provider(endpoint, target).await,
        }
    }
}

/// Convert a provider body into metadata. A blank or absent title means the
/// provider found nothing usable. Text values are kept exactly as sent.
fn into_metadata(body: ProviderPreview, target: &LinkTarget) -> Result<OgpMetadata, FetchError> {
    let image = body
        .image()
        .and_then(|raw| resolve_image_url(raw, target.as_url()));
    let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

    let title = non_blank(body.title)
        .ok_or_else(|| FetchError::MissingMetadata(target.to_string()))?;
    let description = non_blank(body.description).unwrap_or_default();
    let site_name = non_blank(body.site_name).unwrap_or_else(|| target.host().to_string());

    let mut metadata = OgpMetadata::new(title, description).with_site_name(site_name);
    if let Some(image) = image {
        metadata = metadata.with_image_url(image);
    }
    Ok(metadata)
}
