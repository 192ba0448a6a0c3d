//! Open Graph metadata lookup.
//!
//! [`OgpProvider`] is the seam the card state machine fetches through.
//! [`OgpClient`] implements it over HTTP, either by scraping the linked page
//! directly or by asking a metadata provider endpoint.

pub mod client;
pub mod extract;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{LinkTarget, OgpMetadata};

pub use client::{OgpClient, OgpSource, DEFAULT_FETCH_TIMEOUT, USER_AGENT};

/// One metadata lookup per call. Implementations must not retry.
#[async_trait]
pub trait OgpProvider: Send + Sync {
    async fn fetch(&self, target: &LinkTarget) -> Result<OgpMetadata, FetchError>;
}
