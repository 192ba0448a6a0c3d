//! Scraps OGP - preview cards for autolinks on Scraps Doc pages.
//!
//! # Architecture
//!
//! - **ogp**: fetches Open Graph metadata for one link, directly from the
//!   linked page or through a provider endpoint
//! - **card**: per-link state machine (Idle, Loading, Loaded, Failed) with a
//!   bounded wait and teardown
//! - **render**: maud templates for cards, search results and the page shell
//! - **page**: scans a page fragment for autolinks and mounts one card each
//! - **search**: keyword query over the page search index

pub mod card;
pub mod config;
pub mod error;
pub mod models;
pub mod ogp;
pub mod page;
pub mod render;
pub mod search;

pub use card::{CardId, OgpCard};
pub use config::Config;
pub use error::{AppError, AppResult, FetchError, LinkError};
pub use models::{CardState, FailureReason, LinkTarget, OgpMetadata};
pub use ogp::{OgpClient, OgpProvider, OgpSource};
pub use page::OgpPage;
