//! HTML rendering for cards, search results and the page shell.
//!
//! All rendering uses maud, so every dynamic value is escaped unless it is
//! wrapped in `PreEscaped` on purpose.

pub mod card;
pub mod page;
pub mod search;

/// Only http(s) URLs are emitted into `src`/`href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
