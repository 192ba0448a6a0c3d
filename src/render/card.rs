use maud::{html, Markup};

use super::is_safe_url;
use crate::models::{CardState, LinkTarget};

pub const LOADING_TEXT: &str = "Loading...";
pub const FAILED_TITLE: &str = "Preview unavailable";

/// Text and image a card shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image: Option<&'a str>,
    pub site: Option<&'a str>,
}

pub fn card_view(state: &CardState) -> CardView<'_> {
    match state {
        CardState::Idle | CardState::Loading => CardView {
            title: LOADING_TEXT,
            description: LOADING_TEXT,
            image: None,
            site: None,
        },
        CardState::Loaded(meta) => CardView {
            title: meta.title(),
            description: meta.description(),
            image: meta.image_url(),
            site: meta.site_name(),
        },
        CardState::Failed(reason) => CardView {
            title: FAILED_TITLE,
            description: reason.message(),
            image: None,
            site: None,
        },
    }
}

/// Render one card. The image `src` is the metadata URL exactly as given.
///
/// Placeholder text is marked: a pending card has `aria-busy="true"` and its
/// title carries `ogp-placeholder`, so a page whose real title happens to be
/// the placeholder text still reads as loaded.
pub fn render_card(target: &LinkTarget, state: &CardState) -> Markup {
    let view = card_view(state);
    let pending = !state.is_terminal();
    let reason: Option<&str> = match state {
        CardState::Failed(reason) => Some(reason.as_ref()),
        _ => None,
    };

    html! {
        div class="ogp-card"
            data-state=(state.name())
            data-url=(target.as_str())
            data-reason=[reason]
            aria-busy=[pending.then_some("true")]
        {
            a class="ogp-link" href=(target.as_str()) target="_blank" rel="noopener noreferrer" {
                @if let Some(image) = view.image {
                    @if is_safe_url(image) {
                        img class="ogp-image" src=(image) alt=(view.title) loading="lazy";
                    }
                }
                div class="ogp-content" {
                    div.ogp-title.ogp-placeholder[pending] { (view.title) }
                    div class="ogp-description" { (view.description) }
                    div class="ogp-site" { (view.site.unwrap_or(target.host())) }
                }
            }
        }
    }
}
