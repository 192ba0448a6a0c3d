//! A mounted page: its content plus one OGP card per distinct autolink.

pub mod scanner;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use maud::Markup;

use crate::card::{CardId, OgpCard};
use crate::models::{CardState, LinkTarget};
use crate::ogp::OgpProvider;
use crate::render::page::{render_content, render_page, PageShell};

pub use scanner::{autolinks, scan, ContentElement};

/// Cards live in an arena in discovery order; `index` maps each target to its
/// slot, so a link repeated on the page shares one card.
pub struct OgpPage {
    elements: Vec<ContentElement>,
    cards: Vec<OgpCard>,
    index: HashMap<LinkTarget, CardId>,
}

impl OgpPage {
    /// Create and start one card per distinct autolink. Must be called from
    /// within a tokio runtime.
    pub fn mount(
        elements: Vec<ContentElement>,
        provider: Arc<dyn OgpProvider>,
        fetch_timeout: Duration,
    ) -> Self {
        let mut cards = Vec::new();
        let mut index = HashMap::new();

        for target in autolinks(&elements) {
            let id = CardId(cards.len());
            index.insert(target.clone(), id);
            cards.push(OgpCard::new(id, target, Arc::clone(&provider), fetch_timeout));
        }

        for card in &cards {
            card.start();
        }

        tracing::info!(cards = cards.len(), "page mounted");
        Self {
            elements,
            cards,
            index,
        }
    }

    /// Scan an HTML fragment and mount it.
    pub fn mount_html(html: &str, provider: Arc<dyn OgpProvider>, fetch_timeout: Duration) -> Self {
        Self::mount(scan(html), provider, fetch_timeout)
    }

    pub fn elements(&self) -> &[ContentElement] {
        &self.elements
    }

    pub fn cards(&self) -> &[OgpCard] {
        &self.cards
    }

    pub fn card(&self, target: &LinkTarget) -> Option<&OgpCard> {
        self.index.get(target).map(|id| &self.cards[id.0])
    }

    pub fn state_of(&self, target: &LinkTarget) -> Option<CardState> {
        self.card(target).map(OgpCard::state)
    }

    /// Wait until every card is terminal (or torn down). Cards settle
    /// concurrently; the result keeps discovery order.
    pub async fn settle(&self) -> Vec<(LinkTarget, CardState)> {
        join_all(
            self.cards
                .iter()
                .map(|card| async move { (card.target().clone(), card.settled().await) }),
        )
        .await
    }

    /// Render the whole page with each card in its current state.
    pub fn render(&self, shell: &PageShell) -> Markup {
        let content = render_content(&self.elements, |target| {
            self.state_of(target).unwrap_or_default()
        });
        render_page(shell, content)
    }

    /// Tear down every card; pending fetches are dropped without updating state.
    pub fn unmount(self) {
        for card in &self.cards {
            card.teardown();
        }
        tracing::info!(cards = self.cards.len(), "page unmounted");
    }
}
