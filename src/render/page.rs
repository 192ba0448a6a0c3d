use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::card::render_card;
use super::search::{search_input, search_results};
use crate::models::{CardState, LinkTarget};
use crate::page::ContentElement;
use crate::search::{SearchBox, SearchResult};

/// Everything around the page content: site name, title, readme and search.
#[derive(Debug, Clone, Default)]
pub struct PageShell {
    pub site_name: String,
    pub title: Option<String>,
    /// Trusted HTML produced by the site build.
    pub readme_html: Option<String>,
    pub search_input: String,
    pub search_results: Option<Vec<SearchResult>>,
}

impl PageShell {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_readme(mut self, readme_html: impl Into<String>) -> Self {
        self.readme_html = Some(readme_html.into());
        self
    }

    /// Snapshot the search box: its input text and last results.
    pub fn with_search(mut self, search: &SearchBox<'_>) -> Self {
        self.search_input = search.input().to_string();
        self.search_results = search.results().map(<[SearchResult]>::to_vec);
        self
    }

    /// `<title>` text: "Page | Site", or just the site name.
    pub fn document_title(&self) -> String {
        match &self.title {
            Some(title) => format!("{title} | {}", self.site_name),
            None => self.site_name.clone(),
        }
    }
}

/// Page content with every autolink slot replaced by its card.
pub fn render_content(
    elements: &[ContentElement],
    state_of: impl Fn(&LinkTarget) -> CardState,
) -> Markup {
    html! {
        @for element in elements {
            @match element {
                ContentElement::Raw(raw) => { (PreEscaped(raw.as_str())) }
                ContentElement::Autolink(target) => { (render_card(target, &state_of(target))) }
            }
        }
    }
}

pub fn render_page(shell: &PageShell, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (shell.document_title()) }
            }
            body {
                header class="site-header" {
                    a class="site-name" href="./" { (shell.site_name) }
                    div class="search" {
                        (search_input(&shell.search_input))
                        (search_results(shell.search_results.as_deref()))
                    }
                }
                main {
                    @if let Some(readme) = &shell.readme_html {
                        div class="readme-block" { (PreEscaped(readme.as_str())) }
                    }
                    @if let Some(title) = &shell.title {
                        h1 class="scrap-title" { (title) }
                    }
                    div class="scrap-content" { (content) }
                }
            }
        }
    }
}
