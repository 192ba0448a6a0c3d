use maud::{html, Markup};

use crate::search::SearchResult;

pub fn search_input(value: &str) -> Markup {
    html! {
        input id="search-input" class="search-input" type="search" placeholder="Search scraps" value=(value);
    }
}

/// The results container. Empty before the first submit.
pub fn search_results(results: Option<&[SearchResult]>) -> Markup {
    html! {
        div id="search-results" class="search-results" {
            @if let Some(results) = results {
                @if results.is_empty() {
                    p class="search-empty" { "No results" }
                } @else {
                    ul {
                        @for result in results {
                            li { a href=(result.url) { (result.title) } }
                        }
                    }
                }
            }
        }
    }
}
