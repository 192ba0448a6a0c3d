//! Page search: a JSON index queried by keyword.

use std::path::Path;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppResult;

/// Result cap when none is given; also how many items an empty query lists.
pub const DEFAULT_LIMIT: usize = 100;

const TITLE_WEIGHT: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexItem {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub body: String,
}

impl SearchIndexItem {
    pub fn new(title: &str, url: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

/// How multiple keywords combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchLogic {
    /// All keywords must match
    And,
    /// Any keyword can match
    #[default]
    Or,
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    items: Vec<SearchIndexItem>,
}

impl SearchIndex {
    pub fn new(items: Vec<SearchIndexItem>) -> Self {
        Self { items }
    }

    /// Parse an index JSON array, resolving relative item URLs against
    /// `base_url`.
    pub fn from_json(json: &str, base_url: &Url) -> AppResult<Self> {
        let mut items: Vec<SearchIndexItem> = serde_json::from_str(json)?;
        for item in &mut items {
            if Url::parse(&item.url).is_err() {
                if let Ok(resolved) = base_url.join(&item.url) {
                    item.url = resolved.into();
                }
            }
        }
        Ok(Self { items })
    }

    pub async fn load(path: &Path, base_url: &Url) -> AppResult<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        let index = Self::from_json(&json, base_url)?;
        tracing::debug!(path = %path.display(), items = index.len(), "search index loaded");
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// At most `limit` results, best first; equal scores keep index order.
    ///
    /// Each whitespace-separated keyword is fuzzy-matched, ignoring case,
    /// against the title and the body; a title hit counts double. The whole
    /// query matched against the title adds to the score. An empty query
    /// lists the first `limit` items.
    pub fn query(&self, text: &str, logic: SearchLogic, limit: usize) -> Vec<SearchResult> {
        let phrase = text.trim();
        if phrase.is_empty() {
            return self.items.iter().take(limit).map(to_result).collect();
        }
        let keywords: Vec<&str> = phrase.split_whitespace().collect();
        let matcher = SkimMatcherV2::default().ignore_case();

        let mut scored: Vec<(i64, &SearchIndexItem)> = self
            .items
            .iter()
            .filter_map(|item| score(&matcher, item, phrase, &keywords, logic).map(|s| (s, item)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(limit)
            .map(|(_, item)| to_result(item))
            .collect()
    }
}

fn score(
    matcher: &SkimMatcherV2,
    item: &SearchIndexItem,
    phrase: &str,
    keywords: &[&str],
    logic: SearchLogic,
) -> Option<i64> {
    let hits: Vec<Option<i64>> = keywords
        .iter()
        .map(|keyword| {
            let title = matcher
                .fuzzy_match(&item.title, keyword)
                .map(|s| s * TITLE_WEIGHT);
            let body = matcher.fuzzy_match(&item.body, keyword);
            title.max(body)
        })
        .collect();

    let matched = match logic {
        SearchLogic::And => hits.iter().all(Option::is_some),
        SearchLogic::Or => hits.iter().any(Option::is_some),
    };
    if !matched {
        return None;
    }

    let phrase_bonus = if keywords.len() > 1 {
        matcher.fuzzy_match(&item.title, phrase).unwrap_or(0)
    } else {
        0
    };
    Some(hits.into_iter().flatten().sum::<i64>() + phrase_bonus)
}

fn to_result(item: &SearchIndexItem) -> SearchResult {
    SearchResult {
        title: item.title.clone(),
        url: item.url.clone(),
    }
}

/// The page's search input: text is filled in, then submitted.
#[derive(Debug)]
pub struct SearchBox<'a> {
    index: &'a SearchIndex,
    logic: SearchLogic,
    limit: usize,
    input: String,
    results: Option<Vec<SearchResult>>,
}

impl<'a> SearchBox<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            logic: SearchLogic::default(),
            limit: DEFAULT_LIMIT,
            input: String::new(),
            results: None,
        }
    }

    pub fn with_logic(mut self, logic: SearchLogic) -> Self {
        self.logic = logic;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the input text. Results are unchanged until the next submit.
    pub fn fill(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Run the query for the current input (the Enter key).
    pub fn submit(&mut self) -> &[SearchResult] {
        let results = self.index.query(&self.input, self.logic, self.limit);
        tracing::debug!(query = %self.input, results = results.len(), "search submitted");
        self.results.insert(results)
    }

    /// Results of the last submit, `None` before the first one.
    pub fn results(&self) -> Option<&[SearchResult]> {
        self.results.as_deref()
    }
}
