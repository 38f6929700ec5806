//! Cross-category search view.
//!
//! One submission searches movies and series together; both lists are
//! replaced when the pair of responses lands.

use crate::accumulator::ResultAccumulator;
use crate::errors::CatalogueError;
use crate::providers::CatalogueProvider;
use crate::sequence::{RequestSequence, RequestToken, ResponseOutcome};
use crate::types::{CatalogueItem, Category, ResultPage};

/// Movie and series result pages for one search.
pub type SearchResults = (ResultPage<CatalogueItem>, ResultPage<CatalogueItem>);

/// One submitted search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    token: RequestToken,
    text: String,
}

impl SearchRequest {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Searches both categories concurrently. Fails if either search fails.
    ///
    /// # Errors
    /// - The first error reported by either provider search
    pub async fn fetch(
        &self,
        provider: &dyn CatalogueProvider,
    ) -> Result<SearchResults, CatalogueError> {
        futures::try_join!(
            provider.search(Category::Movie, &self.text, 1),
            provider.search(Category::Series, &self.text, 1),
        )
    }
}

/// State of the search screen.
#[derive(Debug, Default)]
pub struct SearchView {
    text: Option<String>,
    movies: ResultAccumulator<CatalogueItem>,
    series: ResultAccumulator<CatalogueItem>,
    sequence: RequestSequence,
    error: Option<String>,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a search. Blank text is ignored.
    pub fn submit(&mut self, text: &str) -> Option<SearchRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let token = self.sequence.issue();
        self.text = Some(text.to_string());
        self.error = None;
        tracing::debug!(%token, text, "Issuing search");

        Some(SearchRequest {
            token,
            text: text.to_string(),
        })
    }

    /// Hands a response pair back to the view; stale pairs are dropped.
    pub fn apply(
        &mut self,
        token: RequestToken,
        result: Result<SearchResults, CatalogueError>,
    ) -> ResponseOutcome {
        if !self.sequence.resolve(token) {
            tracing::debug!(%token, "Discarding stale search response");
            return ResponseOutcome::Stale;
        }

        match result {
            Ok((movies, series)) => {
                self.movies.absorb(movies);
                self.series.absorb(series);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Search failed: {e}");
                self.error = Some("Failed to search. Please try again.".to_string());
            }
        }
        ResponseOutcome::Applied
    }

    /// Fetches `request` and applies the response.
    pub async fn run(
        &mut self,
        provider: &dyn CatalogueProvider,
        request: SearchRequest,
    ) -> ResponseOutcome {
        let result = request.fetch(provider).await;
        self.apply(request.token, result)
    }

    /// The latest submitted text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn movies(&self) -> &[CatalogueItem] {
        self.movies.items()
    }

    pub fn series(&self) -> &[CatalogueItem] {
        self.series.items()
    }

    /// Combined count across both categories.
    pub fn total_results(&self) -> usize {
        self.movies.len() + self.series.len()
    }

    pub fn is_loading(&self) -> bool {
        self.sequence.is_outstanding()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
