//! Metadata provider implementations.

use async_trait::async_trait;

use crate::errors::CatalogueError;
use crate::types::{CatalogueDetails, CatalogueItem, Category, Genre, ResultPage, TrendingWindow};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod tmdb;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockProvider, ProviderCall};
pub use tmdb::TmdbClient;

/// Trait for catalogue metadata providers.
///
/// One operation per query kind. Implementations are stateless between
/// calls and never retry; a call yields a full page or fails.
#[async_trait]
pub trait CatalogueProvider: Send + Sync + std::fmt::Debug {
    /// Popular titles in a category.
    ///
    /// # Errors
    /// - `CatalogueError::InvalidRequest` - `page` is zero
    /// - `CatalogueError::FetchFailed` - Transport or provider failure
    async fn fetch_popular(
        &self,
        category: Category,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError>;

    /// Trending titles over a time window.
    ///
    /// # Errors
    /// - `CatalogueError::InvalidRequest` - `page` is zero
    /// - `CatalogueError::FetchFailed` - Transport or provider failure
    async fn fetch_trending(
        &self,
        category: Category,
        window: TrendingWindow,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError>;

    /// Full record for one title, including credits.
    ///
    /// # Errors
    /// - `CatalogueError::InvalidRequest` - `id` is zero
    /// - `CatalogueError::NotFound` - Provider has no such record
    /// - `CatalogueError::FetchFailed` - Transport or provider failure
    async fn fetch_details(
        &self,
        category: Category,
        id: u64,
    ) -> Result<CatalogueDetails, CatalogueError>;

    /// Free-text search within a category.
    ///
    /// # Errors
    /// - `CatalogueError::InvalidRequest` - `text` is blank or `page` is zero
    /// - `CatalogueError::FetchFailed` - Transport or provider failure
    async fn search(
        &self,
        category: Category,
        text: &str,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError>;

    /// Genre taxonomy for a category.
    ///
    /// # Errors
    /// - `CatalogueError::FetchFailed` - Transport or provider failure
    async fn fetch_genres(&self, category: Category) -> Result<Vec<Genre>, CatalogueError>;

    /// Popularity-sorted titles in one genre.
    ///
    /// # Errors
    /// - `CatalogueError::InvalidRequest` - `page` is zero
    /// - `CatalogueError::FetchFailed` - Transport or provider failure
    async fn fetch_by_genre(
        &self,
        category: Category,
        genre_id: u64,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError>;
}

pub(crate) fn check_page(page: u32) -> Result<(), CatalogueError> {
    if page == 0 {
        return Err(CatalogueError::invalid("page numbers start at 1"));
    }
    Ok(())
}

pub(crate) fn check_search_text(text: &str) -> Result<(), CatalogueError> {
    if text.trim().is_empty() {
        return Err(CatalogueError::invalid("search text must not be empty"));
    }
    Ok(())
}

pub(crate) fn check_id(id: u64) -> Result<(), CatalogueError> {
    if id == 0 {
        return Err(CatalogueError::invalid("ids are positive integers"));
    }
    Ok(())
}
