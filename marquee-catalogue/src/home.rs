//! Landing page sections.

use crate::errors::CatalogueError;
use crate::providers::CatalogueProvider;
use crate::types::{CatalogueItem, Category, TrendingWindow};

/// Items shown per home section.
pub const HOME_SECTION_LEN: usize = 6;

/// The three rows of the landing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSections {
    pub trending_movies: Vec<CatalogueItem>,
    pub popular_movies: Vec<CatalogueItem>,
    pub popular_series: Vec<CatalogueItem>,
}

impl HomeSections {
    /// Loads today's trending movies, popular movies and popular series.
    ///
    /// # Errors
    /// - The first error reported by any of the three requests
    pub async fn load(provider: &dyn CatalogueProvider) -> Result<Self, CatalogueError> {
        let (trending, movies, series) = futures::try_join!(
            provider.fetch_trending(Category::Movie, TrendingWindow::Day, 1),
            provider.fetch_popular(Category::Movie, 1),
            provider.fetch_popular(Category::Series, 1),
        )?;

        Ok(Self {
            trending_movies: first_items(trending.items),
            popular_movies: first_items(movies.items),
            popular_series: first_items(series.items),
        })
    }
}

fn first_items(mut items: Vec<CatalogueItem>) -> Vec<CatalogueItem> {
    items.truncate(HOME_SECTION_LEN);
    items
}
