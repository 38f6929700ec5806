//! Mock provider implementation for testing.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CatalogueProvider, check_id, check_page, check_search_text};
use crate::errors::CatalogueError;
use crate::types::{
    CatalogueDetails, CatalogueItem, Category, Genre, MovieDetails, ResultPage, Season,
    SeriesDetails, TrendingWindow,
};

/// A provider call as observed by [`MockProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    Popular { category: Category, page: u32 },
    Trending {
        category: Category,
        window: TrendingWindow,
        page: u32,
    },
    Details { category: Category, id: u64 },
    Search {
        category: Category,
        text: String,
        page: u32,
    },
    Genres { category: Category },
    ByGenre {
        category: Category,
        genre_id: u64,
        page: u32,
    },
}

/// Deterministic in-memory provider.
///
/// Every listing has `total_pages` pages of `page_size` items. Item ids are
/// `page * 1000 + index`, and titles name the query that produced them, so
/// tests can tell which request a page came from.
#[derive(Debug)]
pub struct MockProvider {
    page_size: usize,
    total_pages: u32,
    genres: Vec<Genre>,
    missing_ids: HashSet<u64>,
    search_delays: HashMap<String, Duration>,
    failing: Mutex<bool>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Creates a provider with 10 items per page and 5 pages.
    pub fn new() -> Self {
        Self {
            page_size: 10,
            total_pages: 5,
            genres: vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 27,
                    name: "Horror".to_string(),
                },
                Genre {
                    id: 35,
                    name: "Comedy".to_string(),
                },
            ],
            missing_ids: HashSet::new(),
            search_delays: HashMap::new(),
            failing: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_pages(mut self, page_size: usize, total_pages: u32) -> Self {
        self.page_size = page_size;
        self.total_pages = total_pages;
        self
    }

    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    /// Details lookups for `id` answer `NotFound`.
    pub fn with_missing_id(mut self, id: u64) -> Self {
        self.missing_ids.insert(id);
        self
    }

    /// Searches for `text` resolve only after `delay`.
    pub fn with_search_delay(mut self, text: &str, delay: Duration) -> Self {
        self.search_delays.insert(text.to_string(), delay);
        self
    }

    /// Makes every subsequent call fail with `FetchFailed`.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: ProviderCall, operation: String) -> Result<(), CatalogueError> {
        self.calls.lock().push(call);
        if *self.failing.lock() {
            return Err(CatalogueError::fetch_failed(operation, "mock failure"));
        }
        Ok(())
    }

    fn page(&self, category: Category, label: &str, page: u32) -> ResultPage<CatalogueItem> {
        let items = (0..self.page_size)
            .map(|index| CatalogueItem {
                id: u64::from(page) * 1000 + index as u64,
                category,
                title: format!("{label} #{page}.{index}"),
                release_year: Some(2000 + index as i32),
                rating: Some(7.0),
                poster_path: Some(format!("/poster-{page}-{index}.jpg")),
                overview: None,
                genre_ids: Vec::new(),
            })
            .collect();

        ResultPage {
            items,
            page_number: page,
            total_pages: self.total_pages,
            total_results: Some(self.total_pages * self.page_size as u32),
        }
    }
}

#[async_trait]
impl CatalogueProvider for MockProvider {
    async fn fetch_popular(
        &self,
        category: Category,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_page(page)?;
        self.record(
            ProviderCall::Popular { category, page },
            format!("fetch popular {}", category.plural()),
        )?;
        Ok(self.page(category, "popular", page))
    }

    async fn fetch_trending(
        &self,
        category: Category,
        window: TrendingWindow,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_page(page)?;
        self.record(
            ProviderCall::Trending { category, window, page },
            format!("fetch trending {}", category.plural()),
        )?;
        Ok(self.page(category, &format!("trending-{}", window.as_str()), page))
    }

    async fn fetch_details(
        &self,
        category: Category,
        id: u64,
    ) -> Result<CatalogueDetails, CatalogueError> {
        check_id(id)?;
        self.record(
            ProviderCall::Details { category, id },
            format!("fetch {} details", category.singular()),
        )?;
        if self.missing_ids.contains(&id) {
            return Err(CatalogueError::NotFound { category, id });
        }

        let item = CatalogueItem {
            id,
            category,
            title: format!("details #{id}"),
            release_year: Some(2020),
            rating: Some(8.0),
            poster_path: None,
            overview: Some("Mock overview".to_string()),
            genre_ids: vec![self.genres.first().map_or(0, |genre| genre.id)],
        };

        Ok(match category {
            Category::Movie => CatalogueDetails::Movie(MovieDetails {
                item,
                runtime_minutes: Some(120),
                tagline: None,
                imdb_id: Some("tt0000001".to_string()),
                backdrop_path: None,
                genres: self.genres.iter().take(1).cloned().collect(),
                cast: Vec::new(),
            }),
            Category::Series => CatalogueDetails::Series(SeriesDetails {
                item,
                number_of_seasons: Some(2),
                number_of_episodes: Some(18),
                backdrop_path: None,
                seasons: vec![
                    Season {
                        season_number: 1,
                        episode_count: 8,
                        name: Some("Season 1".to_string()),
                    },
                    Season {
                        season_number: 2,
                        episode_count: 10,
                        name: Some("Season 2".to_string()),
                    },
                ],
                genres: self.genres.iter().take(1).cloned().collect(),
                cast: Vec::new(),
            }),
        })
    }

    async fn search(
        &self,
        category: Category,
        text: &str,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_search_text(text)?;
        check_page(page)?;
        self.record(
            ProviderCall::Search {
                category,
                text: text.to_string(),
                page,
            },
            format!("search {}", category.plural()),
        )?;

        if let Some(delay) = self.search_delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self.page(category, &format!("search:{text}"), page))
    }

    async fn fetch_genres(&self, category: Category) -> Result<Vec<Genre>, CatalogueError> {
        self.record(
            ProviderCall::Genres { category },
            format!("fetch {} genres", category.singular()),
        )?;
        Ok(self.genres.clone())
    }

    async fn fetch_by_genre(
        &self,
        category: Category,
        genre_id: u64,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_page(page)?;
        self.record(
            ProviderCall::ByGenre { category, genre_id, page },
            format!("fetch {} by genre", category.plural()),
        )?;
        Ok(self.page(category, &format!("genre:{genre_id}"), page))
    }
}
