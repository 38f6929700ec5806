//! Listing query inputs and effective query resolution.

use std::fmt;

use crate::errors::CatalogueError;
use crate::providers::CatalogueProvider;
use crate::types::{CatalogueItem, Category, Genre, ResultPage};

/// Genre filter selected in a listing view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Named(String),
}

impl GenreFilter {
    /// Parses user input. Blank, `All` and `All Genres` mean no filter.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("all genres")
        {
            GenreFilter::All
        } else {
            GenreFilter::Named(trimmed.to_string())
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => f.write_str("All"),
            GenreFilter::Named(name) => f.write_str(name),
        }
    }
}

/// User-controlled inputs of one listing view.
///
/// Changing the search text or genre filter always resets the page to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    genre: GenreFilter,
    page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            genre: GenreFilter::All,
            page: 1,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn genre(&self) -> &GenreFilter {
        &self.genre
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.trim().to_string();
        self.page = 1;
    }

    pub fn set_genre(&mut self, genre: GenreFilter) {
        self.genre = genre;
        self.page = 1;
    }

    pub(crate) fn reset_page(&mut self) {
        self.page = 1;
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Moves to the next page if `total_pages` allows it.
    pub fn advance_page(&mut self, total_pages: u32) -> bool {
        if self.page < total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }
}

/// The single request mode derived from a [`QueryState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveQuery {
    Search { text: String },
    ByGenre { genre: Genre },
    Popular,
}

impl ActiveQuery {
    /// Derives the request mode. Search text wins over the genre filter; a
    /// genre that cannot be resolved (unknown name, or `genres` not loaded
    /// yet) falls back to the popular listing.
    pub fn resolve(state: &QueryState, genres: Option<&[Genre]>) -> Self {
        if !state.search_text.is_empty() {
            return ActiveQuery::Search {
                text: state.search_text.clone(),
            };
        }

        let GenreFilter::Named(name) = &state.genre else {
            return ActiveQuery::Popular;
        };

        let found = genres
            .unwrap_or_default()
            .iter()
            .find(|genre| genre.name.eq_ignore_ascii_case(name));
        match found {
            Some(genre) => ActiveQuery::ByGenre {
                genre: genre.clone(),
            },
            None => {
                tracing::debug!(
                    genre = %name,
                    genres_loaded = genres.is_some(),
                    "Genre not resolvable, using popular listing"
                );
                ActiveQuery::Popular
            }
        }
    }

    /// Runs this query for `page` against `provider`.
    ///
    /// # Errors
    /// - Any error from the underlying provider operation
    pub async fn fetch(
        &self,
        provider: &dyn CatalogueProvider,
        category: Category,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        match self {
            ActiveQuery::Search { text } => provider.search(category, text, page).await,
            ActiveQuery::ByGenre { genre } => {
                provider.fetch_by_genre(category, genre.id, page).await
            }
            ActiveQuery::Popular => provider.fetch_popular(category, page).await,
        }
    }
}
