//! Data types for catalogue browsing.
//!
//! Provider payloads are loosely shaped: almost every field may be missing.
//! The `Raw*` structs mirror the wire format with everything optional and
//! are converted into the typed records the views work with.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Content category. Nearly every provider operation is parameterized by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Movie,
    Series,
}

impl Category {
    /// Both categories, movies first.
    pub const ALL: [Category; 2] = [Category::Movie, Category::Series];

    /// Path segment used by the provider.
    pub fn path_segment(self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Series => "tv",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Series => "TV show",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Category::Movie => "movies",
            Category::Series => "TV shows",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// Trending time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    #[default]
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// A movie or series as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueItem {
    /// Provider id, unique within the category
    pub id: u64,
    pub category: Category,
    pub title: String,
    pub release_year: Option<i32>,
    /// Average vote in [0, 10]
    pub rating: Option<f32>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub genre_ids: Vec<u64>,
}

/// One page of provider results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page_number: u32,
    pub total_pages: u32,
    pub total_results: Option<u32>,
}

/// Provider genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Cast member from the provider's credits block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

/// Season summary attached to series details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub name: Option<String>,
}

/// Full record for a movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub item: CatalogueItem,
    pub runtime_minutes: Option<u32>,
    pub tagline: Option<String>,
    pub imdb_id: Option<String>,
    pub backdrop_path: Option<String>,
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
}

/// Full record for a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDetails {
    pub item: CatalogueItem,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub backdrop_path: Option<String>,
    pub seasons: Vec<Season>,
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
}

/// Detail record for either category.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogueDetails {
    Movie(MovieDetails),
    Series(SeriesDetails),
}

impl CatalogueDetails {
    pub fn item(&self) -> &CatalogueItem {
        match self {
            CatalogueDetails::Movie(details) => &details.item,
            CatalogueDetails::Series(details) => &details.item,
        }
    }

    pub fn genres(&self) -> &[Genre] {
        match self {
            CatalogueDetails::Movie(details) => &details.genres,
            CatalogueDetails::Series(details) => &details.genres,
        }
    }

    pub fn cast(&self) -> &[CastMember] {
        match self {
            CatalogueDetails::Movie(details) => &details.cast,
            CatalogueDetails::Series(details) => &details.cast,
        }
    }
}

/// Listing envelope as returned by the provider.
#[derive(Debug, Deserialize)]
pub(crate) struct RawListing {
    #[serde(default)]
    pub results: Vec<RawItem>,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u32>,
}

impl RawListing {
    /// Shapes the envelope. The page number is always the one requested;
    /// a different page echoed by the provider is logged and ignored.
    pub(crate) fn into_page(
        self,
        category: Category,
        requested_page: u32,
    ) -> ResultPage<CatalogueItem> {
        if let Some(echoed) = self.page.filter(|echoed| *echoed != requested_page) {
            tracing::warn!(
                %category,
                requested_page,
                echoed,
                "Provider answered a different page than requested"
            );
        }

        ResultPage {
            items: self
                .results
                .into_iter()
                .map(|raw| raw.into_item(category))
                .collect(),
            page_number: requested_page,
            total_pages: self.total_pages.unwrap_or(0),
            total_results: self.total_results,
        }
    }
}

/// Listing record. Movies use `title`/`release_date`, series use
/// `name`/`first_air_date`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawItem {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

impl RawItem {
    pub(crate) fn into_item(self, category: Category) -> CatalogueItem {
        let (title, date) = match category {
            Category::Movie => (self.title.or(self.name), self.release_date),
            Category::Series => (self.name.or(self.title), self.first_air_date),
        };

        CatalogueItem {
            id: self.id,
            category,
            title: non_empty(title).unwrap_or_else(|| "Untitled".to_string()),
            release_year: date.as_deref().and_then(parse_release_year),
            rating: self
                .vote_average
                .filter(|rating| rating.is_finite() && (0.0..=10.0).contains(rating)),
            poster_path: non_empty(self.poster_path),
            overview: non_empty(self.overview),
            genre_ids: self.genre_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Detail record for either category, appended with credits.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDetails {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub runtime: Option<u32>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    pub credits: Option<RawCredits>,
}

impl RawDetails {
    pub(crate) fn into_details(self, category: Category) -> CatalogueDetails {
        let item = RawItem {
            id: self.id,
            title: self.title,
            name: self.name,
            release_date: self.release_date,
            first_air_date: self.first_air_date,
            vote_average: self.vote_average,
            poster_path: self.poster_path,
            overview: self.overview,
            genre_ids: self.genres.iter().map(|genre| genre.id).collect(),
        }
        .into_item(category);
        let cast = self.credits.unwrap_or_default().cast;

        match category {
            Category::Movie => CatalogueDetails::Movie(MovieDetails {
                item,
                runtime_minutes: self.runtime.filter(|minutes| *minutes > 0),
                tagline: non_empty(self.tagline),
                imdb_id: non_empty(self.imdb_id),
                backdrop_path: non_empty(self.backdrop_path),
                genres: self.genres,
                cast,
            }),
            Category::Series => CatalogueDetails::Series(SeriesDetails {
                item,
                number_of_seasons: self.number_of_seasons,
                number_of_episodes: self.number_of_episodes,
                backdrop_path: non_empty(self.backdrop_path),
                seasons: self.seasons,
                genres: self.genres,
                cast,
            }),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Extracts the year from a provider date (`YYYY-MM-DD`). Empty or
/// malformed dates yield `None`.
fn parse_release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|parsed| parsed.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_listing_shape() {
        let raw: RawListing = serde_json::from_str(
            r#"{
                "page": 2,
                "total_pages": 40,
                "total_results": 800,
                "results": [
                    {"id": 438631, "title": "Dune", "release_date": "2021-09-15",
                     "vote_average": 7.8, "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                     "genre_ids": [878, 12]},
                    {"id": 1, "release_date": "", "vote_average": 11.5, "poster_path": null}
                ]
            }"#,
        )
        .unwrap();

        let page = raw.into_page(Category::Movie, 2);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.total_pages, 40);
        assert_eq!(page.total_results, Some(800));

        let dune = &page.items[0];
        assert_eq!(dune.title, "Dune");
        assert_eq!(dune.release_year, Some(2021));
        assert_eq!(dune.rating, Some(7.8));
        assert_eq!(dune.genre_ids, vec![878, 12]);
        assert_eq!(dune.category, Category::Movie);

        let sparse = &page.items[1];
        assert_eq!(sparse.title, "Untitled");
        assert_eq!(sparse.release_year, None);
        assert_eq!(sparse.rating, None);
        assert_eq!(sparse.poster_path, None);
    }

    #[test]
    fn test_series_listing_uses_name_and_air_date() {
        let raw: RawListing = serde_json::from_str(
            r#"{"results": [{"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20"}]}"#,
        )
        .unwrap();

        let page = raw.into_page(Category::Series, 3);
        assert_eq!(page.page_number, 3);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.items[0].title, "Breaking Bad");
        assert_eq!(page.items[0].release_year, Some(2008));
    }

    #[test]
    fn test_page_number_follows_request() {
        let raw: RawListing =
            serde_json::from_str(r#"{"page": 2, "total_pages": 5, "results": []}"#).unwrap();

        let page = raw.into_page(Category::Movie, 1);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn test_series_details_shape() {
        let raw: RawDetails = serde_json::from_str(
            r#"{
                "id": 1396,
                "name": "Breaking Bad",
                "number_of_seasons": 5,
                "seasons": [
                    {"season_number": 0, "episode_count": 9, "name": "Specials"},
                    {"season_number": 1, "episode_count": 7}
                ],
                "genres": [{"id": 18, "name": "Drama"}],
                "credits": {"cast": [{"name": "Bryan Cranston", "character": "Walter White"}]}
            }"#,
        )
        .unwrap();

        let CatalogueDetails::Series(details) = raw.into_details(Category::Series) else {
            panic!("expected series details");
        };
        assert_eq!(details.item.title, "Breaking Bad");
        assert_eq!(details.item.genre_ids, vec![18]);
        assert_eq!(details.number_of_seasons, Some(5));
        assert_eq!(details.seasons.len(), 2);
        assert_eq!(details.seasons[1].episode_count, 7);
        assert_eq!(details.cast[0].name, "Bryan Cranston");
    }

    #[test]
    fn test_movie_details_without_credits() {
        let raw: RawDetails = serde_json::from_str(
            r#"{"id": 603, "title": "The Matrix", "runtime": 136, "tagline": ""}"#,
        )
        .unwrap();

        let details = raw.into_details(Category::Movie);
        assert!(details.cast().is_empty());
        let CatalogueDetails::Movie(movie) = details else {
            panic!("expected movie details");
        };
        assert_eq!(movie.runtime_minutes, Some(136));
        assert_eq!(movie.tagline, None);
    }
}
