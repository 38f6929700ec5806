//! Marquee Catalogue - Browsing, search and pagination
//!
//! Talks to the metadata provider and coordinates what the user sees:
//! which query a listing runs, how result pages pile up under "load more",
//! and which of several overlapping responses is allowed to win.

pub mod accumulator;
pub mod errors;
pub mod home;
pub mod listing;
pub mod player;
pub mod providers;
pub mod query;
pub mod search;
pub mod sequence;
pub mod types;

// Re-export main types
pub use accumulator::ResultAccumulator;
pub use errors::CatalogueError;
pub use home::HomeSections;
pub use listing::{ListingRequest, ListingView};
pub use player::{EpisodeSelector, PlaybackTarget, embed_url};
pub use providers::{CatalogueProvider, TmdbClient};
pub use query::{ActiveQuery, GenreFilter, QueryState};
pub use search::{SearchRequest, SearchView};
pub use sequence::{RequestToken, ResponseOutcome};
pub use types::{
    CatalogueDetails, CatalogueItem, Category, Genre, MovieDetails, ResultPage, SeriesDetails,
    TrendingWindow,
};

/// Convenience type alias for Results with CatalogueError.
pub type Result<T> = std::result::Result<T, CatalogueError>;
