//! Playback hand-off and image links.
//!
//! Marquee never touches video. Playback means building a URL for the
//! external embeddable player; what happens after that is the player's
//! business. There is a single resolution strategy for all titles.

use marquee_core::config::PlayerConfig;
use url::Url;

use crate::errors::CatalogueError;
use crate::types::{Category, Season, SeriesDetails};

/// What to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackTarget {
    Movie { id: u64 },
    Episode {
        series_id: u64,
        season: u32,
        episode: u32,
    },
}

impl PlaybackTarget {
    pub fn category(&self) -> Category {
        match self {
            PlaybackTarget::Movie { .. } => Category::Movie,
            PlaybackTarget::Episode { .. } => Category::Series,
        }
    }
}

/// Builds the player URL for `target`.
///
/// # Errors
/// - `CatalogueError::InvalidRequest` - If the configured player URL does not parse
pub fn embed_url(config: &PlayerConfig, target: PlaybackTarget) -> Result<Url, CatalogueError> {
    let endpoint = match target {
        PlaybackTarget::Movie { .. } => config.movie_endpoint,
        PlaybackTarget::Episode { .. } => config.series_endpoint,
    };
    let raw = format!("{}{}", config.base_url.trim_end_matches('/'), endpoint);
    let mut url = Url::parse(&raw)
        .map_err(|e| CatalogueError::invalid(format!("player URL '{raw}' is invalid: {e}")))?;

    {
        let mut query = url.query_pairs_mut();
        match target {
            PlaybackTarget::Movie { id } => {
                query.append_pair("tmdb", &id.to_string());
            }
            PlaybackTarget::Episode { series_id, season, episode } => {
                query
                    .append_pair("tmdb", &series_id.to_string())
                    .append_pair("season", &season.to_string())
                    .append_pair("episode", &episode.to_string());
            }
        }
    }

    tracing::debug!(%url, "Built embed URL");
    Ok(url)
}

/// Provider image renditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Poster,
    Backdrop,
}

impl ImageSize {
    fn path_segment(self) -> &'static str {
        match self {
            ImageSize::Poster => "w500",
            ImageSize::Backdrop => "original",
        }
    }
}

/// Full URL for a provider image path such as `/abc.jpg`.
pub fn image_url(image_base_url: &str, path: &str, size: ImageSize) -> String {
    format!(
        "{}/{}{}",
        image_base_url.trim_end_matches('/'),
        size.path_segment(),
        path
    )
}

/// Season and episode choice for watching a series.
#[derive(Debug, Clone)]
pub struct EpisodeSelector {
    series_id: u64,
    seasons: Vec<Season>,
    season: u32,
    episode: u32,
}

impl EpisodeSelector {
    /// Starts at season 1 episode 1, or the first listed season when the
    /// series has no season 1.
    pub fn new(details: &SeriesDetails) -> Self {
        let season = details
            .seasons
            .iter()
            .find(|season| season.season_number == 1)
            .or_else(|| details.seasons.first())
            .map_or(1, |season| season.season_number);

        Self {
            series_id: details.item.id,
            seasons: details.seasons.clone(),
            season,
            episode: 1,
        }
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Episodes in the selected season; 0 when the provider did not say.
    pub fn episode_count(&self) -> u32 {
        self.seasons
            .iter()
            .find(|season| season.season_number == self.season)
            .map_or(0, |season| season.episode_count)
    }

    /// Switches season and rewinds to episode 1.
    ///
    /// # Errors
    /// - `CatalogueError::InvalidRequest` - If the series has no such season
    pub fn select_season(&mut self, season_number: u32) -> Result<(), CatalogueError> {
        if !self.seasons.iter().any(|season| season.season_number == season_number) {
            return Err(CatalogueError::invalid(format!(
                "season {season_number} does not exist"
            )));
        }
        self.season = season_number;
        self.episode = 1;
        Ok(())
    }

    /// Picks an episode within the selected season.
    ///
    /// # Errors
    /// - `CatalogueError::InvalidRequest` - If the episode is outside the season
    pub fn select_episode(&mut self, episode: u32) -> Result<(), CatalogueError> {
        let count = self.episode_count();
        // Unknown counts only allow the first episode
        if episode == 0 || episode > count.max(1) {
            return Err(CatalogueError::invalid(format!(
                "season {} has no episode {episode}",
                self.season
            )));
        }
        self.episode = episode;
        Ok(())
    }

    pub fn target(&self) -> PlaybackTarget {
        PlaybackTarget::Episode {
            series_id: self.series_id,
            season: self.season,
            episode: self.episode,
        }
    }
}
