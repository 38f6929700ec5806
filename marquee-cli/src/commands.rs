//! CLI command implementations

use anyhow::{Context, anyhow};
use clap::{Args, Subcommand, ValueEnum};
use marquee_catalogue::player::{self, ImageSize};
use marquee_catalogue::{
    CatalogueDetails, CatalogueError, CatalogueItem, CatalogueProvider, Category, EpisodeSelector,
    GenreFilter, HomeSections, ListingView, PlaybackTarget, SearchView, TmdbClient,
    TrendingWindow,
};
use marquee_core::{FilePreferenceStore, MarqueeConfig, Theme, ThemeState};

/// Content category as typed on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Movie,
    Tv,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Movie => Category::Movie,
            CategoryArg::Tv => Category::Series,
        }
    }
}

/// Trending window as typed on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Day,
    Week,
}

impl From<WindowArg> for TrendingWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Day => TrendingWindow::Day,
            WindowArg::Week => TrendingWindow::Week,
        }
    }
}

/// Inputs of a listing screen
#[derive(Debug, Args)]
pub struct ListingArgs {
    /// Search text (takes precedence over --genre)
    #[arg(short, long)]
    search: Option<String>,

    /// Genre name to filter by
    #[arg(short, long, default_value = "All")]
    genre: String,

    /// Number of pages to load
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Trending and popular highlights
    Home,
    /// Browse movies
    Movies(ListingArgs),
    /// Browse TV shows
    Tv(ListingArgs),
    /// Show details for one title
    Details {
        category: CategoryArg,
        id: u64,
    },
    /// Print the player link for a title
    Watch {
        category: CategoryArg,
        id: u64,
        /// Season number (TV only)
        #[arg(long)]
        season: Option<u32>,
        /// Episode number (TV only)
        #[arg(long)]
        episode: Option<u32>,
    },
    /// Search movies and TV shows together
    Search {
        query: String,
    },
    /// List genres for a category
    Genres {
        category: CategoryArg,
    },
    /// Trending titles
    Trending {
        category: CategoryArg,
        #[arg(short, long, value_enum, default_value_t = WindowArg::Day)]
        window: WindowArg,
    },
    /// Show or toggle the light/dark theme
    Theme {
        /// Flip the stored theme
        #[arg(long)]
        toggle: bool,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns a displayable error when configuration is incomplete or a
/// catalogue request fails
pub async fn handle_command(command: Commands, config: &MarqueeConfig) -> anyhow::Result<()> {
    let mut theme = ThemeState::initialize(
        FilePreferenceStore::new(&config.storage.preferences_path),
        Theme::system_hint(),
    );

    if let Commands::Theme { toggle } = command {
        return show_theme(&mut theme, toggle);
    }

    config.validate().map_err(|e| anyhow!(e.user_message()))?;
    let client = TmdbClient::new(&config.provider).context("failed to set up catalogue client")?;
    let out = Printer::new(theme.current(), &config.provider.image_base_url);

    match command {
        Commands::Home => show_home(&client, &out).await,
        Commands::Movies(args) => browse(&client, &out, Category::Movie, args).await,
        Commands::Tv(args) => browse(&client, &out, Category::Series, args).await,
        Commands::Details { category, id } => {
            show_details(&client, &out, category.into(), id).await
        }
        Commands::Watch {
            category,
            id,
            season,
            episode,
        } => {
            watch(&client, config, category.into(), id, season, episode).await
        }
        Commands::Search { query } => search(&client, &out, &query).await,
        Commands::Genres { category } => list_genres(&client, &out, category.into()).await,
        Commands::Trending { category, window } => {
            let category = category.into();
            let page = client
                .fetch_trending(category, window.into(), 1)
                .await
                .map_err(user_error)?;
            out.heading(&format!("Trending {}", category.plural()));
            out.items(&page.items);
            Ok(())
        }
        Commands::Theme { .. } => unreachable!("handled above"),
    }
}

fn show_theme(theme: &mut ThemeState<FilePreferenceStore>, toggle: bool) -> anyhow::Result<()> {
    if toggle {
        theme.toggle().map_err(|e| anyhow!(e.user_message()))?;
    }
    println!("Theme: {}", theme.current());
    println!("  Stored in {}", theme.store().path().display());
    Ok(())
}

async fn show_home(client: &TmdbClient, out: &Printer) -> anyhow::Result<()> {
    let home = HomeSections::load(client).await.map_err(user_error)?;

    out.heading("Trending Today");
    out.items(&home.trending_movies);
    out.heading("Popular Movies");
    out.items(&home.popular_movies);
    out.heading("Popular TV Shows");
    out.items(&home.popular_series);
    Ok(())
}

async fn browse(
    client: &TmdbClient,
    out: &Printer,
    category: Category,
    args: ListingArgs,
) -> anyhow::Result<()> {
    let mut view = ListingView::new(category);

    let request = match args.search.as_deref() {
        Some(text) if !text.trim().is_empty() => view.submit_search(text),
        _ => match GenreFilter::parse(&args.genre) {
            GenreFilter::All => view.mount(),
            filter => view.select_genre(filter),
        },
    };

    // Genres load alongside the first page, as they would in a browser
    let (listing, genres) = tokio::join!(request.fetch(client), client.fetch_genres(category));
    view.apply(request.token(), listing);
    match genres {
        Ok(genres) => {
            if let Some(request) = view.genres_loaded(genres) {
                view.run(client, request).await;
            }
        }
        Err(e) => tracing::warn!("Could not load genres: {e}"),
    }

    for _ in 1..args.pages {
        let Some(request) = view.load_more() else {
            break;
        };
        view.run(client, request).await;
        if view.error().is_some() {
            break;
        }
    }

    out.heading(&view.title());
    if let GenreFilter::Named(name) = view.query().genre() {
        println!("  Genre filter: {name}");
    }
    out.items(view.items());

    if view.is_empty() {
        println!("  No {} found", category.plural());
    }
    if let Some(error) = view.error() {
        eprintln!("{error}");
    }
    if view.has_more_pages() {
        println!("  More results available (use --pages to load more)");
    }
    Ok(())
}

async fn show_details(
    client: &TmdbClient,
    out: &Printer,
    category: Category,
    id: u64,
) -> anyhow::Result<()> {
    let details = client.fetch_details(category, id).await.map_err(user_error)?;
    let item = details.item();

    out.heading(&item.title);
    out.item_line(item);
    if let Some(poster) = item.poster_path.as_deref() {
        println!("  Poster: {}", out.image(poster, ImageSize::Poster));
    }
    if !details.genres().is_empty() {
        let names: Vec<&str> = details.genres().iter().map(|genre| genre.name.as_str()).collect();
        println!("  Genres: {}", names.join(", "));
    }

    match &details {
        CatalogueDetails::Movie(movie) => {
            if let Some(tagline) = &movie.tagline {
                println!("  \"{tagline}\"");
            }
            if let Some(minutes) = movie.runtime_minutes {
                println!("  Runtime: {}h {}m", minutes / 60, minutes % 60);
            }
        }
        CatalogueDetails::Series(series) => {
            if let Some(seasons) = series.number_of_seasons {
                println!(
                    "  Seasons: {seasons}, episodes: {}",
                    series
                        .number_of_episodes
                        .map_or_else(|| "unknown".to_string(), |count| count.to_string())
                );
            }
        }
    }

    if let Some(overview) = &item.overview {
        println!();
        println!("  {overview}");
    }

    let cast: Vec<String> = details
        .cast()
        .iter()
        .take(5)
        .map(|member| match &member.character {
            Some(character) => format!("{} as {character}", member.name),
            None => member.name.clone(),
        })
        .collect();
    if !cast.is_empty() {
        println!();
        println!("  Cast: {}", cast.join(", "));
    }
    Ok(())
}

async fn watch(
    client: &TmdbClient,
    config: &MarqueeConfig,
    category: Category,
    id: u64,
    season: Option<u32>,
    episode: Option<u32>,
) -> anyhow::Result<()> {
    let target = match category {
        Category::Movie => PlaybackTarget::Movie { id },
        Category::Series => {
            let CatalogueDetails::Series(details) =
                client.fetch_details(category, id).await.map_err(user_error)?
            else {
                return Err(anyhow!("Provider returned a movie for a TV id"));
            };

            let mut selector = EpisodeSelector::new(&details);
            if let Some(season) = season {
                selector.select_season(season).map_err(user_error)?;
            }
            if let Some(episode) = episode {
                selector.select_episode(episode).map_err(user_error)?;
            }

            println!(
                "{}: season {}, episode {} of {}",
                details.item.title,
                selector.season(),
                selector.episode(),
                selector.episode_count()
            );
            selector.target()
        }
    };

    let url = player::embed_url(&config.player, target).map_err(user_error)?;
    println!("{url}");
    Ok(())
}

async fn search(client: &TmdbClient, out: &Printer, query: &str) -> anyhow::Result<()> {
    let mut view = SearchView::new();
    let Some(request) = view.submit(query) else {
        println!("Enter a search term to find movies and TV shows");
        return Ok(());
    };
    view.run(client, request).await;

    if let Some(error) = view.error() {
        return Err(anyhow!(error.to_string()));
    }

    let total = view.total_results();
    out.heading(&format!("Search Results for \"{query}\""));
    println!("Found {total} result{}", if total == 1 { "" } else { "s" });

    if !view.movies().is_empty() {
        out.heading(&format!("Movies ({})", view.movies().len()));
        out.items(view.movies());
    }
    if !view.series().is_empty() {
        out.heading(&format!("TV Shows ({})", view.series().len()));
        out.items(view.series());
    }
    Ok(())
}

async fn list_genres(client: &TmdbClient, out: &Printer, category: Category) -> anyhow::Result<()> {
    let genres = client.fetch_genres(category).await.map_err(user_error)?;
    out.heading(&format!("Genres for {}", category.plural()));
    for genre in genres {
        println!("  {:>6}  {}", genre.id, genre.name);
    }
    Ok(())
}

fn user_error(e: CatalogueError) -> anyhow::Error {
    tracing::debug!("{e}");
    anyhow!(e.user_message())
}

/// Theme-aware terminal output
struct Printer {
    heading_style: &'static str,
    image_base_url: String,
}

impl Printer {
    fn new(theme: Theme, image_base_url: &str) -> Self {
        let heading_style = match theme {
            Theme::Dark => "\x1b[1;36m",
            Theme::Light => "\x1b[1;34m",
        };
        Self {
            heading_style,
            image_base_url: image_base_url.to_string(),
        }
    }

    fn heading(&self, text: &str) {
        println!();
        println!("{}{text}\x1b[0m", self.heading_style);
    }

    fn items(&self, items: &[CatalogueItem]) {
        for item in items {
            self.item_line(item);
        }
    }

    fn item_line(&self, item: &CatalogueItem) {
        let year = item
            .release_year
            .map_or_else(String::new, |year| format!(" ({year})"));
        let rating = item
            .rating
            .map_or_else(String::new, |rating| format!("  ★ {rating:.1}"));
        println!("  {}{year}{rating}  [{}]", item.title, item.id);
    }

    fn image(&self, path: &str, size: ImageSize) -> String {
        player::image_url(&self.image_base_url, path, size)
    }
}
