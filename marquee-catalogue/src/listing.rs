//! Paginated, filterable listing view for one category.
//!
//! [`ListingView`] turns user input (search text, genre filter, load-more)
//! into [`ListingRequest`]s and folds the responses back into one running
//! result list. Every request carries a [`RequestToken`]; a response is only
//! applied if its token is the latest one issued, so a slow response for an
//! old query can never overwrite the results of a newer one.

use crate::accumulator::ResultAccumulator;
use crate::errors::CatalogueError;
use crate::providers::CatalogueProvider;
use crate::query::{ActiveQuery, GenreFilter, QueryState};
use crate::sequence::{RequestSequence, RequestToken, ResponseOutcome};
use crate::types::{CatalogueItem, Category, Genre, ResultPage};

/// One request issued by a [`ListingView`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    token: RequestToken,
    category: Category,
    query: ActiveQuery,
    page: u32,
}

impl ListingRequest {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn query(&self) -> &ActiveQuery {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Performs the request. Does not touch the issuing view.
    ///
    /// # Errors
    /// - Any error from the underlying provider operation
    pub async fn fetch(
        &self,
        provider: &dyn CatalogueProvider,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        self.query.fetch(provider, self.category, self.page).await
    }
}

/// State of one listing screen.
#[derive(Debug)]
pub struct ListingView {
    category: Category,
    query: QueryState,
    genres: Option<Vec<Genre>>,
    results: ResultAccumulator<CatalogueItem>,
    sequence: RequestSequence,
    in_flight_page: u32,
    // Set while `results` still belong to a query that has been replaced
    awaiting_first_page: bool,
    error: Option<String>,
}

impl ListingView {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            query: QueryState::new(),
            genres: None,
            results: ResultAccumulator::new(),
            sequence: RequestSequence::default(),
            in_flight_page: 0,
            awaiting_first_page: false,
            error: None,
        }
    }

    /// Issues the initial request for the current inputs.
    pub fn mount(&mut self) -> ListingRequest {
        self.issue()
    }

    /// Replaces the search text and restarts from page 1.
    pub fn submit_search(&mut self, text: &str) -> ListingRequest {
        self.query.set_search_text(text);
        self.issue()
    }

    /// Replaces the genre filter and restarts from page 1.
    pub fn select_genre(&mut self, genre: GenreFilter) -> ListingRequest {
        self.query.set_genre(genre);
        self.issue()
    }

    /// Requests the next page.
    ///
    /// Returns `None` without changing any state when there are no more
    /// pages, a request is still outstanding, or page 1 of the current
    /// query has not been loaded yet.
    pub fn load_more(&mut self) -> Option<ListingRequest> {
        if self.sequence.is_outstanding() {
            tracing::debug!(category = %self.category, "Load more ignored while loading");
            return None;
        }
        if !self.has_more_pages() {
            return None;
        }
        if !self.query.advance_page(self.results.total_pages()) {
            return None;
        }
        Some(self.issue())
    }

    /// Stores the genre list. Re-issues page 1 only when the effective
    /// query changes, i.e. a named filter that previously fell back to the
    /// popular listing now resolves.
    pub fn genres_loaded(&mut self, genres: Vec<Genre>) -> Option<ListingRequest> {
        let before = self.active_query();
        self.genres = Some(genres);
        let after = self.active_query();

        if before == after {
            return None;
        }
        self.query.reset_page();
        Some(self.issue())
    }

    /// Hands a response back to the view.
    ///
    /// Responses for superseded requests are dropped. Errors leave the
    /// loaded items in place and surface a message instead.
    pub fn apply(
        &mut self,
        token: RequestToken,
        result: Result<ResultPage<CatalogueItem>, CatalogueError>,
    ) -> ResponseOutcome {
        if !self.sequence.resolve(token) {
            tracing::debug!(
                category = %self.category,
                %token,
                "Discarding stale listing response"
            );
            return ResponseOutcome::Stale;
        }

        match result {
            Ok(page) => {
                tracing::debug!(
                    category = %self.category,
                    page = page.page_number,
                    items = page.items.len(),
                    "Applying listing page"
                );
                self.results.absorb(page);
                if self.in_flight_page <= 1 {
                    self.awaiting_first_page = false;
                }
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(category = %self.category, "Listing request failed: {e}");
                if self.in_flight_page > 1 {
                    // Keep the cursor on the last page actually loaded
                    self.query.set_page(self.results.current_page());
                }
                self.error = Some(e.user_message());
            }
        }
        ResponseOutcome::Applied
    }

    /// Fetches `request` and applies the response.
    pub async fn run(
        &mut self,
        provider: &dyn CatalogueProvider,
        request: ListingRequest,
    ) -> ResponseOutcome {
        let result = request.fetch(provider).await;
        self.apply(request.token, result)
    }

    /// Fetches the genre list for this category.
    ///
    /// Failure is logged and leaves the genre cache empty; named filters
    /// keep falling back to the popular listing.
    pub async fn load_genres(
        &mut self,
        provider: &dyn CatalogueProvider,
    ) -> Option<ListingRequest> {
        match provider.fetch_genres(self.category).await {
            Ok(genres) => self.genres_loaded(genres),
            Err(e) => {
                tracing::warn!(category = %self.category, "Could not load genres: {e}");
                None
            }
        }
    }

    /// The request mode the current inputs resolve to.
    pub fn active_query(&self) -> ActiveQuery {
        ActiveQuery::resolve(&self.query, self.genres.as_deref())
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn genres(&self) -> Option<&[Genre]> {
        self.genres.as_deref()
    }

    pub fn items(&self) -> &[CatalogueItem] {
        self.results.items()
    }

    pub fn is_loading(&self) -> bool {
        self.sequence.is_outstanding()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// False until page 1 of the current query has landed.
    pub fn has_more_pages(&self) -> bool {
        !self.awaiting_first_page && self.results.has_more_pages()
    }

    /// True once a response has landed and it had nothing in it.
    pub fn is_empty(&self) -> bool {
        !self.is_loading()
            && self.error.is_none()
            && self.results.current_page() > 0
            && self.results.is_empty()
    }

    /// Heading for the listing.
    pub fn title(&self) -> String {
        if self.query.search_text().is_empty() {
            match self.category {
                Category::Movie => "Movies".to_string(),
                Category::Series => "TV Shows".to_string(),
            }
        } else {
            format!("Search Results for \"{}\"", self.query.search_text())
        }
    }

    fn issue(&mut self) -> ListingRequest {
        let token = self.sequence.issue();
        let query = self.active_query();
        let page = self.query.page();
        self.in_flight_page = page;
        if page <= 1 {
            self.awaiting_first_page = true;
        }
        self.error = None;

        tracing::debug!(
            category = %self.category,
            %token,
            ?query,
            page,
            "Issuing listing request"
        );

        ListingRequest {
            token,
            category: self.category,
            query,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use futures::stream::FuturesUnordered;

    use super::*;
    use crate::providers::{MockProvider, ProviderCall};

    #[tokio::test]
    async fn test_mount_then_load_more_appends() {
        let provider = MockProvider::new().with_pages(10, 5);
        let mut view = ListingView::new(Category::Movie);

        let request = view.mount();
        assert!(view.is_loading());
        assert_eq!(view.run(&provider, request).await, ResponseOutcome::Applied);
        assert_eq!(view.items().len(), 10);
        assert!(view.has_more_pages());

        let first_page: Vec<u64> = view.items().iter().map(|item| item.id).collect();

        let request = view.load_more().expect("more pages available");
        assert_eq!(request.page(), 2);
        view.run(&provider, request).await;

        assert_eq!(view.items().len(), 20);
        let ids: Vec<u64> = view.items().iter().map(|item| item.id).collect();
        assert_eq!(&ids[..10], first_page.as_slice());
        assert!(ids[10..].iter().all(|id| *id >= 2000));

        assert_eq!(
            provider.calls(),
            vec![
                ProviderCall::Popular {
                    category: Category::Movie,
                    page: 1,
                },
                ProviderCall::Popular {
                    category: Category::Movie,
                    page: 2,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_load_more_on_last_page_is_noop() {
        let provider = MockProvider::new().with_pages(3, 1);
        let mut view = ListingView::new(Category::Series);
        let request = view.mount();
        view.run(&provider, request).await;

        assert!(!view.has_more_pages());
        assert!(view.load_more().is_none());
        assert_eq!(view.query().page(), 1);
        assert_eq!(view.items().len(), 3);
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_load_more_ignored_while_loading() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Movie);
        let request = view.mount();
        view.run(&provider, request).await;

        let pending = view.load_more().expect("page 2");
        assert!(view.load_more().is_none());
        assert_eq!(view.query().page(), 2);

        view.run(&provider, pending).await;
        assert_eq!(view.load_more().map(|r| r.page()), Some(3));
    }

    #[test]
    fn test_search_takes_precedence_over_genre() {
        let mut view = ListingView::new(Category::Movie);
        view.genres_loaded(vec![Genre {
            id: 28,
            name: "Action".to_string(),
        }]);
        view.select_genre(GenreFilter::parse("Action"));

        let request = view.submit_search("dune");
        assert_eq!(
            request.query(),
            &ActiveQuery::Search {
                text: "dune".to_string(),
            }
        );
        assert_eq!(request.page(), 1);
    }

    #[tokio::test]
    async fn test_input_change_resets_page_and_replaces_items() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Movie);
        let request = view.mount();
        view.run(&provider, request).await;
        let request = view.load_more().unwrap();
        view.run(&provider, request).await;
        assert_eq!(view.items().len(), 20);

        let request = view.submit_search("batman");
        assert_eq!(view.query().page(), 1);
        // Old items stay visible until the replacement lands
        assert_eq!(view.items().len(), 20);

        view.run(&provider, request).await;
        assert_eq!(view.items().len(), 10);
        assert!(view.items()[0].title.starts_with("search:batman"));
        assert_eq!(view.title(), "Search Results for \"batman\"");
    }

    #[tokio::test]
    async fn test_genre_before_genres_loaded_falls_back() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Movie);

        let request = view.select_genre(GenreFilter::parse("Horror"));
        assert_eq!(request.query(), &ActiveQuery::Popular);
        view.run(&provider, request).await;
        assert!(view.error().is_none());
        assert_eq!(view.items().len(), 10);

        let request = view.load_genres(&provider).await.expect("filter now resolves");
        assert_eq!(
            request.query(),
            &ActiveQuery::ByGenre {
                genre: Genre {
                    id: 27,
                    name: "Horror".to_string(),
                },
            }
        );
        view.run(&provider, request).await;
        assert!(view.items()[0].title.starts_with("genre:27"));
    }

    #[tokio::test]
    async fn test_genres_loaded_without_filter_does_not_refetch() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Series);
        let request = view.mount();
        view.run(&provider, request).await;

        assert!(view.load_genres(&provider).await.is_none());
        assert_eq!(view.genres().map(<[Genre]>::len), Some(3));
    }

    #[tokio::test]
    async fn test_genre_load_failure_keeps_fallback() {
        let provider = MockProvider::new();
        provider.set_failing(true);
        let mut view = ListingView::new(Category::Movie);
        view.select_genre(GenreFilter::parse("Action"));

        assert!(view.load_genres(&provider).await.is_none());
        assert!(view.genres().is_none());
        assert_eq!(view.active_query(), ActiveQuery::Popular);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Movie);

        let slow = view.submit_search("alpha");
        let fast = view.submit_search("beta");

        let fast_page = provider_page(&provider, &fast);
        let slow_page = provider_page(&provider, &slow);

        assert_eq!(view.apply(fast.token(), Ok(fast_page)), ResponseOutcome::Applied);
        assert_eq!(view.apply(slow.token(), Ok(slow_page)), ResponseOutcome::Stale);
        assert!(view.items()[0].title.starts_with("search:beta"));
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_slow_response_resolving_last_is_discarded() {
        let provider = MockProvider::new().with_search_delay("slow", Duration::from_millis(50));
        let mut view = ListingView::new(Category::Movie);

        let slow = view.submit_search("slow");
        let fast = view.submit_search("fast");

        let mut in_flight = FuturesUnordered::new();
        for request in [slow, fast] {
            let provider = &provider;
            in_flight.push(async move {
                let result = request.fetch(provider).await;
                (request, result)
            });
        }

        let mut outcomes = Vec::new();
        while let Some((request, result)) = in_flight.next().await {
            outcomes.push((request.query().clone(), view.apply(request.token(), result)));
        }

        assert_eq!(
            outcomes,
            vec![
                (
                    ActiveQuery::Search {
                        text: "fast".to_string(),
                    },
                    ResponseOutcome::Applied,
                ),
                (
                    ActiveQuery::Search {
                        text: "slow".to_string(),
                    },
                    ResponseOutcome::Stale,
                ),
            ]
        );
        assert!(view.items()[0].title.starts_with("search:fast"));
    }

    #[tokio::test]
    async fn test_error_keeps_items_and_cursor() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Movie);
        let request = view.mount();
        view.run(&provider, request).await;

        provider.set_failing(true);
        let request = view.load_more().unwrap();
        view.run(&provider, request).await;

        assert_eq!(view.items().len(), 10);
        assert!(!view.is_loading());
        assert_eq!(
            view.error(),
            Some("Failed to fetch popular movies. Please try again later.")
        );
        assert_eq!(view.query().page(), 1);

        // Retrying asks for page 2 again and clears the error
        provider.set_failing(false);
        let request = view.load_more().unwrap();
        assert_eq!(request.page(), 2);
        assert!(view.error().is_none());
        view.run(&provider, request).await;
        assert_eq!(view.items().len(), 20);
    }

    #[tokio::test]
    async fn test_load_more_after_failed_new_query_is_noop() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Movie);
        let request = view.mount();
        view.run(&provider, request).await;
        let request = view.load_more().unwrap();
        view.run(&provider, request).await;
        assert_eq!(view.items().len(), 20);

        provider.set_failing(true);
        let request = view.submit_search("batman");
        view.run(&provider, request).await;
        assert!(view.error().is_some());
        provider.set_failing(false);

        // Popular pages are still shown but belong to the old query
        assert!(!view.has_more_pages());
        assert!(view.load_more().is_none());
        assert_eq!(view.query().page(), 1);
        assert_eq!(view.items().len(), 20);
        assert!(view.items()[0].title.starts_with("popular"));

        provider.clear_calls();
        let request = view.submit_search("batman");
        view.run(&provider, request).await;
        assert!(view.has_more_pages());
        let request = view.load_more().expect("batman page 2");
        view.run(&provider, request).await;

        assert_eq!(view.items().len(), 20);
        assert!(view.items().iter().all(|item| item.title.starts_with("search:batman")));
        assert_eq!(
            provider.calls(),
            vec![
                ProviderCall::Search {
                    category: Category::Movie,
                    text: "batman".to_string(),
                    page: 1,
                },
                ProviderCall::Search {
                    category: Category::Movie,
                    text: "batman".to_string(),
                    page: 2,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_no_more_pages_while_replacement_pending() {
        let provider = MockProvider::new();
        let mut view = ListingView::new(Category::Movie);
        let request = view.mount();
        view.run(&provider, request).await;
        assert!(view.has_more_pages());

        let pending = view.select_genre(GenreFilter::parse("Comedy"));
        assert!(!view.has_more_pages());
        view.run(&provider, pending).await;
        assert!(view.has_more_pages());
    }

    #[tokio::test]
    async fn test_empty_result_state() {
        let provider = MockProvider::new().with_pages(0, 0);
        let mut view = ListingView::new(Category::Series);
        assert!(!view.is_empty());

        let request = view.mount();
        view.run(&provider, request).await;
        assert!(view.is_empty());
        assert!(!view.has_more_pages());
    }

    fn provider_page(
        provider: &MockProvider,
        request: &ListingRequest,
    ) -> ResultPage<CatalogueItem> {
        tokio_test::block_on(request.fetch(provider)).unwrap()
    }
}
