//! HTTP client for the TMDB-shaped metadata provider.

use async_trait::async_trait;
use marquee_core::config::ProviderConfig;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::{CatalogueProvider, check_id, check_page, check_search_text};
use crate::errors::CatalogueError;
use crate::types::{
    CatalogueDetails, CatalogueItem, Category, Genre, RawDetails, RawGenreList, RawListing,
    ResultPage, TrendingWindow,
};

/// Metadata provider backed by the provider's v3 HTTP API.
///
/// Every request carries the bearer token, a JSON content type and the
/// configured `language`. The client keeps no state between calls.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl TmdbClient {
    /// Create a client from provider configuration.
    ///
    /// # Errors
    ///
    /// - `CatalogueError::InvalidRequest` - If the token is not a valid header value
    /// - `CatalogueError::FetchFailed` - If the HTTP client cannot be constructed
    pub fn new(config: &ProviderConfig) -> Result<Self, CatalogueError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| CatalogueError::invalid("API token contains invalid characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CatalogueError::fetch_failed("initialize HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    /// Builds the full request URL. `language` always comes first.
    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?language={}",
            self.base_url,
            path,
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }

    /// Issue a GET and decode the body. `Ok(None)` means the provider
    /// answered 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
    ) -> Result<Option<T>, CatalogueError> {
        tracing::debug!(operation, url, "Requesting catalogue data");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(operation, "Catalogue request failed: {e}");
            CatalogueError::fetch_failed(operation, format!("HTTP request failed: {e}"))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(operation, "Provider returned 404");
            return Ok(None);
        }
        if !status.is_success() {
            tracing::warn!(operation, %status, "Provider returned an error status");
            return Err(CatalogueError::fetch_failed(
                operation,
                format!("provider responded with {status}"),
            ));
        }

        let body = response.json::<T>().await.map_err(|e| {
            CatalogueError::fetch_failed(operation, format!("JSON parsing failed: {e}"))
        })?;

        Ok(Some(body))
    }

    /// Like [`Self::get_json`], but a 404 is an ordinary failure.
    async fn get_required<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
    ) -> Result<T, CatalogueError> {
        self.get_json(operation, url).await?.ok_or_else(|| {
            CatalogueError::fetch_failed(operation, "provider responded with 404 Not Found")
        })
    }

    async fn get_listing(
        &self,
        operation: &str,
        url: &str,
        category: Category,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        let listing: RawListing = self.get_required(operation, url).await?;
        let page = listing.into_page(category, page);

        tracing::debug!(
            operation,
            page = page.page_number,
            total_pages = page.total_pages,
            items = page.items.len(),
            "Received catalogue page"
        );

        Ok(page)
    }
}

#[async_trait]
impl CatalogueProvider for TmdbClient {
    async fn fetch_popular(
        &self,
        category: Category,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_page(page)?;
        let operation = format!("fetch popular {}", category.plural());
        let url = self.endpoint_url(
            &format!("/{}/popular", category.path_segment()),
            &[("page", page.to_string())],
        );
        self.get_listing(&operation, &url, category, page).await
    }

    async fn fetch_trending(
        &self,
        category: Category,
        window: TrendingWindow,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_page(page)?;
        let operation = format!("fetch trending {}", category.plural());
        let url = self.endpoint_url(
            &format!("/trending/{}/{}", category.path_segment(), window.as_str()),
            &[("page", page.to_string())],
        );
        self.get_listing(&operation, &url, category, page).await
    }

    async fn fetch_details(
        &self,
        category: Category,
        id: u64,
    ) -> Result<CatalogueDetails, CatalogueError> {
        check_id(id)?;
        let operation = format!("fetch {} details", category.singular());
        let url = self.endpoint_url(
            &format!("/{}/{id}", category.path_segment()),
            &[("append_to_response", "credits,videos".to_string())],
        );

        let raw: RawDetails = self
            .get_json(&operation, &url)
            .await?
            .ok_or(CatalogueError::NotFound { category, id })?;

        Ok(raw.into_details(category))
    }

    async fn search(
        &self,
        category: Category,
        text: &str,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_search_text(text)?;
        check_page(page)?;
        let operation = format!("search {}", category.plural());
        let url = self.endpoint_url(
            &format!("/search/{}", category.path_segment()),
            &[
                ("query", urlencoding::encode(text.trim()).into_owned()),
                ("page", page.to_string()),
                ("include_adult", "false".to_string()),
            ],
        );
        self.get_listing(&operation, &url, category, page).await
    }

    async fn fetch_genres(&self, category: Category) -> Result<Vec<Genre>, CatalogueError> {
        let operation = format!("fetch {} genres", category.singular());
        let url = self.endpoint_url(&format!("/genre/{}/list", category.path_segment()), &[]);

        let list: RawGenreList = self.get_required(&operation, &url).await?;
        tracing::debug!(category = %category, count = list.genres.len(), "Received genres");
        Ok(list.genres)
    }

    async fn fetch_by_genre(
        &self,
        category: Category,
        genre_id: u64,
        page: u32,
    ) -> Result<ResultPage<CatalogueItem>, CatalogueError> {
        check_page(page)?;
        let operation = format!("fetch {} by genre", category.plural());

        let mut params = vec![
            ("sort_by", "popularity.desc".to_string()),
            ("include_adult", "false".to_string()),
        ];
        if category == Category::Movie {
            params.push(("include_video", "false".to_string()));
        }
        params.push(("page", page.to_string()));
        params.push(("with_genres", genre_id.to_string()));

        let url = self.endpoint_url(&format!("/discover/{}", category.path_segment()), &params);
        self.get_listing(&operation, &url, category, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        let config = marquee_core::MarqueeConfig::for_testing("http://127.0.0.1:1/3/");
        TmdbClient::new(&config.provider).unwrap()
    }

    #[test]
    fn test_endpoint_url_puts_language_first() {
        let url = client().endpoint_url("/movie/popular", &[("page", "2".to_string())]);
        assert_eq!(url, "http://127.0.0.1:1/3/movie/popular?language=en-US&page=2");
    }

    #[test]
    fn test_rejects_invalid_token() {
        let mut config = marquee_core::MarqueeConfig::for_testing("http://127.0.0.1:1");
        config.provider.api_token = "bad\ntoken".to_string();
        let err = TmdbClient::new(&config.provider).unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_local_validation_skips_network() {
        // Port 1 is never listening; these must fail before connecting.
        let client = client();

        let err = client.fetch_popular(Category::Movie, 0).await.unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidRequest { .. }));

        let err = client.search(Category::Series, "   ", 1).await.unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidRequest { .. }));

        let err = client.fetch_details(Category::Movie, 0).await.unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_names_operation() {
        let err = client().fetch_popular(Category::Series, 1).await.unwrap_err();
        match err {
            CatalogueError::FetchFailed { operation, .. } => {
                assert_eq!(operation, "fetch popular TV shows");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
