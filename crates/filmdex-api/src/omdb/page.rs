//! Search page loader: search plus optional genre filter, without errors.

use std::collections::HashMap;

use tracing::instrument;

use super::api::LocalOmdbApi;
use super::genre::filter_by_genre;
use super::types::{ContentKind, MovieDetail, SearchItem, SearchParams};

/// Query used when the caller gives none.
pub const DEFAULT_QUERY: &str = "movie";

/// Message shown when the service reports no match without saying why.
const NO_RESULTS_MESSAGE: &str = "No results found";

/// Message shown when the search could not be performed at all.
const SEARCH_FAILED_MESSAGE: &str = "Failed to search movies. Please try again.";

/// What the caller asked for. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Free-text query; blank falls back to [`DEFAULT_QUERY`].
    pub query: Option<String>,
    /// Content kind filter.
    pub kind: Option<ContentKind>,
    /// Release year filter.
    pub year: Option<u32>,
    /// 1-based page number (default: 1).
    pub page: Option<u32>,
    /// Genre to keep; blank means no filtering.
    pub genre: Option<String>,
}

impl PageRequest {
    /// Effective query string.
    #[must_use]
    pub fn query(&self) -> &str {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUERY)
    }

    /// Effective page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    /// Effective genre filter.
    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.genre
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    /// Search parameters sent to the API.
    #[must_use]
    pub fn to_params(&self) -> SearchParams {
        let mut params = SearchParams::new(self.query()).page(self.page());
        if let Some(kind) = self.kind {
            params = params.kind(kind);
        }
        if let Some(year) = self.year {
            params = params.year(year);
        }
        params
    }
}

/// One page of results, ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Items to display.
    pub items: Vec<SearchItem>,
    /// Detail records fetched while filtering, by IMDb id.
    pub details: HashMap<String, MovieDetail>,
    /// Total number of matches reported by the service.
    pub total_results: u32,
    /// Page shown.
    pub current_page: u32,
    /// Message to show instead of results.
    pub error: Option<String>,
}

impl SearchPage {
    /// Empty page carrying an error message.
    fn failed(current_page: u32, message: impl Into<String>) -> Self {
        Self {
            current_page,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Runs a search and, when a genre is requested, narrows the results to
/// the items whose detail matches it.
///
/// Never fails: a "no match" answer and transport failures both come back
/// as an empty page with `error` set.
#[instrument(skip_all, fields(query = %request.query(), page = request.page()))]
pub async fn load_search_page(
    api: &(impl LocalOmdbApi + Sync),
    request: &PageRequest,
) -> SearchPage {
    let current_page = request.page();

    let response = match api.search(&request.to_params()).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Search error: {err:#}");
            return SearchPage::failed(1, SEARCH_FAILED_MESSAGE);
        }
    };

    if !response.success {
        let message = response
            .error
            .unwrap_or_else(|| String::from(NO_RESULTS_MESSAGE));
        return SearchPage::failed(current_page, message);
    }

    let total_results = response.total_count();
    let mut items = response.items;
    let mut details = HashMap::new();

    if let Some(genre) = request.genre()
        && !items.is_empty()
    {
        let matches = filter_by_genre(api, &items, genre).await;
        items = matches
            .iter()
            .filter_map(|m| m.detail.to_search_item())
            .collect();
        details = matches
            .into_iter()
            .map(|m| (m.imdb_id, m.detail))
            .collect();
    }

    SearchPage {
        items,
        details,
        total_results,
        current_page,
        error: None,
    }
}
