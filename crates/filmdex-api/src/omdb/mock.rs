//! In-memory `LocalOmdbApi` used by the aggregation tests.
#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};

use super::api::LocalOmdbApi;
use super::types::{
    ContentKind, EpisodeSummary, MovieDetail, SearchParams, SearchResponse, SeasonResponse,
};

/// Mock API serving pre-configured responses and counting calls.
#[derive(Debug, Default)]
pub(crate) struct MockOmdbApi {
    /// Search response; `None` simulates an exhausted transport failure.
    search: Option<SearchResponse>,
    /// Detail records by IMDb id; missing ids are unavailable.
    details: HashMap<String, MovieDetail>,
    /// Episode count per season.
    seasons: HashMap<u32, usize>,
    /// Seasons whose request fails after retries.
    failing_seasons: HashSet<u32>,
    /// Artificial latency of each detail lookup.
    detail_delay: Duration,
    /// Search parameters received, in call order.
    pub search_params: Mutex<Vec<SearchParams>>,
    /// Number of `get_detail` calls.
    pub detail_calls: AtomicU32,
    /// Number of `fetch_season` calls.
    pub season_calls: AtomicU32,
}

impl MockOmdbApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_search(mut self, response: SearchResponse) -> Self {
        self.search = Some(response);
        self
    }

    pub(crate) fn with_detail(mut self, detail: MovieDetail) -> Self {
        self.details.insert(detail.imdb_id.clone(), detail);
        self
    }

    pub(crate) fn with_season(mut self, season: u32, episodes: usize) -> Self {
        self.seasons.insert(season, episodes);
        self
    }

    pub(crate) fn with_failing_season(mut self, season: u32) -> Self {
        self.failing_seasons.insert(season);
        self
    }

    pub(crate) const fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = delay;
        self
    }

    pub(crate) fn detail_calls(&self) -> u32 {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn season_calls(&self) -> u32 {
        self.season_calls.load(Ordering::SeqCst)
    }
}

impl LocalOmdbApi for MockOmdbApi {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.search_params.lock().unwrap().push(params.clone());
        self.search
            .clone()
            .ok_or_else(|| anyhow!("OMDb request failed: connection refused"))
    }

    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieDetail> {
        self.details
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| anyhow!("OMDb request failed: {imdb_id}"))
    }

    async fn get_detail(&self, imdb_id: &str) -> Option<MovieDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if !self.detail_delay.is_zero() {
            tokio::time::sleep(self.detail_delay).await;
        }
        self.details
            .get(imdb_id)
            .filter(|detail| detail.success)
            .cloned()
    }

    async fn fetch_season(&self, _imdb_id: &str, season: u32) -> Result<SeasonResponse> {
        self.season_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_seasons.contains(&season) {
            return Err(anyhow!("OMDb API error (HTTP 503 Service Unavailable): season {season}"));
        }
        let episodes = self.seasons.get(&season).copied().unwrap_or(0);
        Ok(SeasonResponse {
            season: season.to_string(),
            episodes: vec![EpisodeSummary::default(); episodes],
            success: true,
            ..SeasonResponse::default()
        })
    }
}

/// Successful movie detail with the given genre.
pub(crate) fn movie(imdb_id: &str, genre: &str) -> MovieDetail {
    MovieDetail {
        title: format!("Title {imdb_id}"),
        year: String::from("1999"),
        genre: String::from(genre),
        imdb_id: String::from(imdb_id),
        kind: Some(ContentKind::Movie),
        poster: String::from("N/A"),
        success: true,
        ..MovieDetail::default()
    }
}

/// Successful series detail with the given `totalSeasons` value.
pub(crate) fn series(imdb_id: &str, total_seasons: Option<&str>) -> MovieDetail {
    MovieDetail {
        kind: Some(ContentKind::Series),
        total_seasons: total_seasons.map(String::from),
        ..movie(imdb_id, "Drama")
    }
}
