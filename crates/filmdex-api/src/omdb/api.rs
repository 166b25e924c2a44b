//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{MovieDetail, SearchParams, SearchResponse, SeasonResponse};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles.
    ///
    /// A "no match" answer is returned as a response with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails (HTTP status, timeout,
    /// network or JSON decoding).
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse>;

    /// Fetches the detail record of a title, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails.
    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieDetail>;

    /// Returns the detail record of a title, served from the cache when
    /// possible. `None` means the detail is unavailable.
    async fn get_detail(&self, imdb_id: &str) -> Option<MovieDetail>;

    /// Fetches the episode listing of one season.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails.
    async fn fetch_season(&self, imdb_id: &str, season: u32) -> Result<SeasonResponse>;
}
