//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint and builds the search,
//! episode-count and genre-filter operations on top of them.

mod api;
mod client;
mod episodes;
mod genre;
#[cfg(test)]
mod mock;
mod page;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
pub use episodes::total_episodes;
pub use genre::{GenreMatch, filter_by_genre};
pub use page::{DEFAULT_QUERY, PageRequest, SearchPage, load_search_page};
pub use types::{
    ContentKind, EpisodeSummary, MovieDetail, NOT_AVAILABLE, Rating, SearchItem, SearchParams,
    SearchResponse, SeasonResponse,
};
