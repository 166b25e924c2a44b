//! Client-side genre filter over a page of search results.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use tracing::instrument;

use super::api::LocalOmdbApi;
use super::types::{MovieDetail, SearchItem};

/// A search item whose detail matched the requested genre.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct GenreMatch {
    /// IMDb id of the matching item.
    pub imdb_id: String,
    /// Full detail record of the item.
    pub detail: MovieDetail,
}

/// Keeps the items whose genre contains `target_genre` (case-insensitive).
///
/// Details are fetched concurrently, one lookup per distinct id. Items whose
/// detail is unavailable or does not match are dropped; the filter itself
/// never fails. Matches are returned in input order.
#[instrument(skip_all, fields(items = items.len(), genre = %target_genre))]
pub async fn filter_by_genre(
    api: &(impl LocalOmdbApi + Sync),
    items: &[SearchItem],
    target_genre: &str,
) -> Vec<GenreMatch> {
    let mut seen = HashSet::new();
    let lookups = items
        .iter()
        .map(|item| item.imdb_id.as_str())
        .filter(|id| seen.insert(*id))
        .map(|id| async move { api.get_detail(id).await.map(|detail| (id, detail)) });

    let details: HashMap<&str, MovieDetail> = join_all(lookups).await.into_iter().flatten().collect();

    let matches: Vec<GenreMatch> = items
        .iter()
        .filter_map(|item| {
            let detail = details.get(item.imdb_id.as_str())?;
            detail.matches_genre(target_genre).then(|| GenreMatch {
                imdb_id: item.imdb_id.clone(),
                detail: detail.clone(),
            })
        })
        .collect();

    tracing::debug!(
        fetched = details.len(),
        matched = matches.len(),
        "Genre filter complete"
    );
    matches
}
