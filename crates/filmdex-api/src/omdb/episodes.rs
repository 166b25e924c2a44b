//! Total episode count of a series.

use tracing::instrument;

use super::api::LocalOmdbApi;
use super::types::parse_positive;

/// Sums the episode counts of every season of a series.
///
/// `known_seasons` is the series' `totalSeasons` value when the caller
/// already has it; anything that is not a positive integer triggers a
/// lookup of the series record instead.
///
/// The total is all-or-nothing: if the season count cannot be determined
/// or any season request fails after retries, `None` is returned and no
/// partial sum is exposed. Failures are logged, never raised.
#[instrument(skip_all, fields(series_id = %series_id))]
pub async fn total_episodes(
    api: &(impl LocalOmdbApi + Sync),
    series_id: &str,
    known_seasons: Option<&str>,
) -> Option<u32> {
    let seasons = match known_seasons.and_then(parse_positive) {
        Some(n) => n,
        None => {
            let Some(root) = api.get_detail(series_id).await else {
                tracing::warn!("Series record unavailable, episode total unknown");
                return None;
            };
            let Some(n) = root.season_count() else {
                tracing::warn!(
                    total_seasons = root.total_seasons.as_deref().unwrap_or("-"),
                    "Series has no usable season count"
                );
                return None;
            };
            n
        }
    };

    let mut total: u32 = 0;
    for season in 1..=seasons {
        let listing = match api.fetch_season(series_id, season).await {
            Ok(listing) => listing,
            Err(err) => {
                tracing::warn!(season, "Failed to fetch season, discarding episode total: {err:#}");
                return None;
            }
        };
        let count = u32::try_from(listing.episodes.len()).ok()?;
        total = total.checked_add(count)?;
    }

    tracing::debug!(seasons, total, "Episode total computed");
    Some(total)
}
