//! OMDb API response types and search parameters.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Deserializer};

/// Sentinel OMDb uses for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Decodes OMDb's `"True"` / `"False"` response flag.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.eq_ignore_ascii_case("true"))
}

/// Parses a strictly positive integer, rejecting `N/A` and zero.
pub(crate) fn parse_positive(raw: &str) -> Option<u32> {
    let n: u32 = raw.trim().parse().ok()?;
    (n > 0).then_some(n)
}

// --- Content kind ---

/// Kind of title stored in OMDb.
///
/// Only `movie`, `series` and `episode` can be requested as a filter; other
/// kinds still show up in results and decode to `Game` or `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Feature film.
    Movie,
    /// TV series.
    Series,
    /// Single episode of a series.
    Episode,
    /// Video game.
    Game,
    /// Any kind not listed above.
    #[serde(other)]
    Other,
}

impl ContentKind {
    /// Value used for the `type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            other => bail!("unknown content type: {other} (expected movie, series or episode)"),
        }
    }
}

// --- Search ---

/// Response from a search (`s=`) request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    /// Matching titles for the requested page.
    #[serde(rename = "Search", default)]
    pub items: Vec<SearchItem>,
    /// Total number of matches across all pages (decimal string).
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    /// Whether the service found anything.
    #[serde(rename = "Response", deserialize_with = "deserialize_flag")]
    pub success: bool,
    /// Service-provided message when `success` is false.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Total number of matches, 0 when absent or unparsable.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_results
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchItem {
    /// Title.
    pub title: String,
    /// Release year or year range (e.g. "2008–2013").
    pub year: String,
    /// IMDb identifier.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Content kind.
    #[serde(rename = "Type")]
    pub kind: ContentKind,
    /// Poster URL or `N/A`.
    #[serde(default)]
    pub poster: String,
}

impl SearchItem {
    /// Poster URL, `None` for the `N/A` sentinel.
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        poster_url(&self.poster)
    }
}

fn poster_url(raw: &str) -> Option<&str> {
    (!raw.is_empty() && raw != NOT_AVAILABLE).then_some(raw)
}

// --- Detail ---

/// Response from a detail (`i=`) request.
///
/// Every field defaults, so a bare failure body such as
/// `{"Response":"False","Error":"Incorrect IMDb ID."}` decodes too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MovieDetail {
    /// Title.
    pub title: String,
    /// Release year or year range.
    pub year: String,
    /// Age rating (e.g. "R").
    pub rated: String,
    /// Release date (e.g. "14 Oct 1994").
    pub released: String,
    /// Runtime (e.g. "142 min").
    pub runtime: String,
    /// Comma-joined genre list.
    pub genre: String,
    /// Director(s).
    pub director: String,
    /// Writer(s).
    pub writer: String,
    /// Main cast.
    pub actors: String,
    /// Short plot.
    pub plot: String,
    /// Language(s).
    pub language: String,
    /// Country of origin.
    pub country: String,
    /// Awards summary.
    pub awards: String,
    /// Poster URL or `N/A`.
    pub poster: String,
    /// Third-party ratings.
    pub ratings: Vec<Rating>,
    /// Metacritic score.
    pub metascore: String,
    /// IMDb rating.
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    /// IMDb vote count.
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    /// IMDb identifier.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Content kind.
    #[serde(rename = "Type")]
    pub kind: Option<ContentKind>,
    /// Number of seasons (series only; may be `N/A`).
    #[serde(rename = "totalSeasons")]
    pub total_seasons: Option<String>,
    /// DVD release date.
    #[serde(rename = "DVD")]
    pub dvd: String,
    /// Box office gross.
    pub box_office: String,
    /// Production company.
    pub production: String,
    /// Official website.
    pub website: String,
    /// Whether the lookup succeeded.
    #[serde(rename = "Response", deserialize_with = "deserialize_flag")]
    pub success: bool,
    /// Service-provided message when `success` is false.
    pub error: Option<String>,
}

/// A third-party rating entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Rating {
    /// Rating source (e.g. "Rotten Tomatoes").
    pub source: String,
    /// Rating value (e.g. "91%").
    pub value: String,
}

impl MovieDetail {
    /// Number of seasons when known and positive.
    #[must_use]
    pub fn season_count(&self) -> Option<u32> {
        self.total_seasons.as_deref().and_then(parse_positive)
    }

    /// Individual genre names.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty() && *g != NOT_AVAILABLE)
    }

    /// Case-insensitive substring match against the genre field.
    #[must_use]
    pub fn matches_genre(&self, target: &str) -> bool {
        self.genre
            .to_lowercase()
            .contains(&target.trim().to_lowercase())
    }

    /// Poster URL, `None` for the `N/A` sentinel.
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        poster_url(&self.poster)
    }

    /// Projects the detail back to a search item. `None` without a kind.
    #[must_use]
    pub fn to_search_item(&self) -> Option<SearchItem> {
        Some(SearchItem {
            title: self.title.clone(),
            year: self.year.clone(),
            imdb_id: self.imdb_id.clone(),
            kind: self.kind?,
            poster: self.poster.clone(),
        })
    }
}

// --- Season ---

/// Response from a season (`i=&Season=`) request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SeasonResponse {
    /// Series title.
    pub title: String,
    /// Season number (decimal string).
    pub season: String,
    /// Number of seasons in the series.
    #[serde(rename = "totalSeasons")]
    pub total_seasons: Option<String>,
    /// Episodes in airing order.
    pub episodes: Vec<EpisodeSummary>,
    /// Whether the lookup succeeded.
    #[serde(rename = "Response", deserialize_with = "deserialize_flag")]
    pub success: bool,
    /// Service-provided message when `success` is false.
    pub error: Option<String>,
}

/// A single episode within a season listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EpisodeSummary {
    /// Episode title.
    pub title: String,
    /// Release date (YYYY-MM-DD).
    pub released: String,
    /// Episode number within the season.
    pub episode: String,
    /// IMDb rating.
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    /// IMDb identifier of the episode.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

// --- Search Parameters ---

/// Parameters for a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text query (required, non-empty).
    pub query: String,
    /// Result page (1-based, default: 1).
    pub page: u32,
    /// Content kind filter.
    pub kind: Option<ContentKind>,
    /// Release year filter.
    pub year: Option<u32>,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            kind: None,
            year: None,
        }
    }

    /// Sets the result page. Page 0 is treated as 1.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = if page == 0 { 1 } else { page };
        self
    }

    /// Sets the content kind filter.
    #[must_use]
    pub const fn kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Query pairs sent to the API (without the API key).
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("s", self.query.clone()), ("page", self.page.to_string())];
        if let Some(kind) = self.kind {
            query.push(("type", String::from(kind.as_str())));
        }
        if let Some(year) = self.year {
            query.push(("y", year.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn detail_with_genre(genre: &str) -> MovieDetail {
        MovieDetail {
            genre: String::from(genre),
            success: true,
            ..MovieDetail::default()
        }
    }

    #[test]
    fn test_parse_search_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_batman.json");

        // Act
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.success);
        assert_eq!(response.total_count(), 602);
        assert_eq!(response.items.len(), 3);
        assert_eq!(response.items[0].imdb_id, "tt0372784");
        assert_eq!(response.items[0].kind, ContentKind::Movie);
        assert_eq!(response.items[2].kind, ContentKind::Series);
    }

    #[test]
    fn test_parse_search_with_unfilterable_kinds() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_batman_mixed_kinds.json");

        // Act
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.success);
        let kinds: Vec<ContentKind> = response.items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![ContentKind::Movie, ContentKind::Game, ContentKind::Other]
        );
        assert_eq!(response.items[1].kind.to_string(), "game");
    }

    #[test]
    fn test_parse_game_detail_keeps_kind() {
        // Arrange
        let json = r#"{"Title":"Batman: Arkham City","Year":"2011","imdbID":"tt1568322","Type":"game","Genre":"Action, Adventure","Response":"True"}"#;

        // Act
        let detail: MovieDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert!(detail.success);
        assert_eq!(detail.kind, Some(ContentKind::Game));
        assert_eq!(detail.to_search_item().unwrap().kind, ContentKind::Game);
    }

    #[test]
    fn test_parse_search_not_found_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/search_not_found.json");

        // Act
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(!response.success);
        assert!(response.items.is_empty());
        assert_eq!(response.total_count(), 0);
        assert_eq!(response.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_parse_detail_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/detail_tt0111161.json");

        // Act
        let detail: MovieDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert!(detail.success);
        assert_eq!(detail.imdb_id, "tt0111161");
        assert_eq!(detail.title, "The Shawshank Redemption");
        assert_eq!(detail.kind, Some(ContentKind::Movie));
        assert_eq!(detail.box_office, "$28,767,189");
        assert_eq!(detail.dvd, "21 Dec 1999");
        assert_eq!(detail.ratings.len(), 3);
        assert_eq!(detail.season_count(), None);
    }

    #[test]
    fn test_parse_series_detail_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/detail_tt0903747.json");

        // Act
        let detail: MovieDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(detail.kind, Some(ContentKind::Series));
        assert_eq!(detail.season_count(), Some(5));
        assert_eq!(detail.poster_url(), None);
    }

    #[test]
    fn test_parse_detail_not_found_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/detail_not_found.json");

        // Act
        let detail: MovieDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert!(!detail.success);
        assert_eq!(detail.error.as_deref(), Some("Incorrect IMDb ID."));
        assert!(detail.title.is_empty());
    }

    #[test]
    fn test_parse_season_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/omdb/season_tt0903747_1.json");

        // Act
        let season: SeasonResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(season.success);
        assert_eq!(season.season, "1");
        assert_eq!(season.episodes.len(), 7);
        assert_eq!(season.episodes[0].episode, "1");
    }

    #[test]
    fn test_season_count_rejects_sentinel_and_zero() {
        // Arrange
        let mut detail = MovieDetail::default();

        // Act & Assert
        detail.total_seasons = Some(String::from(NOT_AVAILABLE));
        assert_eq!(detail.season_count(), None);
        detail.total_seasons = Some(String::from("0"));
        assert_eq!(detail.season_count(), None);
        detail.total_seasons = None;
        assert_eq!(detail.season_count(), None);
        detail.total_seasons = Some(String::from(" 4 "));
        assert_eq!(detail.season_count(), Some(4));
    }

    #[test]
    fn test_matches_genre_case_insensitive_substring() {
        // Arrange
        let detail = detail_with_genre("Action, Sci-Fi, Adventure");

        // Act & Assert
        assert!(detail.matches_genre("sci-fi"));
        assert!(detail.matches_genre("ADVENTURE"));
        assert!(detail.matches_genre("act"));
        assert!(!detail.matches_genre("drama"));
    }

    #[test]
    fn test_genres_splits_and_trims() {
        // Arrange
        let detail = detail_with_genre("Crime, Drama,Thriller");

        // Act
        let genres: Vec<&str> = detail.genres().collect();

        // Assert
        assert_eq!(genres, vec!["Crime", "Drama", "Thriller"]);
    }

    #[test]
    fn test_content_kind_from_str() {
        // Arrange & Act & Assert
        assert_eq!("Series".parse::<ContentKind>().unwrap(), ContentKind::Series);
        assert_eq!("movie".parse::<ContentKind>().unwrap(), ContentKind::Movie);
        assert!("game".parse::<ContentKind>().is_err());
        assert!("other".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_search_params_to_query() {
        // Arrange
        let params = SearchParams::new("batman")
            .page(2)
            .kind(ContentKind::Series)
            .year(2008);

        // Act
        let query = params.to_query();

        // Assert
        assert_eq!(
            query,
            vec![
                ("s", String::from("batman")),
                ("page", String::from("2")),
                ("type", String::from("series")),
                ("y", String::from("2008")),
            ]
        );
    }

    #[test]
    fn test_search_params_page_zero_is_first_page() {
        // Arrange & Act
        let params = SearchParams::new("batman").page(0);

        // Assert
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_to_search_item_requires_kind() {
        // Arrange
        let mut detail = detail_with_genre("Drama");
        detail.imdb_id = String::from("tt0111161");

        // Act & Assert
        assert!(detail.to_search_item().is_none());
        detail.kind = Some(ContentKind::Movie);
        let item = detail.to_search_item().unwrap();
        assert_eq!(item.imdb_id, "tt0111161");
        assert_eq!(item.kind, ContentKind::Movie);
    }
}
