//! Normalized media types handed to presentation code.
//!
//! Everything here is built once from a response and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A title with language variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub native: Option<String>,
    pub english: Option<String>,
    pub romaji: Option<String>,
}

impl MediaTitle {
    /// Returns the best available display title.
    ///
    /// Fallback chain is native, english, romaji; blank variants are skipped.
    pub fn display(&self) -> Option<&str> {
        [&self.native, &self.english, &self.romaji]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
    }
}

/// Cover art URLs. Each query selects the size variants it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub medium: Option<String>,
    pub large: Option<String>,
    pub extra_large: Option<String>,
}

impl CoverImage {
    /// Largest variant that was returned.
    pub fn best(&self) -> Option<&str> {
        self.extra_large
            .as_deref()
            .or(self.large.as_deref())
            .or(self.medium.as_deref())
    }

    /// Smallest variant that was returned, for thumbnails.
    pub fn thumbnail(&self) -> Option<&str> {
        self.medium
            .as_deref()
            .or(self.large.as_deref())
            .or(self.extra_large.as_deref())
    }
}

/// Average score on the source's 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(u8);

impl Score {
    pub const MAX: u32 = 100;

    /// Returns `None` for values outside 0-100.
    pub fn new(raw: u32) -> Option<Self> {
        u8::try_from(raw)
            .ok()
            .filter(|v| u32::from(*v) <= Self::MAX)
            .map(Self)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    /// Score on the 0-10 star scale used for display.
    pub fn stars(self) -> f32 {
        f32::from(self.0) / 10.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.stars())
    }
}

/// Release status of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finished => write!(f, "Finished"),
            Self::Releasing => write!(f, "Releasing"),
            Self::NotYetReleased => write!(f, "Not yet released"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Hiatus => write!(f, "Hiatus"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Anime season (quarter of the year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaSeason {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl std::fmt::Display for MediaSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Winter => write!(f, "Winter"),
            Self::Spring => write!(f, "Spring"),
            Self::Summer => write!(f, "Summer"),
            Self::Fall => write!(f, "Fall"),
        }
    }
}

/// One episode's scheduled broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiringScheduleEntry {
    pub episode: u32,
    /// Epoch seconds.
    pub airing_at: i64,
}

impl AiringScheduleEntry {
    pub fn airing_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.airing_at, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub image: Option<String>,
}

/// One anime record as normalized from the remote catalog.
///
/// List queries fill only the fields they select; detail fields stay empty
/// (`None` / empty vectors) outside of [`MediaQueryClient::fetch_detail`].
///
/// [`MediaQueryClient::fetch_detail`]: crate::MediaQueryClient::fetch_detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    pub title: MediaTitle,
    pub cover_image: CoverImage,
    pub banner_image: Option<String>,
    /// Markup-free description.
    pub description: Option<String>,
    pub episodes: Option<u32>,
    /// Minutes per episode.
    pub duration: Option<u32>,
    pub score: Option<Score>,
    pub genres: Vec<String>,
    pub status: Option<MediaStatus>,
    pub season: Option<MediaSeason>,
    pub season_year: Option<u32>,
    pub studios: Vec<String>,
    pub characters: Vec<Character>,
    pub next_airing: Option<AiringScheduleEntry>,
    pub airing_schedule: Vec<AiringScheduleEntry>,
    /// Epoch seconds of the last catalog update.
    pub updated_at: Option<i64>,
}

impl MediaItem {
    /// Resolved display title. Never empty for items built by the client.
    pub fn display_title(&self) -> &str {
        self.title.display().unwrap_or_default()
    }

    /// Next episode airing at or after `now`.
    ///
    /// Prefers the catalog's next-airing field and falls back to the first
    /// upcoming entry of the full schedule.
    pub fn upcoming_airing(&self, now: DateTime<Utc>) -> Option<AiringScheduleEntry> {
        let now = now.timestamp();
        self.next_airing
            .filter(|e| e.airing_at >= now)
            .or_else(|| {
                self.airing_schedule
                    .iter()
                    .copied()
                    .find(|e| e.airing_at >= now)
            })
    }
}

/// Reduced projection returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub title: MediaTitle,
    pub cover_image: CoverImage,
    pub score: Option<Score>,
    pub genres: Vec<String>,
}

impl SearchResult {
    pub fn display_title(&self) -> &str {
        self.title.display().unwrap_or_default()
    }
}
