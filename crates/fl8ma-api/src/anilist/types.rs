use serde::Deserialize;

use crate::model::{
    AiringScheduleEntry, Character, CoverImage, MediaItem, MediaSeason, MediaStatus, MediaTitle,
    Score, SearchResult,
};
use crate::normalize::clean_description;

// ── GraphQL response envelope ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    pub status: Option<u16>,
}

// ── Page / media queries ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "Page")]
    pub page: PageData,
}

/// `Page.media` is `[Media]` in the schema, so elements may be null.
#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub media: Vec<Option<RawMedia>>,
}

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<RawMedia>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMedia {
    pub id: u64,
    pub title: Option<RawTitle>,
    pub cover_image: Option<RawCoverImage>,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub episodes: Option<u32>,
    pub duration: Option<u32>,
    pub average_score: Option<u32>,
    pub genres: Option<Vec<Option<String>>>,
    pub status: Option<MediaStatus>,
    pub season: Option<MediaSeason>,
    pub season_year: Option<u32>,
    pub studios: Option<Connection<StudioNode>>,
    pub characters: Option<Connection<CharacterNode>>,
    pub next_airing_episode: Option<RawAiring>,
    pub airing_schedule: Option<Connection<RawAiring>>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RawTitle {
    pub native: Option<String>,
    pub english: Option<String>,
    pub romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCoverImage {
    pub medium: Option<String>,
    pub large: Option<String>,
    pub extra_large: Option<String>,
}

/// AniList `{ nodes: [...] }` connection; null nodes are skipped.
#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Option<Vec<Option<T>>>,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.nodes.unwrap_or_default().into_iter().flatten()
    }
}

#[derive(Debug, Deserialize)]
pub struct StudioNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CharacterNode {
    pub name: Option<CharacterName>,
    pub image: Option<CharacterImage>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterName {
    pub full: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterImage {
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAiring {
    pub episode: u32,
    pub airing_at: i64,
}

// ── Conversions ──────────────────────────────────────────────────

fn convert_score(id: u64, raw: Option<u32>) -> Option<Score> {
    let raw = raw?;
    let score = Score::new(raw);
    if score.is_none() {
        tracing::debug!(id, raw, "discarding out-of-range score");
    }
    score
}

fn convert_airing(raw: RawAiring) -> Option<AiringScheduleEntry> {
    (raw.episode > 0).then_some(AiringScheduleEntry {
        episode: raw.episode,
        airing_at: raw.airing_at,
    })
}

impl From<RawTitle> for MediaTitle {
    fn from(t: RawTitle) -> Self {
        Self {
            native: t.native,
            english: t.english,
            romaji: t.romaji,
        }
    }
}

impl From<RawCoverImage> for CoverImage {
    fn from(c: RawCoverImage) -> Self {
        Self {
            medium: c.medium,
            large: c.large,
            extra_large: c.extra_large,
        }
    }
}

impl RawMedia {
    fn take_title(&mut self) -> Option<MediaTitle> {
        let title: MediaTitle = self.title.take()?.into();
        title.display().is_some().then_some(title)
    }

    fn take_genres(&mut self) -> Vec<String> {
        self.genres
            .take()
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Normalize into a [`MediaItem`]. Returns `None` when no title variant
    /// is usable.
    pub fn into_media_item(mut self) -> Option<MediaItem> {
        let Some(title) = self.take_title() else {
            tracing::debug!(id = self.id, "media without a usable title");
            return None;
        };
        let genres = self.take_genres();

        Some(MediaItem {
            id: self.id,
            title,
            cover_image: self.cover_image.map(Into::into).unwrap_or_default(),
            banner_image: self.banner_image,
            description: clean_description(self.description),
            episodes: self.episodes,
            duration: self.duration,
            score: convert_score(self.id, self.average_score),
            genres,
            status: self.status,
            season: self.season,
            season_year: self.season_year,
            studios: self
                .studios
                .map(|s| s.into_nodes().map(|n| n.name).collect())
                .unwrap_or_default(),
            characters: self
                .characters
                .map(|c| {
                    c.into_nodes()
                        .filter_map(|n| {
                            let name = n.name.and_then(|n| n.full)?;
                            Some(Character {
                                name,
                                image: n.image.and_then(|i| i.large),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
            next_airing: self.next_airing_episode.and_then(convert_airing),
            airing_schedule: self
                .airing_schedule
                .map(|s| s.into_nodes().filter_map(convert_airing).collect())
                .unwrap_or_default(),
            updated_at: self.updated_at,
        })
    }

    /// Normalize into the reduced search projection.
    pub fn into_search_result(mut self) -> Option<SearchResult> {
        let Some(title) = self.take_title() else {
            tracing::debug!(id = self.id, "search hit without a usable title");
            return None;
        };
        let genres = self.take_genres();

        Some(SearchResult {
            id: self.id,
            title,
            cover_image: self.cover_image.map(Into::into).unwrap_or_default(),
            score: convert_score(self.id, self.average_score),
            genres,
        })
    }
}
