//! Fixed AniList query documents.
//!
//! Each document is parameterized only by page, page size and sort order,
//! plus `$id` for detail and `$search` for search. Field selections match
//! what [`super::types::RawMedia`] normalizes.

pub const WEEKLY_SCHEDULE_QUERY: &str = r#"
query ($page: Int, $perPage: Int, $sort: [MediaSort]) {
    Page(page: $page, perPage: $perPage) {
        media(type: ANIME, status: RELEASING, sort: $sort) {
            id
            title { native english romaji }
            coverImage { large medium }
            episodes
            averageScore
            genres
            status
            nextAiringEpisode { episode airingAt }
            airingSchedule { nodes { episode airingAt } }
        }
    }
}
"#;

pub const NEWS_QUERY: &str = r#"
query ($page: Int, $perPage: Int, $sort: [MediaSort]) {
    Page(page: $page, perPage: $perPage) {
        media(type: ANIME, sort: $sort) {
            id
            title { native english romaji }
            coverImage { large }
            updatedAt
            description
            averageScore
            status
        }
    }
}
"#;

pub const DETAIL_QUERY: &str = r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        id
        title { native english romaji }
        description
        coverImage { large extraLarge }
        bannerImage
        episodes
        duration
        averageScore
        genres
        status
        season
        seasonYear
        studios { nodes { name } }
        characters { nodes { name { full } image { large } } }
        nextAiringEpisode { episode airingAt }
        airingSchedule { nodes { episode airingAt } }
    }
}
"#;

pub const SEARCH_QUERY: &str = r#"
query ($page: Int, $perPage: Int, $sort: [MediaSort], $search: String) {
    Page(page: $page, perPage: $perPage) {
        media(type: ANIME, search: $search, sort: $sort) {
            id
            title { native english romaji }
            coverImage { large }
            averageScore
            genres
        }
    }
}
"#;
