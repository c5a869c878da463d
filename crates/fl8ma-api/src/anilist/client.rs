use serde::de::DeserializeOwned;

use super::error::{FetchError, TransportError};
use super::queries::{DETAIL_QUERY, NEWS_QUERY, SEARCH_QUERY, WEEKLY_SCHEDULE_QUERY};
use super::types::{MediaResponse, PageResponse, RawMedia};
use crate::model::{MediaItem, SearchResult};
use crate::traits::{MediaSort, TransportChannel};

/// Page size of the weekly schedule query.
pub const SCHEDULE_PAGE_SIZE: usize = 50;
/// Page size of the news query.
pub const NEWS_PAGE_SIZE: usize = 20;
/// Page size of the search query.
pub const SEARCH_PAGE_SIZE: usize = 20;

/// Typed read-only client for the media catalog.
///
/// Every public operation is best-effort: a failure is logged and turned
/// into an empty list or `None`. The matching `try_*` operation returns the
/// failure reason instead.
///
/// The client keeps no state besides its transport, so a single instance
/// can be shared (or cloned) across the whole program.
#[derive(Debug, Clone)]
pub struct MediaQueryClient<T> {
    transport: T,
}

impl<T: TransportChannel> MediaQueryClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn query<R: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<R, FetchError> {
        tracing::debug!(operation, "AniList query");
        let data = self.transport.send(query, variables).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn page(
        &self,
        operation: &str,
        query: &str,
        per_page: usize,
        sort: MediaSort,
        extra: Option<(&str, serde_json::Value)>,
    ) -> Result<Vec<RawMedia>, FetchError> {
        let mut vars = serde_json::json!({
            "page": 1,
            "perPage": per_page,
            "sort": sort.to_anilist_str(),
        });
        if let Some((name, value)) = extra {
            vars[name] = value;
        }

        let resp: PageResponse = self.query(operation, query, vars).await?;
        let mut media: Vec<RawMedia> = resp.page.media.into_iter().flatten().collect();
        if media.len() > per_page {
            tracing::debug!(operation, returned = media.len(), per_page, "truncating page");
            media.truncate(per_page);
        }
        Ok(media)
    }

    /// Currently releasing titles, most popular first (at most 50).
    pub async fn try_weekly_schedule(&self) -> Result<Vec<MediaItem>, FetchError> {
        let media = self
            .page(
                "WeeklySchedule",
                WEEKLY_SCHEDULE_QUERY,
                SCHEDULE_PAGE_SIZE,
                MediaSort::PopularityDesc,
                None,
            )
            .await?;
        Ok(media.into_iter().filter_map(RawMedia::into_media_item).collect())
    }

    /// Most recently updated titles of any status (at most 20).
    pub async fn try_news(&self) -> Result<Vec<MediaItem>, FetchError> {
        let media = self
            .page(
                "News",
                NEWS_QUERY,
                NEWS_PAGE_SIZE,
                MediaSort::UpdatedAtDesc,
                None,
            )
            .await?;
        Ok(media.into_iter().filter_map(RawMedia::into_media_item).collect())
    }

    /// Full detail for one title.
    ///
    /// Unknown ids yield [`FetchError::NotFound`].
    pub async fn try_detail(&self, id: u64) -> Result<MediaItem, FetchError> {
        let resp: Result<MediaResponse, FetchError> = match self
            .transport
            .send(DETAIL_QUERY, serde_json::json!({ "id": id }))
            .await
        {
            Ok(data) => serde_json::from_value(data).map_err(FetchError::from),
            Err(TransportError::Service {
                status: Some(404), ..
            }) => return Err(FetchError::NotFound(id)),
            Err(e) => Err(e.into()),
        };

        let media = resp?.media.ok_or(FetchError::NotFound(id))?;
        if media.id != id {
            return Err(FetchError::Parse(format!(
                "requested media {id}, received {}",
                media.id
            )));
        }
        media
            .into_media_item()
            .ok_or_else(|| FetchError::Parse(format!("media {id} has no usable title")))
    }

    /// Titles matching `term`, most popular first (at most 20).
    ///
    /// The term is forwarded unchanged; empty terms are up to the service.
    pub async fn try_search(&self, term: &str) -> Result<Vec<SearchResult>, FetchError> {
        let media = self
            .page(
                "Search",
                SEARCH_QUERY,
                SEARCH_PAGE_SIZE,
                MediaSort::PopularityDesc,
                Some(("search", serde_json::json!(term))),
            )
            .await?;
        Ok(media
            .into_iter()
            .filter_map(RawMedia::into_search_result)
            .collect())
    }

    /// Weekly schedule, or an empty list on failure.
    pub async fn fetch_weekly_schedule(&self) -> Vec<MediaItem> {
        degrade("WeeklySchedule", self.try_weekly_schedule().await).unwrap_or_default()
    }

    /// News feed, or an empty list on failure.
    pub async fn fetch_news(&self) -> Vec<MediaItem> {
        degrade("News", self.try_news().await).unwrap_or_default()
    }

    /// Detail for `id`, or `None` when it cannot be displayed.
    pub async fn fetch_detail(&self, id: u64) -> Option<MediaItem> {
        degrade("Detail", self.try_detail(id).await)
    }

    /// Search results, or an empty list on failure.
    pub async fn search(&self, term: &str) -> Vec<SearchResult> {
        degrade("Search", self.try_search(term).await).unwrap_or_default()
    }
}

/// Log a failed operation and drop the error.
fn degrade<V>(operation: &str, result: Result<V, FetchError>) -> Option<V> {
    match result {
        Ok(v) => Some(v),
        Err(FetchError::NotFound(id)) => {
            tracing::info!(operation, id, "media not found");
            None
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "AniList request failed, returning empty result");
            None
        }
    }
}
