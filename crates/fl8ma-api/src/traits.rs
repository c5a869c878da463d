//! Transport abstraction between the media client and the network.
//!
//! The client only knows how to build query documents and normalize the
//! returned data; everything below (HTTP, retries, timeouts) lives behind
//! [`TransportChannel`], which also lets tests script responses.

use std::future::Future;
use std::sync::Arc;

use crate::anilist::TransportError;

/// Executes one GraphQL query against a fixed remote endpoint.
pub trait TransportChannel: Send + Sync {
    /// Send `query` with `variables` (a JSON object of scalars).
    ///
    /// Resolves to the envelope's `data` member.
    fn send(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, TransportError>> + Send;
}

impl<T: TransportChannel> TransportChannel for Arc<T> {
    fn send(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, TransportError>> + Send {
        (**self).send(query, variables)
    }
}

/// Sort orders the fixed query documents are parameterized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSort {
    PopularityDesc,
    UpdatedAtDesc,
}

impl MediaSort {
    /// Convert to AniList GraphQL `MediaSort` enum value.
    pub fn to_anilist_str(self) -> &'static str {
        match self {
            Self::PopularityDesc => "POPULARITY_DESC",
            Self::UpdatedAtDesc => "UPDATED_AT_DESC",
        }
    }
}

impl std::fmt::Display for MediaSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_anilist_str())
    }
}
