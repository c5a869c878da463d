//! Typed client for the AniList GraphQL media database.
//!
//! [`MediaQueryClient`] exposes the four read operations used by the
//! front-end (weekly schedule, news, detail, search) and normalizes the raw
//! payloads into the [`model`] types. The network is reached through a
//! [`TransportChannel`]; [`HttpTransport`] is the reqwest implementation.

pub mod anilist;
pub mod model;
pub mod normalize;
pub mod schedule;
pub mod traits;

pub use anilist::{FetchError, HttpTransport, MediaQueryClient, TransportError};
pub use model::{
    AiringScheduleEntry, Character, CoverImage, MediaItem, MediaSeason, MediaStatus, MediaTitle,
    Score, SearchResult,
};
pub use schedule::WeeklySchedule;
pub use traits::TransportChannel;
