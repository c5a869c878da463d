//! In-memory community discussion board.
//!
//! The board starts from a fixed set of seeded discussions and only lives as
//! long as its owner; nothing is persisted.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Member count shown on the board until real accounts exist.
const SEEDED_MEMBER_COUNT: u32 = 1234;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    General,
    Predictions,
    Reviews,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::General => write!(f, "General discussion"),
            Self::Predictions => write!(f, "Predictions"),
            Self::Reviews => write!(f, "Reviews"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub replies: u32,
    pub views: u32,
    pub posted_at: DateTime<Utc>,
    pub category: Category,
}

impl Discussion {
    /// Time since posting, clamped at zero.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.posted_at).max(TimeDelta::zero())
    }
}

/// Aggregate numbers displayed under the discussion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStats {
    pub members: u32,
    pub discussions: usize,
    pub replies: u32,
}

/// Discussions ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct DiscussionBoard {
    discussions: Vec<Discussion>,
}

impl DiscussionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board with the stock discussions, timestamped relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let seed = |id: u32,
                    title: &str,
                    author: &str,
                    replies: u32,
                    views: u32,
                    ago: TimeDelta,
                    category: Category| Discussion {
            id,
            title: title.to_string(),
            author: author.to_string(),
            replies,
            views,
            posted_at: now - ago,
            category,
        };

        Self {
            discussions: vec![
                seed(
                    1,
                    "أفضل أنمي 2024؟",
                    "عشاق_الأنمي",
                    42,
                    156,
                    TimeDelta::hours(2),
                    Category::General,
                ),
                seed(
                    2,
                    "توقعات للموسم القادم من One Piece",
                    "لوفي_فان",
                    28,
                    89,
                    TimeDelta::hours(5),
                    Category::Predictions,
                ),
                seed(
                    3,
                    "أفضل شخصية أنثى في الأنمي",
                    "أنمي_لوفر",
                    67,
                    234,
                    TimeDelta::days(1),
                    Category::General,
                ),
            ],
        }
    }

    pub fn discussions(&self) -> &[Discussion] {
        &self.discussions
    }

    pub fn get(&self, id: u32) -> Option<&Discussion> {
        self.discussions.iter().find(|d| d.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Discussion> {
        self.discussions
            .iter()
            .filter(move |d| d.category == category)
    }

    /// Start a new general discussion at the top of the board.
    ///
    /// The title is trimmed; blank titles are rejected.
    pub fn post(
        &mut self,
        title: &str,
        author: &str,
        now: DateTime<Utc>,
    ) -> Result<&Discussion, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Community("discussion title is empty".into()));
        }

        let id = self.discussions.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        tracing::debug!(id, author, "new discussion");
        self.discussions.insert(
            0,
            Discussion {
                id,
                title: title.to_string(),
                author: author.to_string(),
                replies: 0,
                views: 0,
                posted_at: now,
                category: Category::General,
            },
        );
        Ok(&self.discussions[0])
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats {
            members: SEEDED_MEMBER_COUNT,
            discussions: self.discussions.len(),
            replies: self.discussions.iter().map(|d| d.replies).sum(),
        }
    }
}
