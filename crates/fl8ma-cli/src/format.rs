//! Plain-text rendering helpers for terminal output.

use chrono::{DateTime, Local, TimeDelta};
use fl8ma_api::{AiringScheduleEntry, Score};

pub fn score(score: Option<Score>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("★ {s}"))
}

pub fn airing(entry: &AiringScheduleEntry) -> String {
    match entry.airing_time() {
        Some(t) => format!(
            "Ep {} · {}",
            entry.episode,
            t.with_timezone(&Local).format("%a %Y-%m-%d %H:%M")
        ),
        None => format!("Ep {}", entry.episode),
    }
}

pub fn timestamp(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Coarse "n units ago" label.
pub fn age(delta: TimeDelta) -> String {
    if delta.num_days() > 0 {
        format!("{}d ago", delta.num_days())
    } else if delta.num_hours() > 0 {
        format!("{}h ago", delta.num_hours())
    } else if delta.num_minutes() > 0 {
        format!("{}m ago", delta.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// First `max` characters of `s`, with an ellipsis when cut.
pub fn excerpt(s: &str, max: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}
