//! Groups schedule items by the weekday their next episode airs.

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};

use crate::model::{AiringScheduleEntry, MediaItem};

/// Schedule items bucketed by airing weekday.
#[derive(Debug, Clone, Default)]
pub struct WeeklySchedule {
    /// Indexed by `Weekday::num_days_from_sunday()`.
    days: [Vec<MediaItem>; 7],
    unscheduled: Vec<MediaItem>,
}

impl WeeklySchedule {
    /// Bucket `items` by the weekday (in `tz`) of their next airing at or
    /// after `now`. Items without an upcoming episode go to
    /// [`unscheduled`](Self::unscheduled).
    ///
    /// Within a day items are ordered by airing time; ties keep input order.
    pub fn from_items<Tz: TimeZone>(items: Vec<MediaItem>, tz: &Tz, now: DateTime<Utc>) -> Self {
        let mut slotted: [Vec<(i64, MediaItem)>; 7] = Default::default();
        let mut unscheduled = Vec::new();

        for item in items {
            match item.upcoming_airing(now).and_then(|e| weekday_of(&e, tz).map(|d| (e, d))) {
                Some((entry, day)) => {
                    slotted[day.num_days_from_sunday() as usize].push((entry.airing_at, item));
                }
                None => unscheduled.push(item),
            }
        }

        let days: [Vec<MediaItem>; 7] = slotted.map(|mut day| {
            day.sort_by_key(|(at, _)| *at);
            day.into_iter().map(|(_, item)| item).collect()
        });

        tracing::debug!(
            scheduled = days.iter().map(Vec::len).sum::<usize>(),
            unscheduled = unscheduled.len(),
            "grouped weekly schedule"
        );

        Self { days, unscheduled }
    }

    pub fn day(&self, day: Weekday) -> &[MediaItem] {
        &self.days[day.num_days_from_sunday() as usize]
    }

    pub fn unscheduled(&self) -> &[MediaItem] {
        &self.unscheduled
    }

    /// Days starting from Sunday, with their items.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[MediaItem])> {
        WEEK.iter().map(move |d| (*d, self.day(*d)))
    }

    pub fn is_empty(&self) -> bool {
        self.unscheduled.is_empty() && self.days.iter().all(Vec::is_empty)
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn weekday_of<Tz: TimeZone>(entry: &AiringScheduleEntry, tz: &Tz) -> Option<Weekday> {
    entry
        .airing_time()
        .map(|t| t.with_timezone(tz).weekday())
}
