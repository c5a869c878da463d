use chrono::{FixedOffset, Local, Utc, Weekday};
use fl8ma_api::{MediaItem, MediaQueryClient, TransportChannel, WeeklySchedule};
use fl8ma_core::community::DiscussionBoard;
use fl8ma_core::config::AppConfig;

use crate::format;

/// Number of schedule items shown on the home view.
const HOME_SCHEDULE_ITEMS: usize = 5;

fn print_item_line(item: &MediaItem) {
    println!(
        "  [{}] {}  {}",
        item.id,
        item.display_title(),
        format::score(item.score)
    );
}

pub async fn home<T: TransportChannel>(client: &MediaQueryClient<T>) {
    let (schedule, news) = tokio::join!(client.fetch_weekly_schedule(), client.fetch_news());

    println!("Airing now");
    if schedule.is_empty() {
        println!("  (nothing to show)");
    }
    for item in schedule.iter().take(HOME_SCHEDULE_ITEMS) {
        print_item_line(item);
    }

    println!();
    println!("Latest news");
    if news.is_empty() {
        println!("  (nothing to show)");
    }
    for item in &news {
        print_item_line(item);
    }
}

pub async fn schedule<T: TransportChannel>(
    client: &MediaQueryClient<T>,
    config: &AppConfig,
    day: Option<Weekday>,
) {
    let items = client.fetch_weekly_schedule().await;
    let now = Utc::now();
    let grouped = match config
        .schedule
        .utc_offset_minutes
        .and_then(|m| FixedOffset::east_opt(m.saturating_mul(60)))
    {
        Some(tz) => WeeklySchedule::from_items(items, &tz, now),
        None => WeeklySchedule::from_items(items, &Local, now),
    };

    if grouped.is_empty() {
        println!("No schedule available.");
        return;
    }

    for (weekday, items) in grouped.iter() {
        if day.is_some_and(|d| d != weekday) || items.is_empty() {
            continue;
        }
        println!("{weekday}");
        for item in items {
            let next = item
                .upcoming_airing(now)
                .map(|e| format::airing(&e))
                .unwrap_or_default();
            println!(
                "  [{}] {}  {}  {}",
                item.id,
                item.display_title(),
                next,
                format::score(item.score)
            );
        }
    }

    if day.is_none() && !grouped.unscheduled().is_empty() {
        println!("No upcoming episode");
        for item in grouped.unscheduled() {
            print_item_line(item);
        }
    }
}

pub async fn news<T: TransportChannel>(client: &MediaQueryClient<T>) {
    let news = client.fetch_news().await;
    if news.is_empty() {
        println!("No news available.");
        return;
    }
    for item in &news {
        let updated = item.updated_at.map(format::timestamp).unwrap_or_default();
        println!(
            "[{}] {}  {}  {}",
            item.id,
            item.display_title(),
            updated,
            format::score(item.score)
        );
        let description = item.description.as_deref().unwrap_or("No description available.");
        println!("    {}", format::excerpt(description, 160));
    }
}

pub async fn detail<T: TransportChannel>(client: &MediaQueryClient<T>, id: u64) {
    let Some(item) = client.fetch_detail(id).await else {
        println!("Media {id} cannot be displayed.");
        return;
    };

    println!("{}", item.display_title());
    if let Some(english) = item.title.english.as_deref() {
        if english != item.display_title() {
            println!("{english}");
        }
    }
    println!("Score: {}", format::score(item.score));
    if let Some(status) = item.status {
        println!("Status: {status}");
    }
    match (item.season, item.season_year) {
        (Some(season), Some(year)) => println!("Season: {season} {year}"),
        (None, Some(year)) => println!("Year: {year}"),
        _ => {}
    }
    if let Some(episodes) = item.episodes {
        println!("Episodes: {episodes}");
    }
    if let Some(duration) = item.duration {
        println!("Duration: {duration} min");
    }
    if !item.genres.is_empty() {
        println!("Genres: {}", item.genres.join(", "));
    }
    if !item.studios.is_empty() {
        println!("Studios: {}", item.studios.join(", "));
    }
    if let Some(description) = &item.description {
        println!();
        println!("{description}");
    }
    if !item.characters.is_empty() {
        println!();
        println!("Characters");
        for character in &item.characters {
            println!("  {}", character.name);
        }
    }
    if !item.airing_schedule.is_empty() {
        println!();
        println!("Airing schedule");
        for entry in &item.airing_schedule {
            println!("  {}", format::airing(entry));
        }
    }
}

pub async fn search<T: TransportChannel>(client: &MediaQueryClient<T>, term: &str) {
    let results = client.search(term).await;
    if results.is_empty() {
        println!("No results for \"{term}\".");
        return;
    }
    for result in &results {
        println!(
            "[{}] {}  {}  {}",
            result.id,
            result.display_title(),
            format::score(result.score),
            result.genres.join(", ")
        );
    }
}

fn print_board(board: &DiscussionBoard) {
    let now = Utc::now();
    for d in board.discussions() {
        println!("#{} {}  [{}]", d.id, d.title, d.category);
        println!(
            "    by {} · {} · {} replies · {} views",
            d.author,
            format::age(d.age(now)),
            d.replies,
            d.views
        );
    }
    let stats = board.stats();
    println!();
    println!(
        "{} members · {} discussions · {} replies",
        stats.members, stats.discussions, stats.replies
    );
}

pub fn community_list() {
    print_board(&DiscussionBoard::seeded(Utc::now()));
}

pub fn community_post(title: &str, author: &str) -> anyhow::Result<()> {
    let now = Utc::now();
    let mut board = DiscussionBoard::seeded(now);
    let id = board.post(title, author, now)?.id;
    tracing::info!(id, "discussion added");
    print_board(&board);
    Ok(())
}
