use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::model::{ClubData, EventStandard, RaceSession, Tag};
use crate::ranking::{AthleteProfile, Badge, StandingRow};
use crate::records::{RecordRow, RecordSource};
use crate::scoring::{format_distance, get_event_distance};
use crate::time_codec::{format_time, ordinal};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Fit a trailing free-text column into what's left of the terminal
fn fit_tail(text: &str, fixed_width: usize) -> String {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => truncate(text, width - fixed_width),
        Some(_) => truncate(text, 20),
        None => text.to_string(),
    }
}

fn format_tags(tags: &[Tag], use_colors: bool) -> String {
    tags.iter()
        .map(|tag| {
            if !use_colors {
                return tag.label().to_string();
            }
            match tag {
                Tag::PersonalBest => tag.label().green().bold().to_string(),
                Tag::SeasonBest => tag.label().cyan().to_string(),
                Tag::CourseRecord => tag.label().yellow().bold().to_string(),
                Tag::Penalty => tag.label().red().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Event standards sorted by distance: id, name, gold time, k, distance
pub fn format_events(events: &[&EventStandard], use_colors: bool) -> String {
    if events.is_empty() {
        return "No event standards defined.".to_string();
    }

    events
        .iter()
        .map(|event| {
            let id = format!("{:>4}", event.id);
            let gold = format!("{:>9}", format_time(event.gold_time));
            let distance = format_distance(get_event_distance(&event.name));
            if use_colors {
                format!(
                    "{}  {:<12} {}  k={:<4} {}",
                    id.dimmed(),
                    event.name.bold(),
                    gold,
                    event.k_value,
                    distance.dimmed()
                )
            } else {
                format!(
                    "{}  {:<12} {}  k={:<4} {}",
                    id, event.name, gold, event.k_value, distance
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard as rank, average, races/entries, name
pub fn format_leaderboard(rows: &[StandingRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No active athletes.".to_string();
    }

    rows.iter()
        .map(|row| {
            let rank = format!("{:>3}.", row.rank);
            let average = format!("{:>5}", row.average_points);
            let races = format!("{:>3}/{:<3}", row.totals.races_run, row.totals.entries);
            let name = fit_tail(&row.name, 4 + 1 + 5 + 2 + 7 + 2);
            if use_colors {
                let name = if row.rank <= 3 {
                    name.yellow().bold().to_string()
                } else {
                    name
                };
                format!("{} {}  {}  {}", rank.dimmed(), average.bold(), races.dimmed(), name)
            } else {
                format!("{} {}  {}  {}", rank, average, races, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Record rows as position, time, points, athlete, where/when
pub fn format_records(rows: &[RecordRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No records found matching your filters.".to_string();
    }

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let position = format!("{:>3}.", idx + 1);
            let time = format!("{:>9}", format_time(row.time));
            let points = format!("{:>5}", row.points);
            let name = format!("{:<20}", truncate(&row.athlete_name, 20));
            let place = row
                .session_name
                .as_deref()
                .or(row.venue.as_deref())
                .unwrap_or("-");
            let date = row.date.as_deref().unwrap_or("-");
            let manual = if row.source == RecordSource::Manual {
                " (manual)"
            } else {
                ""
            };
            let tail = fit_tail(
                &format!("{} {}{}", date, place, manual),
                4 + 1 + 9 + 2 + 5 + 2 + 20 + 2,
            );
            if use_colors {
                format!(
                    "{} {}  {}  {}  {}",
                    position.dimmed(),
                    time.bold(),
                    points.cyan(),
                    name,
                    tail.dimmed()
                )
            } else {
                format!("{} {}  {}  {}  {}", position, time, points, name, tail)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Session results in finishing order with tags
pub fn format_session_results(
    data: &ClubData<'_>,
    session: &RaceSession,
    use_colors: bool,
) -> String {
    let header = format!(
        "{} ({}) on {}",
        session.name,
        data.event_name(&session.event_id),
        session.date
    );
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for result in &session.results {
        let line = format!(
            "{:>5} {:>9} {:>5}  {:<20} {}",
            ordinal(result.rank),
            format_time(result.time),
            result.points,
            truncate(data.athlete_name(&result.athlete_id), 20),
            format_tags(&result.tags, use_colors)
        );
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

pub fn format_badges(badges: &[Badge], use_colors: bool) -> String {
    if badges.is_empty() {
        return "  (none yet)".to_string();
    }
    badges
        .iter()
        .map(|badge| {
            if use_colors {
                format!("  {}: {}", badge.name().magenta().bold(), badge.description())
            } else {
                format!("  {}: {}", badge.name(), badge.description())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line athlete card: standing, totals, badges and the `recent` latest results
pub fn format_profile(
    data: &ClubData<'_>,
    profile: &AthleteProfile,
    recent: usize,
    use_colors: bool,
) -> String {
    let rank = if profile.is_active {
        format!("#{}", profile.rank)
    } else {
        "retired".to_string()
    };
    let title = if use_colors {
        format!("{} ({})", profile.name.bold(), rank.yellow())
    } else {
        format!("{} ({})", profile.name, rank)
    };

    let mut lines = vec![
        title,
        format!(
            "  Races: {}  Wins: {}  Podiums: {}",
            profile.races_run, profile.wins, profile.podiums
        ),
        format!(
            "  Points: {} total, {} avg  Distance: {}",
            profile.total_points,
            profile.average_points,
            format_distance(profile.total_distance_m)
        ),
        format!(
            "  Career: best rank #{}, peak avg {}",
            profile.career.best_rank, profile.career.highest_average
        ),
        "Badges:".to_string(),
        format_badges(&profile.badges, use_colors),
        "Recent results:".to_string(),
    ];

    if profile.recent_results.is_empty() {
        lines.push("  (no results)".to_string());
    }
    for line in profile.recent_results.iter().take(recent) {
        let text = format!(
            "  {}  {:<10} {:>9} {:>5}  {} {}",
            line.date,
            data.event_name(&line.event_id),
            format_time(line.result.time),
            line.result.points,
            ordinal(line.result.rank),
            format_tags(&line.result.tags, use_colors)
        );
        lines.push(text.trim_end().to_string());
    }
    lines.join("\n")
}
