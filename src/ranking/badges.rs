use crate::model::{cmp_dates, ClubData, EventStandard, RaceSession};
use crate::scoring::ScoringConfig;

use super::profile::ResultLine;
use super::standings::current_rank;

/// Achievement badges. Only the highest points tier is ever awarded; the
/// others are independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Goat,
    Club900,
    Club800,
    Club700,
    Club600,
    Club500,
    Speedster,
    EnduranceBeast,
    StreakWins,
    EmergingStar,
    PodiumRegular,
    /// Current rank improved over the rank before the latest session
    Climber { from: u32, to: u32 },
}

/// Single-race points thresholds, highest first
const POINT_TIERS: &[(u32, Badge)] = &[
    (950, Badge::Goat),
    (900, Badge::Club900),
    (800, Badge::Club800),
    (700, Badge::Club700),
    (600, Badge::Club600),
    (500, Badge::Club500),
];

impl Badge {
    pub fn name(&self) -> &'static str {
        match self {
            Badge::Goat => "The GOAT",
            Badge::Club900 => "900 Club",
            Badge::Club800 => "800 Club",
            Badge::Club700 => "700 Club",
            Badge::Club600 => "600 Club",
            Badge::Club500 => "500 Club",
            Badge::Speedster => "Speedster",
            Badge::EnduranceBeast => "Endurance Beast",
            Badge::StreakWins => "Streak Wins",
            Badge::EmergingStar => "Emerging Star",
            Badge::PodiumRegular => "Podium Regular",
            Badge::Climber { .. } => "Climber",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Badge::Goat => "Legendary Status: 950+ points in a race".to_string(),
            Badge::Club900 => "Elite Performance: 900+ points in a race".to_string(),
            Badge::Club800 => "High Performance: 800+ points in a race".to_string(),
            Badge::Club700 => "Strong Performance: 700+ points in a race".to_string(),
            Badge::Club600 => "Solid Performance: 600+ points in a race".to_string(),
            Badge::Club500 => "Breaking Through: 500+ points in a race".to_string(),
            Badge::Speedster => "Elite speed in short distances".to_string(),
            Badge::EnduranceBeast => "Dominance in long distance events".to_string(),
            Badge::StreakWins => "Won consecutive races".to_string(),
            Badge::EmergingStar => "Outstanding start to the season".to_string(),
            Badge::PodiumRegular => "Consistent: 3+ podium finishes".to_string(),
            Badge::Climber { from, to } => {
                format!("Moved up from #{} to #{} this week", from, to)
            }
        }
    }
}

fn is_short_event(event: &EventStandard) -> bool {
    event.name.contains("1500") || event.name.contains("3000") || event.gold_time < 600.0
}

fn is_long_event(event: &EventStandard) -> bool {
    event.name.contains("7km") || event.name.contains("10km") || event.gold_time > 1200.0
}

/// Badges earned by `athlete_id`, given their results newest first
/// (as produced by `athlete_results`).
pub fn get_badges(
    data: &ClubData<'_>,
    athlete_id: &str,
    results: &[ResultLine],
    config: &ScoringConfig,
) -> Vec<Badge> {
    let mut badges = Vec::new();

    let max_points = results.iter().map(|l| l.result.points).max().unwrap_or(0);
    if let Some((_, tier)) = POINT_TIERS.iter().find(|(min, _)| max_points >= *min) {
        badges.push(*tier);
    }

    let speed_points = config.speed_points();
    let excels_in = |matches: fn(&EventStandard) -> bool| {
        results.iter().any(|l| {
            l.result.points > speed_points
                && data.standard(&l.event_id).is_some_and(matches)
        })
    };
    if excels_in(is_short_event) {
        badges.push(Badge::Speedster);
    }
    if excels_in(is_long_event) {
        badges.push(Badge::EnduranceBeast);
    }

    // Penalty rows neither extend nor break a streak.
    let win_streak = results
        .iter()
        .filter(|l| l.result.is_finish())
        .take_while(|l| l.result.rank == 1)
        .count();
    if win_streak >= 2 {
        badges.push(Badge::StreakWins);
    }

    let runs = results.iter().filter(|l| l.result.is_finish()).count();
    let total: u64 = results.iter().map(|l| u64::from(l.result.points)).sum();
    let average = if results.is_empty() {
        0.0
    } else {
        total as f64 / results.len() as f64
    };
    if (1..=5).contains(&runs) && average > 700.0 {
        badges.push(Badge::EmergingStar);
    }

    let podiums = results
        .iter()
        .filter(|l| l.result.is_finish() && l.result.rank <= 3)
        .count();
    if podiums >= 3 {
        badges.push(Badge::PodiumRegular);
    }

    if let Some(climb) = climber(data, athlete_id) {
        badges.push(climb);
    }

    badges
}

/// Compare current rank with the rank over every session except the latest.
/// Needs at least two sessions and some history before the latest one.
fn climber(data: &ClubData<'_>, athlete_id: &str) -> Option<Badge> {
    if data.sessions.len() < 2 {
        return None;
    }
    let latest = latest_session(data.sessions)?;
    let earlier = || data.sessions.iter().filter(move |s| s.id != latest.id);

    let has_history = earlier().any(|s| s.result_for(athlete_id).is_some());
    let now = current_rank(athlete_id, data.athletes, data.sessions);
    if !has_history || now == 0 {
        return None;
    }

    let before = current_rank(athlete_id, data.athletes, earlier());
    (before > 0 && now < before).then_some(Badge::Climber {
        from: before,
        to: now,
    })
}

/// Most recent session by date; the first stored wins a same-day tie
fn latest_session(sessions: &[RaceSession]) -> Option<&RaceSession> {
    sessions.iter().fold(None, |latest: Option<&RaceSession>, s| match latest {
        Some(l) if cmp_dates(&s.date, &l.date).is_le() => Some(l),
        _ => Some(s),
    })
}
