use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Athlete, ClubData, RaceResult, RaceSession};

use super::replay::career_stats;

/// Running totals for one athlete over a set of sessions.
///
/// `entries` counts every row (races and penalties); `races_run` only rows
/// with a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AthleteTotals {
    pub total_points: u64,
    pub entries: u32,
    pub races_run: u32,
}

impl AthleteTotals {
    pub fn add(&mut self, result: &RaceResult) {
        self.total_points += u64::from(result.points);
        self.entries += 1;
        if result.is_finish() {
            self.races_run += 1;
        }
    }

    /// Rounded average over all entries, penalties included
    pub fn average(&self) -> u32 {
        round_average(self.total_points, self.entries)
    }
}

pub fn round_average(total: u64, count: u32) -> u32 {
    if count == 0 {
        0
    } else {
        (total as f64 / f64::from(count)).round() as u32
    }
}

/// Sum every result per athlete id across `sessions`
pub fn tally<'a, I>(sessions: I) -> HashMap<&'a str, AthleteTotals>
where
    I: IntoIterator<Item = &'a RaceSession>,
{
    let mut totals: HashMap<&str, AthleteTotals> = HashMap::new();
    for session in sessions {
        for result in &session.results {
            totals.entry(result.athlete_id.as_str()).or_default().add(result);
        }
    }
    totals
}

/// Leaderboard order: average descending, then name (case-insensitive),
/// then id. Names are expected pre-lowercased.
pub(crate) fn standing_cmp(a: (u32, &str, &str), b: (u32, &str, &str)) -> Ordering {
    b.0.cmp(&a.0)
        .then_with(|| a.1.cmp(b.1))
        .then_with(|| a.2.cmp(b.2))
}

/// Lowercased display names keyed by athlete id, for tie-breaking
pub(crate) fn sort_names(athletes: &[Athlete]) -> HashMap<&str, String> {
    athletes
        .iter()
        .map(|a| (a.id.as_str(), a.name.to_lowercase()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub rank: u32,
    pub athlete_id: String,
    pub name: String,
    pub totals: AthleteTotals,
    pub average_points: u32,
}

/// Current leaderboard: every active athlete, ranked by average points.
/// Athletes without results sit at average 0.
pub fn standings<'a, I>(athletes: &[Athlete], sessions: I) -> Vec<StandingRow>
where
    I: IntoIterator<Item = &'a RaceSession>,
{
    let totals = tally(sessions);
    let mut rows: Vec<(StandingRow, String)> = athletes
        .iter()
        .filter(|a| a.is_active)
        .map(|a| {
            let t = totals.get(a.id.as_str()).copied().unwrap_or_default();
            let row = StandingRow {
                rank: 0,
                athlete_id: a.id.clone(),
                name: a.name.clone(),
                totals: t,
                average_points: t.average(),
            };
            (row, a.name.to_lowercase())
        })
        .collect();

    rows.sort_by(|(a, a_name), (b, b_name)| {
        standing_cmp(
            (a.average_points, a_name, &a.athlete_id),
            (b.average_points, b_name, &b.athlete_id),
        )
    });

    rows.into_iter()
        .enumerate()
        .map(|(idx, (mut row, _))| {
            row.rank = idx as u32 + 1;
            row
        })
        .collect()
}

/// Current rank of an athlete; 0 when retired or not on the roster
pub fn current_rank<'a, I>(athlete_id: &str, athletes: &[Athlete], sessions: I) -> u32
where
    I: IntoIterator<Item = &'a RaceSession>,
{
    standings(athletes, sessions)
        .iter()
        .find(|row| row.athlete_id == athlete_id)
        .map_or(0, |row| row.rank)
}

/// Roster order: active athletes by current rank, then retired athletes by
/// peak average (descending). Ties fall back to name.
///
/// `query` keeps athletes whose name, faculty or batch contains it
/// (case-insensitive).
pub fn roster_order<'a>(data: &ClubData<'a>, query: Option<&str>) -> Vec<&'a Athlete> {
    let ranks: HashMap<&str, u32> = standings(data.athletes, data.sessions)
        .into_iter()
        .filter_map(|row| {
            data.athlete(&row.athlete_id)
                .map(|a| (a.id.as_str(), row.rank))
        })
        .collect();

    let peaks: HashMap<&str, u32> = data
        .athletes
        .iter()
        .filter(|a| !a.is_active)
        .map(|a| (a.id.as_str(), career_stats(data, &a.id).highest_average))
        .collect();

    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut roster: Vec<&Athlete> = data
        .athletes
        .iter()
        .filter(|a| match &needle {
            Some(q) => {
                a.name.to_lowercase().contains(q)
                    || a.faculty.as_deref().is_some_and(|f| f.to_lowercase().contains(q))
                    || a.batch.as_deref().is_some_and(|b| b.to_lowercase().contains(q))
            }
            None => true,
        })
        .collect();

    roster.sort_by(|a, b| {
        b.is_active
            .cmp(&a.is_active)
            .then_with(|| {
                if a.is_active {
                    let rank_a = ranks.get(a.id.as_str()).copied().unwrap_or(u32::MAX);
                    let rank_b = ranks.get(b.id.as_str()).copied().unwrap_or(u32::MAX);
                    rank_a.cmp(&rank_b)
                } else {
                    let peak_a = peaks.get(a.id.as_str()).copied().unwrap_or(0);
                    let peak_b = peaks.get(b.id.as_str()).copied().unwrap_or(0);
                    peak_b.cmp(&peak_a)
                }
            })
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{athlete, result, session};

    #[test]
    fn test_average_includes_penalties() {
        let sessions = vec![
            session("s1", "2024-01-01", vec![result("a", 250.0, 900, 1)]),
            session("s2", "2024-02-01", vec![result("a", 0.0, 500, 3)]),
        ];
        let totals = tally(&sessions);
        let a = totals["a"];
        assert_eq!(a.total_points, 1400);
        assert_eq!(a.entries, 2);
        assert_eq!(a.races_run, 1);
        assert_eq!(a.average(), 700);
    }

    #[test]
    fn test_round_average() {
        assert_eq!(round_average(0, 0), 0);
        assert_eq!(round_average(1001, 2), 501);
        assert_eq!(round_average(1000, 3), 333);
    }

    #[test]
    fn test_standings_rank_active_only() {
        let athletes = vec![
            athlete("a", "Ann", true),
            athlete("b", "Ben", true),
            athlete("r", "Rex", false),
        ];
        let sessions = vec![session(
            "s1",
            "2024-01-01",
            vec![
                result("r", 240.0, 1010, 1),
                result("b", 250.0, 900, 2),
                result("a", 260.0, 850, 3),
            ],
        )];
        let rows = standings(&athletes, &sessions);
        let ids: Vec<&str> = rows.iter().map(|r| r.athlete_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(current_rank("r", &athletes, &sessions), 0);
        assert_eq!(current_rank("a", &athletes, &sessions), 2);
        assert_eq!(current_rank("missing", &athletes, &sessions), 0);
    }

    #[test]
    fn test_ties_break_by_name() {
        let athletes = vec![athlete("z", "zoe", true), athlete("y", "Adam", true)];
        let sessions = vec![session(
            "s1",
            "2024-01-01",
            vec![result("z", 250.0, 800, 1), result("y", 250.0, 800, 1)],
        )];
        let rows = standings(&athletes, &sessions);
        assert_eq!(rows[0].name, "Adam");
        assert_eq!(rows[1].name, "zoe");
    }

    #[test]
    fn test_dangling_results_do_not_affect_others() {
        let athletes = vec![athlete("a", "Ann", true), athlete("b", "Ben", true)];
        let sessions = vec![session(
            "s1",
            "2024-01-01",
            vec![
                result("deleted", 240.0, 1000, 1),
                result("a", 250.0, 900, 2),
                result("b", 260.0, 850, 3),
            ],
        )];
        assert_eq!(current_rank("a", &athletes, &sessions), 1);
        assert_eq!(current_rank("b", &athletes, &sessions), 2);
    }

    #[test]
    fn test_roster_order_active_then_retired() {
        let athletes = vec![
            athlete("r1", "Old Timer", false),
            athlete("a", "Ann", true),
            athlete("r2", "Legend", false),
            athlete("b", "Ben", true),
        ];
        let sessions = vec![session(
            "s1",
            "2024-01-01",
            vec![
                result("r2", 240.0, 990, 1),
                result("b", 250.0, 900, 2),
                result("a", 260.0, 850, 3),
                result("r1", 300.0, 700, 4),
            ],
        )];
        let data = ClubData {
            athletes: &athletes,
            standards: &[],
            sessions: &sessions,
            routes: &[],
        };
        let ids: Vec<&str> = roster_order(&data, None).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "r2", "r1"]);

        let found: Vec<&str> = roster_order(&data, Some("LEG"))
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(found, vec!["r2"]);
    }
}
