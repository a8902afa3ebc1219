use std::cmp::Ordering;

use crate::error::TrackerError;
use crate::model::{cmp_dates, ClubData, RaceResult};
use crate::scoring::{get_event_distance, ScoringConfig};

use super::badges::{get_badges, Badge};
use super::replay::{career_stats, CareerStats};
use super::standings::{current_rank, round_average};

/// One of an athlete's results joined with its session context
#[derive(Debug, Clone, PartialEq)]
pub struct ResultLine {
    pub session_id: String,
    pub session_name: String,
    pub date: String,
    pub event_id: String,
    pub result: RaceResult,
}

/// Every result an athlete has, newest session first
pub fn athlete_results(data: &ClubData<'_>, athlete_id: &str) -> Vec<ResultLine> {
    let mut lines: Vec<ResultLine> = data
        .sessions
        .iter()
        .flat_map(move |session| {
            session
                .results
                .iter()
                .filter(move |r| r.athlete_id == athlete_id)
                .map(move |r| ResultLine {
                    session_id: session.id.clone(),
                    session_name: session.name.clone(),
                    date: session.date.clone(),
                    event_id: session.event_id.clone(),
                    result: r.clone(),
                })
        })
        .collect();
    lines.sort_by(|a, b| newest_first(&a.date, &b.date));
    lines
}

fn newest_first(a: &str, b: &str) -> Ordering {
    cmp_dates(b, a)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AthleteProfile {
    pub athlete_id: String,
    pub name: String,
    pub is_active: bool,
    /// 0 when retired
    pub rank: u32,
    pub races_run: u32,
    pub wins: u32,
    pub podiums: u32,
    pub total_points: u64,
    pub average_points: u32,
    pub total_distance_m: f64,
    pub recent_results: Vec<ResultLine>,
    pub badges: Vec<Badge>,
    pub career: CareerStats,
}

/// Career totals, current standing, badges and history for one athlete
pub fn athlete_profile(
    data: &ClubData<'_>,
    athlete_id: &str,
    config: &ScoringConfig,
) -> Result<AthleteProfile, TrackerError> {
    let athlete = data
        .athlete(athlete_id)
        .ok_or_else(|| TrackerError::UnknownAthlete {
            athlete_id: athlete_id.to_string(),
        })?;

    let results = athlete_results(data, athlete_id);
    let finishes = || results.iter().filter(|line| line.result.is_finish());

    let total_points: u64 = results.iter().map(|l| u64::from(l.result.points)).sum();
    let total_distance_m: f64 = finishes()
        .map(|line| {
            data.standard(&line.event_id)
                .map_or(0.0, |event| get_event_distance(&event.name))
        })
        .sum();

    Ok(AthleteProfile {
        athlete_id: athlete.id.clone(),
        name: athlete.name.clone(),
        is_active: athlete.is_active,
        rank: current_rank(athlete_id, data.athletes, data.sessions),
        races_run: finishes().count() as u32,
        wins: finishes().filter(|l| l.result.rank == 1).count() as u32,
        podiums: finishes()
            .filter(|l| (1..=3).contains(&l.result.rank))
            .count() as u32,
        total_points,
        average_points: round_average(total_points, results.len() as u32),
        total_distance_m,
        badges: get_badges(data, athlete_id, &results, config),
        career: career_stats(data, athlete_id),
        recent_results: results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{athlete, result, session, standards};

    #[test]
    fn test_unknown_athlete() {
        let data = ClubData {
            athletes: &[],
            standards: &[],
            sessions: &[],
            routes: &[],
        };
        let err = athlete_profile(&data, "ghost", &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownAthlete { .. }));
    }

    #[test]
    fn test_results_newest_first() {
        let sessions = vec![
            session("s1", "2024-01-01", vec![result("a", 250.0, 900, 1)]),
            session("s3", "2024-03-01", vec![result("a", 255.0, 880, 2)]),
            session("s2", "2024-02-01", vec![result("b", 255.0, 880, 1)]),
        ];
        let data = ClubData {
            athletes: &[],
            standards: &[],
            sessions: &sessions,
            routes: &[],
        };
        let ids: Vec<String> = athlete_results(&data, "a")
            .into_iter()
            .map(|l| l.session_id)
            .collect();
        assert_eq!(ids, vec!["s3", "s1"]);
    }

    #[test]
    fn test_profile_totals() {
        let athletes = vec![athlete("a", "Ann", true), athlete("b", "Ben", true)];
        let standards = standards();
        let mut s3 = session(
            "s3",
            "2024-03-01",
            vec![result("b", 960.0, 1010, 1), result("a", 0.0, 400, 2)],
        );
        s3.event_id = "3".to_string();
        let sessions = vec![
            session(
                "s1",
                "2024-01-01",
                vec![result("a", 250.0, 900, 1), result("b", 260.0, 800, 2)],
            ),
            session(
                "s2",
                "2024-02-01",
                vec![result("b", 250.0, 900, 1), result("a", 255.0, 880, 2)],
            ),
            s3,
        ];
        let data = ClubData {
            athletes: &athletes,
            standards: &standards,
            sessions: &sessions,
            routes: &[],
        };
        let profile = athlete_profile(&data, "a", &ScoringConfig::default()).unwrap();
        assert_eq!(profile.races_run, 2);
        assert_eq!(profile.wins, 1);
        assert_eq!(profile.podiums, 2);
        assert_eq!(profile.total_points, 2180);
        assert_eq!(profile.average_points, 727);
        assert_eq!(profile.total_distance_m, 3000.0);
        assert_eq!(profile.recent_results.len(), 3);
        assert_eq!(profile.rank, 2);
        assert_eq!(profile.career.best_rank, 1);
        assert_eq!(profile.career.highest_average, 900);
    }
}
