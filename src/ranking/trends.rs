use std::collections::HashMap;

use crate::model::{Athlete, ClubData};

/// Points each selected athlete scored in one session
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub session_id: String,
    pub date: String,
    pub session_name: String,
    /// Parallel to the requested athlete ids; `None` when absent
    pub points: Vec<Option<u32>>,
}

/// Per-session points for `athlete_ids`, oldest session first.
/// Sessions where none of them appear are skipped.
pub fn points_trend(data: &ClubData<'_>, athlete_ids: &[&str]) -> Vec<TrendPoint> {
    data.chronological_sessions()
        .into_iter()
        .filter_map(|session| {
            let points: Vec<Option<u32>> = athlete_ids
                .iter()
                .map(|id| {
                    session
                        .results
                        .iter()
                        .rev()
                        .find(|r| r.athlete_id == *id)
                        .map(|r| r.points)
                })
                .collect();
            points.iter().any(Option::is_some).then(|| TrendPoint {
                session_id: session.id.clone(),
                date: session.date.clone(),
                session_name: session.name.clone(),
                points,
            })
        })
        .collect()
}

/// The `limit` athletes who appear in the most sessions, ties by name
pub fn most_active<'a>(data: &ClubData<'a>, limit: usize) -> Vec<(&'a Athlete, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for session in data.sessions {
        let mut seen: Vec<&str> = session.results.iter().map(|r| r.athlete_id.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        for id in seen {
            *counts.entry(id).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&Athlete, usize)> = data
        .athletes
        .iter()
        .filter_map(|a| counts.get(a.id.as_str()).map(|&n| (a, n)))
        .collect();
    ranked.sort_by(|(a, n_a), (b, n_b)| {
        n_b.cmp(n_a)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::{athlete, result, session};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_points_trend_chronological() {
        let sessions = vec![
            session("s2", "2024-02-01", vec![result("b", 250.0, 880, 1)]),
            session(
                "s1",
                "2024-01-01",
                vec![result("a", 250.0, 900, 1), result("b", 260.0, 800, 2)],
            ),
            session("s3", "2024-03-01", vec![result("c", 250.0, 700, 1)]),
        ];
        let data = ClubData {
            athletes: &[],
            standards: &[],
            sessions: &sessions,
            routes: &[],
        };
        let trend = points_trend(&data, &["a", "b"]);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].session_id, "s1");
        assert_eq!(trend[0].points, vec![Some(900), Some(800)]);
        assert_eq!(trend[1].points, vec![None, Some(880)]);
    }

    #[test]
    fn test_points_trend_last_row_wins() {
        let sessions = vec![session(
            "s1",
            "2024-01-01",
            vec![result("a", 250.0, 900, 1), result("a", 0.0, 300, 2)],
        )];
        let data = ClubData {
            athletes: &[],
            standards: &[],
            sessions: &sessions,
            routes: &[],
        };
        assert_eq!(points_trend(&data, &["a"])[0].points, vec![Some(300)]);
    }

    #[test]
    fn test_most_active() {
        let athletes = vec![
            athlete("a", "Ann", true),
            athlete("b", "Ben", true),
            athlete("c", "Cat", false),
        ];
        let sessions = vec![
            session(
                "s1",
                "2024-01-01",
                vec![result("a", 250.0, 900, 1), result("b", 260.0, 800, 2)],
            ),
            session("s2", "2024-02-01", vec![result("b", 250.0, 880, 1)]),
            session("s3", "2024-03-01", vec![result("c", 250.0, 700, 1)]),
        ];
        let data = ClubData {
            athletes: &athletes,
            standards: &[],
            sessions: &sessions,
            routes: &[],
        };
        let top: Vec<(&str, usize)> = most_active(&data, 2)
            .into_iter()
            .map(|(a, n)| (a.id.as_str(), n))
            .collect();
        assert_eq!(top, vec![("b", 2), ("a", 1)]);
    }
}
