//! Plain-text summaries of club data, written for a coaching assistant or a
//! human reader. Sections are markdown.

use crate::error::TrackerError;
use crate::model::{cmp_dates, ClubData, RaceSession};
use crate::ranking::{athlete_results, round_average};
use crate::time_codec::format_time;

/// `name: Gold=<time> (k=..)` for every standard, `; `-separated
pub fn standards_line(data: &ClubData<'_>) -> String {
    data.standards
        .iter()
        .map(|s| format!("{}: Gold={} (k={})", s.name, format_time(s.gold_time), s.k_value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Team overview: standards, active roster averages and the `recent` most
/// recent sessions.
pub fn team_summary(data: &ClubData<'_>, recent: usize) -> String {
    let mut lines = vec![
        "## Team Overview".to_string(),
        String::new(),
        format!("Standards: {}", standards_line(data)),
        String::new(),
        "### Active Roster".to_string(),
    ];

    for athlete in data.athletes.iter().filter(|a| a.is_active) {
        let (total, count) = data
            .sessions
            .iter()
            .flat_map(|s| s.results.iter())
            .filter(|r| r.athlete_id == athlete.id)
            .fold((0u64, 0u32), |(total, count), r| {
                (total + u64::from(r.points), count + 1)
            });
        lines.push(format!(
            "- {} ({}): Avg {} pts over {} events.",
            athlete.name,
            athlete.faculty.as_deref().unwrap_or("-"),
            round_average(total, count),
            count
        ));
    }

    let mut sessions: Vec<&RaceSession> = data.sessions.iter().collect();
    sessions.sort_by(|a, b| cmp_dates(&b.date, &a.date));

    lines.push(String::new());
    lines.push("### Recent Competitions".to_string());
    for session in sessions.into_iter().take(recent) {
        let winner = session
            .results
            .first()
            .map_or("N/A", |r| data.athlete_name(&r.athlete_id));
        lines.push(format!(
            "* {} ({}) on {}: Winner {}, {} participants.",
            session.name,
            data.event_name(&session.event_id),
            session.date,
            winner,
            session.results.len()
        ));
    }
    lines.join("\n")
}

/// Results table for one session
pub fn session_summary(data: &ClubData<'_>, session_id: &str) -> Result<String, TrackerError> {
    let session = data
        .session(session_id)
        .ok_or_else(|| TrackerError::UnknownSession {
            session_id: session_id.to_string(),
        })?;

    let mut lines = vec![
        format!("## Session: {} ({})", session.name, data.event_name(&session.event_id)),
        format!("Date: {}", session.date),
        String::new(),
        "| Rank | Athlete | Time | Points | Tags |".to_string(),
        "|------|---------|------|--------|------|".to_string(),
    ];
    lines.extend(session.results.iter().map(|r| {
        let tags: Vec<&str> = r.tags.iter().map(|t| t.label()).collect();
        format!(
            "| {} | {} | {} | {} | {} |",
            r.rank,
            data.athlete_name(&r.athlete_id),
            format_time(r.time),
            r.points,
            tags.join(", ")
        )
    }));
    Ok(lines.join("\n"))
}

/// PB list and full history, latest first, for one athlete
pub fn athlete_summary(data: &ClubData<'_>, athlete_id: &str) -> Result<String, TrackerError> {
    let athlete = data
        .athlete(athlete_id)
        .ok_or_else(|| TrackerError::UnknownAthlete {
            athlete_id: athlete_id.to_string(),
        })?;

    let pbs: Vec<String> = athlete
        .personal_bests
        .iter()
        .map(|pb| format!("{}: {}", data.event_name(&pb.event_id), format_time(pb.time)))
        .collect();

    let mut lines = vec![
        format!(
            "## Athlete: {} ({}, Batch {})",
            athlete.name,
            athlete.faculty.as_deref().unwrap_or("-"),
            athlete.batch.as_deref().unwrap_or("-")
        ),
        format!("Personal Bests: {}", pbs.join(", ")),
        String::new(),
        "### Competition History (Latest First)".to_string(),
    ];
    lines.extend(athlete_results(data, athlete_id).into_iter().map(|line| {
        format!(
            "- {}: {} ({}) -> {} ({} pts, Rank #{})",
            line.date,
            line.session_name,
            data.event_name(&line.event_id),
            format_time(line.result.time),
            line.result.points,
            line.result.rank
        )
    }));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PersonalBest, Tag};
    use crate::ranking::test_support::{athlete, result, session, standards};

    #[test]
    fn test_standards_line() {
        let standards = standards();
        let data = ClubData {
            athletes: &[],
            standards: &standards[..2],
            sessions: &[],
            routes: &[],
        };
        assert_eq!(
            standards_line(&data),
            "1500m: Gold=4:05.00 (k=1.1); 3000m: Gold=9:20.00 (k=1.1)"
        );
    }

    #[test]
    fn test_team_summary() {
        let mut ann = athlete("a", "Ann", true);
        ann.faculty = Some("Engineering".to_string());
        let athletes = vec![ann, athlete("r", "Rex", false)];
        let standards = standards();
        let sessions = vec![
            session("s1", "2024-01-01", vec![result("a", 250.0, 900, 1)]),
            session(
                "s2",
                "2024-02-01",
                vec![result("gone", 240.0, 990, 1), result("a", 0.0, 401, 2)],
            ),
        ];
        let data = ClubData {
            athletes: &athletes,
            standards: &standards,
            sessions: &sessions,
            routes: &[],
        };
        let text = team_summary(&data, 1);
        assert!(text.contains("- Ann (Engineering): Avg 651 pts over 2 events."));
        assert!(!text.contains("Rex"));
        assert!(text.contains("* Session s2 (1500m) on 2024-02-01: Winner Unknown, 2 participants."));
        assert!(!text.contains("Session s1 (1500m)"));
    }

    #[test]
    fn test_session_summary_table() {
        let athletes = vec![athlete("a", "Ann", true)];
        let mut r = result("a", 250.0, 980, 1);
        r.tags = vec![Tag::PersonalBest, Tag::SeasonBest];
        let sessions = vec![session("s1", "2024-01-01", vec![r])];
        let data = ClubData {
            athletes: &athletes,
            standards: &[],
            sessions: &sessions,
            routes: &[],
        };
        let text = session_summary(&data, "s1").unwrap();
        assert!(text.contains("| 1 | Ann | 4:10.00 | 980 | PB, SB |"));
        assert_eq!(text.lines().count(), 6);
        assert!(matches!(
            session_summary(&data, "nope"),
            Err(TrackerError::UnknownSession { .. })
        ));
    }

    #[test]
    fn test_athlete_summary() {
        let mut ann = athlete("a", "Ann", true);
        ann.personal_bests.push(PersonalBest {
            event_id: "1".to_string(),
            time: 250.0,
            date: None,
            venue: None,
        });
        let athletes = vec![ann];
        let standards = standards();
        let sessions = vec![
            session("s1", "2024-01-01", vec![result("a", 255.0, 950, 2)]),
            session("s2", "2024-02-01", vec![result("a", 250.0, 980, 1)]),
        ];
        let data = ClubData {
            athletes: &athletes,
            standards: &standards,
            sessions: &sessions,
            routes: &[],
        };
        let text = athlete_summary(&data, "a").unwrap();
        assert!(text.contains("Personal Bests: 1500m: 4:10.00"));
        let first = text.find("2024-02-01").unwrap();
        let second = text.find("2024-01-01").unwrap();
        assert!(first < second);
        assert!(text.contains("- 2024-02-01: Session s2 (1500m) -> 4:10.00 (980 pts, Rank #1)"));
    }
}
