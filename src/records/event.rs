use std::collections::HashSet;

use crate::model::types::non_empty;
use crate::model::{ClubData, EventStandard, PersonalBest};
use crate::scoring::calculate_points;

use super::{sort_by_time, RecordMode, RecordRow, RecordSource};

/// Leaderboard for one event, fastest first.
///
/// `Best` lists each athlete's manually tracked PB. `All` lists every session
/// finish plus any PB that doesn't duplicate one of those finishes, matched on
/// athlete, time and date. An unknown event yields no rows.
pub fn event_records(data: &ClubData<'_>, event_id: &str, mode: RecordMode) -> Vec<RecordRow> {
    let Some(event) = data.standard(event_id) else {
        log::debug!("No standard for event {}; no records", event_id);
        return Vec::new();
    };

    let mut rows = match mode {
        RecordMode::Best => manual_rows(data, event).collect(),
        RecordMode::All => {
            let mut rows = session_rows(data, event_id);
            let seen: HashSet<(&str, u64, &str)> = rows
                .iter()
                .map(|r| (r.athlete_id.as_str(), r.time.to_bits(), r.date.as_deref().unwrap_or("")))
                .collect();
            let extra: Vec<RecordRow> = manual_rows(data, event)
                .filter(|r| {
                    !seen.contains(&(
                        r.athlete_id.as_str(),
                        r.time.to_bits(),
                        r.date.as_deref().unwrap_or(""),
                    ))
                })
                .collect();
            rows.extend(extra);
            rows
        }
    };
    sort_by_time(&mut rows);
    rows
}

fn session_rows(data: &ClubData<'_>, event_id: &str) -> Vec<RecordRow> {
    data.sessions
        .iter()
        .filter(|s| s.event_id == event_id)
        .flat_map(|session| {
            session
                .results
                .iter()
                .filter(|r| r.is_finish())
                .filter_map(move |r| {
                    let athlete = data.athlete(&r.athlete_id)?;
                    Some(RecordRow {
                        athlete_id: athlete.id.clone(),
                        athlete_name: athlete.name.clone(),
                        time: r.time,
                        date: Some(session.date.clone()),
                        venue: Some(session.venue_or_name().to_string()),
                        session_name: Some(session.name.clone()),
                        points: r.points,
                        source: RecordSource::Session,
                    })
                })
        })
        .collect()
}

fn manual_rows<'a>(
    data: &ClubData<'a>,
    event: &'a EventStandard,
) -> impl Iterator<Item = RecordRow> + 'a {
    data.athletes.iter().filter_map(move |athlete| {
        let PersonalBest {
            time, date, venue, ..
        } = athlete.personal_best(&event.id)?;
        Some(RecordRow {
            athlete_id: athlete.id.clone(),
            athlete_name: athlete.name.clone(),
            time: *time,
            date: non_empty(date.as_deref()).map(str::to_string),
            venue: non_empty(venue.as_deref()).map(str::to_string),
            session_name: None,
            points: calculate_points(*time, event.gold_time, event.k_value),
            source: RecordSource::Manual,
        })
    })
}
