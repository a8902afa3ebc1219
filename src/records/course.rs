use std::collections::HashMap;

use crate::model::ClubData;

use super::{sort_by_time, RecordMode, RecordRow, RecordSource};

/// Leaderboard for one route, fastest first. Built from session finishes
/// only; manual PBs carry no route.
pub fn course_records(data: &ClubData<'_>, route_id: &str, mode: RecordMode) -> Vec<RecordRow> {
    let runs = data
        .sessions
        .iter()
        .filter(|s| s.route() == Some(route_id))
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
                        venue: None,
                        session_name: Some(session.name.clone()),
                        points: r.points,
                        source: RecordSource::Session,
                    })
                })
        });

    let mut rows: Vec<RecordRow> = match mode {
        RecordMode::All => runs.collect(),
        RecordMode::Best => {
            // Rows keep the slot of the athlete's first run so ties sort stably
            let mut best: Vec<RecordRow> = Vec::new();
            let mut slots: HashMap<String, usize> = HashMap::new();
            for row in runs {
                match slots.get(&row.athlete_id) {
                    Some(&idx) if best[idx].time <= row.time => {}
                    Some(&idx) => best[idx] = row,
                    None => {
                        slots.insert(row.athlete_id.clone(), best.len());
                        best.push(row);
                    }
                }
            }
            best
        }
    };
    sort_by_time(&mut rows);
    rows
}
