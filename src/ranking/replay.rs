use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::ClubData;

use super::standings::{sort_names, standing_cmp, AthleteTotals};

/// Career highs found by replaying session history in date order.
/// Both are 0 when the athlete never appears in a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CareerStats {
    pub best_rank: u32,
    pub highest_average: u32,
}

/// Replay every session chronologically, keeping running totals for all
/// athletes, and record the athlete's best historical rank and highest
/// running average.
///
/// Historical rank counts everyone with data at that point, retired or not.
pub fn career_stats(data: &ClubData<'_>, athlete_id: &str) -> CareerStats {
    let names = sort_names(data.athletes);
    let name_of = |id: &str| names.get(id).map(String::as_str).unwrap_or("unknown");

    let mut running: HashMap<&str, AthleteTotals> = HashMap::new();
    let mut best_rank: Option<u32> = None;
    let mut highest_average = 0;

    for session in data.chronological_sessions() {
        for result in &session.results {
            running
                .entry(result.athlete_id.as_str())
                .or_default()
                .add(result);
        }

        let Some(target) = running.get(athlete_id) else {
            continue;
        };
        let average = target.average();
        highest_average = highest_average.max(average);

        let key = (average, name_of(athlete_id), athlete_id);
        let ahead = running
            .iter()
            .filter(|&(&id, totals)| {
                id != athlete_id
                    && standing_cmp((totals.average(), name_of(id), id), key) == Ordering::Less
            })
            .count();
        let rank = ahead as u32 + 1;
        best_rank = Some(best_rank.map_or(rank, |best| best.min(rank)));
    }

    CareerStats {
        best_rank: best_rank.unwrap_or(0),
        highest_average,
    }
}
