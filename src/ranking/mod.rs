pub mod badges;
pub mod profile;
pub mod replay;
pub mod standings;
pub mod trends;

pub use badges::{get_badges, Badge};
pub use profile::{athlete_profile, athlete_results, AthleteProfile, ResultLine};
pub use replay::{career_stats, CareerStats};
pub use standings::{
    current_rank, round_average, roster_order, standings, tally, AthleteTotals, StandingRow,
};
pub use trends::{most_active, points_trend, TrendPoint};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{Athlete, EventStandard, RaceResult, RaceSession};

    pub fn athlete(id: &str, name: &str, is_active: bool) -> Athlete {
        Athlete {
            id: id.to_string(),
            name: name.to_string(),
            faculty: None,
            batch: None,
            photo_url: None,
            personal_bests: Vec::new(),
            is_active,
        }
    }

    pub fn result(athlete_id: &str, time: f64, points: u32, rank: u32) -> RaceResult {
        RaceResult {
            athlete_id: athlete_id.to_string(),
            time,
            points,
            rank,
            tags: Vec::new(),
            notes: None,
        }
    }

    /// A 1500m session with no route
    pub fn session(id: &str, date: &str, results: Vec<RaceResult>) -> RaceSession {
        RaceSession {
            id: id.to_string(),
            date: date.to_string(),
            name: format!("Session {}", id),
            venue: None,
            route_id: None,
            event_id: "1".to_string(),
            is_mandatory: false,
            results,
            notes: None,
        }
    }

    pub fn standards() -> Vec<EventStandard> {
        [
            ("1", "1500m", 245.0),
            ("2", "3000m", 560.0),
            ("3", "5000m", 970.0),
            ("4", "7km", 1460.0),
            ("5", "10km", 2070.0),
        ]
        .into_iter()
        .map(|(id, name, gold_time)| EventStandard {
            id: id.to_string(),
            name: name.to_string(),
            gold_time,
            k_value: 1.1,
        })
        .collect()
    }
}
