pub mod dates;
pub mod snapshot;
pub mod types;

pub use dates::{calendar_year, cmp_dates, parse_date};
pub use snapshot::Snapshot;
pub use types::{Athlete, EventStandard, PersonalBest, RaceResult, RaceSession, Route, Tag};

/// Borrowed view over the four club collections.
///
/// All derived views (standings, records, badges, reports) read through this;
/// none of them assume ids resolve.
#[derive(Debug, Clone, Copy)]
pub struct ClubData<'a> {
    pub athletes: &'a [Athlete],
    pub standards: &'a [EventStandard],
    pub sessions: &'a [RaceSession],
    pub routes: &'a [Route],
}

impl<'a> ClubData<'a> {
    pub fn athlete(&self, id: &str) -> Option<&'a Athlete> {
        self.athletes.iter().find(|a| a.id == id)
    }

    pub fn standard(&self, id: &str) -> Option<&'a EventStandard> {
        self.standards.iter().find(|s| s.id == id)
    }

    pub fn route(&self, id: &str) -> Option<&'a Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    pub fn session(&self, id: &str) -> Option<&'a RaceSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Display name for an athlete id, "Unknown" when it no longer resolves
    pub fn athlete_name(&self, id: &str) -> &'a str {
        self.athlete(id).map(|a| a.name.as_str()).unwrap_or("Unknown")
    }

    pub fn event_name(&self, id: &str) -> &'a str {
        self.standard(id).map(|s| s.name.as_str()).unwrap_or("Unknown")
    }

    /// Sessions in ascending date order; same-day sessions keep stored order
    pub fn chronological_sessions(&self) -> Vec<&'a RaceSession> {
        let mut sessions: Vec<&RaceSession> = self.sessions.iter().collect();
        sessions.sort_by(|a, b| cmp_dates(&a.date, &b.date));
        sessions
    }
}
