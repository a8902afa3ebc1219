use chrono::Utc;

use crate::error::TrackerError;
use crate::model::{Athlete, ClubData, EventStandard, PersonalBest, RaceSession, Route, Snapshot};
use crate::ranking::{
    athlete_profile, most_active, points_trend, roster_order, standings, AthleteProfile,
    StandingRow, TrendPoint,
};
use crate::records::{course_records, event_records, RecordFilter, RecordMode, RecordRow};
use crate::scoring::{
    parse_entries, validate_standard, EntryDraft, RawEntry, ScoringConfig, SessionMeta,
    SessionScorer, DEFAULT_K_VALUE,
};

/// Standards a new club starts with
pub fn initial_standards() -> Vec<EventStandard> {
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
        k_value: DEFAULT_K_VALUE,
    })
    .collect()
}

/// Input for registering an athlete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAthlete {
    pub name: String,
    pub faculty: Option<String>,
    pub batch: Option<String>,
    pub photo_url: Option<String>,
    pub personal_bests: Vec<PersonalBest>,
}

/// Owner of all club data. Every command either applies fully or returns an
/// error with nothing changed.
#[derive(Debug, Clone, Default)]
pub struct Club {
    athletes: Vec<Athlete>,
    standards: Vec<EventStandard>,
    sessions: Vec<RaceSession>,
    routes: Vec<Route>,
    config: ScoringConfig,
}

impl Club {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            standards: initial_standards(),
            config,
            ..Default::default()
        }
    }

    /// Build from a stored snapshot. Missing standards fall back to the
    /// initial set; other missing collections start empty.
    pub fn from_snapshot(snapshot: Snapshot, config: ScoringConfig) -> Self {
        Self {
            athletes: snapshot.athletes.unwrap_or_default(),
            standards: snapshot.standards.unwrap_or_else(initial_standards),
            sessions: snapshot.sessions.unwrap_or_default(),
            routes: snapshot.routes.unwrap_or_default(),
            config,
        }
    }

    pub fn data(&self) -> ClubData<'_> {
        ClubData {
            athletes: &self.athletes,
            standards: &self.standards,
            sessions: &self.sessions,
            routes: &self.routes,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn athletes(&self) -> &[Athlete] {
        &self.athletes
    }

    pub fn standards(&self) -> &[EventStandard] {
        &self.standards
    }

    pub fn sessions(&self) -> &[RaceSession] {
        &self.sessions
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Register an athlete. Initial PBs must have a positive time and a
    /// known event; otherwise nothing is added.
    pub fn add_athlete(&mut self, new: NewAthlete) -> Result<String, TrackerError> {
        for best in &new.personal_bests {
            if !(best.time.is_finite() && best.time > 0.0) {
                return Err(TrackerError::invalid_format(best.time.to_string()));
            }
            if !self.standards.iter().any(|s| s.id == best.event_id) {
                return Err(TrackerError::unknown_event(&best.event_id));
            }
        }
        let id = next_id(|candidate| self.athletes.iter().any(|a| a.id == candidate));
        let mut athlete = Athlete {
            id: id.clone(),
            name: new.name,
            faculty: new.faculty,
            batch: new.batch,
            photo_url: new.photo_url,
            personal_bests: Vec::new(),
            is_active: true,
        };
        for best in new.personal_bests {
            athlete.set_personal_best(best);
        }
        log::debug!("Added athlete {} ({})", athlete.name, id);
        self.athletes.push(athlete);
        Ok(id)
    }

    /// Remove an athlete. Their past results stay in sessions and render as
    /// "Unknown".
    pub fn delete_athlete(&mut self, athlete_id: &str) -> Result<(), TrackerError> {
        let idx = self.athlete_index(athlete_id)?;
        self.athletes.remove(idx);
        Ok(())
    }

    /// Flip active/retired; returns the new `is_active`
    pub fn toggle_athlete_status(&mut self, athlete_id: &str) -> Result<bool, TrackerError> {
        let idx = self.athlete_index(athlete_id)?;
        let athlete = &mut self.athletes[idx];
        athlete.is_active = !athlete.is_active;
        Ok(athlete.is_active)
    }

    pub fn add_standard(
        &mut self,
        name: &str,
        gold_time: f64,
        k_value: f64,
    ) -> Result<String, TrackerError> {
        validate_standard(gold_time, k_value)
            .map_err(|message| TrackerError::InvalidStandard { message })?;
        let id = next_id(|candidate| self.standards.iter().any(|s| s.id == candidate));
        self.standards.push(EventStandard {
            id: id.clone(),
            name: name.to_string(),
            gold_time,
            k_value,
        });
        Ok(id)
    }

    /// Replace a standard by id. Stored points are not recomputed.
    pub fn update_standard(&mut self, standard: EventStandard) -> Result<(), TrackerError> {
        validate_standard(standard.gold_time, standard.k_value)
            .map_err(|message| TrackerError::InvalidStandard { message })?;
        let existing = self
            .standards
            .iter_mut()
            .find(|s| s.id == standard.id)
            .ok_or_else(|| TrackerError::unknown_event(&standard.id))?;
        *existing = standard;
        Ok(())
    }

    pub fn add_route(&mut self, name: &str, distance: &str, elevation: Option<&str>) -> String {
        let id = next_id(|candidate| self.routes.iter().any(|r| r.id == candidate));
        self.routes.push(Route {
            id: id.clone(),
            name: name.to_string(),
            distance: distance.to_string(),
            elevation: elevation.map(str::to_string).filter(|e| !e.is_empty()),
            description: None,
        });
        id
    }

    /// Remove a route. Sessions keep the now-dangling route id.
    pub fn delete_route(&mut self, route_id: &str) -> Result<(), TrackerError> {
        let idx = self
            .routes
            .iter()
            .position(|r| r.id == route_id)
            .ok_or_else(|| TrackerError::UnknownRoute {
                route_id: route_id.to_string(),
            })?;
        self.routes.remove(idx);
        Ok(())
    }

    /// Score and store a session, then write back any new PBs.
    /// An unknown event fails before anything is stored.
    pub fn record_session(
        &mut self,
        meta: SessionMeta,
        entries: &[EntryDraft],
    ) -> Result<&RaceSession, TrackerError> {
        let scored = SessionScorer {
            athletes: &self.athletes,
            standards: &self.standards,
            history: &self.sessions,
            config: &self.config,
        }
        .score(&meta, entries)?;

        for update in scored.pb_updates {
            if let Some(athlete) = self.athletes.iter_mut().find(|a| a.id == update.athlete_id) {
                log::debug!(
                    "New PB for {} in event {}: {}s",
                    athlete.name,
                    update.best.event_id,
                    update.best.time
                );
                athlete.set_personal_best(update.best);
            }
        }

        let id = next_id(|candidate| self.sessions.iter().any(|s| s.id == candidate));
        log::info!(
            "Recorded session '{}' ({}) with {} results",
            meta.name,
            id,
            scored.results.len()
        );
        self.sessions.push(RaceSession {
            id,
            date: meta.date,
            name: meta.name,
            venue: meta.venue,
            route_id: meta.route_id,
            event_id: meta.event_id,
            is_mandatory: meta.is_mandatory,
            results: scored.results,
            notes: meta.notes,
        });
        Ok(&self.sessions[self.sessions.len() - 1])
    }

    /// Validate raw form rows, then record them
    pub fn record_raw_session(
        &mut self,
        meta: SessionMeta,
        raw: &[RawEntry],
    ) -> Result<&RaceSession, TrackerError> {
        let entries = parse_entries(raw);
        self.record_session(meta, &entries)
    }

    /// Remove a session. PBs it produced are kept.
    pub fn delete_session(&mut self, session_id: &str) -> Result<(), TrackerError> {
        let idx = self
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| TrackerError::UnknownSession {
                session_id: session_id.to_string(),
            })?;
        self.sessions.remove(idx);
        Ok(())
    }

    /// Replace each collection present in `snapshot`; absent ones are kept
    pub fn import(&mut self, snapshot: Snapshot) {
        if let Some(athletes) = snapshot.athletes {
            self.athletes = athletes;
        }
        if let Some(standards) = snapshot.standards {
            self.standards = standards;
        }
        if let Some(sessions) = snapshot.sessions {
            self.sessions = sessions;
        }
        if let Some(routes) = snapshot.routes {
            self.routes = routes;
        }
    }

    /// Full export, stamped with the current time
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            athletes: Some(self.athletes.clone()),
            standards: Some(self.standards.clone()),
            sessions: Some(self.sessions.clone()),
            routes: Some(self.routes.clone()),
            export_date: Some(Utc::now().to_rfc3339()),
        }
    }

    pub fn leaderboard(&self) -> Vec<StandingRow> {
        standings(&self.athletes, &self.sessions)
    }

    pub fn roster(&self, query: Option<&str>) -> Vec<&Athlete> {
        roster_order(&self.data(), query)
    }

    pub fn profile(&self, athlete_id: &str) -> Result<AthleteProfile, TrackerError> {
        athlete_profile(&self.data(), athlete_id, &self.config)
    }

    pub fn event_records(
        &self,
        event_id: &str,
        mode: RecordMode,
        filter: &RecordFilter,
    ) -> Result<Vec<RecordRow>, TrackerError> {
        let data = self.data();
        if data.standard(event_id).is_none() {
            return Err(TrackerError::unknown_event(event_id));
        }
        Ok(filter.apply(&data, event_records(&data, event_id, mode)))
    }

    pub fn course_records(
        &self,
        route_id: &str,
        mode: RecordMode,
        filter: &RecordFilter,
    ) -> Result<Vec<RecordRow>, TrackerError> {
        let data = self.data();
        if data.route(route_id).is_none() {
            return Err(TrackerError::UnknownRoute {
                route_id: route_id.to_string(),
            });
        }
        Ok(filter.apply(&data, course_records(&data, route_id, mode)))
    }

    pub fn points_trend(&self, athlete_ids: &[&str]) -> Vec<TrendPoint> {
        points_trend(&self.data(), athlete_ids)
    }

    pub fn most_active(&self, limit: usize) -> Vec<(&Athlete, usize)> {
        most_active(&self.data(), limit)
    }

    fn athlete_index(&self, athlete_id: &str) -> Result<usize, TrackerError> {
        self.athletes
            .iter()
            .position(|a| a.id == athlete_id)
            .ok_or_else(|| TrackerError::UnknownAthlete {
                athlete_id: athlete_id.to_string(),
            })
    }
}

/// Short base-36 id from the wall clock, bumped until `taken` rejects it
fn next_id(taken: impl Fn(&str) -> bool) -> String {
    let mut n = Utc::now().timestamp_millis().unsigned_abs();
    loop {
        let id = to_base36(n);
        if !taken(&id) {
            return id;
        }
        n += 1;
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    fn meta(name: &str, date: &str, event_id: &str) -> SessionMeta {
        SessionMeta {
            name: name.to_string(),
            date: date.to_string(),
            event_id: event_id.to_string(),
            venue: None,
            route_id: None,
            is_mandatory: false,
            notes: None,
        }
    }

    fn entry(athlete_id: &str, time: f64) -> EntryDraft {
        EntryDraft {
            athlete_id: athlete_id.to_string(),
            time,
            place: None,
        }
    }

    fn runner(club: &mut Club, name: &str) -> String {
        club.add_athlete(NewAthlete {
            name: name.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_ids_unique_within_collection() {
        let mut club = Club::new(ScoringConfig::default());
        let ids: Vec<String> = (0..20).map(|i| runner(&mut club, &format!("R{}", i))).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_add_athlete_dedupes_initial_pbs() {
        let mut club = Club::new(ScoringConfig::default());
        let pb = |time: f64| PersonalBest {
            event_id: "1".to_string(),
            time,
            date: None,
            venue: None,
        };
        let id = club.add_athlete(NewAthlete {
            name: "Ann".to_string(),
            personal_bests: vec![pb(260.0), pb(255.0)],
            ..Default::default()
        })
        .unwrap();
        let athlete = club.data().athlete(&id).unwrap();
        assert!(athlete.is_active);
        assert_eq!(athlete.personal_bests.len(), 1);
        assert_eq!(athlete.personal_bests[0].time, 255.0);
    }

    #[test]
    fn test_add_athlete_rejects_zero_pb() {
        let mut club = Club::new(ScoringConfig::default());
        for time in [0.0, -5.0, f64::NAN] {
            let err = club
                .add_athlete(NewAthlete {
                    name: "Ann".to_string(),
                    personal_bests: vec![PersonalBest {
                        event_id: "1".to_string(),
                        time,
                        date: None,
                        venue: None,
                    }],
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(err, TrackerError::InvalidFormat { .. }));
        }
        assert!(club.athletes().is_empty());

        // A real first race is still a PB
        let ann = runner(&mut club, "Ann");
        let session = club
            .record_session(meta("Mile", "2024-03-02", "1"), &[entry(&ann, 250.0)])
            .unwrap();
        assert!(session.results[0].has_tag(Tag::PersonalBest));
    }

    #[test]
    fn test_add_athlete_rejects_unknown_pb_event() {
        let mut club = Club::new(ScoringConfig::default());
        let err = club
            .add_athlete(NewAthlete {
                name: "Ann".to_string(),
                personal_bests: vec![PersonalBest {
                    event_id: "99".to_string(),
                    time: 250.0,
                    date: None,
                    venue: None,
                }],
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, TrackerError::unknown_event("99"));
        assert!(club.athletes().is_empty());
    }

    #[test]
    fn test_toggle_and_delete_athlete() {
        let mut club = Club::new(ScoringConfig::default());
        let id = runner(&mut club, "Ann");
        assert_eq!(club.toggle_athlete_status(&id), Ok(false));
        assert_eq!(club.toggle_athlete_status(&id), Ok(true));
        club.delete_athlete(&id).unwrap();
        assert!(matches!(
            club.delete_athlete(&id),
            Err(TrackerError::UnknownAthlete { .. })
        ));
    }

    #[test]
    fn test_standards_validated() {
        let mut club = Club::new(ScoringConfig::default());
        assert!(matches!(
            club.add_standard("Mile", 0.0, 1.1),
            Err(TrackerError::InvalidStandard { .. })
        ));
        assert_eq!(club.standards().len(), 5);

        let id = club.add_standard("Mile", 262.0, 1.1).unwrap();
        let mut updated = club.data().standard(&id).unwrap().clone();
        updated.k_value = -1.0;
        assert!(club.update_standard(updated.clone()).is_err());
        updated.k_value = 1.2;
        club.update_standard(updated).unwrap();
        assert_eq!(club.data().standard(&id).unwrap().k_value, 1.2);
    }

    #[test]
    fn test_record_session_updates_pb() {
        let mut club = Club::new(ScoringConfig::default());
        let ann = runner(&mut club, "Ann");
        let session = club
            .record_session(meta("Opener", "2024-03-02", "3"), &[entry(&ann, 1080.0)])
            .unwrap();
        assert_eq!(session.results[0].points, 889);
        assert!(session.results[0].has_tag(Tag::PersonalBest));

        let pb = club.data().athlete(&ann).unwrap().personal_best("3").cloned().unwrap();
        assert_eq!(pb.time, 1080.0);
        assert_eq!(pb.date.as_deref(), Some("2024-03-02"));
        assert_eq!(pb.venue.as_deref(), Some("Opener"));
    }

    #[test]
    fn test_unknown_event_stores_nothing() {
        let mut club = Club::new(ScoringConfig::default());
        let ann = runner(&mut club, "Ann");
        let err = club
            .record_session(meta("Bad", "2024-03-02", "99"), &[entry(&ann, 1080.0)])
            .unwrap_err();
        assert!(matches!(err, TrackerError::UnknownEvent { .. }));
        assert!(club.sessions().is_empty());
        assert!(club.data().athlete(&ann).unwrap().personal_bests.is_empty());
    }

    #[test]
    fn test_record_raw_session_drops_bad_rows() {
        let mut club = Club::new(ScoringConfig::default());
        let ann = runner(&mut club, "Ann");
        let raw = vec![
            RawEntry {
                athlete: ann.clone(),
                time: "4:10".to_string(),
                place: None,
            },
            RawEntry {
                athlete: ann.clone(),
                time: "fast".to_string(),
                place: None,
            },
        ];
        let session = club
            .record_raw_session(meta("Mile", "2024-03-02", "1"), &raw)
            .unwrap();
        assert_eq!(session.results.len(), 1);
        assert_eq!(session.results[0].time, 250.0);
    }

    #[test]
    fn test_delete_session_and_route() {
        let mut club = Club::new(ScoringConfig::default());
        let route = club.add_route("Lake Loop", "5km", Some(""));
        assert_eq!(club.routes()[0].elevation, None);
        let id = club
            .record_session(meta("Empty", "2024-03-02", "1"), &[])
            .unwrap()
            .id
            .clone();
        club.delete_session(&id).unwrap();
        assert!(matches!(
            club.delete_session(&id),
            Err(TrackerError::UnknownSession { .. })
        ));
        club.delete_route(&route).unwrap();
        assert!(club.routes().is_empty());
    }

    #[test]
    fn test_import_is_partial() {
        let mut club = Club::new(ScoringConfig::default());
        runner(&mut club, "Ann");
        club.import(Snapshot {
            routes: Some(vec![Route {
                id: "r1".to_string(),
                name: "Hill".to_string(),
                distance: "3km".to_string(),
                elevation: None,
                description: None,
            }]),
            ..Default::default()
        });
        assert_eq!(club.athletes().len(), 1);
        assert_eq!(club.standards().len(), 5);
        assert_eq!(club.routes().len(), 1);

        let exported = club.snapshot();
        assert!(exported.export_date.is_some());
        assert_eq!(exported.athletes.map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_from_snapshot_seeds_standards() {
        let club = Club::from_snapshot(Snapshot::default(), ScoringConfig::default());
        assert_eq!(club.standards().len(), 5);
        assert!(club.athletes().is_empty());
    }

    #[test]
    fn test_records_reject_unknown_ids() {
        let club = Club::new(ScoringConfig::default());
        let filter = RecordFilter::default();
        assert!(club.event_records("99", RecordMode::Best, &filter).is_err());
        assert!(matches!(
            club.course_records("nope", RecordMode::All, &filter),
            Err(TrackerError::UnknownRoute { .. })
        ));
    }
}
