use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use super::config::ScoringConfig;
use super::points::calculate_points;
use crate::error::TrackerError;
use crate::model::{
    calendar_year, cmp_dates, Athlete, EventStandard, PersonalBest, RaceResult, RaceSession, Tag,
};
use crate::time_codec::parse_time;

/// Typed session metadata, validated before scoring
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMeta {
    pub name: String,
    pub date: String,
    pub event_id: String,
    pub venue: Option<String>,
    pub route_id: Option<String>,
    pub is_mandatory: bool,
    pub notes: Option<String>,
}

/// One validated finisher: athlete, time in seconds, optional manual place
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub athlete_id: String,
    pub time: f64,
    pub place: Option<u32>,
}

/// One unvalidated form row as typed by the user
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawEntry {
    pub athlete: String,
    pub time: String,
    #[serde(default)]
    pub place: Option<String>,
}

/// A session as submitted from a draft file: metadata plus raw rows.
///
/// Example YAML:
/// ```yaml
/// name: Season Opener
/// date: 2024-03-02
/// event: "3"
/// route: lake-loop
/// mandatory: true
/// entries:
///   - { athlete: a1, time: "16:05.2" }
///   - { athlete: a2, time: "16:40", place: "2" }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SessionDraft {
    pub name: String,
    pub date: String,
    pub event: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub entries: Vec<RawEntry>,
}

impl SessionDraft {
    pub fn into_parts(self) -> (SessionMeta, Vec<RawEntry>) {
        let meta = SessionMeta {
            name: self.name,
            date: self.date,
            event_id: self.event,
            venue: self.venue.filter(|v| !v.trim().is_empty()),
            route_id: self.route.filter(|r| !r.trim().is_empty()),
            is_mandatory: self.mandatory,
            notes: self.notes,
        };
        (meta, self.entries)
    }
}

/// Validate raw form rows.
///
/// Rows without an athlete, with unparseable time text, or with a
/// non-positive time are dropped (logged, never fatal). A place that is not
/// a positive integer is ignored.
pub fn parse_entries(raw: &[RawEntry]) -> Vec<EntryDraft> {
    raw.iter()
        .filter_map(|row| {
            let athlete_id = row.athlete.trim();
            if athlete_id.is_empty() {
                log::warn!("Dropping entry without athlete (time '{}')", row.time);
                return None;
            }
            let time = match parse_time(&row.time) {
                Ok(t) if t > 0.0 => t,
                Ok(t) => {
                    log::warn!("Dropping entry for {}: non-positive time {}", athlete_id, t);
                    return None;
                }
                Err(e) => {
                    log::warn!("Dropping entry for {}: {}", athlete_id, e);
                    return None;
                }
            };
            let place = row
                .place
                .as_deref()
                .and_then(|p| p.trim().parse::<u32>().ok())
                .filter(|p| *p > 0);
            Some(EntryDraft {
                athlete_id: athlete_id.to_string(),
                time,
                place,
            })
        })
        .collect()
}

/// Penalty points for an athlete who missed a mandatory race.
///
/// Starts at `last_place_points - margin` and is capped at
/// `previous_points - margin`, where `previous_points` is the athlete's most
/// recent recorded score on or before `session_date`. Never negative.
pub fn calculate_penalty(
    last_place_points: u32,
    athlete_id: &str,
    session_date: &str,
    history: &[RaceSession],
    margin: u32,
) -> u32 {
    let mut prior: Vec<&RaceSession> = history
        .iter()
        .filter(|s| cmp_dates(&s.date, session_date).is_le())
        .collect();
    prior.sort_by(|a, b| cmp_dates(&b.date, &a.date));

    let last_points = prior
        .iter()
        .find_map(|s| s.result_for(athlete_id))
        .map(|r| r.points);

    let penalty = last_place_points.saturating_sub(margin);
    match last_points {
        Some(points) => penalty.min(points.saturating_sub(margin)),
        None => penalty,
    }
}

/// A new PB to write back to an athlete after a session is stored
#[derive(Debug, Clone, PartialEq)]
pub struct PbUpdate {
    pub athlete_id: String,
    pub best: PersonalBest,
}

/// Output of scoring one session: final results plus PB write-backs
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSession {
    pub results: Vec<RaceResult>,
    pub pb_updates: Vec<PbUpdate>,
}

/// Turns a session's entries into ranked, tagged results against the
/// current roster and stored history. Reads only; never mutates.
pub struct SessionScorer<'a> {
    pub athletes: &'a [Athlete],
    pub standards: &'a [EventStandard],
    pub history: &'a [RaceSession],
    pub config: &'a ScoringConfig,
}

impl<'a> SessionScorer<'a> {
    pub fn score(
        &self,
        meta: &SessionMeta,
        entries: &[EntryDraft],
    ) -> Result<ScoredSession, TrackerError> {
        let event = self
            .standards
            .iter()
            .find(|s| s.id == meta.event_id)
            .ok_or_else(|| TrackerError::unknown_event(&meta.event_id))?;

        if entries.is_empty() {
            log::debug!("Session '{}' has no finishers", meta.name);
        }

        let race_year = calendar_year(&meta.date);
        let mut finishers: Vec<(RaceResult, Option<u32>)> = Vec::new();
        let mut non_finishers: Vec<(RaceResult, Option<u32>)> = Vec::new();

        for entry in entries {
            let points = calculate_points(entry.time, event.gold_time, event.k_value);
            let tags = match self.athlete(&entry.athlete_id) {
                Some(athlete) if entry.time > 0.0 => {
                    self.performance_tags(athlete, event, entry.time, race_year)
                }
                Some(_) => Vec::new(),
                None => {
                    log::warn!(
                        "Entry references unknown athlete {}; recording without tags",
                        entry.athlete_id
                    );
                    Vec::new()
                }
            };
            let result = RaceResult {
                athlete_id: entry.athlete_id.clone(),
                time: entry.time,
                points,
                rank: 0,
                tags,
                notes: None,
            };
            if entry.time > 0.0 {
                finishers.push((result, entry.place));
            } else {
                non_finishers.push((result, entry.place));
            }
        }

        finishers.sort_by(|a, b| a.0.time.total_cmp(&b.0.time));

        let mut results: Vec<RaceResult> = finishers
            .into_iter()
            .chain(non_finishers)
            .enumerate()
            .map(|(idx, (mut result, place))| {
                result.rank = place.unwrap_or(idx as u32 + 1);
                result
            })
            .collect();

        if let Some(route_id) = meta.route_id.as_deref().filter(|r| !r.is_empty()) {
            self.tag_course_record(route_id, &mut results);
        }

        if meta.is_mandatory {
            self.append_penalties(meta, entries, &mut results);
        }

        let pb_updates = self.personal_best_updates(meta, event, &results);

        Ok(ScoredSession {
            results,
            pb_updates,
        })
    }

    fn athlete(&self, id: &str) -> Option<&'a Athlete> {
        self.athletes.iter().find(|a| a.id == id)
    }

    /// PB when there is no stored PB or the time beats it; SB when PB, or
    /// when the time beats both this year's earlier session bests and a
    /// same-year manual PB.
    fn performance_tags(
        &self,
        athlete: &Athlete,
        event: &EventStandard,
        time: f64,
        race_year: Option<i32>,
    ) -> Vec<Tag> {
        let mut tags = Vec::new();
        let pb = athlete.personal_best(&event.id);
        let is_pb = pb.map_or(true, |pb| time < pb.time);
        if is_pb {
            tags.push(Tag::PersonalBest);
        }

        let same_year = |date: &str| race_year.is_some() && calendar_year(date) == race_year;

        let session_best = self
            .history
            .iter()
            .filter(|s| s.event_id == event.id && same_year(s.date.as_str()))
            .flat_map(|s| s.results.iter())
            .filter(|r| r.athlete_id == athlete.id && r.is_finish())
            .map(|r| r.time)
            .fold(f64::INFINITY, f64::min);

        let manual_best = pb
            .filter(|pb| pb.date().is_some_and(same_year))
            .map_or(f64::INFINITY, |pb| pb.time);

        if is_pb || time < session_best.min(manual_best) {
            tags.push(Tag::SeasonBest);
        }
        tags
    }

    /// Tag the session's fastest finisher CR if it beats every earlier
    /// finish on the same route. First race on a route always sets it.
    fn tag_course_record(&self, route_id: &str, results: &mut [RaceResult]) {
        let route_best = self
            .history
            .iter()
            .filter(|s| s.route() == Some(route_id))
            .flat_map(|s| s.results.iter())
            .filter(|r| r.is_finish())
            .map(|r| r.time)
            .fold(f64::INFINITY, f64::min);

        if let Some(fastest) = results.first_mut().filter(|r| r.is_finish()) {
            if fastest.time < route_best {
                log::debug!(
                    "Course record on {} by {} ({}s)",
                    route_id,
                    fastest.athlete_id,
                    fastest.time
                );
                fastest.tags.push(Tag::CourseRecord);
            }
        }
    }

    fn append_penalties(
        &self,
        meta: &SessionMeta,
        entries: &[EntryDraft],
        results: &mut Vec<RaceResult>,
    ) {
        let participating: HashSet<&str> = entries.iter().map(|e| e.athlete_id.as_str()).collect();
        let last_place_points = results
            .iter()
            .rev()
            .find(|r| r.is_finish())
            .map_or(0, |r| r.points);

        for athlete in self
            .athletes
            .iter()
            .filter(|a| a.is_active && !participating.contains(a.id.as_str()))
        {
            let points = calculate_penalty(
                last_place_points,
                &athlete.id,
                &meta.date,
                self.history,
                self.config.penalty_margin(),
            );
            log::debug!(
                "{} missed mandatory '{}': {} penalty points",
                athlete.name,
                meta.name,
                points
            );
            results.push(RaceResult {
                athlete_id: athlete.id.clone(),
                time: 0.0,
                points,
                rank: results.len() as u32 + 1,
                tags: vec![Tag::Penalty],
                notes: Some("Missed Mandatory Race".to_string()),
            });
        }
    }

    fn personal_best_updates(
        &self,
        meta: &SessionMeta,
        event: &EventStandard,
        results: &[RaceResult],
    ) -> Vec<PbUpdate> {
        let mut bests: HashMap<&str, f64> = HashMap::new();
        let mut updates = Vec::new();
        let venue = meta
            .venue
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| meta.name.clone());

        for result in results.iter().filter(|r| r.is_finish()) {
            let Some(athlete) = self.athlete(&result.athlete_id) else {
                continue;
            };
            let current = bests.get(athlete.id.as_str()).copied().or_else(|| {
                athlete.personal_best(&event.id).map(|pb| pb.time)
            });
            if current.map_or(true, |best| result.time < best) {
                bests.insert(athlete.id.as_str(), result.time);
                updates.push(PbUpdate {
                    athlete_id: athlete.id.clone(),
                    best: PersonalBest {
                        event_id: event.id.clone(),
                        time: result.time,
                        date: Some(meta.date.clone()),
                        venue: Some(venue.clone()),
                    },
                });
            }
        }
        updates
    }
}
