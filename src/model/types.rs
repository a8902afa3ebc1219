use serde::{Deserialize, Serialize};

use crate::scoring::DEFAULT_K_VALUE;

fn default_k_value() -> f64 {
    DEFAULT_K_VALUE
}

fn default_active() -> bool {
    true
}

/// A race distance/category and its elite benchmark.
///
/// `gold_time` (seconds) is the time worth exactly 1000 points; `k_value` is
/// the exponent of the power-law falloff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStandard {
    pub id: String,
    pub name: String,
    pub gold_time: f64,
    #[serde(default = "default_k_value")]
    pub k_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    pub event_id: String,
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl PersonalBest {
    /// Date of the performance, treating an empty string as absent
    pub fn date(&self) -> Option<&str> {
        non_empty(self.date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub personal_bests: Vec<PersonalBest>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Athlete {
    pub fn personal_best(&self, event_id: &str) -> Option<&PersonalBest> {
        self.personal_bests.iter().find(|pb| pb.event_id == event_id)
    }

    /// Replace the PB for `best.event_id`, or add it if the event has none.
    /// Keeps the one-PB-per-event invariant; does not compare times.
    pub fn set_personal_best(&mut self, best: PersonalBest) {
        match self
            .personal_bests
            .iter_mut()
            .find(|pb| pb.event_id == best.event_id)
        {
            Some(existing) => *existing = best,
            None => self.personal_bests.push(best),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "PB")]
    PersonalBest,
    #[serde(rename = "SB")]
    SeasonBest,
    #[serde(rename = "CR")]
    CourseRecord,
    #[serde(rename = "Penalty")]
    Penalty,
}

impl Tag {
    pub fn label(&self) -> &'static str {
        match self {
            Tag::PersonalBest => "PB",
            Tag::SeasonBest => "SB",
            Tag::CourseRecord => "CR",
            Tag::Penalty => "Penalty",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub athlete_id: String,
    /// Seconds; 0 marks a non-competing (penalty) row
    pub time: f64,
    pub points: u32,
    pub rank: u32,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RaceResult {
    /// True when the athlete actually ran (time > 0)
    pub fn is_finish(&self) -> bool {
        self.time > 0.0
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSession {
    pub id: String,
    pub date: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    pub event_id: String,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub results: Vec<RaceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RaceSession {
    /// Route id, treating an empty string as "no route"
    pub fn route(&self) -> Option<&str> {
        non_empty(self.route_id.as_deref())
    }

    /// Venue if set, otherwise the session name
    pub fn venue_or_name(&self) -> &str {
        non_empty(self.venue.as_deref()).unwrap_or(&self.name)
    }

    pub fn result_for(&self, athlete_id: &str) -> Option<&RaceResult> {
        self.results.iter().find(|r| r.athlete_id == athlete_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub name: String,
    /// Free text, e.g. "5km"
    #[serde(default)]
    pub distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
