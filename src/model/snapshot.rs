use serde::{Deserialize, Serialize};

use super::types::{Athlete, EventStandard, RaceSession, Route};

/// Full club data as exchanged with storage and import/export.
///
/// Every collection is optional so a partial backup can be imported without
/// clobbering the collections it does not carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athletes: Option<Vec<Athlete>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standards: Option<Vec<EventStandard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<RaceSession>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.athletes.is_none()
            && self.standards.is_none()
            && self.sessions.is_none()
            && self.routes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_snapshot_parses() {
        let json = r#"{ "routes": [{ "id": "r1", "name": "Lake Loop", "distance": "5km" }] }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.athletes.is_none());
        assert!(snapshot.sessions.is_none());
        assert_eq!(snapshot.routes.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_empty_object_is_empty_snapshot() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
    }
}
