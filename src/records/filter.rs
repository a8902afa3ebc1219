use std::collections::BTreeSet;

use crate::model::{calendar_year, ClubData};

use super::RecordRow;

/// Display filters over an already computed record list. They only hide
/// rows; which row is an athlete's best never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub faculty: Option<String>,
    pub batch: Option<String>,
    pub athlete_id: Option<String>,
    pub year: Option<i32>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.faculty.is_none()
            && self.batch.is_none()
            && self.athlete_id.is_none()
            && self.year.is_none()
    }

    /// Keep rows matching every set filter. Rows without a date never match
    /// a year filter.
    pub fn apply(&self, data: &ClubData<'_>, rows: Vec<RecordRow>) -> Vec<RecordRow> {
        if self.is_empty() {
            return rows;
        }
        rows.into_iter()
            .filter(|row| self.matches(data, row))
            .collect()
    }

    fn matches(&self, data: &ClubData<'_>, row: &RecordRow) -> bool {
        let athlete = data.athlete(&row.athlete_id);
        if let Some(faculty) = &self.faculty {
            if athlete.and_then(|a| a.faculty.as_ref()) != Some(faculty) {
                return false;
            }
        }
        if let Some(batch) = &self.batch {
            if athlete.and_then(|a| a.batch.as_ref()) != Some(batch) {
                return false;
            }
        }
        if let Some(id) = &self.athlete_id {
            if &row.athlete_id != id {
                return false;
            }
        }
        if let Some(year) = self.year {
            if row.date.as_deref().and_then(calendar_year) != Some(year) {
                return false;
            }
        }
        true
    }
}

/// Distinct faculties on the roster, sorted
pub fn record_faculties(data: &ClubData<'_>) -> Vec<String> {
    data.athletes
        .iter()
        .filter_map(|a| a.faculty.clone())
        .filter(|f| !f.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct batches on the roster, sorted
pub fn record_batches(data: &ClubData<'_>) -> Vec<String> {
    data.athletes
        .iter()
        .filter_map(|a| a.batch.clone())
        .filter(|b| !b.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Years seen in session dates and PB dates, newest first
pub fn record_years(data: &ClubData<'_>) -> Vec<i32> {
    let session_years = data.sessions.iter().filter_map(|s| calendar_year(&s.date));
    let pb_years = data
        .athletes
        .iter()
        .flat_map(|a| a.personal_bests.iter())
        .filter_map(|pb| pb.date().and_then(calendar_year));
    session_years
        .chain(pb_years)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Athlete, PersonalBest};
    use crate::ranking::test_support::{athlete, session};
    use crate::records::RecordSource;
    use pretty_assertions::assert_eq;

    fn member(id: &str, faculty: &str, batch: &str) -> Athlete {
        let mut a = athlete(id, id, true);
        a.faculty = Some(faculty.to_string());
        a.batch = Some(batch.to_string());
        a
    }

    fn row(athlete_id: &str, date: Option<&str>) -> RecordRow {
        RecordRow {
            athlete_id: athlete_id.to_string(),
            athlete_name: athlete_id.to_string(),
            time: 250.0,
            date: date.map(str::to_string),
            venue: None,
            session_name: None,
            points: 900,
            source: RecordSource::Manual,
        }
    }

    #[test]
    fn test_filters_intersect() {
        let athletes = vec![
            member("a", "Engineering", "2022"),
            member("b", "Engineering", "2023"),
            member("c", "Medicine", "2022"),
        ];
        let data = ClubData {
            athletes: &athletes,
            standards: &[],
            sessions: &[],
            routes: &[],
        };
        let rows = vec![
            row("a", Some("2024-01-01")),
            row("b", Some("2024-01-01")),
            row("c", Some("2023-01-01")),
            row("a", None),
        ];

        let by_faculty = RecordFilter {
            faculty: Some("Engineering".to_string()),
            ..Default::default()
        };
        assert_eq!(by_faculty.apply(&data, rows.clone()).len(), 3);

        let by_faculty_and_year = RecordFilter {
            faculty: Some("Engineering".to_string()),
            year: Some(2024),
            ..Default::default()
        };
        assert_eq!(by_faculty_and_year.apply(&data, rows.clone()).len(), 2);

        let by_batch = RecordFilter {
            batch: Some("2022".to_string()),
            athlete_id: Some("c".to_string()),
            ..Default::default()
        };
        let kept = by_batch.apply(&data, rows.clone());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].athlete_id, "c");

        assert_eq!(RecordFilter::default().apply(&data, rows).len(), 4);
    }

    #[test]
    fn test_filter_options() {
        let mut a = member("a", "Medicine", "2023");
        a.personal_bests.push(PersonalBest {
            event_id: "1".to_string(),
            time: 250.0,
            date: Some("2019-05-01".to_string()),
            venue: None,
        });
        let athletes = vec![a, member("b", "Engineering", "2023"), athlete("c", "c", true)];
        let sessions = vec![
            session("s1", "2023-01-01", vec![]),
            session("s2", "2024-01-01", vec![]),
            session("s3", "2024-06-01", vec![]),
        ];
        let data = ClubData {
            athletes: &athletes,
            standards: &[],
            sessions: &sessions,
            routes: &[],
        };
        assert_eq!(record_faculties(&data), vec!["Engineering", "Medicine"]);
        assert_eq!(record_batches(&data), vec!["2023"]);
        assert_eq!(record_years(&data), vec![2024, 2023, 2019]);
    }
}
