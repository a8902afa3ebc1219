pub mod course;
pub mod event;
pub mod filter;

pub use course::course_records;
pub use event::event_records;
pub use filter::{record_batches, record_faculties, record_years, RecordFilter};

/// Which performances a record list keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordMode {
    /// One row per athlete
    #[default]
    Best,
    /// Every performance
    All,
}

/// Where a record row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Session,
    Manual,
}

/// One row of an event or course leaderboard.
/// Rows are only produced for athletes that resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub athlete_id: String,
    pub athlete_name: String,
    pub time: f64,
    pub date: Option<String>,
    pub venue: Option<String>,
    pub session_name: Option<String>,
    pub points: u32,
    pub source: RecordSource,
}

pub(crate) fn sort_by_time(rows: &mut [RecordRow]) {
    rows.sort_by(|a, b| a.time.total_cmp(&b.time));
}
