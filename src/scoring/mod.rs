pub mod config;
pub mod distance;
pub mod points;
pub mod session;
pub mod validation;

pub use config::*;
pub use distance::{format_distance, get_event_distance, natural_cmp, sort_events_by_distance};
pub use points::{calculate_points, DEFAULT_K_VALUE};
pub use session::{
    calculate_penalty, parse_entries, EntryDraft, PbUpdate, RawEntry, ScoredSession,
    SessionDraft, SessionMeta, SessionScorer,
};
pub use validation::{validate_scoring, validate_standard};
