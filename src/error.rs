use thiserror::Error;

/// Failures raised by the scoring and ranking engine.
///
/// Dangling athlete/event/route ids inside stored sessions are not errors:
/// lookups return `None` and views render them as "Unknown".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// Race-clock text that is not `h:mm:ss[.ff]`, `mm:ss[.ff]` or `ss[.ff]`
    #[error("Invalid time format: '{input}'")]
    InvalidFormat { input: String },

    /// Session references an event standard that does not exist
    #[error("Unknown event: {event_id}")]
    UnknownEvent { event_id: String },

    #[error("Unknown athlete: {athlete_id}")]
    UnknownAthlete { athlete_id: String },

    #[error("Unknown route: {route_id}")]
    UnknownRoute { route_id: String },

    #[error("Unknown session: {session_id}")]
    UnknownSession { session_id: String },

    /// Gold time or k-value outside the usable range
    #[error("Invalid event standard: {message}")]
    InvalidStandard { message: String },
}

impl TrackerError {
    pub fn invalid_format(input: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.into(),
        }
    }

    pub fn unknown_event(event_id: impl Into<String>) -> Self {
        Self::UnknownEvent {
            event_id: event_id.into(),
        }
    }
}
