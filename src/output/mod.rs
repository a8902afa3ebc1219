pub mod formatter;

pub use formatter::{
    format_badges, format_events, format_leaderboard, format_profile, format_records,
    format_session_results, should_use_colors,
};
