pub mod club;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod ranking;
pub mod records;
pub mod report;
pub mod scoring;
pub mod store;
pub mod time_codec;

pub use club::{Club, NewAthlete};
pub use error::TrackerError;
