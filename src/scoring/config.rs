use serde::{Deserialize, Serialize};

use super::points::DEFAULT_K_VALUE;

/// Scoring configuration.
///
/// Every field is optional; unset fields fall back to the club's standard
/// constants through the accessor methods.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   default_k_value: 1.1
///   penalty_margin: 20
///   speed_points: 850
///   recent_sessions: 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Exponent given to new event standards when none is supplied (default: 1.1)
    #[serde(default)]
    pub default_k_value: Option<f64>,

    /// Points a missed mandatory race sits below the reference score (default: 20)
    #[serde(default)]
    pub penalty_margin: Option<u32>,

    /// Single-race points needed for the Speedster / Endurance Beast badges
    /// (strictly greater than; default: 850)
    #[serde(default)]
    pub speed_points: Option<u32>,

    /// How many recent sessions the team summary lists (default: 5)
    #[serde(default)]
    pub recent_sessions: Option<usize>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_k_value: Some(DEFAULT_K_VALUE),
            penalty_margin: Some(20),
            speed_points: Some(850),
            recent_sessions: Some(5),
        }
    }
}

impl ScoringConfig {
    pub fn k_value(&self) -> f64 {
        self.default_k_value.unwrap_or(DEFAULT_K_VALUE)
    }

    pub fn penalty_margin(&self) -> u32 {
        self.penalty_margin.unwrap_or(20)
    }

    pub fn speed_points(&self) -> u32 {
        self.speed_points.unwrap_or(850)
    }

    pub fn recent_sessions(&self) -> usize {
        self.recent_sessions.unwrap_or(5)
    }
}
