use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(k) = config.default_k_value {
        if !k.is_finite() || k <= 0.0 {
            errors.push(format!(
                "scoring.default_k_value: must be a positive number, got {}",
                k
            ));
        }
    }

    if config.speed_points == Some(0) {
        errors.push("scoring.speed_points: must be greater than zero".to_string());
    }

    if config.recent_sessions == Some(0) {
        errors.push("scoring.recent_sessions: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an event standard's gold time and k-value.
pub fn validate_standard(gold_time: f64, k_value: f64) -> Result<(), String> {
    if !gold_time.is_finite() || gold_time <= 0.0 {
        return Err(format!("gold time must be positive, got {}", gold_time));
    }
    if !k_value.is_finite() || k_value <= 0.0 {
        return Err(format!("k-value must be positive, got {}", k_value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ScoringConfig {
            default_k_value: None,
            penalty_margin: None,
            speed_points: None,
            recent_sessions: None,
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_negative_k_value() {
        let config = ScoringConfig {
            default_k_value: Some(-1.0),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.default_k_value"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            default_k_value: Some(0.0),
            penalty_margin: Some(20),
            speed_points: Some(0),
            recent_sessions: Some(0),
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_standard() {
        assert!(validate_standard(245.0, 1.1).is_ok());
        assert!(validate_standard(0.0, 1.1).is_err());
        assert!(validate_standard(245.0, f64::NAN).is_err());
    }
}
