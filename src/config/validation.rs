use crate::config::types::{CheckerConfig, CheckerSettings, OutputConfig};
use crate::ConfigError;

/// Highest request rate accepted, in requests per second
const MAX_RATE_PER_SECOND: f64 = 1000.0;

/// Highest burst capacity accepted
const MAX_BURST: u32 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &CheckerConfig) -> Result<(), ConfigError> {
    validate_checker_settings(&config.checker)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl behavior settings
fn validate_checker_settings(settings: &CheckerSettings) -> Result<(), ConfigError> {
    match (settings.rate_per_second, settings.burst) {
        (Some(rate), Some(burst)) => validate_rate_limit(rate, burst)?,
        (None, None) => {}
        _ => {
            return Err(ConfigError::Validation(
                "rate-per-second and burst must be set together".to_string(),
            ))
        }
    }

    if settings.buffer_size < 1 {
        return Err(ConfigError::Validation(format!(
            "buffer-size must be >= 1, got {}",
            settings.buffer_size
        )));
    }

    if settings.request_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be >= 1, got {}",
            settings.request_timeout_ms
        )));
    }

    validate_user_agent(&settings.user_agent)?;

    Ok(())
}

/// Validates a rate/burst pair
pub fn validate_rate_limit(rate_per_second: f64, burst: u32) -> Result<(), ConfigError> {
    if !rate_per_second.is_finite()
        || rate_per_second <= 0.0
        || rate_per_second > MAX_RATE_PER_SECOND
    {
        return Err(ConfigError::Validation(format!(
            "rate-per-second must be in (0, {}], got {}",
            MAX_RATE_PER_SECOND, rate_per_second
        )));
    }

    if burst < 1 || burst > MAX_BURST {
        return Err(ConfigError::Validation(format!(
            "burst must be between 1 and {}, got {}",
            MAX_BURST, burst
        )));
    }

    Ok(())
}

/// Validates the user agent string
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    // Control characters are rejected by the HTTP header encoder
    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user-agent must not contain control characters, got {:?}",
            user_agent
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.results_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "results-path cannot be empty".to_string(),
        ));
    }

    if matches!(config.error_log_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "error-log-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
