use crate::utils::error::{Result, ScoutError};
use std::time::Duration;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ScoutError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Longest pause any pacing setting may ask for.
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Delay bounds are whole seconds or fractions; `min` may equal `max`.
pub fn validate_delay_bounds(field_name: &str, min_secs: f64, max_secs: f64) -> Result<()> {
    if !(0.0..=MAX_DELAY_SECS).contains(&min_secs)
        || !(0.0..=MAX_DELAY_SECS).contains(&max_secs)
        || max_secs < min_secs
    {
        return Err(ScoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", min_secs, max_secs),
            reason: format!(
                "Delay bounds must be between 0 and {} seconds with min <= max",
                MAX_DELAY_SECS
            ),
        });
    }
    Ok(())
}

/// Converts a configured delay, rejecting values `Duration` cannot hold.
pub fn delay_from_secs(field_name: &str, secs: f64) -> Result<Duration> {
    validate_delay_bounds(field_name, secs, secs)?;
    Duration::try_from_secs_f64(secs).map_err(|e| ScoutError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: secs.to_string(),
        reason: e.to_string(),
    })
}
