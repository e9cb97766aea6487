//! Domain validation rules enforced by the API handlers.

use crate::error::CoreError;

/// Maximum length for challenge and criterion names.
pub const MAX_NAME_LEN: usize = 200;

/// Validate a challenge name: non-empty and within the length limit.
pub fn validate_challenge_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Challenge name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Challenge name too long: {} chars (max {MAX_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a criterion name: non-empty and within the length limit.
pub fn validate_criterion_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Criterion name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Criterion name too long: {} chars (max {MAX_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a score multiplier: must be a finite number greater than zero.
pub fn validate_score_multiplier(multiplier: f64) -> Result<(), CoreError> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Score multiplier must be greater than zero, got {multiplier}"
        )));
    }
    Ok(())
}

/// Validate a repository URL: must be an absolute http(s) URL.
pub fn validate_repository_url(url: &str) -> Result<(), CoreError> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CoreError::Validation(format!(
            "Repository URL must be an absolute http(s) URL, got '{url}'"
        )));
    }
    Ok(())
}
