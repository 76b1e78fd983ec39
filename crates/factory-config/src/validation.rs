//! Validation utilities and regex patterns

use factory_common::WORKSTATION_COUNT;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Build a validation error carrying a human readable message
pub fn error_with_message(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error
}

/// Validate a log level or filter directive
///
/// Plain levels are accepted as-is; directives such as `factory_graphs=debug`
/// must end in a known level.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

    if level.is_empty() {
        return Err(ValidationError::new("empty_log_level"));
    }

    let valid = level.split(',').all(|directive| {
        let level = directive.rsplit('=').next().unwrap_or(directive).trim();
        LEVELS.contains(&level.to_ascii_lowercase().as_str())
    });

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

/// Validate the production route
///
/// Every stage must name at least one existing workstation and no workstation
/// may appear in two stages.
pub fn validate_route(route: &[Vec<usize>]) -> Result<(), ValidationError> {
    if route.is_empty() {
        return Err(error_with_message("empty_route", "Route must have at least one stage"));
    }

    let mut seen = HashSet::new();
    for stage in route {
        if stage.is_empty() {
            return Err(error_with_message("empty_stage", "Route stages cannot be empty"));
        }
        for &station in stage {
            if station >= WORKSTATION_COUNT {
                return Err(error_with_message(
                    "unknown_station",
                    format!("Route names unknown workstation {station}"),
                ));
            }
            if !seen.insert(station) {
                return Err(error_with_message(
                    "duplicate_station",
                    format!("Workstation {station} appears in several stages"),
                ));
            }
        }
    }

    Ok(())
}
