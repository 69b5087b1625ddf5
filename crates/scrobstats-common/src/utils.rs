//! Shared utility functions.

use chrono::{Datelike, Utc};

use crate::error::{Result, StatsError};

/// Returns the current calendar year in UTC.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Parses a JSON-encoded list of years, as persisted in client storage and in the
/// backend user profile.
pub fn parse_year_list(raw: &str) -> Result<Vec<i32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed)
        .map_err(|e| StatsError::validation_field(format!("Invalid year list '{trimmed}': {e}"), "years"))
}

/// Encodes a list of years the way [`parse_year_list`] reads it back.
pub fn encode_year_list(years: &[i32]) -> Result<String> {
    Ok(serde_json::to_string(years)?)
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_list() {
        assert_eq!(parse_year_list("[2022,2023,2021]").unwrap(), vec![2022, 2023, 2021]);
        assert_eq!(parse_year_list("  ").unwrap(), Vec::<i32>::new());
        assert!(parse_year_list("[\"x\"]").is_err());
    }

    #[test]
    fn test_encode_year_list() {
        assert_eq!(encode_year_list(&[2022, 2023, 2021]).unwrap(), "[2022,2023,2021]");
        assert_eq!(encode_year_list(&[]).unwrap(), "[]");
        assert_eq!(encode_year_list(&[-1, 0]).unwrap(), "[-1,0]");
    }

    #[test]
    fn test_current_year_is_plausible() {
        assert!(current_year() >= 2024);
    }

    #[test]
    fn test_truncate_string() {
        let truncated = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(truncated, "This is a very lo...");
        assert_eq!(truncate_string("Short", 20), "Short");
    }
}
