//! Field checks applied to request payloads before any storage access.

use chrono::NaiveDate;

use crate::constants::{MAX_SUMMARY_YEAR, MIN_SUMMARY_YEAR};
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Checks that a required text field has between `min` and `max` characters.
///
/// ## Errors
/// Returns `CoreError::ValidationError` naming the field when out of bounds.
pub fn text_len(field: &str, value: &str, min: usize, max: Option<usize>) -> CoreResult<()> {
    let len = value.chars().count();
    if len < min {
        return Err(CoreError::ValidationError(if min == 1 {
            format!("{field} must not be empty")
        } else {
            format!("{field} must be at least {min} characters")
        }));
    }
    if let Some(max) = max
        && len > max
    {
        return Err(CoreError::ValidationError(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// ## Summary
/// Like [`text_len`] but skips absent values.
///
/// ## Errors
/// Returns `CoreError::ValidationError` when a present value is out of bounds.
pub fn opt_text_len(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: Option<usize>,
) -> CoreResult<()> {
    value.map_or(Ok(()), |v| text_len(field, v, min, max))
}

/// ## Summary
/// Checks a `#RRGGBB` color.
///
/// ## Errors
/// Returns `CoreError::ValidationError` for any other shape.
pub fn hex_color(field: &str, value: &str) -> CoreResult<()> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "{field} must be a color in #RRGGBB form"
        )))
    }
}

/// ## Summary
/// Minimal e-mail shape check: one `@` with text on both sides and a dot in the domain.
///
/// ## Errors
/// Returns `CoreError::ValidationError` when the shape does not match.
pub fn email(field: &str, value: &str) -> CoreResult<()> {
    let valid = value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    });
    if valid {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "{field} is not a valid e-mail address"
        )))
    }
}

/// ## Summary
/// Rejects an inclusive range whose start lies after its end.
///
/// ## Errors
/// Returns `CoreError::PreconditionFailed` when `start > end`.
pub fn ordered_range<T: PartialOrd>(start: &T, end: &T) -> CoreResult<()> {
    if start > end {
        return Err(CoreError::PreconditionFailed(
            "start date must not be after end date".to_string(),
        ));
    }
    Ok(())
}

/// ## Summary
/// Checks the year accepted by per-member offering summaries.
///
/// ## Errors
/// Returns `CoreError::ValidationError` outside the supported range.
pub fn summary_year(year: i32) -> CoreResult<NaiveDate> {
    if !(MIN_SUMMARY_YEAR..=MAX_SUMMARY_YEAR).contains(&year) {
        return Err(CoreError::ValidationError(format!(
            "year must be between {MIN_SUMMARY_YEAR} and {MAX_SUMMARY_YEAR}"
        )));
    }
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| CoreError::ValidationError(format!("invalid year {year}")))
}
