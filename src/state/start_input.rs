//! Resolution of the minute/second fields into a countdown total

use crate::error::InvalidInputError;

/// Turn the raw minute/second fields into a total number of seconds.
///
/// Empty fields count as zero. If both are empty the time accumulated so far
/// is used instead.
pub fn resolve_total(
    minutes: &str,
    seconds: &str,
    accumulated: i64,
) -> Result<i64, InvalidInputError> {
    let minutes = minutes.trim();
    let seconds = seconds.trim();

    if minutes.is_empty() && seconds.is_empty() {
        if accumulated <= 0 {
            return Err(InvalidInputError::NothingToStart);
        }
        return Ok(accumulated);
    }

    let m = parse_field(minutes).ok_or_else(|| InvalidInputError::Minutes(minutes.to_string()))?;
    let s = parse_field(seconds).ok_or_else(|| InvalidInputError::Seconds(seconds.to_string()))?;

    let total = i64::from(m) * 60 + i64::from(s);
    if total <= 0 {
        return Err(InvalidInputError::NonPositive(total));
    }
    Ok(total)
}

fn parse_field(field: &str) -> Option<u32> {
    if field.is_empty() {
        return Some(0);
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_minutes_and_seconds() {
        assert_eq!(resolve_total("2", "30", 0), Ok(150));
        assert_eq!(resolve_total("0", "59", 0), Ok(59));
        assert_eq!(resolve_total(" 1 ", "", 0), Ok(60));
        assert_eq!(resolve_total("", "90", 0), Ok(90));
    }

    #[test]
    fn fields_override_accumulated_time() {
        assert_eq!(resolve_total("1", "0", 500), Ok(60));
    }

    #[test]
    fn zero_total_is_rejected() {
        assert_eq!(resolve_total("0", "0", 0), Err(InvalidInputError::NonPositive(0)));
        assert_eq!(resolve_total("0", "", 120), Err(InvalidInputError::NonPositive(0)));
    }

    #[test]
    fn empty_fields_fall_back_to_accumulated() {
        assert_eq!(resolve_total("", "", 90), Ok(90));
        assert_eq!(resolve_total("  ", "", 0), Err(InvalidInputError::NothingToStart));
        assert_eq!(resolve_total("", "", -1), Err(InvalidInputError::NothingToStart));
    }

    #[test]
    fn non_numeric_and_negative_fields_are_rejected() {
        assert_eq!(
            resolve_total("abc", "5", 0),
            Err(InvalidInputError::Minutes("abc".to_string()))
        );
        assert_eq!(
            resolve_total("1", "-5", 0),
            Err(InvalidInputError::Seconds("-5".to_string()))
        );
        assert_eq!(
            resolve_total("1.5", "0", 0),
            Err(InvalidInputError::Minutes("1.5".to_string()))
        );
    }
}
