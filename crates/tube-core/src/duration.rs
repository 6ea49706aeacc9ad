//! ISO-8601 duration parsing for video lengths.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("Invalid duration regex")
});

/// Parses durations such as `PT1H2M3S` or `P1DT5M` into seconds.
///
/// Anything unparseable or too large for `u64` seconds yields 0, as does
/// `P0D` (returned for upcoming premieres), so such videos are classified
/// as short.
pub fn parse_iso8601_duration(raw: &str) -> u64 {
    let Some(caps) = DURATION_REGEX.captures(raw.trim()) else {
        debug!(duration = %raw, "Unparseable duration, treating as 0");
        return 0;
    };

    let part = |i: usize, unit: u64| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse::<u64>().ok()?.checked_mul(unit),
            None => Some(0),
        }
    };

    let total = [(1, 86_400), (2, 3600), (3, 60), (4, 1)]
        .into_iter()
        .try_fold(0u64, |acc, (i, unit)| acc.checked_add(part(i, unit)?));

    total.unwrap_or_else(|| {
        debug!(duration = %raw, "Duration out of range, treating as 0");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_duration() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), 3723);
    }

    #[test]
    fn test_partial_durations() {
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration("PT2M"), 120);
        assert_eq!(parse_iso8601_duration("PT1H"), 3600);
        assert_eq!(parse_iso8601_duration("PT1H30S"), 3630);
        assert_eq!(parse_iso8601_duration("P1DT1S"), 86_401);
    }

    #[test]
    fn test_unparseable_is_zero() {
        assert_eq!(parse_iso8601_duration("P0D"), 0);
        assert_eq!(parse_iso8601_duration(""), 0);
        assert_eq!(parse_iso8601_duration("1:30"), 0);
    }

    #[test]
    fn test_out_of_range_is_zero() {
        assert_eq!(parse_iso8601_duration("P999999999999999D"), 0);
        assert_eq!(parse_iso8601_duration("PT99999999999999999999S"), 0);
        assert_eq!(parse_iso8601_duration("PT6000000000000000H"), 0);
    }
}
