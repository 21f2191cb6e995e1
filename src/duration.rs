//! Duration text.
//!
//! Durations default to a compact human form made of unit segments, the
//! largest unit first: `1h2m3.5s`, `1m0s`, `1.5ms`, `0s`. Sub-second values
//! use the largest fitting unit among `ns`, `µs` and `ms`.
//!
//! With the `int[,unit]` verb a duration is instead written as a whole count
//! of one unit (`ns` when the unit is missing or unrecognized).

use crate::{Error, Result};
use chrono::TimeDelta;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Unit selected by an `int[,unit]` verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DurationUnit {
    #[default]
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl DurationUnit {
    /// Returns `Some(unit)` when the verb asks for an integer count.
    ///
    /// ```rust
    /// use urlvalues::duration::DurationUnit;
    ///
    /// assert_eq!(DurationUnit::from_verb(Some("int,ms")), Some(DurationUnit::Millisecond));
    /// assert_eq!(DurationUnit::from_verb(Some("int,fortnight")), Some(DurationUnit::Nanosecond));
    /// assert_eq!(DurationUnit::from_verb(None), None);
    /// ```
    #[must_use]
    pub fn from_verb(verb: Option<&str>) -> Option<Self> {
        let mut parts = verb?.split(',').map(str::trim);
        if parts.next() != Some("int") {
            return None;
        }
        Some(match parts.next() {
            Some("us") | Some("µs") | Some("μs") => DurationUnit::Microsecond,
            Some("ms") => DurationUnit::Millisecond,
            Some("s") => DurationUnit::Second,
            Some("m") => DurationUnit::Minute,
            Some("h") => DurationUnit::Hour,
            _ => DurationUnit::Nanosecond,
        })
    }

    #[must_use]
    pub const fn nanos(self) -> i64 {
        (match self {
            DurationUnit::Nanosecond => NANOSECOND,
            DurationUnit::Microsecond => MICROSECOND,
            DurationUnit::Millisecond => MILLISECOND,
            DurationUnit::Second => SECOND,
            DurationUnit::Minute => MINUTE,
            DurationUnit::Hour => HOUR,
        }) as i64
    }
}

fn total_nanos(value: TimeDelta) -> Result<i64> {
    value
        .num_nanoseconds()
        .ok_or_else(|| Error::unsupported_type("Duration beyond 64-bit nanoseconds"))
}

/// Renders a duration per its verb.
pub fn format_duration(value: TimeDelta, verb: Option<&str>) -> Result<String> {
    let nanos = total_nanos(value)?;
    Ok(match DurationUnit::from_verb(verb) {
        Some(unit) => (nanos / unit.nanos()).to_string(),
        None => human(nanos),
    })
}

/// Parses a duration per its verb.
pub fn parse_duration(text: &str, verb: Option<&str>) -> Result<TimeDelta> {
    match DurationUnit::from_verb(verb) {
        Some(unit) => {
            let count: i64 = text
                .trim()
                .parse()
                .map_err(|e| Error::parse(text, "Duration", e))?;
            if count == 0 {
                return Ok(TimeDelta::zero());
            }
            count
                .checked_mul(unit.nanos())
                .map(TimeDelta::nanoseconds)
                .ok_or_else(|| Error::parse(text, "Duration", "value out of range"))
        }
        None => parse_human(text).map(TimeDelta::nanoseconds),
    }
}

fn human(nanos: i64) -> String {
    let mut magnitude = nanos.unsigned_abs();
    if magnitude == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
    }

    if magnitude < SECOND {
        let (scale, unit, digits) = if magnitude < MICROSECOND {
            (NANOSECOND, "ns", 0)
        } else if magnitude < MILLISECOND {
            (MICROSECOND, "µs", 3)
        } else {
            (MILLISECOND, "ms", 6)
        };
        out.push_str(&(magnitude / scale).to_string());
        push_fraction(&mut out, magnitude % scale, digits);
        out.push_str(unit);
        return out;
    }

    let hours = magnitude / HOUR;
    magnitude %= HOUR;
    let minutes = magnitude / MINUTE;
    magnitude %= MINUTE;
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&(magnitude / SECOND).to_string());
    push_fraction(&mut out, magnitude % SECOND, 9);
    out.push('s');
    out
}

/// Appends `.ddd` without trailing zeros; nothing when the fraction is zero.
fn push_fraction(out: &mut String, fraction: u64, digits: usize) {
    if fraction == 0 {
        return;
    }
    let padded = format!("{fraction:0digits$}");
    out.push('.');
    out.push_str(padded.trim_end_matches('0'));
}

fn parse_human(text: &str) -> Result<i64> {
    let invalid = |reason: &str| Error::parse(text, "Duration", reason);

    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid("invalid duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after) = rest.split_at(int_len);
        let (frac_digits, after) = match after.strip_prefix('.') {
            Some(frac) => {
                let len = frac.bytes().take_while(u8::is_ascii_digit).count();
                frac.split_at(len)
            }
            None => ("", after),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid("invalid duration"));
        }

        let unit_len = after
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map_or(after.len(), |(i, _)| i);
        let (unit, tail) = after.split_at(unit_len);
        let scale = match unit {
            "ns" => NANOSECOND,
            "us" | "µs" | "μs" => MICROSECOND,
            "ms" => MILLISECOND,
            "s" => SECOND,
            "m" => MINUTE,
            "h" => HOUR,
            "" => return Err(invalid("missing unit in duration")),
            _ => return Err(invalid("unknown unit in duration")),
        };

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits
                .parse()
                .map_err(|_| invalid("invalid duration"))?
        };
        let mut segment = whole
            .checked_mul(u128::from(scale))
            .ok_or_else(|| invalid("invalid duration"))?;
        if !frac_digits.is_empty() {
            // keep 18 digits, far beyond nanosecond resolution for any unit
            let kept = &frac_digits[..frac_digits.len().min(18)];
            let numerator: u128 = kept.parse().map_err(|_| invalid("invalid duration"))?;
            segment += numerator * u128::from(scale) / 10u128.pow(kept.len() as u32);
        }

        total = total
            .checked_add(segment)
            .filter(|&t| t <= i64::MAX as u128 + u128::from(negative))
            .ok_or_else(|| invalid("invalid duration"))?;
        rest = tail;
    }

    if negative {
        Ok((total as i128).wrapping_neg() as i64)
    } else {
        Ok(total as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_form() {
        let cases = [
            (0, "0s"),
            (1, "1ns"),
            (1_100, "1.1µs"),
            (2_200_000, "2.2ms"),
            (SECOND as i64, "1s"),
            (MINUTE as i64, "1m0s"),
            ((HOUR + 2 * MINUTE) as i64 + 3_500_000_000, "1h2m3.5s"),
            (-(MINUTE as i64), "-1m0s"),
            (HOUR as i64, "1h0m0s"),
        ];
        for (nanos, text) in cases {
            assert_eq!(human(nanos), text);
            assert_eq!(parse_human(text).unwrap(), nanos, "{text}");
        }
    }

    #[test]
    fn test_extremes() {
        assert_eq!(human(i64::MAX), "2562047h47m16.854775807s");
        assert_eq!(parse_human("2562047h47m16.854775807s").unwrap(), i64::MAX);
        assert_eq!(human(i64::MIN), "-2562047h47m16.854775808s");
        assert_eq!(parse_human("-2562047h47m16.854775808s").unwrap(), i64::MIN);
        assert!(parse_human("2562047h47m16.854775808s").is_err());
    }

    #[test]
    fn test_parse_human_variants() {
        assert_eq!(parse_human("0").unwrap(), 0);
        assert_eq!(parse_human("+5s").unwrap(), 5 * SECOND as i64);
        assert_eq!(parse_human("1.5h").unwrap(), (HOUR + 30 * MINUTE) as i64);
        assert_eq!(parse_human("300ms").unwrap(), 300 * MILLISECOND as i64);
        assert_eq!(parse_human("2us").unwrap(), 2_000);
        assert_eq!(parse_human("2μs").unwrap(), 2_000);
        assert_eq!(parse_human(".5s").unwrap(), 500 * MILLISECOND as i64);
        for bad in ["", "-", "5", "1x", "s", ".s", "1h-2m"] {
            assert!(parse_human(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_int_verb() {
        let minute = TimeDelta::minutes(1);
        assert_eq!(format_duration(minute, Some("int,ms")).unwrap(), "60000");
        assert_eq!(format_duration(minute, Some("int,s")).unwrap(), "60");
        assert_eq!(format_duration(minute, Some("int,h")).unwrap(), "0");
        assert_eq!(format_duration(minute, Some("int")).unwrap(), "60000000000");
        assert_eq!(
            format_duration(minute, Some("int,weeks")).unwrap(),
            "60000000000"
        );
        assert_eq!(format_duration(minute, None).unwrap(), "1m0s");

        assert_eq!(parse_duration("60000", Some("int,ms")).unwrap(), minute);
        assert_eq!(parse_duration("1", Some("int,m")).unwrap(), minute);
        assert_eq!(parse_duration("0", Some("int,h")).unwrap(), TimeDelta::zero());
        assert_eq!(parse_duration("1m0s", None).unwrap(), minute);
        assert!(parse_duration("1m", Some("int,s")).is_err());
        assert!(parse_duration("9223372036854775807", Some("int,h")).is_err());
    }

    #[test]
    fn test_unknown_verb_uses_human_form() {
        assert_eq!(
            format_duration(TimeDelta::seconds(90), Some("pretty")).unwrap(),
            "1m30s"
        );
    }
}
