//! Format verbs.
//!
//! A format verb is an optional per-field annotation (`#[urlformat = "..."]`)
//! that selects the textual representation of a scalar:
//!
//! | Kind | Verbs | Default |
//! |------|-------|---------|
//! | bool | `short`, `shortlower`, `upper`, `camel`, `lower`, `int` | `lower` |
//! | float / complex | `e`, `E`, `f`, `g`, `G` | `f` |
//! | duration | `int[,ns\|us\|ms\|s\|m\|h]` | human text (`1m0s`) |
//! | timestamp | a chrono `strftime` layout | RFC 3339 |
//!
//! Floats are always written with the fewest digits that parse back to the
//! exact same value. Unknown float/complex verbs are rejected; unknown verbs
//! for every other kind fall back to the default representation.

use crate::{Error, Result};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use num_complex::{Complex32, Complex64};
use std::fmt::Write;

/// Textual encoding of a boolean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoolStyle {
    /// `true` / `false`
    #[default]
    Lower,
    /// `T` / `F`
    Short,
    /// `t` / `f`
    ShortLower,
    /// `TRUE` / `FALSE`
    Upper,
    /// `True` / `False`
    Camel,
    /// `1` / `0`
    Int,
}

impl BoolStyle {
    /// Interprets a verb, falling back to [`BoolStyle::Lower`].
    #[must_use]
    pub fn from_verb(verb: Option<&str>) -> Self {
        match verb.map(str::trim) {
            Some("short") => BoolStyle::Short,
            Some("shortlower") => BoolStyle::ShortLower,
            Some("upper") => BoolStyle::Upper,
            Some("camel") => BoolStyle::Camel,
            Some("int") => BoolStyle::Int,
            _ => BoolStyle::Lower,
        }
    }

    #[must_use]
    pub const fn render(self, value: bool) -> &'static str {
        match (self, value) {
            (BoolStyle::Lower, true) => "true",
            (BoolStyle::Lower, false) => "false",
            (BoolStyle::Short, true) => "T",
            (BoolStyle::Short, false) => "F",
            (BoolStyle::ShortLower, true) => "t",
            (BoolStyle::ShortLower, false) => "f",
            (BoolStyle::Upper, true) => "TRUE",
            (BoolStyle::Upper, false) => "FALSE",
            (BoolStyle::Camel, true) => "True",
            (BoolStyle::Camel, false) => "False",
            (BoolStyle::Int, true) => "1",
            (BoolStyle::Int, false) => "0",
        }
    }
}

/// Parses every boolean spelling any [`BoolStyle`] can produce.
pub fn parse_bool(text: &str) -> Result<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Error::parse(text, "bool", "invalid syntax")),
    }
}

/// Like [`parse_bool`] but without the `1`/`0` spellings, so numeric text is
/// left for the numeric tiers of untyped decoding.
pub(crate) fn parse_bool_word(text: &str) -> Option<bool> {
    match text {
        "1" | "0" => None,
        _ => parse_bool(text).ok(),
    }
}

/// printf-style conversion character for floats and complex numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FloatVerb {
    /// `d.dddde±dd`
    LowerExp,
    /// `d.ddddE±dd`
    UpperExp,
    /// `ddd.dddd`, no exponent
    #[default]
    Fixed,
    /// `e` for large exponents, `f` otherwise
    General,
    /// `E` for large exponents, `f` otherwise
    UpperGeneral,
}

impl FloatVerb {
    /// Selects the conversion from the first character of the verb.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVerb`] for any character outside `eEfgG`.
    pub fn from_verb(verb: Option<&str>) -> Result<Self> {
        let Some(verb) = verb.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(FloatVerb::Fixed);
        };
        match verb.chars().next() {
            Some('e') => Ok(FloatVerb::LowerExp),
            Some('E') => Ok(FloatVerb::UpperExp),
            Some('f') => Ok(FloatVerb::Fixed),
            Some('g') => Ok(FloatVerb::General),
            Some('G') => Ok(FloatVerb::UpperGeneral),
            Some(other) => Err(Error::unsupported_verb(&other.to_string())),
            None => Ok(FloatVerb::Fixed),
        }
    }
}

/// Shortest round-trip text of an `f64`.
#[must_use]
pub fn format_f64(value: f64, verb: FloatVerb) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    render_float(format!("{value}"), format!("{value:e}"), verb)
}

/// Shortest round-trip text of an `f32`, using `f32` precision.
#[must_use]
pub fn format_f32(value: f32, verb: FloatVerb) -> String {
    if let Some(special) = non_finite(f64::from(value)) {
        return special.to_string();
    }
    render_float(format!("{value}"), format!("{value:e}"), verb)
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value.is_infinite() {
        Some(if value > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        None
    }
}

fn render_float(fixed: String, scientific: String, verb: FloatVerb) -> String {
    let (mantissa, exponent) = split_exponent(&scientific);
    match verb {
        FloatVerb::Fixed => fixed,
        FloatVerb::LowerExp => exponent_form(mantissa, exponent, 'e'),
        FloatVerb::UpperExp => exponent_form(mantissa, exponent, 'E'),
        FloatVerb::General | FloatVerb::UpperGeneral => {
            if (-4..6).contains(&exponent) {
                fixed
            } else {
                let marker = if verb == FloatVerb::General { 'e' } else { 'E' };
                exponent_form(mantissa, exponent, marker)
            }
        }
    }
}

/// Splits Rust's `{:e}` output (`1.5e-7`) into mantissa and exponent.
fn split_exponent(scientific: &str) -> (&str, i32) {
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (scientific, 0),
    }
}

/// Signed exponent with at least two digits: `1.5e-07`.
fn exponent_form(mantissa: &str, exponent: i32, marker: char) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exponent.unsigned_abs())
}

pub fn parse_f64(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| Error::parse(text, "f64", e))
}

pub fn parse_f32(text: &str) -> Result<f32> {
    text.trim()
        .parse::<f32>()
        .map_err(|e| Error::parse(text, "f32", e))
}

/// `(re+imi)` with both parts in 32-bit precision.
#[must_use]
pub fn format_complex32(value: Complex32, verb: FloatVerb) -> String {
    complex_text(format_f32(value.re, verb), format_f32(value.im, verb))
}

/// `(re+imi)` with both parts in 64-bit precision.
#[must_use]
pub fn format_complex64(value: Complex64, verb: FloatVerb) -> String {
    complex_text(format_f64(value.re, verb), format_f64(value.im, verb))
}

fn complex_text(re: String, im: String) -> String {
    if im.starts_with('+') || im.starts_with('-') {
        format!("({re}{im}i)")
    } else {
        format!("({re}+{im}i)")
    }
}

pub fn parse_complex64(text: &str) -> Result<Complex64> {
    let (re, im) = split_complex(text).ok_or_else(|| invalid_complex(text, "Complex<f64>"))?;
    let re = parse_part(re, text, "Complex<f64>", str::parse::<f64>)?;
    let im = parse_part(im, text, "Complex<f64>", str::parse::<f64>)?;
    Ok(Complex64::new(re, im))
}

pub fn parse_complex32(text: &str) -> Result<Complex32> {
    let (re, im) = split_complex(text).ok_or_else(|| invalid_complex(text, "Complex<f32>"))?;
    let re = parse_part(re, text, "Complex<f32>", str::parse::<f32>)?;
    let im = parse_part(im, text, "Complex<f32>", str::parse::<f32>)?;
    Ok(Complex32::new(re, im))
}

fn invalid_complex(text: &str, target: &str) -> Error {
    Error::parse(text, target, "invalid syntax")
}

fn parse_part<T: Default, E: std::fmt::Display>(
    part: Option<&str>,
    text: &str,
    target: &str,
    parse: impl Fn(&str) -> std::result::Result<T, E>,
) -> Result<T> {
    match part {
        None => Ok(T::default()),
        Some(part) => parse(part).map_err(|e| Error::parse(text, target, e)),
    }
}

/// Splits `(a+bi)`, `a+bi`, `bi` or `a` into its real and imaginary text.
fn split_complex(text: &str) -> Option<(Option<&str>, Option<&str>)> {
    let mut body = text.trim();
    if let Some(inner) = body.strip_prefix('(') {
        body = inner.strip_suffix(')')?;
    }
    if body.is_empty() {
        return None;
    }

    let Some(imaginary) = body.strip_suffix('i') else {
        return Some((Some(body), None));
    };

    // the real/imaginary boundary is the last sign not belonging to an exponent
    let bytes = imaginary.as_bytes();
    let boundary = (1..bytes.len()).rev().find(|&i| {
        matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E')
    });

    // the imaginary part needs its own digits: `i` and `1+i` are not complex
    match boundary {
        Some(i) if imaginary.len() - i == 1 => None,
        Some(i) => Some((Some(&imaginary[..i]), Some(&imaginary[i..]))),
        None if imaginary.is_empty() => None,
        None => Some((None, Some(imaginary))),
    }
}

/// Renders a timestamp with a `strftime` layout, or RFC 3339 keeping the
/// value's own offset.
///
/// # Errors
///
/// Returns [`Error::UnsupportedVerb`] for a layout chrono cannot render.
pub fn format_time(value: &DateTime<FixedOffset>, layout: Option<&str>) -> Result<String> {
    let Some(layout) = layout.filter(|l| !l.is_empty()) else {
        return Ok(value.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    };
    let mut out = String::new();
    write!(out, "{}", value.format(layout)).map_err(|_| Error::unsupported_verb(layout))?;
    Ok(out)
}

/// Parses a timestamp and normalizes it to UTC.
///
/// With a layout that carries no offset the text is read as a naive
/// date-time, then as a bare date at midnight, both in UTC.
pub fn parse_time(text: &str, layout: Option<&str>) -> Result<DateTime<FixedOffset>> {
    let parsed = match layout.filter(|l| !l.is_empty()) {
        None => DateTime::parse_from_rfc3339(text.trim()),
        Some(layout) => DateTime::parse_from_str(text, layout).or_else(|err| {
            NaiveDateTime::parse_from_str(text, layout)
                .or_else(|_| {
                    NaiveDate::parse_from_str(text, layout)
                        .map(|date| date.and_time(NaiveTime::MIN))
                })
                .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
                .map_err(|_| err)
        }),
    };
    parsed
        .map(|ts| ts.with_timezone(&Utc).fixed_offset())
        .map_err(|e| Error::parse(text, "DateTime", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_styles() {
        let cases = [
            (None, "true", "false"),
            (Some("lower"), "true", "false"),
            (Some("short"), "T", "F"),
            (Some("shortlower"), "t", "f"),
            (Some("upper"), "TRUE", "FALSE"),
            (Some("camel"), "True", "False"),
            (Some("int"), "1", "0"),
            (Some("bogus"), "true", "false"),
        ];
        for (verb, yes, no) in cases {
            let style = BoolStyle::from_verb(verb);
            assert_eq!(style.render(true), yes);
            assert_eq!(style.render(false), no);
            assert!(parse_bool(yes).unwrap());
            assert!(!parse_bool(no).unwrap());
        }
    }

    #[test]
    fn test_bool_word_excludes_digits() {
        assert_eq!(parse_bool_word("0"), None);
        assert_eq!(parse_bool_word("1"), None);
        assert_eq!(parse_bool_word("True"), Some(true));
        assert_eq!(parse_bool_word("yes"), None);
    }

    #[test]
    fn test_float_verbs() {
        assert_eq!(FloatVerb::from_verb(None).unwrap(), FloatVerb::Fixed);
        assert_eq!(FloatVerb::from_verb(Some("g")).unwrap(), FloatVerb::General);
        assert_eq!(FloatVerb::from_verb(Some("Gx")).unwrap(), FloatVerb::UpperGeneral);
        let err = FloatVerb::from_verb(Some("x")).unwrap_err();
        assert_eq!(err, Error::unsupported_verb("x"));
    }

    #[test]
    fn test_format_f64() {
        assert_eq!(format_f64(8589934592.0, FloatVerb::Fixed), "8589934592");
        assert_eq!(format_f64(3.5, FloatVerb::LowerExp), "3.5e+00");
        assert_eq!(format_f64(1.5e-7, FloatVerb::UpperExp), "1.5E-07");
        assert_eq!(format_f64(1e6, FloatVerb::General), "1e+06");
        assert_eq!(format_f64(123456.0, FloatVerb::General), "123456");
        assert_eq!(format_f64(0.0001, FloatVerb::General), "0.0001");
        assert_eq!(format_f64(0.00001, FloatVerb::UpperGeneral), "1E-05");
        assert_eq!(
            format_f64(f64::MAX, FloatVerb::LowerExp),
            "1.7976931348623157e+308"
        );
        assert_eq!(format_f64(f64::INFINITY, FloatVerb::Fixed), "+Inf");
        assert_eq!(format_f64(f64::NEG_INFINITY, FloatVerb::General), "-Inf");
        assert_eq!(format_f64(f64::NAN, FloatVerb::Fixed), "NaN");
    }

    #[test]
    fn test_format_f32_uses_single_precision() {
        assert_eq!(format_f32(f32::MAX, FloatVerb::LowerExp), "3.4028235e+38");
        assert_eq!(format_f32(0.1, FloatVerb::Fixed), "0.1");
    }

    #[test]
    fn test_non_finite_round_trip() {
        assert_eq!(parse_f64("+Inf").unwrap(), f64::INFINITY);
        assert_eq!(parse_f64("-Inf").unwrap(), f64::NEG_INFINITY);
        assert!(parse_f64("NaN").unwrap().is_nan());
    }

    #[test]
    fn test_complex_text() {
        let value = Complex64::new(3.0, 598.0);
        assert_eq!(format_complex64(value, FloatVerb::Fixed), "(3+598i)");
        assert_eq!(
            format_complex64(Complex64::new(0.0, -2.5), FloatVerb::Fixed),
            "(0-2.5i)"
        );
        assert_eq!(
            format_complex32(Complex32::new(0.0, 2.0), FloatVerb::Fixed),
            "(0+2i)"
        );
    }

    #[test]
    fn test_parse_complex_forms() {
        assert_eq!(
            parse_complex64("(1.2+3.78i)").unwrap(),
            Complex64::new(1.2, 3.78)
        );
        assert_eq!(parse_complex64("1-2i").unwrap(), Complex64::new(1.0, -2.0));
        assert_eq!(parse_complex64("2i").unwrap(), Complex64::new(0.0, 2.0));
        assert_eq!(parse_complex64("7").unwrap(), Complex64::new(7.0, 0.0));
        assert_eq!(
            parse_complex64("(1e+10-1.5e-3i)").unwrap(),
            Complex64::new(1e10, -1.5e-3)
        );
        assert!(parse_complex64("i").is_err());
        assert!(parse_complex64("1+i").is_err());
        assert!(parse_complex64("2-i").is_err());
        assert!(parse_complex64("(1+i)").is_err());
        assert!(parse_complex64("foo").is_err());
        assert!(parse_complex64("()").is_err());
        assert!(parse_complex64("(1+2i").is_err());
    }

    #[test]
    fn test_time_default_profile() {
        let ts = parse_time("2021-02-18T09:56:00Z", None).unwrap();
        assert_eq!(format_time(&ts, None).unwrap(), "2021-02-18T09:56:00Z");

        let shifted = parse_time("2021-02-18T11:56:00+02:00", None).unwrap();
        assert_eq!(shifted, ts);
        assert_eq!(shifted.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_time_marshal_keeps_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2021, 2, 18, 11, 56, 0).unwrap();
        assert_eq!(format_time(&ts, None).unwrap(), "2021-02-18T11:56:00+02:00");
    }

    #[test]
    fn test_time_layouts() {
        let ts = parse_time("2021-02-18", Some("%Y-%m-%d")).unwrap();
        assert_eq!(format_time(&ts, Some("%Y-%m-%d")).unwrap(), "2021-02-18");

        let ts = parse_time("2021-02-18 09:56", Some("%Y-%m-%d %H:%M")).unwrap();
        assert_eq!(format_time(&ts, None).unwrap(), "2021-02-18T09:56:00Z");

        assert!(parse_time("18/02/2021", Some("%Y-%m-%d")).is_err());
        assert_eq!(
            format_time(&ts, Some("%Q")),
            Err(Error::unsupported_verb("%Q"))
        );
    }
}
