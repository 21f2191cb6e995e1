//! Scalar coercion between [`Value`]s and their text form.
//!
//! These are the leaf conversions both engines call: one value or one piece
//! of text at a time, driven by the declared [`Kind`] and the field's format
//! verb. Sequences are walked by the engines, never here.
//!
//! ```rust
//! use urlvalues::coerce::{decode, decode_any, encode};
//! use urlvalues::{Kind, Value};
//!
//! let text = encode(&Value::Bool(true), &Kind::Bool, Some("int")).unwrap();
//! assert_eq!(text.as_deref(), Some("1"));
//!
//! let value = decode("1", &Kind::Bool, Some("int")).unwrap();
//! assert_eq!(value, Value::Bool(true));
//!
//! assert_eq!(decode_any("1.5"), Value::Float64(1.5));
//! ```

use crate::duration::{format_duration, parse_duration};
use crate::format::{self, BoolStyle, FloatVerb};
use crate::{Error, Kind, Result, Value};
use num_bigint::BigInt;

/// Renders one value as text.
///
/// Returns `Ok(None)` when the value must be skipped: an absent optional, or
/// an empty sequence or all-zero array. Zero scalars are still written
/// (`"0"`, `"false"`, `""`), also behind `Some`; dropping them is the
/// caller's `omitempty` decision.
///
/// # Errors
///
/// Fails on an unsupported float/complex verb or timestamp layout, a
/// duration outside 64-bit nanoseconds, or a nested sequence.
pub fn encode(value: &Value, kind: &Kind, verb: Option<&str>) -> Result<Option<String>> {
    if value.is_null() || (kind.is_reference() && kind.is_zero_value(value)) {
        return Ok(None);
    }

    let text = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => BoolStyle::from_verb(verb).render(*b).to_string(),
        Value::Int(i) => i.to_string(),
        Value::Uint(u) => u.to_string(),
        Value::BigInt(b) => b.to_string(),
        Value::Float32(f) => format::format_f32(*f, FloatVerb::from_verb(verb)?),
        Value::Float64(f) => format::format_f64(*f, FloatVerb::from_verb(verb)?),
        Value::Complex32(c) => format::format_complex32(*c, FloatVerb::from_verb(verb)?),
        Value::Complex64(c) => format::format_complex64(*c, FloatVerb::from_verb(verb)?),
        Value::Text(s) | Value::Failure(s) => s.clone(),
        Value::Time(t) => format::format_time(t, verb)?,
        Value::Duration(d) => format_duration(*d, verb)?,
        Value::Seq(_) => return Err(Error::unsupported_type(&kind.to_string())),
    };
    Ok(Some(text))
}

/// Parses one piece of text as the given kind.
///
/// Optional kinds decode their inner kind; a successful result is the
/// present value. Parse failures carry the underlying parser's message.
pub fn decode(text: &str, kind: &Kind, verb: Option<&str>) -> Result<Value> {
    match kind {
        Kind::Bool => format::parse_bool(text).map(Value::Bool),
        Kind::Int(bits) => parse_int(text, *bits).map(Value::Int),
        Kind::Uint(bits) => parse_uint(text, *bits).map(Value::Uint),
        Kind::BigInt => text
            .trim()
            .parse::<BigInt>()
            .map(Value::BigInt)
            .map_err(|e| Error::parse(text, "BigInt", e)),
        Kind::Float32 => {
            FloatVerb::from_verb(verb)?;
            format::parse_f32(text).map(Value::Float32)
        }
        Kind::Float64 => {
            FloatVerb::from_verb(verb)?;
            format::parse_f64(text).map(Value::Float64)
        }
        Kind::Complex32 => {
            FloatVerb::from_verb(verb)?;
            format::parse_complex32(text).map(Value::Complex32)
        }
        Kind::Complex64 => {
            FloatVerb::from_verb(verb)?;
            format::parse_complex64(text).map(Value::Complex64)
        }
        Kind::Text => Ok(Value::Text(text.to_string())),
        Kind::Time => format::parse_time(text, verb).map(Value::Time),
        Kind::Duration => parse_duration(text, verb).map(Value::Duration),
        Kind::Failure => Ok(Value::Failure(text.to_string())),
        Kind::Any => Ok(decode_any(text)),
        Kind::Optional(inner) => decode(text, inner, verb),
        Kind::Sequence(_) | Kind::Array(..) => Err(Error::unsupported_type(&kind.to_string())),
    }
}

/// Decodes text with no declared type.
///
/// The first tier that accepts the text wins:
///
/// 1. boolean words (`true`, `F`, `TRUE`, ...; not `1`/`0`)
/// 2. 64-bit float
/// 3. complex number
/// 4. RFC 3339 timestamp, normalized to UTC
/// 5. the raw text
#[must_use]
pub fn decode_any(text: &str) -> Value {
    if let Some(b) = format::parse_bool_word(text) {
        return Value::Bool(b);
    }
    if let Ok(f) = text.parse::<f64>() {
        return Value::Float64(f);
    }
    if let Ok(c) = format::parse_complex64(text) {
        return Value::Complex64(c);
    }
    if let Ok(t) = format::parse_time(text, None) {
        return Value::Time(t);
    }
    Value::Text(text.to_string())
}

fn parse_int(text: &str, bits: u32) -> Result<i64> {
    let target = format!("i{bits}");
    let value: i64 = text
        .parse()
        .map_err(|e| Error::parse(text, &target, e))?;
    if bits < 64 {
        let limit = 1i64 << (bits - 1);
        if value < -limit || value >= limit {
            return Err(Error::parse(text, &target, "value out of range"));
        }
    }
    Ok(value)
}

fn parse_uint(text: &str, bits: u32) -> Result<u64> {
    let target = format!("u{bits}");
    let value: u64 = text
        .parse()
        .map_err(|e| Error::parse(text, &target, e))?;
    if bits < 64 && value >= 1u64 << bits {
        return Err(Error::parse(text, &target, "value out of range"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use num_complex::Complex64;

    fn optional(kind: Kind) -> Kind {
        Kind::Optional(Box::new(kind))
    }

    #[test]
    fn test_zero_scalars_are_written() {
        assert_eq!(encode(&Value::Int(0), &Kind::Int(32), None).unwrap().as_deref(), Some("0"));
        assert_eq!(
            encode(&Value::Bool(false), &Kind::Bool, None).unwrap().as_deref(),
            Some("false")
        );
        assert_eq!(
            encode(&Value::Text(String::new()), &Kind::Text, None).unwrap().as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_zero_references_are_skipped() {
        assert_eq!(encode(&Value::Null, &optional(Kind::Int(8)), None).unwrap(), None);
        assert_eq!(
            encode(&Value::Int(0), &optional(Kind::Int(8)), None).unwrap().as_deref(),
            Some("0")
        );
        assert_eq!(
            encode(&Value::Int(4), &optional(Kind::Int(8)), None).unwrap().as_deref(),
            Some("4")
        );
    }

    #[test]
    fn test_nested_sequence_is_unsupported() {
        let kind = Kind::Sequence(Box::new(Kind::Int(64)));
        let err = encode(&Value::Seq(vec![Value::Int(1)]), &kind, None).unwrap_err();
        assert_eq!(err, Error::unsupported_type("Vec<i64>"));
    }

    #[test]
    fn test_float_verb_errors_both_ways() {
        assert!(encode(&Value::Float64(1.0), &Kind::Float64, Some("x")).is_err());
        assert!(decode("1.0", &Kind::Float64, Some("x")).is_err());
        assert!(decode("(1+1i)", &Kind::Complex64, Some("q")).is_err());
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(decode("127", &Kind::Int(8), None).unwrap(), Value::Int(127));
        assert_eq!(decode("-128", &Kind::Int(8), None).unwrap(), Value::Int(-128));
        assert!(decode("128", &Kind::Int(8), None).is_err());
        assert_eq!(decode("255", &Kind::Uint(8), None).unwrap(), Value::Uint(255));
        assert!(decode("256", &Kind::Uint(8), None).is_err());
        assert!(decode("-1", &Kind::Uint(64), None).is_err());
        assert_eq!(
            decode("18446744073709551615", &Kind::Uint(64), None).unwrap(),
            Value::Uint(u64::MAX)
        );
    }

    #[test]
    fn test_parse_errors_keep_underlying_message() {
        let err = decode("abc", &Kind::Int(32), None).unwrap_err();
        assert!(err.to_string().contains("invalid digit"), "{err}");
    }

    #[test]
    fn test_optional_decodes_inner() {
        assert_eq!(
            decode("7", &optional(Kind::Uint(16)), None).unwrap(),
            Value::Uint(7)
        );
        assert!(decode("x", &optional(Kind::Uint(16)), None).is_err());
    }

    #[test]
    fn test_duration_zero_short_circuit() {
        assert_eq!(
            decode("0", &Kind::Duration, Some("int,h")).unwrap(),
            Value::Duration(TimeDelta::zero())
        );
    }

    #[test]
    fn test_decode_any_precedence() {
        assert_eq!(decode_any("true"), Value::Bool(true));
        assert_eq!(decode_any("F"), Value::Bool(false));
        assert_eq!(decode_any("0"), Value::Float64(0.0));
        assert_eq!(decode_any("1"), Value::Float64(1.0));
        assert_eq!(decode_any("32"), Value::Float64(32.0));
        assert_eq!(decode_any("1.2"), Value::Float64(1.2));
        assert_eq!(decode_any("44.3e7"), Value::Float64(44.3e7));
        assert_eq!(
            decode_any("(1.2+3.78i)"),
            Value::Complex64(Complex64::new(1.2, 3.78))
        );
        assert_eq!(decode_any("1+2i"), Value::Complex64(Complex64::new(1.0, 2.0)));
        assert_eq!(
            decode_any("2021-02-18T09:56:00Z"),
            Value::Time(Utc.with_ymd_and_hms(2021, 2, 18, 9, 56, 0).unwrap().fixed_offset())
        );
        assert_eq!(decode_any("foo"), Value::Text("foo".to_string()));
        assert_eq!(decode_any(""), Value::Text(String::new()));
        assert_eq!(decode_any("i"), Value::Text("i".to_string()));
        assert_eq!(decode_any("1+i"), Value::Text("1+i".to_string()));
        assert_eq!(decode_any("2-i"), Value::Text("2-i".to_string()));
    }
}
