//! Unmarshaling from URL values.
//!
//! [`UnmarshalValues`] mirrors [`MarshalValues`](crate::MarshalValues):
//! records go through [`unmarshal_record`], dynamic maps through
//! [`unmarshal_map`], and any type may implement it by hand.
//!
//! Record unmarshaling is atomic. Fields are decoded into a staged copy of
//! the destination, which replaces the destination only once every field has
//! been decoded and assigned; on error the destination is untouched.
//!
//! ```rust
//! use urlvalues::{unmarshal, url_record, UrlValues};
//!
//! url_record! {
//!     #[derive(Clone, Debug, Default, PartialEq)]
//!     pub struct Paging {
//!         #[url = "page"]
//!         pub page: u32,
//!         #[url = "size,omitempty"]
//!         pub size: u32,
//!     }
//! }
//!
//! let values = UrlValues::parse("page=3&size=0");
//! let mut paging = Paging { page: 1, size: 20 };
//! unmarshal(&values, &mut paging).unwrap();
//! assert_eq!(paging, Paging { page: 3, size: 20 });
//! ```

use crate::coerce::{decode, decode_any};
use crate::record::{FieldSpec, Record};
use crate::{Error, Kind, Result, UrlValues, Value, ValueMap};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::{debug, trace};

/// Types that can be populated from [`UrlValues`].
pub trait UnmarshalValues {
    /// # Errors
    ///
    /// Implementations should leave `self` unchanged on error.
    fn unmarshal_values(&mut self, values: &UrlValues) -> Result<()>;
}

/// Decodes values into a record through its field table.
///
/// Keys the multimap does not contain leave their field as it was, and so
/// does a zero decode for an `omitempty` field.
///
/// # Errors
///
/// Fails on a malformed tag, unparseable text or a decoded value that does not
/// fit its field. The destination is left unchanged.
pub fn unmarshal_record<R: Record>(values: &UrlValues, dest: &mut R) -> Result<()> {
    let mut staged = dest.clone();

    for decl in R::fields() {
        let name = decl.name;
        let Some(spec) = FieldSpec::resolve(decl)? else {
            trace!("field {} is not unmarshaled", name);
            continue;
        };

        let texts = match values.get_all(&spec.key) {
            Some(texts) if !texts.is_empty() => texts,
            _ => continue,
        };

        let value = decode_field(&spec, texts).map_err(|err| {
            debug!("failed to unmarshal {:?} into field {}: {}", spec.key, name, err);
            err
        })?;

        if spec.omit_empty && spec.kind.is_zero_value(&value) {
            trace!("keeping field {}: decoded value is empty", name);
            continue;
        }

        staged.assign(name, value)?;
    }

    *dest = staged;
    Ok(())
}

fn decode_field(spec: &FieldSpec, texts: &[String]) -> Result<Value> {
    match spec.kind.pointee() {
        Kind::Sequence(elem) => decode_elements(spec, texts, elem, None),
        Kind::Array(elem, len) => decode_elements(spec, texts, elem, Some(*len)),
        Kind::Any if texts.len() > 1 => Ok(Value::Seq(
            texts.iter().map(|text| decode_any(text)).collect(),
        )),
        _ => decode(&texts[0], &spec.kind, spec.format),
    }
}

/// Decodes sequence elements.
///
/// Slots start at the element zero value; a zero decode is not written back
/// unless the element is optional. Arrays take at most `len` elements.
fn decode_elements(
    spec: &FieldSpec,
    texts: &[String],
    elem: &Kind,
    len: Option<usize>,
) -> Result<Value> {
    let pieces: Vec<&str> = match (&spec.join, texts) {
        (Some(separator), [single]) => split(single, separator),
        _ => texts.iter().map(String::as_str).collect(),
    };

    let mut items = vec![elem.zero_value(); len.unwrap_or(pieces.len())];
    for (slot, piece) in items.iter_mut().zip(pieces) {
        let decoded = decode(piece, elem, spec.format)?;
        if elem.is_optional() || !decoded.is_zero() {
            *slot = decoded;
        }
    }

    Ok(Value::Seq(items))
}

/// Splits on `separator`; an empty separator splits into characters.
fn split<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).collect()
    }
}

/// Decodes every key without a declared type.
///
/// A single value decodes with [`decode_any`]; several values become a
/// [`Value::Seq`] of individually decoded items.
#[must_use]
pub fn unmarshal_map(values: &UrlValues) -> ValueMap {
    values
        .iter()
        .map(|(key, texts)| {
            let value = match texts.as_slice() {
                [single] => decode_any(single),
                many => Value::Seq(many.iter().map(|text| decode_any(text)).collect()),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Replaces the map's content.
impl UnmarshalValues for ValueMap {
    fn unmarshal_values(&mut self, values: &UrlValues) -> Result<()> {
        *self = unmarshal_map(values);
        Ok(())
    }
}

impl<S: BuildHasher + Default> UnmarshalValues for HashMap<String, Value, S> {
    fn unmarshal_values(&mut self, values: &UrlValues) -> Result<()> {
        *self = unmarshal_map(values).into_iter().collect();
        Ok(())
    }
}

impl<T: UnmarshalValues + ?Sized> UnmarshalValues for &mut T {
    fn unmarshal_values(&mut self, values: &UrlValues) -> Result<()> {
        (**self).unmarshal_values(values)
    }
}

impl<T: UnmarshalValues + ?Sized> UnmarshalValues for Box<T> {
    fn unmarshal_values(&mut self, values: &UrlValues) -> Result<()> {
        (**self).unmarshal_values(values)
    }
}

/// `None` is the nil destination and is rejected.
impl<T: UnmarshalValues> UnmarshalValues for Option<T> {
    fn unmarshal_values(&mut self, values: &UrlValues) -> Result<()> {
        match self {
            Some(inner) => inner.unmarshal_values(values),
            None => Err(Error::nil("destination")),
        }
    }
}

impl UnmarshalValues for Value {
    fn unmarshal_values(&mut self, _values: &UrlValues) -> Result<()> {
        Err(Error::invalid_argument(
            "destination must be a map or a record",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn spec(kind: Kind, join: Option<&str>) -> FieldSpec {
        FieldSpec {
            name: "field",
            key: "field".to_string(),
            omit_empty: false,
            join: join.map(str::to_string),
            format: None,
            kind,
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_on_join() {
        let kind = Kind::Sequence(Box::new(Kind::Text));
        let value = decode_field(&spec(kind.clone(), Some(", ")), &texts(&["a, b, c"])).unwrap();
        assert_eq!(value, Value::Seq(vec!["a".into(), "b".into(), "c".into()]));

        let value = decode_field(&spec(kind.clone(), Some("")), &texts(&["xyz"])).unwrap();
        assert_eq!(value, Value::Seq(vec!["x".into(), "y".into(), "z".into()]));

        // more than one value is never split
        let value = decode_field(&spec(kind, Some(",")), &texts(&["a,b", "c"])).unwrap();
        assert_eq!(value, Value::Seq(vec!["a,b".into(), "c".into()]));
    }

    #[test]
    fn test_array_takes_at_most_len() {
        let kind = Kind::Array(Box::new(Kind::Int(64)), 2);
        let value = decode_field(&spec(kind.clone(), None), &texts(&["1", "2", "3"])).unwrap();
        assert_eq!(value, Value::Seq(vec![Value::Int(1), Value::Int(2)]));

        let value = decode_field(&spec(kind, None), &texts(&["5"])).unwrap();
        assert_eq!(value, Value::Seq(vec![Value::Int(5), Value::Int(0)]));
    }

    #[test]
    fn test_optional_elements_keep_zero() {
        let kind = Kind::Sequence(Box::new(Kind::Optional(Box::new(Kind::Int(64)))));
        let value = decode_field(&spec(kind, None), &texts(&["0", "2"])).unwrap();
        assert_eq!(value, Value::Seq(vec![Value::Int(0), Value::Int(2)]));
    }

    #[test]
    fn test_untyped_field_with_many_values() {
        let value = decode_field(&spec(Kind::Any, None), &texts(&["1", "x"])).unwrap();
        assert_eq!(value, Value::Seq(vec![Value::Float64(1.0), "x".into()]));
        let value = decode_field(&spec(Kind::Any, None), &texts(&["true"])).unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn test_element_errors_propagate() {
        let kind = Kind::Sequence(Box::new(Kind::Uint(8)));
        assert!(decode_field(&spec(kind, None), &texts(&["1", "-1"])).is_err());
    }

    #[test]
    fn test_unmarshal_map() {
        let mut values = UrlValues::new();
        values.append("real", "32");
        values.append("when", "2021-02-18T09:56:00Z");
        values.append("list", "1.2");
        values.append("list", "-7");

        let map = unmarshal_map(&values);
        assert_eq!(map.get("real"), Some(&Value::Float64(32.0)));
        assert_eq!(
            map.get("when"),
            Some(&Value::Time(
                Utc.with_ymd_and_hms(2021, 2, 18, 9, 56, 0).unwrap().fixed_offset()
            ))
        );
        assert_eq!(
            map.get("list"),
            Some(&Value::Seq(vec![Value::Float64(1.2), Value::Float64(-7.0)]))
        );
    }

    #[test]
    fn test_map_destination_is_replaced() {
        let mut map = ValueMap::new();
        map.insert("stale".to_string(), Value::from(1));
        map.unmarshal_values(&UrlValues::parse("fresh=x")).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("fresh"), Some(&Value::from("x")));
    }

    #[test]
    fn test_shape_errors() {
        let values = UrlValues::new();
        let mut missing: Option<ValueMap> = None;
        assert_eq!(
            missing.unmarshal_values(&values),
            Err(Error::nil("destination"))
        );
        assert!(matches!(
            Value::from(1).unmarshal_values(&values),
            Err(Error::InvalidArgument(_))
        ));
    }
}
