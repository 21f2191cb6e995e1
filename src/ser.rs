//! Marshaling into URL values.
//!
//! [`MarshalValues`] is the capability every marshalable type exposes.
//! Records declared with [`url_record!`](crate::url_record) implement it by
//! calling [`marshal_record`]; maps of dynamic values go through
//! [`marshal_map`]. A type can also implement it by hand to take over its own
//! encoding entirely.
//!
//! ## Record rules
//!
//! For every visible field, in declaration order:
//!
//! - fields tagged `-` are left out, as are absent optionals
//! - zero fields tagged `omitempty` are left out
//! - sequences and arrays produce one value per element, or a single value
//!   when a `join='...'` separator is declared; elements that encode to
//!   nothing are dropped, and a sequence with nothing left produces no key
//! - scalars produce exactly one value
//!
//! ```rust
//! use urlvalues::{marshal, url_record};
//!
//! url_record! {
//!     #[derive(Clone, Debug, Default)]
//!     pub struct Search {
//!         #[url = "q"]
//!         pub query: String,
//!         #[url = "tag,join=','"]
//!         pub tags: Vec<String>,
//!         #[url = "page,omitempty"]
//!         pub page: u32,
//!     }
//! }
//!
//! let search = Search {
//!     query: "rust".to_string(),
//!     tags: vec!["a".to_string(), "b".to_string()],
//!     page: 0,
//! };
//! let values = marshal(&search).unwrap();
//! assert_eq!(values.encode(), "q=rust&tag=a%2Cb");
//! ```

use crate::coerce::encode;
use crate::record::{FieldSpec, Record};
use crate::{Error, Kind, Result, UrlValues, Value, ValueMap};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::{debug, trace};

/// Types that can be converted into [`UrlValues`].
pub trait MarshalValues {
    /// # Errors
    ///
    /// Any error aborts the whole conversion; implementations must not return
    /// partial output.
    fn marshal_values(&self) -> Result<UrlValues>;
}

/// Marshals a record through its field table.
///
/// # Errors
///
/// Fails on a malformed tag, an unsupported format verb or a value that
/// cannot be rendered as text.
pub fn marshal_record<R: Record>(record: &R) -> Result<UrlValues> {
    let mut out = UrlValues::new();

    for (decl, value) in R::fields().into_iter().zip(record.values()) {
        let name = decl.name;
        let Some(spec) = FieldSpec::resolve(decl)? else {
            trace!("field {} is not marshaled", name);
            continue;
        };

        if value.is_null() {
            trace!("skipping nil field {}", name);
            continue;
        }
        if spec.omit_empty && spec.kind.is_zero_value(&value) {
            trace!("omitting empty field {}", name);
            continue;
        }

        marshal_field(&mut out, &spec, &value).map_err(|err| {
            debug!("failed to marshal field {} as {:?}: {}", name, spec.key, err);
            err
        })?;
    }

    Ok(out)
}

fn marshal_field(out: &mut UrlValues, spec: &FieldSpec, value: &Value) -> Result<()> {
    let Value::Seq(items) = value else {
        if let Some(text) = encode(value, &spec.kind, spec.format)? {
            out.set(spec.key.as_str(), text);
        }
        return Ok(());
    };

    let elem = spec.kind.pointee().element().unwrap_or(&Kind::Any);
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        if let Some(text) = encode(item, elem, spec.format)? {
            parts.push(text);
        }
    }

    if parts.is_empty() {
        trace!("sequence field {} has nothing to write", spec.name);
        return Ok(());
    }

    match &spec.join {
        Some(separator) => out.set(spec.key.as_str(), parts.join(separator)),
        None => {
            for part in parts {
                out.append(spec.key.as_str(), part);
            }
        }
    }
    Ok(())
}

/// Marshals string-keyed dynamic values.
///
/// Sequences become multi-valued keys, one value per element; join
/// separators only exist on record fields. `Null` entries are skipped.
///
/// # Errors
///
/// Fails on a nested sequence or a value that cannot be rendered as text.
pub fn marshal_map<'a, I>(entries: I) -> Result<UrlValues>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut out = UrlValues::new();

    for (key, value) in entries {
        match value {
            Value::Seq(items) => {
                for item in items {
                    if let Some(text) = encode(item, &item.kind(), None)? {
                        out.append(key.as_str(), text);
                    }
                }
            }
            scalar => {
                if let Some(text) = encode(scalar, &scalar.kind(), None)? {
                    out.set(key.as_str(), text);
                } else {
                    trace!("skipping nil map entry {}", key);
                }
            }
        }
    }

    Ok(out)
}

impl MarshalValues for ValueMap {
    fn marshal_values(&self) -> Result<UrlValues> {
        marshal_map(self.iter())
    }
}

impl<S: BuildHasher> MarshalValues for HashMap<String, Value, S> {
    fn marshal_values(&self) -> Result<UrlValues> {
        marshal_map(self.iter())
    }
}

impl<T: MarshalValues + ?Sized> MarshalValues for &T {
    fn marshal_values(&self) -> Result<UrlValues> {
        (**self).marshal_values()
    }
}

impl<T: MarshalValues + ?Sized> MarshalValues for Box<T> {
    fn marshal_values(&self) -> Result<UrlValues> {
        (**self).marshal_values()
    }
}

/// `None` is the nil value and is rejected.
impl<T: MarshalValues> MarshalValues for Option<T> {
    fn marshal_values(&self) -> Result<UrlValues> {
        match self {
            Some(inner) => inner.marshal_values(),
            None => Err(Error::nil("value")),
        }
    }
}

/// A lone dynamic value is never a valid argument: `Null` is nil, and
/// scalars and sequences have no keys.
impl MarshalValues for Value {
    fn marshal_values(&self) -> Result<UrlValues> {
        match self {
            Value::Null => Err(Error::nil("value")),
            other => Err(Error::invalid_argument(&format!(
                "argument must be a map, a record, or a reference to a record, not {}",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldDecl, FieldValue};

    #[derive(Clone, Default)]
    struct Manual {
        numbers: Vec<i32>,
        maybe: Option<u8>,
        hidden: bool,
    }

    impl Record for Manual {
        fn fields() -> Vec<FieldDecl> {
            vec![
                FieldDecl {
                    name: "numbers",
                    tag: Some("n,join='|'"),
                    format: None,
                    exported: true,
                    kind: <Vec<i32>>::kind(),
                },
                FieldDecl {
                    name: "maybe",
                    tag: None,
                    format: None,
                    exported: true,
                    kind: <Option<u8>>::kind(),
                },
                FieldDecl {
                    name: "hidden",
                    tag: None,
                    format: None,
                    exported: false,
                    kind: bool::kind(),
                },
            ]
        }

        fn values(&self) -> Vec<Value> {
            vec![
                self.numbers.to_value(),
                self.maybe.to_value(),
                self.hidden.to_value(),
            ]
        }

        fn assign(&mut self, name: &str, _value: Value) -> Result<()> {
            Err(Error::unknown_field(name))
        }
    }

    #[test]
    fn test_join_and_nil() {
        let manual = Manual {
            numbers: vec![1, 0, 3],
            maybe: None,
            hidden: true,
        };
        let values = marshal_record(&manual).unwrap();
        assert_eq!(values.get_all("n").unwrap(), ["1|0|3"]);
        assert!(!values.contains_key("maybe"));
        assert!(!values.contains_key("hidden"));
    }

    #[test]
    fn test_empty_sequence_writes_no_key() {
        let values = marshal_record(&Manual::default()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_map_sequences_are_multi_valued() {
        let mut map = ValueMap::new();
        map.insert(
            "list".to_string(),
            Value::Seq(vec![Value::from(1.5), Value::from("x")]),
        );
        map.insert("flag".to_string(), Value::from(true));
        map.insert("nothing".to_string(), Value::Null);

        let values = map.marshal_values().unwrap();
        assert_eq!(values.get_all("list").unwrap(), ["1.5", "x"]);
        assert_eq!(values.get("flag"), Some("true"));
        assert!(!values.contains_key("nothing"));
    }

    #[test]
    fn test_nested_map_sequence_is_rejected() {
        let mut map = ValueMap::new();
        map.insert(
            "nested".to_string(),
            Value::Seq(vec![Value::Seq(vec![Value::from(1)])]),
        );
        assert!(matches!(
            map.marshal_values(),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(Value::Null.marshal_values(), Err(Error::nil("value")));
        assert!(matches!(
            Value::from(3).marshal_values(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            Option::<ValueMap>::None.marshal_values(),
            Err(Error::nil("value"))
        );
        assert!(Some(ValueMap::new()).marshal_values().unwrap().is_empty());
    }
}
