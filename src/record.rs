//! Records and their fields.
//!
//! A record is a flat struct whose fields are scalars, optionals or
//! sequences of scalars. The [`url_record!`](crate::url_record) macro
//! implements [`Record`] from the struct definition; the engines in
//! [`ser`](crate::ser) and [`de`](crate::de) only ever see the field table
//! and the [`Value`] of each field.
//!
//! [`FieldValue`] bridges a concrete field type and [`Value`]. It is
//! implemented for every supported scalar and for `Option<T>`, `Vec<T>` and
//! `[T; N]` of those.

use crate::tag::{parse_tag, Tag};
use crate::{Error, Kind, Result, Value};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use num_bigint::BigInt;
use num_complex::{Complex32, Complex64};
use std::fmt;

/// A field type the codec can carry.
pub trait FieldValue: Sized {
    /// The declared kind of this type.
    fn kind() -> Kind;

    fn to_value(&self) -> Value;

    /// Converts a decoded value back, rejecting values of another type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAssignable`] naming both types.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(value: &Value, expected: &Kind) -> Result<T> {
    Err(Error::not_assignable(value.type_name(), &expected.to_string()))
}

macro_rules! signed_field {
    ($($ty:ty => $bits:expr),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn kind() -> Kind {
                    Kind::Int($bits)
                }

                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).or_else(|_| mismatch(&value, &Self::kind())),
                        other => mismatch(&other, &Self::kind()),
                    }
                }
            }
        )*
    };
}

macro_rules! unsigned_field {
    ($($ty:ty => $bits:expr),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn kind() -> Kind {
                    Kind::Uint($bits)
                }

                fn to_value(&self) -> Value {
                    Value::Uint(*self as u64)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Uint(u) => <$ty>::try_from(u).or_else(|_| mismatch(&value, &Self::kind())),
                        other => mismatch(&other, &Self::kind()),
                    }
                }
            }
        )*
    };
}

signed_field! {
    i8 => 8,
    i16 => 16,
    i32 => 32,
    i64 => 64,
    isize => isize::BITS,
}

unsigned_field! {
    u8 => 8,
    u16 => 16,
    u32 => 32,
    u64 => 64,
    usize => usize::BITS,
}

macro_rules! plain_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }

                fn to_value(&self) -> Value {
                    Value::$kind(self.clone())
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$kind(inner) => Ok(inner),
                        other => mismatch(&other, &Self::kind()),
                    }
                }
            }
        )*
    };
}

plain_field! {
    BigInt => BigInt,
    f32 => Float32,
    f64 => Float64,
    Complex32 => Complex32,
    Complex64 => Complex64,
    DateTime<FixedOffset> => Time,
    TimeDelta => Duration,
}

impl FieldValue for bool {
    fn kind() -> Kind {
        Kind::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => mismatch(&other, &Self::kind()),
        }
    }
}

impl FieldValue for String {
    fn kind() -> Kind {
        Kind::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => mismatch(&other, &Self::kind()),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    fn kind() -> Kind {
        Kind::Time
    }

    fn to_value(&self) -> Value {
        Value::Time(self.fixed_offset())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(t) => Ok(t.with_timezone(&Utc)),
            other => mismatch(&other, &Self::kind()),
        }
    }
}

impl FieldValue for std::time::Duration {
    fn kind() -> Kind {
        Kind::Duration
    }

    fn to_value(&self) -> Value {
        Value::Duration(TimeDelta::from_std(*self).unwrap_or(TimeDelta::MAX))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Duration(d) => d
                .to_std()
                .map_err(|_| Error::not_assignable("negative Duration", "std::time::Duration")),
            other => mismatch(&other, &Self::kind()),
        }
    }
}

impl FieldValue for Failure {
    fn kind() -> Kind {
        Kind::Failure
    }

    fn to_value(&self) -> Value {
        Value::Failure(self.0.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Failure(message) => Ok(Failure(message)),
            other => mismatch(&other, &Self::kind()),
        }
    }
}

impl FieldValue for Value {
    fn kind() -> Kind {
        Kind::Any
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn kind() -> Kind {
        Kind::Optional(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn kind() -> Kind {
        Kind::Sequence(Box::new(T::kind()))
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => mismatch(&other, &Self::kind()),
        }
    }
}

/// Extra items are ignored; missing items keep `T::default()`.
impl<T: FieldValue + Default, const N: usize> FieldValue for [T; N] {
    fn kind() -> Kind {
        Kind::Array(Box::new(T::kind()), N)
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Seq(items) => {
                let mut out: [T; N] = std::array::from_fn(|_| T::default());
                for (slot, item) in out.iter_mut().zip(items) {
                    *slot = T::from_value(item)?;
                }
                Ok(out)
            }
            other => mismatch(&other, &Self::kind()),
        }
    }
}

/// An error-like value carried as its message.
///
/// ```rust
/// use urlvalues::Failure;
///
/// let failure = Failure::new("disk full");
/// assert_eq!(failure.to_string(), "disk full");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Failure(String);

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Failure(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Failure {}

/// One field as declared on a record type.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    /// Rust field name.
    pub name: &'static str,
    /// Raw `#[url = "..."]` declaration.
    pub tag: Option<&'static str>,
    /// Raw `#[urlformat = "..."]` verb.
    pub format: Option<&'static str>,
    /// Whether the field is declared `pub`.
    pub exported: bool,
    pub kind: Kind,
}

/// A field joined with its parsed tag: the unit of work of both engines.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// External key in the multimap.
    pub key: String,
    pub omit_empty: bool,
    pub join: Option<String>,
    pub format: Option<&'static str>,
    pub kind: Kind,
}

impl FieldSpec {
    /// Resolves a declaration.
    ///
    /// Returns `Ok(None)` for fields that take no part in the codec: not
    /// `pub`, or tagged `-`.
    ///
    /// # Errors
    ///
    /// Propagates tag grammar errors.
    pub fn resolve(decl: FieldDecl) -> Result<Option<Self>> {
        if !decl.exported {
            return Ok(None);
        }

        let tag = match decl.tag {
            Some(raw) => match parse_tag(raw)? {
                Some(tag) => tag,
                None => return Ok(None),
            },
            None => Tag::default(),
        };

        let key = if tag.name.is_empty() {
            decl.name.to_string()
        } else {
            tag.name
        };

        Ok(Some(FieldSpec {
            name: decl.name,
            key,
            omit_empty: tag.omit_empty,
            join: tag.join,
            format: decl.format,
            kind: decl.kind,
        }))
    }
}

/// A flat struct the engines can walk.
///
/// Usually implemented by [`url_record!`](crate::url_record).
pub trait Record: Clone {
    /// Every field in declaration order, including private and skipped ones.
    fn fields() -> Vec<FieldDecl>;

    /// Current field values, in the same order as [`Record::fields`].
    fn values(&self) -> Vec<Value>;

    /// Assigns a decoded value to the named field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAssignable`] when the value does not fit the field
    /// type, or [`Error::UnknownField`] for an undeclared name.
    fn assign(&mut self, name: &str, value: Value) -> Result<()>;
}
