//! Dynamic value representation.
//!
//! [`Value`] is the closed set of things a single URL parameter can decode to
//! when there is no declared type, and the common currency between typed
//! record fields and the coercion functions. [`Kind`] describes a declared
//! field type so the codec knows which parser to run on the way in.
//!
//! ## Creating Values
//!
//! ```rust
//! use urlvalues::Value;
//!
//! let flag = Value::from(true);
//! let count = Value::from(42);
//! let text = Value::from("hello");
//! let list = Value::from(vec![Value::from(1.5), Value::from(2.5)]);
//!
//! assert!(flag.is_bool());
//! assert_eq!(count.as_i64(), Some(42));
//! assert_eq!(text.as_str(), Some("hello"));
//! assert_eq!(list.as_seq().map(|items| items.len()), Some(2));
//! ```

use chrono::{DateTime, FixedOffset, TimeDelta};
use num_bigint::BigInt;
use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically typed URL parameter value.
///
/// `Null` stands for an absent optional; it never appears in decoded output
/// and is skipped when marshaling.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    BigInt(BigInt),
    Float32(f32),
    Float64(f64),
    Complex32(Complex32),
    Complex64(Complex64),
    Text(String),
    Time(DateTime<FixedOffset>),
    Duration(TimeDelta),
    /// Message of an error-like value.
    Failure(String),
    Seq(Vec<Value>),
}

/// The declared type of a record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Bool,
    /// Signed integer of the given bit width.
    Int(u32),
    /// Unsigned integer of the given bit width.
    Uint(u32),
    BigInt,
    Float32,
    Float64,
    Complex32,
    Complex64,
    Text,
    Time,
    Duration,
    Failure,
    /// Untyped; decoded with the precedence rules of [`decode_any`](crate::coerce::decode_any).
    Any,
    Optional(Box<Kind>),
    Sequence(Box<Kind>),
    Array(Box<Kind>, usize),
}

impl Kind {
    #[inline]
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Kind::Optional(_))
    }

    /// Optionals, sequences and arrays: kinds whose zero value is skipped
    /// rather than written out.
    #[inline]
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Kind::Optional(_) | Kind::Sequence(_) | Kind::Array(..))
    }

    /// The kind behind any number of `Optional` layers.
    #[must_use]
    pub fn pointee(&self) -> &Kind {
        match self {
            Kind::Optional(inner) => inner.pointee(),
            other => other,
        }
    }

    /// Element kind of a sequence or array.
    #[must_use]
    pub fn element(&self) -> Option<&Kind> {
        match self {
            Kind::Sequence(elem) | Kind::Array(elem, _) => Some(elem),
            _ => None,
        }
    }

    /// The value a field of this kind holds before anything is assigned.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            Kind::Bool => Value::Bool(false),
            Kind::Int(_) => Value::Int(0),
            Kind::Uint(_) => Value::Uint(0),
            Kind::BigInt => Value::BigInt(BigInt::default()),
            Kind::Float32 => Value::Float32(0.0),
            Kind::Float64 => Value::Float64(0.0),
            Kind::Complex32 => Value::Complex32(Complex32::default()),
            Kind::Complex64 => Value::Complex64(Complex64::default()),
            Kind::Text => Value::Text(String::new()),
            Kind::Time => Value::Time(DateTime::<FixedOffset>::default()),
            Kind::Duration => Value::Duration(TimeDelta::zero()),
            Kind::Failure => Value::Failure(String::new()),
            Kind::Any | Kind::Optional(_) => Value::Null,
            Kind::Sequence(_) => Value::Seq(Vec::new()),
            Kind::Array(elem, len) => Value::Seq(vec![elem.zero_value(); *len]),
        }
    }

    /// Whether `value` is the zero value of this kind.
    ///
    /// Optionals and untyped fields are zero only when `Null`, sequences only
    /// when empty, arrays when every element is zero.
    #[must_use]
    pub fn is_zero_value(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Kind::Optional(_) | Kind::Any, _) => false,
            (Kind::Array(elem, _), Value::Seq(items)) => {
                items.iter().all(|item| elem.is_zero_value(item))
            }
            (_, other) => other.is_zero(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Bool => write!(f, "bool"),
            Kind::Int(bits) => write!(f, "i{}", bits),
            Kind::Uint(bits) => write!(f, "u{}", bits),
            Kind::BigInt => write!(f, "BigInt"),
            Kind::Float32 => write!(f, "f32"),
            Kind::Float64 => write!(f, "f64"),
            Kind::Complex32 => write!(f, "Complex<f32>"),
            Kind::Complex64 => write!(f, "Complex<f64>"),
            Kind::Text => write!(f, "String"),
            Kind::Time => write!(f, "DateTime"),
            Kind::Duration => write!(f, "Duration"),
            Kind::Failure => write!(f, "Failure"),
            Kind::Any => write!(f, "Value"),
            Kind::Optional(inner) => write!(f, "Option<{}>", inner),
            Kind::Sequence(elem) => write!(f, "Vec<{}>", elem),
            Kind::Array(elem, len) => write!(f, "[{}; {}]", elem, len),
        }
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }

    /// Returns `true` for the zero value of the variant: `false`, `0`, `""`,
    /// the Unix epoch, a zero duration, an empty message, `Null` and the
    /// empty sequence. Use [`Kind::is_zero_value`] when the declared type is
    /// known.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use urlvalues::Value;
    ///
    /// assert!(Value::from(0).is_zero());
    /// assert!(Value::from("").is_zero());
    /// assert!(Value::Seq(vec![]).is_zero());
    /// assert!(!Value::from(0.5).is_zero());
    /// ```
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !*b,
            Value::Int(i) => *i == 0,
            Value::Uint(u) => *u == 0,
            Value::BigInt(b) => *b == BigInt::default(),
            Value::Float32(f) => *f == 0.0,
            Value::Float64(f) => *f == 0.0,
            Value::Complex32(c) => c.re == 0.0 && c.im == 0.0,
            Value::Complex64(c) => c.re == 0.0 && c.im == 0.0,
            Value::Text(s) | Value::Failure(s) => s.is_empty(),
            Value::Time(t) => t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0,
            Value::Duration(d) => d.is_zero(),
            Value::Seq(items) => items.is_empty(),
        }
    }

    /// The kind this value naturally encodes as when no type is declared.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Optional(Box::new(Kind::Any)),
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int(64),
            Value::Uint(_) => Kind::Uint(64),
            Value::BigInt(_) => Kind::BigInt,
            Value::Float32(_) => Kind::Float32,
            Value::Float64(_) => Kind::Float64,
            Value::Complex32(_) => Kind::Complex32,
            Value::Complex64(_) => Kind::Complex64,
            Value::Text(_) => Kind::Text,
            Value::Time(_) => Kind::Time,
            Value::Duration(_) => Kind::Duration,
            Value::Failure(_) => Kind::Failure,
            Value::Seq(_) => Kind::Sequence(Box::new(Kind::Any)),
        }
    }

    /// Short type name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "i64",
            Value::Uint(_) => "u64",
            Value::BigInt(_) => "BigInt",
            Value::Float32(_) => "f32",
            Value::Float64(_) => "f64",
            Value::Complex32(_) => "Complex<f32>",
            Value::Complex64(_) => "Complex<f64>",
            Value::Text(_) => "String",
            Value::Time(_) => "DateTime",
            Value::Duration(_) => "Duration",
            Value::Failure(_) => "Failure",
            Value::Seq(_) => "sequence",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as `i64` for in-range signed and unsigned integers.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            Value::Float32(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Seq(items) => {
                write!(
                    f,
                    "[{}]",
                    items
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            other => match crate::coerce::encode(other, &other.kind(), None) {
                Ok(Some(text)) => f.write_str(&text),
                _ => write!(f, "<{}>", other.type_name()),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Uint(u) => serializer.serialize_u64(*u),
            Value::Float32(f) => serializer.serialize_f32(*f),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::Text(s) | Value::Failure(s) => serializer.serialize_str(s),
            Value::Seq(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar or a sequence of scalars")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Uint(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Float64(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::Text(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    items.push(elem);
                }
                Ok(Value::Seq(items))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    BigInt => BigInt,
    f32 => Float32,
    f64 => Float64,
    Complex32 => Complex32,
    Complex64 => Complex64,
    String => Text,
    DateTime<FixedOffset> => Time,
    TimeDelta => Duration,
    Vec<Value> => Seq,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}
