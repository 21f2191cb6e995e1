//! # urlvalues
//!
//! A tag-driven codec between Rust records and URL values: the ordered
//! string multimap behind query strings and
//! `application/x-www-form-urlencoded` bodies.
//!
//! ## Key Features
//!
//! - **Declarative fields**: external names, `omitempty` and `join='...'`
//!   separators are declared per field with `#[url = "..."]`
//! - **Format verbs**: `#[urlformat = "..."]` selects boolean spellings,
//!   float notation, duration units and timestamp layouts
//! - **Dynamic values**: untyped maps decode with a fixed precedence
//!   (boolean, float, complex, timestamp, text)
//! - **Custom hooks**: implement [`MarshalValues`] / [`UnmarshalValues`] by
//!   hand to take over a type's encoding
//! - **Atomic decoding**: a failed unmarshal leaves the destination untouched
//!
//! ## Quick Start
//!
//! ```rust
//! use urlvalues::{marshal, unmarshal, url_record, UrlValues};
//!
//! url_record! {
//!     #[derive(Clone, Debug, Default, PartialEq)]
//!     pub struct Query {
//!         #[url = "q"]
//!         pub text: String,
//!         #[url = "lang,omitempty"]
//!         pub languages: Vec<String>,
//!         #[url = "exact"]
//!         #[urlformat = "int"]
//!         pub exact: bool,
//!         #[url = "limit,omitempty"]
//!         pub limit: Option<u32>,
//!     }
//! }
//!
//! let query = Query {
//!     text: "tag codec".to_string(),
//!     languages: vec!["en".to_string(), "de".to_string()],
//!     exact: true,
//!     limit: None,
//! };
//!
//! let values = marshal(&query).unwrap();
//! assert_eq!(values.encode(), "exact=1&lang=en&lang=de&q=tag+codec");
//!
//! let mut back = Query::default();
//! unmarshal(&values, &mut back).unwrap();
//! assert_eq!(back, query);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use urlvalues::{unmarshal, UrlValues, Value, ValueMap};
//!
//! let values = UrlValues::parse("on=true&n=32&when=2021-02-18T09:56:00Z&name=bob");
//! let mut map = ValueMap::new();
//! unmarshal(&values, &mut map).unwrap();
//!
//! assert_eq!(map.get("on"), Some(&Value::Bool(true)));
//! assert_eq!(map.get("n"), Some(&Value::Float64(32.0)));
//! assert!(map.get("when").and_then(Value::as_time).is_some());
//! assert_eq!(map.get("name").and_then(Value::as_str), Some("bob"));
//! ```
//!
//! ## Logging
//!
//! The engines emit [`tracing`] events: `trace` for skipped fields and
//! `debug` when a field fails to convert. No subscriber is installed.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - declaring a record and round-tripping it
//! - **`dynamic_values.rs`** - decoding into untyped maps
//! - **`custom_hooks.rs`** - implementing the capability traits by hand
//!
//! Run any example with: `cargo run --example <name>`

pub mod coerce;
pub mod de;
pub mod duration;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod record;
pub mod ser;
pub mod tag;
pub mod value;

pub use de::UnmarshalValues;
pub use error::{Error, Result};
pub use map::{UrlValues, ValueMap};
pub use options::EncodeOptions;
pub use record::{Failure, FieldValue, Record};
pub use ser::MarshalValues;
pub use value::{Kind, Value};

/// Marshals a record, a map of dynamic values or a hook implementer into
/// [`UrlValues`].
///
/// # Examples
///
/// ```rust
/// use urlvalues::{marshal, Value, ValueMap};
///
/// let mut map = ValueMap::new();
/// map.insert("ids".to_string(), Value::Seq(vec![Value::from(1), Value::from(2)]));
///
/// let values = marshal(&map).unwrap();
/// assert_eq!(values.encode(), "ids=1&ids=2");
///
/// assert!(marshal(&Value::from(3)).is_err());
/// ```
///
/// # Errors
///
/// Returns an error for a nil or wrongly shaped argument, a malformed tag,
/// an unsupported format verb or a value that cannot be rendered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn marshal<T>(value: &T) -> Result<UrlValues>
where
    T: ?Sized + MarshalValues,
{
    value.marshal_values()
}

/// Unmarshals [`UrlValues`] into a record, a map or a hook implementer.
///
/// # Errors
///
/// Returns an error for a nil or wrongly shaped destination, a malformed
/// tag, unparseable text or a decoded value that does not fit its field.
/// Record destinations are unchanged when an error is returned.
pub fn unmarshal<T>(values: &UrlValues, dest: &mut T) -> Result<()>
where
    T: ?Sized + UnmarshalValues,
{
    dest.unmarshal_values(values)
}

/// Marshals to a query string with keys sorted.
///
/// # Examples
///
/// ```rust
/// use urlvalues::{to_string, url_record};
///
/// url_record! {
///     #[derive(Clone, Default)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///     }
/// }
///
/// assert_eq!(to_string(&Point { x: 1, y: -2 }).unwrap(), "x=1&y=-2");
/// ```
///
/// # Errors
///
/// Same as [`marshal`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + MarshalValues,
{
    to_string_with_options(value, &EncodeOptions::default())
}

/// Marshals to a query string with custom options.
///
/// # Errors
///
/// Same as [`marshal`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &EncodeOptions) -> Result<String>
where
    T: ?Sized + MarshalValues,
{
    Ok(value.marshal_values()?.encode_with(options))
}

/// Parses a query string and unmarshals it into a fresh `T`.
///
/// # Examples
///
/// ```rust
/// use urlvalues::{from_str, url_record};
///
/// url_record! {
///     #[derive(Clone, Debug, Default, PartialEq)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///     }
/// }
///
/// let point: Point = from_str("x=1&y=2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Same as [`unmarshal`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(input: &str) -> Result<T>
where
    T: UnmarshalValues + Default,
{
    let mut dest = T::default();
    unmarshal(&UrlValues::parse(input), &mut dest)?;
    Ok(dest)
}
