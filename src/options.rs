//! Configuration options for rendering URL values as a query string.
//!
//! The codec itself is configured per field through tags; these options only
//! affect [`UrlValues::encode_with`](crate::UrlValues::encode_with) and
//! [`to_string_with_options`](crate::to_string_with_options).
//!
//! ## Examples
//!
//! ```rust
//! use urlvalues::{EncodeOptions, UrlValues};
//!
//! let mut values = UrlValues::new();
//! values.append("b", "2");
//! values.append("a", "1");
//!
//! assert_eq!(values.encode(), "a=1&b=2");
//!
//! let options = EncodeOptions::new().with_sort_keys(false);
//! assert_eq!(values.encode_with(&options), "b=2&a=1");
//! ```

/// Options for form-urlencoded output.
///
/// # Examples
///
/// ```rust
/// use urlvalues::EncodeOptions;
///
/// let options = EncodeOptions::new();
/// assert!(options.sort_keys);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Emit keys in sorted order instead of insertion order. Values of one key
    /// always keep their own order.
    pub sort_keys: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { sort_keys: true }
    }
}

impl EncodeOptions {
    /// Creates default options (keys sorted).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }
}
