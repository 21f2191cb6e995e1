/// Declares a record struct and implements [`Record`](crate::record::Record),
/// [`MarshalValues`](crate::MarshalValues) and
/// [`UnmarshalValues`](crate::UnmarshalValues) for it.
///
/// Each field may carry, in this order, doc comments, a `#[url = "..."]` tag
/// and a `#[urlformat = "..."]` verb. Only fields with a visibility modifier
/// take part in the codec. The struct must implement `Clone`.
///
/// ```rust
/// use urlvalues::{marshal, url_record};
///
/// url_record! {
///     #[derive(Clone, Debug, Default)]
///     pub struct Flags {
///         /// Sent as `1` or `0`.
///         #[url = "debug"]
///         #[urlformat = "int"]
///         pub debug: bool,
///         #[url = "-"]
///         pub ignored: String,
///         secret: String,
///     }
/// }
///
/// let flags = Flags { debug: true, ..Default::default() };
/// assert_eq!(marshal(&flags).unwrap().encode(), "debug=1");
/// ```
#[macro_export]
macro_rules! url_record {
    (@opt) => {
        ::core::option::Option::None
    };

    (@opt $value:literal) => {
        ::core::option::Option::Some($value)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[url = $tag:literal])?
                $(#[urlformat = $verb:literal])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::record::Record for $name {
            fn fields() -> ::std::vec::Vec<$crate::record::FieldDecl> {
                ::std::vec![
                    $(
                        $crate::record::FieldDecl {
                            name: ::core::stringify!($field),
                            tag: $crate::url_record!(@opt $($tag)?),
                            format: $crate::url_record!(@opt $($verb)?),
                            exported: !::core::stringify!($field_vis).is_empty(),
                            kind: <$ty as $crate::record::FieldValue>::kind(),
                        },
                    )*
                ]
            }

            fn values(&self) -> ::std::vec::Vec<$crate::Value> {
                ::std::vec![
                    $(<$ty as $crate::record::FieldValue>::to_value(&self.$field),)*
                ]
            }

            fn assign(&mut self, name: &str, value: $crate::Value) -> $crate::Result<()> {
                $(
                    if name == ::core::stringify!($field) {
                        self.$field = <$ty as $crate::record::FieldValue>::from_value(value)?;
                        return ::core::result::Result::Ok(());
                    }
                )*
                let _ = value;
                ::core::result::Result::Err($crate::Error::unknown_field(name))
            }
        }

        impl $crate::MarshalValues for $name {
            fn marshal_values(&self) -> $crate::Result<$crate::UrlValues> {
                $crate::ser::marshal_record(self)
            }
        }

        impl $crate::UnmarshalValues for $name {
            fn unmarshal_values(&mut self, values: &$crate::UrlValues) -> $crate::Result<()> {
                $crate::de::unmarshal_record(values, self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::record::{FieldDecl, Record};
    use crate::{Error, Kind, Value};

    url_record! {
        #[derive(Clone, Debug, Default, PartialEq)]
        struct Sample {
            /// Documented.
            #[url = "n,omitempty"]
            #[urlformat = "int"]
            pub number: u16,
            pub(crate) list: Vec<String>,
            hidden: bool,
        }
    }

    #[test]
    fn test_field_table() {
        let fields = Sample::fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(
            fields[0],
            FieldDecl {
                name: "number",
                tag: Some("n,omitempty"),
                format: Some("int"),
                exported: true,
                kind: Kind::Uint(16),
            }
        );
        assert!(fields[1].exported);
        assert_eq!(fields[1].tag, None);
        assert!(!fields[2].exported);
    }

    #[test]
    fn test_values_follow_declaration_order() {
        let sample = Sample {
            number: 7,
            list: vec!["a".to_string()],
            hidden: true,
        };
        assert_eq!(
            sample.values(),
            vec![
                Value::Uint(7),
                Value::Seq(vec![Value::from("a")]),
                Value::Bool(true),
            ]
        );
    }

    #[test]
    fn test_assign() {
        let mut sample = Sample::default();
        sample.assign("number", Value::Uint(9)).unwrap();
        assert_eq!(sample.number, 9);

        assert_eq!(
            sample.assign("number", Value::from("9")),
            Err(Error::not_assignable("String", "u16"))
        );
        assert_eq!(
            sample.assign("missing", Value::Null),
            Err(Error::unknown_field("missing"))
        );
    }
}
