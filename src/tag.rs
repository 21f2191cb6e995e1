//! Field tag grammar.
//!
//! A field tag is a comma separated declaration attached to a record field:
//!
//! ```text
//! <name>[,omitempty][,join='<delimiter>']
//! -
//! ```
//!
//! Part 0 is always the external name (empty means "use the field name").
//! `omitempty` and `join='...'` may appear in any order after it. Because the
//! join delimiter may itself contain commas, a `join='` part is rejoined with
//! the following parts up to the one that closes the quote.
//!
//! ```rust
//! use urlvalues::tag::parse_tag;
//!
//! let tag = parse_tag("ids,omitempty,join='a,b'").unwrap().unwrap();
//! assert_eq!(tag.name, "ids");
//! assert!(tag.omit_empty);
//! assert_eq!(tag.join.as_deref(), Some("a,b"));
//!
//! // "-" excludes the field entirely
//! assert!(parse_tag("-").unwrap().is_none());
//! ```

use crate::{Error, Result};

const SKIP: &str = "-";
const JOIN_OPEN: &str = "join='";
const JOIN_CLOSE: char = '\'';
const OMIT_EMPTY: &str = "omitempty";

/// Parsed per-field metadata.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Tag {
    /// External key; empty means the caller should use the field's own name.
    pub name: String,
    pub omit_empty: bool,
    /// Separator used to collapse a sequence field into a single value.
    pub join: Option<String>,
}

/// Parses a field tag.
///
/// Returns `Ok(None)` for the skip marker `-`: the field must be left out of
/// both marshaling and unmarshaling.
///
/// # Errors
///
/// Returns [`Error::UnterminatedJoin`] when a `join='` part is never closed.
pub fn parse_tag(declaration: &str) -> Result<Option<Tag>> {
    if declaration == SKIP {
        return Ok(None);
    }

    let parts: Vec<&str> = declaration.split(',').collect();
    let mut tag = Tag {
        name: parts[0].to_string(),
        ..Tag::default()
    };

    let span = join_span(&parts, declaration)?;
    if let Some((start, end)) = span {
        let mut joined = parts[start..=end].join(",");
        joined = joined.trim_start()[JOIN_OPEN.len()..].to_string();
        joined.pop();
        tag.join = Some(joined);
    }

    tag.omit_empty = parts.iter().enumerate().skip(1).any(|(i, part)| {
        let outside = span.map_or(true, |(start, end)| i < start || i > end);
        outside && part.trim().eq_ignore_ascii_case(OMIT_EMPTY)
    });

    Ok(Some(tag))
}

/// Locates the inclusive range of parts holding `join='...'`.
///
/// Only the first opener counts; when it is the name itself there is no join.
fn join_span(parts: &[&str], declaration: &str) -> Result<Option<(usize, usize)>> {
    let start = match parts.iter().position(|part| starts_with_join(part)) {
        Some(0) | None => return Ok(None),
        Some(start) => start,
    };

    let opener = parts[start].trim_start();
    if opener.len() > JOIN_OPEN.len() && opener.ends_with(JOIN_CLOSE) {
        return Ok(Some((start, start)));
    }

    parts[start + 1..]
        .iter()
        .position(|part| part.ends_with(JOIN_CLOSE))
        .map(|offset| Some((start, start + 1 + offset)))
        .ok_or_else(|| Error::unterminated_join(declaration))
}

fn starts_with_join(part: &str) -> bool {
    part.trim_start()
        .get(..JOIN_OPEN.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(JOIN_OPEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(declaration: &str) -> Tag {
        parse_tag(declaration).unwrap().unwrap()
    }

    #[test]
    fn test_skip_marker() {
        assert_eq!(parse_tag("-").unwrap(), None);
        // only an exact match skips
        assert_eq!(parsed("-,omitempty").name, "-");
    }

    #[test]
    fn test_name_only() {
        let tag = parsed("q");
        assert_eq!(tag.name, "q");
        assert!(!tag.omit_empty);
        assert_eq!(tag.join, None);
    }

    #[test]
    fn test_empty_name_is_kept() {
        let tag = parsed(",omitempty");
        assert_eq!(tag.name, "");
        assert!(tag.omit_empty);
    }

    #[test]
    fn test_join_within_one_part() {
        assert_eq!(parsed("jnc,join='X'").join.as_deref(), Some("X"));
    }

    #[test]
    fn test_join_spanning_two_parts() {
        assert_eq!(parsed("j,join=', '").join.as_deref(), Some(", "));
        assert_eq!(parsed("j,join=','").join.as_deref(), Some(","));
    }

    #[test]
    fn test_join_spanning_many_parts() {
        assert_eq!(parsed("jmc,join='a,b,c'").join.as_deref(), Some("a,b,c"));
    }

    #[test]
    fn test_empty_join() {
        assert_eq!(parsed("jes,join=''").join.as_deref(), Some(""));
    }

    #[test]
    fn test_join_before_omitempty() {
        let tag = parsed("j,join='|',omitempty");
        assert_eq!(tag.join.as_deref(), Some("|"));
        assert!(tag.omit_empty);
    }

    #[test]
    fn test_omitempty_inside_join_is_not_a_flag() {
        let tag = parsed("j,join='x,omitempty,y'");
        assert_eq!(tag.join.as_deref(), Some("x,omitempty,y"));
        assert!(!tag.omit_empty);
    }

    #[test]
    fn test_omitempty_outside_join_still_counts() {
        let tag = parsed("j,join='x,omitempty,y',omitempty");
        assert!(tag.omit_empty);
    }

    #[test]
    fn test_unterminated_join() {
        let err = parse_tag("j,join='abc").unwrap_err();
        assert!(matches!(err, Error::UnterminatedJoin { .. }));

        let err = parse_tag("j,join=',abc").unwrap_err();
        assert!(matches!(err, Error::UnterminatedJoin { .. }));
    }

    #[test]
    fn test_join_in_name_position_is_a_name() {
        let tag = parsed("join='x'");
        assert_eq!(tag.name, "join='x'");
        assert_eq!(tag.join, None);
    }

    #[test]
    fn test_only_the_first_opener_counts() {
        let tag = parsed("join='a',join='b'");
        assert_eq!(tag.name, "join='a'");
        assert_eq!(tag.join, None);

        let tag = parsed("x,join='a',join='b'");
        assert_eq!(tag.join.as_deref(), Some("a"));
    }

    #[test]
    fn test_multibyte_parts() {
        let tag = parsed("x,jo€€,join='€'");
        assert_eq!(tag.join.as_deref(), Some("€"));
    }
}
