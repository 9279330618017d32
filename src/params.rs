//! Typed parameter model (C2): uniform wrappers over path captures, query
//! parameters, form parameters, headers, and the request entity.

use crate::error::{Result, WaypostError};

/// A path variable captured verbatim, with no further interpretation.
pub type PathString = String;

/// The bit-width (and signedness) an integer path variable is declared at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

/// A parsed integer path variable. The variant matches the declared
/// [`IntWidth`] of the parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathInt {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

/// Parses `segment` as a base-10 integer of the given width.
///
/// Fails with [`WaypostError::InvalidParameter`] if any non-digit trailing
/// byte remains or the value overflows `width` — `str::parse` already
/// rejects both cases since it requires the entire input to match.
pub fn parse_path_int(segment: &str, width: IntWidth) -> Result<PathInt> {
    fn fail(segment: &str, width: IntWidth) -> WaypostError {
        WaypostError::InvalidParameter(format!(
            "cannot parse {:?} as {:?}",
            segment, width
        ))
    }
    match width {
        IntWidth::I8 => segment.parse().map(PathInt::I8).map_err(|_| fail(segment, width)),
        IntWidth::I16 => segment.parse().map(PathInt::I16).map_err(|_| fail(segment, width)),
        IntWidth::I32 => segment.parse().map(PathInt::I32).map_err(|_| fail(segment, width)),
        IntWidth::I64 => segment.parse().map(PathInt::I64).map_err(|_| fail(segment, width)),
        IntWidth::U8 => segment.parse().map(PathInt::U8).map_err(|_| fail(segment, width)),
        IntWidth::U16 => segment.parse().map(PathInt::U16).map_err(|_| fail(segment, width)),
        IntWidth::U32 => segment.parse().map(PathInt::U32).map_err(|_| fail(segment, width)),
        IntWidth::U64 => segment.parse().map(PathInt::U64).map_err(|_| fail(segment, width)),
    }
}

/// A multi-valued name → values mapping, used for both query parameters
/// and form parameters. Duplicate keys are preserved in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiMap {
    pairs: Vec<(String, String)>,
}

impl MultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// All values recorded under `name`, in insertion order.
    pub fn get(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The first value recorded under `name`, if any.
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            pairs: pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }
}

pub type QueryParams = MultiMap;
pub type FormParams = MultiMap;

/// Decodes a POST body as `application/x-www-form-urlencoded`, using the
/// same `&`/`;`-separated `key=value` grammar as the query string.
pub fn decompose_form(body: &[u8]) -> FormParams {
    let text = String::from_utf8_lossy(body);
    FormParams::from_pairs(crate::path::decompose_query(&text))
}

/// Headers are a single-valued mapping; a later header with the same name
/// overwrites an earlier one, matching the request builder's finalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Opaque request/response body container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity(Vec<u8>);

impl Entity {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_parse_rejects_trailing_garbage() {
        assert!(parse_path_int("12a", IntWidth::I32).is_err());
    }

    #[test]
    fn int_parse_rejects_overflow() {
        assert!(parse_path_int("300", IntWidth::U8).is_err());
        assert!(parse_path_int("255", IntWidth::U8).is_ok());
    }

    #[test]
    fn int_parse_rejects_negative_for_unsigned() {
        assert!(parse_path_int("-1", IntWidth::U32).is_err());
        assert!(matches!(parse_path_int("-1", IntWidth::I32), Ok(PathInt::I32(-1))));
    }

    #[test]
    fn multi_map_preserves_duplicates_in_order() {
        let m = MultiMap::from_pairs(vec![("a", "1"), ("a", "2"), ("b", "3")]);
        assert_eq!(m.get("a"), vec!["1", "2"]);
        assert_eq!(m.get_first("a"), Some("1"));
        assert_eq!(m.get("missing"), Vec::<&str>::new());
    }

    #[test]
    fn headers_last_write_wins_case_insensitive() {
        let mut h = Headers::new();
        h.set("Content-Type", "text/plain");
        h.set("content-type", "application/json");
        assert_eq!(h.get("CONTENT-TYPE"), Some("application/json"));
    }
}
