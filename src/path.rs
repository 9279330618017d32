//! Path and query decomposition (C1).
//!
//! Splitting is deliberately dumb: no percent-decoding, no collapsing of
//! consecutive delimiters. Both path templates and request paths start
//! with `/`, so the leading empty segment produced by a naive split is
//! dropped identically on both sides.

/// Splits `s` on `/`, dropping a leading empty segment (from the mandatory
/// leading `/`) and a trailing empty segment (from an optional trailing
/// `/`). Interior empty segments, from consecutive slashes, are kept.
pub fn decompose_path(s: &str) -> Vec<&str> {
    let trimmed = s.strip_prefix('/').unwrap_or(s);
    if trimmed.is_empty() {
        return Vec::new();
    }
    let mut parts: Vec<&str> = trimmed.split('/').collect();
    if parts.last().map(|p| p.is_empty()).unwrap_or(false) {
        parts.pop();
    }
    parts
}

/// Splits a query string on `&` or `;` into `(key, value)` pairs. A pair
/// without `=` yields an empty value. No percent-decoding is performed.
pub fn decompose_query(s: &str) -> Vec<(&str, &str)> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(|c| c == '&' || c == ';')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        })
        .collect()
}

/// Splits a full URL (as seen on the request line) into `(path, query)`.
/// Absence of `?` yields an empty query string.
pub fn split_url(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn is_safe_char(c: char) -> bool {
        c.is_ascii_alphanumeric() && c != '&' && c != ';' && c != '='
    }

    quickcheck! {
        fn query_pairs_round_trip(keys: Vec<String>, values: Vec<String>) -> bool {
            let keys: Vec<String> = keys
                .into_iter()
                .map(|k| k.chars().filter(|c| is_safe_char(*c)).collect::<String>())
                .filter(|k| !k.is_empty())
                .collect();
            let values: Vec<String> = values
                .into_iter()
                .map(|v| v.chars().filter(|c| is_safe_char(*c)).collect::<String>())
                .collect();
            let n = keys.len().min(values.len());
            if n == 0 {
                return true;
            }
            let encoded = (0..n)
                .map(|i| format!("{}={}", keys[i], values[i]))
                .collect::<Vec<_>>()
                .join("&");

            let decoded = decompose_query(&encoded);
            decoded.len() == n
                && (0..n).all(|i| decoded[i] == (keys[i].as_str(), values[i].as_str()))
        }
    }

    #[test]
    fn drops_leading_and_trailing_slash() {
        assert_eq!(decompose_path("/a/b/"), vec!["a", "b"]);
        assert_eq!(decompose_path("/a/b"), vec!["a", "b"]);
        assert_eq!(decompose_path("/"), Vec::<&str>::new());
    }

    #[test]
    fn keeps_interior_empty_segments() {
        assert_eq!(decompose_path("//a"), vec!["", "a"]);
        assert_eq!(decompose_path("/a//b"), vec!["a", "", "b"]);
    }

    #[test]
    fn query_splits_on_amp_and_semicolon() {
        assert_eq!(
            decompose_query("a=1&b=2;c=3"),
            vec![("a", "1"), ("b", "2"), ("c", "3")]
        );
    }

    #[test]
    fn query_pair_without_equals_has_empty_value() {
        assert_eq!(decompose_query("flag"), vec![("flag", "")]);
    }

    #[test]
    fn query_empty_string_has_no_pairs() {
        assert_eq!(decompose_query(""), Vec::<(&str, &str)>::new());
    }

    #[test]
    fn url_splits_on_first_question_mark() {
        assert_eq!(split_url("/a/b?x=1"), ("/a/b", "x=1"));
        assert_eq!(split_url("/a/b"), ("/a/b", ""));
    }
}
