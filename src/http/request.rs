//! Streaming request assembly (C6).
//!
//! [`RequestBuilder`] reproduces the callback-driven state machine the
//! environment's push parser is assumed to drive: `on_url`,
//! `on_header_field`, `on_header_value`, `on_body`. [`parse_request`] is
//! the glue that drives those callbacks from `httparse`, which parses a
//! whole buffer at a time rather than pushing fragments — each call feeds
//! it the single URL fragment and the single (name, value) fragment pair
//! per header that `httparse` already extracted.

use crate::error::{Result, WaypostError};
use crate::http::method::HttpMethod;
use crate::params::{decompose_form, Entity, FormParams, Headers, QueryParams};
use crate::path::{decompose_query, split_url};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    Init,
    Field,
    Value,
}

/// Accumulates URL, header, and body fragments into an immutable [`Request`].
pub struct RequestBuilder {
    url: String,
    body: Vec<u8>,
    header_name: String,
    header_value: String,
    state: HeaderState,
    headers: Headers,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            url: String::new(),
            body: Vec::new(),
            header_name: String::new(),
            header_value: String::new(),
            state: HeaderState::Init,
            headers: Headers::new(),
        }
    }

    pub fn on_url(&mut self, frag: &str) {
        self.url.push_str(frag);
    }

    pub fn on_header_field(&mut self, frag: &str) {
        match self.state {
            HeaderState::Init => {
                self.header_name.push_str(frag);
            }
            HeaderState::Value => {
                self.headers.set(
                    std::mem::take(&mut self.header_name),
                    std::mem::take(&mut self.header_value),
                );
                self.header_name.push_str(frag);
            }
            HeaderState::Field => {
                self.header_name.push_str(frag);
            }
        }
        self.state = HeaderState::Field;
    }

    /// Returns `Err` (parser abort) if called in `Init` state, mirroring
    /// the source's `return 1` before any header field has been seen.
    pub fn on_header_value(&mut self, frag: &str) -> Result<()> {
        match self.state {
            HeaderState::Init => {
                return Err(WaypostError::UrlParseError(
                    "header value before header field".to_string(),
                ));
            }
            HeaderState::Field | HeaderState::Value => {
                self.header_value.push_str(frag);
            }
        }
        self.state = HeaderState::Value;
        Ok(())
    }

    pub fn on_body(&mut self, frag: &[u8]) {
        self.body.extend_from_slice(frag);
    }

    /// Finalises the accumulated fragments into a [`Request`], given the
    /// verb observed on the request line.
    pub fn finish(mut self, method: HttpMethod) -> Result<Request> {
        if self.state == HeaderState::Value && !self.header_name.is_empty() {
            self.headers.set(
                std::mem::take(&mut self.header_name),
                std::mem::take(&mut self.header_value),
            );
        }

        let (path, query_string) = split_url(&self.url);
        let path = path.to_string();
        let query = QueryParams::from_pairs(decompose_query(query_string));

        let form = if method == HttpMethod::Post {
            decompose_form(&self.body)
        } else {
            FormParams::new()
        };

        Ok(Request {
            path,
            method,
            headers: self.headers,
            query,
            form,
            entity: Entity::new(self.body),
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable, fully-built HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    pub path: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub query: QueryParams,
    pub form: FormParams,
    pub entity: Entity,
}

/// Attempts to parse one request out of `buf`.
///
/// Returns `Ok(None)` if `buf` does not yet contain a complete request
/// (more bytes needed from the stream). Returns `Ok(Some((request, n)))`
/// on success, where `n` is the number of bytes of `buf` consumed.
pub fn parse_request(buf: &[u8]) -> Result<Option<(Request, usize)>> {
    let mut header_storage = [httparse::EMPTY_HEADER; 64];
    let mut parsed = httparse::Request::new(&mut header_storage);

    let header_len = match parsed
        .parse(buf)
        .map_err(|e| WaypostError::UrlParseError(e.to_string()))?
    {
        httparse::Status::Complete(n) => n,
        httparse::Status::Partial => return Ok(None),
    };

    let method_str = parsed
        .method
        .ok_or_else(|| WaypostError::MethodUnknown("missing request method".to_string()))?;
    let method: HttpMethod = method_str.parse()?;

    let path = parsed
        .path
        .ok_or_else(|| WaypostError::UrlParseError("missing request path".to_string()))?;

    let mut builder = RequestBuilder::new();
    builder.on_url(path);

    let mut content_length: usize = 0;
    for header in parsed.headers.iter() {
        let name = header.name;
        let value = std::str::from_utf8(header.value)
            .map_err(|e| WaypostError::UrlParseError(e.to_string()))?;
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        builder.on_header_field(name);
        builder.on_header_value(value)?;
    }

    let body_end = header_len + content_length;
    if buf.len() < body_end {
        return Ok(None);
    }
    builder.on_body(&buf[header_len..body_end]);

    let request = builder.finish(method)?;
    Ok(Some((request, body_end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_state_machine_commits_on_field_after_value() {
        let mut b = RequestBuilder::new();
        b.on_url("/a/b?x=1");
        b.on_header_field("Host");
        b.on_header_value("example.com").unwrap();
        b.on_header_field("X-Test");
        b.on_header_value("abc").unwrap();
        let req = b.finish(HttpMethod::Get).unwrap();
        assert_eq!(req.path, "/a/b");
        assert_eq!(req.headers.get("Host"), Some("example.com"));
        assert_eq!(req.headers.get("X-Test"), Some("abc"));
        assert_eq!(req.query.get("x"), vec!["1"]);
    }

    #[test]
    fn header_value_before_field_is_rejected() {
        let mut b = RequestBuilder::new();
        assert!(b.on_header_value("oops").is_err());
    }

    #[test]
    fn post_body_decoded_as_form_params() {
        let mut b = RequestBuilder::new();
        b.on_url("/submit");
        b.on_body(b"name=alice&tag=x&tag=y");
        let req = b.finish(HttpMethod::Post).unwrap();
        assert_eq!(req.form.get("name"), vec!["alice"]);
        assert_eq!(req.form.get("tag"), vec!["x", "y"]);
    }

    #[test]
    fn get_body_is_not_decoded_as_form() {
        let mut b = RequestBuilder::new();
        b.on_url("/x");
        b.on_body(b"not=form=data");
        let req = b.finish(HttpMethod::Get).unwrap();
        assert!(req.form.get("not").is_empty());
        assert_eq!(req.entity.as_string(), "not=form=data");
    }

    #[test]
    fn parse_request_returns_none_until_body_complete() {
        let partial = b"PUT /a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel";
        assert!(parse_request(partial).unwrap().is_none());

        let full = b"PUT /a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let (req, consumed) = parse_request(full).unwrap().unwrap();
        assert_eq!(consumed, full.len());
        assert_eq!(req.path, "/a");
        assert_eq!(req.entity.as_string(), "hello");
    }

    #[test]
    fn parse_request_partial_header_block() {
        let partial = b"GET /a HTTP/1.1\r\nHost: e";
        assert!(parse_request(partial).unwrap().is_none());
    }
}

