//! Response construction and wire serialisation.

/// Status codes this framework ever produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    Forbidden,
    NotFound,
    NotAllowed,
    InternalError,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::NotAllowed => 405,
            Self::InternalError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Created => "Created",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::NotAllowed => "Method Not Allowed",
            Self::InternalError => "Internal Server Error",
        }
    }
}

/// The media types this framework declares via `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    None,
    ApplicationJson,
    TextPlain,
    ApplicationOctetStream,
}

impl MediaType {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::ApplicationJson => Some("application/json"),
            Self::TextPlain => Some("text/plain"),
            Self::ApplicationOctetStream => Some("application/octet-stream"),
        }
    }
}

/// An immutable, fully-built response: status, media type, body bytes.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub media_type: MediaType,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, media_type: MediaType, body: impl Into<Vec<u8>>) -> Self {
        Self { status, media_type, body: body.into() }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status, MediaType::TextPlain, body.into().into_bytes())
    }

    pub fn json(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, MediaType::ApplicationJson, body)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound, MediaType::None, Vec::new())
    }

    pub fn not_allowed() -> Self {
        Self::new(StatusCode::NotAllowed, MediaType::None, Vec::new())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::text(StatusCode::InternalError, message.into())
    }

    /// Serialises this response to the fixed wire shape:
    /// `HTTP/1.1 <code> <reason>\r\nContent-Length: <N>\r\nConnection: close\r\n[Content-Type: <t>\r\n]\r\n<body>`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.body.len());
        out.extend_from_slice(
            format!("HTTP/1.1 {} {}\r\n", self.status.code(), self.status.reason()).as_bytes(),
        );
        out.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        out.extend_from_slice(b"Connection: close\r\n");
        if let Some(media) = self.media_type.as_str() {
            out.extend_from_slice(format!("Content-Type: {}\r\n", media).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialisation_shape() {
        let resp = Response::text(StatusCode::Ok, "Hello, World\n");
        let bytes = resp.to_bytes();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 13\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("Hello, World\n"));
        let header_end = text.find("\r\n\r\n").unwrap();
        assert_eq!(&text[header_end + 4..], "Hello, World\n");
    }

    #[test]
    fn no_content_type_header_when_media_type_none() {
        let resp = Response::not_found();
        let text = String::from_utf8(resp.to_bytes()).unwrap();
        assert!(!text.contains("Content-Type"));
    }
}
