//! Wire-format types: verbs, the request builder, and response
//! serialisation (C6).

pub mod method;
pub mod request;
pub mod response;

pub use method::HttpMethod;
pub use request::{parse_request, Request, RequestBuilder};
pub use response::{MediaType, Response, StatusCode};
