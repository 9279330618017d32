//! waypost: a small path-template HTTP/1.1 service framework.
//!
//! Registered resources are matched against incoming request paths by a
//! trie of literal and variable path segments ([`matcher`]), dispatched
//! by a runtime-tagged parameter signature ([`dispatch`], [`resource`]),
//! and served over a fixed pool of reactor threads ([`connection`],
//! [`server`]).

// Type aliases (must be declared before other modules that use it)
pub mod alias;
pub mod debug;

pub mod error;
pub mod path;
pub mod params;
pub mod resource;
pub mod matcher;
pub mod dispatch;
pub mod http;
pub mod connection;
pub mod server;


pub use alias::{PMutex, PRwLock, PRwLockReadGuard, PRwLockWriteGuard};
pub use error::{Result, WaypostError};
pub use http::method::HttpMethod;
pub use http::response::{MediaType, Response, StatusCode};
pub use matcher::{Match, ResourceMatcher};
pub use params::IntWidth;
pub use resource::{ParamKind, ParamValue, Resource, ResourceBuilder};
pub use server::Server;

/// Convenience re-exports for resource handler implementations.
pub mod prelude {
    pub use crate::error::{Result, WaypostError};
    pub use crate::http::method::HttpMethod;
    pub use crate::http::response::{MediaType, Response, StatusCode};
    pub use crate::params::{Entity, FormParams, Headers, IntWidth, PathInt, QueryParams};
    pub use crate::resource::{ParamKind, ParamValue, ResourceBuilder};
    pub use crate::server::Server;
}
