//! Per-connection context (C7): owns the stream, accumulates bytes into
//! the request builder via [`crate::http::request::parse_request`],
//! routes and dispatches on message-complete, writes the response, and
//! is destroyed on write completion or any error — one request per
//! connection, no keep-alive.

use std::sync::Arc;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::alias::PRwLock;
use crate::debug_error;
use crate::dispatch::dispatch;
use crate::http::request::{parse_request, Request};
use crate::http::response::Response;
use crate::matcher::ResourceMatcher;

const READ_CHUNK: usize = 8192;

/// Drives one accepted connection to completion: read until a full
/// request is available (or the peer closes, or a protocol error
/// occurs), route and dispatch it, write the response, then drop the
/// stream. Runs entirely on the worker reactor the connection was handed
/// to; never blocks it.
pub async fn handle_connection(mut stream: TcpStream, matcher: Arc<PRwLock<ResourceMatcher>>) {
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => {
                // EOF before a full request arrived: the equivalent of
                // feeding the parser a zero-length final chunk. Nothing
                // to respond with; the context is simply dropped.
                return;
            }
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                match parse_request(&buf) {
                    Ok(Some((request, _consumed))) => {
                        let response = route_and_dispatch(&matcher, &request);
                        if let Err(err) = stream.write_all(&response.to_bytes()).await {
                            debug_error!("write failed: {}", err);
                        }
                        return;
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        debug_error!("request build error: {}", err);
                        let response = Response::internal_error(err.to_string());
                        let _ = stream.write_all(&response.to_bytes()).await;
                        return;
                    }
                }
            }
            Err(err) => {
                debug_error!("read error: {}", err);
                return;
            }
        }
    }
}

fn route_and_dispatch(matcher: &PRwLock<ResourceMatcher>, request: &Request) -> Response {
    let guard = matcher.read();
    match guard.matches(&request.path) {
        None => Response::not_found(),
        Some(found) => match found.resource.methods.binding(request.method) {
            None => Response::not_allowed(),
            Some(binding) => dispatch(binding, &found.captures, request),
        },
    }
}
