//! Blocking HTTP client facade over a pooled connection manager.
//!
//! # Overview
//! `HttpFacade` wraps a pooled `ureq` agent and offers GET (optionally with
//! query parameters and headers), form-encoded POST, and JSON POST helpers
//! that return the response body as text. Two free helpers parse a URL's
//! query string and percent-decode text.
//!
//! # Design
//! - The facade is built explicitly from a `PoolConfig`; there is no global
//!   client. Clone it or share it behind a reference across threads.
//! - Each operation builds an `HttpRequest` (pure, inspectable) and executes
//!   it through a `Transport`. The response handle is dropped, releasing its
//!   connection, on every path.
//! - Status codes are never interpreted and failures are never retried.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pool;
pub mod query;
pub mod transport;

pub use client::HttpFacade;
pub use config::PoolConfig;
pub use error::{FacadeError, Result};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, Params};
pub use query::{decode_url, parse_query_string_to_map, try_decode_url};
pub use transport::{Transport, TransportResponse, UreqTransport};
