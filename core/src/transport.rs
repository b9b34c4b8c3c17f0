//! Transport seam between the facade and the network.
//!
//! # Design
//! `HttpFacade` builds `HttpRequest` values and hands them to a `Transport`.
//! The transport returns a response handle that owns the underlying
//! connection; dropping the handle releases the connection. The facade reads
//! the body and drops the handle inside one scope, so release happens on
//! success and on every error path.
//!
//! `UreqTransport` is the production implementation. Pool limits and
//! timeouts come from `PoolConfig` and are fixed when the agent is built.
//! A `ConnectionGate` bounds how many requests are open at once; the permit
//! travels inside `UreqResponse` and is returned when it drops.
//!
//! GET follows redirects. POST does not: it goes through a second agent
//! with redirects disabled, and a 3xx comes back to the caller as-is.

use std::sync::Arc;
use std::time::Duration;

use ureq::http::Response;
use ureq::{Agent, Body};

use crate::config::PoolConfig;
use crate::error::{FacadeError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::pool::{route_of, ConnectionGate, ConnectionPermit};

/// Executes plain-data requests.
pub trait Transport {
    type Response: TransportResponse;

    /// Send `request` and return once the response head has arrived.
    fn send(&self, request: &HttpRequest) -> Result<Self::Response>;
}

/// An open response. Dropping it releases the underlying connection.
pub trait TransportResponse {
    fn status(&self) -> u16;

    fn headers(&self) -> Vec<(String, String)>;

    /// Read the remaining body to the end as UTF-8 text.
    fn read_body(&mut self) -> Result<String>;
}

/// Blocking transport backed by a pooled `ureq::Agent`.
///
/// Cloning shares the same connection pool and connection limits.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    post_agent: Agent,
    gate: Arc<ConnectionGate>,
    acquire_timeout: Duration,
}

impl UreqTransport {
    pub fn new(config: &PoolConfig) -> Self {
        let agent = build_agent(config, GET_MAX_REDIRECTS);
        let post_agent = build_agent(config, 0);
        Self {
            agent,
            post_agent,
            gate: Arc::new(ConnectionGate::from_config(config)),
            acquire_timeout: config.acquire_timeout(),
        }
    }

    /// Connections currently open through this transport and its clones.
    pub fn in_use(&self) -> usize {
        self.gate.in_use()
    }
}

const GET_MAX_REDIRECTS: u32 = 10;

fn build_agent(config: &PoolConfig, max_redirects: u32) -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .max_redirects(max_redirects)
        .max_idle_connections(config.max_total_connections)
        .max_idle_connections_per_host(config.max_connections_per_route)
        .timeout_connect(Some(config.connect_timeout()))
        .timeout_recv_response(Some(config.read_timeout()))
        .timeout_recv_body(Some(config.read_timeout()))
        .user_agent(config.user_agent.as_str())
        .build()
        .new_agent()
}

impl Transport for UreqTransport {
    type Response = UreqResponse;

    fn send(&self, request: &HttpRequest) -> Result<UreqResponse> {
        let url = url::Url::parse(&request.url).map_err(|source| FacadeError::InvalidUrl {
            url: request.url.clone(),
            source,
        })?;
        let permit = self.gate.acquire(&route_of(&url), self.acquire_timeout)?;

        let response = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.post_agent.post(request.url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }?;
        Ok(UreqResponse {
            inner: response,
            _permit: permit,
        })
    }
}

/// Open `ureq` response. The connection returns to the pool once the body
/// has been read to the end, and is closed if the handle drops earlier.
/// The connection slot is released after the connection itself.
pub struct UreqResponse {
    inner: Response<Body>,
    _permit: ConnectionPermit,
}

impl TransportResponse for UreqResponse {
    fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.inner
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect()
    }

    fn read_body(&mut self) -> Result<String> {
        self.inner
            .body_mut()
            .read_to_string()
            .map_err(|e| FacadeError::Body(e.to_string()))
    }
}
