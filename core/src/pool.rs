//! Limits on connections held open at the same time.
//!
//! # Design
//! `ureq` only caps idle pooled connections, so the in-flight limits are
//! enforced here. A caller takes a `ConnectionPermit` for the request's route
//! before sending and holds it until the response handle drops. When either
//! the total or the per-route count is at its limit, the caller blocks until a
//! permit is returned or the acquisition timeout elapses.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::PoolConfig;
use crate::error::{FacadeError, Result};

#[derive(Debug, Default)]
struct Counts {
    total: usize,
    per_route: HashMap<String, usize>,
}

/// Shared counter of open connections, keyed by route.
#[derive(Debug)]
pub struct ConnectionGate {
    max_total: usize,
    max_per_route: usize,
    counts: Mutex<Counts>,
    released: Condvar,
}

impl ConnectionGate {
    pub fn new(max_total: usize, max_per_route: usize) -> Self {
        Self {
            max_total,
            max_per_route,
            counts: Mutex::new(Counts::default()),
            released: Condvar::new(),
        }
    }

    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.max_total_connections, config.max_connections_per_route)
    }

    /// Wait up to `timeout` for a free slot on `route`.
    pub fn acquire(self: &Arc<Self>, route: &str, timeout: Duration) -> Result<ConnectionPermit> {
        let deadline = Instant::now() + timeout;
        let mut counts = self.lock();
        loop {
            let on_route = counts.per_route.get(route).copied().unwrap_or(0);
            if counts.total < self.max_total && on_route < self.max_per_route {
                counts.total += 1;
                *counts.per_route.entry(route.to_string()).or_insert(0) += 1;
                return Ok(ConnectionPermit {
                    gate: Arc::clone(self),
                    route: route.to_string(),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(route, total = counts.total, on_route, "connection wait timed out");
                return Err(FacadeError::PoolTimeout {
                    route: route.to_string(),
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            counts = self
                .released
                .wait_timeout(counts, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
    }

    /// Connections currently held, across all routes.
    pub fn in_use(&self) -> usize {
        self.lock().total
    }

    fn release(&self, route: &str) {
        let mut counts = self.lock();
        counts.total = counts.total.saturating_sub(1);
        if let Some(n) = counts.per_route.get_mut(route) {
            *n -= 1;
            if *n == 0 {
                counts.per_route.remove(route);
            }
        }
        drop(counts);
        self.released.notify_all();
    }

    // Counts stay consistent under a poisoned lock: every update is a single
    // increment or decrement.
    fn lock(&self) -> MutexGuard<'_, Counts> {
        self.counts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One open connection's slot. Returned to the gate on drop.
#[derive(Debug)]
pub struct ConnectionPermit {
    gate: Arc<ConnectionGate>,
    route: String,
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        self.gate.release(&self.route);
    }
}

/// Route key for a URL: scheme, host, and effective port.
pub fn route_of(url: &url::Url) -> String {
    format!(
        "{}://{}:{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.port_or_known_default().unwrap_or(0)
    )
}
