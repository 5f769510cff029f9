//! Connectivity probe with a fixed backoff schedule.
//!
//! Used once, before a client for a non-production store is handed out, to
//! wait for a local store container to come up.

use crate::common::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpStream;
use url::Url;

/// Ordered wait durations; one connection attempt follows each wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    intervals: Vec<Duration>,
}

impl BackoffPolicy {
    pub fn new(intervals: Vec<Duration>) -> Self {
        Self { intervals }
    }

    pub fn from_millis(intervals: &[u64]) -> Self {
        Self::new(intervals.iter().copied().map(Duration::from_millis).collect())
    }

    pub fn intervals(&self) -> &[Duration] {
        &self.intervals
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Idle,
    Probing,
    Connected,
    Exhausted,
}

/// Result of a finished probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub connected: bool,
    pub attempts: usize,
}

impl ProbeOutcome {
    /// Attempts beyond the first.
    pub fn retries(&self) -> usize {
        self.attempts.saturating_sub(1)
    }
}

pub struct BackoffProbe {
    policy: BackoffPolicy,
    state: ProbeState,
}

impl BackoffProbe {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            state: ProbeState::Idle,
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// Run `attempt` once per interval, sleeping for the interval first,
    /// until it reports success or the schedule runs out.
    pub async fn perform<F, Fut>(&mut self, mut attempt: F) -> ProbeOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        self.state = ProbeState::Probing;
        let mut attempts = 0;

        for interval in self.policy.intervals.iter().copied() {
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
            attempts += 1;

            if attempt().await {
                self.state = ProbeState::Connected;
                tracing::debug!(attempts, "Probe connected");
                return ProbeOutcome {
                    connected: true,
                    attempts,
                };
            }

            tracing::warn!(attempt = attempts, waited = ?interval, "Probe attempt failed");
        }

        self.state = ProbeState::Exhausted;
        ProbeOutcome {
            connected: false,
            attempts,
        }
    }
}

/// Resolve the `host:port` a TCP probe should dial for an endpoint URL.
pub fn probe_address(endpoint: &str) -> Result<String> {
    let url = Url::parse(endpoint)?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidConfig(format!("endpoint has no host: {}", endpoint)))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| Error::InvalidConfig(format!("endpoint has no port: {}", endpoint)))?;
    Ok(format!("{}:{}", host, port))
}

/// Block until `endpoint` accepts TCP connections or `policy` is exhausted.
pub async fn await_endpoint(
    endpoint: &str,
    policy: &BackoffPolicy,
    connect_timeout: Duration,
) -> Result<ProbeOutcome> {
    let addr = probe_address(endpoint)?;
    tracing::info!("Waiting for store at {}", addr);

    let mut probe = BackoffProbe::new(policy.clone());
    let outcome = probe
        .perform(|| {
            let addr = addr.clone();
            async move {
                matches!(
                    tokio::time::timeout(connect_timeout, TcpStream::connect(addr.as_str())).await,
                    Ok(Ok(_))
                )
            }
        })
        .await;

    if !outcome.connected {
        return Err(Error::Connectivity {
            endpoint: endpoint.to_string(),
            attempts: outcome.attempts,
        });
    }

    tracing::info!("✓ Store reachable at {} after {} attempt(s)", addr, outcome.attempts);
    Ok(outcome)
}
