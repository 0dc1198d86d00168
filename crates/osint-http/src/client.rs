use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;

use crate::error::ProbeHttpError;
use crate::ssrf::guard_url;

/// Canonical user-agent sent on every outbound request.
pub const DEFAULT_USER_AGENT: &str = "osint-scan/0.1 (+self-assessment; contact via host)";

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Ceiling applied to archive/large-body endpoints that opt into it.
pub const LARGE_BODY_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Connect-phase deadline, well under the request deadline.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Redirect hop limit.
pub const DEFAULT_REDIRECT_LIMIT: usize = 5;

/// Tuning knobs for [`PoliteClient`]. `Default` matches the policy's typical
/// values; probes that need the archive ceiling build a second client with
/// `request_timeout` overridden.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request deadline.
    pub request_timeout: Duration,
    /// Connect-phase deadline.
    pub connect_timeout: Duration,
    /// Redirect hop limit.
    pub redirect_limit: usize,
    /// Concurrent sub-request cap for this probe (typical: 5-10).
    pub concurrency_cap: usize,
    /// Minimum polite delay between sub-requests to the same host.
    pub min_polite_delay: Duration,
    /// Maximum polite delay between sub-requests to the same host.
    pub max_polite_delay: Duration,
    /// Bearer credential for code-hosting APIs, only sent when configured —
    /// never a compiled-in default.
    pub bearer_token: Option<String>,
    /// Lifts the SSRF guard's loopback/private-range block. Only ever `true`
    /// in test harnesses pointing this client at a local mock server.
    pub allow_private_hosts: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            concurrency_cap: 6,
            min_polite_delay: Duration::from_millis(300),
            max_polite_delay: Duration::from_millis(1500),
            bearer_token: None,
            allow_private_hosts: false,
        }
    }
}

/// A shared HTTP client wrapper enforcing the four pieces of policy every
/// probe gets for free: timeouts, a canonical user-agent, a bounded
/// concurrent-sub-request semaphore, and a polite delay between calls to the
/// same host. Retries are deliberately absent — failures are surfaced as
/// [`ProbeHttpError`] and it is the probe's decision whether to try again.
#[derive(Clone)]
pub struct PoliteClient {
    inner: reqwest::Client,
    semaphore: Arc<Semaphore>,
    min_polite_delay: Duration,
    max_polite_delay: Duration,
    last_request_at: Arc<Mutex<HashMap<String, Instant>>>,
    bearer_token: Option<String>,
    allow_private_hosts: bool,
}

impl PoliteClient {
    /// Build a client from the given configuration. Fails only if the
    /// underlying TLS/transport stack cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ProbeHttpError> {
        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.redirect_limit))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| ProbeHttpError::Network {
                host: "client-init".to_string(),
                source: e,
            })?;

        Ok(Self {
            inner,
            semaphore: Arc::new(Semaphore::new(config.concurrency_cap.max(1))),
            min_polite_delay: config.min_polite_delay,
            max_polite_delay: config.max_polite_delay,
            last_request_at: Arc::new(Mutex::new(HashMap::new())),
            bearer_token: config.bearer_token,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    /// Issue a GET request against `url`, applying SSRF validation, the
    /// concurrency cap, and the per-host polite delay first.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ProbeHttpError> {
        self.request(url, false).await
    }

    /// Like [`Self::get`] but attaches the configured bearer credential,
    /// for code-hosting API calls. No-op (unauthenticated) if none is
    /// configured.
    pub async fn get_authenticated(&self, url: &str) -> Result<reqwest::Response, ProbeHttpError> {
        self.request(url, true).await
    }

    async fn request(&self, url: &str, authenticated: bool) -> Result<reqwest::Response, ProbeHttpError> {
        let guarded = guard_url(url, self.allow_private_hosts).await?;
        let host = guarded.host_str().unwrap_or("unknown").to_string();

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProbeHttpError::BlockedByPolicy("client shutting down".to_string()))?;
        self.wait_politely(&host).await;

        let mut builder = self.inner.get(guarded);
        if authenticated {
            if let Some(token) = &self.bearer_token {
                builder = builder.bearer_auth(token);
            }
        }

        let response = builder.send().await.map_err(|source| {
            if source.is_timeout() {
                ProbeHttpError::Timeout(host.clone())
            } else {
                ProbeHttpError::Network { host: host.clone(), source }
            }
        })?;

        self.mark_requested(&host).await;
        classify_status(response, &host)
    }

    async fn wait_politely(&self, host: &str) {
        let delay = jittered_delay(self.min_polite_delay, self.max_polite_delay);
        let mut last_seen = self.last_request_at.lock().await;
        if let Some(last) = last_seen.get(host) {
            let elapsed = last.elapsed();
            if elapsed < delay {
                let remaining = delay - elapsed;
                drop(last_seen);
                tokio::time::sleep(remaining).await;
                last_seen = self.last_request_at.lock().await;
            }
        }
        last_seen.insert(host.to_string(), Instant::now());
    }

    async fn mark_requested(&self, host: &str) {
        self.last_request_at
            .lock()
            .await
            .insert(host.to_string(), Instant::now());
    }
}

/// Turn a response's status code into a typed outcome where the policy
/// already has an opinion (429/404/5xx); otherwise hand back the response
/// unchanged for the probe to parse.
fn classify_status(response: reqwest::Response, host: &str) -> Result<reqwest::Response, ProbeHttpError> {
    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => Err(ProbeHttpError::RateLimited(host.to_string())),
        StatusCode::NOT_FOUND => Err(ProbeHttpError::NotFound(host.to_string())),
        status if status.is_server_error() => Err(ProbeHttpError::ServerError {
            service: host.to_string(),
            status: status.as_u16(),
        }),
        _ => Ok(response),
    }
}

fn jittered_delay(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    // A cheap, dependency-free jitter: vary within [min, max] using the
    // low bits of the current instant rather than pulling in `rand` for a
    // single non-adversarial pacing decision.
    let span = (max - min).as_millis() as u64;
    let jitter = u64::try_from(std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).map(|d| d.subsec_nanos()).unwrap_or(0)).unwrap_or(0) % span.max(1);
    min + Duration::from_millis(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jittered_delay_stays_in_range() {
        let min = Duration::from_millis(300);
        let max = Duration::from_millis(1500);
        for _ in 0..20 {
            let d = jittered_delay(min, max);
            assert!(d >= min && d <= max);
        }
    }

    #[test]
    fn jittered_delay_handles_equal_bounds() {
        let d = jittered_delay(Duration::from_millis(500), Duration::from_millis(500));
        assert_eq!(d, Duration::from_millis(500));
    }
}
