use thiserror::Error;

/// Typed disposition of an outbound request, per the client's contract:
/// transient failures are never retried inside the client, they're handed
/// back to the probe as one of these so the probe can decide.
#[derive(Debug, Error)]
pub enum ProbeHttpError {
    /// The target URL failed SSRF validation before any request was sent.
    #[error("blocked by SSRF policy: {0}")]
    BlockedByPolicy(String),
    /// The request exceeded its per-request deadline.
    #[error("request to {0} timed out")]
    Timeout(String),
    /// Socket, DNS, TLS, or connection-reset failure.
    #[error("network error contacting {host}: {source}")]
    Network {
        /// Host that was being contacted.
        host: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The remote service answered 429.
    #[error("rate limited by {0}")]
    RateLimited(String),
    /// The remote service answered 404.
    #[error("not found at {0}")]
    NotFound(String),
    /// The remote service answered with a 5xx status.
    #[error("{service} returned server error {status}")]
    ServerError {
        /// Host that returned the error.
        service: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body could not be parsed as expected.
    #[error("malformed response from {service}: {detail}")]
    Malformed {
        /// Host that produced the response.
        service: String,
        /// Parse failure detail.
        detail: String,
    },
}

impl ProbeHttpError {
    /// True for error kinds a probe should treat as "no signal" rather than
    /// something worth narrating loudly — 404s in particular are often an
    /// expected negative result.
    #[must_use]
    pub fn is_negative_result(&self) -> bool {
        matches!(self, ProbeHttpError::NotFound(_))
    }
}
