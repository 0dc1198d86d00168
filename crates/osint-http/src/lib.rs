//! Shared HTTP client policy (C4): timeouts, a canonical user-agent, SSRF
//! guarding, and per-probe bounded concurrency with a polite inter-request
//! delay. Every probe crate builds its requests through a [`PoliteClient`]
//! rather than constructing its own `reqwest::Client`.

mod client;
mod error;
mod ssrf;

pub use client::{
    ClientConfig, PoliteClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REDIRECT_LIMIT,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, LARGE_BODY_REQUEST_TIMEOUT,
};
pub use error::ProbeHttpError;
pub use ssrf::guard_url;
