use thiserror::Error;

/// Infrastructure failures that prevent further scan progress, reserved for
/// cases where the `error` event fires instead of `complete` or `timeout`.
/// Probe failures never surface here; they're absorbed at the probe
/// boundary.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The event sink the host supplied could not accept further events
    /// (e.g. the channel closed).
    #[error("event channel closed: {0}")]
    EventChannelClosed(String),
    /// The HTTP client stack could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientInit(#[from] osint_http::ProbeHttpError),
}
