//! URL validation against server-side request forgery before a probe visits
//! an address it didn't choose itself (data-broker catalogue templates,
//! web-archive lookups, anything built from the seed email or an extracted
//! URL).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};

use reqwest::Url;

use crate::error::ProbeHttpError;

/// Only `80`/`443` are reachable unless explicitly widened.
const ALLOWED_PORTS: [u16; 2] = [80, 443];

/// Reject a URL that resolves to a private, loopback, link-local, or cloud
/// metadata address, or that uses a non-standard scheme/port. Performs DNS
/// resolution on a blocking thread since the standard library only exposes
/// a synchronous resolver.
///
/// `allow_private_hosts` lifts the loopback/private-range block for a single
/// call; it exists for test harnesses pointing a [`crate::PoliteClient`] at
/// a local mock server and defaults to `false` everywhere in production
/// code.
pub async fn guard_url(url: &str, allow_private_hosts: bool) -> Result<Url, ProbeHttpError> {
    let parsed = Url::parse(url)
        .map_err(|e| ProbeHttpError::BlockedByPolicy(format!("invalid URL '{url}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ProbeHttpError::BlockedByPolicy(format!(
                "scheme '{scheme}' not allowed"
            )))
        }
    }

    let port = parsed.port_or_known_default().unwrap_or(80);
    if !ALLOWED_PORTS.contains(&port) {
        return Err(ProbeHttpError::BlockedByPolicy(format!(
            "port {port} not allowed"
        )));
    }

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ProbeHttpError::BlockedByPolicy("URL has no host".to_string()))?
        .to_string();

    let lookup_target = format!("{host}:{port}");
    let resolved = tokio::task::spawn_blocking(move || lookup_target.to_socket_addrs())
        .await
        .map_err(|e| ProbeHttpError::BlockedByPolicy(format!("resolver task failed: {e}")))?
        .map_err(|e| ProbeHttpError::BlockedByPolicy(format!("failed to resolve '{host}': {e}")))?;

    if !allow_private_hosts {
        for addr in resolved {
            if is_blocked_ip(&addr.ip()) {
                return Err(ProbeHttpError::BlockedByPolicy(format!(
                    "{} resolves to a blocked address ({})",
                    parsed.host_str().unwrap_or_default(),
                    addr.ip()
                )));
            }
        }
    }

    Ok(parsed)
}

fn is_blocked_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_multicast()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || is_shared_address_space(v4)
                || is_cloud_metadata(v4)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_multicast()
                || is_unique_local(v6)
                || v6.to_ipv4_mapped()
                    .is_some_and(|mapped| is_blocked_ip(&IpAddr::V4(mapped)))
        }
    }
}

/// RFC 6598 shared address space (100.64.0.0/10), used by some carrier-grade
/// NATs and occasionally misconfigured as reachable.
fn is_shared_address_space(ip: &Ipv4Addr) -> bool {
    let o = ip.octets();
    o[0] == 100 && (o[1] & 0xC0) == 64
}

/// AWS/GCP/Azure instance-metadata endpoint.
fn is_cloud_metadata(ip: &Ipv4Addr) -> bool {
    ip.octets() == [169, 254, 169, 254]
}

/// Unique local (fc00::/7).
fn is_unique_local(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_loopback_and_private() {
        assert!(is_blocked_ip(&IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))));
        assert!(is_blocked_ip(&IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
        assert!(is_blocked_ip(&IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))));
    }

    #[test]
    fn blocks_cloud_metadata() {
        assert!(is_blocked_ip(&IpAddr::V4(Ipv4Addr::new(169, 254, 169, 254))));
        assert!(!is_blocked_ip(&IpAddr::V4(Ipv4Addr::new(169, 254, 1, 1))));
    }

    #[test]
    fn allows_public_ip() {
        assert!(!is_blocked_ip(&IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))));
    }

    #[tokio::test]
    async fn rejects_non_http_scheme() {
        let result = guard_url("ftp://example.com/file", false).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn blocks_loopback_by_default() {
        let result = guard_url("http://127.0.0.1/", false).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn allow_private_hosts_lifts_the_loopback_block() {
        let result = guard_url("http://127.0.0.1/", true).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn rejects_non_standard_port() {
        let result = guard_url("https://example.com:8080/", false).await;
        assert!(result.is_err());
    }
}
