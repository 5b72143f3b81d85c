//! Rate limiting for the sign-in routes using governor and `tower_governor`.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor for the client IP.
///
/// With `trust_forwarded` set, `X-Forwarded-For` (first hop) wins over
/// `X-Real-IP`, then the socket address. Without it the headers are ignored,
/// since any client can send them.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    pub trust_forwarded: bool,
}

impl ClientIpKeyExtractor {
    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if let Some(ip) = self.trust_forwarded.then(|| Self::forwarded_ip(req)).flatten() {
            return Ok(ip);
        }

        req.extensions()
            .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
            .map(|info| info.0.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for sign-in endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5. Proxy
/// headers are only consulted when `trust_forwarded` is set.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
#[allow(clippy::expect_used)]
pub fn auth_rate_limiter(trust_forwarded: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor { trust_forwarded })
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::extract::ConnectInfo;
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const TRUSTED: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_forwarded: true,
    };
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_forwarded: false,
    };

    fn request(headers: &[(&str, &str)], peer: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/auth/signin/google");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut req = builder.body(()).unwrap_or_default();
        if let Some(addr) = peer.and_then(|p| p.parse::<SocketAddr>().ok()) {
            req.extensions_mut().insert(ConnectInfo(addr));
        }
        req
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let req = request(
            &[
                ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
                ("x-real-ip", "198.51.100.2"),
            ],
            Some("10.0.0.1:4000"),
        );
        let ip = TRUSTED.extract(&req).ok();
        assert_eq!(ip, "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = request(&[("x-real-ip", "198.51.100.2")], None);
        let ip = TRUSTED.extract(&req).ok();
        assert_eq!(ip, "198.51.100.2".parse().ok());
    }

    #[test]
    fn test_trusted_without_headers_uses_socket() {
        let req = request(&[], Some("192.0.2.9:5000"));
        assert_eq!(TRUSTED.extract(&req).ok(), "192.0.2.9".parse().ok());
    }

    #[test]
    fn test_direct_ignores_spoofed_headers() {
        let req = request(
            &[
                ("x-forwarded-for", "203.0.113.7"),
                ("x-real-ip", "198.51.100.2"),
            ],
            Some("192.0.2.9:5000"),
        );
        assert_eq!(DIRECT.extract(&req).ok(), "192.0.2.9".parse().ok());
    }

    #[test]
    fn test_no_source_is_error() {
        assert!(TRUSTED.extract(&request(&[], None)).is_err());
        assert!(
            DIRECT
                .extract(&request(&[("x-forwarded-for", "203.0.113.7")], None))
                .is_err()
        );
    }
}
