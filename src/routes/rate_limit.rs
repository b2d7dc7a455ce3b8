use axum::http::Request;
use std::net::IpAddr;
use tower_governor::{GovernorError, key_extractor::KeyExtractor};

/// IP key extractor that works behind reverse proxies and in Docker.
/// Tries X-Forwarded-For, X-Real-IP, then the peer address; requests with
/// no identifiable IP share one localhost bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackIpKeyExtractor;

impl KeyExtractor for FallbackIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        // First IP in the X-Forwarded-For chain is the original client
        if let Some(xff) = req.headers().get("x-forwarded-for")
            && let Ok(xff_str) = xff.to_str()
            && let Some(first) = xff_str.split(',').next()
            && let Ok(ip) = first.trim().parse::<IpAddr>()
        {
            return Ok(ip);
        }

        if let Some(real_ip) = req.headers().get("x-real-ip")
            && let Ok(ip_str) = real_ip.to_str()
            && let Ok(ip) = ip_str.parse::<IpAddr>()
        {
            return Ok(ip);
        }

        if let Some(connect_info) = req
            .extensions()
            .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        {
            return Ok(connect_info.0.ip());
        }

        Ok(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))
    }
}
