//! Rate limiting middleware
//!
//! Optional per-client-IP request quota. Requests over the quota get a 429
//! with the usual error body.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;
use crate::utils::errors::{CampusError, Result};

/// Keyed rate limiter shared by every request
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RateLimitMiddleware {
    /// Allow `per_minute` requests per client; `None` when the quota is zero
    pub fn per_minute(per_minute: u32) -> Option<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute)?);
        Some(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        })
    }

    /// Check and consume one request for `ip`
    pub fn check(&self, ip: IpAddr) -> Result<()> {
        self.limiter.check_key(&ip).map_err(|_| {
            warn!(ip = %ip, "Rate limit exceeded");
            CampusError::RateLimitExceeded
        })
    }
}

/// Rate limiting middleware, used with `axum::middleware::from_fn_with_state`
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitMiddleware>,
    request: Request,
    next: Next,
) -> Result<Response> {
    // without connection info every request shares one bucket
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    limiter.check(ip)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_zero_quota_disables_limiting() {
        assert!(RateLimitMiddleware::per_minute(0).is_none());
    }

    #[test]
    fn test_quota_is_per_ip() {
        let limiter = RateLimitMiddleware::per_minute(2).unwrap();
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(a).is_ok());
        assert!(limiter.check(a).is_ok());
        assert_matches!(limiter.check(a), Err(CampusError::RateLimitExceeded));
        assert!(limiter.check(b).is_ok());
    }
}
