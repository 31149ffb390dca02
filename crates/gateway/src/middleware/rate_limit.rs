//! Student login throttling
//!
//! Only failed attempts are charged, against a bucket per client address and
//! classroom username. A client that runs out of failures is locked out of
//! that classroom for one refill period, correct login ID or not, so a whole
//! class signing in from one shared network is never throttled.

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use circle_common::{
    config::RateLimitConfig,
    errors::{AppError, Result},
    metrics::record_student_login,
};
use dashmap::DashMap;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

/// Address of the connecting client, loopback when the server was not started
/// with connect info (router tests)
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub IpAddr);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Infallible> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        Ok(Self(ip))
    }
}

/// Failure bucket and lockout table per (username, client) pair
pub struct LoginRateLimiter {
    enabled: bool,
    per_minute: u32,
    lockout: Duration,
    failures: DefaultKeyedRateLimiter<String>,
    lockouts: DashMap<String, Instant>,
}

impl LoginRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute = NonZeroU32::new(config.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self {
            enabled: config.enabled,
            per_minute: per_minute.get(),
            lockout: Duration::from_secs(60) / per_minute.get(),
            failures: RateLimiter::keyed(quota),
            lockouts: DashMap::new(),
        }
    }

    fn key(username: &str, client: IpAddr) -> String {
        format!("{}|{}", username.to_lowercase(), client)
    }

    /// Reject the attempt up front while this client is locked out of `username`
    pub fn check(&self, username: &str, client: IpAddr) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let key = Self::key(username, client);
        let until = self.lockouts.get(&key).map(|entry| *entry.value());
        match until {
            Some(until) if until > Instant::now() => Err(self.rejected(username, client)),
            Some(_) => {
                self.lockouts.remove(&key);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Charge one failed attempt; the failure that empties the bucket starts a lockout
    pub fn record_failure(&self, username: &str, client: IpAddr) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let key = Self::key(username, client);
        if self.failures.check_key(&key).is_ok() {
            return Ok(());
        }

        self.lockouts.insert(key, Instant::now() + self.lockout);
        Err(self.rejected(username, client))
    }

    /// Drop idle buckets and expired lockouts
    pub fn prune(&self) {
        self.failures.retain_recent();
        let now = Instant::now();
        self.lockouts.retain(|_, until| *until > now);
    }

    /// Keys currently tracked, buckets plus lockouts
    pub fn tracked(&self) -> usize {
        self.failures.len() + self.lockouts.len()
    }

    fn rejected(&self, username: &str, client: IpAddr) -> AppError {
        tracing::warn!(username = %username, client = %client, "Student login rate limit exceeded");
        record_student_login("rate_limited");
        AppError::RateLimited {
            limit: self.per_minute,
        }
    }
}
