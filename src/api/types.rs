//! Shared types for the API layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::engine::CareEngine;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
/// Wraps the engine plus API-specific state.
#[derive(Clone)]
pub struct ApiContext {
    pub engine: Arc<CareEngine>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl ApiContext {
    pub fn new(engine: Arc<CareEngine>) -> Self {
        Self {
            engine,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new())),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Rate limiter — per-client sliding window
// ═══════════════════════════════════════════════════════════

/// Per-client rate limiter with per-minute and per-hour limits.
pub struct RateLimiter {
    windows: HashMap<String, Vec<Instant>>,
    per_minute: u32,
    per_hour: u32,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            per_minute: 100,
            per_hour: 1000,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_limits(per_minute: u32, per_hour: u32) -> Self {
        Self {
            windows: HashMap::new(),
            per_minute,
            per_hour,
        }
    }

    /// Check if a client is within rate limits. Returns `Ok(())` or
    /// `Err(retry_after_secs)` if exceeded.
    pub fn check(&mut self, client_key: &str) -> Result<(), u64> {
        let now = Instant::now();
        let entries = self.windows.entry(client_key.to_string()).or_default();

        // Clean entries older than 1 hour
        entries.retain(|ts| now.duration_since(*ts) < Duration::from_secs(3600));

        // Check per-minute
        let last_minute = entries
            .iter()
            .filter(|ts| now.duration_since(**ts) < Duration::from_secs(60))
            .count() as u32;
        if last_minute >= self.per_minute {
            return Err(60);
        }

        // Check per-hour
        if entries.len() as u32 >= self.per_hour {
            return Err(3600);
        }

        entries.push(now);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limiter_allows_under_limit() {
        let mut limiter = RateLimiter::new();
        assert!(limiter.check("client-1").is_ok());
        assert!(limiter.check("client-1").is_ok());
    }

    #[test]
    fn rate_limiter_rejects_over_per_minute() {
        let mut limiter = RateLimiter::with_limits(2, 1000);
        assert!(limiter.check("client-1").is_ok());
        assert!(limiter.check("client-1").is_ok());
        assert_eq!(limiter.check("client-1"), Err(60));
    }

    #[test]
    fn rate_limiter_isolates_clients() {
        let mut limiter = RateLimiter::with_limits(1, 1000);
        assert!(limiter.check("client-1").is_ok());
        assert!(limiter.check("client-2").is_ok()); // Different client, OK
        assert_eq!(limiter.check("client-1"), Err(60)); // Same client, blocked
    }

    #[test]
    fn per_hour_limit_reports_long_retry() {
        let mut limiter = RateLimiter::with_limits(u32::MAX, 1);
        assert!(limiter.check("client-1").is_ok());
        assert_eq!(limiter.check("client-1"), Err(3600));
    }
}
