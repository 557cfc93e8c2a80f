//! Fixed-window rate limiter keyed by client identity + route.
//!
//! Each key tracks a request count and the start of its current window.
//! When the window elapses the count resets; a request beyond the quota is
//! rejected with the time remaining until the window rolls over. Entries are
//! never persisted and a periodic [`RateLimiter::purge_stale`] sweep bounds
//! memory.
//!
//! Internal faults (a poisoned lock) admit the request: the limiter is
//! protective infrastructure and must never block the primary path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start_ms: u64,
}

/// Outcome of one admission check, with everything the HTTP edge needs to
/// emit `X-RateLimit-*` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Configured quota for one window.
    pub limit: u32,
    /// Requests left in the current window (0 when rejected).
    pub remaining: u32,
    /// Epoch milliseconds at which the current window resets.
    pub reset_at_ms: u64,
    /// How long a rejected client should wait. Zero when allowed.
    pub retry_after_ms: u64,
}

/// Process-wide fixed-window rate limiter.
pub struct RateLimiter<C: Clock = SystemClock> {
    entries: Mutex<HashMap<String, WindowEntry>>,
    quota: u32,
    window_ms: u64,
    clock: Arc<C>,
}

impl RateLimiter<SystemClock> {
    /// Create a limiter with the given quota per window, on the wall clock.
    pub fn new(quota: u32, window: Duration) -> Self {
        Self::with_clock(quota, window, Arc::new(SystemClock))
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Create a limiter with an injected clock.
    pub fn with_clock(quota: u32, window: Duration, clock: Arc<C>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota,
            window_ms: window.as_millis() as u64,
            clock,
        }
    }

    /// Record one request for `client_key` and decide whether to admit it.
    pub fn check(&self, client_key: &str) -> Decision {
        let now = self.clock.now_millis();

        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("rate limiter lock poisoned, admitting request");
                return self.permissive_decision(now);
            }
        };

        let entry = entries.entry(client_key.to_string()).or_insert(WindowEntry {
            count: 0,
            window_start_ms: now,
        });

        // Reset the window once it has elapsed.
        if now.saturating_sub(entry.window_start_ms) > self.window_ms {
            entry.count = 0;
            entry.window_start_ms = now;
        }

        entry.count += 1;

        let reset_at_ms = entry.window_start_ms + self.window_ms;
        if entry.count > self.quota {
            Decision {
                allowed: false,
                limit: self.quota,
                remaining: 0,
                reset_at_ms,
                retry_after_ms: reset_at_ms.saturating_sub(now),
            }
        } else {
            Decision {
                allowed: true,
                limit: self.quota,
                remaining: self.quota - entry.count,
                reset_at_ms,
                retry_after_ms: 0,
            }
        }
    }

    /// Drop entries whose window has already elapsed. Returns the number
    /// removed. Purge cadence is the caller's concern and is independent of
    /// the window size.
    pub fn purge_stale(&self) -> usize {
        let now = self.clock.now_millis();
        match self.entries.lock() {
            Ok(mut entries) => {
                let before = entries.len();
                entries
                    .retain(|_, entry| now.saturating_sub(entry.window_start_ms) <= self.window_ms);
                before - entries.len()
            }
            Err(_) => {
                tracing::warn!("rate limiter lock poisoned, skipping purge");
                0
            }
        }
    }

    /// Number of tracked client keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn permissive_decision(&self, now: u64) -> Decision {
        Decision {
            allowed: true,
            limit: self.quota,
            remaining: self.quota,
            reset_at_ms: now + self.window_ms,
            retry_after_ms: 0,
        }
    }
}

/// Compose the limiter key from a client identity and the requested path,
/// so distinct endpoints get independent quotas per client.
pub fn client_key(ip: &str, path: &str) -> String {
    format!("{}:{}", ip, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(quota: u32) -> (RateLimiter<ManualClock>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(1_000_000));
        (
            RateLimiter::with_clock(quota, Duration::from_secs(60), clock.clone()),
            clock,
        )
    }

    #[test]
    fn exactly_quota_requests_admitted_per_window() {
        let (limiter, _clock) = limiter(10);
        let key = client_key("1.2.3.4", "/api/analyze-990");

        for i in 0..10 {
            let decision = limiter.check(&key);
            assert!(decision.allowed, "request {} should be admitted", i + 1);
            assert_eq!(decision.remaining, 10 - (i + 1));
        }

        let rejected = limiter.check(&key);
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        assert!(rejected.retry_after_ms > 0);
        assert_eq!(rejected.reset_at_ms, 1_000_000 + 60_000);
    }

    #[test]
    fn count_resets_after_window_elapses() {
        let (limiter, clock) = limiter(2);
        let key = "c:/api/process-pdf";

        assert!(limiter.check(key).allowed);
        assert!(limiter.check(key).allowed);
        assert!(!limiter.check(key).allowed);

        clock.advance(60_001);
        let fresh = limiter.check(key);
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 1);
        // New window starts at the reset request's time.
        assert_eq!(fresh.reset_at_ms, 1_000_000 + 60_001 + 60_000);
    }

    #[test]
    fn distinct_clients_and_paths_have_independent_quotas() {
        let (limiter, _clock) = limiter(1);

        assert!(limiter.check(&client_key("a", "/api/x")).allowed);
        assert!(!limiter.check(&client_key("a", "/api/x")).allowed);

        // Same client, different path: independent window.
        assert!(limiter.check(&client_key("a", "/api/y")).allowed);
        // Different client, same path: independent window.
        assert!(limiter.check(&client_key("b", "/api/x")).allowed);
    }

    #[test]
    fn purge_removes_only_elapsed_windows() {
        let (limiter, clock) = limiter(5);
        limiter.check("stale");
        clock.advance(45_000);
        limiter.check("active");
        clock.advance(30_000);

        // "stale" window started 75s ago, "active" 30s ago.
        assert_eq!(limiter.purge_stale(), 1);
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn retry_after_counts_down_to_window_end() {
        let (limiter, clock) = limiter(1);
        limiter.check("k");
        clock.advance(20_000);
        let rejected = limiter.check("k");
        assert!(!rejected.allowed);
        assert_eq!(rejected.retry_after_ms, 40_000);
    }
}
