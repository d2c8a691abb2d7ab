use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied { retry_after: Duration },
}
impl RateLimitDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Seconds the client should wait, rounded up. Zero when allowed.
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::Allowed => 0,
            Self::Denied { retry_after } => {
                let secs = retry_after.as_secs();
                if retry_after.subsec_nanos() > 0 {
                    secs + 1
                } else {
                    secs.max(1)
                }
            }
        }
    }
}

/// Process-scoped map from client identifier to the time of its last accepted request.
#[derive(Debug, Default)]
pub struct RateLimitStore {
    entries: Mutex<HashMap<String, Instant>>,
}
impl RateLimitStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    #[must_use]
    pub fn last_accepted(&self, client_id: &str) -> Option<Instant> {
        self.entries.lock().get(client_id).copied()
    }
}

/// Enforces a minimum interval between accepted requests of the same client.
///
/// The window is measured from the last *accepted* request: a denied attempt
/// leaves the stored timestamp untouched. The read-modify-write happens under
/// one lock, so two racing requests from the same client cannot both pass.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Duration,
    store: Arc<RateLimitStore>,
}
impl RateLimiter {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self::with_store(window, Arc::new(RateLimitStore::new()))
    }

    #[must_use]
    pub const fn with_store(window: Duration, store: Arc<RateLimitStore>) -> Self {
        Self { window, store }
    }

    #[must_use]
    pub fn store(&self) -> &RateLimitStore {
        &self.store
    }

    pub fn check_and_record(&self, client_id: &str) -> RateLimitDecision {
        self.check_and_record_at(client_id, Instant::now())
    }

    pub fn check_and_record_at(&self, client_id: &str, now: Instant) -> RateLimitDecision {
        let mut entries = self.store.entries.lock();

        if let Some(last) = entries.get(client_id) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.window {
                let retry_after = self.window - elapsed;
                trace!(client_id, ?retry_after, "Rate limit hit");
                return RateLimitDecision::Denied { retry_after };
            }
        }

        entries.insert(client_id.to_string(), now);

        RateLimitDecision::Allowed
    }

    /// Drop every entry whose last accepted request is at least one window old.
    ///
    /// Such entries would allow the next request anyway, so evicting them
    /// does not change any decision.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.store.entries.lock();
        let before = entries.len();

        entries.retain(|_, last| now.saturating_duration_since(*last) < self.window);

        before - entries.len()
    }

    /// Periodically evict stale entries until the returned handle is aborted.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let limiter = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let removed = limiter.sweep_at(Instant::now());
                if removed > 0 {
                    debug!(
                        removed,
                        remaining = limiter.store.len(),
                        "Evicted stale rate limit entries"
                    );
                }
            }
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
