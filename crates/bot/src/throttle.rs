//! Per-user flood control in front of the conversation engine.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use common::UserId;
use tokio::sync::Mutex;

/// Entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// Drops events that arrive within `interval` of the last accepted event of
/// the same user.
///
/// Dropped events do not extend the window: a user sending continuously is
/// let through once per interval.
pub struct Throttle {
    interval: Duration,
    accepted: Mutex<HashMap<UserId, Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accepted: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if the event may proceed.
    pub async fn allow(&self, user: UserId) -> bool {
        self.allow_at(user, Instant::now()).await
    }

    pub async fn allow_at(&self, user: UserId, now: Instant) -> bool {
        if self.interval.is_zero() {
            return true;
        }
        let mut accepted = self.accepted.lock().await;
        if let Some(last) = accepted.get(&user) {
            if now.saturating_duration_since(*last) < self.interval {
                return false;
            }
        }
        accepted.insert(user, now);

        if accepted.len() > PRUNE_THRESHOLD {
            let interval = self.interval;
            accepted.retain(|_, last| now.saturating_duration_since(*last) < interval);
            tracing::debug!(remaining = accepted.len(), "throttle entries pruned");
        }
        true
    }

    /// Number of users currently tracked.
    pub async fn tracked(&self) -> usize {
        self.accepted.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(700);

    #[tokio::test]
    async fn second_event_within_interval_is_dropped() {
        let throttle = Throttle::new(INTERVAL);
        let start = Instant::now();
        let user = UserId::new(1);
        assert!(throttle.allow_at(user, start).await);
        assert!(!throttle.allow_at(user, start + Duration::from_millis(300)).await);
        assert!(throttle.allow_at(user, start + INTERVAL).await);
    }

    #[tokio::test]
    async fn dropped_events_do_not_extend_the_window() {
        let throttle = Throttle::new(INTERVAL);
        let start = Instant::now();
        let user = UserId::new(1);
        assert!(throttle.allow_at(user, start).await);
        assert!(!throttle.allow_at(user, start + Duration::from_millis(600)).await);
        assert!(throttle.allow_at(user, start + Duration::from_millis(701)).await);
    }

    #[tokio::test]
    async fn users_are_throttled_independently() {
        let throttle = Throttle::new(INTERVAL);
        let now = Instant::now();
        assert!(throttle.allow_at(UserId::new(1), now).await);
        assert!(throttle.allow_at(UserId::new(2), now).await);
    }

    #[tokio::test]
    async fn zero_interval_disables_throttling() {
        let throttle = Throttle::new(Duration::ZERO);
        let now = Instant::now();
        assert!(throttle.allow_at(UserId::new(1), now).await);
        assert!(throttle.allow_at(UserId::new(1), now).await);
        assert_eq!(throttle.tracked().await, 0);
    }

    #[tokio::test]
    async fn stale_entries_are_pruned() {
        let throttle = Throttle::new(INTERVAL);
        let start = Instant::now();
        for id in 0..=PRUNE_THRESHOLD as i64 {
            throttle.allow_at(UserId::new(id), start).await;
        }
        assert_eq!(throttle.tracked().await, PRUNE_THRESHOLD + 1);

        let later = start + INTERVAL * 2;
        for id in 0..=PRUNE_THRESHOLD as i64 {
            throttle.allow_at(UserId::new(10_000 + id), later).await;
        }
        assert!(throttle.tracked().await <= PRUNE_THRESHOLD + 1);
    }
}
