// src/crawl/limiter.rs
// =============================================================================
// Per-domain politeness: how many requests may run at once against one host,
// and how long a slot stays taken after its request finished.
//
// Each host gets its own semaphore with `parallelism` permits. A task takes a
// permit before fetching and gives it back after
//     delay + random(0..=random_delay)
// so with parallelism 1 and delay 2s, requests are at least 2s apart.
//
// The DashMap lookup is synchronous; only the semaphore wait and the
// cooldown sleep suspend, and no map guard is held across them.
// =============================================================================

use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug)]
pub struct DomainLimiter {
    gates: DashMap<String, Arc<Semaphore>>,
    parallelism: usize,
    delay: Duration,
    random_delay: Duration,
}

/// A taken slot. Give it back with release() so the cooldown is applied.
#[derive(Debug)]
pub struct LimitPermit {
    _permit: Option<OwnedSemaphorePermit>,
    cooldown: Duration,
}

impl LimitPermit {
    pub async fn release(self) {
        if !self.cooldown.is_zero() {
            tokio::time::sleep(self.cooldown).await;
        }
    }
}

impl DomainLimiter {
    pub fn new(parallelism: usize, delay: Duration, random_delay: Duration) -> Self {
        Self {
            gates: DashMap::new(),
            parallelism: parallelism.max(1),
            delay,
            random_delay,
        }
    }

    pub async fn acquire(&self, host: &str) -> LimitPermit {
        let gate = self
            .gates
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.parallelism)))
            .clone();

        // The semaphores are never closed, so this only fails in theory
        let permit = gate.acquire_owned().await.ok();

        LimitPermit {
            _permit: permit,
            cooldown: self.cooldown(),
        }
    }

    fn cooldown(&self) -> Duration {
        let jitter_ms = self.random_delay.as_millis() as u64;
        if jitter_ms == 0 {
            return self.delay;
        }
        self.delay + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_parallelism_is_bounded_per_host() {
        let limiter = Arc::new(DomainLimiter::new(2, Duration::ZERO, Duration::ZERO));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            tasks.spawn(async move {
                let permit = limiter.acquire("example.com").await;
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                permit.release().await;
            });
        }
        while tasks.join_next().await.is_some() {}

        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_hosts_do_not_share_slots() {
        let limiter = DomainLimiter::new(1, Duration::ZERO, Duration::ZERO);
        let _a = limiter.acquire("a.example.com").await;
        // Would hang if both hosts shared one permit
        let _b = tokio::time::timeout(Duration::from_secs(1), limiter.acquire("b.example.com"))
            .await
            .expect("second host must not wait for the first");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_holds_the_slot() {
        let limiter = DomainLimiter::new(1, Duration::from_secs(2), Duration::ZERO);
        let start = Instant::now();

        let first = limiter.acquire("example.com").await;
        first.release().await;
        let _second = limiter.acquire("example.com").await;

        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_random_delay_stays_in_range() {
        let limiter = DomainLimiter::new(1, Duration::from_secs(1), Duration::from_millis(500));
        for _ in 0..100 {
            let cooldown = limiter.cooldown();
            assert!(cooldown >= Duration::from_secs(1));
            assert!(cooldown <= Duration::from_millis(1500));
        }
    }
}
