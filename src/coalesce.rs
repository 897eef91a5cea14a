//! Selection coalescing for rapid user-driven refreshes.
//!
//! The dashboard re-fetches on every season/driver/race selection change,
//! debounced by a few hundred milliseconds. A plain timer debounce leaves
//! a race open: an older request can resolve after a newer one and clobber
//! fresh data with stale data. [`SelectionGuard`] closes it with a
//! monotonically increasing generation token - a result is applied only
//! while its token is still the latest one issued.
//!
//! ```rust,ignore
//! let guard = SelectionGuard::new();
//! let generation = guard.issue();            // user changed a select
//! let data = fetch(selection).await;
//! if let Some(data) = guard.apply_if_latest(generation, data) {
//!     render(data);                          // newest selection only
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Token identifying one issued selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Tracks the latest issued generation.
#[derive(Debug, Default)]
pub struct SelectionGuard {
    latest: AtomicU64,
}

impl SelectionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new selection change and get its token. Every call
    /// invalidates all previously issued tokens.
    pub fn issue(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `generation` is still the most recent one issued.
    pub fn is_latest(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    /// Keep `value` only if `generation` is still the latest; stale
    /// in-flight results come back as `None` and must be discarded.
    pub fn apply_if_latest<T>(&self, generation: Generation, value: T) -> Option<T> {
        self.is_latest(generation).then_some(value)
    }
}

/// Debounced fetch: wait out the coalescing delay, then run `fetch` and
/// apply its result - unless a newer selection arrived at any point, in
/// which case the whole invocation is dropped.
pub async fn debounced<F, Fut, T>(
    guard: &SelectionGuard,
    delay: Duration,
    fetch: F,
) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let generation = guard.issue();
    tokio::time::sleep(delay).await;

    // Superseded while waiting: skip the fetch entirely.
    if !guard.is_latest(generation) {
        return None;
    }

    let value = fetch().await;
    guard.apply_if_latest(generation, value)
}

/// [`debounced`] with the configured dashboard delay (`DEBOUNCE_MS`).
pub async fn debounced_default<F, Fut, T>(guard: &SelectionGuard, fetch: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    debounced(guard, crate::config::CONFIG.debounce, fetch).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_generation_invalidates_older() {
        let guard = SelectionGuard::new();
        let first = guard.issue();
        let second = guard.issue();

        assert!(!guard.is_latest(first));
        assert!(guard.is_latest(second));
        assert_eq!(guard.apply_if_latest(first, "stale"), None);
        assert_eq!(guard.apply_if_latest(second, "fresh"), Some("fresh"));
    }

    #[test]
    fn test_stale_result_discarded_even_if_it_resolves_last() {
        let guard = SelectionGuard::new();
        let old = guard.issue();
        let new = guard.issue();

        // The newer request resolves first...
        assert_eq!(guard.apply_if_latest(new, "2023"), Some("2023"));
        // ...then the older one arrives late and is dropped.
        assert_eq!(guard.apply_if_latest(old, "2022"), None);
    }

    #[tokio::test]
    async fn test_debounced_applies_latest_only() {
        let guard = SelectionGuard::new();

        let stale = debounced(&guard, Duration::from_millis(5), || async { "first" });
        let fresh = debounced(&guard, Duration::from_millis(5), || async { "second" });

        // Both futures started; the second issue supersedes the first.
        let (stale, fresh) = tokio::join!(stale, fresh);
        assert_eq!(stale, None);
        assert_eq!(fresh, Some("second"));
    }

    #[tokio::test]
    async fn test_debounced_runs_when_uncontended() {
        let guard = SelectionGuard::new();
        let result = debounced(&guard, Duration::from_millis(1), || async { 42 }).await;
        assert_eq!(result, Some(42));
    }
}
