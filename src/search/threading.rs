//! Cross-thread search control.
//!
//! `SharedSearchState` is the only object shared between the controller and
//! a running search: a stop flag plus node and wall-clock budgets. Everything
//! is atomic so the search thread never blocks on it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Nodes between budget checks inside the search.
pub const BUDGET_CHECK_INTERVAL: u64 = 256;

const UNLIMITED: u64 = u64::MAX;

#[derive(Debug)]
pub struct SharedSearchState {
    stopped: AtomicBool,
    nodes: AtomicU64,
    node_limit: AtomicU64,
    // Milliseconds since `epoch`.
    deadline_ms: AtomicU64,
    epoch: Instant,
}

impl SharedSearchState {
    /// Fresh state wrapped for sharing between the controller and a search thread.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self {
            stopped: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
            node_limit: AtomicU64::new(UNLIMITED),
            deadline_ms: AtomicU64::new(UNLIMITED),
            epoch: Instant::now(),
        })
    }

    #[inline]
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Nodes reported since the last `begin_search`.
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(UNLIMITED)
    }

    /// Installs budgets and zeroes the node count for a new search.
    ///
    /// A stop requested before the search begins still aborts it.
    pub fn begin_search(&self, node_budget: Option<u64>, time_budget_ms: Option<u64>) {
        self.nodes.store(0, Ordering::Relaxed);
        self.node_limit
            .store(node_budget.unwrap_or(UNLIMITED), Ordering::Relaxed);

        let deadline = time_budget_ms
            .map_or(UNLIMITED, |budget| self.elapsed_ms().saturating_add(budget));
        self.deadline_ms.store(deadline, Ordering::Relaxed);
    }

    /// Adds `count` searched nodes; true once a budget is used up.
    pub fn record_nodes(&self, count: u64) -> bool {
        let total = self.nodes.fetch_add(count, Ordering::Relaxed) + count;
        total >= self.node_limit.load(Ordering::Relaxed) || self.out_of_time()
    }

    pub fn out_of_time(&self) -> bool {
        let deadline = self.deadline_ms.load(Ordering::Relaxed);
        deadline != UNLIMITED && self.elapsed_ms() >= deadline
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::SharedSearchState;

    #[test]
    fn stop_flag_survives_begin_search() {
        let shared = SharedSearchState::new_shared();
        assert!(!shared.should_stop());
        shared.request_stop();
        shared.begin_search(None, None);
        assert!(shared.should_stop());
    }

    #[test]
    fn node_budget_trips_once_reached() {
        let shared = SharedSearchState::new_shared();
        shared.begin_search(Some(10), None);
        assert!(!shared.record_nodes(9));
        assert!(shared.record_nodes(1));
        assert_eq!(shared.nodes(), 10);

        shared.begin_search(None, None);
        assert_eq!(shared.nodes(), 0);
        assert!(!shared.record_nodes(1_000_000));
    }

    #[test]
    fn time_budget_counts_from_begin_search() {
        let shared = SharedSearchState::new_shared();
        assert!(!shared.out_of_time());

        shared.begin_search(None, Some(1));
        thread::sleep(Duration::from_millis(5));
        assert!(shared.out_of_time());

        shared.begin_search(None, None);
        assert!(!shared.out_of_time());
    }

    #[test]
    fn stop_is_visible_across_threads() {
        let shared = SharedSearchState::new_shared();
        let remote = shared.clone();
        thread::spawn(move || remote.request_stop())
            .join()
            .expect("stopper thread should finish");
        assert!(shared.should_stop());
    }
}
