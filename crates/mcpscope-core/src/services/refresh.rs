//! Refresh coordinator: owns when reconciliation runs.
//!
//! All triggers (startup, manual refresh, post-mutation, polling) funnel
//! through [`RefreshCoordinator::request_refresh`], which coalesces them
//! into at most one in-flight reconciliation plus at most one queued
//! follow-up. The coordinator is also the exclusive owner of the single
//! current [`SystemInventory`]; readers only ever receive immutable
//! `Arc` snapshots of it.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use super::inventory::InventoryService;
use crate::domain::SystemInventory;

/// Identifier of one reconciliation cycle.
///
/// Returned by [`RefreshCoordinator::request_refresh`]; waiting on it
/// guarantees the awaited cycle started after the request, so it
/// observes any mutation made before the request.
pub type RefreshTicket = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshState {
    Idle,
    Refreshing,
}

struct CoordinatorInner {
    state: RefreshState,
    /// A refresh was requested while one was in flight; run one more.
    queued: bool,
    /// Id the next-started cycle will carry.
    next_cycle: RefreshTicket,
    /// Id of the in-flight cycle, valid while `Refreshing`.
    current_cycle: RefreshTicket,
}

/// Coalescing refresh state machine around an [`InventoryService`].
pub struct RefreshCoordinator {
    service: Arc<InventoryService>,
    inner: Mutex<CoordinatorInner>,
    current: RwLock<Arc<SystemInventory>>,
    completed_tx: watch::Sender<RefreshTicket>,
    /// Self-handle for spawning refresh tasks from `&self` methods.
    me: Weak<Self>,
}

impl RefreshCoordinator {
    /// Create a coordinator with an empty initial inventory.
    #[must_use]
    pub fn new(service: Arc<InventoryService>) -> Arc<Self> {
        let (completed_tx, _) = watch::channel(0);
        Arc::new_cyclic(|me| Self {
            service,
            inner: Mutex::new(CoordinatorInner {
                state: RefreshState::Idle,
                queued: false,
                next_cycle: 1,
                current_cycle: 0,
            }),
            current: RwLock::new(Arc::new(SystemInventory::default())),
            completed_tx,
            me: me.clone(),
        })
    }

    /// Snapshot of the most recently completed inventory.
    pub async fn current(&self) -> Arc<SystemInventory> {
        self.current.read().await.clone()
    }

    /// Request a reconciliation.
    ///
    /// Idempotent under load: when a cycle is already in flight the
    /// request coalesces into a single queued follow-up cycle, and the
    /// returned ticket names that follow-up. Never blocks on the
    /// reconciliation itself.
    pub async fn request_refresh(&self) -> RefreshTicket {
        let mut inner = self.inner.lock().await;
        match inner.state {
            RefreshState::Idle => {
                let cycle = inner.next_cycle;
                inner.state = RefreshState::Refreshing;
                inner.current_cycle = cycle;
                inner.next_cycle += 1;
                drop(inner);
                debug!(cycle, "starting refresh");
                // The coordinator always lives behind an Arc (see `new`).
                if let Some(this) = self.me.upgrade() {
                    tokio::spawn(this.run_cycles());
                }
                cycle
            }
            RefreshState::Refreshing => {
                inner.queued = true;
                // The queued cycle will start with the next id.
                inner.next_cycle
            }
        }
    }

    /// Wait until the given cycle (or a later one) has completed.
    pub async fn wait_for(&self, ticket: RefreshTicket) {
        let mut rx = self.completed_tx.subscribe();
        loop {
            if *rx.borrow_and_update() >= ticket {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Request a refresh and wait for its cycle to complete.
    pub async fn refresh_now(&self) -> Arc<SystemInventory> {
        let ticket = self.request_refresh().await;
        self.wait_for(ticket).await;
        self.current().await
    }

    /// Observe completed-cycle ids, for UIs that reprint on change.
    #[must_use]
    pub fn completed(&self) -> watch::Receiver<RefreshTicket> {
        self.completed_tx.subscribe()
    }

    /// Drive the periodic-polling trigger. The first tick fires
    /// immediately, covering the on-load refresh.
    #[must_use]
    pub fn start_polling(&self, interval: Duration) -> JoinHandle<()> {
        let me = self.me.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(this) = me.upgrade() else { return };
                this.request_refresh().await;
            }
        })
    }

    /// Run reconciliation cycles until no follow-up is queued.
    ///
    /// A queued request restarts the loop (`Refreshing -> Refreshing`)
    /// instead of returning to idle, so changes made during the window
    /// are always captured by a fresh cycle.
    async fn run_cycles(self: Arc<Self>) {
        loop {
            let inventory = Arc::new(self.service.collect().await);
            *self.current.write().await = inventory;

            let mut inner = self.inner.lock().await;
            let finished = inner.current_cycle;
            if inner.queued {
                inner.queued = false;
                inner.current_cycle = inner.next_cycle;
                inner.next_cycle += 1;
                drop(inner);
                debug!(cycle = finished, "refresh complete, running queued follow-up");
                let _ = self.completed_tx.send(finished);
                continue;
            }
            inner.state = RefreshState::Idle;
            drop(inner);
            debug!(cycle = finished, "refresh complete");
            let _ = self.completed_tx.send(finished);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProcessRecord, ServerDescriptor, ServerSource};
    use crate::ports::{
        ConfigSourceError, ConfigSourcePort, ProcessSnapshotPort, SnapshotError,
    };
    use crate::reconcile::MatcherConfig;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    /// Snapshot port that blocks until the test releases a permit,
    /// counting how many snapshots were taken.
    struct GatedSnapshot {
        gate: Semaphore,
        calls: AtomicUsize,
    }

    impl GatedSnapshot {
        fn new() -> Self {
            Self {
                gate: Semaphore::new(0),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProcessSnapshotPort for GatedSnapshot {
        async fn snapshot(&self) -> Result<Vec<ProcessRecord>, SnapshotError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let permit = self.gate.acquire().await.map_err(|e| {
                SnapshotError::Enumeration(e.to_string())
            })?;
            permit.forget();
            Ok(vec![])
        }
    }

    struct EmptySource(ServerSource);

    #[async_trait]
    impl ConfigSourcePort for EmptySource {
        fn source(&self) -> ServerSource {
            self.0
        }

        fn config_path(&self) -> String {
            "/tmp/empty.json".to_string()
        }

        async fn load(&self) -> Result<Vec<ServerDescriptor>, ConfigSourceError> {
            Ok(vec![])
        }
    }

    fn gated_coordinator() -> (Arc<GatedSnapshot>, Arc<RefreshCoordinator>) {
        let gate = Arc::new(GatedSnapshot::new());
        let service = Arc::new(InventoryService::new(
            gate.clone(),
            Arc::new(EmptySource(ServerSource::Assistant)),
            Arc::new(EmptySource(ServerSource::Editor)),
            MatcherConfig::default(),
        ));
        (gate, RefreshCoordinator::new(service))
    }

    async fn wait_until(gate: &GatedSnapshot, count: usize) {
        for _ in 0..200 {
            if gate.calls() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("snapshot never reached {count} calls");
    }

    #[tokio::test]
    async fn single_refresh_runs_one_cycle() {
        let (gate, coordinator) = gated_coordinator();
        gate.gate.add_permits(1);

        let inventory = coordinator.refresh_now().await;
        assert!(inventory.running.is_empty());
        assert_eq!(gate.calls(), 1);
    }

    #[tokio::test]
    async fn requests_during_flight_coalesce_into_one_follow_up() {
        let (gate, coordinator) = gated_coordinator();

        let first = coordinator.request_refresh().await;
        wait_until(&gate, 1).await;

        // Two requests arrive while the first cycle is still in flight.
        let second = coordinator.request_refresh().await;
        let third = coordinator.request_refresh().await;
        assert_eq!(second, third);
        assert!(second > first);

        // Release both cycles and wait for the queued one.
        gate.gate.add_permits(2);
        coordinator.wait_for(third).await;

        // Exactly one additional reconciliation ran, not two.
        assert_eq!(gate.calls(), 2);

        // And the machine settled back to idle: nothing further runs.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gate.calls(), 2);
    }

    #[tokio::test]
    async fn refresh_after_completion_starts_fresh_cycle() {
        let (gate, coordinator) = gated_coordinator();
        gate.gate.add_permits(1);
        coordinator.refresh_now().await;

        gate.gate.add_permits(1);
        coordinator.refresh_now().await;
        assert_eq!(gate.calls(), 2);
    }

    #[tokio::test]
    async fn current_is_replaced_wholesale() {
        let (gate, coordinator) = gated_coordinator();
        let before = coordinator.current().await;

        gate.gate.add_permits(1);
        let after = coordinator.refresh_now().await;

        // Same content here, but a fresh allocation each cycle.
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
