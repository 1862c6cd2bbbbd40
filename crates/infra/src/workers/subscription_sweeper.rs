use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use menuboard_core::EstablishmentId;
use menuboard_subscriptions::reconcile_expired;

use crate::store::EstablishmentStore;

/// Handle to stop and join a running sweeper.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    join: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(j) = self.join.take() {
            let _ = j.await;
        }
    }
}

/// Periodically flips lapsed subscriptions to inactive.
///
/// The subscription gate never writes; this worker is where stored state catches
/// up with the clock.
#[derive(Debug)]
pub struct SubscriptionSweeper<S> {
    store: S,
    interval: Duration,
}

impl<S> SubscriptionSweeper<S>
where
    S: EstablishmentStore + 'static,
{
    pub fn new(store: S, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run one reconciliation pass. Returns the establishments that were deactivated.
    pub fn sweep(&self, now: DateTime<Utc>) -> Vec<EstablishmentId> {
        let mut deactivated = Vec::new();

        for id in self.store.ids() {
            let mut changed = false;
            let result = self.store.update(id, &mut |est| {
                changed = reconcile_expired(&mut est.subscription, now);
                Ok(())
            });

            match result {
                Ok(_) if changed => {
                    info!(establishment_id = %id, "subscription expired; deactivated");
                    deactivated.push(id);
                }
                Ok(_) => {}
                Err(err) => warn!(establishment_id = %id, error = %err, "subscription sweep failed"),
            }
        }

        deactivated
    }

    /// Spawn the sweeper on the current tokio runtime. The first pass runs immediately.
    pub fn spawn(self) -> SweeperHandle
    where
        S: Send + Sync,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(self.run(shutdown_rx));

        SweeperHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let deactivated = self.sweep(Utc::now());
                    if !deactivated.is_empty() {
                        info!(count = deactivated.len(), "subscription sweep deactivated establishments");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
