//! Interval-driven cycle scheduling
//!
//! The watcher never schedules itself. `Poller` is the ready-made caller
//! loop: either as an async task on tokio or on a dedicated thread.

use crate::error::{Result, WatchError};
use crate::modwatch::SharedWatcher;
use crossbeam_channel::{bounded, select, tick, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Runs watcher cycles on a fixed interval
pub struct Poller {
    /// Watcher to drive
    watcher: SharedWatcher,

    /// Time between cycle starts
    interval: Duration,
}

impl Poller {
    pub fn new(watcher: impl Into<SharedWatcher>, interval: Duration) -> Self {
        Self {
            watcher: watcher.into(),
            interval,
        }
    }

    /// Handle to the watcher, e.g. for triggering an extra cycle
    pub fn watcher(&self) -> &SharedWatcher {
        &self.watcher
    }

    /// Run cycles until `shutdown` becomes `true` (or its sender is dropped)
    ///
    /// The first cycle runs immediately. Each cycle runs on the blocking
    /// thread pool. Returns the number of completed cycles.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<u64> {
        let mut timer = interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Starting poller (interval: {:?})", self.interval);

        let mut cycles = 0u64;
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = timer.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            let watcher = self.watcher.clone();
            match tokio::task::spawn_blocking(move || watcher.run_cycle()).await {
                Ok(raised) => {
                    cycles += 1;
                    if raised > 0 {
                        debug!("Poll cycle {} raised {} paths", cycles, raised);
                    }
                }
                Err(e) => {
                    warn!("Poll cycle failed: {}", e);
                    return Err(WatchError::Poller {
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!("Poller stopped after {} cycles", cycles);
        Ok(cycles)
    }

    /// Run cycles on a dedicated thread until the handle is stopped
    pub fn spawn(self) -> Result<PollerHandle> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let Poller { watcher, interval } = self;

        let thread = std::thread::Builder::new()
            .name("pollwatch-poller".to_string())
            .spawn(move || {
                info!("Starting poller thread (interval: {:?})", interval);
                let ticker = tick(interval);
                let mut cycles = 0u64;
                loop {
                    watcher.run_cycle();
                    cycles += 1;
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {}
                    }
                }
                info!("Poller thread stopped after {} cycles", cycles);
                cycles
            })
            .map_err(|e| WatchError::Poller {
                reason: format!("Failed to spawn poller thread: {}", e),
            })?;

        Ok(PollerHandle {
            stop_tx,
            thread: Some(thread),
        })
    }
}

/// Handle to a poller thread; stops it on drop
pub struct PollerHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<u64>>,
}

impl PollerHandle {
    /// Stop the thread after its current cycle and return the cycle count
    pub fn stop(mut self) -> Result<u64> {
        let _ = self.stop_tx.try_send(());
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| WatchError::Poller {
                reason: "poller thread panicked".to_string(),
            }),
            None => Ok(0),
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.stop_tx.try_send(());
            let _ = thread.join();
        }
    }
}
