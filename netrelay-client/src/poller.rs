//! Background poll cycle
//!
//! # States
//!
//! - **Idle**: no active cycle
//! - **Polling**: a task repeatedly calls `get_state`, dispatches each
//!   snapshot and sleeps for the poll interval
//! - **Stopping**: stop was requested (or a poll failed); the task exits the
//!   next time it checks, after any exchange in flight
//!
//! A failed poll dispatches one failure event and ends the cycle. There is
//! no retry; the owner restarts polling explicitly.
//!
//! Each cycle gets a fresh generation number and its own wake-up signal. A
//! task only keeps running while the active generation is its own, so a task
//! from an earlier cycle can never keep polling alongside a newer one, and a
//! stop aimed at an earlier cycle never cuts short a newer cycle's sleep.

use crate::session::SessionCore;
use netrelay_codec::StateDecoder;
use netrelay_core::{RelayError, RelayResult};
use netrelay_transport::TransportLayer;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

const IDLE: u64 = 0;

#[derive(Debug)]
struct PollState {
    /// Generation of the running cycle, `IDLE` when none
    active: AtomicU64,
    next_generation: AtomicU64,
    interval_ms: AtomicU64,
    task_starts: AtomicUsize,
}

impl PollState {
    fn is_current(&self, generation: u64) -> bool {
        self.active.load(Ordering::Acquire) == generation
    }

    /// Stop the cycle if it is still `generation`
    fn stop(&self, generation: u64) -> bool {
        self.active
            .compare_exchange(generation, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.load(Ordering::Relaxed))
    }
}

fn millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

/// Owner side of the poll cycle
#[derive(Debug)]
pub(crate) struct Poller {
    state: Arc<PollState>,
    /// Wake-up signal of the running cycle
    wake: Mutex<Option<Arc<Notify>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            state: Arc::new(PollState {
                active: AtomicU64::new(IDLE),
                next_generation: AtomicU64::new(1),
                interval_ms: AtomicU64::new(millis(interval)),
                task_starts: AtomicUsize::new(0),
            }),
            wake: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    /// Spawn the poll task unless a cycle is already active
    ///
    /// # Errors
    /// Returns `Configuration` when called outside a tokio runtime
    pub(crate) fn begin<D, T>(&self, core: Arc<SessionCore<D, T>>) -> RelayResult<bool>
    where
        D: StateDecoder,
        T: TransportLayer + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| {
            RelayError::Configuration(format!("Polling requires a tokio runtime: {}", e))
        })?;

        let wake = Arc::new(Notify::new());
        let generation = self.state.next_generation.fetch_add(1, Ordering::Relaxed);
        {
            let mut current = self.wake.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if self
                .state
                .active
                .compare_exchange(IDLE, generation, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return Ok(false);
            }
            *current = Some(Arc::clone(&wake));
        }

        self.state.task_starts.fetch_add(1, Ordering::Relaxed);
        let handle = runtime.spawn(poll_loop(
            core,
            Arc::clone(&self.state),
            wake,
            generation,
        ));

        // A previous task has already been told to stop; let it finish detached
        *self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle);
        Ok(true)
    }

    pub(crate) fn end(&self) {
        let wake = {
            let mut current = self.wake.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if self.state.active.swap(IDLE, Ordering::AcqRel) != IDLE {
                log::info!("Poll cycle stop requested");
            }
            current.take()
        };
        if let Some(wake) = wake {
            wake.notify_one();
        }
    }

    pub(crate) fn is_polling(&self) -> bool {
        self.state.active.load(Ordering::Acquire) != IDLE
    }

    pub(crate) fn interval(&self) -> Duration {
        self.state.interval()
    }

    pub(crate) fn set_interval(&self, interval: Duration) -> RelayResult<()> {
        if interval.is_zero() {
            return Err(RelayError::Configuration(
                "Poll interval must be positive".to_string(),
            ));
        }
        self.state
            .interval_ms
            .store(millis(interval).max(1), Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn task_starts(&self) -> usize {
        self.state.task_starts.load(Ordering::Relaxed)
    }

    /// Stop the cycle and wait up to `grace` for the task to exit
    ///
    /// Returns false if the task is still running when `grace` expires.
    pub(crate) async fn shutdown(&self, grace: Duration) -> bool {
        self.end();

        let handle = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(handle) = handle else {
            return true;
        };

        match tokio::time::timeout(grace, handle).await {
            Ok(Ok(())) => {
                log::debug!("Poll task exited");
                true
            }
            Ok(Err(e)) => {
                log::error!("Poll task ended abnormally: {}", e);
                true
            }
            Err(_) => {
                log::warn!(
                    "Poll task did not exit within {:?}; leaving it detached until its exchange completes",
                    grace
                );
                false
            }
        }
    }
}

async fn poll_loop<D, T>(
    core: Arc<SessionCore<D, T>>,
    state: Arc<PollState>,
    wake: Arc<Notify>,
    generation: u64,
) where
    D: StateDecoder,
    T: TransportLayer + 'static,
{
    log::info!(
        "Polling {} device every {:?}",
        core.family(),
        state.interval()
    );

    while state.is_current(generation) {
        match core.get_state().await {
            Ok(Some(snapshot)) => {
                if state.is_current(generation) {
                    core.events.dispatch_status(&snapshot);
                }
            }
            Ok(None) => log::debug!("Poll of {} device got no response", core.family()),
            Err(RelayError::Disposed) => {
                state.stop(generation);
                break;
            }
            Err(error) => {
                if state.stop(generation) {
                    log::error!("Poll of {} device failed: {}", core.family(), error);
                    core.events.dispatch_failure(&error);
                }
                break;
            }
        }

        if !state.is_current(generation) {
            break;
        }
        tokio::select! {
            _ = tokio::time::sleep(state.interval()) => {}
            _ = wake.notified() => {}
        }
    }

    log::info!("Poll cycle {} for {} device ended", generation, core.family());
}
