use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use chrono::Utc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};
use crate::error::GridError;
use super::state::{GridState, TickOutcome};
use super::types::GridMode;

/// Default cadence of simulated occupancy drift
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

pub(crate) fn lock(state: &Mutex<GridState>) -> MutexGuard<'_, GridState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The runtime simulation tasks get spawned on
pub(crate) fn current_runtime() -> Result<Handle, GridError> {
    Handle::try_current().map_err(|_| GridError::NoRuntime)
}

/// Owned timer driving the occupancy drift for one grid generation.
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct SimulationHandle {
    task: JoinHandle<()>,
    generation: u64,
}

impl SimulationHandle {
    /// Arms the timer for the state's current generation. The first tick fires
    /// one full `period` from now.
    pub(crate) fn spawn(runtime: &Handle, state: Arc<Mutex<GridState>>, generation: u64, period: Duration) -> Self {
        let task = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                // pick, check and flip under one lock
                let outcome = {
                    let mut state = lock(&state);
                    if state.generation() != generation || state.mode() != GridMode::Synthetic {
                        debug!("Simulation for generation {} is stale, stopping", generation);
                        break;
                    }
                    state.tick(Utc::now())
                };

                match outcome {
                    TickOutcome::Flipped { id, from, to } => {
                        debug!("Slot {} flipped {:?} -> {:?}", id, from, to);
                    }
                    other => debug!("Tick skipped: {:?}", other),
                }
            }
        });

        info!("Slot simulation armed for generation {} every {:?}", generation, period);
        SimulationHandle { task, generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Slot simulation for generation {} cancelled", self.generation);
    }
}
