use std::sync::{Arc, Mutex};
use std::time::Duration;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use crate::error::GridError;
use super::events::OccupancyEvent;
use super::generate::{check_unique_ids, Shape};
use super::render::{on_slot_activate, render, GridSummary, GridView};
use super::simulation::{current_runtime, lock, SimulationHandle, DEFAULT_TICK_INTERVAL};
use super::state::{GridState, TickOutcome};
use super::types::{GridMode, Slot, SlotId};

/// Grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub rows: i64,
    pub cols: i64,
    pub tick_interval: Duration,
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        let shape = Shape::default();
        GridConfig {
            rows: shape.rows() as i64,
            cols: shape.cols() as i64,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }
}

/// Read-only copy of a grid's current state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    pub slots: Vec<Slot>,
    pub selected: Option<SlotId>,
    pub rows: u32,
    pub cols: u32,
    pub mode: GridMode,
    pub generation: u64,
}

impl GridSnapshot {
    pub fn render(&self, selectable: bool) -> GridView {
        render(&self.slots, self.selected.as_ref(), selectable, self.cols)
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary::of(&self.slots)
    }
}

/// Owns a slot collection and, while no override is supplied, the timer that
/// drifts it. Dropping the manager cancels the timer.
#[derive(Debug)]
pub struct SlotGridManager {
    state: Arc<Mutex<GridState>>,
    simulation: Option<SimulationHandle>,
    tick_interval: Duration,
}

impl SlotGridManager {
    /// Builds the grid. Without `override_slots` this arms the simulation and
    /// must be called inside a tokio runtime.
    pub fn new(config: GridConfig, override_slots: Option<Vec<Slot>>) -> Result<Self, GridError> {
        // an override only uses the shape for layout
        let shape = match &override_slots {
            Some(slots) => {
                check_unique_ids(slots)?;
                Shape::clamped(config.rows, config.cols)
            }
            None => Shape::new(config.rows, config.cols)?,
        };

        let runtime = match override_slots {
            Some(_) => None,
            None => Some(current_runtime()?),
        };

        let mut state = GridState::new(shape, config.seed);
        if let Some(slots) = override_slots {
            state.set_override(slots);
        }
        match state.mode() {
            GridMode::Synthetic => info!("Created synthetic {}x{} slot grid", shape.rows(), shape.cols()),
            GridMode::Override => info!("Created slot grid from {} supplied slots", state.slots().len()),
        }

        let generation = state.generation();
        let state = Arc::new(Mutex::new(state));
        let simulation = runtime
            .map(|runtime| SimulationHandle::spawn(&runtime, state.clone(), generation, config.tick_interval));

        Ok(SlotGridManager {
            state,
            simulation,
            tick_interval: config.tick_interval,
        })
    }

    /// Rebuilds the grid for a new shape. On error the current grid is kept.
    /// While an override is shown the shape only drives layout and is clamped.
    pub fn set_shape(&mut self, rows: i64, cols: i64) -> Result<(), GridError> {
        let mut state = lock(&self.state);
        let (shape, runtime) = match state.mode() {
            GridMode::Synthetic => (Shape::new(rows, cols)?, Some(current_runtime()?)),
            GridMode::Override => (Shape::clamped(rows, cols), None),
        };

        self.simulation = None;
        state.set_shape(shape);
        if let Some(runtime) = runtime {
            self.simulation = Some(SimulationHandle::spawn(&runtime, self.state.clone(), state.generation(), self.tick_interval));
        }
        info!("Grid reshaped to {}x{} ({:?})", shape.rows(), shape.cols(), state.mode());
        Ok(())
    }

    /// Hands status authority to an external source. The timer is cancelled
    /// before the supplied slots are adopted.
    pub fn set_override(&mut self, slots: Vec<Slot>) -> Result<(), GridError> {
        check_unique_ids(&slots)?;
        let mut state = lock(&self.state);
        self.simulation = None;
        state.set_override(slots);
        info!("Grid now shows {} externally supplied slots", state.slots().len());
        Ok(())
    }

    /// Returns to a synthetic grid of the current shape and re-arms the timer
    pub fn clear_override(&mut self) -> Result<(), GridError> {
        let runtime = current_runtime()?;
        let mut state = lock(&self.state);
        self.simulation = None;
        state.clear_override();
        self.simulation = Some(SimulationHandle::spawn(&runtime, self.state.clone(), state.generation(), self.tick_interval));
        info!("Grid back to simulated occupancy");
        Ok(())
    }

    pub fn select(&self, id: SlotId) -> Result<(), GridError> {
        let mut state = lock(&self.state);
        if state.find(&id).is_none() {
            return Err(GridError::UnknownSlot(id));
        }
        state.set_selected(Some(id));
        Ok(())
    }

    pub fn clear_selection(&self) {
        lock(&self.state).set_selected(None);
    }

    pub fn selected(&self) -> Option<SlotId> {
        lock(&self.state).selected().cloned()
    }

    /// Click on slot `id`: selects it when the activation contract allows.
    /// `Ok(None)` means the click was refused.
    pub fn activate(&self, id: &SlotId, selectable: bool) -> Result<Option<SlotId>, GridError> {
        let mut state = lock(&self.state);
        let slot = state.find(id).ok_or_else(|| GridError::UnknownSlot(id.clone()))?;
        let event = on_slot_activate(slot, selectable);
        match &event {
            Some(selected) => state.set_selected(Some(selected.clone())),
            None => debug!("Activation of slot {} refused", id),
        }
        Ok(event)
    }

    /// Runs one tick right away, outside the timer cadence
    pub fn tick_now(&self) -> TickOutcome {
        lock(&self.state).tick(Utc::now())
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let state = lock(&self.state);
        GridSnapshot {
            slots: state.slots().to_vec(),
            selected: state.selected().cloned(),
            rows: state.shape().rows(),
            cols: state.shape().cols(),
            mode: state.mode(),
            generation: state.generation(),
        }
    }

    /// Most recent occupancy events first
    pub fn events(&self) -> Vec<OccupancyEvent> {
        lock(&self.state).events().recent()
    }

    pub fn mode(&self) -> GridMode {
        lock(&self.state).mode()
    }

    pub fn is_simulating(&self) -> bool {
        self.simulation.as_ref().is_some_and(|sim| !sim.is_finished())
    }
}
