pub mod types;
pub mod generate;
pub mod events;
pub mod state;
pub mod simulation;
pub mod render;
pub mod manager;

pub use types::{DisplayStatus, GridMode, Slot, SlotId, SlotStatus};
pub use generate::{slot_number, Shape};
pub use events::{OccupancyEvent, OccupancyEventKind};
pub use state::TickOutcome;
pub use render::{on_slot_activate, render, GridSummary, GridView, SlotVisual};
pub use manager::{GridConfig, GridSnapshot, SlotGridManager};
