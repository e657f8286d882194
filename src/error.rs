use thiserror::Error;
use crate::grid::SlotId;

/// Errors raised by the slot grid at configuration time
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid shape {rows}x{cols} is out of range (rows 1-26, cols 1-100)")]
    InvalidShape { rows: i64, cols: i64 },

    #[error("duplicate slot id '{0}' in override collection")]
    DuplicateSlotId(SlotId),

    #[error("no slot with id '{0}' in this grid")]
    UnknownSlot(SlotId),

    #[error("slot record {index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("slot data could not be read: {0}")]
    MalformedPayload(String),

    #[error("slot simulation needs a running tokio runtime")]
    NoRuntime,
}
