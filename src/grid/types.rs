use std::fmt;
use serde::{Serialize, Deserialize};

/// Stable identifier of a slot within one grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        SlotId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(id: &str) -> Self {
        SlotId::new(id)
    }
}

/// Status stored on a slot record. There is deliberately no `Selected` here:
/// selection only exists as a display overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Occupied,
    Reserved,
}

impl SlotStatus {
    /// The `available <-> occupied` toggle used by the simulation.
    /// Any other status has no toggle target.
    pub fn toggled(self) -> Option<SlotStatus> {
        match self {
            SlotStatus::Available => Some(SlotStatus::Occupied),
            SlotStatus::Occupied => Some(SlotStatus::Available),
            SlotStatus::Reserved => None,
        }
    }
}

/// Status shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Available,
    Occupied,
    Reserved,
    Selected,
}

impl From<SlotStatus> for DisplayStatus {
    fn from(status: SlotStatus) -> Self {
        match status {
            SlotStatus::Available => DisplayStatus::Available,
            SlotStatus::Occupied => DisplayStatus::Occupied,
            SlotStatus::Reserved => DisplayStatus::Reserved,
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DisplayStatus::Available => "available",
            DisplayStatus::Occupied => "occupied",
            DisplayStatus::Reserved => "reserved",
            DisplayStatus::Selected => "selected",
        };
        f.write_str(label)
    }
}

/// One parking space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub number: String,
    pub status: SlotStatus,
}

impl Slot {
    pub fn new(id: impl Into<String>, number: impl Into<String>, status: SlotStatus) -> Self {
        Slot {
            id: SlotId::new(id),
            number: number.into(),
            status,
        }
    }
}

/// Where the grid's slots come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    /// Generated locally and drifted by the simulation timer
    Synthetic,
    /// Supplied by an external source; never mutated locally
    Override,
}
