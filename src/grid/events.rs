use std::collections::VecDeque;
use chrono::{DateTime, Utc};
use serde::Serialize;
use super::types::{SlotId, SlotStatus};

/// How many occupancy events a grid keeps around
pub const EVENT_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyEventKind {
    Entry,
    Exit,
}

/// A vehicle entering or leaving a slot, as observed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyEvent {
    pub slot_id: SlotId,
    pub slot_number: String,
    pub kind: OccupancyEventKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl OccupancyEvent {
    /// Event for a slot that just moved to `status`, if that move is an entry or exit
    pub fn for_transition(slot_id: &SlotId, slot_number: &str, status: SlotStatus, timestamp: DateTime<Utc>) -> Option<Self> {
        let (kind, description) = match status {
            SlotStatus::Occupied => (OccupancyEventKind::Entry, format!("Vehicle detected in slot {}", slot_number)),
            SlotStatus::Available => (OccupancyEventKind::Exit, format!("Vehicle left slot {}", slot_number)),
            SlotStatus::Reserved => return None,
        };
        Some(OccupancyEvent {
            slot_id: slot_id.clone(),
            slot_number: slot_number.to_string(),
            kind,
            description,
            timestamp,
        })
    }
}

/// Bounded, oldest-first log of occupancy events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: VecDeque<OccupancyEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: OccupancyEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Most recent first
    pub fn recent(&self) -> Vec<OccupancyEvent> {
        self.events.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
