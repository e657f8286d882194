use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;
use super::events::{EventLog, OccupancyEvent};
use super::generate::{synthesize, Shape};
use super::types::{GridMode, Slot, SlotId, SlotStatus};

/// What a single simulation tick did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    Flipped { id: SlotId, from: SlotStatus, to: SlotStatus },
    /// The picked slot is the selected one and was left alone
    SkippedSelected { id: SlotId },
    /// The picked slot holds a status with no toggle target
    SkippedUnflippable { id: SlotId, status: SlotStatus },
    /// Nothing to pick from
    Empty,
    /// The grid shows externally supplied slots
    Suspended,
}

/// The slot collection plus everything a tick needs.
/// Shared between a manager and its simulation task.
#[derive(Debug)]
pub struct GridState {
    slots: Vec<Slot>,
    mode: GridMode,
    shape: Shape,
    override_input: Option<Vec<Slot>>,
    selected: Option<SlotId>,
    generation: u64,
    events: EventLog,
    rng: StdRng,
}

impl GridState {
    /// Synthetic state for `shape`; `seed` makes synthesis and drift reproducible
    pub fn new(shape: Shape, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = GridState {
            slots: Vec::new(),
            mode: GridMode::Synthetic,
            shape,
            override_input: None,
            selected: None,
            generation: 0,
            events: EventLog::default(),
            rng,
        };
        state.rebuild();
        state
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn selected(&self) -> Option<&SlotId> {
        self.selected.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn find(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|slot| &slot.id == id)
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.rebuild();
    }

    /// Callers check id uniqueness first
    pub fn set_override(&mut self, slots: Vec<Slot>) {
        self.override_input = Some(slots);
        self.rebuild();
    }

    pub fn clear_override(&mut self) {
        self.override_input = None;
        self.rebuild();
    }

    pub fn set_selected(&mut self, id: Option<SlotId>) {
        self.selected = id;
    }

    /// Throws the current collection away and builds a new one from the inputs.
    /// Bumps the generation so that timers armed for the old collection go quiet.
    fn rebuild(&mut self) {
        match &self.override_input {
            Some(slots) => {
                self.slots = slots.clone();
                self.mode = GridMode::Override;
            }
            None => {
                self.slots = synthesize(self.shape, &mut self.rng);
                self.mode = GridMode::Synthetic;
            }
        }
        self.generation += 1;

        if let Some(selected) = &self.selected {
            if self.find(selected).is_none() {
                debug!("Selected slot {} is gone after rebuild, clearing selection", selected);
                self.selected = None;
            }
        }
    }

    /// One step of simulated occupancy drift: pick a slot at random and flip it
    /// between available and occupied, unless it is selected.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.mode != GridMode::Synthetic {
            return TickOutcome::Suspended;
        }
        if self.slots.is_empty() {
            return TickOutcome::Empty;
        }

        let index = self.rng.gen_range(0..self.slots.len());
        let slot = &mut self.slots[index];

        if self.selected.as_ref() == Some(&slot.id) {
            return TickOutcome::SkippedSelected { id: slot.id.clone() };
        }

        let Some(to) = slot.status.toggled() else {
            return TickOutcome::SkippedUnflippable { id: slot.id.clone(), status: slot.status };
        };
        let from = slot.status;
        slot.status = to;

        if let Some(event) = OccupancyEvent::for_transition(&slot.id, &slot.number, to, now) {
            self.events.push(event);
        }

        TickOutcome::Flipped { id: slot.id.clone(), from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: i64, cols: i64) -> Shape {
        Shape::new(rows, cols).unwrap()
    }

    #[test]
    fn selected_slot_is_never_toggled() {
        let mut state = GridState::new(shape(2, 2), Some(3));
        let selected = SlotId::new("A2");
        let before = state.find(&selected).unwrap().status;
        state.set_selected(Some(selected.clone()));

        let mut skipped = 0;
        for _ in 0..500 {
            if let TickOutcome::SkippedSelected { id } = state.tick(Utc::now()) {
                assert_eq!(id, selected);
                skipped += 1;
            }
        }

        assert!(skipped > 0);
        assert_eq!(state.find(&selected).unwrap().status, before);
    }

    #[test]
    fn ticks_never_touch_reserved_slots() {
        let mut state = GridState::new(shape(1, 3), Some(11));
        state.slots[1].status = SlotStatus::Reserved;

        for _ in 0..300 {
            match state.tick(Utc::now()) {
                TickOutcome::Flipped { from, to, .. } => {
                    assert_ne!(from, SlotStatus::Reserved);
                    assert_ne!(to, SlotStatus::Reserved);
                }
                TickOutcome::SkippedUnflippable { id, status } => {
                    assert_eq!(id.as_str(), "A2");
                    assert_eq!(status, SlotStatus::Reserved);
                }
                other => panic!("unexpected tick outcome {:?}", other),
            }
        }
        assert_eq!(state.slots()[1].status, SlotStatus::Reserved);
    }

    #[test]
    fn a_tick_changes_at_most_one_slot() {
        let mut state = GridState::new(shape(5, 5), Some(42));
        for _ in 0..50 {
            let before = state.slots().to_vec();
            state.tick(Utc::now());
            let changed = before.iter().zip(state.slots()).filter(|(a, b)| a != b).count();
            assert!(changed <= 1);
        }
    }

    #[test]
    fn flips_are_logged_as_events() {
        let mut state = GridState::new(shape(3, 3), Some(5));
        let mut flips = 0;
        for _ in 0..20 {
            if let TickOutcome::Flipped { .. } = state.tick(Utc::now()) {
                flips += 1;
            }
        }
        assert_eq!(state.events().len(), flips);
    }

    #[test]
    fn override_suspends_ticks_and_keeps_input_order() {
        let mut state = GridState::new(shape(5, 5), Some(8));
        let input = vec![
            Slot::new("10", "P1", SlotStatus::Available),
            Slot::new("11", "P2", SlotStatus::Occupied),
            Slot::new("12", "P3", SlotStatus::Available),
        ];
        state.set_override(input.clone());

        assert_eq!(state.mode(), GridMode::Override);
        for _ in 0..100 {
            assert_eq!(state.tick(Utc::now()), TickOutcome::Suspended);
        }
        assert_eq!(state.slots(), input.as_slice());
    }

    #[test]
    fn rebuild_bumps_generation_and_drops_stale_selection() {
        let mut state = GridState::new(shape(2, 2), Some(1));
        let first = state.generation();
        state.set_selected(Some(SlotId::new("B2")));

        state.set_shape(shape(3, 3));
        assert!(state.generation() > first);
        assert_eq!(state.selected(), Some(&SlotId::new("B2")));

        state.set_shape(shape(1, 1));
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn clearing_override_resumes_synthesis_with_current_shape() {
        let mut state = GridState::new(shape(2, 3), Some(2));
        state.set_override(vec![Slot::new("x", "X1", SlotStatus::Reserved)]);
        state.clear_override();

        assert_eq!(state.mode(), GridMode::Synthetic);
        assert_eq!(state.slots().len(), 6);
    }

    #[test]
    fn empty_synthetic_grid_cannot_exist_but_empty_override_ticks_quietly() {
        let mut state = GridState::new(shape(1, 1), Some(0));
        state.set_override(Vec::new());
        assert!(state.slots().is_empty());
        assert_eq!(state.tick(Utc::now()), TickOutcome::Suspended);
    }
}
