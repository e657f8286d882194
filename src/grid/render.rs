use serde::Serialize;
use super::types::{DisplayStatus, Slot, SlotId, SlotStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotIcon {
    /// Pulsing dot on a free slot
    Pulse,
    Car,
}

/// Color and icon for a display status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStyle {
    pub color: &'static str,
    pub icon: SlotIcon,
}

impl DisplayStatus {
    pub fn style(self) -> SlotStyle {
        match self {
            DisplayStatus::Available => SlotStyle { color: "green", icon: SlotIcon::Pulse },
            DisplayStatus::Occupied => SlotStyle { color: "red", icon: SlotIcon::Car },
            DisplayStatus::Reserved => SlotStyle { color: "amber", icon: SlotIcon::Car },
            DisplayStatus::Selected => SlotStyle { color: "cyan", icon: SlotIcon::Car },
        }
    }
}

/// One rendered cell of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotVisual {
    pub id: SlotId,
    pub number: String,
    pub row: u32,
    pub col: u32,
    pub status: DisplayStatus,
    pub style: SlotStyle,
    pub interactive: bool,
}

/// Rendered grid, cells in the same order as the input slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub rows: u32,
    pub cols: u32,
    pub selectable: bool,
    pub cells: Vec<SlotVisual>,
}

impl GridView {
    /// Cells grouped by layout row
    pub fn rows_iter(&self) -> impl Iterator<Item = &[SlotVisual]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }
}

/// Occupancy counts by stored status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GridSummary {
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
    pub reserved: usize,
}

impl GridSummary {
    pub fn of(slots: &[Slot]) -> Self {
        let mut summary = GridSummary { total: slots.len(), ..Default::default() };
        for slot in slots {
            match slot.status {
                SlotStatus::Available => summary.available += 1,
                SlotStatus::Occupied => summary.occupied += 1,
                SlotStatus::Reserved => summary.reserved += 1,
            }
        }
        summary
    }
}

/// Status to show for `slot` given the current selection
pub fn display_status(slot: &Slot, selected: Option<&SlotId>) -> DisplayStatus {
    if selected == Some(&slot.id) {
        DisplayStatus::Selected
    } else {
        slot.status.into()
    }
}

/// Maps slots to a `cols`-wide, row-major display grid. `cols` of zero is
/// treated as one column.
pub fn render(slots: &[Slot], selected: Option<&SlotId>, selectable: bool, cols: u32) -> GridView {
    let cols = cols.max(1);
    let cells = slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let status = display_status(slot, selected);
            SlotVisual {
                id: slot.id.clone(),
                number: slot.number.clone(),
                row: index as u32 / cols,
                col: index as u32 % cols,
                status,
                style: status.style(),
                interactive: on_slot_activate(slot, selectable).is_some(),
            }
        })
        .collect::<Vec<_>>();

    GridView {
        rows: (cells.len() as u32).div_ceil(cols),
        cols,
        selectable,
        cells,
    }
}

/// Selection event for a click on `slot`. Gated on the stored status, so a
/// selected-but-occupied slot still cannot be picked.
pub fn on_slot_activate(slot: &Slot, selectable: bool) -> Option<SlotId> {
    if !selectable || slot.status == SlotStatus::Occupied {
        return None;
    }
    Some(slot.id.clone())
}
