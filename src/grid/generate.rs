use std::collections::HashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use crate::error::GridError;
use super::types::{Slot, SlotStatus};

pub const MAX_ROWS: u32 = 26;
pub const MAX_COLS: u32 = 100;

/// Initial status draw table. Available comes up 3 times in 5.
pub const INITIAL_STATUS_DRAWS: [SlotStatus; 5] = [
    SlotStatus::Available,
    SlotStatus::Occupied,
    SlotStatus::Available,
    SlotStatus::Occupied,
    SlotStatus::Available,
];

/// Validated grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: u32,
    cols: u32,
}

impl Shape {
    /// Row labels are single letters, so at most 26 rows
    pub fn new(rows: i64, cols: i64) -> Result<Self, GridError> {
        let in_range = (1..=MAX_ROWS as i64).contains(&rows) && (1..=MAX_COLS as i64).contains(&cols);
        if !in_range {
            return Err(GridError::InvalidShape { rows, cols });
        }
        Ok(Shape { rows: rows as u32, cols: cols as u32 })
    }

    /// Clamps each side into range. Used where the shape only drives layout.
    pub fn clamped(rows: i64, cols: i64) -> Self {
        Shape {
            rows: rows.clamp(1, MAX_ROWS as i64) as u32,
            cols: cols.clamp(1, MAX_COLS as i64) as u32,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape { rows: 5, cols: 5 }
    }
}

/// Label for a zero-based position: row letter followed by 1-based column
/// (0,0) -> "A1", (1,2) -> "B3". `None` past row `Z`.
pub fn slot_number(row: u32, col: u32) -> Option<String> {
    if row >= MAX_ROWS {
        return None;
    }
    let letter = char::from(b'A' + row as u8);
    Some(format!("{}{}", letter, col + 1))
}

/// Builds `rows x cols` slots in row-major order with random initial statuses
pub fn synthesize<R: Rng + ?Sized>(shape: Shape, rng: &mut R) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(shape.len());
    for row in 0..shape.rows() {
        for col in 0..shape.cols() {
            // rows are capped by Shape
            let Some(number) = slot_number(row, col) else { continue };
            let status = *INITIAL_STATUS_DRAWS
                .choose(rng)
                .unwrap_or(&SlotStatus::Available);
            slots.push(Slot::new(number.clone(), number, status));
        }
    }
    slots
}

/// Rejects override collections that would give ambiguous selection targets
pub fn check_unique_ids(slots: &[Slot]) -> Result<(), GridError> {
    let mut seen = HashSet::with_capacity(slots.len());
    for slot in slots {
        if !seen.insert(&slot.id) {
            return Err(GridError::DuplicateSlotId(slot.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn labels_follow_row_letter_and_column() {
        assert_eq!(slot_number(0, 0).as_deref(), Some("A1"));
        assert_eq!(slot_number(1, 2).as_deref(), Some("B3"));
        assert_eq!(slot_number(4, 4).as_deref(), Some("E5"));
        assert_eq!(slot_number(25, 99).as_deref(), Some("Z100"));
    }

    #[test]
    fn labels_stop_after_row_z() {
        assert_eq!(slot_number(26, 0), None);
        assert_eq!(slot_number(191, 0), None);
        assert_eq!(slot_number(u32::MAX, 0), None);
    }

    #[test]
    fn clamped_shape_stays_in_range() {
        assert_eq!(Shape::clamped(0, 3), Shape::new(1, 3).unwrap());
        assert_eq!(Shape::clamped(-4, 500), Shape::new(1, 100).unwrap());
        assert_eq!(Shape::clamped(40, 0), Shape::new(26, 1).unwrap());
    }

    #[test]
    fn synthesized_grid_has_unique_ids_equal_to_numbers() {
        let mut rng = StdRng::seed_from_u64(7);
        for (rows, cols) in [(1, 1), (5, 5), (3, 8), (26, 4)] {
            let shape = Shape::new(rows, cols).unwrap();
            let slots = synthesize(shape, &mut rng);

            assert_eq!(slots.len(), (rows * cols) as usize);
            assert!(check_unique_ids(&slots).is_ok());
            for slot in &slots {
                assert_eq!(slot.id.as_str(), slot.number);
            }
        }
    }

    #[test]
    fn synthesized_grid_is_row_major() {
        let mut rng = StdRng::seed_from_u64(1);
        let slots = synthesize(Shape::new(2, 3).unwrap(), &mut rng);
        let numbers: Vec<&str> = slots.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, ["A1", "A2", "A3", "B1", "B2", "B3"]);
    }

    #[test]
    fn synthesized_statuses_never_start_reserved() {
        let mut rng = StdRng::seed_from_u64(99);
        let slots = synthesize(Shape::new(26, 100).unwrap(), &mut rng);
        assert!(slots.iter().all(|s| s.status != SlotStatus::Reserved));
    }

    #[test]
    fn draw_table_favors_available() {
        let available = INITIAL_STATUS_DRAWS.iter().filter(|s| **s == SlotStatus::Available).count();
        let occupied = INITIAL_STATUS_DRAWS.iter().filter(|s| **s == SlotStatus::Occupied).count();
        assert!(available >= occupied);
    }

    #[test]
    fn shape_rejects_non_positive_and_oversized() {
        assert_eq!(Shape::new(0, 5), Err(GridError::InvalidShape { rows: 0, cols: 5 }));
        assert_eq!(Shape::new(5, -1), Err(GridError::InvalidShape { rows: 5, cols: -1 }));
        assert!(Shape::new(27, 1).is_err());
        assert!(Shape::new(1, 101).is_err());
        assert!(Shape::new(1, 1).is_ok());
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let slots = vec![
            Slot::new("1", "A1", SlotStatus::Available),
            Slot::new("2", "A2", SlotStatus::Occupied),
            Slot::new("1", "A3", SlotStatus::Available),
        ];
        assert_eq!(check_unique_ids(&slots), Err(GridError::DuplicateSlotId("1".into())));
    }
}
