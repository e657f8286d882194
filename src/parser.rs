use csv::Reader;
use serde::Deserialize;
use crate::error::GridError;
use crate::grid::{Slot, SlotStatus};

/// Slot as the backend reports it
#[derive(Debug, Clone, Deserialize)]
pub struct SlotRecord {
    pub id: RecordId,
    #[serde(alias = "number", alias = "slotNumber")]
    pub slot_number: String,
    #[serde(alias = "isOccupied")]
    pub is_occupied: bool,
}

/// Backend ids are database integers; uploaded layouts often use strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            RecordId::Int(id) => id.to_string(),
            RecordId::Text(id) => id.trim().to_string(),
        }
    }
}

impl SlotRecord {
    /// The backend only knows occupied or not, so records never come back reserved
    pub fn into_slot(self, index: usize) -> Result<Slot, GridError> {
        let id = self.id.into_string();
        let number = self.slot_number.trim().to_string();
        if id.is_empty() {
            return Err(GridError::MalformedRecord { index, reason: "empty id".to_string() });
        }
        if number.is_empty() {
            return Err(GridError::MalformedRecord { index, reason: "empty slot number".to_string() });
        }
        let status = if self.is_occupied { SlotStatus::Occupied } else { SlotStatus::Available };
        Ok(Slot::new(id, number, status))
    }
}

/// Converts backend records in order
pub fn slots_from_records(records: Vec<SlotRecord>) -> Result<Vec<Slot>, GridError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_slot(index))
        .collect()
}

/// Parses a JSON array of slot records. Each element is checked on its own so
/// errors point at the offending record.
pub fn parse_json_slots(body: &[u8]) -> Result<Vec<Slot>, GridError> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| GridError::MalformedPayload(format!("expected a JSON array of slots: {}", e)))?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: SlotRecord = serde_json::from_value(value)
                .map_err(|e| GridError::MalformedRecord { index, reason: e.to_string() })?;
            record.into_slot(index)
        })
        .collect()
}

/// Parses a boolean value from various string representations
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "occupied" => Some(true),
        "no" | "false" | "0" | "available" | "" => Some(false),
        _ => None,
    }
}

/// Parses a CSV slot layout with an `id`, `slot_number` (or `number`) and
/// `is_occupied` header. Column order does not matter.
pub fn parse_csv_slots(body: &[u8]) -> Result<Vec<Slot>, GridError> {
    let mut reader = Reader::from_reader(body);
    let headers = reader
        .headers()
        .map_err(|e| GridError::MalformedPayload(e.to_string()))?
        .clone();

    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
            .ok_or_else(|| GridError::MalformedPayload(format!("missing '{}' column", names[0])))
    };
    let id_col = column(&["id"])?;
    let number_col = column(&["slot_number", "number"])?;
    let occupied_col = column(&["is_occupied", "occupied"])?;

    let mut slots = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| GridError::MalformedRecord { index, reason: e.to_string() })?;

        let occupied_field = record.get(occupied_col).unwrap_or("");
        let is_occupied = parse_bool(occupied_field).ok_or_else(|| GridError::MalformedRecord {
            index,
            reason: format!("'{}' is not a valid occupancy flag", occupied_field),
        })?;

        let slot_record = SlotRecord {
            id: RecordId::Text(record.get(id_col).unwrap_or("").to_string()),
            slot_number: record.get(number_col).unwrap_or("").to_string(),
            is_occupied,
        };
        slots.push(slot_record.into_slot(index)?);
    }

    Ok(slots)
}
