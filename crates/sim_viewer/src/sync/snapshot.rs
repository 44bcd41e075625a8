//! Wire types exchanged with the simulation service
//!
//! Snapshot records are decoded one at a time so a single malformed record
//! only drops itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::math::Vec3;
use crate::scene::EntityId;

/// One decoded entity record
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Remote identity
    pub id: EntityId,
    /// World position
    pub position: Vec3,
    /// Optional boolean state (signals)
    pub state: Option<bool>,
}

impl EntityRecord {
    /// Build a record without state
    pub fn new(id: impl Into<String>, x: f32, y: f32, z: f32) -> Self {
        Self {
            id: EntityId::new(id),
            position: Vec3::new(x, y, z),
            state: None,
        }
    }

    /// Builder pattern: Set state
    pub fn with_state(mut self, state: bool) -> Self {
        self.state = Some(state);
        self
    }
}

/// Body of every per-category fetch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotResponse {
    /// Undecoded records
    #[serde(default)]
    pub positions: Vec<Value>,
}

/// Errors for a single snapshot record
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    /// Missing or mistyped fields
    #[error("Malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A coordinate that is NaN or infinite
    #[error("Record {id} has a non-finite position")]
    NonFinite {
        /// Offending record id
        id: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    id: RawId,
    x: f32,
    y: f32,
    z: f32,
    #[serde(default)]
    state: Option<Value>,
}

/// Truthiness of a loosely typed state value
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode one record
pub fn decode_record(value: Value) -> Result<EntityRecord, RecordError> {
    let raw: RawRecord = serde_json::from_value(value)?;
    let id = raw.id.into_string();
    if !(raw.x.is_finite() && raw.y.is_finite() && raw.z.is_finite()) {
        return Err(RecordError::NonFinite { id });
    }
    Ok(EntityRecord {
        id: EntityId::new(id),
        position: Vec3::new(raw.x, raw.y, raw.z),
        state: raw.state.as_ref().map(truthy),
    })
}

/// Decode every record, splitting the good ones from the failures
pub fn decode_records(values: Vec<Value>) -> (Vec<EntityRecord>, Vec<RecordError>) {
    let mut records = Vec::with_capacity(values.len());
    let mut errors = Vec::new();
    for value in values {
        match decode_record(value) {
            Ok(record) => records.push(record),
            Err(e) => errors.push(e),
        }
    }
    (records, errors)
}

/// Body of the initialize request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitRequest {
    /// Number of agents to spawn
    #[serde(rename = "NAgents")]
    pub agent_count: u32,
    /// Requested width of the area
    pub width: f32,
    /// Requested height (depth) of the area
    pub height: f32,
}

/// Area actually chosen by the service
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InitResponse {
    /// Width of the area
    pub width: f32,
    /// Height (depth) of the area
    pub height: f32,
}

/// Result of stepping the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AdvanceResponse {
    /// Vehicles that reached their destination so far
    pub total_arrived: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_string_and_numeric_ids() {
        let body: SnapshotResponse = serde_json::from_value(json!({
            "positions": [
                {"id": "a1", "x": 1.0, "y": 0.0, "z": 2.0},
                {"id": 7, "x": 3, "y": 0, "z": 4}
            ]
        }))
        .expect("valid body");

        let (records, errors) = decode_records(body.positions);
        assert!(errors.is_empty());
        assert_eq!(records[0], EntityRecord::new("a1", 1.0, 0.0, 2.0));
        assert_eq!(records[1], EntityRecord::new("7", 3.0, 0.0, 4.0));
    }

    #[test]
    fn test_bad_record_does_not_poison_batch() {
        let (records, errors) = decode_records(vec![
            json!({"id": "ok", "x": 0.0, "y": 0.0, "z": 0.0}),
            json!({"id": "missing_z", "x": 0.0, "y": 0.0}),
            json!({"x": 1.0, "y": 1.0, "z": 1.0}),
            json!({"id": "also_ok", "x": 1.0, "y": 0.0, "z": 1.0}),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, RecordError::Malformed(_))));
    }

    #[test]
    fn test_state_truthiness() {
        let cases = [
            (json!(true), Some(true)),
            (json!(false), Some(false)),
            (json!(1), Some(true)),
            (json!(0), Some(false)),
            (json!("green"), Some(true)),
            (json!(""), Some(false)),
            (json!(null), None),
        ];
        for (state, expected) in cases {
            let record = decode_record(json!({"id": "s", "x": 0, "y": 0, "z": 0, "state": state}))
                .expect("valid record");
            assert_eq!(record.state, expected);
        }
    }

    #[test]
    fn test_missing_positions_is_empty_snapshot() {
        let body: SnapshotResponse = serde_json::from_str("{}").expect("valid body");
        assert!(body.positions.is_empty());
    }

    #[test]
    fn test_init_request_uses_service_field_names() {
        let request = InitRequest { agent_count: 10, width: 20.0, height: 30.0 };
        let body = serde_json::to_value(&request).expect("serializable");
        assert_eq!(body, json!({"NAgents": 10, "width": 20.0, "height": 30.0}));
    }
}
