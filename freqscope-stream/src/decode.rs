//! Validation of inbound spectrum messages.
//!
//! Wire format: `{"frequencies": [number, ...], "magnitudes": [number, ...]}`.
//! Extra fields are ignored. A `null` field counts as missing.

use freqscope_messages::Snapshot;
use serde_json::{Map, Value};

use crate::error::{MessageError, SchemaError};

pub const FREQUENCIES: &str = "frequencies";
pub const MAGNITUDES: &str = "magnitudes";

/// Decode one message payload into a snapshot.
pub fn decode_message(payload: &[u8]) -> Result<Snapshot, MessageError> {
    let value: Value = serde_json::from_slice(payload)?;
    let Value::Object(mut fields) = value else {
        return Err(SchemaError::NotAnObject.into());
    };

    let frequencies = take_series(&mut fields, FREQUENCIES)?;
    let magnitudes = take_series(&mut fields, MAGNITUDES)?;

    let snapshot = Snapshot::new(frequencies, magnitudes).map_err(SchemaError::from)?;
    Ok(snapshot)
}

fn take_series(fields: &mut Map<String, Value>, name: &'static str) -> Result<Vec<f64>, SchemaError> {
    match fields.remove(name) {
        None | Some(Value::Null) => Err(SchemaError::MissingField(name)),
        Some(value) => serde_json::from_value(value).map_err(|e| SchemaError::InvalidField {
            field: name,
            reason: e.to_string(),
        }),
    }
}
