//! Converts an ordered argument list into the parallel tag and wire-value
//! sequences carried by a [CallEnvelope](crate::CallEnvelope).

use crate::arg::{Arg, Kind};

/// Marshaled form of an argument list.
///
/// `args_type` is `None` exactly when the argument list was empty. Downstream
/// consumers rely on the distinction between "no arguments" and "arguments
/// present", so an empty list is never collapsed into `Some(vec![])`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarshaledArgs {
    pub args: Vec<serde_json::Value>,
    pub args_type: Option<Vec<String>>,
}

/// Error marshaling a single argument. Surfaces before any transport
/// interaction; no partial envelope is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarshalError {
    /// The wire format is text-safe JSON, which has no representation for
    /// NaN or infinite floats.
    #[error("args[{index}] [{kind}] types not allowed: non-finite number")]
    NonFiniteNumber { index: usize, kind: Kind },
}

/// Marshal `params` into wire-safe values and index-aligned tags.
///
/// Bytes are re-encoded as URL-safe base64 text; everything else maps to the
/// corresponding JSON value. A value at index `i` that cannot be represented
/// aborts the whole call with an error naming `i` and its kind.
pub fn marshal(params: &[Arg]) -> Result<MarshaledArgs, MarshalError> {
    if params.is_empty() {
        return Ok(MarshaledArgs {
            args: Vec::new(),
            args_type: None,
        });
    }

    let mut args = Vec::with_capacity(params.len());
    let mut args_type = Vec::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        let value = match param {
            Arg::String(value) => serde_json::Value::String(value.clone()),
            Arg::Bool(value) => serde_json::Value::Bool(*value),
            Arg::Int(value) => serde_json::Value::from(*value),
            Arg::Long(value) => serde_json::Value::from(*value),
            Arg::Float(value) => finite_number(index, Kind::Float, f64::from(*value))?,
            Arg::Double(value) => finite_number(index, Kind::Double, *value)?,
            Arg::Bytes(value) => {
                serde_json::Value::String(base64::encode_config(value, base64::URL_SAFE))
            }
            Arg::Map(value) => serde_json::Value::Object(value.clone()),
        };
        args.push(value);
        args_type.push(param.kind().tag().to_string());
    }

    Ok(MarshaledArgs {
        args,
        args_type: Some(args_type),
    })
}

fn finite_number(index: usize, kind: Kind, value: f64) -> Result<serde_json::Value, MarshalError> {
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .ok_or(MarshalError::NonFiniteNumber { index, kind })
}
