//! Call arguments and the closed type-tag vocabulary.

use std::collections::HashMap;
use std::convert::TryFrom;

/// Wire tag for [Kind::String].
pub const STRING: &str = "string";
/// Wire tag for [Kind::Bool].
pub const BOOL: &str = "bool";
/// Wire tag for [Kind::Int].
pub const INT: &str = "int";
/// Wire tag for [Kind::Long].
pub const LONG: &str = "long";
/// Wire tag for [Kind::Float].
pub const FLOAT: &str = "float";
/// Wire tag for [Kind::Double].
pub const DOUBLE: &str = "double";
/// Wire tag for [Kind::Bytes].
pub const BYTES: &str = "bytes";
/// Wire tag for [Kind::Map].
pub const MAP: &str = "map";

/// The kind of a call argument. The vocabulary is closed: these eight tags
/// are the only ones that ever appear in an envelope's `ArgsType` sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Bool,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    Map,
}

impl Kind {
    /// The tag string carried on the wire for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Kind::String => STRING,
            Kind::Bool => BOOL,
            Kind::Int => INT,
            Kind::Long => LONG,
            Kind::Float => FLOAT,
            Kind::Double => DOUBLE,
            Kind::Bytes => BYTES,
            Kind::Map => MAP,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single call argument.
///
/// The variant set covers exactly the kinds the envelope protocol can carry.
/// Values of other types must be converted at the call site, which turns
/// unsupported kinds into a construction-time concern instead of a runtime
/// type-discovery failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    String(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Raw bytes; re-encoded as URL-safe base64 during marshaling because
    /// the wire format is text-safe. Decoding is the server's job.
    Bytes(Vec<u8>),
    /// String-keyed mapping, uniformly typed or heterogeneous.
    Map(serde_json::Map<String, serde_json::Value>),
}

impl Arg {
    pub fn kind(&self) -> Kind {
        match self {
            Arg::String(_) => Kind::String,
            Arg::Bool(_) => Kind::Bool,
            Arg::Int(_) => Kind::Int,
            Arg::Long(_) => Kind::Long,
            Arg::Float(_) => Kind::Float,
            Arg::Double(_) => Kind::Double,
            Arg::Bytes(_) => Kind::Bytes,
            Arg::Map(_) => Kind::Map,
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::String(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::String(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Long(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Double(value)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(value: Vec<u8>) -> Self {
        Arg::Bytes(value)
    }
}

impl From<&[u8]> for Arg {
    fn from(value: &[u8]) -> Self {
        Arg::Bytes(value.to_vec())
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Arg {
    fn from(value: serde_json::Map<String, serde_json::Value>) -> Self {
        Arg::Map(value)
    }
}

impl From<HashMap<String, String>> for Arg {
    fn from(value: HashMap<String, String>) -> Self {
        Arg::Map(
            value
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect(),
        )
    }
}

impl From<HashMap<String, serde_json::Value>> for Arg {
    fn from(value: HashMap<String, serde_json::Value>) -> Self {
        Arg::Map(value.into_iter().collect())
    }
}

/// Error converting a dynamic JSON value into an [Arg]: the value's kind is
/// outside the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{kind}] types not allowed")]
pub struct UnsupportedKind {
    pub kind: &'static str,
}

impl TryFrom<serde_json::Value> for Arg {
    type Error = UnsupportedKind;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;
        match value {
            Value::String(string) => Ok(Arg::String(string)),
            Value::Bool(bool_) => Ok(Arg::Bool(bool_)),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    if int >= i64::from(i32::MIN) && int <= i64::from(i32::MAX) {
                        Ok(Arg::Int(int as i32))
                    } else {
                        Ok(Arg::Long(int))
                    }
                } else if number.is_u64() {
                    // u64 values above i64::MAX have no signed wire tag.
                    // `as_f64` would accept them, but only lossily.
                    Err(UnsupportedKind { kind: "number" })
                } else if let Some(float) = number.as_f64() {
                    Ok(Arg::Double(float))
                } else {
                    Err(UnsupportedKind { kind: "number" })
                }
            }
            Value::Object(map) => Ok(Arg::Map(map)),
            Value::Null => Err(UnsupportedKind { kind: "null" }),
            Value::Array(_) => Err(UnsupportedKind { kind: "array" }),
        }
    }
}

/// Build a `Vec<Arg>` from values convertible with [From].
///
/// ```rust
/// # use mqrpc::{args, Arg};
/// let params = args!["hello", 1i32, vec![0x01u8, 0x02]];
/// assert_eq!(params.len(), 3);
/// assert_eq!(params[0], Arg::String("hello".to_string()));
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Arg>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Arg::from($value)),+]
    };
}
