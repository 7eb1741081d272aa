//! The wire-level call request and result records.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::marshal::MarshaledArgs;

/// The request record handed to a transport, constructed fresh per
/// invocation and never retained or mutated by the client afterwards.
///
/// The serialized field names are a compatibility surface with existing
/// deployments and must not change: `Fn`, `Args`, `ArgsType`, `Reply`,
/// `Expired`, `Cid`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallEnvelope {
    /// Target procedure name.
    #[serde(rename = "Fn")]
    pub function: String,
    /// Marshaled arguments, index-aligned with `args_type`.
    #[serde(rename = "Args")]
    pub args: Vec<serde_json::Value>,
    /// Type tags for `args`. `None` when the call has no arguments,
    /// serialized as an absent field rather than an empty list.
    #[serde(rename = "ArgsType", skip_serializing_if = "Option::is_none", default)]
    pub args_type: Option<Vec<String>>,
    /// True when the caller awaits a result.
    #[serde(rename = "Reply")]
    pub reply: bool,
    /// Advisory absolute deadline, milliseconds since the Unix epoch (UTC).
    /// This layer only stamps it; whoever executes the call must reject it
    /// once past expiry. Assumes closely synchronized clocks on both sides.
    #[serde(rename = "Expired")]
    pub expired: i64,
    /// Correlation id used by transports to match the response to the
    /// waiting caller.
    #[serde(rename = "Cid")]
    pub cid: String,
}

impl CallEnvelope {
    pub(crate) fn request(
        function: String,
        marshaled: MarshaledArgs,
        reply: bool,
        ttl: Duration,
        cid: String,
    ) -> Self {
        Self {
            function,
            args: marshaled.args,
            args_type: marshaled.args_type,
            reply,
            expired: expiry_millis(ttl),
            cid,
        }
    }
}

fn expiry_millis(ttl: Duration) -> i64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now + ttl).as_millis() as i64
}

/// The value/error pair delivered for a `Reply=true` call, exactly once per
/// invocation over its private one-shot channel.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallResult {
    /// Correlation id of the call this result answers.
    #[serde(rename = "Cid")]
    pub cid: String,
    /// Plain descriptive error text; empty on success.
    #[serde(rename = "Error")]
    pub error: String,
    #[serde(rename = "Result")]
    pub result: serde_json::Value,
}

impl CallResult {
    pub fn ok(cid: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            cid: cid.into(),
            error: String::new(),
            result,
        }
    }

    pub fn err(cid: impl Into<String>, error: impl ToString) -> Self {
        Self {
            cid: cid.into(),
            error: error.to_string(),
            result: serde_json::Value::Null,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }
}
