//! Scriptable transports for exercising the client without a broker.

use std::sync::Mutex;

use crate::envelope::{CallEnvelope, CallResult};
use crate::error::DispatchError;
use crate::transport::{ResultSender, Transport};

type Handler = Box<dyn Fn(&CallEnvelope) -> CallResult + Send + Sync>;

enum StubBehavior {
    /// Resolve the result channel with the handler's output.
    Respond(Handler),
    /// Reject dispatch outright with this message.
    Reject(String),
    /// Accept the envelope, then drop the result sender without a value.
    DropReply,
}

/// Transport stub that records every accepted envelope and follows a
/// scripted behavior for replies.
pub struct StubTransport {
    behavior: StubBehavior,
    calls: Mutex<Vec<CallEnvelope>>,
}

impl StubTransport {
    /// Stub that answers every replying call through `handler`.
    pub fn respond(
        handler: impl Fn(&CallEnvelope) -> CallResult + Send + Sync + 'static,
    ) -> Self {
        Self::new(StubBehavior::Respond(Box::new(handler)))
    }

    /// Stub that echoes the first argument back as the result.
    pub fn echo() -> Self {
        Self::respond(|envelope| {
            let result = envelope
                .args
                .first()
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            CallResult::ok(envelope.cid.clone(), result)
        })
    }

    /// Stub whose dispatch fails immediately with `message`. Nothing is
    /// recorded and the result channel is never touched.
    pub fn reject(message: impl Into<String>) -> Self {
        Self::new(StubBehavior::Reject(message.into()))
    }

    /// Stub that accepts envelopes but closes the result channel without
    /// delivering a value.
    pub fn drop_reply() -> Self {
        Self::new(StubBehavior::DropReply)
    }

    fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Envelopes accepted so far, in dispatch order.
    pub fn calls(&self) -> Vec<CallEnvelope> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for StubTransport {
    async fn call(
        &self,
        envelope: CallEnvelope,
        reply: ResultSender,
    ) -> Result<(), DispatchError> {
        match &self.behavior {
            StubBehavior::Reject(message) => Err(DispatchError::Rejected(message.clone())),
            StubBehavior::Respond(handler) => {
                let result = handler(&envelope);
                self.calls.lock().unwrap().push(envelope);
                let _ = reply.send(result);
                Ok(())
            }
            StubBehavior::DropReply => {
                self.calls.lock().unwrap().push(envelope);
                drop(reply);
                Ok(())
            }
        }
    }

    async fn call_nr(&self, envelope: CallEnvelope) -> Result<(), DispatchError> {
        match &self.behavior {
            StubBehavior::Reject(message) => Err(DispatchError::Rejected(message.clone())),
            _ => {
                self.calls.lock().unwrap().push(envelope);
                Ok(())
            }
        }
    }

    async fn done(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Transport whose shutdown fails with a fixed message; exercises the
/// last-error-wins aggregation of [Client::done](crate::Client::done).
pub struct FailingShutdown(pub &'static str);

#[async_trait::async_trait]
impl Transport for FailingShutdown {
    async fn call(
        &self,
        _envelope: CallEnvelope,
        _reply: ResultSender,
    ) -> Result<(), DispatchError> {
        Err(DispatchError::TransportClosed)
    }

    async fn call_nr(&self, _envelope: CallEnvelope) -> Result<(), DispatchError> {
        Err(DispatchError::TransportClosed)
    }

    async fn done(&self) -> anyhow::Result<()> {
        Err(anyhow::anyhow!(self.0))
    }
}
