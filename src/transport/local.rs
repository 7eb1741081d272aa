//! In-process transport bound directly to a server-side handle.
//!
//! Envelopes cross the boundary by value, so same-process calls skip
//! serialization entirely. No correlation registry is needed on this path:
//! the result sender travels with the request and the server resolves it
//! directly.

use futures::channel::mpsc;

use super::{ResultSender, Transport};
use crate::envelope::CallEnvelope;
use crate::error::DispatchError;

/// A call handed to the in-process server loop.
#[derive(Debug)]
pub struct LocalCall {
    pub envelope: CallEnvelope,
    /// `Some` for `Reply=true` calls; the server resolves it exactly once.
    pub reply: Option<ResultSender>,
}

/// Handle published by the server-side collaborator. The client binds a
/// [LocalTransport] to it; the server consumes the receiving half.
#[derive(Debug, Clone)]
pub struct LocalServerHandle {
    sender: mpsc::UnboundedSender<LocalCall>,
}

impl LocalServerHandle {
    /// Create a handle together with the stream of calls the server loop
    /// must consume.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LocalCall>) {
        let (sender, receiver) = mpsc::unbounded();
        (Self { sender }, receiver)
    }
}

/// Client-side endpoint of the in-process transport.
#[derive(Debug)]
pub struct LocalTransport {
    sender: mpsc::UnboundedSender<LocalCall>,
}

impl LocalTransport {
    pub fn new(server: &LocalServerHandle) -> Self {
        Self {
            sender: server.sender.clone(),
        }
    }

    fn deliver(&self, call: LocalCall) -> Result<(), DispatchError> {
        self.sender
            .unbounded_send(call)
            .map_err(|_| DispatchError::TransportClosed)
    }
}

#[async_trait::async_trait]
impl Transport for LocalTransport {
    async fn call(
        &self,
        envelope: CallEnvelope,
        reply: ResultSender,
    ) -> Result<(), DispatchError> {
        self.deliver(LocalCall {
            envelope,
            reply: Some(reply),
        })
    }

    async fn call_nr(&self, envelope: CallEnvelope) -> Result<(), DispatchError> {
        self.deliver(LocalCall {
            envelope,
            reply: None,
        })
    }

    async fn done(&self) -> anyhow::Result<()> {
        self.sender.close_channel();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::envelope::CallResult;
    use futures::channel::oneshot;
    use futures::prelude::*;

    fn envelope(function: &str, reply: bool) -> CallEnvelope {
        CallEnvelope {
            function: function.to_string(),
            args: Vec::new(),
            args_type: None,
            reply,
            expired: 0,
            cid: "cid-1".to_string(),
        }
    }

    #[async_std::test]
    async fn call_hands_envelope_and_sender_to_the_server() {
        let (handle, mut calls) = LocalServerHandle::channel();
        let transport = LocalTransport::new(&handle);

        let (sender, receiver) = oneshot::channel();
        transport.call(envelope("Echo", true), sender).await.unwrap();

        let call = calls.next().await.unwrap();
        assert_eq!(call.envelope.function, "Echo");
        let reply = call.reply.unwrap();
        reply
            .send(CallResult::ok("cid-1", serde_json::json!("pong")))
            .unwrap();
        assert_eq!(receiver.await.unwrap().result, serde_json::json!("pong"));
    }

    #[async_std::test]
    async fn call_nr_carries_no_reply_sender() {
        let (handle, mut calls) = LocalServerHandle::channel();
        let transport = LocalTransport::new(&handle);

        transport.call_nr(envelope("Notify", false)).await.unwrap();
        let call = calls.next().await.unwrap();
        assert!(call.reply.is_none());
    }

    #[async_std::test]
    async fn dispatch_after_done_fails() {
        let (handle, _calls) = LocalServerHandle::channel();
        let transport = LocalTransport::new(&handle);

        transport.done().await.unwrap();
        let (sender, _receiver) = oneshot::channel();
        let error = transport
            .call(envelope("Echo", true), sender)
            .await
            .unwrap_err();
        assert_eq!(error, DispatchError::TransportClosed);
    }
}
