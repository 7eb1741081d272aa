//! The seam between the client façade and the call delivery mechanisms.

use std::sync::Arc;

use futures::channel::oneshot;

use crate::envelope::{CallEnvelope, CallResult};
use crate::error::DispatchError;

pub mod local;

/// Sending half of the one-shot result channel owned by a single replying
/// call. A transport must eventually deliver exactly one value on it or drop
/// it without one; it is never reused.
pub type ResultSender = oneshot::Sender<CallResult>;

/// Capability interface every delivery mechanism satisfies, local or
/// broker-backed alike.
///
/// An `Err` from [Transport::call] or [Transport::call_nr] means the
/// envelope never left this process boundary. Everything later is reported
/// through the result channel, or not at all for fire-and-forget calls.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Deliver an envelope whose caller awaits a result on `reply`.
    async fn call(
        &self,
        envelope: CallEnvelope,
        reply: ResultSender,
    ) -> Result<(), DispatchError>;

    /// Deliver a fire-and-forget envelope, best effort, at most once.
    async fn call_nr(&self, envelope: CallEnvelope) -> Result<(), DispatchError>;

    /// Release transport resources. Safe to call once per transport lifetime.
    async fn done(&self) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(
        &self,
        envelope: CallEnvelope,
        reply: ResultSender,
    ) -> Result<(), DispatchError> {
        (**self).call(envelope, reply).await
    }

    async fn call_nr(&self, envelope: CallEnvelope) -> Result<(), DispatchError> {
        (**self).call_nr(envelope).await
    }

    async fn done(&self) -> anyhow::Result<()> {
        (**self).done().await
    }
}
