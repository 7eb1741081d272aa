//! The client façade: transport selection and the synchronous call contract.

use std::sync::Arc;
use std::time::Duration;

use futures::channel::oneshot;

use crate::arg::Arg;
use crate::cid::{CidAllocator, RandomCid};
use crate::envelope::{CallEnvelope, CallResult};
use crate::error::{CallError, DispatchError};
use crate::marshal::marshal;
use crate::transport::local::{LocalServerHandle, LocalTransport};
use crate::transport::Transport;

/// Default advisory TTL stamped into envelopes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// Transport priority classes, cheapest first. Dispatch always goes to the
/// attached transport with the lowest kind, so a co-located service never
/// pays the broker round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransportKind {
    /// Same-process delivery, no serialization.
    Local,
    /// Delivery through an external broker.
    Remote,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// TTL added to `now` for the envelope's `Expired` stamp.
    pub ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

/// Dispatches calls to named remote procedures over at most one transport
/// per [TransportKind].
///
/// The façade holds no per-call mutable state: every replying call owns a
/// private one-shot result channel, so in-flight calls never block or
/// unblock each other and the hot path needs no locking here.
pub struct Client {
    transports: Vec<(TransportKind, Arc<dyn Transport>)>,
    cid: Arc<dyn CidAllocator>,
    ttl: Duration,
}

impl Client {
    pub fn new() -> Self {
        Self::with_parts(Arc::new(RandomCid), ClientConfig::default())
    }

    /// Build a client with an injected correlation-id allocator, e.g. a
    /// deterministic one in tests.
    pub fn with_parts(cid: Arc<dyn CidAllocator>, config: ClientConfig) -> Self {
        Self {
            transports: Vec::new(),
            cid,
            ttl: config.ttl,
        }
    }

    /// Bind the in-process transport to a server-side handle. A no-op if a
    /// local transport is already attached.
    pub fn attach_local(&mut self, server: &LocalServerHandle) {
        self.attach(TransportKind::Local, LocalTransport::new(server));
    }

    /// Attach the broker-backed transport. A no-op if a remote transport is
    /// already attached.
    pub fn attach_remote(&mut self, transport: impl Transport + 'static) {
        self.attach(TransportKind::Remote, transport);
    }

    /// Attach a transport under a priority class. Each kind is established
    /// exactly once; attaching a kind that is already present is a silent
    /// no-op.
    pub fn attach(&mut self, kind: TransportKind, transport: impl Transport + 'static) {
        if self.transports.iter().any(|(present, _)| *present == kind) {
            return;
        }
        self.transports.push((kind, Arc::new(transport)));
        self.transports.sort_by_key(|(kind, _)| *kind);
    }

    fn select(&self) -> Result<&Arc<dyn Transport>, DispatchError> {
        self.transports
            .first()
            .map(|(_, transport)| transport)
            .ok_or(DispatchError::NotConnected)
    }

    /// Invoke `function` and await its result.
    ///
    /// Arguments are marshaled before transport availability is checked, so
    /// a call with a bad argument fails even when no transport is attached.
    /// With no transport, the call fails before a result channel or
    /// correlation id exists. After a successful handoff the call suspends
    /// exactly once, on the result channel.
    pub async fn call(
        &self,
        function: impl Into<String>,
        params: Vec<Arg>,
    ) -> Result<CallResult, CallError> {
        let marshaled = marshal(&params)?;
        let transport = self.select()?;
        let envelope = CallEnvelope::request(
            function.into(),
            marshaled,
            true,
            self.ttl,
            self.cid.allocate(),
        );
        tracing::trace!(cid = %envelope.cid, function = %envelope.function, "dispatching call");
        let (sender, receiver) = oneshot::channel();
        transport.call(envelope, sender).await?;
        match receiver.await {
            Ok(result) => Ok(result),
            Err(oneshot::Canceled) => Err(CallError::ClientClosed),
        }
    }

    /// Invoke `function` fire-and-forget.
    ///
    /// No result channel is created and nothing blocks beyond the
    /// transport's immediate dispatch check; execution outcomes are never
    /// observed by the caller.
    pub async fn call_nr(
        &self,
        function: impl Into<String>,
        params: Vec<Arg>,
    ) -> Result<(), CallError> {
        let marshaled = marshal(&params)?;
        let transport = self.select()?;
        let envelope = CallEnvelope::request(
            function.into(),
            marshaled,
            false,
            self.ttl,
            self.cid.allocate(),
        );
        tracing::trace!(cid = %envelope.cid, function = %envelope.function, "dispatching fire-and-forget call");
        transport.call_nr(envelope).await?;
        Ok(())
    }

    /// Shut down every attached transport, even if an earlier one fails.
    ///
    /// Only the last error is returned; earlier ones are logged and dropped
    /// (a known limitation of the existing contract, kept as is). The
    /// transport list is drained, so calling this again succeeds trivially
    /// and later calls fail with the connection-failure error.
    pub async fn done(&mut self) -> anyhow::Result<()> {
        let mut last_error = None;
        for (kind, transport) in self.transports.drain(..) {
            if let Err(error) = transport.done().await {
                tracing::error!(?kind, %error, "transport shutdown failed");
                last_error = Some(error);
            }
        }
        match last_error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field(
                "transports",
                &self
                    .transports
                    .iter()
                    .map(|(kind, _)| *kind)
                    .collect::<Vec<_>>(),
            )
            .field("ttl", &self.ttl)
            .finish()
    }
}
