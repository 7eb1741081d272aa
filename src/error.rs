pub use crate::marshal::MarshalError;

/// Immediate dispatch failure: the envelope never successfully left this
/// process boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// Neither a local nor a remote transport is attached.
    #[error("rpc service connection failed")]
    NotConnected,
    /// The selected transport has been shut down.
    #[error("rpc transport closed")]
    TransportClosed,
    /// The transport rejected the send with its own message.
    #[error("{0}")]
    Rejected(String),
}

/// Terminal failure of a [call](crate::Client::call) or
/// [call_nr](crate::Client::call_nr) invocation.
///
/// A replying call observes exactly one of: a delivered
/// [CallResult](crate::CallResult), a dispatch error, or a closed-channel
/// error. Fire-and-forget calls only ever surface the first two; execution
/// outcomes never reach them. No retries happen at this layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    /// An argument could not be marshaled. Surfaces before any transport
    /// interaction, even when no transport is attached.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The result channel was closed without a value, e.g. because the
    /// transport was torn down mid-flight.
    #[error("client closed")]
    ClientClosed,
}
