//! Client-side dispatch layer for an envelope-based RPC framework.
//!
//! A [Client] invokes named remote procedures either through an in-process
//! ("local") transport or through an external broker-backed ("remote")
//! transport, always preferring the local path when both are attached.
//! Heterogeneous call arguments are marshaled into a typed, text-safe wire
//! representation, every call is stamped with a correlation id and an
//! advisory expiry, and asynchronous delivery is bridged back into a
//! synchronous call contract through a private one-shot result channel.
//!
//! The envelope field names (`Fn`, `Args`, `ArgsType`, `Reply`, `Expired`,
//! `Cid`) and the eight-entry type-tag vocabulary are a compatibility
//! surface with existing deployments and are preserved bit-for-bit.
//!
//! This layer does not retry failed calls, does not enforce expiry (it only
//! stamps it), and offers no per-call cancellation; the only termination
//! primitive is [Client::done], which is global to the client.

pub mod arg;
mod cid;
mod client;
mod envelope;
mod error;
mod marshal;
pub mod transport;

#[cfg(any(test, feature = "test-transport"))]
pub mod test_transport;

#[doc(inline)]
pub use arg::{Arg, Kind, UnsupportedKind};

#[doc(inline)]
pub use cid::{CidAllocator, RandomCid};

#[doc(inline)]
pub use client::{Client, ClientConfig, TransportKind, DEFAULT_TTL};

#[doc(inline)]
pub use envelope::{CallEnvelope, CallResult};

#[doc(inline)]
pub use error::{CallError, DispatchError, MarshalError};

#[doc(inline)]
pub use marshal::{marshal, MarshaledArgs};

#[doc(inline)]
pub use transport::{ResultSender, Transport};
