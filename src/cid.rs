//! Correlation-id allocation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Issues one opaque correlation id per call.
///
/// Implementations must be callable concurrently from many in-flight calls
/// without coordination. The client takes its allocator as an injected
/// dependency so tests can substitute a deterministic one.
pub trait CidAllocator: Send + Sync {
    fn allocate(&self) -> String;
}

/// Default allocator: 48 bits of epoch milliseconds followed by 80 random
/// bits, hex encoded.
///
/// Uniqueness is probabilistic (uuid-grade collision resistance), not
/// enforced. That is an accepted property of the protocol: transports key
/// their response registries by cid and a collision would misroute a reply.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCid;

impl CidAllocator for RandomCid {
    fn allocate(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let noise: u128 = rand::random();
        format!(
            "{:012x}{:020x}",
            millis & 0xffff_ffff_ffff,
            noise & 0xffff_ffff_ffff_ffff_ffff
        )
    }
}
