//! Shared domain types for the transaction staging subsystem: the opaque
//! transaction representation, its digest-derived key, and the error /
//! context plumbing `core-mempool`, `core-sidecar` and `core-abci-client`
//! build on.

pub mod hash;
pub mod types;

use std::error::Error;

use derive_more::{Constructor, Display};

pub use bytes::Bytes;
pub use creep::{Cloneable, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    Mempool,
    Sidecar,
    AbciClient,
    Metric,
    Types,
}

// refer to https://github.com/rust-lang/rust/blob/a17951c4f80eb5208030f91fdb4ae93919fa6b12/src/libstd/io/error.rs#L73
#[derive(Debug, Constructor, Display)]
#[display(fmt = "[ProtocolError] Kind: {:?} Error: {:?}", kind, error)]
pub struct ProtocolError {
    kind:  ProtocolErrorKind,
    error: Box<dyn Error + Send + Sync>,
}

impl ProtocolError {
    pub fn kind(&self) -> ProtocolErrorKind {
        self.kind
    }
}

impl Error for ProtocolError {}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
