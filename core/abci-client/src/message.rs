//! Request/response payloads exchanged with the external application.
//! `RequestCheckTx`/`ResponseCheckTx` mirror the ABCI wire shapes named in
//! spec §6; this workspace never serializes them (the app is always an
//! in-process `AbciApp` implementation or a test double), so they carry
//! plain Rust types rather than a codec-derived struct.

use protocol::types::{Gas, Tx};
use protocol::Bytes;

/// Distinguishes a first-time admission probe from a post-commit recheck,
/// so recheck responses can be told apart from `CheckTx` ones if an
/// implementation needs to (the mempool itself tells them apart by which
/// `ReqRes` they arrive on, not by this tag, per the design note in §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTxKind {
    New,
    Recheck,
}

#[derive(Debug, Clone)]
pub struct RequestCheckTx {
    pub tx: Tx,
    pub kind: CheckTxKind,
}

/// `code == 0` means the application accepted the transaction.
#[derive(Debug, Clone)]
pub struct ResponseCheckTx {
    pub code: u32,
    pub data: Bytes,
    pub log: String,
    pub gas_wanted: Gas,
}

impl ResponseCheckTx {
    pub const OK: u32 = 0;

    pub fn ok(gas_wanted: Gas) -> Self {
        ResponseCheckTx {
            code: Self::OK,
            data: Bytes::new(),
            log: String::new(),
            gas_wanted,
        }
    }

    pub fn reject(code: u32, log: impl Into<String>) -> Self {
        ResponseCheckTx {
            code,
            data: Bytes::new(),
            log: log.into(),
            gas_wanted: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Self::OK
    }
}

#[derive(Debug, Clone)]
pub struct ResponseDeliverTx {
    pub code: u32,
    pub log: String,
}

impl ResponseDeliverTx {
    pub fn is_ok(&self) -> bool {
        self.code == ResponseCheckTx::OK
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseCommit {
    pub data: Bytes,
}
