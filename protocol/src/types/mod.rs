use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Bytes;

/// An opaque transaction. Its content is never interpreted by this
/// workspace; the application (ABCI) is the sole authority on validity.
pub type Tx = Bytes;

const TX_KEY_LEN: usize = 32;

/// Fixed-size digest of a [`Tx`], used for identity, deduplication and
/// index lookups. See [`crate::hash::tx_key`] for how it is derived.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxKey([u8; TX_KEY_LEN]);

impl TxKey {
    pub fn from_fixed_bytes(bytes: [u8; TX_KEY_LEN]) -> Self {
        TxKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TX_KEY_LEN] {
        &self.0
    }

    pub fn as_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for TxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxKey({})", self.as_hex())
    }
}

impl fmt::Display for TxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

/// Opaque 16-bit peer tag. `0` means unknown / local RPC origin.
pub type SenderId = u16;

pub const LOCAL_SENDER_ID: SenderId = 0;

/// Block height. Monotonically increasing; never negative in practice, but
/// kept signed so callers can carry "not yet observed" as `-1` without an
/// `Option` at every call site, mirroring how the source ABCI ecosystem
/// represents heights.
pub type Height = i64;

/// `GasWanted` as reported by the application's `CheckTx` response.
pub type Gas = i64;
