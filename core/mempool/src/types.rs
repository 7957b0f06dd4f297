use std::collections::HashSet;

use protocol::types::{Gas, Height, SenderId, Tx};

/// Admission metadata attached by the caller (spec §3, `TxInfo`). The
/// bundle-only fields live on `core-sidecar`'s own admission type instead
/// of here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxInfo {
    pub sender_id: SenderId,
}

/// A transaction the mempool has admitted. `confirmed` is `false` while a
/// reservation is waiting on its `CheckTx` response (see
/// [`crate::CListMempool::check_tx`]); reap and size accounting ignore
/// unconfirmed entries.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub tx: Tx,
    pub gas_wanted: Gas,
    pub height: Height,
    pub senders: HashSet<SenderId>,
    pub confirmed: bool,
}

/// Public view of a live mempool entry.
#[derive(Debug, Clone)]
pub struct MempoolTx {
    pub tx: Tx,
    pub gas_wanted: Gas,
    pub height: Height,
    pub senders: HashSet<SenderId>,
}

impl From<&Entry> for MempoolTx {
    fn from(entry: &Entry) -> Self {
        MempoolTx {
            tx: entry.tx.clone(),
            gas_wanted: entry.gas_wanted,
            height: entry.height,
            senders: entry.senders.clone(),
        }
    }
}
