use std::collections::BTreeMap;

use protocol::types::{Height, SenderId, Tx};

/// Identifies a bundle within a single auction height. Assigned by the
/// bundle's producer, not by the sidecar.
pub type BundleId = u64;

/// Admission metadata for a bundle-targeted tx (spec §3 `TxInfo`,
/// sidecar-only fields). The sender-tagging field mirrors
/// `core_mempool::TxInfo` but the bundle fields have no mempool
/// counterpart.
#[derive(Debug, Clone, Copy)]
pub struct TxInfo {
    pub sender_id: SenderId,
    pub desired_height: Height,
    pub bundle_id: BundleId,
    pub bundle_order: u32,
    pub bundle_size: u32,
}

/// A tx reaped out of a complete bundle, tagged with the slot it filled.
#[derive(Debug, Clone)]
pub struct SidecarTx {
    pub tx: Tx,
    pub height: Height,
    pub bundle_id: BundleId,
    pub order: u32,
}

/// One ordered group of txs targeted at a single height (spec §3
/// `Bundle`). `size` is fixed by whichever admission creates the entry;
/// later admissions declaring a different size are rejected rather than
/// overwriting it.
pub(crate) struct Bundle {
    pub size: u32,
    pub slots: BTreeMap<u32, Tx>,
}

impl Bundle {
    pub fn new(size: u32) -> Self {
        Bundle {
            size,
            slots: BTreeMap::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.len() as u32 == self.size
    }
}
