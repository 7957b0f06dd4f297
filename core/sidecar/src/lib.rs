//! The priority sidecar (spec §4.4): a staging area for MEV-style ordered
//! bundles targeted at a specific block height. It performs no priority
//! comparison of its own -- it only enforces structural completeness of
//! externally-declared bundles (spec §9) -- and, unlike `core-mempool`,
//! never talks to the ABCI application: admission is a pure in-memory
//! operation gated on the bundle's declared shape, not on app validity.

mod config;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use config::SidecarConfig;
pub use error::SidecarError;
pub use types::{BundleId, SidecarTx, TxInfo};

use std::fmt::Write as _;
use std::sync::Arc;

use parking_lot::Mutex;
use std::collections::BTreeMap;

use protocol::types::{Height, Tx};
use protocol::ProtocolResult;

use crate::types::Bundle;

/// Bundles at a height below the current auction height carry no
/// information and are unreachable by any future admission (rule 1 of
/// `AddTx` rejects any `DesiredHeight` but the current one), so the
/// sidecar only ever materializes bundles for the current auction height
/// -- there is no nested `height -> bundle_id -> Bundle` map to drop from,
/// just this one generation that `Update` replaces wholesale.
struct Inner {
    bundles: BTreeMap<BundleId, Bundle>,
    height_for_firing_auction: Height,
}

/// The priority sidecar. Cloned handles share state via `Arc`.
pub struct PriorityTxSidecar {
    inner: Mutex<Inner>,
    txs_available: common_notify::TxsAvailable,
}

impl PriorityTxSidecar {
    pub fn new(config: SidecarConfig) -> Arc<Self> {
        Arc::new(PriorityTxSidecar {
            inner: Mutex::new(Inner {
                bundles: BTreeMap::new(),
                height_for_firing_auction: config.initial_height_for_firing_auction,
            }),
            txs_available: common_notify::TxsAvailable::new(),
        })
    }

    pub fn enable_txs_available(&self) {
        self.txs_available.enable();
    }

    pub fn txs_available(&self) -> &common_notify::TxsAvailable {
        &self.txs_available
    }

    pub fn height_for_firing_auction(&self) -> Height {
        self.inner.lock().height_for_firing_auction
    }

    /// Number of bundle entries at the current auction height, complete
    /// or not.
    pub fn num_bundles(&self) -> usize {
        self.inner.lock().bundles.len()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().bundles.values().map(|b| b.slots.len()).sum()
    }

    /// Admits `tx` into slot `txInfo.BundleOrder` of bundle `BundleId` at
    /// `DesiredHeight`. See spec §4.4 rules 1-4.
    pub fn add_tx(&self, tx: Tx, info: TxInfo) -> ProtocolResult<()> {
        // Empty bundles never materialize, and an order outside the
        // declared size can never complete one; catch both before taking
        // the lock.
        if info.bundle_size == 0 || info.bundle_order >= info.bundle_size {
            common_apm::metrics::sidecar::SIDECAR_ADD_TX_RESULT_STATIC
                .invalid_order
                .inc();
            return Err(SidecarError::InvalidBundleOrder {
                order: info.bundle_order,
                size: info.bundle_size,
            }
            .into());
        }

        let mut inner = self.inner.lock();

        if info.desired_height != inner.height_for_firing_auction {
            common_apm::metrics::sidecar::SIDECAR_ADD_TX_RESULT_STATIC
                .wrong_height
                .inc();
            return Err(SidecarError::WrongHeight {
                expected: inner.height_for_firing_auction,
                actual: info.desired_height,
            }
            .into());
        }

        let first_at_height = inner.bundles.values().all(|b| b.slots.is_empty());

        let bundle_size = inner
            .bundles
            .entry(info.bundle_id)
            .or_insert_with(|| Bundle::new(info.bundle_size))
            .size;
        if bundle_size != info.bundle_size {
            common_apm::metrics::sidecar::SIDECAR_ADD_TX_RESULT_STATIC
                .bundle_size_conflict
                .inc();
            return Err(SidecarError::BundleSizeConflict {
                bundle_id: info.bundle_id,
                expected: bundle_size,
                actual: info.bundle_size,
            }
            .into());
        }

        let bundle = inner.bundles.get_mut(&info.bundle_id).expect("just inserted");
        if bundle.slots.contains_key(&info.bundle_order) {
            common_apm::metrics::sidecar::SIDECAR_ADD_TX_RESULT_STATIC
                .duplicate_bundle_order
                .inc();
            return Err(SidecarError::DuplicateBundleOrder {
                bundle_id: info.bundle_id,
                order: info.bundle_order,
            }
            .into());
        }
        bundle.slots.insert(info.bundle_order, tx);

        common_apm::metrics::sidecar::SIDECAR_ADD_TX_RESULT_STATIC.ok.inc();
        common_apm::metrics::sidecar::SIDECAR_NUM_BUNDLES.set(inner.bundles.len() as i64);

        drop(inner);
        if first_at_height {
            self.txs_available.notify();
        }
        Ok(())
    }

    /// Emits every tx of every *complete* bundle at the current auction
    /// height, bundles in ascending `bundle_id` order and, within a
    /// bundle, slots in ascending order. Incomplete bundles are silently
    /// skipped. Never blocks, never mutates state (spec §4.4, §5).
    pub fn reap_max_txs(&self) -> Vec<SidecarTx> {
        let inner = self.inner.lock();
        let mut out = Vec::new();

        for (&bundle_id, bundle) in inner.bundles.iter() {
            if !bundle.is_complete() {
                continue;
            }
            for (&order, tx) in bundle.slots.iter() {
                out.push(SidecarTx {
                    tx: tx.clone(),
                    height: inner.height_for_firing_auction,
                    bundle_id,
                    order,
                });
            }
        }

        common_apm::metrics::sidecar::SIDECAR_REAP_SIZE.set(out.len() as i64);
        log::info!(
            "sidecar: reaped {} txs from {} complete bundles at height {}",
            out.len(),
            inner.bundles.values().filter(|b| b.is_complete()).count(),
            inner.height_for_firing_auction
        );
        out
    }

    /// Advances the auction height and drops every bundle staged for it.
    /// `committed_txs` is accepted for API symmetry with
    /// `core_mempool::CListMempool::update` but does not influence
    /// sidecar state: the sidecar has no cross-height memory to clean, so
    /// whether a committed block happened to include bundle txs destined
    /// for a *later* auction height is immaterial here (see Open
    /// Questions in the design ledger).
    pub fn update(&self, height: Height, _committed_txs: &[Tx]) {
        let mut inner = self.inner.lock();
        inner.height_for_firing_auction = height + 1;
        inner.bundles.clear();
        common_apm::metrics::sidecar::SIDECAR_NUM_BUNDLES.set(0);
        self.txs_available.reset();
        log::info!(
            "sidecar: update, auction now at height {}",
            inner.height_for_firing_auction
        );
    }

    pub fn flush(&self) {
        let mut inner = self.inner.lock();
        let removed = inner.bundles.len();
        inner.bundles.clear();
        common_apm::metrics::sidecar::SIDECAR_NUM_BUNDLES.set(0);
        log::info!("sidecar: flushed {} bundles", removed);
    }

    /// Debug-only rendering of every bundle staged at the current
    /// auction height, for operator troubleshooting.
    pub fn pretty_print_bundles(&self) -> String {
        let inner = self.inner.lock();
        let mut out = String::new();
        let _ = writeln!(out, "auction height {}:", inner.height_for_firing_auction);
        for (bundle_id, bundle) in inner.bundles.iter() {
            let _ = writeln!(
                out,
                "  bundle {} ({}/{} filled): orders {:?}",
                bundle_id,
                bundle.slots.len(),
                bundle.size,
                bundle.slots.keys().collect::<Vec<_>>()
            );
        }
        out
    }
}
