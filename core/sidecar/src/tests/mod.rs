use std::time::Duration;

use protocol::types::Tx;

use crate::{PriorityTxSidecar, SidecarConfig, TxInfo};

fn tagged_tx(tag: u8) -> Tx {
    vec![tag].into()
}

fn info(height: i64, bundle_id: u64, order: u32, size: u32) -> TxInfo {
    TxInfo {
        sender_id: 0,
        desired_height: height,
        bundle_id,
        bundle_order: order,
        bundle_size: size,
    }
}

fn new_sidecar_at(height: i64) -> std::sync::Arc<PriorityTxSidecar> {
    PriorityTxSidecar::new(SidecarConfig {
        initial_height_for_firing_auction: height,
    })
}

/// Spec §8 scenario 2: out-of-order bundle assembly across bundles.
#[test]
fn out_of_order_bundle_assembly() {
    let sidecar = new_sidecar_at(1);

    sidecar.add_tx(tagged_tx(1), info(1, 0, 1, 2)).unwrap();
    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 2)).unwrap();

    sidecar.add_tx(tagged_tx(22), info(1, 2, 2, 3)).unwrap();
    sidecar.add_tx(tagged_tx(20), info(1, 2, 0, 3)).unwrap();
    sidecar.add_tx(tagged_tx(21), info(1, 2, 1, 3)).unwrap();

    sidecar.add_tx(tagged_tx(11), info(1, 1, 1, 2)).unwrap();
    sidecar.add_tx(tagged_tx(10), info(1, 1, 0, 2)).unwrap();

    let reaped = sidecar.reap_max_txs();
    let tags: Vec<u8> = reaped.iter().map(|t| t.tx.as_ref()[0]).collect();
    assert_eq!(tags, vec![0, 1, 10, 11, 20, 21, 22]);
}

/// Spec §8 scenario 3: incomplete bundles, out-of-range orders, and the
/// wrong auction height all reap to nothing.
#[test]
fn incomplete_and_wrong_height_bundles_reap_empty() {
    let sidecar = new_sidecar_at(1);

    // Bundle declares size 3 but only two of three orders ever arrive.
    sidecar.add_tx(tagged_tx(0), info(1, 100, 0, 3)).unwrap();
    sidecar.add_tx(tagged_tx(1), info(1, 100, 1, 3)).unwrap();

    // Bundle declares size 3; order 3 is out of range and rejected.
    sidecar.add_tx(tagged_tx(2), info(1, 101, 0, 3)).unwrap();
    assert!(sidecar.add_tx(tagged_tx(3), info(1, 101, 3, 3)).is_err());
    sidecar.add_tx(tagged_tx(4), info(1, 101, 2, 3)).unwrap();

    // Wrong heights never land anywhere the current auction can reap.
    assert!(sidecar.add_tx(tagged_tx(5), info(0, 200, 0, 2)).is_err());
    assert!(sidecar.add_tx(tagged_tx(6), info(2, 201, 0, 2)).is_err());

    assert!(sidecar.reap_max_txs().is_empty());
}

#[test]
fn invalid_order_out_of_range_is_rejected() {
    let sidecar = new_sidecar_at(1);
    let err = sidecar.add_tx(tagged_tx(0), info(1, 0, 3, 3)).unwrap_err();
    assert!(format!("{:?}", err).contains("InvalidBundleOrder"));
}

#[test]
fn empty_bundle_never_materializes() {
    let sidecar = new_sidecar_at(1);
    assert!(sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 0)).is_err());
    assert_eq!(sidecar.num_bundles(), 0);
}

#[test]
fn duplicate_bundle_order_is_rejected() {
    let sidecar = new_sidecar_at(1);
    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 2)).unwrap();
    let err = sidecar.add_tx(tagged_tx(1), info(1, 0, 0, 2)).unwrap_err();
    assert!(format!("{:?}", err).contains("DuplicateBundleOrder"));
}

#[test]
fn bundle_size_conflict_is_rejected() {
    let sidecar = new_sidecar_at(1);
    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 2)).unwrap();
    let err = sidecar.add_tx(tagged_tx(1), info(1, 0, 1, 3)).unwrap_err();
    assert!(format!("{:?}", err).contains("BundleSizeConflict"));
    // The original declared size still stands; a correctly-sized
    // follow-up still completes the bundle.
    sidecar.add_tx(tagged_tx(2), info(1, 0, 1, 2)).unwrap();
    assert_eq!(sidecar.reap_max_txs().len(), 2);
}

#[test]
fn num_bundles_counts_incomplete_entries() {
    let sidecar = new_sidecar_at(1);
    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 2)).unwrap();
    sidecar.add_tx(tagged_tx(1), info(1, 1, 0, 5)).unwrap();
    assert_eq!(sidecar.num_bundles(), 2);
    assert!(sidecar.reap_max_txs().is_empty());
}

#[test]
fn reap_is_idempotent_and_non_destructive() {
    let sidecar = new_sidecar_at(1);
    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 1)).unwrap();

    let first = sidecar.reap_max_txs();
    let second = sidecar.reap_max_txs();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(sidecar.num_bundles(), 1);
}

#[test]
fn update_advances_auction_height_and_drops_stale_bundles() {
    let sidecar = new_sidecar_at(1);
    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 1)).unwrap();
    assert_eq!(sidecar.reap_max_txs().len(), 1);

    sidecar.update(1, &[]);
    assert_eq!(sidecar.height_for_firing_auction(), 2);
    assert_eq!(sidecar.num_bundles(), 0);
    assert!(sidecar.reap_max_txs().is_empty());

    // The bundle that used to target height 1 can never be admitted
    // again; height 2 is now current.
    assert!(sidecar.add_tx(tagged_tx(1), info(1, 1, 0, 1)).is_err());
    sidecar.add_tx(tagged_tx(2), info(2, 1, 0, 1)).unwrap();
    assert_eq!(sidecar.reap_max_txs().len(), 1);
}

#[test]
fn flush_clears_all_bundles_but_not_auction_height() {
    let sidecar = new_sidecar_at(1);
    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 2)).unwrap();
    sidecar.flush();
    assert_eq!(sidecar.num_bundles(), 0);
    assert_eq!(sidecar.height_for_firing_auction(), 1);
}

#[tokio::test]
async fn txs_available_fires_once_per_height() {
    let sidecar = new_sidecar_at(1);
    sidecar.enable_txs_available();

    sidecar.add_tx(tagged_tx(0), info(1, 0, 0, 2)).unwrap();
    let fired = tokio::time::timeout(Duration::from_millis(200), sidecar.txs_available().wait()).await;
    assert!(fired.is_ok());

    sidecar.add_tx(tagged_tx(1), info(1, 0, 1, 2)).unwrap();
    let not_fired =
        tokio::time::timeout(Duration::from_millis(50), sidecar.txs_available().wait()).await;
    assert!(not_fired.is_err(), "must not fire twice in the same height");

    sidecar.update(1, &[]);
    let not_fired_after_update =
        tokio::time::timeout(Duration::from_millis(50), sidecar.txs_available().wait()).await;
    assert!(not_fired_after_update.is_err());

    sidecar.add_tx(tagged_tx(2), info(2, 0, 0, 1)).unwrap();
    let fired_again =
        tokio::time::timeout(Duration::from_millis(200), sidecar.txs_available().wait()).await;
    assert!(fired_again.is_ok(), "new admission at the new height should fire once");
}

#[test]
fn pretty_print_includes_bundle_occupancy() {
    let sidecar = new_sidecar_at(1);
    sidecar.add_tx(tagged_tx(0), info(1, 7, 0, 3)).unwrap();
    let out = sidecar.pretty_print_bundles();
    assert!(out.contains("bundle 7"));
    assert!(out.contains("1/3"));
}
