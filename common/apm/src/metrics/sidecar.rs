use crate::metrics::{
    make_auto_flush_static_metric, register_int_counter_vec, register_int_gauge, IntCounterVec,
    IntGauge,
};

use lazy_static::lazy_static;

make_auto_flush_static_metric! {
    pub label_enum SidecarAddTxResult {
        ok,
        wrong_height,
        bundle_size_conflict,
        duplicate_bundle_order,
        invalid_order,
    }

    pub struct SidecarAddTxResultVec: LocalIntCounter {
        "result" => SidecarAddTxResult,
    }
}

lazy_static! {
    pub static ref SIDECAR_ADD_TX_RESULT_VEC: IntCounterVec = register_int_counter_vec!(
        "txstage_sidecar_add_tx_result",
        "AddTx admission outcomes",
        &["result"]
    )
    .unwrap();
    pub static ref SIDECAR_REAP_SIZE: IntGauge = register_int_gauge!(
        "txstage_sidecar_reap_size",
        "Txs returned by the last reap"
    )
    .unwrap();
    pub static ref SIDECAR_NUM_BUNDLES: IntGauge = register_int_gauge!(
        "txstage_sidecar_num_bundles",
        "Bundle entries at the current auction height"
    )
    .unwrap();
}

lazy_static! {
    pub static ref SIDECAR_ADD_TX_RESULT_STATIC: SidecarAddTxResultVec =
        crate::metrics::auto_flush_from!(SIDECAR_ADD_TX_RESULT_VEC, SidecarAddTxResultVec);
}
