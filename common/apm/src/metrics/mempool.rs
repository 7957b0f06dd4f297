use crate::metrics::{
    auto_flush_from, exponential_buckets, make_auto_flush_static_metric, register_histogram_vec,
    register_int_counter_vec, register_int_gauge, HistogramVec, IntCounterVec, IntGauge,
};

use lazy_static::lazy_static;

make_auto_flush_static_metric! {
    pub label_enum MempoolCheckTxResult {
        ok,
        too_large,
        full,
        pre_check,
        post_check,
        in_cache,
        app_reject,
    }

    pub struct MempoolCheckTxResultVec: LocalIntCounter {
        "result" => MempoolCheckTxResult,
    }

    pub label_enum MempoolOpKind {
        check_tx,
        reap,
        update,
        recheck,
        remove,
        flush,
    }

    pub struct MempoolTimeHistogramVec: LocalHistogram {
        "op" => MempoolOpKind,
    }
}

lazy_static! {
    pub static ref MEMPOOL_CHECK_TX_RESULT_VEC: IntCounterVec = register_int_counter_vec!(
        "txstage_mempool_check_tx_result",
        "CheckTx admission outcomes",
        &["result"]
    )
    .unwrap();
    pub static ref MEMPOOL_TIME_HISTOGRAM_VEC: HistogramVec = register_histogram_vec!(
        "txstage_mempool_op_seconds",
        "Time cost of mempool operations",
        &["op"],
        exponential_buckets(0.0005, 2.0, 12).unwrap()
    )
    .unwrap();
    pub static ref MEMPOOL_REAP_SIZE: IntGauge =
        register_int_gauge!("txstage_mempool_reap_size", "Txs returned by the last reap").unwrap();
    pub static ref MEMPOOL_SIZE: IntGauge =
        register_int_gauge!("txstage_mempool_size", "Live tx count").unwrap();
    pub static ref MEMPOOL_SIZE_BYTES: IntGauge =
        register_int_gauge!("txstage_mempool_size_bytes", "Live tx bytes").unwrap();
    pub static ref MEMPOOL_RECHECKING: IntGauge = register_int_gauge!(
        "txstage_mempool_rechecking",
        "Outstanding recheck requests"
    )
    .unwrap();
}

lazy_static! {
    pub static ref MEMPOOL_CHECK_TX_RESULT_STATIC: MempoolCheckTxResultVec =
        auto_flush_from!(MEMPOOL_CHECK_TX_RESULT_VEC, MempoolCheckTxResultVec);
    pub static ref MEMPOOL_TIME_STATIC: MempoolTimeHistogramVec =
        auto_flush_from!(MEMPOOL_TIME_HISTOGRAM_VEC, MempoolTimeHistogramVec);
}
