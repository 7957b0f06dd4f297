use serde::{Deserialize, Serialize};

/// Knobs named in spec §6. Lives beside the engine that interprets it
/// rather than in `common-config`, which only loads the raw TOML/HTTP
/// source; schemas belong to their owners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MempoolConfig {
    /// Reject any single tx larger than this.
    pub max_tx_bytes: usize,
    /// Cap on total live bytes; admission fails with `MempoolIsFull` at
    /// the boundary.
    pub max_txs_bytes: usize,
    /// Cap on tx count.
    pub pool_size: usize,
    /// Capacity of the duplicate-suppression cache.
    pub cache_size: usize,
    /// If true, failed `CheckTx`/recheck responses still mark the tx as
    /// seen, preventing replay of known-bad txs.
    pub keep_invalid_txs_in_cache: bool,
    /// Whether `Update` re-runs `CheckTx` on survivors.
    pub recheck: bool,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        MempoolConfig {
            max_tx_bytes: 1024 * 1024,
            max_txs_bytes: 1024 * 1024 * 1024,
            pool_size: 20_000,
            cache_size: 200_000,
            keep_invalid_txs_in_cache: false,
            recheck: true,
        }
    }
}
