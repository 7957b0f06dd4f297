//! The CList-style general transaction mempool (spec §4.3): an
//! insertion-ordered, key-indexed store of admitted transactions, gated
//! by a single mutex shared with its duplicate-suppression cache so that
//! the capacity check and the cache probe can never race each other.

mod config;
mod error;
mod tx_cache;
mod types;


pub use config::MempoolConfig;
pub use error::MemPoolError;
pub use types::{MempoolTx, TxInfo};

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;

use core_abci_client::{AbciClient, CheckTxKind, RequestCheckTx, ResponseCheckTx, ResponseDeliverTx};
use protocol::types::{Height, Tx, TxKey};
use protocol::ProtocolResult;

use crate::tx_cache::TxCache;
use crate::types::Entry;

pub type PreCheckFn = Box<dyn Fn(&Tx) -> bool + Send + Sync>;
pub type PostCheckFn = Box<dyn Fn(&Tx, &ResponseCheckTx) -> bool + Send + Sync>;
pub type ResponseCb = Box<dyn FnOnce(ProtocolResult<()>) + Send>;

struct Inner {
    list: LinkedHashMap<TxKey, Entry>,
    /// Byte total across *all* entries currently in `list`, including
    /// unconfirmed reservations. This is deliberately wider than the
    /// public `SizeBytes()` (which counts only confirmed entries): the
    /// capacity gate must see a reservation the instant it is made, or
    /// two concurrent callers can each pass the gate before either has
    /// an app response and jointly overshoot `MaxTxsBytes`.
    size_bytes: usize,
    height: Height,
    pre_check: Option<PreCheckFn>,
    post_check: Option<PostCheckFn>,
    cache: TxCache,
}

/// The general mempool. Cloned handles share state via `Arc`.
pub struct CListMempool {
    config: MempoolConfig,
    abci: Arc<dyn AbciClient>,
    inner: Mutex<Inner>,
    rechecking: AtomicUsize,
    txs_available: common_notify::TxsAvailable,
}

impl CListMempool {
    pub fn new(config: MempoolConfig, abci: Arc<dyn AbciClient>) -> Arc<Self> {
        let cache = TxCache::new(config.cache_size);
        Arc::new(CListMempool {
            inner: Mutex::new(Inner {
                list: LinkedHashMap::new(),
                size_bytes: 0,
                height: 0,
                pre_check: None,
                post_check: None,
                cache,
            }),
            rechecking: AtomicUsize::new(0),
            txs_available: common_notify::TxsAvailable::new(),
            abci,
            config,
        })
    }

    pub fn set_pre_check(&self, f: PreCheckFn) {
        self.inner.lock().pre_check = Some(f);
    }

    pub fn set_post_check(&self, f: PostCheckFn) {
        self.inner.lock().post_check = Some(f);
    }

    pub fn enable_txs_available(&self) {
        self.txs_available.enable();
    }

    pub fn txs_available(&self) -> &common_notify::TxsAvailable {
        &self.txs_available
    }

    pub fn size(&self) -> usize {
        self.inner.lock().list.values().filter(|e| e.confirmed).count()
    }

    pub fn size_bytes(&self) -> usize {
        self.inner
            .lock()
            .list
            .values()
            .filter(|e| e.confirmed)
            .map(|e| e.tx.len())
            .sum()
    }

    pub fn txs_front(&self) -> Option<MempoolTx> {
        self.inner
            .lock()
            .list
            .values()
            .find(|e| e.confirmed)
            .map(MempoolTx::from)
    }

    /// Blocks until every ABCI request enqueued so far has been
    /// dispatched. Tests use this to wait for admission responses
    /// before asserting on `Size`/`SizeBytes`/`ReapMaxBytesMaxGas`.
    pub async fn flush_app_conn(&self) -> ProtocolResult<()> {
        self.abci.flush_async().await
    }

    /// Admits `tx` into the pool. Synchronous gates (size, capacity,
    /// pre-check, cache) fail immediately; once they pass, the app probe
    /// is enqueued and `response_cb` is invoked later, on the ABCI
    /// client's dispatch thread, with the final accept/reject outcome.
    pub async fn check_tx(
        self: &Arc<Self>,
        tx: Tx,
        info: TxInfo,
        response_cb: ResponseCb,
    ) -> ProtocolResult<()> {
        let start = Instant::now();
        let tx_len = tx.len();

        if tx_len > self.config.max_tx_bytes {
            common_apm::metrics::mempool::MEMPOOL_CHECK_TX_RESULT_STATIC
                .too_large
                .inc();
            return Err(MemPoolError::TxTooLarge {
                max: self.config.max_tx_bytes,
                actual: tx_len,
            }
            .into());
        }

        let key = protocol::hash::tx_key(&tx);

        {
            let mut inner = self.inner.lock();

            if inner.list.len() + 1 > self.config.pool_size
                || inner.size_bytes + tx_len > self.config.max_txs_bytes
            {
                common_apm::metrics::mempool::MEMPOOL_CHECK_TX_RESULT_STATIC
                    .full
                    .inc();
                return Err(MemPoolError::MempoolIsFull {
                    num_txs: inner.list.len(),
                    max_txs: self.config.pool_size,
                    txs_bytes: inner.size_bytes,
                    max_txs_bytes: self.config.max_txs_bytes,
                }
                .into());
            }

            if let Some(pre_check) = &inner.pre_check {
                if !pre_check(&tx) {
                    common_apm::metrics::mempool::MEMPOOL_CHECK_TX_RESULT_STATIC
                        .pre_check
                        .inc();
                    return Err(MemPoolError::PreCheck.into());
                }
            }

            if !inner.cache.push(key) {
                if let Some(existing) = inner.list.get_mut(&key) {
                    existing.senders.insert(info.sender_id);
                }
                common_apm::metrics::mempool::MEMPOOL_CHECK_TX_RESULT_STATIC
                    .in_cache
                    .inc();
                return Err(MemPoolError::TxInCache { key }.into());
            }

            let mut senders = HashSet::new();
            senders.insert(info.sender_id);
            let height = inner.height;
            inner.list.insert(key, Entry {
                tx: tx.clone(),
                gas_wanted: 0,
                height,
                senders,
                confirmed: false,
            });
            inner.size_bytes += tx_len;
        }

        let mempool = Arc::clone(self);
        let req = RequestCheckTx {
            tx: tx.clone(),
            kind: CheckTxKind::New,
        };
        let reqres = match self.abci.check_tx_async(req).await {
            Ok(reqres) => reqres,
            Err(err) => {
                // The probe never made it to the app; the reservation
                // made above must not outlive it, or a closed/backed-up
                // client would permanently leak capacity, bytes and a
                // cache slot per failed enqueue.
                let mut inner = self.inner.lock();
                if let Some(entry) = inner.list.remove(&key) {
                    inner.size_bytes -= entry.tx.len();
                }
                inner.cache.remove(&key);
                Self::refresh_gauges(&inner);
                return Err(err);
            }
        };
        reqres.set_callback(move |resp| {
            mempool.on_check_tx_response(key, resp.clone(), response_cb);
        });

        common_apm::metrics::mempool::MEMPOOL_TIME_STATIC
            .check_tx
            .observe(common_apm::metrics::duration_to_sec(start.elapsed()));
        Ok(())
    }

    fn on_check_tx_response(&self, key: TxKey, resp: ResponseCheckTx, response_cb: ResponseCb) {
        let mut inner = self.inner.lock();

        let entry_tx = match inner.list.get(&key) {
            Some(entry) => entry.tx.clone(),
            // Flushed or otherwise removed while the probe was in flight.
            None => return,
        };

        let post_ok = inner
            .post_check
            .as_ref()
            .map_or(true, |post| post(&entry_tx, &resp));
        let accepted = resp.is_ok() && post_ok;

        let result = if accepted {
            if let Some(entry) = inner.list.get_mut(&key) {
                entry.gas_wanted = resp.gas_wanted;
                entry.confirmed = true;
            }
            common_apm::metrics::mempool::MEMPOOL_CHECK_TX_RESULT_STATIC
                .ok
                .inc();
            Ok(())
        } else {
            if let Some(entry) = inner.list.remove(&key) {
                inner.size_bytes -= entry.tx.len();
            }
            if !self.config.keep_invalid_txs_in_cache {
                inner.cache.remove(&key);
            }
            // `resp.is_ok()` false means the application itself rejected
            // the tx; a true response with `!post_ok` means our own
            // `PostCheckFunc` did, which spec §7 classifies separately so
            // callers can tell apart an app rejection from a local filter.
            if !resp.is_ok() {
                common_apm::metrics::mempool::MEMPOOL_CHECK_TX_RESULT_STATIC
                    .app_reject
                    .inc();
                Err(MemPoolError::AppReject {
                    code: resp.code,
                    log: resp.log.clone(),
                }
                .into())
            } else {
                common_apm::metrics::mempool::MEMPOOL_CHECK_TX_RESULT_STATIC
                    .post_check
                    .inc();
                Err(MemPoolError::PostCheck.into())
            }
        };

        Self::refresh_gauges(&inner);
        drop(inner);

        if accepted {
            self.txs_available.notify();
        }
        response_cb(result);
    }

    /// Walks the ordered list, accumulating txs as long as neither budget
    /// would be exceeded by the next one. A negative budget is
    /// unlimited. Stops at the first overflowing tx rather than skipping
    /// ahead to one that would still fit (spec §4.3, §9).
    pub fn reap_max_bytes_max_gas(&self, max_bytes: i64, max_gas: i64) -> Vec<Tx> {
        let inner = self.inner.lock();
        let mut out = Vec::new();
        let mut bytes_acc: i64 = 0;
        let mut gas_acc: i64 = 0;

        for entry in inner.list.values() {
            if !entry.confirmed {
                continue;
            }
            let next_bytes = bytes_acc + proto_size(entry.tx.len()) as i64;
            let next_gas = gas_acc + entry.gas_wanted;

            if max_bytes >= 0 && next_bytes > max_bytes {
                break;
            }
            if max_gas >= 0 && next_gas > max_gas {
                break;
            }

            bytes_acc = next_bytes;
            gas_acc = next_gas;
            out.push(entry.tx.clone());
        }

        common_apm::metrics::mempool::MEMPOOL_REAP_SIZE.set(out.len() as i64);
        log::info!("mempool: reaped {} txs", out.len());
        out
    }

    /// Count-bounded variant of reap (spec §6's `ReapMaxTxs`, distinct
    /// from `ReapMaxBytesMaxGas`'s byte/gas budget): the first `max`
    /// confirmed txs in insertion order, or every confirmed tx if `max`
    /// is negative. Non-destructive and idempotent, like
    /// `reap_max_bytes_max_gas`.
    pub fn reap_max_txs(&self, max: i64) -> Vec<Tx> {
        let inner = self.inner.lock();
        let confirmed = inner.list.values().filter(|e| e.confirmed);

        let out: Vec<Tx> = if max < 0 {
            confirmed.map(|e| e.tx.clone()).collect()
        } else {
            confirmed.take(max as usize).map(|e| e.tx.clone()).collect()
        };

        log::info!("mempool: reaped {} txs (count-bounded)", out.len());
        out
    }

    pub fn remove_tx_by_key(&self, key: &TxKey) -> ProtocolResult<()> {
        let mut inner = self.inner.lock();
        match inner.list.remove(key) {
            Some(entry) => {
                inner.size_bytes -= entry.tx.len();
                Self::refresh_gauges(&inner);
                Ok(())
            }
            None => Err(MemPoolError::NoSuchTx { key: *key }.into()),
        }
    }

    pub fn flush(&self) {
        let mut inner = self.inner.lock();
        let removed = inner.list.len();
        inner.list.clear();
        inner.size_bytes = 0;
        inner.cache.reset();
        Self::refresh_gauges(&inner);
        log::info!("mempool: flushed {} txs", removed);
    }

    /// Advances height, removes committed/invalid txs, and rechecks the
    /// survivors. Because the app may drop recheck responses, eviction is
    /// pointer-based (keyed lookups) rather than assuming the Nth
    /// response answers the Nth survivor.
    pub async fn update(
        self: &Arc<Self>,
        height: Height,
        committed: &[(Tx, ResponseDeliverTx)],
        pre_check: Option<PreCheckFn>,
        post_check: Option<PostCheckFn>,
    ) -> ProtocolResult<()> {
        let start = Instant::now();
        let survivors: Vec<(TxKey, Tx)>;

        {
            let mut inner = self.inner.lock();
            inner.height = height;
            self.txs_available.reset();

            if let Some(pre) = pre_check {
                inner.pre_check = Some(pre);
            }
            if let Some(post) = post_check {
                inner.post_check = Some(post);
            }

            for (tx, resp) in committed {
                let key = protocol::hash::tx_key(tx);
                if resp.is_ok() {
                    inner.cache.push(key);
                } else if !self.config.keep_invalid_txs_in_cache {
                    inner.cache.remove(&key);
                }
                if let Some(entry) = inner.list.remove(&key) {
                    inner.size_bytes -= entry.tx.len();
                }
            }

            survivors = inner
                .list
                .iter()
                .filter(|(_, entry)| entry.confirmed)
                .map(|(key, entry)| (*key, entry.tx.clone()))
                .collect();

            Self::refresh_gauges(&inner);
        }

        log::info!(
            "mempool: update to height {}, {} committed, {} survivors to recheck",
            height,
            committed.len(),
            survivors.len()
        );

        if self.config.recheck && !survivors.is_empty() {
            self.rechecking
                .fetch_add(survivors.len(), Ordering::SeqCst);
            common_apm::metrics::mempool::MEMPOOL_RECHECKING
                .set(self.rechecking.load(Ordering::SeqCst) as i64);

            for (key, tx) in survivors {
                let mempool = Arc::clone(self);
                let req = RequestCheckTx {
                    tx,
                    kind: CheckTxKind::Recheck,
                };
                let reqres = self.abci.check_tx_async(req).await?;
                reqres.set_callback(move |resp| mempool.on_recheck_response(key, resp.clone()));
            }
            self.abci.flush_async().await?;
        }

        let remaining = self.inner.lock().list.values().filter(|e| e.confirmed).count();
        if remaining > 0 {
            self.txs_available.notify();
        }

        common_apm::metrics::mempool::MEMPOOL_TIME_STATIC
            .update
            .observe(common_apm::metrics::duration_to_sec(start.elapsed()));
        Ok(())
    }

    fn on_recheck_response(&self, key: TxKey, resp: ResponseCheckTx) {
        let mut inner = self.inner.lock();

        let entry_tx = match inner.list.get(&key) {
            Some(entry) => entry.tx.clone(),
            None => {
                drop(inner);
                self.rechecking.fetch_sub(1, Ordering::SeqCst);
                return;
            }
        };

        let evict = !resp.is_ok()
            || inner
                .post_check
                .as_ref()
                .map_or(false, |post| !post(&entry_tx, &resp));

        if evict {
            if let Some(entry) = inner.list.remove(&key) {
                inner.size_bytes -= entry.tx.len();
            }
            if !self.config.keep_invalid_txs_in_cache {
                inner.cache.remove(&key);
            }
        }
        Self::refresh_gauges(&inner);
        drop(inner);

        self.rechecking.fetch_sub(1, Ordering::SeqCst);
        common_apm::metrics::mempool::MEMPOOL_RECHECKING
            .set(self.rechecking.load(Ordering::SeqCst) as i64);
    }

    fn refresh_gauges(inner: &Inner) {
        common_apm::metrics::mempool::MEMPOOL_SIZE.set(inner.list.len() as i64);
        common_apm::metrics::mempool::MEMPOOL_SIZE_BYTES.set(inner.size_bytes as i64);
    }
}

/// Length of a tx once wrapped the way the proposer's block body encodes
/// it: a protobuf-style tag byte plus a varint length prefix ahead of the
/// raw bytes. Needed so `ReapMaxBytesMaxGas`'s byte budget matches the
/// actual block body size rather than the raw tx length.
fn proto_size(tx_len: usize) -> usize {
    1 + varint_size(tx_len as u64) + tx_len
}

fn varint_size(mut v: u64) -> usize {
    let mut n = 1;
    while v >= 0x80 {
        v >>= 7;
        n += 1;
    }
    n
}

#[cfg(test)]
impl CListMempool {
    /// Test-only seam for exercising cache eviction directly, mirroring
    /// the dedicated `cache.Remove` hook the source test harness uses.
    pub(crate) fn test_cache_remove(&self, key: &TxKey) {
        self.inner.lock().cache.remove(key);
    }
}
