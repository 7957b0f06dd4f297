use std::error::Error;

use derive_more::Display;

use protocol::types::TxKey;
use protocol::{ProtocolError, ProtocolErrorKind};

#[derive(Debug, Display)]
pub enum MemPoolError {
    #[display(fmt = "Tx exceeds size limit, actual: {}, max: {}", actual, max)]
    TxTooLarge { max: usize, actual: usize },

    #[display(
        fmt = "Mempool is full, txs: {}/{}, bytes: {}/{}",
        num_txs,
        max_txs,
        txs_bytes,
        max_txs_bytes
    )]
    MempoolIsFull {
        num_txs: usize,
        max_txs: usize,
        txs_bytes: usize,
        max_txs_bytes: usize,
    },

    #[display(fmt = "Tx rejected by pre-check")]
    PreCheck,

    #[display(fmt = "Tx rejected by post-check")]
    PostCheck,

    #[display(fmt = "Tx {} already in mempool or cache", key)]
    TxInCache { key: TxKey },

    #[display(fmt = "Tx {} not found", key)]
    NoSuchTx { key: TxKey },

    #[display(fmt = "Tx rejected by application, code: {}, log: {}", code, log)]
    AppReject { code: u32, log: String },
}

impl Error for MemPoolError {}

impl From<MemPoolError> for ProtocolError {
    fn from(error: MemPoolError) -> ProtocolError {
        ProtocolError::new(ProtocolErrorKind::Mempool, Box::new(error))
    }
}
