//! Transaction key derivation. Grounded on `muta-protocol`'s dependency on
//! the `hasher` crate's Keccak implementation for content digests.

use hasher::{Hasher, HasherKeccak};

use crate::types::{Tx, TxKey};

/// Derive a transaction's identity key from its bytes.
///
/// This is a pure function of the transaction content: two byte-identical
/// transactions always produce the same key, which is what makes the
/// dedup cache and the mempool's key index meaningful.
pub fn tx_key(tx: &Tx) -> TxKey {
    let digest = HasherKeccak::new().digest(tx.as_ref());
    let mut out = [0u8; 32];
    let len = digest.len().min(out.len());
    out[..len].copy_from_slice(&digest[..len]);
    TxKey::from_fixed_bytes(out)
}
