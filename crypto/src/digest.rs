//! Domain-separated Blake2b-256 digests.

use ballot_types::{Signature, TxHash};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

/// Tag in front of every transaction payload, both when signing and when
/// hashing, so ballot signatures and hashes never match any other protocol's.
pub const TRANSACTION_DOMAIN: &[u8] = b"ballot-tx-v1";

pub(crate) fn blake2b_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b::<U32>::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Id of a signed transaction: Blake2b-256 over the tagged payload and its
/// signature.
pub fn transaction_hash(payload: &[u8], signature: &Signature) -> TxHash {
    TxHash::new(blake2b_256(&[
        TRANSACTION_DOMAIN,
        payload,
        signature.as_bytes(),
    ]))
}
