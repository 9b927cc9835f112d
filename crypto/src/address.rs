//! Identity derivation.

use ballot_types::{BallotId, PublicKey, TxHash, VoterId};

use crate::digest::blake2b_256;

/// Domain tag mixed into ballot id derivation so a ballot id can never
/// collide with a voter id derived from the same bytes.
const BALLOT_ID_TAG: &[u8] = b"ballot-id";

/// Derive the voter identity of a public key: the trailing 20 bytes of
/// Blake2b-256(public key).
pub fn derive_voter_id(public_key: &PublicKey) -> VoterId {
    VoterId::from_digest(&blake2b_256(&[public_key.as_bytes()]))
}

/// Derive the id of a ballot from the hash of the transaction that deployed it.
pub fn derive_ballot_id(deploy_tx: &TxHash) -> BallotId {
    BallotId::from_digest(&blake2b_256(&[BALLOT_ID_TAG, deploy_tx.as_bytes()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::keypair_from_seed;

    #[test]
    fn voter_id_is_stable_per_key() {
        let kp = keypair_from_seed(&[3u8; 32]);
        assert_eq!(derive_voter_id(&kp.public), derive_voter_id(&kp.public));
    }

    #[test]
    fn distinct_keys_have_distinct_ids() {
        let a = keypair_from_seed(&[1u8; 32]);
        let b = keypair_from_seed(&[2u8; 32]);
        assert_ne!(derive_voter_id(&a.public), derive_voter_id(&b.public));
    }

    #[test]
    fn ballot_id_depends_on_deploy_hash() {
        let a = derive_ballot_id(&TxHash::new([1u8; 32]));
        let b = derive_ballot_id(&TxHash::new([2u8; 32]));
        assert_ne!(a, b);
    }
}
