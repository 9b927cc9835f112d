//! Signing identity.

use crate::error::WalletError;
use ballot_crypto::{derive_voter_id, generate_keypair, keypair_from_private};
use ballot_transactions::{BallotCall, SignedTransaction};
use ballot_types::{BallotId, KeyPair, PrivateKey, PublicKey, TypesError, VoterId};
use std::fmt;

pub struct Signer {
    keys: KeyPair,
    identity: VoterId,
}

impl Signer {
    pub fn new(keys: KeyPair) -> Self {
        let identity = derive_voter_id(&keys.public);
        Self { keys, identity }
    }

    /// A signer with a fresh random key.
    pub fn generate() -> Self {
        Self::new(generate_keypair())
    }

    /// Parse a 32-byte private key given as hex, with or without `0x`.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, WalletError> {
        let private: PrivateKey = hex.parse().map_err(|e: TypesError| match e {
            TypesError::InvalidKey(msg) => WalletError::InvalidKey(msg),
            other => WalletError::Types(other),
        })?;
        Ok(Self::new(keypair_from_private(private)))
    }

    pub fn identity(&self) -> VoterId {
        self.identity
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    pub fn sign(
        &self,
        ballot: Option<BallotId>,
        call: BallotCall,
    ) -> Result<SignedTransaction, WalletError> {
        Ok(SignedTransaction::sign(ballot, call, &self.keys)?)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    #[test]
    fn hex_key_with_and_without_prefix() {
        let a = Signer::from_private_key_hex(KEY).unwrap();
        let b = Signer::from_private_key_hex(&format!("0x{KEY}")).unwrap();
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_matches_key() {
        let signer = Signer::from_private_key_hex(KEY).unwrap();
        let keys = ballot_crypto::keypair_from_seed(&[1; 32]);
        assert_eq!(signer.identity(), derive_voter_id(&keys.public));
    }

    #[test]
    fn malformed_key_rejected() {
        for bad in ["", "0x", "zz", &KEY[..62]] {
            assert!(matches!(
                Signer::from_private_key_hex(bad),
                Err(WalletError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn signed_transactions_come_from_identity() {
        let signer = Signer::generate();
        let tx = signer
            .sign(Some(BallotId::new([1; 20])), BallotCall::Vote { proposal: 0 })
            .unwrap();
        tx.verify_signature().unwrap();
        assert_eq!(tx.sender(), signer.identity());
    }

    #[test]
    fn debug_does_not_print_key() {
        let signer = Signer::from_private_key_hex(KEY).unwrap();
        let debug = format!("{signer:?}");
        assert!(!debug.contains(KEY));
    }
}
