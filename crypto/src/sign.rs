//! Caller keys and transaction signatures.
//!
//! Signatures always cover [`TRANSACTION_DOMAIN`] followed by the payload;
//! callers pass the bare payload.

use crate::digest::TRANSACTION_DOMAIN;
use ballot_types::{KeyPair, PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

fn keypair_of(signing_key: &SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Fresh caller keys from the OS random source.
pub fn generate_keypair() -> KeyPair {
    keypair_of(&SigningKey::generate(&mut OsRng))
}

/// Rebuild a caller's keys from a stored private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    keypair_of(&SigningKey::from_bytes(&private.0))
}

/// Deterministic keys for fixtures and scripted ballots.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_of(&SigningKey::from_bytes(seed))
}

fn tagged(payload: &[u8]) -> Vec<u8> {
    [TRANSACTION_DOMAIN, payload].concat()
}

pub fn sign_transaction(payload: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(&tagged(payload)).to_bytes())
}

/// Strict Ed25519 verification of a transaction payload: small-order keys
/// and non-canonical signatures fail.
pub fn verify_transaction(payload: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(&tagged(payload), &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_keys_are_stable() {
        let a = keypair_from_seed(&[4; 32]);
        let b = keypair_from_private(PrivateKey([4; 32]));
        assert_eq!(a.public, b.public);
        assert_ne!(a.public, keypair_from_seed(&[5; 32]).public);
    }

    #[test]
    fn generated_keys_sign() {
        let kp = generate_keypair();
        let sig = sign_transaction(b"deploy", &kp.private);
        assert!(verify_transaction(b"deploy", &sig, &kp.public));
    }

    #[test]
    fn tampered_payload_fails() {
        let kp = keypair_from_seed(&[1; 32]);
        let sig = sign_transaction(b"vote 0", &kp.private);
        assert!(!verify_transaction(b"vote 1", &sig, &kp.public));
    }

    #[test]
    fn other_key_fails() {
        let a = keypair_from_seed(&[1; 32]);
        let b = keypair_from_seed(&[2; 32]);
        let sig = sign_transaction(b"vote 0", &a.private);
        assert!(!verify_transaction(b"vote 0", &sig, &b.public));
    }

    #[test]
    fn untagged_signature_fails() {
        let kp = keypair_from_seed(&[1; 32]);
        let raw = SigningKey::from_bytes(&kp.private.0).sign(b"vote 0");
        let sig = Signature(raw.to_bytes());
        assert!(!verify_transaction(b"vote 0", &sig, &kp.public));
    }

    #[test]
    fn garbage_public_key_fails() {
        let kp = keypair_from_seed(&[1; 32]);
        let sig = sign_transaction(b"x", &kp.private);
        assert!(!verify_transaction(b"x", &sig, &PublicKey([0xFF; 32])));
    }
}
