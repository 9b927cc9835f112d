//! Signed transaction envelope.

use crate::call::BallotCall;
use crate::error::TransactionError;
use ballot_crypto::{derive_voter_id, sign_transaction, transaction_hash, verify_transaction};
use ballot_types::{BallotId, KeyPair, PublicKey, Signature, TxHash, VoterId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Target ballot; `None` only for deploys.
    pub ballot: Option<BallotId>,
    pub call: BallotCall,
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl SignedTransaction {
    /// Canonical payload of a transaction. `ballot_crypto` tags it with
    /// the transaction domain before signing or hashing.
    pub fn payload(
        ballot: Option<&BallotId>,
        call: &BallotCall,
        public_key: &PublicKey,
    ) -> Result<Vec<u8>, TransactionError> {
        bincode::serialize(&(ballot, call, public_key))
            .map_err(|e| TransactionError::Encoding(e.to_string()))
    }

    pub fn sign(
        ballot: Option<BallotId>,
        call: BallotCall,
        keys: &KeyPair,
    ) -> Result<Self, TransactionError> {
        let payload = Self::payload(ballot.as_ref(), &call, &keys.public)?;
        let signature = sign_transaction(&payload, &keys.private);
        Ok(Self {
            ballot,
            call,
            public_key: keys.public.clone(),
            signature,
        })
    }

    /// The caller identity, derived from the signing key.
    pub fn sender(&self) -> VoterId {
        derive_voter_id(&self.public_key)
    }

    pub fn verify_signature(&self) -> Result<(), TransactionError> {
        let payload = Self::payload(self.ballot.as_ref(), &self.call, &self.public_key)?;
        if verify_transaction(&payload, &self.signature, &self.public_key) {
            Ok(())
        } else {
            Err(TransactionError::InvalidSignature {
                sender: self.sender().to_string(),
            })
        }
    }

    /// Hash over the tagged payload and the signature.
    pub fn hash(&self) -> Result<TxHash, TransactionError> {
        let payload = Self::payload(self.ballot.as_ref(), &self.call, &self.public_key)?;
        Ok(transaction_hash(&payload, &self.signature))
    }
}
