//! Transaction validation logic.

use crate::error::TransactionError;
use crate::signed::SignedTransaction;

/// Validate a transaction's structure and signature.
///
/// This performs stateless validation only. Preconditions that depend on
/// ballot state (rights, prior votes, delegation loops) are checked by the
/// engine when the transaction is applied.
pub fn validate_transaction(tx: &SignedTransaction) -> Result<(), TransactionError> {
    match (&tx.call, tx.ballot) {
        (call, None) if !call.is_deploy() => {
            return Err(TransactionError::MissingBallot { call: call.name() });
        }
        (call, Some(_)) if call.is_deploy() => return Err(TransactionError::UnexpectedBallot),
        _ => {}
    }
    tx.verify_signature()
}
