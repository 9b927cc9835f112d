//! Fixed-length proposal labels.

use crate::error::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A short text label stored in a 32-byte, zero-padded slot.
///
/// At most 31 UTF-8 bytes so the slot always ends in a zero byte, and no
/// interior NUL bytes so the padding is unambiguous.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProposalName(String);

impl ProposalName {
    /// Size of the stored slot.
    pub const SLOT_LEN: usize = 32;

    /// Longest label that fits the slot.
    pub const MAX_LEN: usize = Self::SLOT_LEN - 1;

    pub fn new(label: impl Into<String>) -> Result<Self, TypesError> {
        let label = label.into();
        if label.len() > Self::MAX_LEN {
            return Err(TypesError::NameTooLong {
                len: label.len(),
                max: Self::MAX_LEN,
            });
        }
        if label.contains('\0') {
            return Err(TypesError::InvalidName(
                "label contains a NUL byte".to_string(),
            ));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The zero-padded 32-byte slot.
    pub fn to_bytes32(&self) -> [u8; 32] {
        let mut out = [0u8; Self::SLOT_LEN];
        out[..self.0.len()].copy_from_slice(self.0.as_bytes());
        out
    }

    /// Decode a zero-padded slot. The last byte must be zero.
    pub fn from_bytes32(slot: &[u8; 32]) -> Result<Self, TypesError> {
        if slot[Self::MAX_LEN] != 0 {
            return Err(TypesError::InvalidName("slot is not terminated".to_string()));
        }
        let end = slot.iter().position(|b| *b == 0).unwrap_or(Self::MAX_LEN);
        if slot[end..].iter().any(|b| *b != 0) {
            return Err(TypesError::InvalidName(
                "data after terminator".to_string(),
            ));
        }
        let label = std::str::from_utf8(&slot[..end])
            .map_err(|e| TypesError::InvalidName(e.to_string()))?;
        Ok(Self(label.to_string()))
    }
}

impl fmt::Display for ProposalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ProposalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProposalName({:?})", self.0)
    }
}

impl FromStr for ProposalName {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ProposalName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProposalName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_round_trip() {
        let name = ProposalName::new("Proposal 1").unwrap();
        let slot = name.to_bytes32();
        assert_eq!(&slot[..10], b"Proposal 1");
        assert!(slot[10..].iter().all(|b| *b == 0));
        assert_eq!(ProposalName::from_bytes32(&slot).unwrap(), name);
    }

    #[test]
    fn thirty_one_bytes_fit() {
        let label = "x".repeat(31);
        assert!(ProposalName::new(label).is_ok());
    }

    #[test]
    fn thirty_two_bytes_rejected() {
        let err = ProposalName::new("x".repeat(32)).unwrap_err();
        assert_eq!(err, TypesError::NameTooLong { len: 32, max: 31 });
    }

    #[test]
    fn multibyte_length_counts_bytes() {
        // 16 chars, 32 bytes
        assert!(ProposalName::new("é".repeat(16)).is_err());
        assert!(ProposalName::new("é".repeat(15)).is_ok());
    }

    #[test]
    fn interior_nul_rejected() {
        assert!(ProposalName::new("a\0b").is_err());
    }

    #[test]
    fn empty_label_allowed() {
        let name = ProposalName::new("").unwrap();
        assert_eq!(name.to_bytes32(), [0u8; 32]);
        assert_eq!(ProposalName::from_bytes32(&[0u8; 32]).unwrap(), name);
    }

    #[test]
    fn unterminated_slot_rejected() {
        assert!(ProposalName::from_bytes32(&[b'a'; 32]).is_err());
    }

    #[test]
    fn data_after_terminator_rejected() {
        let mut slot = [0u8; 32];
        slot[0] = b'a';
        slot[5] = b'b';
        assert!(ProposalName::from_bytes32(&slot).is_err());
    }
}
