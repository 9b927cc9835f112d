//! 20-byte `0x`-prefixed identifiers for voters and ballot instances.

use crate::error::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of raw bytes in an address.
pub const ADDRESS_LEN: usize = 20;

/// The textual prefix of every address.
pub const PREFIX: &str = "0x";

fn parse_address(s: &str) -> Result<[u8; ADDRESS_LEN], TypesError> {
    let body = s
        .strip_prefix(PREFIX)
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| TypesError::InvalidAddress(format!("{s}: missing 0x prefix")))?;
    if body.len() != ADDRESS_LEN * 2 {
        return Err(TypesError::InvalidAddress(format!(
            "{s}: expected {} hex characters, got {}",
            ADDRESS_LEN * 2,
            body.len()
        )));
    }
    let mut out = [0u8; ADDRESS_LEN];
    hex::decode_to_slice(body, &mut out)
        .map_err(|e| TypesError::InvalidAddress(format!("{s}: {e}")))?;
    Ok(out)
}

/// Implements the shared textual form (`0x` + 40 lowercase hex chars) and
/// string-based serde for an address newtype.
macro_rules! address_type {
    ($name:ident) => {
        impl $name {
            pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
                &self.0
            }

            /// Build from the trailing 20 bytes of a 32-byte digest.
            pub fn from_digest(digest: &[u8; 32]) -> Self {
                let mut bytes = [0u8; ADDRESS_LEN];
                bytes.copy_from_slice(&digest[32 - ADDRESS_LEN..]);
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", PREFIX, hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_address(s.trim()).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Identity of a voter: the caller of every ballot operation.
///
/// Derived from the signer's public key (see `ballot_crypto::derive_voter_id`).
/// Two identities are equal iff their bytes are equal; the textual form is
/// case-insensitive on input and always lowercase on output.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoterId([u8; ADDRESS_LEN]);

address_type!(VoterId);

/// Identifies one deployed ballot instance on a node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BallotId([u8; ADDRESS_LEN]);

address_type!(BallotId);
