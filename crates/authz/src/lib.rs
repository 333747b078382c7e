//! Caller identities and owner-only authorization.
//!
//! Every call reaching the registry carries an [`Address`] that the identity
//! layer has already verified. This crate does not authenticate anything; it
//! only parses addresses and answers "is this caller the owner?".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Revert reason returned to non-owner callers of owner-only operations.
pub const NOT_OWNER_REASON: &str = "Ownable: caller is not the owner";

const ADDRESS_LEN: usize = 20;

/// A 20-byte account address, written as `0x` followed by 40 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address must have {expected} hex digits, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("address is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::Length {
                expected: ADDRESS_LEN * 2,
                actual: digits.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Authorization failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Ownable: caller is not the owner")]
    NotOwner { caller: Address },
}

/// Single-role access check: the owner is fixed when the guard is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerGuard {
    owner: Address,
}

impl OwnerGuard {
    pub const fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Succeeds only when `caller` is the owner.
    pub fn ensure(&self, caller: Address) -> Result<(), AuthzError> {
        if caller == self.owner {
            Ok(())
        } else {
            tracing::debug!(%caller, owner = %self.owner, "rejected non-owner caller");
            Err(AuthzError::NotOwner { caller })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn parses_mixed_case_and_displays_lowercase() {
        let address: Address = DEPLOYER.parse().unwrap();
        assert_eq!(
            address.to_string(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(address, DEPLOYER.to_lowercase().parse().unwrap());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert_eq!(
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse::<Address>(),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!(
            "0x1234".parse::<Address>(),
            Err(AddressError::Length {
                expected: 40,
                actual: 4
            })
        );
        assert_eq!(
            "0xzz9fd6e51aad88f6f4ce6ab8827279cfffb92266".parse::<Address>(),
            Err(AddressError::Hex(hex::FromHexError::InvalidHexCharacter {
                c: 'z',
                index: 0
            }))
        );
    }

    #[test]
    fn serde_uses_the_hex_string_form() {
        let address: Address = DEPLOYER.parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266\"");

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        assert!(serde_json::from_str::<Address>("\"not-an-address\"").is_err());
    }

    #[test]
    fn owner_guard_only_admits_the_owner() {
        let owner = Address::from_bytes([1; 20]);
        let other = Address::from_bytes([2; 20]);
        let guard = OwnerGuard::new(owner);

        assert_eq!(guard.owner(), owner);
        assert!(guard.ensure(owner).is_ok());

        let err = guard.ensure(other).unwrap_err();
        assert_eq!(err, AuthzError::NotOwner { caller: other });
        assert_eq!(err.to_string(), "Ownable: caller is not the owner");
    }
}
