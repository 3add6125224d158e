//! 20-byte EVM account address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),
    #[error("address must be 40 hex digits: {0}")]
    BadLength(String),
    #[error("address is not valid hex: {0}")]
    BadHex(String),
}

/// EVM address. Parsed from and printed as `0x`-prefixed hex; checksum case is ignored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;
        if digits.len() != 40 {
            return Err(AddressError::BadLength(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::BadHex(s.to_string()))?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_checksummed() {
        let addr: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();
        assert_eq!(addr.0[0], 0xc0);
        assert_eq!(addr.0[19], 0xc2);
        assert_eq!(addr.to_string(), "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    }

    #[test]
    fn test_address_rejects_malformed() {
        assert!(matches!(
            "C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse::<Address>(),
            Err(AddressError::MissingPrefix(_))
        ));
        assert!(matches!("0x1234".parse::<Address>(), Err(AddressError::BadLength(_))));
        assert!(matches!(
            "0xZZ2aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse::<Address>(),
            Err(AddressError::BadHex(_))
        ));
    }

    #[test]
    fn test_address_serde() {
        let addr: Address = serde_json::from_str("\"0xdAC17F958D2ee523a2206206994597C13D831ec7\"").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0xdac17f958d2ee523a2206206994597c13d831ec7\"");
    }
}
