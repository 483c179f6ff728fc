//! Ethereum-style hex encodings.
//!
//! JSON-RPC numeric fields travel as minimal `0x`-prefixed hex quantities
//! (`0x0`, `0x41`, never `0x041`); opaque byte payloads travel as
//! even-length `0x`-prefixed hex data (`0x` for empty). These helpers are
//! the single point where those conventions live.

use crate::error::{CoreError, Result};

/// Encode an unsigned quantity as minimal `0x`-hex.
pub fn encode_quantity(value: u128) -> String {
    format!("{value:#x}")
}

/// Decode a `0x`-hex quantity. Rejects missing prefix and empty digits.
pub fn decode_quantity(text: &str) -> Result<u128> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| CoreError::invalid(format!("quantity missing 0x prefix: {text:?}")))?;
    if digits.is_empty() {
        return Err(CoreError::invalid("quantity has no digits"));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|err| CoreError::invalid(format!("bad quantity {text:?}: {err}")))
}

/// Encode opaque bytes as `0x`-hex data.
pub fn encode_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-hex data into bytes. `0x` decodes to empty.
pub fn decode_data(text: &str) -> Result<Vec<u8>> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| CoreError::invalid(format!("data missing 0x prefix: {text:?}")))?;
    hex::decode(digits).map_err(|err| CoreError::invalid(format!("bad hex data: {err}")))
}

/// Serde adapter rendering `u128` fields as `0x`-hex quantity strings.
///
/// JSON numbers cap out at 64 bits, so wide balances and values must
/// travel as strings; the hex form keeps them aligned with the RPC
/// surface.
pub mod hex_quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a quantity as a minimal `0x`-hex string.
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_quantity(*value))
    }

    /// Deserialize a `0x`-hex string into a quantity.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode_quantity(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter rendering `Vec<u8>` fields as `0x`-hex data strings.
///
/// Applied with `#[serde(with = "stele_core::encoding::hex_bytes")]` so
/// transaction inputs and contract bytecode stay readable in JSON.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a `0x`-hex string.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_data(bytes))
    }

    /// Deserialize a `0x`-hex string into bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode_data(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quantity_is_minimal() {
        assert_eq!(encode_quantity(0), "0x0");
        assert_eq!(encode_quantity(1), "0x1");
        assert_eq!(encode_quantity(0x41), "0x41");
        assert_eq!(encode_quantity(1024), "0x400");
    }

    #[test]
    fn quantity_rejects_malformed() {
        assert!(decode_quantity("41").is_err());
        assert!(decode_quantity("0x").is_err());
        assert!(decode_quantity("0xzz").is_err());
    }

    #[test]
    fn data_round_trips_empty() {
        assert_eq!(encode_data(&[]), "0x");
        assert_eq!(decode_data("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn data_rejects_odd_length() {
        assert!(decode_data("0xabc").is_err());
    }

    proptest! {
        #[test]
        fn quantity_round_trips(value: u128) {
            prop_assert_eq!(decode_quantity(&encode_quantity(value)).unwrap(), value);
        }

        #[test]
        fn data_round_trips(bytes: Vec<u8>) {
            prop_assert_eq!(decode_data(&encode_data(&bytes)).unwrap(), bytes);
        }
    }
}
