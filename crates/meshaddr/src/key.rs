//! Public key input type.

use crate::PUBLIC_KEY_SIZE;
use crate::error::AddrError;
use std::fmt;
use std::str::FromStr;

/// 32-byte public key of a mesh peer
///
/// Keys travel as 64 hexadecimal characters. Parsing is case-insensitive and
/// rejects anything that does not decode to exactly 32 bytes; there is no
/// truncation or padding of short or long input.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Create a key from raw bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a hex-encoded key
    ///
    /// # Errors
    ///
    /// Returns [`AddrError::InvalidKeyHex`] for non-hex input (including odd
    /// length) and [`AddrError::InvalidKeyLength`] when the decoded length is
    /// not 32 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshaddr::PublicKey;
    ///
    /// assert!(PublicKey::from_hex(&"AB".repeat(32)).is_ok());
    /// assert!(PublicKey::from_hex(&"ab".repeat(31)).is_err());
    /// ```
    pub fn from_hex(hex_key: &str) -> Result<Self, AddrError> {
        let decoded = hex::decode(hex_key)?;
        let bytes: [u8; PUBLIC_KEY_SIZE] =
            decoded
                .try_into()
                .map_err(|rejected: Vec<u8>| AddrError::InvalidKeyLength {
                    expected: PUBLIC_KEY_SIZE,
                    actual: rejected.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Get the raw key bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Lowercase hex encoding of the key
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for PublicKey {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_mixed_case() {
        let lower = PublicKey::from_hex(&"ab".repeat(32)).unwrap();
        let upper = PublicKey::from_hex(&"AB".repeat(32)).unwrap();
        let mixed = PublicKey::from_hex(&"aB".repeat(32)).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
        assert_eq!(lower.as_bytes(), &[0xAB; 32]);
    }

    #[test]
    fn test_from_hex_empty() {
        let err = PublicKey::from_hex("").unwrap_err();
        assert_eq!(
            err,
            AddrError::InvalidKeyLength {
                expected: 32,
                actual: 0
            }
        );
    }

    #[test]
    fn test_from_hex_wrong_lengths() {
        for len in [1usize, 16, 31, 33, 64] {
            let err = PublicKey::from_hex(&"00".repeat(len)).unwrap_err();
            assert_eq!(
                err,
                AddrError::InvalidKeyLength {
                    expected: 32,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn test_from_hex_not_hex() {
        assert!(matches!(
            PublicKey::from_hex(&"zz".repeat(32)),
            Err(AddrError::InvalidKeyHex(_))
        ));
        // 63 characters: odd length
        assert!(matches!(
            PublicKey::from_hex(&"a".repeat(63)),
            Err(AddrError::InvalidKeyHex(_))
        ));
    }

    #[test]
    fn test_parse_and_display() {
        let hex_key = "0123456789abcdef".repeat(4);
        let key: PublicKey = hex_key.parse().unwrap();
        assert_eq!(key.to_string(), hex_key);
        assert!(format!("{key:?}").contains("0123456789abcdef"));
    }
}
