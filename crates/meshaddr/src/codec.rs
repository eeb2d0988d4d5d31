//! Public key to address derivation
//!
//! The derivation inverts every bit of the key, counts the run of leading
//! ones, drops that run together with the 0-bit terminating it, and packs the
//! remaining bits behind the prefix and the run-length byte:
//!
//! ```text
//! inverted key:  1 1 1 0 | b b b b b b b b | b b b b b b b b | ... | b b b
//!                \_____/ ^  \_____________/   \_____________/        \___/
//!                run = 3 |   remainder[0]      remainder[1]        dropped
//!                   terminator
//! ```
//!
//! Bits left over after the last full remainder byte are discarded, and the
//! remainder is cut to whatever fits behind the prefix.

use crate::address::DerivedAddress;
use crate::error::AddrError;
use crate::key::PublicKey;
use crate::prefix::{NetworkPrefix, derive_prefix};
use crate::{ADDRESS_SIZE, PUBLIC_KEY_BITS, PUBLIC_KEY_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bit of the run-length byte reserved for the node/subnet distinction
pub const RESERVED_BIT: u8 = 0x80;

/// How run lengths that do not fit the address format are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunLengthPolicy {
    /// Truncate the run length to 8 bits. A key of all zeros (run of 256)
    /// wraps to 0 and collides with the all-ones key. Matches every address
    /// already derived on the mesh.
    #[default]
    Wrapping,
    /// Reject a run of 256 with [`AddrError::RunLengthOverflow`].
    RejectOverflow,
    /// Reject any run that sets the reserved bit (128 or more) with
    /// [`AddrError::ReservedBitSet`], and a run of 256 with
    /// [`AddrError::RunLengthOverflow`].
    RejectReserved,
}

impl RunLengthPolicy {
    /// Map a run of leading ones (0..=256) to the run-length byte
    ///
    /// # Errors
    ///
    /// Returns an error when the policy refuses the run length.
    pub fn encode(self, run_length: u16) -> Result<u8, AddrError> {
        match (self, u8::try_from(run_length)) {
            (Self::Wrapping, _) => Ok((run_length & 0xFF) as u8),
            (_, Err(_)) => Err(AddrError::RunLengthOverflow(run_length)),
            (Self::RejectReserved, Ok(byte)) if byte & RESERVED_BIT != 0 => {
                Err(AddrError::ReservedBitSet(run_length))
            }
            (_, Ok(byte)) => Ok(byte),
        }
    }

    /// Policy name as used in configuration files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wrapping => "wrapping",
            Self::RejectOverflow => "reject-overflow",
            Self::RejectReserved => "reject-reserved",
        }
    }
}

impl fmt::Display for RunLengthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunLengthPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrapping" => Ok(Self::Wrapping),
            "reject-overflow" => Ok(Self::RejectOverflow),
            "reject-reserved" => Ok(Self::RejectReserved),
            other => Err(format!(
                "unknown run-length policy '{other}' (expected wrapping, reject-overflow or reject-reserved)"
            )),
        }
    }
}

/// Result of scanning the inverted key
struct BitScan {
    /// Leading ones before the terminator, 0..=256
    run_length: u16,
    /// Packed bits after the terminator
    remainder: [u8; PUBLIC_KEY_SIZE],
    /// Number of complete bytes in `remainder`
    remainder_len: usize,
}

impl BitScan {
    fn run(inverted: &[u8; PUBLIC_KEY_SIZE]) -> Self {
        let mut scan = Self {
            run_length: 0,
            remainder: [0u8; PUBLIC_KEY_SIZE],
            remainder_len: 0,
        };
        let mut terminated = false;
        let mut pending = 0u8;
        let mut pending_bits = 0u8;

        for idx in 0..PUBLIC_KEY_BITS {
            let bit = (inverted[idx / 8] >> (7 - idx % 8)) & 1;
            if !terminated {
                if bit == 1 {
                    scan.run_length += 1;
                } else {
                    terminated = true;
                }
                continue;
            }
            pending = (pending << 1) | bit;
            pending_bits += 1;
            if pending_bits == 8 {
                scan.remainder[scan.remainder_len] = pending;
                scan.remainder_len += 1;
                pending = 0;
                pending_bits = 0;
            }
        }

        // Up to 7 bits are left in `pending`; they never form a byte.
        scan
    }

    fn remainder(&self) -> &[u8] {
        &self.remainder[..self.remainder_len]
    }
}

/// Forward encoder from public keys to mesh addresses
///
/// Holds only the network prefix and the run-length policy, both immutable.
/// Derivation is pure, so one codec can be shared freely across threads.
///
/// # Examples
///
/// ```
/// use meshaddr::{AddressCodec, PublicKey};
///
/// let codec = AddressCodec::default();
/// let key = PublicKey::from_bytes([0xFF; 32]);
/// let addr = codec.derive(&key).unwrap();
/// assert_eq!(addr.as_bytes()[..2], [0xFC, 0x00]);
/// assert!(codec.is_node_address(&addr));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressCodec {
    prefix: NetworkPrefix,
    policy: RunLengthPolicy,
}

impl AddressCodec {
    /// Create a codec with the wrapping run-length policy
    #[must_use]
    pub const fn new(prefix: NetworkPrefix) -> Self {
        Self {
            prefix,
            policy: RunLengthPolicy::Wrapping,
        }
    }

    /// Create a codec for the built-in mesh prefix
    #[must_use]
    pub fn mesh() -> Self {
        Self::new(derive_prefix())
    }

    /// Replace the run-length policy
    #[must_use]
    pub const fn with_policy(mut self, policy: RunLengthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Network prefix used by this codec
    #[must_use]
    pub const fn prefix(&self) -> &NetworkPrefix {
        &self.prefix
    }

    /// Run-length policy used by this codec
    #[must_use]
    pub const fn policy(&self) -> RunLengthPolicy {
        self.policy
    }

    /// Derive the address of a hex-encoded public key
    ///
    /// # Errors
    ///
    /// Returns an invalid-key error (see [`AddrError::is_invalid_key`]) when
    /// `hex_key` is not exactly 32 hex-encoded bytes, and a policy error when
    /// the run length is refused.
    pub fn derive_hex(&self, hex_key: &str) -> Result<DerivedAddress, AddrError> {
        let key = PublicKey::from_hex(hex_key)?;
        self.derive(&key)
    }

    /// Derive the address of a public key
    ///
    /// # Errors
    ///
    /// Only fails under a non-wrapping [`RunLengthPolicy`].
    pub fn derive(&self, key: &PublicKey) -> Result<DerivedAddress, AddrError> {
        let inverted = key.as_bytes().map(|byte| !byte);
        let scan = BitScan::run(&inverted);
        let run_byte = self.policy.encode(scan.run_length)?;

        let prefix = self.prefix.as_bytes();
        let mut out = [0u8; ADDRESS_SIZE];
        out[..prefix.len()].copy_from_slice(prefix);
        out[prefix.len()] = run_byte;

        let tail = &mut out[prefix.len() + 1..];
        let remainder = scan.remainder();
        let copied = tail.len().min(remainder.len());
        tail[..copied].copy_from_slice(&remainder[..copied]);

        tracing::trace!(
            run_length = scan.run_length,
            remainder_bytes = remainder.len(),
            "derived address for key {:?}",
            key
        );

        Ok(DerivedAddress::from_bytes(out))
    }

    /// Whether `addr` starts with this codec's prefix
    #[must_use]
    pub fn has_prefix(&self, addr: &DerivedAddress) -> bool {
        addr.as_bytes().starts_with(self.prefix.as_bytes())
    }

    /// Run-length byte of an address derived under this codec's prefix
    #[must_use]
    pub fn run_length_byte(&self, addr: &DerivedAddress) -> u8 {
        addr.as_bytes()[self.prefix.len()]
    }

    /// Whether `addr` is a node address: prefix matches and the reserved bit
    /// after the prefix is clear
    #[must_use]
    pub fn is_node_address(&self, addr: &DerivedAddress) -> bool {
        self.has_prefix(addr) && self.run_length_byte(addr) & RESERVED_BIT == 0
    }
}
