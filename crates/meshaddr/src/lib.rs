//! # meshaddr
//!
//! Deterministic address derivation for the mesh overlay.
//!
//! This crate provides:
//! - Forward derivation of a 128-bit network address from a 32-byte public key
//! - The network prefix convention the derived addresses live under
//! - Directory peer records with the derived address attached
//! - Contacts resolution over any [`Directory`] implementation
//!
//! ## Address Layout
//!
//! ```text
//! | prefix (L bytes) | run length (1 byte) | remainder (16 - L - 1 bytes) |
//! ```
//!
//! The run length counts the leading 1-bits of the bitwise-inverted key. The
//! bits after the first 0-bit are packed into the remainder, truncated to fit.
//!
//! ## Example
//!
//! ```
//! use meshaddr::derive_address;
//!
//! let addr = derive_address(&"f".repeat(64)).expect("valid key");
//! assert_eq!(addr.to_string(), "fc00::");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod codec;
pub mod contacts;
pub mod directory;
pub mod error;
pub mod key;
pub mod prefix;

pub use address::DerivedAddress;
pub use codec::{AddressCodec, RunLengthPolicy};
pub use contacts::{ContactsQuery, ContactsResponse, resolve_contacts};
pub use directory::{Directory, DirectoryError, MemoryDirectory, NodeInfo, NodeRecord};
pub use error::AddrError;
pub use key::PublicKey;
pub use prefix::{NetworkPrefix, derive_prefix};

/// Public key size in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Public key size in bits
pub const PUBLIC_KEY_BITS: usize = PUBLIC_KEY_SIZE * 8;

/// Derived address size in bytes
pub const ADDRESS_SIZE: usize = 16;

/// Hex literal of the built-in network prefix
pub const DEFAULT_PREFIX_HEX: &str = "fc";

/// Derive the address for a hex-encoded public key under the built-in prefix.
///
/// Uses the wrapping run-length policy, which is bit-for-bit compatible with
/// addresses already deployed on the mesh.
///
/// # Errors
///
/// Returns [`AddrError::InvalidKeyHex`] or [`AddrError::InvalidKeyLength`] if
/// `hex_key` is not the hex encoding of exactly 32 bytes.
pub fn derive_address(hex_key: &str) -> Result<DerivedAddress, AddrError> {
    AddressCodec::default().derive_hex(hex_key)
}
