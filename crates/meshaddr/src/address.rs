//! Derived 128-bit mesh address.

use crate::ADDRESS_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;

/// 128-bit network address derived from a public key
///
/// Layout under a prefix of `L` bytes:
///
/// ```text
/// | prefix (L) | run length (1) | remainder (16 - L - 1) |
/// ```
///
/// The value is plain data. Interpreting the run-length byte requires the
/// prefix length, which is why the accessors for it live on
/// [`AddressCodec`](crate::AddressCodec).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DerivedAddress([u8; ADDRESS_SIZE]);

impl DerivedAddress {
    /// Create an address from raw bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use meshaddr::DerivedAddress;
    ///
    /// let mut bytes = [0u8; 16];
    /// bytes[0] = 0xfc;
    /// let addr = DerivedAddress::from_bytes(bytes);
    /// assert_eq!(addr.to_string(), "fc00::");
    /// ```
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw address bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Consume the address, returning the raw bytes
    #[must_use]
    pub const fn into_bytes(self) -> [u8; ADDRESS_SIZE] {
        self.0
    }

    /// View the address as an IPv6 address
    #[must_use]
    pub const fn to_ipv6(&self) -> Ipv6Addr {
        Ipv6Addr::from_bits(u128::from_be_bytes(self.0))
    }
}

impl From<DerivedAddress> for Ipv6Addr {
    fn from(addr: DerivedAddress) -> Self {
        addr.to_ipv6()
    }
}

impl From<Ipv6Addr> for DerivedAddress {
    fn from(ip: Ipv6Addr) -> Self {
        Self(ip.octets())
    }
}

impl fmt::Debug for DerivedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedAddress({})", self.to_ipv6())
    }
}

/// Standard colon-separated hextet form
impl fmt::Display for DerivedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_ipv6(), f)
    }
}
