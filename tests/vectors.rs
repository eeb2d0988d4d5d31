//! Address derivation test vectors.
//!
//! Fixed keys with hand-checked addresses. Any change to these outputs changes
//! the address of real peers on the mesh.

use meshaddr::{
    AddrError, AddressCodec, DerivedAddress, NetworkPrefix, RunLengthPolicy, derive_address,
    derive_prefix,
};

fn addr(hex_addr: &str) -> DerivedAddress {
    let bytes = hex::decode(hex_addr).unwrap();
    DerivedAddress::from_bytes(bytes.try_into().unwrap())
}

// ============================================================================
// Reference Vectors
// ============================================================================

#[test]
fn test_vector_a_all_ones_key() {
    let derived = derive_address(&"f".repeat(64)).unwrap();
    assert_eq!(derived, addr("fc000000000000000000000000000000"));
    assert_eq!(derived.to_string(), "fc00::");
}

#[test]
fn test_vector_b_all_zeros_key_wraps() {
    let derived = derive_address(&"0".repeat(64)).unwrap();
    assert_eq!(derived, addr("fc000000000000000000000000000000"));
}

#[test]
fn test_vectors_a_and_b_collide() {
    assert_eq!(
        derive_address(&"f".repeat(64)).unwrap(),
        derive_address(&"0".repeat(64)).unwrap()
    );
}

#[test]
fn test_vector_uppercase_key() {
    let lower = derive_address(&format!("3c{}", "00".repeat(31))).unwrap();
    let upper = derive_address(&format!("3C{}", "00".repeat(31))).unwrap();
    assert_eq!(lower, upper);
    assert_eq!(lower, addr("fc021fffffffffffffffffffffffffff"));
}

#[test]
fn test_vector_alternating_bits() {
    // 0x55 inverts to 1010_1010: run of 1, terminator, then the stream
    // continues "10" repeated, which packs to 0xAA bytes
    let derived = derive_address(&"55".repeat(32)).unwrap();
    assert_eq!(derived, addr("fc01aaaaaaaaaaaaaaaaaaaaaaaaaaaa"));
}

#[test]
fn test_vector_truncated_tail() {
    // Inverted: 1111_0000 then 0xA5 repeated. Run of 4, terminator, then
    // 000 + (1010_0101)* -> 0001_0100 1010_0101 ... shifted by 3 bits
    let key = format!("0f{}", "5a".repeat(31));
    let derived = derive_address(&key).unwrap();
    assert_eq!(derived, addr("fc0414b4b4b4b4b4b4b4b4b4b4b4b4b4"));
}

// ============================================================================
// Rejection
// ============================================================================

#[test]
fn test_rejects_empty() {
    assert!(derive_address("").unwrap_err().is_invalid_key());
}

#[test]
fn test_rejects_non_hex() {
    assert!(matches!(
        derive_address(&"zz".repeat(32)),
        Err(AddrError::InvalidKeyHex(_))
    ));
    assert!(matches!(
        derive_address(&format!("{}g", "0".repeat(63))),
        Err(AddrError::InvalidKeyHex(_))
    ));
}

#[test]
fn test_rejects_wrong_lengths() {
    for len in [16usize, 31, 33] {
        assert_eq!(
            derive_address(&"ff".repeat(len)),
            Err(AddrError::InvalidKeyLength {
                expected: 32,
                actual: len
            })
        );
    }
}

#[test]
fn test_rejects_surrounding_whitespace() {
    let key = format!(" {} ", "ff".repeat(32));
    assert!(derive_address(&key).unwrap_err().is_invalid_key());
}

// ============================================================================
// Prefix Convention
// ============================================================================

#[test]
fn test_builtin_prefix() {
    assert_eq!(derive_prefix().as_bytes(), &[0xFC]);
    assert_eq!(AddressCodec::default().prefix(), &derive_prefix());
}

#[test]
fn test_alternate_prefix() {
    let codec = AddressCodec::new(NetworkPrefix::from_hex("fd00").unwrap());
    let derived = codec.derive_hex(&"55".repeat(32)).unwrap();
    assert_eq!(derived, addr("fd0001aaaaaaaaaaaaaaaaaaaaaaaaaa"));
}

#[test]
fn test_strict_policies_on_vector_b() {
    for policy in [RunLengthPolicy::RejectOverflow, RunLengthPolicy::RejectReserved] {
        let codec = AddressCodec::mesh().with_policy(policy);
        assert_eq!(
            codec.derive_hex(&"0".repeat(64)),
            Err(AddrError::RunLengthOverflow(256))
        );
        // Vector A is unaffected
        assert!(codec.derive_hex(&"f".repeat(64)).is_ok());
    }
}
