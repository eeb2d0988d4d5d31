//! Fuzz test for address derivation
//!
//! Arbitrary input must either derive a prefixed 16-byte address or fail as
//! an invalid key, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use meshaddr::{AddressCodec, PublicKey, RunLengthPolicy};

fuzz_target!(|data: &[u8]| {
    let codec = AddressCodec::mesh();

    // Test 1: input as a hex key string
    if let Ok(s) = std::str::from_utf8(data) {
        match codec.derive_hex(s) {
            Ok(addr) => {
                assert_eq!(s.len(), 64, "only 64 hex chars derive an address");
                assert!(codec.has_prefix(&addr));
            }
            Err(e) => assert!(e.is_invalid_key()),
        }
    }

    // Test 2: raw bytes as a key, every policy
    if data.len() == 32 {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(data);
        let key = PublicKey::from_bytes(bytes);

        let wrapping = codec.derive(&key).expect("wrapping policy never fails");
        let hex_key = key.to_hex();
        assert_eq!(codec.derive_hex(&hex_key).ok(), Some(wrapping));

        for policy in [RunLengthPolicy::RejectOverflow, RunLengthPolicy::RejectReserved] {
            if let Ok(strict) = codec.with_policy(policy).derive(&key) {
                assert_eq!(strict, wrapping);
            }
        }
    }
});
