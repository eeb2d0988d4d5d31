//! Fuzz test for directory snapshots and contacts resolution
//!
//! Untrusted snapshot JSON must parse or fail cleanly, and resolving a query
//! over whatever parsed must not panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use meshaddr::{AddressCodec, ContactsQuery, MemoryDirectory, resolve_contacts};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(directory) = MemoryDirectory::from_json(s) else {
        return;
    };

    let codec = AddressCodec::mesh();
    let peers: Vec<String> = directory.nodes.keys().cloned().collect();
    let query = ContactsQuery {
        query: String::new(),
        peers,
    };

    if let Ok(response) = resolve_contacts(&directory, &codec, &query) {
        assert!(response.matches.len() >= directory.nodes.len());
        assert!(serde_json::to_string(&response).is_ok());
    }
});
