//! Contacts resolution against directory snapshots.
//!
//! Exercises the path a signaling client query takes: JSON request, snapshot
//! directory, derived addresses in the JSON response.

use meshaddr::{
    AddressCodec, ContactsQuery, ContactsResponse, Directory, DirectoryError, MemoryDirectory,
    NetworkPrefix, NodeInfo, resolve_contacts,
};
use serde_json::json;

const ALICE: &str = "3c00000000000000000000000000000000000000000000000000000000000000";
const BOB: &str = "5555555555555555555555555555555555555555555555555555555555555555";

fn snapshot() -> MemoryDirectory {
    let snapshot = json!({
        "nodes": {
            ALICE: { "name": "Alice", "email": "alice@mesh.example", "avatar": "alice.png" },
            BOB: { "name": "Bob", "email": "bob@mesh.example" },
            "deadbeef": { "name": "Broken", "email": "broken@mesh.example" }
        },
        "remote_peers": {
            ALICE: [BOB],
            BOB: [ALICE, "deadbeef"]
        },
        "peers": [ALICE, BOB]
    });
    MemoryDirectory::from_json(&snapshot.to_string()).unwrap()
}

#[test]
fn test_key_lookup_response_json() {
    let query: ContactsQuery = serde_json::from_value(json!({ "query": ALICE })).unwrap();
    let response = resolve_contacts(&snapshot(), &AddressCodec::default(), &query).unwrap();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "matches": [{
                "name": "Alice",
                "email": "alice@mesh.example",
                "address": "fc02:1fff:ffff:ffff:ffff:ffff:ffff:ffff",
                "key": ALICE,
                "avatar": "alice.png"
            }],
            "peers": []
        })
    );
}

#[test]
fn test_search_walks_peer_lists() {
    let dir = snapshot();
    let codec = AddressCodec::default();

    // First hop: unknown query, no peers given
    let first = resolve_contacts(
        &dir,
        &codec,
        &ContactsQuery {
            query: "broken".to_string(),
            peers: vec![],
        },
    )
    .unwrap();
    assert!(first.matches.is_empty());
    assert_eq!(first.peers, [ALICE, BOB]);

    // Second hop: search the returned peers
    let second = resolve_contacts(
        &dir,
        &codec,
        &ContactsQuery {
            query: "broken".to_string(),
            peers: first.peers.clone(),
        },
    )
    .unwrap();
    assert!(second.matches.is_empty());
    assert_eq!(second.peers, [ALICE, "deadbeef"]);

    // Third hop reaches the record with an underivable key
    let third = resolve_contacts(
        &dir,
        &codec,
        &ContactsQuery {
            query: "broken".to_string(),
            peers: second.peers,
        },
    )
    .unwrap();
    assert_eq!(third.matches.len(), 1);
    assert_eq!(third.matches[0].key, "deadbeef");
    assert_eq!(third.matches[0].address, None);
    let json = serde_json::to_value(&third.matches[0]).unwrap();
    assert!(json.get("address").is_none());
}

#[test]
fn test_alternate_prefix_codec() {
    let codec = AddressCodec::new(NetworkPrefix::from_hex("fd00").unwrap());
    let query = ContactsQuery {
        query: "mesh.example".to_string(),
        peers: vec![BOB.to_string()],
    };
    let response = resolve_contacts(&snapshot(), &codec, &query).unwrap();
    assert_eq!(response.matches.len(), 1);
    assert_eq!(
        response.matches[0].address.as_deref(),
        Some("fd00:1aa:aaaa:aaaa:aaaa:aaaa:aaaa:aaaa")
    );
}

/// Directory that knows nodes but cannot list remote peers
struct NoRemotePeers(MemoryDirectory);

impl Directory for NoRemotePeers {
    fn node_info(&self, key: &str) -> Result<NodeInfo, DirectoryError> {
        self.0.node_info(key)
    }

    fn remote_peers(&self, _key: &str) -> Result<Vec<String>, DirectoryError> {
        Err(DirectoryError::Status("502 Bad Gateway".to_string()))
    }

    fn peers(&self) -> Result<Vec<String>, DirectoryError> {
        self.0.peers()
    }
}

#[test]
fn test_remote_peer_failures_keep_previous_list() {
    let dir = NoRemotePeers(snapshot());
    let query = ContactsQuery {
        query: "Bob".to_string(),
        peers: vec![ALICE.to_string(), BOB.to_string()],
    };
    let response = resolve_contacts(&dir, &AddressCodec::default(), &query).unwrap();
    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.matches[0].name, "Bob");
    assert!(response.peers.is_empty());
}

#[test]
fn test_trait_object_directory() {
    let dir: Box<dyn Directory> = Box::new(snapshot());
    let response =
        resolve_contacts(dir.as_ref(), &AddressCodec::default(), &ContactsQuery::default())
            .unwrap();
    assert_eq!(response, ContactsResponse {
        matches: vec![],
        peers: vec![ALICE.to_string(), BOB.to_string()],
    });
}
