//! Contacts resolution
//!
//! A contacts query is either a public key, resolved directly, or a search
//! string matched against the name and email of a set of peers. The response
//! also carries a peer list the client can search next.

use crate::codec::AddressCodec;
use crate::directory::{Directory, DirectoryError, NodeRecord};
use serde::{Deserialize, Serialize};

/// Contacts query sent by a signaling client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsQuery {
    /// Public key, name fragment or email fragment
    pub query: String,
    /// Peer keys to search
    pub peers: Vec<String>,
}

/// Contacts query response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsResponse {
    /// Records matching the query
    pub matches: Vec<NodeRecord>,
    /// Peer keys to continue the search from
    pub peers: Vec<String>,
}

/// Resolve a contacts query against a directory
///
/// 1. If `query` is a key the directory knows, its record is the first match.
/// 2. Otherwise, if no peers were given, the local peer list is returned so
///    the client can search from there.
/// 3. Every given peer the directory knows is matched against `query`; the
///    peer list of the last peer that reports one replaces the response peers.
///
/// Lookup failures for individual peers are skipped.
///
/// # Errors
///
/// Fails only when the local peer list is needed and cannot be fetched.
pub fn resolve_contacts<D: Directory + ?Sized>(
    directory: &D,
    codec: &AddressCodec,
    query: &ContactsQuery,
) -> Result<ContactsResponse, DirectoryError> {
    let mut response = ContactsResponse::default();

    match directory.node_info(&query.query) {
        Ok(info) => {
            tracing::debug!("Contacts query resolved as key {}", query.query);
            response
                .matches
                .push(NodeRecord::from_info(&query.query, info, codec));
        }
        Err(e) if query.peers.is_empty() => {
            tracing::debug!("Contacts query is not a known key ({}), listing peers", e);
            response.peers = directory.peers()?;
        }
        Err(_) => {}
    }

    for peer in &query.peers {
        let info = match directory.node_info(peer) {
            Ok(info) => info,
            Err(e) => {
                tracing::debug!("Skipping peer {}: {}", peer, e);
                continue;
            }
        };

        let record = NodeRecord::from_info(peer, info, codec);
        if record.matches(&query.query) {
            response.matches.push(record);
        }

        if let Ok(peers) = directory.remote_peers(peer) {
            response.peers = peers;
        }
    }

    tracing::debug!(
        "Contacts query matched {} records, {} peers",
        response.matches.len(),
        response.peers.len()
    );

    Ok(response)
}
