//! Directory peer records
//!
//! The mesh directory service answers three lookups: the metadata published
//! under a key, the peers a remote node knows, and the peers of the local
//! node. [`Directory`] is the seam for those lookups; transports live outside
//! this crate. [`MemoryDirectory`] serves them from a JSON snapshot.

use crate::codec::AddressCodec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Directory lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Directory has no entry for the key
    #[error("no directory entry for key {0}")]
    NotFound(String),

    /// Directory answered with a non-success status
    #[error("directory returned status: {0}")]
    Status(String),

    /// Directory could not be reached
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// Directory response could not be decoded
    #[error("malformed directory response: {0}")]
    Malformed(String),
}

/// Metadata a peer publishes in the directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Avatar reference
    pub avatar: String,
}

/// Peer record presented to signaling clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Derived mesh address, absent when the key does not derive one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Hex public key the record was resolved for
    pub key: String,
    /// Avatar reference
    #[serde(default)]
    pub avatar: String,
}

impl NodeRecord {
    /// Build a record for `key` from its directory metadata
    ///
    /// Keys come from an untrusted directory. A key that fails derivation
    /// yields a record without an address rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshaddr::{AddressCodec, NodeInfo, NodeRecord};
    ///
    /// let codec = AddressCodec::default();
    /// let record = NodeRecord::from_info(&"f".repeat(64), NodeInfo::default(), &codec);
    /// assert_eq!(record.address.as_deref(), Some("fc00::"));
    ///
    /// let record = NodeRecord::from_info("not-a-key", NodeInfo::default(), &codec);
    /// assert!(record.address.is_none());
    /// ```
    #[must_use]
    pub fn from_info(key: &str, info: NodeInfo, codec: &AddressCodec) -> Self {
        let address = match codec.derive_hex(key) {
            Ok(addr) => Some(addr.to_string()),
            Err(e) => {
                tracing::warn!("Omitting address for directory key {:?}: {}", key, e);
                None
            }
        };
        Self {
            name: info.name,
            email: info.email,
            address,
            key: key.to_string(),
            avatar: info.avatar,
        }
    }

    /// Whether the name or email contains `query` (case-sensitive)
    ///
    /// The empty query matches every record.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.email.contains(query) || self.name.contains(query)
    }
}

/// Directory lookups used by contacts resolution
pub trait Directory {
    /// Metadata published under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory has no entry or cannot be queried.
    fn node_info(&self, key: &str) -> Result<NodeInfo, DirectoryError>;

    /// Keys of the peers known to the remote node `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot answer for `key`.
    fn remote_peers(&self, key: &str) -> Result<Vec<String>, DirectoryError>;

    /// Keys of the local node's peers
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be queried.
    fn peers(&self) -> Result<Vec<String>, DirectoryError>;
}

/// In-memory directory loaded from a JSON snapshot
///
/// Snapshot format:
///
/// ```json
/// {
///   "nodes": { "<key>": { "name": "...", "email": "...", "avatar": "..." } },
///   "remote_peers": { "<key>": ["<key>", "..."] },
///   "peers": ["<key>", "..."]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryDirectory {
    /// Published metadata by key
    pub nodes: HashMap<String, NodeInfo>,
    /// Peer lists of remote nodes by key
    pub remote_peers: HashMap<String, Vec<String>>,
    /// Peers of the local node
    pub peers: Vec<String>,
}

impl MemoryDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Malformed`] if the snapshot is not valid JSON
    /// of the expected shape.
    pub fn from_json(snapshot: &str) -> Result<Self, DirectoryError> {
        serde_json::from_str(snapshot).map_err(|e| DirectoryError::Malformed(e.to_string()))
    }

    /// Add or replace a node entry
    pub fn insert_node(&mut self, key: impl Into<String>, info: NodeInfo) {
        self.nodes.insert(key.into(), info);
    }

    /// Set the peer list a remote node reports
    pub fn set_remote_peers(&mut self, key: impl Into<String>, peers: Vec<String>) {
        self.remote_peers.insert(key.into(), peers);
    }
}

impl Directory for MemoryDirectory {
    fn node_info(&self, key: &str) -> Result<NodeInfo, DirectoryError> {
        self.nodes
            .get(key)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(key.to_string()))
    }

    fn remote_peers(&self, key: &str) -> Result<Vec<String>, DirectoryError> {
        self.remote_peers
            .get(key)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(key.to_string()))
    }

    fn peers(&self) -> Result<Vec<String>, DirectoryError> {
        Ok(self.peers.clone())
    }
}
