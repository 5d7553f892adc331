//! Node Identity
//!
//! This module provides the NodeId type, a 256-bit identifier used as the key
//! of every ignore/tried set in the bootstrapping layer. NodeIds are derived
//! from the compressed SEC1 encoding of a node's secp256k1 public key using
//! BLAKE3 hashing with a domain-separation tag.

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Domain-separation tag mixed into every NodeId derivation
const NODE_ID_DOMAIN: &[u8] = b"waymark-node-id";

/// Set of node identities a sampling call must not return
pub type ExclusionSet = HashSet<NodeId>;

/// 256-bit node identifier
///
/// NodeIds are derived from public keys using the BLAKE3 hash function.
/// Derivation is a pure function of the key bytes, so the same key always
/// maps to the same NodeId across calls and process restarts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId([u8; NodeId::LEN]);

impl NodeId {
    /// Number of bytes in a NodeId
    pub const LEN: usize = 32;

    /// Derive the NodeId of a public key
    ///
    /// Hashes the 33-byte compressed encoding of the key. The compressed
    /// encoding is canonical, so two equal keys always produce the same
    /// identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use secp256k1::{PublicKey, Secp256k1, SecretKey};
    /// use waymark_bootstrap::NodeId;
    ///
    /// let secp = Secp256k1::new();
    /// let sk = SecretKey::from_slice(&[7u8; 32]).unwrap();
    /// let pk = PublicKey::from_secret_key(&secp, &sk);
    ///
    /// assert_eq!(NodeId::from_public_key(&pk), NodeId::from_public_key(&pk));
    /// ```
    #[must_use]
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&public_key.serialize());
        hasher.update(NODE_ID_DOMAIN);
        Self(*hasher.finalize().as_bytes())
    }

    /// Get the raw bytes of the NodeId
    ///
    /// # Examples
    ///
    /// ```
    /// use waymark_bootstrap::NodeId;
    ///
    /// let id = NodeId::from_bytes([42u8; 32]);
    /// assert_eq!(id.as_bytes(), &[42u8; 32]);
    /// ```
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Create NodeId from raw bytes
    ///
    /// Used when identities are persisted or received already derived.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }
}

impl From<&PublicKey> for NodeId {
    fn from(public_key: &PublicKey) -> Self {
        Self::from_public_key(public_key)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
