//! Channel Graph Access
//!
//! The channel graph is owned by the node's storage engine; the bootstrapper
//! only needs to walk it. This module defines that walking capability
//! ([`ChannelGraph`]) and a read-only node view ([`GraphNode`]), plus
//! [`MemoryGraph`], an in-memory graph that can be loaded from a JSON
//! snapshot.
//!
//! # Snapshot Format
//!
//! ```json
//! [
//!   {
//!     "public_key": "02...",
//!     "addresses": [{ "type": "tcp", "addr": "203.0.113.5:9735" }]
//!   }
//! ]
//! ```

pub mod sampler;

pub use sampler::{DEFAULT_MAX_ROUNDS, GraphBootstrapper};

use crate::address::NodeAddress;
use crate::error::GraphError;
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;

/// Read-only view of an authenticated node in the channel graph
pub trait GraphNode {
    /// The node's identity key
    fn public_key(&self) -> &PublicKey;

    /// Advertised endpoints, in the order the node announced them
    fn addresses(&self) -> &[NodeAddress];
}

/// Iteration capability over the channel graph
pub trait ChannelGraph {
    /// Visit every known node exactly once
    ///
    /// Order is up to the implementation but must be stable for the duration
    /// of one call. The visitor returns [`ControlFlow::Break`] to end the walk
    /// early; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails mid-walk.
    fn for_each_node(
        &self,
        visit: &mut dyn FnMut(&dyn GraphNode) -> ControlFlow<()>,
    ) -> Result<(), GraphError>;
}

impl<G: ChannelGraph + ?Sized> ChannelGraph for &G {
    fn for_each_node(
        &self,
        visit: &mut dyn FnMut(&dyn GraphNode) -> ControlFlow<()>,
    ) -> Result<(), GraphError> {
        (**self).for_each_node(visit)
    }
}

impl<G: ChannelGraph + ?Sized> ChannelGraph for Arc<G> {
    fn for_each_node(
        &self,
        visit: &mut dyn FnMut(&dyn GraphNode) -> ControlFlow<()>,
    ) -> Result<(), GraphError> {
        (**self).for_each_node(visit)
    }
}

/// A node announcement as held by [`MemoryGraph`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node identity key
    pub public_key: PublicKey,
    /// Advertised endpoints
    #[serde(default)]
    pub addresses: Vec<NodeAddress>,
}

impl NodeRecord {
    /// Create a new node record
    #[must_use]
    pub fn new(public_key: PublicKey, addresses: Vec<NodeAddress>) -> Self {
        Self {
            public_key,
            addresses,
        }
    }
}

impl GraphNode for NodeRecord {
    fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn addresses(&self) -> &[NodeAddress] {
        &self.addresses
    }
}

/// In-memory channel graph
///
/// Nodes are walked in ascending order of their compressed key encoding.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<[u8; 33], NodeRecord>,
}

impl MemoryGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node, returning the previous record
    pub fn insert(&mut self, node: NodeRecord) -> Option<NodeRecord> {
        self.nodes.insert(node.public_key.serialize(), node)
    }

    /// Remove a node by key
    pub fn remove(&mut self, public_key: &PublicKey) -> Option<NodeRecord> {
        self.nodes.remove(&public_key.serialize())
    }

    /// Look up a node by key
    #[must_use]
    pub fn get(&self, public_key: &PublicKey) -> Option<&NodeRecord> {
        self.nodes.get(&public_key.serialize())
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parse a JSON snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, holds an invalid key, or
    /// lists the same node twice.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let records: Vec<NodeRecord> = serde_json::from_str(json)?;
        let mut graph = Self::new();
        for (index, record) in records.into_iter().enumerate() {
            let key = record.public_key;
            if graph.insert(record).is_some() {
                return Err(GraphError::InvalidNode {
                    index,
                    reason: format!("duplicate node {key}"),
                });
            }
        }
        Ok(graph)
    }

    /// Load a JSON snapshot from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Render the graph as a JSON snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, GraphError> {
        let records: Vec<&NodeRecord> = self.nodes.values().collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

impl FromIterator<NodeRecord> for MemoryGraph {
    fn from_iter<I: IntoIterator<Item = NodeRecord>>(iter: I) -> Self {
        let mut graph = Self::new();
        for node in iter {
            graph.insert(node);
        }
        graph
    }
}

impl ChannelGraph for MemoryGraph {
    fn for_each_node(
        &self,
        visit: &mut dyn FnMut(&dyn GraphNode) -> ControlFlow<()>,
    ) -> Result<(), GraphError> {
        for node in self.nodes.values() {
            if visit(node).is_break() {
                break;
            }
        }
        Ok(())
    }
}
