//! Peer addresses produced and consumed by the bootstrapping layer.

use crate::node_id::NodeId;
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

/// A reachable peer: identity key plus TCP endpoint
///
/// Every bootstrap source produces these; the connection layer consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetAddress {
    /// Peer identity key
    pub identity_key: PublicKey,
    /// TCP endpoint to dial
    pub address: SocketAddr,
}

impl NetAddress {
    /// Create a new address
    #[must_use]
    pub const fn new(identity_key: PublicKey, address: SocketAddr) -> Self {
        Self {
            identity_key,
            address,
        }
    }

    /// Identity of the peer behind this address
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        NodeId::from_public_key(&self.identity_key)
    }
}

impl fmt::Display for NetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity_key, self.address)
    }
}

/// An endpoint advertised by a node in the channel graph
///
/// Only [`NodeAddress::Tcp`] endpoints are dialable by the bootstrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeAddress {
    /// Plain TCP endpoint
    Tcp {
        /// Socket address
        addr: SocketAddr,
    },
    /// Tor onion service
    Onion {
        /// Onion hostname
        host: String,
        /// Service port
        port: u16,
    },
    /// Address type this node does not understand
    Opaque {
        /// Address descriptor type
        kind: u8,
        /// Raw descriptor bytes
        payload: Vec<u8>,
    },
}

impl NodeAddress {
    /// Create a TCP endpoint
    #[must_use]
    pub const fn tcp(addr: SocketAddr) -> Self {
        Self::Tcp { addr }
    }

    /// The socket address if this is a TCP endpoint
    #[must_use]
    pub const fn as_tcp(&self) -> Option<SocketAddr> {
        match self {
            Self::Tcp { addr } => Some(*addr),
            _ => None,
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp { addr } => write!(f, "{addr}"),
            Self::Onion { host, port } => write!(f, "{host}:{port}"),
            Self::Opaque { kind, payload } => write!(f, "opaque({kind}, {} bytes)", payload.len()),
        }
    }
}
