//! # WAYMARK Bootstrap
//!
//! Peer bootstrapping for WAYMARK nodes.
//!
//! A node that has just started needs an initial set of reachable peers.
//! This crate provides:
//! - A common [`BootstrapSource`] contract for anything that can hand out
//!   peer addresses
//! - [`GraphBootstrapper`], which samples the locally known channel graph
//!   with a rotating SHA-256 threshold
//! - [`DnsSeedBootstrapper`], which queries BOLT-0010 DNS seeds
//! - [`multi_source_bootstrap`], which tries several sources in order and
//!   never fails
//!
//! ## Node Identity
//!
//! Every exclusion and de-duplication check works on [`NodeId`], a 256-bit
//! identifier derived from the node's compressed secp256k1 key with BLAKE3.
//!
//! ## Example
//!
//! ```rust,no_run
//! use waymark_bootstrap::{
//!     BootstrapSource, DnsSeedBootstrapper, ExclusionSet, GraphBootstrapper, MemoryGraph,
//!     multi_source_bootstrap,
//! };
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = MemoryGraph::load("graph.json")?;
//! let dns = DnsSeedBootstrapper::new(
//!     vec!["nodes.lightning.directory".to_string()],
//!     Duration::from_secs(5),
//! )?;
//!
//! let mut sources: Vec<Box<dyn BootstrapSource>> = vec![
//!     Box::new(GraphBootstrapper::new(graph)?),
//!     Box::new(dns),
//! ];
//!
//! for addr in multi_source_bootstrap(&ExclusionSet::new(), 8, &mut sources) {
//!     println!("{addr}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod config;
pub mod dns;
pub mod error;
pub mod graph;
pub mod multi;
pub mod node_id;
pub mod source;

// Re-export commonly used types
pub use address::{NetAddress, NodeAddress};
pub use config::BootstrapConfig;
pub use dns::{DnsSeedBootstrapper, HickoryResolver, SeedResolver, SrvTarget};
pub use error::{BootstrapError, ConfigError, DnsSeedError, GraphError};
pub use graph::{ChannelGraph, GraphBootstrapper, GraphNode, MemoryGraph, NodeRecord};
pub use multi::{CrossSourcePolicy, multi_source_bootstrap, multi_source_bootstrap_with};
pub use node_id::{ExclusionSet, NodeId};
pub use source::BootstrapSource;
