//! Channel Graph Sampling
//!
//! [`GraphBootstrapper`] draws peers from the authenticated nodes of the local
//! channel graph without sorting or materializing it. Selection is driven by
//! a 32-byte hash accumulator: in each round the first untried node whose
//! compressed key (minus the parity byte) is not below the accumulator is
//! taken, then the accumulator is replaced by its own SHA-256 hash. Successive
//! thresholds spread picks across the key space, independent of the order in
//! which the graph yields its nodes.

use super::{ChannelGraph, GraphNode};
use crate::address::NetAddress;
use crate::error::{BootstrapError, GraphError};
use crate::node_id::{ExclusionSet, NodeId};
use crate::source::BootstrapSource;
use rand_core::{CryptoRng, OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;
use tracing::{debug, trace};

/// Default number of sampling rounds per call
pub const DEFAULT_MAX_ROUNDS: u32 = 30;

/// Bootstrap source backed by the authenticated channel graph
///
/// The accumulator and tried set live for the lifetime of the instance, so
/// repeated calls keep progressing through the graph instead of returning the
/// same nodes. Sampling takes `&mut self`; share an instance across threads
/// only behind a lock.
pub struct GraphBootstrapper<G> {
    /// Channel graph to sample from
    graph: G,
    /// Rotating selection threshold, never reset
    hash_accumulator: [u8; 32],
    /// Nodes already returned or excluded by a caller
    tried: HashSet<NodeId>,
    /// Round cap per sampling call
    max_rounds: u32,
}

impl<G: ChannelGraph> GraphBootstrapper<G> {
    /// Create a bootstrapper seeded from the operating system's entropy source
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Entropy`] if no secure randomness is available.
    pub fn new(graph: G) -> Result<Self, BootstrapError> {
        Self::with_rng(graph, &mut OsRng)
    }

    /// Create a bootstrapper seeded from `rng`
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Entropy`] if `rng` fails to produce bytes.
    pub fn with_rng<R: RngCore + CryptoRng>(graph: G, rng: &mut R) -> Result<Self, BootstrapError> {
        let mut seed = [0u8; 32];
        rng.try_fill_bytes(&mut seed)?;
        Ok(Self::with_seed(graph, seed))
    }

    /// Create a bootstrapper with a known accumulator seed
    ///
    /// Two instances with the same seed over the same graph make identical
    /// selections, which makes scans reproducible.
    #[must_use]
    pub fn with_seed(graph: G, seed: [u8; 32]) -> Self {
        Self {
            graph,
            hash_accumulator: seed,
            tried: HashSet::new(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set the number of rounds a single call may run
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Round cap per sampling call
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Number of nodes this instance will no longer return
    #[must_use]
    pub fn tried_len(&self) -> usize {
        self.tried.len()
    }

    /// The underlying channel graph
    #[must_use]
    pub const fn graph(&self) -> &G {
        &self.graph
    }

    /// Run one selection round against the current accumulator
    ///
    /// Returns every TCP address of the first eligible node, or nothing if the
    /// walk ends without one.
    fn sample_round(&mut self) -> Result<Vec<NetAddress>, GraphError> {
        let threshold = self.hash_accumulator;
        let tried = &mut self.tried;
        let mut selected = Vec::new();

        self.graph.for_each_node(&mut |node: &dyn GraphNode| {
            let node_id = NodeId::from_public_key(node.public_key());
            if tried.contains(&node_id) {
                return ControlFlow::Continue(());
            }

            // The leading parity byte carries almost no entropy, so it takes
            // no part in the comparison.
            let key = node.public_key().serialize();
            if key[1..] < threshold[..] {
                return ControlFlow::Continue(());
            }

            let mut addrs = Vec::with_capacity(node.addresses().len());
            for advertised in node.addresses() {
                let Some(addr) = advertised.as_tcp() else {
                    // Only TCP peers are dialable; the node stays untried so a
                    // later threshold can pick it up again.
                    trace!("Skipping {} with non-TCP address {}", node_id, advertised);
                    return ControlFlow::Continue(());
                };
                addrs.push(NetAddress::new(*node.public_key(), addr));
            }

            tried.insert(node_id);
            selected = addrs;
            ControlFlow::Break(())
        })?;

        Ok(selected)
    }

    fn rotate_accumulator(&mut self) {
        self.hash_accumulator = Sha256::digest(self.hash_accumulator).into();
    }
}

impl<G: ChannelGraph> BootstrapSource for GraphBootstrapper<G> {
    fn sample(
        &mut self,
        count: u32,
        exclude: &ExclusionSet,
    ) -> Result<Vec<NetAddress>, BootstrapError> {
        self.tried.extend(exclude.iter().copied());

        let target = count as usize;
        let mut addrs = Vec::new();
        let mut rounds = 0;
        while rounds < self.max_rounds && addrs.len() < target {
            let sampled = self.sample_round()?;
            rounds += 1;

            self.rotate_accumulator();

            if sampled.is_empty() {
                continue;
            }
            addrs.extend(sampled);
        }

        // A node may advertise several endpoints; never hand back more than asked.
        addrs.truncate(target);

        debug!(
            "Graph sampling returned {} addrs after {} rounds ({} nodes tried)",
            addrs.len(),
            rounds,
            self.tried.len()
        );

        Ok(addrs)
    }

    fn name(&self) -> String {
        "Authenticated Channel Graph".to_string()
    }
}

impl<G> fmt::Debug for GraphBootstrapper<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBootstrapper")
            .field("hash_accumulator", &"[REDACTED]")
            .field("tried", &self.tried.len())
            .field("max_rounds", &self.max_rounds)
            .finish_non_exhaustive()
    }
}
