//! Source construction and argument parsing for the `sample` command.

use anyhow::Context;
use secp256k1::PublicKey;
use waymark_bootstrap::{
    BootstrapConfig, BootstrapSource, DnsSeedBootstrapper, GraphBootstrapper, MemoryGraph, NodeId,
};

/// Parse a hex-encoded compressed public key
pub fn parse_public_key(hex_key: &str) -> anyhow::Result<PublicKey> {
    let bytes = hex::decode(hex_key.trim()).context("public key is not valid hex")?;
    PublicKey::from_slice(&bytes).context("not a compressed secp256k1 public key")
}

/// Parse a hex-encoded public key into the identity used for exclusion
pub fn parse_node_id(hex_key: &str) -> anyhow::Result<NodeId> {
    Ok(NodeId::from_public_key(&parse_public_key(hex_key)?))
}

/// Build the configured sources, graph first
///
/// A graph source is only added when sampling is enabled and a snapshot is
/// configured; a DNS source only when at least one seed is listed.
pub fn build_sources(config: &BootstrapConfig) -> anyhow::Result<Vec<Box<dyn BootstrapSource>>> {
    let mut sources: Vec<Box<dyn BootstrapSource>> = Vec::new();

    if config.graph.enabled {
        match &config.graph.snapshot {
            Some(path) => {
                let graph = MemoryGraph::load(path)
                    .with_context(|| format!("failed to load graph snapshot {}", path.display()))?;
                tracing::debug!("Loaded {} nodes from {}", graph.len(), path.display());

                let bootstrapper =
                    GraphBootstrapper::new(graph)?.with_max_rounds(config.graph.max_rounds);
                sources.push(Box::new(bootstrapper));
            }
            None => tracing::warn!("Graph sampling enabled but no snapshot configured"),
        }
    }

    if !config.dns.seeds.is_empty() {
        let mut bootstrapper =
            DnsSeedBootstrapper::new(config.dns.seeds.clone(), config.dns.timeout())?;
        if let Some(passes) = config.dns.max_passes {
            bootstrapper = bootstrapper.with_max_passes(passes);
        }
        sources.push(Box::new(bootstrapper));
    }

    Ok(sources)
}
