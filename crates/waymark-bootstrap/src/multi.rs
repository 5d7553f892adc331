//! Multi-source bootstrapping.
//!
//! Queries an ordered list of sources in turn until the target number of
//! addresses is reached. A failing source is logged and skipped, so the
//! aggregate call always succeeds, possibly with fewer addresses than asked.

use crate::address::NetAddress;
use crate::node_id::ExclusionSet;
use crate::source::BootstrapSource;
use serde::{Deserialize, Serialize};
use tracing::{error, info, trace, warn};

/// How identities returned by one source affect the sources queried after it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossSourcePolicy {
    /// Every source sees only the caller's exclusion set; two sources may
    /// return the same peer
    #[default]
    Independent,
    /// Identities returned by earlier sources are added to the exclusion set
    /// passed to later ones
    ExcludeReturned,
}

/// Sample `count` addresses from `sources`, in order
///
/// Equivalent to [`multi_source_bootstrap_with`] under
/// [`CrossSourcePolicy::Independent`].
pub fn multi_source_bootstrap(
    exclude: &ExclusionSet,
    count: u32,
    sources: &mut [Box<dyn BootstrapSource>],
) -> Vec<NetAddress> {
    multi_source_bootstrap_with(exclude, count, sources, CrossSourcePolicy::Independent)
}

/// Sample `count` addresses from `sources`, in order, under `policy`
///
/// Sources after the one that satisfies the target are never queried. Each
/// source is asked only for the addresses still missing, and any extra it
/// returns is dropped.
pub fn multi_source_bootstrap_with(
    exclude: &ExclusionSet,
    count: u32,
    sources: &mut [Box<dyn BootstrapSource>],
    policy: CrossSourcePolicy,
) -> Vec<NetAddress> {
    let target = count as usize;
    let mut addrs: Vec<NetAddress> = Vec::new();
    let mut exclude_returned = match policy {
        CrossSourcePolicy::Independent => None,
        CrossSourcePolicy::ExcludeReturned => Some(exclude.clone()),
    };

    for source in sources.iter_mut() {
        if addrs.len() >= target {
            break;
        }

        info!("Attempting to bootstrap with: {}", source.name());

        let remaining = count - addrs.len() as u32;
        trace!("Querying for {} addresses", remaining);

        let ignore = exclude_returned.as_ref().unwrap_or(exclude);
        let mut sampled = match source.sample(remaining, ignore) {
            Ok(sampled) => sampled,
            Err(e) => {
                error!("Unable to query bootstrapper {}: {}", source.name(), e);
                continue;
            }
        };

        if sampled.len() > remaining as usize {
            warn!(
                "{} returned {} addrs, {} requested",
                source.name(),
                sampled.len(),
                remaining
            );
            sampled.truncate(remaining as usize);
        }

        if let Some(seen) = exclude_returned.as_mut() {
            seen.extend(sampled.iter().map(NetAddress::node_id));
        }
        addrs.extend(sampled);
    }

    info!("Obtained {} addrs to bootstrap network with", addrs.len());

    addrs
}
