//! BOLT-0010 DNS Seed Bootstrapping
//!
//! A DNS seed answers SRV queries for `_nodes._tcp.<seed>` with a random
//! sample of nodes. Each SRV target is a per-node hostname whose leftmost
//! label encodes the node's public key (see [`label`]); resolving that
//! hostname yields the node's IP address and the SRV record supplies the
//! port.
//!
//! Seed responses come from third parties, so they are handled strictly: any
//! lookup failure or undecodable label fails the whole sampling call.

pub mod label;
pub mod resolver;

pub use label::{NODE_LABEL_HRP, decode_node_host, decode_node_label, encode_node_label};
pub use resolver::{DEFAULT_LOOKUP_TIMEOUT, HickoryResolver, SeedResolver, SrvTarget};

use crate::address::NetAddress;
use crate::error::{BootstrapError, DnsSeedError};
use crate::node_id::{ExclusionSet, NodeId};
use crate::source::BootstrapSource;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{trace, warn};

/// Service and protocol labels prefixed to every seed hostname
const SRV_SERVICE_PREFIX: &str = "_nodes._tcp";

/// Bootstrap source backed by BOLT-0010 DNS seeds
///
/// Holds no state between calls; the only memory of already-known peers is
/// the exclusion set of the current call.
#[derive(Debug)]
pub struct DnsSeedBootstrapper<R = HickoryResolver> {
    /// Seed hostnames, queried in order
    seeds: Vec<String>,
    /// DNS backend
    resolver: R,
    /// Cap on full passes over the seed list (`None` = until satisfied)
    max_passes: Option<u32>,
}

impl DnsSeedBootstrapper<HickoryResolver> {
    /// Create a bootstrapper that queries `seeds` through the system resolver
    ///
    /// # Errors
    ///
    /// Returns an error if the resolver cannot be set up.
    pub fn new(seeds: Vec<String>, timeout: Duration) -> Result<Self, DnsSeedError> {
        Ok(Self::with_resolver(seeds, HickoryResolver::new(timeout)?))
    }
}

impl<R: SeedResolver> DnsSeedBootstrapper<R> {
    /// Create a bootstrapper that sends its lookups to `resolver`
    #[must_use]
    pub fn with_resolver(seeds: Vec<String>, resolver: R) -> Self {
        Self {
            seeds,
            resolver,
            max_passes: None,
        }
    }

    /// Stop after `passes` full passes over the seed list
    #[must_use]
    pub fn with_max_passes(mut self, passes: u32) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Configured seed hostnames
    #[must_use]
    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    /// The DNS backend
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Turn one SRV target into an address
    ///
    /// Returns `None` when the node has no address records or is excluded.
    fn resolve_target(
        &self,
        record: &SrvTarget,
        exclude: &ExclusionSet,
    ) -> Result<Option<NetAddress>, DnsSeedError> {
        let ips = self.resolver.lookup_host(&record.target)?;
        let Some(ip) = ips.first() else {
            trace!("No addresses for {}, skipping", record.target);
            return Ok(None);
        };

        trace!("Attempting to convert: {}", record.target);
        let identity_key = decode_node_host(&record.target)?;

        if exclude.contains(&NodeId::from_public_key(&identity_key)) {
            return Ok(None);
        }

        Ok(Some(NetAddress::new(
            identity_key,
            SocketAddr::new(*ip, record.port),
        )))
    }
}

impl<R: SeedResolver> BootstrapSource for DnsSeedBootstrapper<R> {
    fn sample(
        &mut self,
        count: u32,
        exclude: &ExclusionSet,
    ) -> Result<Vec<NetAddress>, BootstrapError> {
        let target = count as usize;
        let mut addrs = Vec::new();

        if self.seeds.is_empty() {
            if target > 0 {
                warn!("No DNS seeds configured");
            }
            return Ok(addrs);
        }

        // Every SRV answer is a fresh random sample, so keep cycling through
        // the seeds until the target is met.
        let mut passes = 0;
        'search: while addrs.len() < target {
            if self.max_passes.is_some_and(|max| passes >= max) {
                break;
            }
            passes += 1;

            for seed in &self.seeds {
                if addrs.len() >= target {
                    break 'search;
                }

                let name = format!("{SRV_SERVICE_PREFIX}.{seed}");
                let records = self.resolver.lookup_srv(&name)?;
                trace!("Retrieved {} SRV records from dns seed {}", records.len(), seed);

                for record in &records {
                    if addrs.len() >= target {
                        break 'search;
                    }

                    if let Some(addr) = self.resolve_target(record, exclude)? {
                        trace!("Obtained {} as valid reachable node", addr);
                        addrs.push(addr);
                    }
                }
            }
        }

        Ok(addrs)
    }

    fn name(&self) -> String {
        format!("BOLT-0010 DNS Seed: [{}]", self.seeds.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{PublicKey, Secp256k1, SecretKey};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::net::IpAddr;

    fn key(seed: u8) -> PublicKey {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&[seed; 32]).unwrap();
        PublicKey::from_secret_key(&secp, &sk)
    }

    fn node_host(pk: &PublicKey, seed: &str) -> String {
        format!("{}.{}", encode_node_label(pk).unwrap(), seed)
    }

    /// Resolver answering from fixed tables and recording every query
    #[derive(Default)]
    struct ScriptedResolver {
        srv: HashMap<String, Vec<SrvTarget>>,
        hosts: HashMap<String, Vec<IpAddr>>,
        failing_hosts: Vec<String>,
        queries: RefCell<Vec<String>>,
    }

    impl ScriptedResolver {
        fn seed(mut self, seed: &str, records: Vec<SrvTarget>) -> Self {
            self.srv.insert(format!("_nodes._tcp.{seed}"), records);
            self
        }

        fn host(mut self, host: &str, ip: &str) -> Self {
            self.hosts
                .entry(host.to_string())
                .or_default()
                .push(ip.parse().unwrap());
            self
        }

        fn srv_queries(&self) -> usize {
            self.queries
                .borrow()
                .iter()
                .filter(|q| q.starts_with("_nodes"))
                .count()
        }
    }

    impl SeedResolver for ScriptedResolver {
        fn lookup_srv(&self, name: &str) -> Result<Vec<SrvTarget>, DnsSeedError> {
            self.queries.borrow_mut().push(name.to_string());
            self.srv
                .get(name)
                .cloned()
                .ok_or_else(|| DnsSeedError::SrvLookup {
                    name: name.to_string(),
                    reason: "NXDOMAIN".to_string(),
                })
        }

        fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, DnsSeedError> {
            self.queries.borrow_mut().push(host.to_string());
            if self.failing_hosts.iter().any(|h| h == host) {
                return Err(DnsSeedError::HostLookup {
                    host: host.to_string(),
                    reason: "SERVFAIL".to_string(),
                });
            }
            Ok(self.hosts.get(host).cloned().unwrap_or_default())
        }
    }

    fn three_node_seed() -> (Vec<PublicKey>, ScriptedResolver) {
        let keys = vec![key(1), key(2), key(3)];
        let seed = "nodes.example.org";
        let records = keys
            .iter()
            .enumerate()
            .map(|(i, pk)| SrvTarget::new(node_host(pk, seed), 9735 + i as u16))
            .collect();
        let resolver = ScriptedResolver::default()
            .seed(seed, records)
            .host(&node_host(&keys[0], seed), "203.0.113.1")
            .host(&node_host(&keys[1], seed), "203.0.113.2")
            .host(&node_host(&keys[2], seed), "203.0.113.3");
        (keys, resolver)
    }

    #[test]
    fn test_sample_decodes_records() {
        let (keys, resolver) = three_node_seed();
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["nodes.example.org".to_string()], resolver);

        let addrs = bootstrapper.sample(3, &ExclusionSet::new()).unwrap();

        assert_eq!(addrs.len(), 3);
        assert_eq!(addrs[0].identity_key, keys[0]);
        assert_eq!(addrs[0].address, "203.0.113.1:9735".parse().unwrap());
        assert_eq!(addrs[2].address, "203.0.113.3:9737".parse().unwrap());
    }

    #[test]
    fn test_first_ip_is_used() {
        let pk = key(4);
        let host = node_host(&pk, "seed.test");
        let resolver = ScriptedResolver::default()
            .seed("seed.test", vec![SrvTarget::new(host.clone(), 9735)])
            .host(&host, "198.51.100.9")
            .host(&host, "2001:db8::1");
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["seed.test".to_string()], resolver);

        let addrs = bootstrapper.sample(1, &ExclusionSet::new()).unwrap();
        assert_eq!(addrs[0].address, "198.51.100.9:9735".parse().unwrap());
    }

    #[test]
    fn test_stops_once_count_reached() {
        let (_, resolver) = three_node_seed();
        let resolver = resolver.seed("second.example.org", vec![]);
        let mut bootstrapper = DnsSeedBootstrapper::with_resolver(
            vec!["nodes.example.org".to_string(), "second.example.org".to_string()],
            resolver,
        );

        let addrs = bootstrapper.sample(2, &ExclusionSet::new()).unwrap();

        assert_eq!(addrs.len(), 2);
        assert_eq!(bootstrapper.resolver().srv_queries(), 1);
        // Third record was never resolved.
        assert_eq!(bootstrapper.resolver().queries.borrow().len(), 3);
    }

    #[test]
    fn test_exclusion_honored() {
        let (keys, resolver) = three_node_seed();
        let mut bootstrapper = DnsSeedBootstrapper::with_resolver(
            vec!["nodes.example.org".to_string()],
            resolver,
        )
        .with_max_passes(1);

        let mut exclude = ExclusionSet::new();
        exclude.insert(NodeId::from_public_key(&keys[1]));

        let addrs = bootstrapper.sample(3, &exclude).unwrap();
        assert_eq!(addrs.len(), 2);
        assert!(addrs.iter().all(|a| !exclude.contains(&a.node_id())));
    }

    #[test]
    fn test_host_without_addresses_skipped() {
        let pk = key(5);
        let bare = key(6);
        let resolver = ScriptedResolver::default()
            .seed(
                "seed.test",
                vec![
                    SrvTarget::new(node_host(&bare, "seed.test"), 9735),
                    SrvTarget::new(node_host(&pk, "seed.test"), 9735),
                ],
            )
            .host(&node_host(&pk, "seed.test"), "192.0.2.44");
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["seed.test".to_string()], resolver);

        let addrs = bootstrapper.sample(1, &ExclusionSet::new()).unwrap();
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].identity_key, pk);
    }

    #[test]
    fn test_malformed_label_fails_whole_call() {
        let (_, resolver) = three_node_seed();
        let bad_host = "ln1notvalidbech32.nodes.example.org";
        let mut records = resolver.srv["_nodes._tcp.nodes.example.org"].clone();
        records.insert(1, SrvTarget::new(bad_host, 9735));
        let resolver = resolver
            .seed("nodes.example.org", records)
            .host(bad_host, "203.0.113.99");
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["nodes.example.org".to_string()], resolver);

        let err = bootstrapper.sample(3, &ExclusionSet::new()).unwrap_err();

        assert!(matches!(err, BootstrapError::Dns(DnsSeedError::Bech32 { .. })));
    }

    #[test]
    fn test_srv_failure_is_fatal() {
        let resolver = ScriptedResolver::default();
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["missing.example".to_string()], resolver);

        let err = bootstrapper.sample(1, &ExclusionSet::new()).unwrap_err();
        assert!(matches!(err, BootstrapError::Dns(DnsSeedError::SrvLookup { .. })));
    }

    #[test]
    fn test_host_failure_is_fatal() {
        let (keys, mut resolver) = three_node_seed();
        resolver
            .failing_hosts
            .push(node_host(&keys[0], "nodes.example.org"));
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["nodes.example.org".to_string()], resolver);

        let err = bootstrapper.sample(3, &ExclusionSet::new()).unwrap_err();
        assert!(matches!(err, BootstrapError::Dns(DnsSeedError::HostLookup { .. })));
    }

    #[test]
    fn test_repeats_seed_list_until_satisfied() {
        let pk = key(7);
        let host = node_host(&pk, "seed.test");
        let resolver = ScriptedResolver::default()
            .seed("seed.test", vec![SrvTarget::new(host.clone(), 9735)])
            .host(&host, "192.0.2.7");
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["seed.test".to_string()], resolver);

        let addrs = bootstrapper.sample(3, &ExclusionSet::new()).unwrap();

        assert_eq!(addrs.len(), 3);
        assert_eq!(bootstrapper.resolver().srv_queries(), 3);
    }

    #[test]
    fn test_max_passes_bounds_search() {
        let resolver = ScriptedResolver::default().seed("empty.test", vec![]);
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["empty.test".to_string()], resolver)
                .with_max_passes(4);

        assert!(bootstrapper.sample(5, &ExclusionSet::new()).unwrap().is_empty());
        assert_eq!(bootstrapper.resolver().srv_queries(), 4);
    }

    #[test]
    fn test_no_seeds_returns_empty() {
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(Vec::new(), ScriptedResolver::default());
        assert!(bootstrapper.sample(5, &ExclusionSet::new()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_count_issues_no_queries() {
        let (_, resolver) = three_node_seed();
        let mut bootstrapper =
            DnsSeedBootstrapper::with_resolver(vec!["nodes.example.org".to_string()], resolver);

        assert!(bootstrapper.sample(0, &ExclusionSet::new()).unwrap().is_empty());
        assert!(bootstrapper.resolver().queries.borrow().is_empty());
    }

    #[test]
    fn test_name_lists_seeds() {
        let bootstrapper = DnsSeedBootstrapper::with_resolver(
            vec!["a.example".to_string(), "b.example".to_string()],
            ScriptedResolver::default(),
        );
        assert_eq!(bootstrapper.name(), "BOLT-0010 DNS Seed: [a.example, b.example]");
        assert_eq!(bootstrapper.seeds().len(), 2);
    }
}
