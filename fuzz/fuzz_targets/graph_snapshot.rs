//! Fuzz test for channel graph snapshot loading

#![no_main]

use libfuzzer_sys::fuzz_target;
use waymark_bootstrap::{BootstrapSource, ExclusionSet, GraphBootstrapper, MemoryGraph};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = MemoryGraph::from_json(json) else {
        return;
    };

    let nodes = graph.len();
    let mut sampler = GraphBootstrapper::with_seed(graph, [0u8; 32]);
    let addrs = sampler.sample(8, &ExclusionSet::new()).unwrap();
    assert!(addrs.len() <= 8);
    assert!(sampler.tried_len() <= nodes);
});
