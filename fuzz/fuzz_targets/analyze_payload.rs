#![no_main]

use libfuzzer_sys::fuzz_target;
use wfgraph_core::graph::normalize;
use wfgraph_core::{Limits, analyze, parse_request};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_nodes: 200,
        max_edges: 800,
    };
    let Ok(payload) = parse_request(data, &limits) else {
        return;
    };

    let normalized = normalize(&payload);
    let result = analyze(&normalized.graph).expect("normalized graphs always analyze");

    assert_eq!(result.is_dag, !result.has_cycles);
    assert_eq!(result.node_degrees.len(), result.node_count);
    assert_eq!(result.cycles.is_some(), result.has_cycles);
    if let Some(order) = &result.topologically_sorted {
        assert_eq!(order.len(), result.node_count);
    }

    let _ = serde_json::to_vec(&result).expect("result serializes");
});
