pub mod convolution;
pub mod element_type;
pub mod layout;
pub mod recurrent;

use ir_reader::attribute::AttributeError;
use ir_reader::{ExtenderRegistry, IrGraph, IrNode, NormalizeConfig, normalize};

/// Normalizes a single-node graph twice and checks the second pass changes
/// nothing. Returns the node and the diagnostics of the first pass.
pub fn extend_node(registry: &ExtenderRegistry, node: IrNode) -> (IrNode, Vec<AttributeError>) {
    let mut graph = IrGraph::new();
    let id = graph.add_node(node);
    let report = normalize(&mut graph, registry, &NormalizeConfig::default()).unwrap();
    let once = graph.clone();
    normalize(&mut graph, registry, &NormalizeConfig::default()).unwrap();
    assert_eq!(graph, once, "second normalization changed the graph");

    let errors = report.diagnostics.into_iter().map(|x| x.error).collect();
    (graph.node(id).unwrap().clone(), errors)
}
