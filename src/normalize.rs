//! The attribute normalization pass run on a freshly loaded graph.

use crate::attribute::AttributeError;
use crate::extender::{ExtenderRegistry, ExtenderRegistryError, builtin_registry};
use crate::graph::{IrGraph, NodeId};
use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WalkOrder {
    #[default]
    Insertion,
    Topological,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub walk_order: WalkOrder,
    /// Fail the pass when any attribute could not be normalized. The sweep
    /// still covers every node first.
    pub strict: bool,
}

impl NormalizeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub node: NodeId,
    pub node_name: Option<String>,
    pub op_type: String,
    pub error: AttributeError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node {} ({} {}): {}",
            self.node,
            self.op_type,
            self.node_name.as_deref().unwrap_or("<unnamed>"),
            self.error
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizationReport {
    pub visited: usize,
    pub extended: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizationReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Registry(#[from] ExtenderRegistryError),
    #[error("{} attribute(s) could not be normalized", .0.len())]
    MalformedAttributes(Vec<Diagnostic>),
}

/// Runs the registered extender of every node once. Nodes whose operator type
/// has no extender are left untouched. Only attribute stores change; nodes and
/// edges stay as they are.
pub fn normalize(
    graph: &mut IrGraph,
    registry: &ExtenderRegistry,
    config: &NormalizeConfig,
) -> Result<NormalizationReport, NormalizeError> {
    let order: Vec<NodeId> = match config.walk_order {
        WalkOrder::Insertion => (0..graph.len()).collect(),
        WalkOrder::Topological => graph.topological_order().unwrap_or_else(|| {
            log::warn!("Graph has a cycle, normalizing in insertion order");
            (0..graph.len()).collect()
        }),
    };

    let mut report = NormalizationReport::default();
    for id in order {
        let Some(node) = graph.node_mut(id) else {
            continue;
        };
        report.visited += 1;

        let Some(extender) = registry.lookup(node.op_type()) else {
            log::trace!("No extender for {}, skipping {}", node.op_type(), node.display_name());
            continue;
        };
        log::debug!("Extending {} {}", node.op_type(), node.display_name());

        let mut issues = vec![];
        extender.extend(node, &mut issues);
        report.extended += 1;

        for error in issues {
            let diagnostic = Diagnostic {
                node: id,
                node_name: node.name().map(str::to_string),
                op_type: node.op_type().to_string(),
                error,
            };
            log::warn!("Could not normalize attribute on {diagnostic}");
            report.diagnostics.push(diagnostic);
        }
    }

    log::info!(
        "Normalized {} of {} nodes, {} diagnostic(s)",
        report.extended,
        report.visited,
        report.diagnostics.len()
    );

    if config.strict && !report.is_clean() {
        return Err(NormalizeError::MalformedAttributes(report.diagnostics));
    }
    Ok(report)
}

/// [`normalize`] against the process-wide built-in registry.
pub fn normalize_with_builtins(
    graph: &mut IrGraph,
    config: &NormalizeConfig,
) -> Result<NormalizationReport, NormalizeError> {
    let registry = builtin_registry()?;
    normalize(graph, registry, config)
}
