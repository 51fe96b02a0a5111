pub mod attribute;
pub mod dtype;
pub mod extender;
pub mod graph;
pub mod normalize;
pub mod onnx;

pub use attribute::{AttributeError, AttributeStore, AttributeValue, Scalar};
pub use extender::{Extender, ExtenderRegistry, ExtenderRegistryError, builtin_registry};
pub use graph::{IrGraph, IrNode, NodeId};
pub use normalize::{
    Diagnostic, NormalizationReport, NormalizeConfig, NormalizeError, WalkOrder, normalize,
    normalize_with_builtins,
};
