use crate::attribute::AttributeError;
use crate::extender::Extender;
use crate::graph::IrNode;

/// Quantization boundaries restored from IR are final; constant folding must
/// not propagate values through them.
pub struct FakeQuantizeExtender;

impl Extender for FakeQuantizeExtender {
    fn op_type(&self) -> &str {
        "FakeQuantize"
    }

    fn extend(&self, node: &mut IrNode, _issues: &mut Vec<AttributeError>) {
        node.attributes_mut().set("stop_value_propagation", 1i64);
    }
}
