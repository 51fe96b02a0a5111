use crate::attribute::AttributeError;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

/// `LSTMCell`, `GRUCell` and `RNNCell` carry activations as a comma separated
/// string (`"sigmoid,tanh,tanh"`) with matching alpha/beta coefficient lists.
pub struct RnnCellExtender {
    op_type: &'static str,
}

impl RnnCellExtender {
    pub fn new(op_type: &'static str) -> Self {
        Self { op_type }
    }
}

impl Extender for RnnCellExtender {
    fn op_type(&self) -> &str {
        self.op_type
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        report(issues, attributes.coerce_to_string_list("activations"));
        report(issues, attributes.coerce_to_float_list("activations_alpha"));
        report(issues, attributes.coerce_to_float_list("activations_beta"));
    }
}
