use crate::attribute::AttributeError;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

/// Producers emit `axes` as a single integer, an IR text list (`"2,3"`) or a
/// proper list depending on their version; downstream shape inference expects
/// a list of integers. An absent `axes` is kept absent, it defaults to all
/// spatial axes later on.
pub struct InterpolateExtender;

impl Extender for InterpolateExtender {
    fn op_type(&self) -> &str {
        "Interpolate"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        report(issues, node.attributes_mut().coerce_to_int_list("axes"));
    }
}
