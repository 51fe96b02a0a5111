use crate::attribute::AttributeError;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

pub struct PadExtender;

impl Extender for PadExtender {
    fn op_type(&self) -> &str {
        "Pad"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        // IR writes the mode as `pad_mode`, consumers read `mode`
        attributes.rename("pad_mode", "mode");
        report(issues, attributes.coerce_to_int_list("pads_begin"));
        report(issues, attributes.coerce_to_int_list("pads_end"));
    }
}
