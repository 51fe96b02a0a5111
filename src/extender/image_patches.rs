use crate::attribute::AttributeError;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

pub struct ExtractImagePatchesExtender;

impl Extender for ExtractImagePatchesExtender {
    fn op_type(&self) -> &str {
        "ExtractImagePatches"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        for name in ["sizes", "strides", "rates"] {
            report(issues, attributes.coerce_to_int_list(name));
        }
    }
}
