use crate::attribute::AttributeError;
use crate::extender::element_type::canonicalize_element_type;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

pub struct TopKExtender;

impl Extender for TopKExtender {
    fn op_type(&self) -> &str {
        "TopK"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        // an empty name marks an unused output slot
        let values_unused = node.outputs().first().is_some_and(|x| x.is_empty());
        let attributes = node.attributes_mut();
        if values_unused {
            // ONNX has no bool attributes, flags are integer 0/1
            attributes.set("remove_values_output", 1i64);
        }
        report(issues, attributes.coerce_to_int("axis"));
        report(
            issues,
            canonicalize_element_type(
                attributes,
                "index_element_type",
                "index_element_type",
                false,
            ),
        );
    }
}
