use crate::attribute::{AttributeError, AttributeValue, query_attribute_int};
use crate::extender::Extender;
use crate::graph::IrNode;

/// Expands the scalar `stride` to one entry per NCHW dimension.
pub struct ReorgYoloExtender;

impl Extender for ReorgYoloExtender {
    fn op_type(&self) -> &str {
        "ReorgYolo"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        let found = match attributes.get("stride") {
            None | Some(AttributeValue::List(_)) => return,
            Some(other) => other.kind_name(),
        };
        match query_attribute_int(attributes, "stride") {
            Some(stride) => {
                attributes.set("stride", vec![1, 1, stride, stride]);
            }
            None => issues.push(AttributeError::Malformed {
                attribute: "stride".to_string(),
                expected: "integer",
                found,
            }),
        }
    }
}
