use crate::attribute::{AttributeError, AttributeValue, Scalar};
use crate::extender::{Extender, report};
use crate::graph::IrNode;

const MASKS: [&str; 5] = [
    "begin_mask",
    "end_mask",
    "new_axis_mask",
    "shrink_axis_mask",
    "ellipsis_mask",
];

/// Every mask ends up as an integer list. A missing or empty mask is the
/// empty list, not absent: a 1-D begin/end with an all-zero mask still
/// serializes as `""`.
pub struct StridedSliceExtender;

impl Extender for StridedSliceExtender {
    fn op_type(&self) -> &str {
        "StridedSlice"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        for mask in MASKS {
            let empty = match attributes.get(mask) {
                None => true,
                Some(AttributeValue::Scalar(Scalar::Str(x))) => x.trim().is_empty(),
                Some(_) => false,
            };
            if empty {
                attributes.set(mask, AttributeValue::List(vec![]));
            } else {
                report(issues, attributes.coerce_to_int_list(mask));
            }
        }
    }
}
