use crate::attribute::{AttributeError, AttributeValue, Scalar, split_ir_list};
use crate::extender::element_type::canonicalize_element_type;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

/// Dimension in IR text form. `?` and interval bounds (`1..8`) are dynamic.
fn parse_dimension(dimension: &str) -> Option<i64> {
    if dimension == "?" || dimension.contains("..") {
        Some(-1)
    } else {
        dimension.parse().ok()
    }
}

/// `element_type` is mandatory and becomes `data_type`. `shape` becomes an
/// integer list with -1 for dynamic dimensions; the empty string is a scalar.
pub struct ParameterExtender;

impl Extender for ParameterExtender {
    fn op_type(&self) -> &str {
        "Parameter"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        report(
            issues,
            canonicalize_element_type(attributes, "element_type", "data_type", true),
        );

        let shape_text = match attributes.get("shape") {
            Some(AttributeValue::Scalar(Scalar::Str(x))) => Some(x.clone()),
            _ => None,
        };
        let Some(shape) = shape_text else {
            report(issues, attributes.coerce_to_int_list("shape"));
            return;
        };
        let dims: Option<Vec<i64>> = split_ir_list(&shape).map(parse_dimension).collect();
        match dims {
            Some(dims) => {
                attributes.set("shape", dims);
            }
            None => issues.push(AttributeError::UnparseableElement {
                attribute: "shape".to_string(),
                element: shape,
                expected: "dimension",
            }),
        }
    }
}
