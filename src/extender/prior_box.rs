use crate::attribute::AttributeError;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

pub struct PriorBoxExtender;

impl Extender for PriorBoxExtender {
    fn op_type(&self) -> &str {
        "PriorBox"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        for name in [
            "min_size",
            "max_size",
            "aspect_ratio",
            "density",
            "fixed_ratio",
            "fixed_size",
            "variance",
        ] {
            report(issues, attributes.coerce_to_float_list(name));
        }
    }
}

pub struct PriorBoxClusteredExtender;

impl Extender for PriorBoxClusteredExtender {
    fn op_type(&self) -> &str {
        "PriorBoxClustered"
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        for name in ["width", "height", "variance"] {
            report(issues, attributes.coerce_to_float_list(name));
        }
    }
}
