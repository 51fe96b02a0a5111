use crate::attribute::{AttributeError, AttributeStore, AttributeValue, Scalar};
use crate::dtype::DType;
use crate::extender::{Extender, report};
use crate::graph::IrNode;

/// Reads the element type name held by `source` and writes its canonical IR
/// spelling to `target`. Absent `source` is an error only when `required`.
pub(crate) fn canonicalize_element_type(
    attributes: &mut AttributeStore,
    source: &str,
    target: &str,
    required: bool,
) -> Result<(), AttributeError> {
    let name = match attributes.get(source) {
        None if required => return Err(AttributeError::Missing(source.to_string())),
        None => return Ok(()),
        Some(AttributeValue::Scalar(Scalar::Str(x))) => x,
        Some(other) => {
            return Err(AttributeError::Malformed {
                attribute: source.to_string(),
                expected: "element type name",
                found: other.kind_name(),
            });
        }
    };
    let dtype = DType::from_ir_name(name).map_err(|err| AttributeError::UnknownElementType {
        attribute: source.to_string(),
        source: err,
    })?;
    attributes.set(target, dtype.ir_name());
    Ok(())
}

/// For operators whose only irregular attribute is an element type name,
/// e.g. `Convert::destination_type` or `ShapeOf::output_type`.
pub struct ElementTypeExtender {
    op_type: &'static str,
    source: &'static str,
    target: &'static str,
}

impl ElementTypeExtender {
    pub fn new(op_type: &'static str, source: &'static str, target: &'static str) -> Self {
        Self {
            op_type,
            source,
            target,
        }
    }
}

impl Extender for ElementTypeExtender {
    fn op_type(&self) -> &str {
        self.op_type
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        report(
            issues,
            canonicalize_element_type(node.attributes_mut(), self.source, self.target, false),
        );
    }
}
