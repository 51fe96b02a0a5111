use super::extend_node;
use ir_reader::attribute::{
    AttributeError, query_attribute_bool, query_attribute_int, query_attribute_ints,
    query_attribute_string,
};
use ir_reader::{AttributeValue, ExtenderRegistry, IrNode};

pub fn test_convert_destination_type(registry: &ExtenderRegistry) {
    let node = IrNode::new("Convert").with_attribute("destination_type", "FP32");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(query_attribute_string(node.attributes(), "dst_type").as_deref(), Some("f32"));
    assert_eq!(
        query_attribute_string(node.attributes(), "destination_type").as_deref(),
        Some("FP32")
    );
}

pub fn test_shape_of_output_type_in_place(registry: &ExtenderRegistry) {
    let node = IrNode::new("ShapeOf").with_attribute("output_type", "int32");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(query_attribute_string(node.attributes(), "output_type").as_deref(), Some("i32"));
}

pub fn test_unknown_element_type_is_reported(registry: &ExtenderRegistry) {
    let node = IrNode::new("NonZero").with_attribute("output_type", "q7");
    let (node, errors) = extend_node(registry, node);
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        AttributeError::UnknownElementType { attribute, .. } if attribute == "output_type"
    ));
    assert_eq!(node.attributes().get("output_type"), Some(&AttributeValue::from("q7")));
}

pub fn test_parameter_shape_and_type(registry: &ExtenderRegistry) {
    let node = IrNode::new("Parameter")
        .with_attribute("element_type", "f16")
        .with_attribute("shape", "1,3,?,1..16");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    let attributes = node.attributes();
    assert_eq!(query_attribute_string(attributes, "data_type").as_deref(), Some("f16"));
    assert_eq!(query_attribute_ints(attributes, "shape"), Some(vec![1, 3, -1, -1]));
}

pub fn test_parameter_scalar_shape(registry: &ExtenderRegistry) {
    let node = IrNode::new("Parameter")
        .with_attribute("element_type", "boolean")
        .with_attribute("shape", "");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(query_attribute_ints(node.attributes(), "shape"), Some(vec![]));
}

pub fn test_parameter_empty_dimension_reported(registry: &ExtenderRegistry) {
    let node = IrNode::new("Parameter")
        .with_attribute("element_type", "f32")
        .with_attribute("shape", "1,,3");
    let (node, errors) = extend_node(registry, node);
    assert!(matches!(
        &errors[..],
        [AttributeError::UnparseableElement { attribute, .. }] if attribute == "shape"
    ));
    assert_eq!(node.attributes().get("shape"), Some(&AttributeValue::from("1,,3")));
    assert_eq!(query_attribute_string(node.attributes(), "data_type").as_deref(), Some("f32"));
}

pub fn test_parameter_requires_element_type(registry: &ExtenderRegistry) {
    let node = IrNode::new("Parameter").with_attribute("shape", "2,2");
    let (node, errors) = extend_node(registry, node);
    assert_eq!(errors, vec![AttributeError::Missing("element_type".to_string())]);
    assert_eq!(query_attribute_ints(node.attributes(), "shape"), Some(vec![2, 2]));
}

pub fn test_topk_unused_values_output(registry: &ExtenderRegistry) {
    let node = IrNode::new("TopK")
        .with_outputs(["", "indices"])
        .with_attribute("index_element_type", "i32");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(query_attribute_bool(node.attributes(), "remove_values_output"), Some(true));
    assert_eq!(
        query_attribute_string(node.attributes(), "index_element_type").as_deref(),
        Some("i32")
    );
}

pub fn test_topk_axis_parsed(registry: &ExtenderRegistry) {
    let node = IrNode::new("TopK")
        .with_outputs(["values", "indices"])
        .with_attribute("axis", "1")
        .with_attribute("mode", "max");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(node.attributes().get("axis"), Some(&AttributeValue::from(1i64)));
    assert_eq!(query_attribute_int(node.attributes(), "axis"), Some(1));
    assert!(!node.attributes().contains("remove_values_output"));

    let node = IrNode::new("TopK").with_attribute("axis", "last");
    let (node, errors) = extend_node(registry, node);
    assert!(matches!(
        &errors[..],
        [AttributeError::UnparseableElement { attribute, .. }] if attribute == "axis"
    ));
    assert_eq!(node.attributes().get("axis"), Some(&AttributeValue::from("last")));
}
