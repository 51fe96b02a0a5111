use super::extend_node;
use ir_reader::attribute::{
    AttributeError, query_attribute_bool, query_attribute_ints, query_attribute_string,
};
use ir_reader::{AttributeValue, ExtenderRegistry, IrNode};

pub fn test_interpolate_axes_forms(registry: &ExtenderRegistry) {
    for (axes, expected) in [
        (AttributeValue::from(2i64), vec![2]),
        (AttributeValue::from("2,3"), vec![2, 3]),
        (AttributeValue::from(vec![0i64, 1]), vec![0, 1]),
    ] {
        let node = IrNode::new("Interpolate")
            .with_attribute("axes", axes)
            .with_attribute("mode", "linear");
        let (node, errors) = extend_node(registry, node);
        assert!(errors.is_empty());
        assert_eq!(query_attribute_ints(node.attributes(), "axes"), Some(expected));
        assert_eq!(query_attribute_string(node.attributes(), "mode").as_deref(), Some("linear"));
    }
}

pub fn test_interpolate_empty_axis_element_reported(registry: &ExtenderRegistry) {
    let node = IrNode::new("Interpolate").with_attribute("axes", "2,,3");
    let (node, errors) = extend_node(registry, node);
    assert!(matches!(
        &errors[..],
        [AttributeError::UnparseableElement { attribute, expected: "integer", .. }]
            if attribute == "axes"
    ));
    assert_eq!(node.attributes().get("axes"), Some(&AttributeValue::from("2,,3")));
}

pub fn test_strided_slice_masks(registry: &ExtenderRegistry) {
    let node = IrNode::new("StridedSlice")
        .with_attribute("begin_mask", "1,0,1")
        .with_attribute("end_mask", "")
        .with_attribute("ellipsis_mask", 0i64);
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    let attributes = node.attributes();
    assert_eq!(query_attribute_ints(attributes, "begin_mask"), Some(vec![1, 0, 1]));
    assert_eq!(query_attribute_ints(attributes, "end_mask"), Some(vec![]));
    assert_eq!(query_attribute_ints(attributes, "new_axis_mask"), Some(vec![]));
    assert_eq!(query_attribute_ints(attributes, "shrink_axis_mask"), Some(vec![]));
    assert_eq!(query_attribute_ints(attributes, "ellipsis_mask"), Some(vec![0]));
}

pub fn test_pad_mode_renamed(registry: &ExtenderRegistry) {
    let node = IrNode::new("Pad")
        .with_attribute("pad_mode", "reflect")
        .with_attribute("pads_begin", "0,0,1,1");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    let attributes = node.attributes();
    assert!(!attributes.contains("pad_mode"));
    assert_eq!(query_attribute_string(attributes, "mode").as_deref(), Some("reflect"));
    assert_eq!(query_attribute_ints(attributes, "pads_begin"), Some(vec![0, 0, 1, 1]));
}

pub fn test_extract_image_patches(registry: &ExtenderRegistry) {
    let node = IrNode::new("ExtractImagePatches")
        .with_attribute("sizes", "3,3")
        .with_attribute("strides", "5,5")
        .with_attribute("rates", "1,1");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(query_attribute_ints(node.attributes(), "sizes"), Some(vec![3, 3]));
    assert_eq!(query_attribute_ints(node.attributes(), "strides"), Some(vec![5, 5]));
}

pub fn test_reorg_yolo_stride(registry: &ExtenderRegistry) {
    let node = IrNode::new("ReorgYolo").with_attribute("stride", "2");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(query_attribute_ints(node.attributes(), "stride"), Some(vec![1, 1, 2, 2]));

    let node = IrNode::new("ReorgYolo").with_attribute("stride", 1.5);
    let (_, errors) = extend_node(registry, node);
    assert!(matches!(&errors[..], [AttributeError::Malformed { found: "float", .. }]));
}

pub fn test_fake_quantize_stops_propagation(registry: &ExtenderRegistry) {
    let node = IrNode::new("FakeQuantize").with_attribute("levels", 256i64);
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(query_attribute_bool(node.attributes(), "stop_value_propagation"), Some(true));
    assert_eq!(
        node.attributes().get("stop_value_propagation"),
        Some(&AttributeValue::from(1i64))
    );
}
