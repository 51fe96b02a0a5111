use super::extend_node;
use ir_reader::attribute::{AttributeError, query_attribute_int, query_attribute_ints};
use ir_reader::{ExtenderRegistry, IrNode};

pub fn test_convolution_spatial_attributes(registry: &ExtenderRegistry) {
    let node = IrNode::new("Convolution")
        .with_attribute("strides", "2,2")
        .with_attribute("dilations", "1,1")
        .with_attribute("pads_begin", "1,0")
        .with_attribute("pads_end", "1,2");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());

    let attributes = node.attributes();
    assert_eq!(query_attribute_ints(attributes, "strides"), Some(vec![2, 2]));
    assert_eq!(query_attribute_ints(attributes, "stride"), Some(vec![1, 1, 2, 2]));
    assert_eq!(query_attribute_ints(attributes, "dilation"), Some(vec![1, 1, 1, 1]));
    assert_eq!(
        query_attribute_ints(attributes, "pad"),
        Some(vec![0, 0, 0, 0, 1, 1, 0, 2])
    );
    assert_eq!(query_attribute_ints(attributes, "spatial_dims"), Some(vec![2, 3]));
    assert_eq!(query_attribute_int(attributes, "input_feature_channel"), Some(1));
    assert_eq!(query_attribute_int(attributes, "output_feature_channel"), Some(0));
    assert!(!attributes.contains("output_pad"));
}

pub fn test_convolution_1d_scalar_stride(registry: &ExtenderRegistry) {
    let node = IrNode::new("GroupConvolution")
        .with_attribute("strides", 3i64)
        .with_attribute("pads_begin", 0i64)
        .with_attribute("pads_end", 0i64);
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(query_attribute_ints(node.attributes(), "stride"), Some(vec![1, 1, 3]));
    assert_eq!(query_attribute_ints(node.attributes(), "spatial_dims"), Some(vec![2]));
}

pub fn test_backprop_data_swaps_feature_channels(registry: &ExtenderRegistry) {
    let node = IrNode::new("ConvolutionBackpropData")
        .with_attribute("strides", "2,2")
        .with_attribute("output_padding", "1,1");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    let attributes = node.attributes();
    assert_eq!(query_attribute_int(attributes, "input_feature_channel"), Some(0));
    assert_eq!(query_attribute_int(attributes, "output_feature_channel"), Some(1));
    assert_eq!(query_attribute_ints(attributes, "output_pad"), Some(vec![0, 0, 1, 1]));
}

pub fn test_convolution_pad_length_mismatch(registry: &ExtenderRegistry) {
    let node = IrNode::new("Convolution")
        .with_attribute("strides", "1,1")
        .with_attribute("pads_begin", "1,1")
        .with_attribute("pads_end", "1");
    let (node, errors) = extend_node(registry, node);
    assert_eq!(
        errors,
        vec![AttributeError::LengthMismatch(
            "pads_begin".to_string(),
            "pads_end".to_string(),
            2,
            1
        )]
    );
    // the rest of the node is still normalized
    assert_eq!(query_attribute_ints(node.attributes(), "stride"), Some(vec![1, 1, 1, 1]));
    assert!(!node.attributes().contains("pad"));
}
