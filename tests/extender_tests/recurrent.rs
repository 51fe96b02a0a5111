use super::extend_node;
use ir_reader::attribute::AttributeError;
use ir_reader::{AttributeValue, ExtenderRegistry, IrNode};

pub fn test_lstm_cell_activations(registry: &ExtenderRegistry) {
    let node = IrNode::new("LSTMCell")
        .with_attribute("activations", "sigmoid,tanh,tanh")
        .with_attribute("activations_alpha", "0.5")
        .with_attribute("hidden_size", 128i64);
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    let attributes = node.attributes();
    assert_eq!(
        attributes.get("activations"),
        Some(&AttributeValue::from(vec!["sigmoid", "tanh", "tanh"]))
    );
    assert_eq!(attributes.get("activations_alpha"), Some(&AttributeValue::from(vec![0.5])));
    assert!(!attributes.contains("activations_beta"));
    assert_eq!(attributes.get("hidden_size"), Some(&AttributeValue::from(128i64)));
}

pub fn test_gru_cell_numeric_activation_reported(registry: &ExtenderRegistry) {
    let node = IrNode::new("GRUCell").with_attribute("activations", 3i64);
    let (node, errors) = extend_node(registry, node);
    assert!(matches!(
        &errors[..],
        [AttributeError::UnparseableElement { expected: "string", .. }]
    ));
    assert_eq!(node.attributes().get("activations"), Some(&AttributeValue::from(3i64)));
}

pub fn test_prior_box_float_lists(registry: &ExtenderRegistry) {
    let node = IrNode::new("PriorBox")
        .with_attribute("min_size", 64i64)
        .with_attribute("aspect_ratio", "2,3")
        .with_attribute("variance", "0.1,0.1,0.2,0.2");
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    let attributes = node.attributes();
    assert_eq!(attributes.get("min_size"), Some(&AttributeValue::from(vec![64.0])));
    assert_eq!(attributes.get("aspect_ratio"), Some(&AttributeValue::from(vec![2.0, 3.0])));
    assert_eq!(
        attributes.get("variance"),
        Some(&AttributeValue::from(vec![0.1f32, 0.1, 0.2, 0.2]))
    );

    let node = IrNode::new("PriorBoxClustered")
        .with_attribute("width", "16.5,32")
        .with_attribute("height", 8.0);
    let (node, errors) = extend_node(registry, node);
    assert!(errors.is_empty());
    assert_eq!(node.attributes().get("width"), Some(&AttributeValue::from(vec![16.5, 32.0])));
    assert_eq!(node.attributes().get("height"), Some(&AttributeValue::from(vec![8.0])));
}
