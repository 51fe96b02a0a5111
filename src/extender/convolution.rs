use crate::attribute::{AttributeError, AttributeStore, query_attribute_ints};
use crate::extender::{Extender, report};
use crate::graph::IrNode;

const LIST_ATTRIBUTES: [&str; 5] = [
    "strides",
    "dilations",
    "pads_begin",
    "pads_end",
    "output_padding",
];

/// Shared by every convolution flavour. Besides turning the spatial
/// attributes into integer lists it derives the full-rank (batch and channel
/// prefixed) forms consumers index by tensor dimension.
pub struct ConvolutionExtender {
    op_type: &'static str,
}

impl ConvolutionExtender {
    pub fn new(op_type: &'static str) -> Self {
        Self { op_type }
    }

    fn is_backprop_data(&self) -> bool {
        self.op_type.ends_with("BackpropData")
    }
}

fn full_rank(prefix: &[i64], spatial: &[i64]) -> Vec<i64> {
    prefix.iter().chain(spatial).copied().collect()
}

fn derive_pads(attributes: &mut AttributeStore, issues: &mut Vec<AttributeError>) {
    let (Some(begin), Some(end)) = (
        query_attribute_ints(attributes, "pads_begin"),
        query_attribute_ints(attributes, "pads_end"),
    ) else {
        return;
    };
    if begin.len() != end.len() {
        issues.push(AttributeError::LengthMismatch(
            "pads_begin".to_string(),
            "pads_end".to_string(),
            begin.len(),
            end.len(),
        ));
        return;
    }

    // [[0, 0], [0, 0], [b0, e0], [b1, e1], ...] flattened
    let mut pad = vec![0i64; 4];
    for (b, e) in begin.iter().zip(&end) {
        pad.push(*b);
        pad.push(*e);
    }
    attributes.set("pad", pad);
    attributes.set("spatial_dims", (0..begin.len() as i64).map(|x| x + 2).collect::<Vec<_>>());
}

impl Extender for ConvolutionExtender {
    fn op_type(&self) -> &str {
        self.op_type
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        let attributes = node.attributes_mut();
        for name in LIST_ATTRIBUTES {
            report(issues, attributes.coerce_to_int_list(name));
        }

        if let Some(strides) = query_attribute_ints(attributes, "strides") {
            attributes.set("stride", full_rank(&[1, 1], &strides));
        }
        if let Some(dilations) = query_attribute_ints(attributes, "dilations") {
            attributes.set("dilation", full_rank(&[1, 1], &dilations));
        }
        if let Some(output_padding) = query_attribute_ints(attributes, "output_padding") {
            attributes.set("output_pad", full_rank(&[0, 0], &output_padding));
        }
        derive_pads(attributes, issues);

        attributes.set("batch_dims", vec![0i64]);
        attributes.set("channel_dims", vec![1i64]);
        // weights layout differs between forward and transposed convolution
        let (input_feature_channel, output_feature_channel) = if self.is_backprop_data() {
            (0i64, 1i64)
        } else {
            (1, 0)
        };
        attributes.set("input_feature_channel", input_feature_channel);
        attributes.set("output_feature_channel", output_feature_channel);
    }
}
