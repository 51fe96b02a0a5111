use crate::attribute::{AttributeStore, AttributeValue, OpaqueKind, OpaqueValue, Scalar};
use crate::onnx;
use crate::onnx::attribute_proto::AttributeType;
use prost::Message;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum IrDecodingError {
    #[error("Protobuf decoding error")]
    ProtobufDecodeError(#[from] anyhow::Error),
    #[error("Missing field \"{0}\"")]
    MissingField(&'static str),
    #[error("Unsupported type {1:?} for attribute \"{0}\"")]
    UnsupportedAttributeType(String, AttributeType),
    #[error("Duplicate attribute \"{1}\" on node {0}")]
    DuplicateAttribute(String, String),
    #[error("Attribute \"{0}\" holds a string that is not valid UTF-8")]
    InvalidUtf8(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IrEncodingError {
    #[error("Attribute \"{0}\" mixes element kinds that cannot share one ONNX list")]
    HeterogeneousList(String),
    #[error("Opaque attribute \"{0}\" does not hold a valid encoded {1}")]
    CorruptOpaque(String, &'static str, #[source] prost::DecodeError),
}

#[derive(Debug, thiserror::Error)]
pub enum IrSerializationError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type NodeId = usize;

/// One operator instance. The operator type and the edges are fixed once the
/// node is built; only the attribute store can be changed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrNode {
    op_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(default)]
    attributes: AttributeStore,
}

impl IrNode {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            name: None,
            domain: String::new(),
            inputs: vec![],
            outputs: vec![],
            attributes: AttributeStore::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_inputs<S: Into<String>>(mut self, inputs: impl IntoIterator<Item = S>) -> Self {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<S: Into<String>>(mut self, outputs: impl IntoIterator<Item = S>) -> Self {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    /// Name for log lines and diagnostics; falls back to the operator type.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.op_type)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsetImport {
    pub domain: String,
    pub version: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IrGraph {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    opset_imports: Vec<OpsetImport>,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    nodes: Vec<IrNode>,
}

impl IrGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn add_node(&mut self, node: IrNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_opset_import(&mut self, domain: &str, version: i64) {
        self.opset_imports.push(OpsetImport {
            domain: domain.to_string(),
            version,
        });
    }

    pub fn opset_imports(&self) -> &[OpsetImport] {
        &self.opset_imports
    }

    pub fn core_opset_version(&self) -> Option<i64> {
        self.opset_imports
            .iter()
            .find(|x| x.domain.is_empty())
            .map(|x| x.version)
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&IrNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut IrNode> {
        self.nodes.get_mut(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &IrNode)> {
        self.nodes.iter().enumerate()
    }

    /// Producer-before-consumer order over tensor-name edges, ties broken by
    /// insertion order. `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<NodeId>> {
        let mut producers: HashMap<&str, NodeId> = HashMap::new();
        for (id, node) in self.nodes() {
            for output in node.outputs() {
                producers.insert(output.as_str(), id);
            }
        }

        let mut dependents: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); self.nodes.len()];
        let mut remaining_deps = vec![0usize; self.nodes.len()];
        for (id, node) in self.nodes() {
            let deps: BTreeSet<NodeId> = node
                .inputs()
                .iter()
                .filter_map(|x| producers.get(x.as_str()).copied())
                .collect();
            remaining_deps[id] = deps.len();
            for dep in deps {
                dependents[dep].insert(id);
            }
        }

        let mut ready: BTreeSet<NodeId> = (0..self.nodes.len())
            .filter(|x| remaining_deps[*x] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = ready.pop_first() {
            order.push(id);
            for dependent in &dependents[id] {
                remaining_deps[*dependent] -= 1;
                if remaining_deps[*dependent] == 0 {
                    ready.insert(*dependent);
                }
            }
        }

        if order.len() == self.nodes.len() {
            Some(order)
        } else {
            None
        }
    }

    pub fn from_onnx_bytes(onnx_bytes: &[u8]) -> Result<Self, IrDecodingError> {
        let model = onnx::ModelProto::decode(onnx_bytes)
            .map_err(|x| IrDecodingError::ProtobufDecodeError(anyhow::Error::from(x)))?;
        Self::from_onnx_model_proto(&model)
    }

    pub fn from_onnx_model_proto(model_proto: &onnx::ModelProto) -> Result<Self, IrDecodingError> {
        let onnx_graph = model_proto
            .graph
            .as_ref()
            .ok_or(IrDecodingError::MissingField("graph"))?;

        let mut graph = Self::new();
        graph.name = if onnx_graph.name.is_empty() {
            None
        } else {
            Some(onnx_graph.name.clone())
        };
        for opset_proto in &model_proto.opset_import {
            graph.add_opset_import(&opset_proto.domain, opset_proto.version);
        }
        graph.inputs = onnx_graph.input.iter().map(|x| x.name.clone()).collect();
        graph.outputs = onnx_graph.output.iter().map(|x| x.name.clone()).collect();

        for onnx_node in &onnx_graph.node {
            graph.add_node(IrNode::try_from(onnx_node)?);
        }
        log::debug!(
            "Decoded graph {} with {} nodes",
            graph.name().unwrap_or("<unnamed>"),
            graph.len()
        );

        Ok(graph)
    }

    pub fn to_onnx_model_proto(&self) -> Result<onnx::ModelProto, IrEncodingError> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            nodes.push(onnx::NodeProto::try_from(node)?);
        }
        Ok(onnx::ModelProto {
            graph: Some(onnx::GraphProto {
                node: nodes,
                name: self.name.clone().unwrap_or_default(),
                input: self
                    .inputs
                    .iter()
                    .map(|x| onnx::ValueInfoProto {
                        name: x.clone(),
                        ..Default::default()
                    })
                    .collect(),
                output: self
                    .outputs
                    .iter()
                    .map(|x| onnx::ValueInfoProto {
                        name: x.clone(),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }),
            opset_import: self
                .opset_imports
                .iter()
                .map(|x| onnx::OperatorSetIdProto {
                    domain: x.domain.clone(),
                    version: x.version,
                })
                .collect(),
            ..Default::default()
        })
    }

    pub fn to_onnx_bytes(&self) -> Result<Vec<u8>, IrEncodingError> {
        Ok(self.to_onnx_model_proto()?.encode_to_vec())
    }

    pub fn from_json(json: &str) -> Result<Self, IrSerializationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, IrSerializationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_json(path: &Path) -> Result<Self, IrSerializationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), IrSerializationError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl TryFrom<&onnx::NodeProto> for IrNode {
    type Error = IrDecodingError;

    fn try_from(onnx_node: &onnx::NodeProto) -> Result<Self, Self::Error> {
        let mut node = IrNode::new(onnx_node.op_type.clone())
            .with_inputs(onnx_node.input.iter().cloned())
            .with_outputs(onnx_node.output.iter().cloned());
        if !onnx_node.name.is_empty() {
            node.name = Some(onnx_node.name.clone());
        }
        node.domain = onnx_node.domain.clone();

        for attr in &onnx_node.attribute {
            if node.attributes.contains(&attr.name) {
                return Err(IrDecodingError::DuplicateAttribute(
                    node.display_name().to_string(),
                    attr.name.clone(),
                ));
            }
            node.attributes.set(attr.name.clone(), AttributeValue::try_from(attr)?);
        }
        Ok(node)
    }
}

fn decode_string(attribute: &str, bytes: &[u8]) -> Result<String, IrDecodingError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| IrDecodingError::InvalidUtf8(attribute.to_string()))
}

impl TryFrom<&onnx::AttributeProto> for AttributeValue {
    type Error = IrDecodingError;

    fn try_from(attr: &onnx::AttributeProto) -> Result<Self, Self::Error> {
        let attr_type = AttributeType::try_from(attr.r#type)
            .map_err(|x| IrDecodingError::ProtobufDecodeError(anyhow::Error::from(x)))?;
        Ok(match attr_type {
            AttributeType::Float => AttributeValue::Scalar(Scalar::Float(attr.f as f64)),
            AttributeType::Int => AttributeValue::Scalar(Scalar::Int(attr.i)),
            AttributeType::String => {
                AttributeValue::Scalar(Scalar::Str(decode_string(&attr.name, &attr.s)?))
            }
            AttributeType::Floats => {
                AttributeValue::List(attr.floats.iter().map(|x| Scalar::Float(*x as f64)).collect())
            }
            AttributeType::Ints => {
                AttributeValue::List(attr.ints.iter().map(|x| Scalar::Int(*x)).collect())
            }
            AttributeType::Strings => {
                let mut strings = Vec::with_capacity(attr.strings.len());
                for s in &attr.strings {
                    strings.push(Scalar::Str(decode_string(&attr.name, s)?));
                }
                AttributeValue::List(strings)
            }
            AttributeType::Tensor => AttributeValue::Opaque(OpaqueValue {
                kind: OpaqueKind::Tensor,
                bytes: attr
                    .t
                    .as_ref()
                    .ok_or(IrDecodingError::MissingField("attribute.t"))?
                    .encode_to_vec(),
            }),
            AttributeType::Graph => AttributeValue::Opaque(OpaqueValue {
                kind: OpaqueKind::Graph,
                bytes: attr
                    .g
                    .as_ref()
                    .ok_or(IrDecodingError::MissingField("attribute.g"))?
                    .encode_to_vec(),
            }),
            x => Err(IrDecodingError::UnsupportedAttributeType(attr.name.clone(), x))?,
        })
    }
}

impl TryFrom<&IrNode> for onnx::NodeProto {
    type Error = IrEncodingError;

    fn try_from(node: &IrNode) -> Result<Self, Self::Error> {
        let mut attribute = Vec::with_capacity(node.attributes.len());
        for (name, value) in node.attributes.iter() {
            attribute.push(encode_attribute(name, value)?);
        }
        Ok(onnx::NodeProto {
            input: node.inputs.clone(),
            output: node.outputs.clone(),
            name: node.name.clone().unwrap_or_default(),
            op_type: node.op_type.clone(),
            attribute,
            domain: node.domain.clone(),
            ..Default::default()
        })
    }
}

fn encode_attribute(
    name: &str,
    value: &AttributeValue,
) -> Result<onnx::AttributeProto, IrEncodingError> {
    let mut attr = onnx::AttributeProto {
        name: name.to_string(),
        ..Default::default()
    };
    match value {
        AttributeValue::Scalar(Scalar::Int(x)) => {
            attr.r#type = AttributeType::Int as i32;
            attr.i = *x;
        }
        AttributeValue::Scalar(Scalar::Bool(x)) => {
            attr.r#type = AttributeType::Int as i32;
            attr.i = *x as i64;
        }
        AttributeValue::Scalar(Scalar::Float(x)) => {
            attr.r#type = AttributeType::Float as i32;
            attr.f = *x as f32;
        }
        AttributeValue::Scalar(Scalar::Str(x)) => {
            attr.r#type = AttributeType::String as i32;
            attr.s = x.as_bytes().to_vec();
        }
        AttributeValue::List(elements) => {
            let any_float = elements.iter().any(|x| matches!(x, Scalar::Float(_)));
            let any_str = elements.iter().any(|x| matches!(x, Scalar::Str(_)));
            if any_str {
                attr.r#type = AttributeType::Strings as i32;
                for element in elements {
                    match element {
                        Scalar::Str(x) => attr.strings.push(x.as_bytes().to_vec()),
                        _ => return Err(IrEncodingError::HeterogeneousList(name.to_string())),
                    }
                }
            } else if any_float {
                attr.r#type = AttributeType::Floats as i32;
                for element in elements {
                    match element {
                        Scalar::Float(x) => attr.floats.push(*x as f32),
                        Scalar::Int(x) => attr.floats.push(*x as f32),
                        _ => return Err(IrEncodingError::HeterogeneousList(name.to_string())),
                    }
                }
            } else {
                attr.r#type = AttributeType::Ints as i32;
                for element in elements {
                    match element {
                        Scalar::Int(x) => attr.ints.push(*x),
                        Scalar::Bool(x) => attr.ints.push(*x as i64),
                        _ => return Err(IrEncodingError::HeterogeneousList(name.to_string())),
                    }
                }
            }
        }
        AttributeValue::Opaque(opaque) => match opaque.kind {
            OpaqueKind::Tensor => {
                attr.r#type = AttributeType::Tensor as i32;
                attr.t = Some(onnx::TensorProto::decode(opaque.bytes.as_slice()).map_err(
                    |x| IrEncodingError::CorruptOpaque(name.to_string(), "tensor", x),
                )?);
            }
            OpaqueKind::Graph => {
                attr.r#type = AttributeType::Graph as i32;
                attr.g = Some(onnx::GraphProto::decode(opaque.bytes.as_slice()).map_err(
                    |x| IrEncodingError::CorruptOpaque(name.to_string(), "graph", x),
                )?);
            }
        },
    }
    Ok(attr)
}
