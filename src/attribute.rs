//! Per-node attribute storage and the normalization primitives extenders are
//! built from.

use crate::dtype::DTypeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributeError {
    #[error("Attribute \"{attribute}\" holds a {found}, expected {expected}")]
    Malformed {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Attribute \"{attribute}\" element \"{element}\" is not a valid {expected}")]
    UnparseableElement {
        attribute: String,
        element: String,
        expected: &'static str,
    },
    #[error("Attribute \"{attribute}\": {source}")]
    UnknownElementType {
        attribute: String,
        #[source]
        source: DTypeError,
    },
    #[error("Missing required attribute \"{0}\"")]
    Missing(String),
    #[error("Attributes \"{0}\" and \"{1}\" have mismatched lengths {2} and {3}")]
    LengthMismatch(String, String, usize, usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int(x) => write!(f, "{x}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Bool(x) => write!(f, "{x}"),
            Scalar::Str(x) => write!(f, "{x}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpaqueKind {
    Tensor,
    Graph,
}

impl OpaqueKind {
    pub fn name(&self) -> &'static str {
        match self {
            OpaqueKind::Tensor => "tensor",
            OpaqueKind::Graph => "graph",
        }
    }
}

/// Handle to a value extenders never look into, kept in its encoded form so
/// it survives re-serialization untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpaqueValue {
    pub kind: OpaqueKind,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Opaque(OpaqueValue),
}

impl AttributeValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Scalar(Scalar::Int(_)) => "int",
            AttributeValue::Scalar(Scalar::Float(_)) => "float",
            AttributeValue::Scalar(Scalar::Bool(_)) => "bool",
            AttributeValue::Scalar(Scalar::Str(_)) => "string",
            AttributeValue::List(_) => "list",
            AttributeValue::Opaque(x) => x.kind.name(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, AttributeValue::List(_))
    }
}

impl From<Scalar> for AttributeValue {
    fn from(value: Scalar) -> Self {
        AttributeValue::Scalar(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Scalar(Scalar::Int(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Scalar(Scalar::Bool(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Scalar(Scalar::Str(value.to_string()))
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Scalar(Scalar::Str(value))
    }
}

impl From<Vec<i64>> for AttributeValue {
    fn from(value: Vec<i64>) -> Self {
        AttributeValue::List(value.into_iter().map(Scalar::Int).collect())
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        AttributeValue::List(value.into_iter().map(Scalar::Float).collect())
    }
}

impl From<Vec<f32>> for AttributeValue {
    fn from(value: Vec<f32>) -> Self {
        AttributeValue::List(value.into_iter().map(|x| Scalar::Float(x as f64)).collect())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        AttributeValue::List(value.into_iter().map(Scalar::Str).collect())
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(value: Vec<&str>) -> Self {
        AttributeValue::List(value.into_iter().map(|x| Scalar::Str(x.to_string())).collect())
    }
}

/// Attribute name to value mapping of a single node. Names are unique and
/// iterate in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeStore {
    attributes: BTreeMap<String, AttributeValue>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns the previous value, if any.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    /// Moves the value under `from` to `to`, replacing whatever `to` held.
    /// Returns false when `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        match self.attributes.remove(from) {
            Some(value) => {
                self.attributes.insert(to.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(|x| x.as_str())
    }

    /// Wraps a scalar attribute into a single-element list of the same scalar
    /// type. Absent attributes and lists are left as they are.
    pub fn coerce_to_list(&mut self, name: &str) -> Result<(), AttributeError> {
        let Some(value) = self.attributes.get_mut(name) else {
            log::debug!("Attribute \"{name}\" absent, nothing to coerce");
            return Ok(());
        };
        let replacement = match value {
            AttributeValue::List(_) => return Ok(()),
            AttributeValue::Scalar(scalar) => AttributeValue::List(vec![scalar.clone()]),
            AttributeValue::Opaque(opaque) => {
                return Err(AttributeError::Malformed {
                    attribute: name.to_string(),
                    expected: "scalar or list",
                    found: opaque.kind.name(),
                });
            }
        };
        *value = replacement;
        Ok(())
    }

    /// Turns an integer-valued scalar (`2`, `"2"`, `true`) into `Scalar::Int`.
    /// Absent attributes are left as they are.
    pub fn coerce_to_int(&mut self, name: &str) -> Result<(), AttributeError> {
        let Some(value) = self.attributes.get(name) else {
            log::debug!("Attribute \"{name}\" absent, nothing to coerce");
            return Ok(());
        };
        let parsed: i64 = match value {
            AttributeValue::Scalar(Scalar::Int(_)) => return Ok(()),
            AttributeValue::Scalar(Scalar::Bool(x)) => *x as i64,
            AttributeValue::Scalar(Scalar::Str(x)) => {
                x.trim()
                    .parse()
                    .map_err(|_| AttributeError::UnparseableElement {
                        attribute: name.to_string(),
                        element: x.clone(),
                        expected: "integer",
                    })?
            }
            other => {
                return Err(AttributeError::Malformed {
                    attribute: name.to_string(),
                    expected: "integer",
                    found: other.kind_name(),
                });
            }
        };
        self.attributes
            .insert(name.to_string(), AttributeValue::Scalar(Scalar::Int(parsed)));
        Ok(())
    }

    /// Like [`AttributeStore::coerce_to_list`], additionally requiring every
    /// element to be an integer. Strings in IR text form (`"2,3"`) are split
    /// and parsed, bools become 0/1.
    pub fn coerce_to_int_list(&mut self, name: &str) -> Result<(), AttributeError> {
        self.coerce_elements(name, "integer", |element| match element {
            Scalar::Int(x) => Some(vec![Scalar::Int(*x)]),
            Scalar::Bool(x) => Some(vec![Scalar::Int(*x as i64)]),
            Scalar::Float(_) => None,
            Scalar::Str(x) => split_ir_list(x)
                .map(|item| item.parse::<i64>().ok().map(Scalar::Int))
                .collect(),
        })
    }

    /// Floating point counterpart of [`AttributeStore::coerce_to_int_list`];
    /// integers widen to floats. Values are kept at f32 precision, the width
    /// of ONNX float attributes.
    pub fn coerce_to_float_list(&mut self, name: &str) -> Result<(), AttributeError> {
        let float = |x: f32| Scalar::Float(x as f64);
        self.coerce_elements(name, "float", |element| match element {
            Scalar::Int(x) => Some(vec![float(*x as f32)]),
            Scalar::Float(x) => Some(vec![float(*x as f32)]),
            Scalar::Bool(_) => None,
            Scalar::Str(x) => split_ir_list(x)
                .map(|item| item.parse::<f32>().ok().map(float))
                .collect(),
        })
    }

    pub fn coerce_to_string_list(&mut self, name: &str) -> Result<(), AttributeError> {
        self.coerce_elements(name, "string", |element| match element {
            Scalar::Str(x) => split_ir_list(x)
                .map(|item| (!item.is_empty()).then(|| Scalar::Str(item.to_string())))
                .collect(),
            _ => None,
        })
    }

    fn coerce_elements(
        &mut self,
        name: &str,
        expected: &'static str,
        convert: impl Fn(&Scalar) -> Option<Vec<Scalar>>,
    ) -> Result<(), AttributeError> {
        let elements: &[Scalar] = match self.attributes.get(name) {
            None => {
                log::debug!("Attribute \"{name}\" absent, nothing to coerce");
                return Ok(());
            }
            Some(AttributeValue::Scalar(x)) => std::slice::from_ref(x),
            Some(AttributeValue::List(x)) => x,
            Some(AttributeValue::Opaque(x)) => {
                return Err(AttributeError::Malformed {
                    attribute: name.to_string(),
                    expected: "scalar or list",
                    found: x.kind.name(),
                });
            }
        };

        let mut normalized = Vec::with_capacity(elements.len());
        for element in elements {
            let converted =
                convert(element).ok_or_else(|| AttributeError::UnparseableElement {
                    attribute: name.to_string(),
                    element: element.to_string(),
                    expected,
                })?;
            normalized.extend(converted);
        }
        self.attributes
            .insert(name.to_string(), AttributeValue::List(normalized));
        Ok(())
    }
}

/// Splits the comma separated text form IR writers use for list attributes.
/// The empty string is the empty list; an empty element inside a list is kept
/// so that parsing it fails.
pub(crate) fn split_ir_list(s: &str) -> impl Iterator<Item = &str> {
    let s = s.trim();
    (!s.is_empty())
        .then(|| s.split(',').map(str::trim))
        .into_iter()
        .flatten()
}

pub fn query_attribute_int(attributes: &AttributeStore, name: &str) -> Option<i64> {
    match attributes.get(name)? {
        AttributeValue::Scalar(Scalar::Int(x)) => Some(*x),
        AttributeValue::Scalar(Scalar::Str(x)) => x.trim().parse().ok(),
        _ => None,
    }
}

pub fn query_attribute_ints(attributes: &AttributeStore, name: &str) -> Option<Vec<i64>> {
    if let AttributeValue::List(elements) = attributes.get(name)? {
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            if let Scalar::Int(x) = element {
                out.push(*x)
            } else {
                return None;
            }
        }
        Some(out)
    } else {
        None
    }
}

pub fn query_attribute_float(attributes: &AttributeStore, name: &str) -> Option<f64> {
    match attributes.get(name)? {
        AttributeValue::Scalar(Scalar::Float(x)) => Some(*x),
        AttributeValue::Scalar(Scalar::Int(x)) => Some(*x as f64),
        _ => None,
    }
}

pub fn query_attribute_string(attributes: &AttributeStore, name: &str) -> Option<String> {
    if let AttributeValue::Scalar(Scalar::Str(x)) = attributes.get(name)? {
        Some(x.clone())
    } else {
        None
    }
}

pub fn query_attribute_bool(attributes: &AttributeStore, name: &str) -> Option<bool> {
    match attributes.get(name)? {
        AttributeValue::Scalar(Scalar::Bool(x)) => Some(*x),
        AttributeValue::Scalar(Scalar::Int(x)) => Some(*x != 0),
        AttributeValue::Scalar(Scalar::Str(x)) => match x.trim() {
            "true" | "True" | "1" => Some(true),
            "false" | "False" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
