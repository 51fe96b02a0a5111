//! Per-operator attribute extenders and the registry that dispatches to them.
//!
//! Each extender owns exactly one operator type name. The built-in table is
//! assembled in one place by [`builtin_extenders`]; adding a new operator
//! means writing an [`Extender`] and listing it there, nothing in the graph
//! walker changes.

mod convolution;
mod element_type;
mod fake_quantize;
mod image_patches;
mod interpolate;
mod pad;
mod parameter;
mod prior_box;
mod reorg_yolo;
mod rnn_cell;
mod strided_slice;
mod topk;

pub use convolution::ConvolutionExtender;
pub use element_type::ElementTypeExtender;
pub use fake_quantize::FakeQuantizeExtender;
pub use image_patches::ExtractImagePatchesExtender;
pub use interpolate::InterpolateExtender;
pub use pad::PadExtender;
pub use parameter::ParameterExtender;
pub use prior_box::{PriorBoxClusteredExtender, PriorBoxExtender};
pub use reorg_yolo::ReorgYoloExtender;
pub use rnn_cell::RnnCellExtender;
pub use strided_slice::StridedSliceExtender;
pub use topk::TopKExtender;

use crate::attribute::AttributeError;
use crate::graph::IrNode;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtenderRegistryError {
    #[error("More than one extender registered for operator type \"{0}\"")]
    RegistrationConflict(String),
}

/// Normalizes the attributes of nodes of one operator type.
///
/// Implementations only touch the attribute store of the node they are given
/// and must be idempotent. Problems with individual attributes go to `issues`;
/// the remaining attributes are still normalized.
pub trait Extender: Send + Sync {
    fn op_type(&self) -> &str;
    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>);
}

pub(crate) fn report(issues: &mut Vec<AttributeError>, result: Result<(), AttributeError>) {
    if let Err(err) = result {
        issues.push(err);
    }
}

/// Adapts a plain function into an [`Extender`].
pub struct FnExtender<F> {
    op_type: String,
    extend_fn: F,
}

impl<F> FnExtender<F>
where
    F: Fn(&mut IrNode, &mut Vec<AttributeError>) + Send + Sync,
{
    pub fn new(op_type: &str, extend_fn: F) -> Self {
        Self {
            op_type: op_type.to_string(),
            extend_fn,
        }
    }
}

impl<F> Extender for FnExtender<F>
where
    F: Fn(&mut IrNode, &mut Vec<AttributeError>) + Send + Sync,
{
    fn op_type(&self) -> &str {
        &self.op_type
    }

    fn extend(&self, node: &mut IrNode, issues: &mut Vec<AttributeError>) {
        (self.extend_fn)(node, issues)
    }
}

#[derive(Default)]
pub struct ExtenderRegistry {
    extenders: HashMap<String, Box<dyn Extender>>,
}

impl ExtenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in extender.
    pub fn with_builtin_extenders() -> Result<Self, ExtenderRegistryError> {
        let mut registry = Self::new();
        for extender in builtin_extenders() {
            registry.register_boxed(extender)?;
        }
        log::debug!("Registered {} built-in extenders", registry.len());
        Ok(registry)
    }

    pub fn register(
        &mut self,
        extender: impl Extender + 'static,
    ) -> Result<(), ExtenderRegistryError> {
        self.register_boxed(Box::new(extender))
    }

    pub fn register_fn<F>(
        &mut self,
        op_type: &str,
        extend_fn: F,
    ) -> Result<(), ExtenderRegistryError>
    where
        F: Fn(&mut IrNode, &mut Vec<AttributeError>) + Send + Sync + 'static,
    {
        self.register(FnExtender::new(op_type, extend_fn))
    }

    pub fn register_boxed(
        &mut self,
        extender: Box<dyn Extender>,
    ) -> Result<(), ExtenderRegistryError> {
        match self.extenders.entry(extender.op_type().to_string()) {
            Entry::Occupied(entry) => {
                log::error!("Extender for \"{}\" registered twice", entry.key());
                Err(ExtenderRegistryError::RegistrationConflict(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                entry.insert(extender);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, op_type: &str) -> Option<&dyn Extender> {
        self.extenders.get(op_type).map(|x| x.as_ref())
    }

    /// Registered operator types, sorted.
    pub fn op_types(&self) -> Vec<&str> {
        let mut op_types: Vec<&str> = self.extenders.keys().map(|x| x.as_str()).collect();
        op_types.sort_unstable();
        op_types
    }

    pub fn len(&self) -> usize {
        self.extenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extenders.is_empty()
    }
}

impl std::fmt::Debug for ExtenderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtenderRegistry")
            .field("op_types", &self.op_types())
            .finish()
    }
}

macro_rules! builtin_extenders {
    ($($extender:expr),* $(,)?) => {
        pub fn builtin_extenders() -> Vec<Box<dyn Extender>> {
            vec![$(Box::new($extender) as Box<dyn Extender>),*]
        }
    };
}

builtin_extenders![
    InterpolateExtender,
    ConvolutionExtender::new("Convolution"),
    ConvolutionExtender::new("GroupConvolution"),
    ConvolutionExtender::new("BinaryConvolution"),
    ConvolutionExtender::new("DeformableConvolution"),
    ConvolutionExtender::new("ConvolutionBackpropData"),
    ConvolutionExtender::new("GroupConvolutionBackpropData"),
    StridedSliceExtender,
    PadExtender,
    ElementTypeExtender::new("Convert", "destination_type", "dst_type"),
    ElementTypeExtender::new("NonZero", "output_type", "output_type"),
    ElementTypeExtender::new("ShapeOf", "output_type", "output_type"),
    ElementTypeExtender::new("Bucketize", "output_type", "output_type"),
    TopKExtender,
    ParameterExtender,
    ExtractImagePatchesExtender,
    ReorgYoloExtender,
    PriorBoxExtender,
    PriorBoxClusteredExtender,
    RnnCellExtender::new("LSTMCell"),
    RnnCellExtender::new("GRUCell"),
    RnnCellExtender::new("RNNCell"),
    FakeQuantizeExtender,
];

static BUILTIN_REGISTRY: OnceCell<ExtenderRegistry> = OnceCell::new();

/// Process-wide registry of the built-in extenders, built on first use.
/// A conflicting table is reported to every caller and never cached.
pub fn builtin_registry() -> Result<&'static ExtenderRegistry, ExtenderRegistryError> {
    BUILTIN_REGISTRY.get_or_try_init(ExtenderRegistry::with_builtin_extenders)
}
