use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DTypeError {
    #[error("Unknown IR element type \"{0}\"")]
    UnknownElementType(String),
}

/// Element types as they appear in type-carrying IR attributes
/// (`element_type`, `destination_type`, `output_type`, ...).
///
/// Parsing accepts both the short IR spelling (`f32`) and the long one
/// (`float32`); [`DType::ir_name`] is the canonical written form.
#[derive(
    Copy,
    Clone,
    Debug,
    Hash,
    Eq,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[strum(ascii_case_insensitive)]
pub enum DType {
    #[strum(serialize = "f64", serialize = "float64", serialize = "fp64")]
    F64,
    #[strum(serialize = "f32", serialize = "float32", serialize = "fp32")]
    F32,
    #[strum(serialize = "bf16", serialize = "bfloat16")]
    BF16,
    #[strum(serialize = "f16", serialize = "float16", serialize = "fp16")]
    F16,
    #[strum(serialize = "u64", serialize = "uint64")]
    U64,
    #[strum(serialize = "i64", serialize = "int64")]
    I64,
    #[strum(serialize = "u32", serialize = "uint32")]
    U32,
    #[strum(serialize = "i32", serialize = "int32")]
    I32,
    #[strum(serialize = "u16", serialize = "uint16")]
    U16,
    #[strum(serialize = "i16", serialize = "int16")]
    I16,
    #[strum(serialize = "u8", serialize = "uint8")]
    U8,
    #[strum(serialize = "i8", serialize = "int8")]
    I8,
    #[strum(serialize = "boolean", serialize = "bool")]
    BOOL,
}

impl DType {
    pub fn ir_name(&self) -> &'static str {
        match self {
            DType::F64 => "f64",
            DType::F32 => "f32",
            DType::BF16 => "bf16",
            DType::F16 => "f16",
            DType::U64 => "u64",
            DType::I64 => "i64",
            DType::U32 => "u32",
            DType::I32 => "i32",
            DType::U16 => "u16",
            DType::I16 => "i16",
            DType::U8 => "u8",
            DType::I8 => "i8",
            DType::BOOL => "boolean",
        }
    }

    pub fn from_ir_name(name: &str) -> Result<Self, DTypeError> {
        DType::from_str(name.trim()).map_err(|_| DTypeError::UnknownElementType(name.to_string()))
    }
}
