use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Storage type of the nonzero values of a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
}

impl ElementType {
    /// Size in bytes of one value.
    pub fn size(self) -> usize {
        match self {
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::U64 | ElementType::F64 => 8,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::I32 => "i32",
            ElementType::I64 => "i64",
            ElementType::U32 => "u32",
            ElementType::U64 => "u64",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Trait for numeric types that can be read out of a sparse matrix store.
pub trait MatrixValue: Copy + Default + Zero + PartialEq + PartialOrd + Debug + ToPrimitive + Send + Sync + 'static {
    /// `ElementType` matching this Rust type
    const ELEMENT_TYPE: ElementType;

    /// Lossy conversion used by the block summaries.
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl MatrixValue for i32 {
    const ELEMENT_TYPE: ElementType = ElementType::I32;
}
impl MatrixValue for i64 {
    const ELEMENT_TYPE: ElementType = ElementType::I64;
}
impl MatrixValue for u32 {
    const ELEMENT_TYPE: ElementType = ElementType::U32;
}
impl MatrixValue for u64 {
    const ELEMENT_TYPE: ElementType = ElementType::U64;
}
impl MatrixValue for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::F32;
}
impl MatrixValue for f64 {
    const ELEMENT_TYPE: ElementType = ElementType::F64;
}
