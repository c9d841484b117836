use super::ValueKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("Cannot convert {from} to {to}")]
    TypeConversion { from: ValueKind, to: ValueKind },
    #[error("Array length must be at least 1 but got {0}")]
    InvalidLength(i64),
    #[error("Index {index} is out of bounds for an array of length {length}")]
    OutOfBounds { index: usize, length: usize },
}
