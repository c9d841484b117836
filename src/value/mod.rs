pub mod error;

pub use error::ValueError;

use compact_str::{CompactString, ToCompactString};
use std::fmt::Display;

/// The type a declaration fixes for a variable. Unknown keywords fall back
/// to the generic text type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Integer,
    Real,
    Boolean,
    String,
}

impl SemanticType {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "integer" => SemanticType::Integer,
            "real" => SemanticType::Real,
            "boolean" => SemanticType::Boolean,
            _ => SemanticType::String,
        }
    }
}

impl Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::Integer => write!(f, "integer"),
            SemanticType::Real => write!(f, "real"),
            SemanticType::Boolean => write!(f, "boolean"),
            SemanticType::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Real,
    Boolean,
    String,
    Character,
    Array,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "an integer"),
            ValueKind::Real => write!(f, "a real number"),
            ValueKind::Boolean => write!(f, "a boolean"),
            ValueKind::String => write!(f, "a string"),
            ValueKind::Character => write!(f, "a character"),
            ValueKind::Array => write!(f, "an array"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i32),
    Real(f64),
    Boolean(bool),
    String(CompactString),
    Array(ArrayValue),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Builds a value of the given declared type from external text, as the
    /// input boundary requires.
    pub fn from_text(semantic_type: SemanticType, text: &str) -> Result<Value, ValueError> {
        let conversion = |to| ValueError::TypeConversion {
            from: ValueKind::String,
            to,
        };
        match semantic_type {
            SemanticType::Integer => text
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| conversion(ValueKind::Integer)),
            SemanticType::Real => text
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| conversion(ValueKind::Real)),
            SemanticType::Boolean => match text {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(conversion(ValueKind::Boolean)),
            },
            SemanticType::String => Ok(Value::String(text.into())),
        }
    }
}

// Conversions. Each either produces the native representation or fails
// naming the source and requested kind.
impl Value {
    pub fn as_integer(&self) -> Result<i32, ValueError> {
        match self {
            Value::Integer(v) => Ok(*v),
            Value::Real(v) => Ok(*v as i32),
            Value::Boolean(v) => Ok(i32::from(*v)),
            Value::String(v) => v.parse().map_err(|_| ValueError::TypeConversion {
                from: ValueKind::String,
                to: ValueKind::Integer,
            }),
            Value::Array(_) => Err(ValueError::TypeConversion {
                from: ValueKind::Array,
                to: ValueKind::Integer,
            }),
        }
    }

    pub fn as_real(&self) -> Result<f64, ValueError> {
        match self {
            Value::Integer(v) => Ok(f64::from(*v)),
            Value::Real(v) => Ok(*v),
            Value::Boolean(v) => Ok(if *v { 1.0 } else { 0.0 }),
            Value::String(v) => v.parse().map_err(|_| ValueError::TypeConversion {
                from: ValueKind::String,
                to: ValueKind::Real,
            }),
            Value::Array(_) => Err(ValueError::TypeConversion {
                from: ValueKind::Array,
                to: ValueKind::Real,
            }),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, ValueError> {
        match self {
            Value::Integer(v) => Ok(*v != 0),
            Value::Real(v) => Ok(*v != 0.0),
            Value::Boolean(v) => Ok(*v),
            Value::String(v) => match v.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ValueError::TypeConversion {
                    from: ValueKind::String,
                    to: ValueKind::Boolean,
                }),
            },
            // Arrays are truthy when non-empty, kept for compatibility.
            Value::Array(v) => Ok(!v.is_empty()),
        }
    }

    pub fn as_char(&self) -> Result<char, ValueError> {
        let conversion = ValueError::TypeConversion {
            from: self.kind(),
            to: ValueKind::Character,
        };
        match self {
            Value::Integer(v) => char::from_u32(*v as u32).ok_or(conversion),
            Value::String(v) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(conversion),
                }
            }
            _ => Err(conversion),
        }
    }

    pub fn as_string(&self) -> CompactString {
        match self {
            Value::String(v) => v.clone(),
            other => other.to_compact_string(),
        }
    }

    pub fn as_array(&self) -> Result<&ArrayValue, ValueError> {
        match self {
            Value::Array(v) => Ok(v),
            other => Err(ValueError::TypeConversion {
                from: other.kind(),
                to: ValueKind::Array,
            }),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v:?}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Array(v) => {
                write!(f, "[")?;
                for (index, slot) in v.slots().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    match slot {
                        Some(value) => write!(f, "{value}")?,
                        None => write!(f, "?")?,
                    }
                }
                write!(f, "]")
            }
        }
    }
}

/// A fixed-size ordered sequence of values. The length is fixed at
/// construction and every slot starts out unset.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    values: Box<[Option<Value>]>,
}

impl ArrayValue {
    pub fn new(length: i64) -> Result<Self, ValueError> {
        if length <= 0 {
            return Err(ValueError::InvalidLength(length));
        }
        Ok(Self {
            values: vec![None; length as usize].into_boxed_slice(),
        })
    }

    pub fn from_values(values: Vec<Value>) -> Result<Self, ValueError> {
        if values.is_empty() {
            return Err(ValueError::InvalidLength(0));
        }
        Ok(Self {
            values: values.into_iter().map(Some).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<Option<&Value>, ValueError> {
        match self.values.get(index) {
            Some(slot) => Ok(slot.as_ref()),
            None => Err(ValueError::OutOfBounds {
                index,
                length: self.values.len(),
            }),
        }
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<(), ValueError> {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(ValueError::OutOfBounds {
                index,
                length: self.values.len(),
            }),
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = Option<&Value>> {
        self.values.iter().map(Option::as_ref)
    }
}
