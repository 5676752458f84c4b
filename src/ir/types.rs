//! Core value types for the list DSL

use crate::error::{Result, SynthError};
use std::fmt;

/// Type tag of a register value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Int,
    Array,
}

impl ValueType {
    pub const ALL: [ValueType; 2] = [ValueType::Int, ValueType::Array];

    /// Dense index, used for per-type lookup tables
    pub fn index(self) -> usize {
        match self {
            ValueType::Int => 0,
            ValueType::Array => 1,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "Int"),
            ValueType::Array => write!(f, "Array"),
        }
    }
}

impl std::str::FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Int" => Ok(ValueType::Int),
            "Array" => Ok(ValueType::Array),
            _ => Err(format!("unexpected type '{}'", s)),
        }
    }
}

/// A scalar or a sequence of 32-bit integers.
///
/// Both variants share one buffer, so re-tagging a register slot and writing
/// a new result into it reuses the allocation left by the previous occupant.
/// An `Int` always holds exactly one element.
#[derive(Debug, Clone)]
pub struct Value {
    tag: ValueType,
    values: Vec<i32>,
}

impl Value {
    pub fn int(value: i32) -> Self {
        Value {
            tag: ValueType::Int,
            values: vec![value],
        }
    }

    pub fn array(values: Vec<i32>) -> Self {
        Value {
            tag: ValueType::Array,
            values,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.tag
    }

    pub fn is_int(&self) -> bool {
        self.tag == ValueType::Int
    }

    pub fn is_array(&self) -> bool {
        self.tag == ValueType::Array
    }

    /// Change the tag in place. Switching to `Int` pads or truncates the buffer
    /// to a single element; switching to `Array` keeps the buffer untouched.
    pub fn set_type(&mut self, tag: ValueType) {
        if tag == ValueType::Int {
            self.values.resize(1, 0);
        }
        self.tag = tag;
    }

    fn check_tag(&self, tag: ValueType) -> Result<()> {
        if self.tag == tag {
            Ok(())
        } else {
            Err(SynthError::TypeMismatch {
                expected: tag,
                found: self.tag,
            })
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        self.check_tag(ValueType::Int)?;
        Ok(self.values[0])
    }

    pub fn set_int(&mut self, value: i32) {
        self.tag = ValueType::Int;
        self.values.clear();
        self.values.push(value);
    }

    pub fn as_slice(&self) -> Result<&[i32]> {
        self.check_tag(ValueType::Array)?;
        Ok(&self.values)
    }

    /// Overwrite with a copy of `values`, reusing the existing buffer
    pub fn set_array(&mut self, values: &[i32]) {
        self.tag = ValueType::Array;
        self.values.clear();
        self.values.extend_from_slice(values);
    }

    /// Retag as an empty array and hand out the buffer for appending
    pub fn clear_array(&mut self) -> &mut Vec<i32> {
        self.tag = ValueType::Array;
        self.values.clear();
        &mut self.values
    }

    /// Mutable access to the element buffer of an array value
    pub fn array_mut(&mut self) -> Result<&mut Vec<i32>> {
        self.check_tag(ValueType::Array)?;
        Ok(&mut self.values)
    }

    pub fn len(&self) -> Result<usize> {
        self.check_tag(ValueType::Array)?;
        Ok(self.values.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, idx: usize) -> Result<i32> {
        self.check_tag(ValueType::Array)?;
        self.values
            .get(idx)
            .copied()
            .ok_or(SynthError::IndexOutOfRange {
                index: idx as i64,
                len: self.values.len(),
            })
    }

    pub fn set(&mut self, idx: usize, value: i32) -> Result<()> {
        self.check_tag(ValueType::Array)?;
        let len = self.values.len();
        match self.values.get_mut(idx) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SynthError::IndexOutOfRange {
                index: idx as i64,
                len,
            }),
        }
    }

    /// Resize an array value, zero-filling new elements
    pub fn resize(&mut self, len: usize) -> Result<()> {
        self.check_tag(ValueType::Array)?;
        self.values.resize(len, 0);
        Ok(())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::int(0)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.tag, other.tag) {
            (ValueType::Int, ValueType::Int) => self.values[0] == other.values[0],
            (ValueType::Array, ValueType::Array) => self.values == other.values,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::int(value)
    }
}

impl From<Vec<i32>> for Value {
    fn from(values: Vec<i32>) -> Self {
        Value::array(values)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            ValueType::Int => write!(f, "{}", self.values[0]),
            ValueType::Array => {
                write!(f, "[")?;
                for (i, v) in self.values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}
