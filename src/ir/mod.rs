//! Intermediate Representation (IR) for the list DSL: values and operations

pub mod operations;
pub mod types;

// Re-export commonly used types
pub use operations::{
    ACCESS_SENTINEL, ArgTypes, BinFn, BoundsPolicy, IntFn, Operation, Predicate, Signature,
    SignatureClass,
};
pub use types::{Value, ValueType};
