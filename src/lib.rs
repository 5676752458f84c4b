//! Enumerative program synthesis over a typed list DSL
//!
//! Given input/output examples, searches programs of bounded length built
//! from a fixed operation library, in an order ranked by an operator prior.

pub mod error;
pub mod ir;
pub mod parser;
pub mod search;
pub mod semantics;
pub mod validation;

pub use error::{Result, SynthError};
pub use ir::{Operation, Value, ValueType};
pub use search::{
    CandidateEnumerator, EnumerativeSearch, OperatorRegistry, Priors, SearchAlgorithm,
    SearchConfig, SearchOutcome, SearchResult, search,
};
pub use validation::IoSet;
