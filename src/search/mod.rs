//! Enumerative search for programs matching a set of examples
//!
//! - `candidate`: operation bindings, solved programs and the operator registry
//! - `ranking`: prior-weighted operator ordering and cutoff
//! - `enumerator`: lazy per-depth candidate enumeration
//! - `enumerative`: the iterative-deepening driver

pub mod candidate;
pub mod config;
pub mod enumerative;
pub mod enumerator;
pub mod ranking;
pub mod result;

pub use candidate::{Arguments, Candidate, OperatorRegistry, Program};
pub use config::{OrderingSource, SearchConfig};
pub use enumerative::{EnumerativeSearch, SearchState, Traversal, search};
pub use enumerator::CandidateEnumerator;
pub use ranking::{Priors, cutoff_from_arg};
pub use result::{SearchOutcome, SearchResult, SearchStatistics};

use crate::error::Result;
use crate::validation::io_set::IoSet;

/// Trait for search algorithms that find a program reproducing every example
pub trait SearchAlgorithm {
    /// Search for a program of at most `config.max_program_length` operations
    ///
    /// # Arguments
    /// * `io` - The examples; left at the solving state on success, at its
    ///   inputs otherwise
    /// * `registry` - Operators to draw from, in rank order
    /// * `config` - Length bound and budgets
    ///
    /// # Returns
    /// A SearchResult with the outcome, the program if solved, and statistics
    fn search(
        &mut self,
        io: &mut IoSet,
        registry: &OperatorRegistry,
        config: &SearchConfig,
    ) -> Result<SearchResult>;

    /// Get statistics from the most recent search
    fn statistics(&self) -> SearchStatistics;

    /// Reset the search state for a new search
    fn reset(&mut self);
}
