//! Lazy, resumable candidate enumeration for one search depth
//!
//! Candidates are ordered by operator rank, then by argument binding in
//! row-major order. Position `p` is resolved by walking operators in rank
//! order; an operator whose bindings all lie before `p` is skipped in O(1)
//! once its cumulative count is cached, so draining a depth costs time
//! proportional to the number of bindings rather than positions times
//! operators.

use crate::ir::operations::ArgTypes;
use crate::ir::types::ValueType;
use crate::search::candidate::{Arguments, Candidate, OperatorRegistry};
use crate::validation::io_set::IoSet;

/// Enumerates the well-typed candidates of one depth.
///
/// Owns its cumulative-count cache; [`CandidateEnumerator::init`] and
/// [`CandidateEnumerator::reset`] invalidate it together with the position.
#[derive(Debug, Clone)]
pub struct CandidateEnumerator<'r> {
    registry: &'r OperatorRegistry,
    types: Vec<ValueType>,
    /// Register indices holding each type, ascending, indexed by `ValueType::index`
    by_type: [Vec<usize>; 2],
    /// Bindings of operators `0..=i` once operator `i` has been fully scanned
    cumulative: Vec<Option<usize>>,
    position: usize,
}

impl<'r> CandidateEnumerator<'r> {
    pub fn new(registry: &'r OperatorRegistry) -> Self {
        CandidateEnumerator {
            registry,
            types: Vec::new(),
            by_type: [Vec::new(), Vec::new()],
            cumulative: vec![None; registry.len()],
            position: 0,
        }
    }

    /// Capture the live type sequence of the example set and restart
    pub fn init(&mut self, io: &IoSet) {
        self.types.clear();
        if let Some(first) = io.examples().first() {
            self.types.extend(first.state.types());
        }
        self.restart();
    }

    /// Restart enumeration over the given register types
    pub fn reset(&mut self, types: &[ValueType]) {
        self.types.clear();
        self.types.extend_from_slice(types);
        self.restart();
    }

    fn restart(&mut self) {
        for list in &mut self.by_type {
            list.clear();
        }
        for (i, ty) in self.types.iter().enumerate() {
            self.by_type[ty.index()].push(i);
        }
        self.cumulative.clear();
        self.cumulative.resize(self.registry.len(), None);
        self.position = 0;
    }

    pub fn types(&self) -> &[ValueType] {
        &self.types
    }

    /// Number of candidates handed out since the last reset
    pub fn position(&self) -> usize {
        self.position
    }

    fn registers_of(&self, ty: ValueType) -> &[usize] {
        &self.by_type[ty.index()]
    }

    fn binding_count(&self, args: ArgTypes) -> usize {
        match args {
            ArgTypes::Unary(t) => self.registers_of(t).len(),
            ArgTypes::Binary(t1, t2) => self.registers_of(t1).len() * self.registers_of(t2).len(),
        }
    }

    /// The `k`-th binding in row-major order; `k` must be below the count
    fn binding_at(&self, args: ArgTypes, k: usize) -> Arguments {
        match args {
            ArgTypes::Unary(t) => Arguments::Unary(self.registers_of(t)[k]),
            ArgTypes::Binary(t1, t2) => {
                let first = self.registers_of(t1);
                let second = self.registers_of(t2);
                Arguments::Binary(first[k / second.len()], second[k % second.len()])
            }
        }
    }

    /// Resolve the candidate at an absolute position without advancing
    pub fn candidate_at(&mut self, position: usize) -> Option<Candidate> {
        let registry = self.registry;
        let mut offset = 0;

        for (i, op) in registry.operations().iter().enumerate() {
            if let Some(end) = self.cumulative[i] {
                if position >= end {
                    offset = end;
                    continue;
                }
            }

            let args = op.signature().args;
            let count = self.binding_count(args);
            if position < offset + count {
                return Some(Candidate {
                    op: *op,
                    args: self.binding_at(args, position - offset),
                });
            }
            offset += count;
            self.cumulative[i] = Some(offset);
        }
        None
    }

    /// Total number of candidates at this depth
    pub fn total(&self) -> usize {
        self.registry
            .operations()
            .iter()
            .map(|op| self.binding_count(op.signature().args))
            .sum()
    }
}

impl Iterator for CandidateEnumerator<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let candidate = self.candidate_at(self.position)?;
        self.position += 1;
        Some(candidate)
    }
}
