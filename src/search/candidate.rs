//! Candidates, solved programs and the operator registry

use crate::ir::operations::{ArgTypes, BoundsPolicy, Operation, SignatureClass};
use crate::ir::types::ValueType;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Register indices an operation is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arguments {
    Unary(usize),
    Binary(usize, usize),
}

/// One concrete, type-checked (operation, argument binding) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub op: Operation,
    pub args: Arguments,
}

impl Candidate {
    pub fn unary(op: Operation, arg: usize) -> Self {
        Candidate {
            op,
            args: Arguments::Unary(arg),
        }
    }

    pub fn binary(op: Operation, arg1: usize, arg2: usize) -> Self {
        Candidate {
            op,
            args: Arguments::Binary(arg1, arg2),
        }
    }

    /// Whether the binding agrees with the operation's arity and the given
    /// register types
    pub fn is_well_typed(&self, types: &[ValueType]) -> bool {
        let ty = |i: usize| types.get(i).copied();
        match (self.op.signature().args, self.args) {
            (ArgTypes::Unary(t), Arguments::Unary(a)) => ty(a) == Some(t),
            (ArgTypes::Binary(t1, t2), Arguments::Binary(a, b)) => {
                ty(a) == Some(t1) && ty(b) == Some(t2)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.args {
            Arguments::Unary(a) => write!(f, "{} %{}", self.op, a),
            Arguments::Binary(a, b) => write!(f, "{} %{} %{}", self.op, a, b),
        }
    }
}

/// A solved path: the candidates applied from depth 0 to the solving depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub num_inputs: usize,
    pub steps: Vec<Candidate>,
}

impl Program {
    pub fn new(num_inputs: usize, steps: Vec<Candidate>) -> Self {
        Program { num_inputs, steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "  %{} <- {}", i + self.num_inputs, step)?;
        }
        Ok(())
    }
}

/// The ordered operator catalog for one search run.
///
/// Order is rank: the enumerator offers operators strictly in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRegistry {
    operations: Vec<Operation>,
}

impl OperatorRegistry {
    pub fn new(operations: Vec<Operation>) -> Self {
        OperatorRegistry { operations }
    }

    /// Concatenate the given signature buckets in the order given
    pub fn from_classes(classes: &[SignatureClass]) -> Self {
        OperatorRegistry {
            operations: classes.iter().flat_map(|c| c.operations()).collect(),
        }
    }

    /// Every bucket except Int -> Int, which the standard DSL leaves out
    pub fn standard() -> Self {
        Self::from_classes(&SignatureClass::ALL[1..])
    }

    /// Every bucket, including the scalar Int -> Int operations
    pub fn full() -> Self {
        Self::from_classes(&SignatureClass::ALL)
    }

    /// Replace the out-of-range behavior of `access`
    pub fn with_bounds_policy(mut self, policy: BoundsPolicy) -> Self {
        for op in &mut self.operations {
            if let Operation::Access(p) = op {
                *p = policy;
            }
        }
        self
    }

    /// Randomly permute the operators, reproducibly for a given seed
    pub fn shuffled(mut self, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.operations.shuffle(&mut rng);
        self
    }

    /// Keep only the first `cutoff` operators
    pub fn truncated(mut self, cutoff: Option<usize>) -> Self {
        if let Some(n) = cutoff {
            self.operations.truncate(n);
        }
        self
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Look up an operation by its listing name
    pub fn find(&self, name: &str) -> Option<Operation> {
        self.operations.iter().copied().find(|op| op.name() == name)
    }

    /// Operations in the given signature bucket, in rank order
    pub fn in_class(&self, class: SignatureClass) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(move |op| op.class() == class)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
