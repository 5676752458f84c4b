//! Example set: parallel (program state, target) pairs searched in lockstep

use crate::error::{Result, SynthError};
use crate::ir::types::{Value, ValueType};
use crate::parser::{ParseError, parse_problem_types, parse_problem_values};
use crate::search::candidate::{Arguments, Candidate};
use crate::semantics::state::ProgramState;
use log::debug;
use std::fmt;
use std::path::Path;

pub const INPUT_TYPES_FILE: &str = "input_types.txt";
pub const INPUT_VALUES_FILE: &str = "input_values.txt";
pub const OUTPUT_TYPES_FILE: &str = "output_types.txt";
pub const OUTPUT_VALUES_FILE: &str = "output_values.txt";

/// One input/output example
#[derive(Debug, Clone)]
pub struct Example {
    pub state: ProgramState,
    pub target: Value,
}

/// All examples of one problem.
///
/// Every operation is applied to every example with the same argument
/// indices, so all register files always share depth and type sequence.
#[derive(Debug, Clone)]
pub struct IoSet {
    examples: Vec<Example>,
}

impl IoSet {
    /// Build from pre-built register files and targets.
    ///
    /// Fails if the lists differ in length, are empty, or the register files
    /// disagree in depth or type sequence.
    pub fn new(states: Vec<ProgramState>, targets: Vec<Value>) -> Result<Self> {
        if states.len() != targets.len() {
            return Err(SynthError::invariant(format!(
                "{} input states but {} targets",
                states.len(),
                targets.len()
            )));
        }
        if states.is_empty() {
            return Err(SynthError::invariant("example set has no examples"));
        }

        let reference: Vec<ValueType> = states[0].types().collect();
        for (i, state) in states.iter().enumerate().skip(1) {
            let types: Vec<ValueType> = state.types().collect();
            if types != reference || state.num_inputs() != states[0].num_inputs() {
                return Err(SynthError::invariant(format!(
                    "example {} has type signature {:?}, example 0 has {:?}",
                    i, types, reference
                )));
            }
        }

        let target_type = targets[0].value_type();
        if let Some(i) = targets.iter().position(|t| t.value_type() != target_type) {
            return Err(SynthError::invariant(format!(
                "target {} is {}, target 0 is {}",
                i,
                targets[i].value_type(),
                target_type
            )));
        }

        let examples = states
            .into_iter()
            .zip(targets)
            .map(|(state, target)| Example { state, target })
            .collect();
        Ok(IoSet { examples })
    }

    /// Build from plain (inputs, target) pairs
    pub fn from_pairs(pairs: Vec<(Vec<Value>, Value)>) -> Result<Self> {
        let (inputs, targets): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let states = inputs.into_iter().map(ProgramState::new).collect();
        IoSet::new(states, targets)
    }

    /// Load one problem from a data directory.
    ///
    /// Reads `input_types.txt`, `input_values.txt`, `output_types.txt` and
    /// `output_values.txt`; `problem_idx` selects the types line and the block
    /// of `num_examples` value lines.
    pub fn load(dir: &Path, problem_idx: usize, num_examples: usize) -> Result<Self> {
        let inputs = load_table(
            dir,
            INPUT_TYPES_FILE,
            INPUT_VALUES_FILE,
            problem_idx,
            num_examples,
        )?;
        let outputs = load_table(
            dir,
            OUTPUT_TYPES_FILE,
            OUTPUT_VALUES_FILE,
            problem_idx,
            num_examples,
        )?;

        let mut targets = Vec::with_capacity(outputs.len());
        for (j, mut row) in outputs.into_iter().enumerate() {
            if row.len() != 1 {
                return Err(ParseError::new(
                    problem_idx
                        .saturating_mul(num_examples)
                        .saturating_add(j + 1),
                    format!("expected a single output column, found {}", row.len()),
                    "",
                )
                .with_source(OUTPUT_VALUES_FILE)
                .into());
            }
            targets.extend(row.pop());
        }

        debug!(
            "loaded problem {} from {} ({} examples)",
            problem_idx,
            dir.display(),
            targets.len()
        );
        let states = inputs.into_iter().map(ProgramState::new).collect();
        IoSet::new(states, targets)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn state(&self, idx: usize) -> Result<&ProgramState> {
        self.examples
            .get(idx)
            .map(|e| &e.state)
            .ok_or(SynthError::IndexOutOfRange {
                index: idx as i64,
                len: self.examples.len(),
            })
    }

    pub fn target(&self, idx: usize) -> Result<&Value> {
        self.examples
            .get(idx)
            .map(|e| &e.target)
            .ok_or(SynthError::IndexOutOfRange {
                index: idx as i64,
                len: self.examples.len(),
            })
    }

    /// Type sequence of the live registers, taken from example 0
    pub fn types(&self) -> Vec<ValueType> {
        self.examples[0].state.types().collect()
    }

    pub fn num_inputs(&self) -> usize {
        self.examples[0].state.num_inputs()
    }

    /// Number of operations applied so far
    pub fn depth(&self) -> usize {
        self.examples[0].state.depth()
    }

    /// Apply the same candidate to every example.
    ///
    /// If any example fails, the examples already updated are undone so all
    /// register files keep the same depth.
    pub fn apply(&mut self, candidate: &Candidate) -> Result<()> {
        for i in 0..self.examples.len() {
            let state = &mut self.examples[i].state;
            let applied = match candidate.args {
                Arguments::Unary(a) => state.apply_unary(&candidate.op, a),
                Arguments::Binary(a, b) => state.apply_binary(&candidate.op, a, b),
            };
            if let Err(err) = applied {
                for example in &mut self.examples[..i] {
                    example.state.undo()?;
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Undo the last operation on every example
    pub fn undo(&mut self) -> Result<()> {
        for example in &mut self.examples {
            example.state.undo()?;
        }
        Ok(())
    }

    /// Undo everything applied since construction
    pub fn reset(&mut self) {
        for example in &mut self.examples {
            example.state.reset();
        }
    }

    /// True iff every example's newest register equals its target
    pub fn is_solved(&self) -> bool {
        self.examples
            .iter()
            .all(|e| e.state.last() == Some(&e.target))
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SynthError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_table(
    dir: &Path,
    types_file: &str,
    values_file: &str,
    problem_idx: usize,
    num_examples: usize,
) -> Result<Vec<Vec<Value>>> {
    let types = parse_problem_types(&read_file(&dir.join(types_file))?, problem_idx)
        .map_err(|e| e.with_source(types_file))?;
    let rows = parse_problem_values(
        &read_file(&dir.join(values_file))?,
        problem_idx,
        num_examples,
        &types,
    )
    .map_err(|e| e.with_source(values_file))?;
    Ok(rows)
}

impl fmt::Display for IoSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, example) in self.examples.iter().enumerate() {
            writeln!(f, "Example {}:", i)?;
            write!(f, "{}", example.state)?;
            writeln!(f, "  Target: {}", example.target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::operations::{BoundsPolicy, IntFn, Operation};
    use std::fs;

    fn double() -> Candidate {
        Candidate::unary(Operation::Scalar(IntFn::Mult2), 0)
    }

    fn two_examples() -> IoSet {
        IoSet::from_pairs(vec![
            (vec![Value::int(3)], Value::int(6)),
            (vec![Value::int(5)], Value::int(10)),
        ])
        .unwrap()
    }

    #[test]
    fn test_apply_to_all_and_solved() {
        let mut io = two_examples();
        assert!(!io.is_solved());
        io.apply(&double()).unwrap();
        assert_eq!(io.depth(), 1);
        assert_eq!(io.state(1).unwrap().last().unwrap(), &Value::int(10));
        assert!(io.is_solved());
        io.undo().unwrap();
        assert_eq!(io.depth(), 0);
    }

    #[test]
    fn test_not_solved_when_one_example_differs() {
        let mut io = IoSet::from_pairs(vec![
            (vec![Value::int(3)], Value::int(6)),
            (vec![Value::int(5)], Value::int(11)),
        ])
        .unwrap();
        io.apply(&double()).unwrap();
        assert!(!io.is_solved());
    }

    #[test]
    fn test_failed_apply_keeps_examples_in_lockstep() {
        let mut io = IoSet::from_pairs(vec![
            (vec![Value::int(1), Value::array(vec![4, 5])], Value::int(5)),
            (vec![Value::int(1), Value::array(vec![4])], Value::int(0)),
        ])
        .unwrap();
        let access = Candidate::binary(Operation::Access(BoundsPolicy::Strict), 0, 1);
        let err = io.apply(&access).unwrap_err();
        assert!(matches!(err, SynthError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(io.state(0).unwrap().depth(), 0);
        assert_eq!(io.state(1).unwrap().depth(), 0);
    }

    #[test]
    fn test_mismatched_signatures_rejected() {
        let err = IoSet::from_pairs(vec![
            (vec![Value::int(3)], Value::int(6)),
            (vec![Value::array(vec![5])], Value::int(10)),
        ])
        .unwrap_err();
        assert!(matches!(err, SynthError::InvariantViolation(_)));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let states = vec![ProgramState::new(vec![Value::int(1)])];
        assert!(IoSet::new(states, vec![]).is_err());
        assert!(IoSet::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_target_accessors() {
        let io = two_examples();
        assert_eq!(io.len(), 2);
        assert_eq!(io.target(0).unwrap(), &Value::int(6));
        assert!(io.target(2).is_err());
        assert_eq!(io.types(), vec![ValueType::Int]);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(INPUT_TYPES_FILE), "Int\nArray Int\n").unwrap();
        fs::write(
            dir.path().join(INPUT_VALUES_FILE),
            "1\n2\n3 1 2 | 1\n5 4 | 0\n",
        )
        .unwrap();
        fs::write(dir.path().join(OUTPUT_TYPES_FILE), "Int\nArray\n").unwrap();
        fs::write(dir.path().join(OUTPUT_VALUES_FILE), "2\n3\n3\n\n").unwrap();

        let io = IoSet::load(dir.path(), 1, 2).unwrap();
        assert_eq!(io.len(), 2);
        assert_eq!(io.types(), vec![ValueType::Array, ValueType::Int]);
        assert_eq!(io.target(0).unwrap(), &Value::array(vec![3]));
        assert_eq!(io.target(1).unwrap(), &Value::array(vec![]));
        assert_eq!(
            io.state(0).unwrap().get(0).unwrap(),
            &Value::array(vec![3, 1, 2])
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = IoSet::load(dir.path(), 0, 1).unwrap_err();
        assert!(matches!(err, SynthError::Io { .. }));
    }

    #[test]
    fn test_load_reports_data_format() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(INPUT_TYPES_FILE), "Int\n").unwrap();
        fs::write(dir.path().join(INPUT_VALUES_FILE), "1 2\n").unwrap();
        fs::write(dir.path().join(OUTPUT_TYPES_FILE), "Int\n").unwrap();
        fs::write(dir.path().join(OUTPUT_VALUES_FILE), "2\n").unwrap();

        let err = IoSet::load(dir.path(), 0, 1).unwrap_err();
        match err {
            SynthError::DataFormat(e) => {
                assert_eq!(e.source_name.as_deref(), Some(INPUT_VALUES_FILE));
                assert_eq!(e.line_number, 1);
            }
            other => panic!("expected DataFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_overflowing_example_block() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(INPUT_TYPES_FILE), "Int\nInt\nInt\n").unwrap();
        fs::write(dir.path().join(INPUT_VALUES_FILE), "1\n2\n").unwrap();
        fs::write(dir.path().join(OUTPUT_TYPES_FILE), "Int\nInt\n").unwrap();
        fs::write(dir.path().join(OUTPUT_VALUES_FILE), "2\n3\n").unwrap();

        match IoSet::load(dir.path(), 2, usize::MAX / 2 + 1).unwrap_err() {
            SynthError::DataFormat(e) => {
                assert_eq!(e.source_name.as_deref(), Some(INPUT_VALUES_FILE));
            }
            other => panic!("expected DataFormat, got {:?}", other),
        }
    }
}
