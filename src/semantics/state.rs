//! Register file holding one example's program state

use crate::error::{Result, SynthError};
use crate::ir::operations::Operation;
use crate::ir::types::{Value, ValueType};
use crate::semantics::concrete::{apply_binary, apply_unary};
use std::fmt;

/// The working memory of one program run.
///
/// Registers `0..num_inputs` hold the example's inputs and are never removed.
/// Every applied operation appends one register; [`ProgramState::undo`] drops
/// the last one logically but keeps its storage, so the next apply at the same
/// depth overwrites the slot in place.
#[derive(Debug, Clone)]
pub struct ProgramState {
    registers: Vec<Value>,
    num_inputs: usize,
    num_used: usize,
}

impl ProgramState {
    pub fn new(inputs: Vec<Value>) -> Self {
        let num_inputs = inputs.len();
        ProgramState {
            registers: inputs,
            num_inputs,
            num_used: num_inputs,
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_used(&self) -> usize {
        self.num_used
    }

    pub fn num_allocated(&self) -> usize {
        self.registers.len()
    }

    /// Number of operations applied on top of the inputs
    pub fn depth(&self) -> usize {
        self.num_used - self.num_inputs
    }

    pub fn num_ints(&self) -> usize {
        self.used().iter().filter(|v| v.is_int()).count()
    }

    pub fn num_arrays(&self) -> usize {
        self.used().iter().filter(|v| v.is_array()).count()
    }

    /// The visible registers
    pub fn used(&self) -> &[Value] {
        &self.registers[..self.num_used]
    }

    pub fn get(&self, idx: usize) -> Result<&Value> {
        self.used().get(idx).ok_or(SynthError::IndexOutOfRange {
            index: idx as i64,
            len: self.num_used,
        })
    }

    pub fn last(&self) -> Option<&Value> {
        self.used().last()
    }

    pub fn value_type(&self, idx: usize) -> Result<ValueType> {
        Ok(self.get(idx)?.value_type())
    }

    /// Type sequence of the visible registers
    pub fn types(&self) -> impl Iterator<Item = ValueType> + '_ {
        self.used().iter().map(Value::value_type)
    }

    fn check_arg(&self, idx: usize) -> Result<()> {
        if idx < self.num_used {
            Ok(())
        } else {
            Err(SynthError::IndexOutOfRange {
                index: idx as i64,
                len: self.num_used,
            })
        }
    }

    /// Make sure register `num_used` exists, allocating only on first descent
    fn ensure_result_slot(&mut self) {
        if self.num_used == self.registers.len() {
            self.registers.push(Value::default());
        }
    }

    /// Apply a one-argument operation, appending its result
    pub fn apply_unary(&mut self, op: &Operation, arg: usize) -> Result<()> {
        self.check_arg(arg)?;
        self.ensure_result_slot();

        let (args, rest) = self.registers.split_at_mut(self.num_used);
        apply_unary(op, &args[arg], &mut rest[0])?;
        self.num_used += 1;
        Ok(())
    }

    /// Apply a two-argument operation, appending its result
    pub fn apply_binary(&mut self, op: &Operation, arg1: usize, arg2: usize) -> Result<()> {
        self.check_arg(arg1)?;
        self.check_arg(arg2)?;
        self.ensure_result_slot();

        let (args, rest) = self.registers.split_at_mut(self.num_used);
        apply_binary(op, &args[arg1], &args[arg2], &mut rest[0])?;
        self.num_used += 1;
        Ok(())
    }

    /// Remove the most recent result without releasing its storage
    pub fn undo(&mut self) -> Result<()> {
        if self.num_used <= self.num_inputs {
            return Err(SynthError::invariant(format!(
                "undo with no applied operation ({} inputs, {} used)",
                self.num_inputs, self.num_used
            )));
        }
        self.num_used -= 1;
        Ok(())
    }

    /// Undo every applied operation
    pub fn reset(&mut self) {
        self.num_used = self.num_inputs;
    }
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.used().iter().enumerate() {
            writeln!(f, "  Register {}: {} {}", i, value.value_type(), value)?;
        }
        Ok(())
    }
}
