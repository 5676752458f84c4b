//! Concrete interpreter: evaluates one operation into a result slot
//!
//! Results are written into an existing [`Value`] so the register file can
//! reuse the slot's buffer across backtracking.

use crate::error::{Result, SynthError};
use crate::ir::operations::{ACCESS_SENTINEL, BinFn, BoundsPolicy, IntFn, Operation, Predicate};
use crate::ir::types::Value;

fn map_into(arg: &Value, f: IntFn, out: &mut Value) -> Result<()> {
    let src = arg.as_slice()?;
    let dst = out.clear_array();
    dst.extend(src.iter().map(|&x| f.apply(x)));
    Ok(())
}

fn filter_into(arg: &Value, p: Predicate, out: &mut Value) -> Result<()> {
    let src = arg.as_slice()?;
    let dst = out.clear_array();
    dst.extend(src.iter().copied().filter(|&x| p.test(x)));
    Ok(())
}

fn scanl_into(arg: &Value, f: BinFn, out: &mut Value) -> Result<()> {
    let src = arg.as_slice()?;
    let dst = out.clear_array();
    let mut values = src.iter().copied();
    if let Some(first) = values.next() {
        let mut running = first;
        dst.push(running);
        for x in values {
            running = f.apply(running, x);
            dst.push(running);
        }
    }
    Ok(())
}

fn zipwith_into(lhs: &Value, rhs: &Value, f: BinFn, out: &mut Value) -> Result<()> {
    let a = lhs.as_slice()?;
    let b = rhs.as_slice()?;
    let dst = out.clear_array();
    dst.extend(a.iter().zip(b.iter()).map(|(&x, &y)| f.apply(x, y)));
    Ok(())
}

fn access_into(offset: &Value, arr: &Value, policy: BoundsPolicy, out: &mut Value) -> Result<()> {
    let offset = offset.as_int()?;
    let src = arr.as_slice()?;
    let element = usize::try_from(offset).ok().and_then(|i| src.get(i).copied());
    let result = match (element, policy) {
        (Some(v), _) => v,
        (None, BoundsPolicy::Sentinel) => ACCESS_SENTINEL,
        (None, BoundsPolicy::Strict) => {
            return Err(SynthError::IndexOutOfRange {
                index: offset as i64,
                len: src.len(),
            });
        }
    };
    out.set_int(result);
    Ok(())
}

fn arity_error(op: &Operation, given: usize) -> SynthError {
    SynthError::invariant(format!(
        "{} takes {} argument(s), applied with {}",
        op,
        op.arity(),
        given
    ))
}

/// Evaluate a one-argument operation, writing its result into `out`
pub fn apply_unary(op: &Operation, arg: &Value, out: &mut Value) -> Result<()> {
    match *op {
        Operation::Scalar(f) => {
            let x = arg.as_int()?;
            out.set_int(f.apply(x));
        }
        Operation::Minimum => {
            let min = arg.as_slice()?.iter().copied().min().unwrap_or(i32::MAX);
            out.set_int(min);
        }
        Operation::Maximum => {
            let max = arg.as_slice()?.iter().copied().max().unwrap_or(i32::MIN);
            out.set_int(max);
        }
        Operation::Head => {
            let head = arg.as_slice()?.first().copied().unwrap_or(0);
            out.set_int(head);
        }
        Operation::Last => {
            let last = arg.as_slice()?.last().copied().unwrap_or(0);
            out.set_int(last);
        }
        Operation::Sum => {
            let total = arg
                .as_slice()?
                .iter()
                .fold(0i32, |acc, &x| acc.wrapping_add(x));
            out.set_int(total);
        }
        Operation::Count(p) => {
            let count = arg.as_slice()?.iter().filter(|&&x| p.test(x)).count();
            out.set_int(count as i32);
        }
        Operation::Map(f) => map_into(arg, f, out)?,
        Operation::Filter(p) => filter_into(arg, p, out)?,
        Operation::Sort => {
            out.set_array(arg.as_slice()?);
            out.array_mut()?.sort_unstable();
        }
        Operation::Reverse => {
            out.set_array(arg.as_slice()?);
            out.array_mut()?.reverse();
        }
        Operation::Scanl(f) => scanl_into(arg, f, out)?,
        Operation::Access(_) | Operation::Take | Operation::Drop | Operation::ZipWith(_) => {
            return Err(arity_error(op, 1));
        }
    }
    Ok(())
}

/// Evaluate a two-argument operation, writing its result into `out`
pub fn apply_binary(op: &Operation, arg1: &Value, arg2: &Value, out: &mut Value) -> Result<()> {
    match *op {
        Operation::Access(policy) => access_into(arg1, arg2, policy, out)?,
        Operation::Take => {
            let n = arg1.as_int()?;
            let src = arg2.as_slice()?;
            let keep = usize::try_from(n).unwrap_or(0).min(src.len());
            out.set_array(&src[..keep]);
        }
        Operation::Drop => {
            let n = arg1.as_int()?;
            let src = arg2.as_slice()?;
            match usize::try_from(n) {
                Ok(skip) if skip < src.len() => out.set_array(&src[skip..]),
                _ => {
                    out.clear_array();
                }
            }
        }
        Operation::ZipWith(f) => zipwith_into(arg1, arg2, f, out)?,
        _ => return Err(arity_error(op, 2)),
    }
    Ok(())
}

/// Evaluate an operation on owned arguments, returning a fresh value.
///
/// Convenience for tests and listings; the search itself goes through the
/// register file and never allocates per step.
pub fn evaluate(op: &Operation, args: &[&Value]) -> Result<Value> {
    let mut out = Value::default();
    match args {
        [a] => apply_unary(op, a, &mut out)?,
        [a, b] => apply_binary(op, a, b, &mut out)?,
        _ => return Err(arity_error(op, args.len())),
    }
    Ok(out)
}
