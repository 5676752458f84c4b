//! Operation catalog for the list DSL
//!
//! Every operation the search can apply is a variant of [`Operation`]. The
//! signature of each variant is fixed, so the enumerator's type filtering and
//! the evaluator in `semantics::concrete` agree by construction.

use crate::ir::types::ValueType;
use std::fmt;

/// Int -> Int lambdas, used directly and lifted by MAP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntFn {
    Increment,
    Decrement,
    Mult2,
    Div2,
    Negate,
    Sqr,
    Mult3,
    Div3,
    Mult4,
    Div4,
}

impl IntFn {
    pub const ALL: [IntFn; 10] = [
        IntFn::Increment,
        IntFn::Decrement,
        IntFn::Mult2,
        IntFn::Div2,
        IntFn::Negate,
        IntFn::Sqr,
        IntFn::Mult3,
        IntFn::Div3,
        IntFn::Mult4,
        IntFn::Div4,
    ];

    pub fn apply(self, x: i32) -> i32 {
        match self {
            IntFn::Increment => x.wrapping_add(1),
            IntFn::Decrement => x.wrapping_sub(1),
            IntFn::Mult2 => x.wrapping_mul(2),
            IntFn::Div2 => x / 2,
            IntFn::Negate => x.wrapping_neg(),
            IntFn::Sqr => x.wrapping_mul(x),
            IntFn::Mult3 => x.wrapping_mul(3),
            IntFn::Div3 => x / 3,
            IntFn::Mult4 => x.wrapping_mul(4),
            IntFn::Div4 => x / 4,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            IntFn::Increment => "increment",
            IntFn::Decrement => "decrement",
            IntFn::Mult2 => "mult2",
            IntFn::Div2 => "div2",
            IntFn::Negate => "negate",
            IntFn::Sqr => "sqr",
            IntFn::Mult3 => "mult3",
            IntFn::Div3 => "div3",
            IntFn::Mult4 => "mult4",
            IntFn::Div4 => "div4",
        }
    }

    fn component(self) -> &'static str {
        match self {
            IntFn::Increment => "INC",
            // DEC, not INC
            IntFn::Decrement => "DEC",
            IntFn::Mult2 => "SHL",
            IntFn::Div2 => "SHR",
            IntFn::Negate => "doNEG",
            IntFn::Sqr => "SQR",
            IntFn::Mult3 => "MUL3",
            IntFn::Div3 => "DIV3",
            IntFn::Mult4 => "MUL4",
            IntFn::Div4 => "DIV4",
        }
    }
}

/// Int -> Bool lambdas for COUNT and FILTER
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    IsPos,
    IsNeg,
    IsEven,
    IsOdd,
}

impl Predicate {
    pub const ALL: [Predicate; 4] = [
        Predicate::IsPos,
        Predicate::IsNeg,
        Predicate::IsEven,
        Predicate::IsOdd,
    ];

    pub fn test(self, x: i32) -> bool {
        match self {
            Predicate::IsPos => x > 0,
            Predicate::IsNeg => x < 0,
            Predicate::IsEven => x % 2 == 0,
            Predicate::IsOdd => x % 2 != 0,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Predicate::IsPos => "is_pos",
            Predicate::IsNeg => "is_neg",
            Predicate::IsEven => "is_even",
            Predicate::IsOdd => "is_odd",
        }
    }

    fn component(self) -> &'static str {
        match self {
            Predicate::IsPos => "isPOS",
            Predicate::IsNeg => "isNEG",
            Predicate::IsEven => "isEVEN",
            Predicate::IsOdd => "isODD",
        }
    }
}

/// Int -> Int -> Int lambdas for SCANL and ZIPWITH
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinFn {
    Add,
    Subtract,
    Mult,
    Max,
    Min,
}

impl BinFn {
    pub const ALL: [BinFn; 5] = [
        BinFn::Add,
        BinFn::Subtract,
        BinFn::Mult,
        BinFn::Max,
        BinFn::Min,
    ];

    pub fn apply(self, x: i32, y: i32) -> i32 {
        match self {
            BinFn::Add => x.wrapping_add(y),
            BinFn::Subtract => x.wrapping_sub(y),
            BinFn::Mult => x.wrapping_mul(y),
            BinFn::Max => x.max(y),
            BinFn::Min => x.min(y),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            BinFn::Add => "add",
            BinFn::Subtract => "subtract",
            BinFn::Mult => "mult",
            BinFn::Max => "max",
            BinFn::Min => "min",
        }
    }

    fn component(self) -> &'static str {
        match self {
            BinFn::Add => "+",
            BinFn::Subtract => "-",
            BinFn::Mult => "*",
            BinFn::Max => "MAX",
            BinFn::Min => "MIN",
        }
    }
}

/// What `access` does with an offset outside the array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundsPolicy {
    /// Fail with `IndexOutOfRange`
    #[default]
    Strict,
    /// Produce [`ACCESS_SENTINEL`]
    Sentinel,
}

/// Result of an out-of-range `access` under [`BoundsPolicy::Sentinel`]
pub const ACCESS_SENTINEL: i32 = -1_000_000;

/// Argument types of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgTypes {
    Unary(ValueType),
    Binary(ValueType, ValueType),
}

/// Full type signature of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub args: ArgTypes,
    pub ret: ValueType,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.args {
            ArgTypes::Unary(t) => write!(f, "{} -> {}", t, self.ret),
            ArgTypes::Binary(t1, t2) => write!(f, "{}, {} -> {}", t1, t2, self.ret),
        }
    }
}

/// Type-signature buckets the registry is grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureClass {
    IntToInt,
    ArrayToInt,
    ArrayToArray,
    IntArrayToInt,
    IntArrayToArray,
    ArrayArrayToArray,
}

impl SignatureClass {
    /// Bucket order used when building a registry
    pub const ALL: [SignatureClass; 6] = [
        SignatureClass::IntToInt,
        SignatureClass::ArrayToInt,
        SignatureClass::ArrayToArray,
        SignatureClass::IntArrayToInt,
        SignatureClass::IntArrayToArray,
        SignatureClass::ArrayArrayToArray,
    ];

    /// The operations in this bucket, in catalog order
    pub fn operations(self) -> Vec<Operation> {
        match self {
            SignatureClass::IntToInt => IntFn::ALL.iter().map(|&f| Operation::Scalar(f)).collect(),
            SignatureClass::ArrayToInt => {
                let mut ops = vec![
                    Operation::Minimum,
                    Operation::Maximum,
                    Operation::Head,
                    Operation::Last,
                    Operation::Sum,
                ];
                ops.extend(Predicate::ALL.iter().map(|&p| Operation::Count(p)));
                ops
            }
            SignatureClass::ArrayToArray => {
                let mut ops: Vec<Operation> =
                    IntFn::ALL.iter().map(|&f| Operation::Map(f)).collect();
                ops.extend(
                    [
                        Predicate::IsPos,
                        Predicate::IsNeg,
                        Predicate::IsOdd,
                        Predicate::IsEven,
                    ]
                    .iter()
                    .map(|&p| Operation::Filter(p)),
                );
                ops.push(Operation::Sort);
                ops.push(Operation::Reverse);
                ops.extend(BinFn::ALL.iter().map(|&f| Operation::Scanl(f)));
                ops
            }
            SignatureClass::IntArrayToInt => vec![Operation::Access(BoundsPolicy::Strict)],
            SignatureClass::IntArrayToArray => vec![Operation::Take, Operation::Drop],
            SignatureClass::ArrayArrayToArray => {
                BinFn::ALL.iter().map(|&f| Operation::ZipWith(f)).collect()
            }
        }
    }
}

/// One typed operation of the DSL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Int -> Int
    Scalar(IntFn),

    // Int[] -> Int
    Minimum,
    Maximum,
    Head,
    Last,
    Sum,
    Count(Predicate),

    // Int[] -> Int[]
    Map(IntFn),
    Filter(Predicate),
    Sort,
    Reverse,
    Scanl(BinFn),

    // Int x Int[] -> Int
    Access(BoundsPolicy),

    // Int x Int[] -> Int[]
    Take,
    Drop,

    // Int[] x Int[] -> Int[]
    ZipWith(BinFn),
}

impl Operation {
    pub fn signature(&self) -> Signature {
        use ValueType::{Array, Int};
        let (args, ret) = match self {
            Operation::Scalar(_) => (ArgTypes::Unary(Int), Int),
            Operation::Minimum
            | Operation::Maximum
            | Operation::Head
            | Operation::Last
            | Operation::Sum
            | Operation::Count(_) => (ArgTypes::Unary(Array), Int),
            Operation::Map(_)
            | Operation::Filter(_)
            | Operation::Sort
            | Operation::Reverse
            | Operation::Scanl(_) => (ArgTypes::Unary(Array), Array),
            Operation::Access(_) => (ArgTypes::Binary(Int, Array), Int),
            Operation::Take | Operation::Drop => (ArgTypes::Binary(Int, Array), Array),
            Operation::ZipWith(_) => (ArgTypes::Binary(Array, Array), Array),
        };
        Signature { args, ret }
    }

    pub fn arity(&self) -> usize {
        match self.signature().args {
            ArgTypes::Unary(_) => 1,
            ArgTypes::Binary(_, _) => 2,
        }
    }

    pub fn return_type(&self) -> ValueType {
        self.signature().ret
    }

    pub fn class(&self) -> SignatureClass {
        match self {
            Operation::Scalar(_) => SignatureClass::IntToInt,
            Operation::Minimum
            | Operation::Maximum
            | Operation::Head
            | Operation::Last
            | Operation::Sum
            | Operation::Count(_) => SignatureClass::ArrayToInt,
            Operation::Map(_)
            | Operation::Filter(_)
            | Operation::Sort
            | Operation::Reverse
            | Operation::Scanl(_) => SignatureClass::ArrayToArray,
            Operation::Access(_) => SignatureClass::IntArrayToInt,
            Operation::Take | Operation::Drop => SignatureClass::IntArrayToArray,
            Operation::ZipWith(_) => SignatureClass::ArrayArrayToArray,
        }
    }

    /// Stable name, as used in program listings
    pub fn name(&self) -> String {
        match self {
            Operation::Scalar(f) => f.suffix().to_string(),
            Operation::Minimum => "arr_min".to_string(),
            Operation::Maximum => "arr_max".to_string(),
            Operation::Head => "arr_head".to_string(),
            Operation::Last => "arr_last".to_string(),
            Operation::Sum => "arr_sum".to_string(),
            Operation::Count(p) => format!("count_{}", p.suffix()),
            Operation::Map(f) => format!("map_{}", f.suffix()),
            Operation::Filter(p) => format!("filter_{}", p.suffix()),
            Operation::Sort => "sort".to_string(),
            Operation::Reverse => "reverse".to_string(),
            Operation::Scanl(f) => format!("scanl_{}", f.suffix()),
            Operation::Access(_) => "access".to_string(),
            Operation::Take => "take".to_string(),
            Operation::Drop => "drop".to_string(),
            Operation::ZipWith(f) => format!("zipwith_{}", f.suffix()),
        }
    }

    /// Prior components this operation is composed of; its prior score is the
    /// minimum over these
    pub fn components(&self) -> Vec<&'static str> {
        match self {
            Operation::Scalar(f) => vec![f.component()],
            Operation::Minimum => vec!["MINIMUM"],
            Operation::Maximum => vec!["MAXIMUM"],
            Operation::Head => vec!["HEAD"],
            Operation::Last => vec!["LAST"],
            // SUM alone, without a MAP component
            Operation::Sum => vec!["SUM"],
            Operation::Count(p) => vec!["COUNT", p.component()],
            Operation::Map(f) => vec!["MAP", f.component()],
            Operation::Filter(p) => vec!["FILTER", p.component()],
            Operation::Sort => vec!["SORT"],
            Operation::Reverse => vec!["REVERSE"],
            Operation::Scanl(f) => vec!["SCANL", f.component()],
            Operation::Access(_) => vec!["ACCESS"],
            Operation::Take => vec!["TAKE"],
            Operation::Drop => vec!["DROP"],
            Operation::ZipWith(f) => vec!["ZIPWITH", f.component()],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_operations() -> Vec<Operation> {
        SignatureClass::ALL
            .iter()
            .flat_map(|c| c.operations())
            .collect()
    }

    #[test]
    fn test_catalog_size() {
        // 10 scalar + 9 reductions + 21 list transforms + 1 + 2 + 5
        assert_eq!(all_operations().len(), 48);
    }

    #[test]
    fn test_names_unique() {
        let ops = all_operations();
        let names: HashSet<_> = ops.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), ops.len());
    }

    #[test]
    fn test_class_matches_bucket() {
        for class in SignatureClass::ALL {
            for op in class.operations() {
                assert_eq!(op.class(), class, "{} in wrong bucket", op);
            }
        }
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(Operation::Take.signature().to_string(), "Int, Array -> Array");
        assert_eq!(Operation::Sum.signature().to_string(), "Array -> Int");
    }

    #[test]
    fn test_signatures() {
        assert_eq!(Operation::Sort.arity(), 1);
        assert_eq!(Operation::Take.arity(), 2);
        assert_eq!(
            Operation::Take.signature().args,
            ArgTypes::Binary(ValueType::Int, ValueType::Array)
        );
        assert_eq!(Operation::Count(Predicate::IsOdd).return_type(), ValueType::Int);
        assert_eq!(
            Operation::Scalar(IntFn::Mult2).signature(),
            Signature {
                args: ArgTypes::Unary(ValueType::Int),
                ret: ValueType::Int
            }
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(Operation::Map(IntFn::Mult2).name(), "map_mult2");
        assert_eq!(Operation::Filter(Predicate::IsEven).name(), "filter_is_even");
        assert_eq!(Operation::ZipWith(BinFn::Subtract).name(), "zipwith_subtract");
        assert_eq!(Operation::Scalar(IntFn::Increment).name(), "increment");
    }

    #[test]
    fn test_components() {
        assert_eq!(Operation::Filter(Predicate::IsPos).components(), vec!["FILTER", "isPOS"]);
        assert_eq!(Operation::Sort.components(), vec!["SORT"]);
        assert_eq!(Operation::Scanl(BinFn::Mult).components(), vec!["SCANL", "*"]);
    }

    #[test]
    fn test_sum_and_decrement_components() {
        assert_eq!(Operation::Sum.components(), vec!["SUM"]);
        assert_eq!(Operation::Map(IntFn::Decrement).components(), vec!["MAP", "DEC"]);
        assert_eq!(Operation::Map(IntFn::Increment).components(), vec!["MAP", "INC"]);
        assert_eq!(Operation::Scalar(IntFn::Decrement).components(), vec!["DEC"]);
    }

    #[test]
    fn test_lambdas() {
        assert_eq!(IntFn::Div2.apply(-3), -1);
        assert_eq!(IntFn::Sqr.apply(-4), 16);
        assert_eq!(IntFn::Increment.apply(i32::MAX), i32::MIN);
        assert!(Predicate::IsOdd.test(-3));
        assert!(!Predicate::IsOdd.test(-4));
        assert!(Predicate::IsEven.test(0));
        assert_eq!(BinFn::Subtract.apply(2, 5), -3);
    }
}
