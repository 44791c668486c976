use crate::equation::Equation;
use crate::error::{AlgebraError, Result};
use crate::operation::{evaluate_tree, BinaryOp, Operation};
use crate::settings::EvaluationSettings;
use crate::traits::Decimal;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops;

/// A named unknown. It has no value; evaluating it yields nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that takes part in algebra: a number, an unknown or a whole subtree.
///
/// Combining operands builds a tree; nothing is computed until [`Operand::evaluate`].
/// `PartialEq` is structural (same shape, same widths, same values) and is what
/// [`Equation::isolate`] uses to find its target. To state that two operands are equal,
/// use [`Operand::equation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Value(Value),
    Operation(Operation),
    Unknown(Symbol),
}

impl Operand {
    pub fn unknown(name: impl Into<String>) -> Self {
        Operand::Unknown(Symbol::new(name))
    }

    pub fn binary(op: BinaryOp, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Operand::Operation(Operation::new(op, left, right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, rhs: impl Into<Operand>) -> Self {
        Self::binary(BinaryOp::Add, self, rhs)
    }

    pub fn subtract(self, rhs: impl Into<Operand>) -> Self {
        Self::binary(BinaryOp::Subtract, self, rhs)
    }

    pub fn multiply(self, rhs: impl Into<Operand>) -> Self {
        Self::binary(BinaryOp::Multiply, self, rhs)
    }

    pub fn divide(self, rhs: impl Into<Operand>) -> Self {
        Self::binary(BinaryOp::Divide, self, rhs)
    }

    pub fn exponentiate(self, rhs: impl Into<Operand>) -> Self {
        Self::binary(BinaryOp::Exponentiate, self, rhs)
    }

    /// Logarithm of `self` in base `rhs`.
    pub fn logarithm(self, rhs: impl Into<Operand>) -> Self {
        Self::binary(BinaryOp::Logarithm, self, rhs)
    }

    /// States `self == rhs` as an equation to be solved later.
    pub fn equation(self, rhs: impl Into<Operand>) -> Equation {
        Equation::new(self, rhs)
    }

    /// Inequalities are not supported and always fail.
    pub fn not_equation(self, _rhs: impl Into<Operand>) -> Result<Equation> {
        Err(AlgebraError::Unimplemented("inequality"))
    }

    /// Collapses the tree to a single value, or `None` when a needed side is empty.
    ///
    /// The only bound is the depth of the tree itself; use [`Operand::evaluate_with`] to
    /// reject trees nested deeper than a limit.
    pub fn evaluate(&self) -> Result<Option<Value>> {
        evaluate_tree(self, usize::MAX)
    }

    pub fn evaluate_with(&self, settings: &EvaluationSettings) -> Result<Option<Value>> {
        evaluate_tree(self, settings.max_depth)
    }

    /// True if `target` is `self` or appears anywhere below it.
    pub fn contains(&self, target: &Operand) -> bool {
        if self == target {
            return true;
        }
        match self {
            Operand::Operation(operation) => [operation.left(), operation.right()]
                .into_iter()
                .flatten()
                .any(|side| side.contains(target)),
            _ => false,
        }
    }

    /// Operation nesting depth; leaves are 0.
    pub fn depth(&self) -> usize {
        match self {
            Operand::Operation(operation) => {
                1 + [operation.left(), operation.right()]
                    .into_iter()
                    .flatten()
                    .map(Operand::depth)
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&Operation> {
        match self {
            Operand::Operation(operation) => Some(operation),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(value) => write!(f, "{value}"),
            Operand::Operation(operation) => write!(f, "{operation}"),
            Operand::Unknown(symbol) => write!(f, "{symbol}"),
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Operation> for Operand {
    fn from(operation: Operation) -> Self {
        Operand::Operation(operation)
    }
}

impl From<Symbol> for Operand {
    fn from(symbol: Symbol) -> Self {
        Operand::Unknown(symbol)
    }
}

macro_rules! literal_operand {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Operand {
            fn from(value: $ty) -> Self {
                Operand::Value(Value::from(value))
            }
        }
    )*};
}

literal_operand!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, Decimal);

macro_rules! tree_operator {
    ($($trait:ident, $method:ident => $op:ident);* $(;)?) => {$(
        impl<R: Into<Operand>> ops::$trait<R> for Operand {
            type Output = Operand;

            fn $method(self, rhs: R) -> Operand {
                Operand::binary(BinaryOp::$op, self, rhs)
            }
        }
    )*};
}

tree_operator! {
    Add, add => Add;
    Sub, sub => Subtract;
    Mul, mul => Multiply;
    Div, div => Divide;
    BitXor, bitxor => Exponentiate;
}
