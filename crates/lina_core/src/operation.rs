use crate::error::{AlgebraError, Result};
use crate::operand::Operand;
use crate::traits::Decimal;
use crate::value::Value;
use log::debug;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six binary operators an [`Operation`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// `left ^ right`
    Exponentiate,
    /// Logarithm of `left` in base `right`.
    Logarithm,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 6] = [
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::Exponentiate,
        BinaryOp::Logarithm,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Exponentiate => "^",
            BinaryOp::Logarithm => "log",
        }
    }

    /// Eagerly combines two leaf values.
    pub fn apply(self, left: &Value, right: &Value) -> Result<Value> {
        match self {
            BinaryOp::Add => left.add(right),
            BinaryOp::Subtract => left.subtract(right),
            BinaryOp::Multiply => left.multiply(right),
            BinaryOp::Divide => left.divide(right),
            BinaryOp::Exponentiate => left.exponentiate(right),
            BinaryOp::Logarithm => left.logarithm(right),
        }
    }

    /// Operator that undoes `self` when the unknown is the left operand.
    ///
    /// Exponentiation and logarithm are undone by division. This is not a true algebraic
    /// inverse; it is the rule equations have always been solved with.
    pub fn inverse(self) -> BinaryOp {
        match self {
            BinaryOp::Add => BinaryOp::Subtract,
            BinaryOp::Subtract => BinaryOp::Add,
            BinaryOp::Multiply => BinaryOp::Divide,
            BinaryOp::Divide => BinaryOp::Multiply,
            BinaryOp::Exponentiate => BinaryOp::Divide,
            BinaryOp::Logarithm => BinaryOp::Divide,
        }
    }
}

/// A lazily evaluated binary expression node.
///
/// Either side may be unset. A node built with [`Operation::placeholder`] has neither and
/// evaluates to nothing until both are supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    op: BinaryOp,
    left: Option<Box<Operand>>,
    right: Option<Box<Operand>>,
}

impl Operation {
    pub fn new(op: BinaryOp, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self {
            op,
            left: Some(Box::new(left.into())),
            right: Some(Box::new(right.into())),
        }
    }

    pub fn placeholder(op: BinaryOp) -> Self {
        Self {
            op,
            left: None,
            right: None,
        }
    }

    pub fn with_left(mut self, left: impl Into<Operand>) -> Self {
        self.left = Some(Box::new(left.into()));
        self
    }

    pub fn with_right(mut self, right: impl Into<Operand>) -> Self {
        self.right = Some(Box::new(right.into()));
        self
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    pub fn left(&self) -> Option<&Operand> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Operand> {
        self.right.as_deref()
    }

    /// Evaluates this node, or `None` when a side is unset or empty.
    pub fn evaluate(&self) -> Result<Option<Value>> {
        self.evaluate_bounded(usize::MAX)
    }

    /// Evaluates, failing when operations nest deeper than `max_depth` (this node counts).
    pub(crate) fn evaluate_bounded(&self, max_depth: usize) -> Result<Option<Value>> {
        if max_depth == 0 {
            return Err(AlgebraError::DepthExceeded { max_depth });
        }
        evaluate_steps(vec![Step::Right(self, 1), Step::Visit(self.left(), 1)], max_depth)
    }

    /// Rewrite that recovers the left operand from the value on the other side of an
    /// equation: `left op right = new_left` gives `left = new_left op' right`.
    pub fn inverse(&self, new_left: impl Into<Operand>) -> Operation {
        Operation {
            op: self.op.inverse(),
            left: Some(Box::new(new_left.into())),
            right: self.right.clone(),
        }
    }

    /// Rewrite that recovers the right operand from the value on the other side of an
    /// equation: `left op right = new_left` gives `right = ...`.
    pub fn inverse_for_right(&self, new_left: impl Into<Operand>) -> Operation {
        let solved = Some(Box::new(new_left.into()));
        let left = self.left.clone();
        let (op, left, right) = match self.op {
            BinaryOp::Add => (BinaryOp::Subtract, solved, left),
            BinaryOp::Subtract => (BinaryOp::Subtract, left, solved),
            BinaryOp::Multiply => (BinaryOp::Divide, solved, left),
            BinaryOp::Divide => (BinaryOp::Divide, left, solved),
            BinaryOp::Exponentiate => (BinaryOp::Logarithm, solved, left),
            // log_t(a) = v  =>  t = a ^ (1 / v)
            BinaryOp::Logarithm => {
                let one = Operand::from(Decimal::one());
                let reciprocal = Operation {
                    op: BinaryOp::Divide,
                    left: Some(Box::new(one)),
                    right: solved,
                };
                (
                    BinaryOp::Exponentiate,
                    left,
                    Some(Box::new(Operand::from(reciprocal))),
                )
            }
        };
        Operation { op, left, right }
    }
}

enum Step<'a> {
    /// Push the value of an operand, expanding operations. Carries the nesting depth.
    Visit(Option<&'a Operand>, usize),
    /// The left value of the node is on top of the stack.
    Right(&'a Operation, usize),
    /// Both values of the node are on top of the stack.
    Apply(&'a Operation),
}

/// Post-order walk with an explicit value stack, so tree depth never exhausts the call
/// stack. An empty left value skips the right side entirely.
pub(crate) fn evaluate_tree(root: &Operand, max_depth: usize) -> Result<Option<Value>> {
    evaluate_steps(vec![Step::Visit(Some(root), 0)], max_depth)
}

fn evaluate_steps(mut steps: Vec<Step<'_>>, max_depth: usize) -> Result<Option<Value>> {
    let mut values: Vec<Option<Value>> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(Some(Operand::Value(value)), _) => values.push(Some(value.clone())),
            Step::Visit(Some(Operand::Unknown(_)) | None, _) => values.push(None),
            Step::Visit(Some(Operand::Operation(node)), depth) => {
                if depth >= max_depth {
                    return Err(AlgebraError::DepthExceeded { max_depth });
                }
                steps.push(Step::Right(node, depth + 1));
                steps.push(Step::Visit(node.left(), depth + 1));
            }
            Step::Right(node, depth) => {
                if matches!(values.last(), Some(None)) {
                    debug!("{node}: left side is empty");
                    continue;
                }
                steps.push(Step::Apply(node));
                steps.push(Step::Visit(node.right(), depth));
            }
            Step::Apply(node) => {
                let right = values.pop().flatten();
                let left = values.pop().flatten();
                match (left, right) {
                    (Some(left), Some(right)) => values.push(Some(node.op.apply(&left, &right)?)),
                    _ => {
                        debug!("{node}: right side is empty");
                        values.push(None);
                    }
                }
            }
        }
    }

    Ok(values.pop().flatten())
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = self.left().map(ToString::to_string).unwrap_or_else(|| "?".into());
        let right = self.right().map(ToString::to_string).unwrap_or_else(|| "?".into());
        match self.op {
            BinaryOp::Logarithm => write!(f, "log({left}, {right})"),
            op => write!(f, "({left} {} {right})", op.symbol()),
        }
    }
}
