use crate::error::{AlgebraError, Result};
use crate::operand::Operand;
use crate::operation::Operation;
use crate::value::Value;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `left = right`, kept symbolic until a subterm is isolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    left: Operand,
    right: Operand,
}

impl Equation {
    pub fn new(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn left(&self) -> &Operand {
        &self.left
    }

    pub fn right(&self) -> &Operand {
        &self.right
    }

    pub fn into_sides(self) -> (Operand, Operand) {
        (self.left, self.right)
    }

    /// `right = left`
    pub fn swap(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }

    pub fn evaluate_sides(&self) -> Result<(Option<Value>, Option<Value>)> {
        Ok((self.left.evaluate()?, self.right.evaluate()?))
    }

    /// Rewrites the equation so that `target` stands alone and returns what it equals.
    ///
    /// The path from the root of the side holding `target` down to `target` is found once,
    /// then replayed root first, undoing one operation per level with [`Operation::inverse`] (target under the left operand) or
    /// [`Operation::inverse_for_right`] (target under the right operand). The other side
    /// of the equation seeds the result.
    ///
    /// When `target` occurs more than once, the left side of the equation wins over the
    /// right, and within a node the left operand wins over the right.
    ///
    /// [`Operation::inverse`]: crate::operation::Operation::inverse
    /// [`Operation::inverse_for_right`]: crate::operation::Operation::inverse_for_right
    pub fn isolate(&self, target: &Operand) -> Result<Operand> {
        let mut path = Vec::new();
        let mut solved = if path_to(&self.left, target, &mut path) {
            self.right.clone()
        } else if path_to(&self.right, target, &mut path) {
            self.left.clone()
        } else {
            return Err(AlgebraError::TargetNotFound(target.to_string()));
        };

        for (node, branch) in path {
            solved = match branch {
                Branch::Left => node.inverse(solved),
                Branch::Right => node.inverse_for_right(solved),
            }
            .into();
            trace!("isolating {target}: undid {:?} on the {branch:?}", node.op());
        }

        debug!("isolated {target} = {solved} from {self}");
        Ok(solved)
    }
}

#[derive(Debug, Clone, Copy)]
enum Branch {
    Left,
    Right,
}

/// Records the operations between `operand` and the first occurrence of `target`, root
/// first. Left operands are searched before right ones. Leaves `path` untouched on a miss.
fn path_to<'a>(
    operand: &'a Operand,
    target: &Operand,
    path: &mut Vec<(&'a Operation, Branch)>,
) -> bool {
    if operand == target {
        return true;
    }
    let Operand::Operation(node) = operand else {
        return false;
    };
    for (branch, side) in [(Branch::Left, node.left()), (Branch::Right, node.right())] {
        let Some(side) = side else { continue };
        path.push((node, branch));
        if path_to(side, target, path) {
            return true;
        }
        path.pop();
    }
    false
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}
