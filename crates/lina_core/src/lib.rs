pub mod equation;
pub mod error;
pub mod operand;
pub mod operation;
pub mod settings;
/// The `lina_core` crate builds algebraic expression trees over fixed-width numbers,
/// evaluates them lazily and solves simple equations for a single subterm.
///
/// Key components:
/// - **Traits**: `Primitive` (native number <-> common `Decimal`).
/// - **Value**: the leaf type, one variant per native width, with eager arithmetic.
/// - **Operand / Operation**: deferred trees built with `+ - * / ^` or named combinators.
/// - **Equation**: pairs two operands and isolates a target by inverting operations.
pub mod traits;
pub mod value;

pub use equation::Equation;
pub use error::{AlgebraError, Result};
pub use operand::{Operand, Symbol};
pub use operation::{BinaryOp, Operation};
pub use settings::EvaluationSettings;
pub use traits::{Decimal, Primitive};
pub use value::{Value, Width};
