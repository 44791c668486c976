use crate::error::{AlgebraError, Result};
use crate::traits::{decimal_to_f64, Decimal, Primitive};
use log::debug;
use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest integral exponent computed exactly; anything larger goes through `f64`.
const EXACT_POWER_LIMIT: i32 = 4096;

/// Storage width of a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
}

impl Width {
    pub const ALL: [Width; 11] = [
        Width::I8,
        Width::U8,
        Width::I16,
        Width::U16,
        Width::I32,
        Width::U32,
        Width::I64,
        Width::U64,
        Width::F32,
        Width::F64,
        Width::Decimal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Width::I8 => "i8",
            Width::U8 => "u8",
            Width::I16 => "i16",
            Width::U16 => "u16",
            Width::I32 => "i32",
            Width::U32 => "u32",
            Width::I64 => "i64",
            Width::U64 => "u64",
            Width::F32 => "f32",
            Width::F64 => "f64",
            Width::Decimal => "decimal",
        }
    }

    /// Storage bits of an integer width; `None` for floats and decimals.
    pub fn bits(self) -> Option<u32> {
        match self {
            Width::I8 | Width::U8 => Some(8),
            Width::I16 | Width::U16 => Some(16),
            Width::I32 | Width::U32 => Some(32),
            Width::I64 | Width::U64 => Some(64),
            Width::F32 | Width::F64 | Width::Decimal => None,
        }
    }

    pub fn is_integer(self) -> bool {
        self.bits().is_some()
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single wrapped native number: the leaf of every expression tree.
///
/// Arithmetic lifts both sides to [`Decimal`], combines them there and narrows the result
/// back to the width of `self`. The width of the right-hand side never changes the width
/// of the result, only its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
}

macro_rules! each_width {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Value::I8($inner) => $body,
            Value::U8($inner) => $body,
            Value::I16($inner) => $body,
            Value::U16($inner) => $body,
            Value::I32($inner) => $body,
            Value::U32($inner) => $body,
            Value::I64($inner) => $body,
            Value::U64($inner) => $body,
            Value::F32($inner) => $body,
            Value::F64($inner) => $body,
            Value::Decimal($inner) => $body,
        }
    };
}

impl Value {
    pub fn width(&self) -> Width {
        match self {
            Value::I8(_) => Width::I8,
            Value::U8(_) => Width::U8,
            Value::I16(_) => Width::I16,
            Value::U16(_) => Width::U16,
            Value::I32(_) => Width::I32,
            Value::U32(_) => Width::U32,
            Value::I64(_) => Width::I64,
            Value::U64(_) => Width::U64,
            Value::F32(_) => Width::F32,
            Value::F64(_) => Width::F64,
            Value::Decimal(_) => Width::Decimal,
        }
    }

    pub fn to_decimal(&self) -> Result<Decimal> {
        each_width!(self, inner => inner.to_decimal())
    }

    /// Builds a value of the requested width from a decimal, narrowing natively.
    pub fn from_decimal(width: Width, value: &Decimal) -> Value {
        match width {
            Width::I8 => Value::I8(i8::from_decimal(value)),
            Width::U8 => Value::U8(u8::from_decimal(value)),
            Width::I16 => Value::I16(i16::from_decimal(value)),
            Width::U16 => Value::U16(u16::from_decimal(value)),
            Width::I32 => Value::I32(i32::from_decimal(value)),
            Width::U32 => Value::U32(u32::from_decimal(value)),
            Width::I64 => Value::I64(i64::from_decimal(value)),
            Width::U64 => Value::U64(u64::from_decimal(value)),
            Width::F32 => Value::F32(f32::from_decimal(value)),
            Width::F64 => Value::F64(f64::from_decimal(value)),
            Width::Decimal => Value::Decimal(value.clone()),
        }
    }

    /// Same width as `self`, new contents.
    pub fn narrow(&self, value: &Decimal) -> Value {
        Value::from_decimal(self.width(), value)
    }

    pub fn add(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, |a, b| Ok(a + b))
    }

    pub fn subtract(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, |a, b| Ok(a - b))
    }

    pub fn multiply(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, |a, b| Ok(a * b))
    }

    pub fn divide(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, |a, b| {
            if b.is_zero() {
                return Err(AlgebraError::DivisionByZero);
            }
            Ok(a / b)
        })
    }

    /// Raises `self` to the power `rhs`.
    ///
    /// Integer widths with an integral exponent are computed modulo 2^bits, so they wrap for
    /// any exponent. Other widths compute integral exponents up to [`EXACT_POWER_LIMIT`] in
    /// magnitude exactly and fall back to `f64::powf` otherwise. Zero to any negative power
    /// is a division by zero.
    pub fn exponentiate(&self, rhs: &Value) -> Result<Value> {
        let base = self.to_decimal()?;
        let exponent = rhs.to_decimal()?;
        if base.is_zero() && exponent.is_negative() {
            return Err(AlgebraError::DivisionByZero);
        }

        if let Some(bits) = self.width().bits() {
            if exponent.is_integer() {
                let power = wrapping_power(&base.to_integer(), &exponent.to_integer(), bits);
                return Ok(self.narrow(&Decimal::from_integer(power)));
            }
        }
        if let Some(power) = exact_power(&exponent) {
            return Ok(self.narrow(&Pow::pow(&base, power)));
        }

        let result = decimal_to_f64(&base).powf(decimal_to_f64(&exponent));
        debug!("inexact power {base}^{exponent} = {result}");
        Ok(self.narrow(&result.to_decimal()?))
    }

    /// Logarithm of `self` in base `rhs`, computed in `f64`.
    pub fn logarithm(&self, rhs: &Value) -> Result<Value> {
        self.combine(rhs, |antilog, base| {
            decimal_to_f64(&antilog)
                .log(decimal_to_f64(&base))
                .to_decimal()
        })
    }

    fn combine<F>(&self, rhs: &Value, op: F) -> Result<Value>
    where
        F: FnOnce(Decimal, Decimal) -> Result<Decimal>,
    {
        let result = op(self.to_decimal()?, rhs.to_decimal()?)?;
        Ok(self.narrow(&result))
    }
}

/// `base ^ exponent` truncated toward zero, reduced modulo 2^bits.
fn wrapping_power(base: &BigInt, exponent: &BigInt, bits: u32) -> BigInt {
    if exponent.is_negative() {
        // |base| >= 2 gives a fraction below one, which truncates to zero
        if !base.abs().is_one() {
            return BigInt::zero();
        }
        let odd = !(exponent % 2u32).is_zero();
        return if base.is_negative() && odd {
            -BigInt::one()
        } else {
            BigInt::one()
        };
    }
    base.modpow(exponent, &(BigInt::one() << bits))
}

fn exact_power(exponent: &Decimal) -> Option<i32> {
    if !exponent.is_integer() {
        return None;
    }
    exponent
        .to_integer()
        .to_i32()
        .filter(|power| power.abs() <= EXACT_POWER_LIMIT)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_width!(self, inner => write!(f, "{inner}"))
    }
}

macro_rules! native_conversions {
    ($($ty:ty => $width:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                value.into_value()
            }
        }

        impl TryFrom<Value> for $ty {
            type Error = AlgebraError;

            fn try_from(value: Value) -> Result<Self> {
                match value {
                    Value::$width(inner) => Ok(inner),
                    other => Err(AlgebraError::WidthMismatch {
                        expected: <$ty as Primitive>::WIDTH,
                        found: other.width(),
                    }),
                }
            }
        }
    )*};
}

native_conversions! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
}

#[cfg(test)]
mod tests {
    use super::{Value, Width};
    use crate::error::AlgebraError;
    use crate::traits::Decimal;
    use num_bigint::BigInt;

    #[test]
    fn result_takes_the_left_width() {
        let sum = Value::I16(300).add(&Value::U64(5)).unwrap();
        assert_eq!(sum, Value::I16(305));

        let sum = Value::F64(0.5).add(&Value::I32(2)).unwrap();
        assert_eq!(sum, Value::F64(2.5));

        let sum = Value::I32(2).add(&Value::F64(0.75)).unwrap();
        assert_eq!(sum, Value::I32(2));
    }

    #[test]
    fn float_arithmetic_matches_native_rounding() {
        let sum = Value::F64(0.1).add(&Value::F64(0.2)).unwrap();
        assert_eq!(sum, Value::F64(0.1 + 0.2));

        let quotient = Value::F32(1.0).divide(&Value::F32(3.0)).unwrap();
        assert_eq!(quotient, Value::F32(1.0f32 / 3.0));
    }

    #[test]
    fn integer_division_truncates() {
        assert_eq!(Value::I32(21).divide(&Value::I32(4)).unwrap(), Value::I32(5));
        assert_eq!(Value::I32(-21).divide(&Value::I32(4)).unwrap(), Value::I32(-5));
    }

    #[test]
    fn overflow_wraps_in_the_left_width() {
        let sum = Value::U8(250).add(&Value::U8(10)).unwrap();
        assert_eq!(sum, Value::U8(4));

        let difference = Value::U16(0).subtract(&Value::I32(1)).unwrap();
        assert_eq!(difference, Value::U16(u16::MAX));
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(
            Value::I32(1).divide(&Value::I64(0)),
            Err(AlgebraError::DivisionByZero)
        );
        assert_eq!(
            Value::F64(1.0).divide(&Value::F64(0.0)),
            Err(AlgebraError::DivisionByZero)
        );
    }

    #[test]
    fn integral_powers_are_exact() {
        let power = Value::I64(2).exponentiate(&Value::I32(62)).unwrap();
        assert_eq!(power, Value::I64(1 << 62));

        let power = Value::Decimal(Decimal::from_integer(BigInt::from(2)))
            .exponentiate(&Value::I32(-2))
            .unwrap();
        assert_eq!(
            power,
            Value::Decimal(Decimal::new(BigInt::from(1), BigInt::from(4)))
        );

        assert_eq!(
            Value::I32(0).exponentiate(&Value::I32(-1)),
            Err(AlgebraError::DivisionByZero)
        );
    }

    #[test]
    fn integer_powers_wrap_for_any_exponent() {
        assert_eq!(Value::I32(2).exponentiate(&Value::I32(4096)).unwrap(), Value::I32(0));
        assert_eq!(Value::I32(2).exponentiate(&Value::I32(4097)).unwrap(), Value::I32(0));
        assert_eq!(
            Value::I32(3).exponentiate(&Value::I32(5000)).unwrap(),
            Value::I32(3i32.wrapping_pow(5000))
        );
        assert_eq!(
            Value::I16(-3).exponentiate(&Value::U64(4097)).unwrap(),
            Value::I16((-3i16).wrapping_pow(4097))
        );
        assert_eq!(
            Value::U8(7).exponentiate(&Value::I64(1_000_000_007)).unwrap(),
            Value::U8(7u8.wrapping_pow(1_000_000_007))
        );
    }

    #[test]
    fn integer_negative_powers_truncate() {
        assert_eq!(Value::I32(2).exponentiate(&Value::I32(-1)).unwrap(), Value::I32(0));
        assert_eq!(Value::I32(1).exponentiate(&Value::I32(-5000)).unwrap(), Value::I32(1));
        assert_eq!(Value::I32(-1).exponentiate(&Value::I32(-3)).unwrap(), Value::I32(-1));
        assert_eq!(Value::I32(-1).exponentiate(&Value::I32(-4)).unwrap(), Value::I32(1));
    }

    #[test]
    fn zero_to_a_negative_power_divides_by_zero() {
        for exponent in [Value::I32(-1), Value::I32(-5000), Value::F64(-0.5)] {
            assert_eq!(
                Value::U8(0).exponentiate(&exponent),
                Err(AlgebraError::DivisionByZero)
            );
            assert_eq!(
                Value::F64(0.0).exponentiate(&exponent),
                Err(AlgebraError::DivisionByZero)
            );
        }
    }

    #[test]
    fn fractional_powers_use_float_rounding() {
        let root = Value::F64(2.0).exponentiate(&Value::F64(0.5)).unwrap();
        assert_eq!(root, Value::F64(2f64.powf(0.5)));

        let root = Value::I32(10).exponentiate(&Value::F64(0.5)).unwrap();
        assert_eq!(root, Value::I32(3));
    }

    #[test]
    fn logarithm_takes_the_right_side_as_base() {
        let log = Value::F64(81.0).logarithm(&Value::F64(3.0)).unwrap();
        match log {
            Value::F64(inner) => assert!((inner - 4.0).abs() < 1e-12),
            other => panic!("unexpected width {}", other.width()),
        }

        assert_eq!(Value::I32(7).logarithm(&Value::I32(7)).unwrap(), Value::I32(1));
        assert_eq!(Value::I32(1).logarithm(&Value::I32(7)).unwrap(), Value::I32(0));
    }

    #[test]
    fn undefined_logarithm_is_non_finite() {
        assert!(matches!(
            Value::F64(0.0).logarithm(&Value::F64(10.0)),
            Err(AlgebraError::NonFinite(_))
        ));
        assert!(matches!(
            Value::F64(-1.0).logarithm(&Value::F64(10.0)),
            Err(AlgebraError::NonFinite(_))
        ));
    }

    #[test]
    fn native_conversions_check_the_width() {
        assert_eq!(i64::try_from(Value::from(9i64)), Ok(9));
        assert_eq!(
            u16::try_from(Value::from(9i64)),
            Err(AlgebraError::WidthMismatch {
                expected: Width::U16,
                found: Width::I64,
            })
        );
    }

    #[test]
    fn every_width_round_trips_through_decimal() {
        let seven = Decimal::from_integer(BigInt::from(7));
        for width in Width::ALL {
            let value = Value::from_decimal(width, &seven);
            assert_eq!(value.width(), width);
            assert_eq!(
                width.is_integer(),
                !matches!(width, Width::F32 | Width::F64 | Width::Decimal)
            );
            assert_eq!(value.to_decimal().unwrap(), seven);
            assert_eq!(Value::from_decimal(width, &value.to_decimal().unwrap()), value);
        }
    }
}
