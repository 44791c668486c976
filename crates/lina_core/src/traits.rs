use crate::error::{AlgebraError, Result};
use crate::value::{Value, Width};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};
use std::fmt::Debug;

/// The common currency every width converts through. Exact for integers and finite floats.
pub type Decimal = BigRational;

/// A native numeric type that can sit in a leaf of an expression tree.
///
/// Conversion into [`Decimal`] never loses information. Conversion back narrows using the
/// native rules of the target width: integers truncate toward zero and wrap modulo 2^bits,
/// floats round to nearest and saturate to infinity.
pub trait Primitive: Clone + Debug + 'static {
    const WIDTH: Width;

    fn to_decimal(&self) -> Result<Decimal>;

    fn from_decimal(value: &Decimal) -> Self;

    fn into_value(self) -> Value;
}

/// Low `bits` bits of the truncated integer part, in two's complement.
fn wrap_to_bits(value: &Decimal, bits: u32) -> u64 {
    let modulus = BigInt::one() << bits;
    let remainder = value.to_integer() % &modulus;
    let wrapped = if remainder.is_negative() {
        remainder + &modulus
    } else {
        remainder
    };
    // wrapped < 2^64 for every width we implement
    wrapped.to_u64().unwrap_or_default()
}

pub(crate) fn decimal_to_f64(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or_else(|| saturate(value))
}

fn saturate(value: &Decimal) -> f64 {
    if value.is_negative() {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }
}

macro_rules! integer_primitive {
    ($($ty:ty => $width:ident),* $(,)?) => {$(
        impl Primitive for $ty {
            const WIDTH: Width = Width::$width;

            fn to_decimal(&self) -> Result<Decimal> {
                Ok(Decimal::from_integer(BigInt::from(*self)))
            }

            fn from_decimal(value: &Decimal) -> Self {
                wrap_to_bits(value, <$ty>::BITS) as $ty
            }

            fn into_value(self) -> Value {
                Value::$width(self)
            }
        }
    )*};
}

integer_primitive! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

impl Primitive for f32 {
    const WIDTH: Width = Width::F32;

    fn to_decimal(&self) -> Result<Decimal> {
        Decimal::from_float(*self).ok_or_else(|| AlgebraError::NonFinite(self.to_string()))
    }

    fn from_decimal(value: &Decimal) -> Self {
        value.to_f32().unwrap_or_else(|| saturate(value) as f32)
    }

    fn into_value(self) -> Value {
        Value::F32(self)
    }
}

impl Primitive for f64 {
    const WIDTH: Width = Width::F64;

    fn to_decimal(&self) -> Result<Decimal> {
        Decimal::from_float(*self).ok_or_else(|| AlgebraError::NonFinite(self.to_string()))
    }

    fn from_decimal(value: &Decimal) -> Self {
        decimal_to_f64(value)
    }

    fn into_value(self) -> Value {
        Value::F64(self)
    }
}

impl Primitive for Decimal {
    const WIDTH: Width = Width::Decimal;

    fn to_decimal(&self) -> Result<Decimal> {
        Ok(self.clone())
    }

    fn from_decimal(value: &Decimal) -> Self {
        value.clone()
    }

    fn into_value(self) -> Value {
        Value::Decimal(self)
    }
}
