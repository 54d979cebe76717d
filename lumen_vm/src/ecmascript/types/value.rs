// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builtins::{array::Array, array_buffer::ArrayBuffer, builtin_function::BuiltinFunction,
        typed_array::TypedArray},
    types::{HeapString, Object},
};

/// Integral numbers stay in this range as [Value::Integer]; anything
/// else lives in [Value::Float].
pub const MAX_SAFE_INTEGER: i64 = 2i64.pow(53) - 1;
pub const MIN_SAFE_INTEGER: i64 = -MAX_SAFE_INTEGER;

/// A language value.
///
/// Numbers are split into an integer and a float representation;
/// [Value::from_f64] canonicalizes so that every safe integral number
/// (except `-0.0`) is [Value::Integer].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    String(HeapString),
    /// Integral number in the safe integer range.
    Integer(i64),
    /// Any other number: fractional, huge, `NaN`, infinities, `-0.0`.
    Float(f64),
    Object(crate::ecmascript::types::OrdinaryObject),
    Array(Array),
    ArrayBuffer(ArrayBuffer),
    TypedArray(TypedArray),
    BuiltinFunction(BuiltinFunction),
}

impl Value {
    /// Canonicalizing number constructor.
    pub fn from_f64(value: f64) -> Self {
        // -0.0 must stay a float; `fract` would erase the sign.
        if value == value.trunc()
            && value.is_finite()
            && !(value == 0.0 && value.is_sign_negative())
            && (MIN_SAFE_INTEGER as f64..=MAX_SAFE_INTEGER as f64).contains(&value)
        {
            Value::Integer(value as i64)
        } else {
            Value::Float(value)
        }
    }

    pub fn nan() -> Self {
        Value::Float(f64::NAN)
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_number(self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn is_string(self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Numeric value, if this is a number.
    pub fn as_number(self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_object(self) -> bool {
        Object::try_from(self).is_ok()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        debug_assert!((MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value));
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::from_f64(value)
    }
}

impl From<HeapString> for Value {
    fn from(value: HeapString) -> Self {
        Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64_canonicalizes_integral_values() {
        assert_eq!(Value::from_f64(3.0), Value::Integer(3));
        assert_eq!(Value::from_f64(-7.0), Value::Integer(-7));
        assert_eq!(Value::from_f64(0.5), Value::Float(0.5));
        assert!(matches!(Value::from_f64(f64::NAN), Value::Float(f) if f.is_nan()));
        assert!(matches!(Value::from_f64(-0.0), Value::Float(f) if f == 0.0));
    }
}
