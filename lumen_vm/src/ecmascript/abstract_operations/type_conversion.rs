// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! Only the conversions the array engine can reach. Conversions on
//! objects can run user code (`valueOf`), which is why index arguments
//! that are not already trivially numeric disqualify a fast path.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::{call_function, get},
        testing_and_comparison::is_callable,
    },
    execution::{Agent, ExceptionType, JsResult},
    types::{HeapString, Object, PropertyKey, Value},
};

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub fn to_boolean(agent: &Agent, argument: Value) -> bool {
    match argument {
        Value::Undefined | Value::Null => false,
        Value::Boolean(b) => b,
        Value::String(s) => !s.as_str(agent).is_empty(),
        Value::Integer(i) => i != 0,
        Value::Float(f) => f != 0.0 && !f.is_nan(),
        _ => true,
    }
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
pub fn to_number(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    match argument {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Boolean(b) => Ok(if b { 1.0 } else { 0.0 }),
        Value::Integer(i) => Ok(i as f64),
        Value::Float(f) => Ok(f),
        Value::String(s) => Ok(string_to_number(s.as_str(agent))),
        _ => {
            // ToPrimitive with number hint: only valueOf is honoured
            // here. This is where a throwing valueOf surfaces.
            let object = Object::try_from(argument).unwrap();
            let value_of_key = PropertyKey::String(agent.heap.well_known.value_of);
            let value_of = get(agent, object, value_of_key)?;
            if let Some(value_of) = is_callable(value_of) {
                let primitive = call_function(agent, value_of, argument, &[])?;
                if !primitive.is_object() {
                    return to_number(agent, primitive);
                }
            }
            Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Cannot convert object to number",
            ))
        }
    }
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
fn string_to_number(string: &str) -> f64 {
    let trimmed = string.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => fast_float::parse(trimmed).unwrap_or(f64::NAN),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerOrInfinity {
    Integer(i64),
    PositiveInfinity,
    NegativeInfinity,
}

impl IntegerOrInfinity {
    /// Resolves a relative index against `len`: negative counts from
    /// the end, and the result is clamped to `[0, len]`.
    pub fn relative_index(self, len: i64) -> i64 {
        match self {
            IntegerOrInfinity::PositiveInfinity => len,
            IntegerOrInfinity::NegativeInfinity => 0,
            IntegerOrInfinity::Integer(n) if n < 0 => (len + n).max(0),
            IntegerOrInfinity::Integer(n) => n.min(len),
        }
    }

    pub fn into_i64_clamped(self) -> i64 {
        match self {
            IntegerOrInfinity::PositiveInfinity => i64::MAX,
            IntegerOrInfinity::NegativeInfinity => i64::MIN,
            IntegerOrInfinity::Integer(n) => n,
        }
    }
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub fn to_integer_or_infinity(agent: &mut Agent, argument: Value) -> JsResult<IntegerOrInfinity> {
    // The common trivial cases skip the full ToNumber machinery.
    if let Value::Integer(i) = argument {
        return Ok(IntegerOrInfinity::Integer(i));
    }
    let number = to_number(agent, argument)?;
    Ok(if number.is_nan() {
        IntegerOrInfinity::Integer(0)
    } else if number == f64::INFINITY {
        IntegerOrInfinity::PositiveInfinity
    } else if number == f64::NEG_INFINITY {
        IntegerOrInfinity::NegativeInfinity
    } else {
        IntegerOrInfinity::Integer(number.trunc() as i64)
    })
}

/// ### [7.1.20 ToLength ( argument )](https://tc39.es/ecma262/#sec-tolength)
pub fn to_length(agent: &mut Agent, argument: Value) -> JsResult<i64> {
    let len = to_integer_or_infinity(agent, argument)?.into_i64_clamped();
    Ok(len.clamp(0, crate::ecmascript::types::MAX_SAFE_INTEGER))
}

/// ### [7.1.7 ToUint32 ( argument )](https://tc39.es/ecma262/#sec-touint32)
pub fn to_uint32(number: f64) -> u32 {
    if !number.is_finite() || number == 0.0 {
        return 0;
    }
    let int = number.trunc();
    (int as i64 as u64 % (1 << 32)) as u32
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub fn to_string(agent: &mut Agent, argument: Value) -> JsResult<HeapString> {
    match argument {
        Value::Undefined => Ok(agent.heap.well_known.undefined),
        Value::Null => Ok(agent.heap.well_known.null),
        Value::Boolean(true) => Ok(agent.heap.well_known.r#true),
        Value::Boolean(false) => Ok(agent.heap.well_known.r#false),
        Value::String(s) => Ok(s),
        Value::Integer(i) => {
            let formatted = i.to_string();
            Ok(agent.heap.alloc_string(&formatted))
        }
        Value::Float(f) => Ok(number_to_string(agent, f)),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert object to string",
        )),
    }
}

fn number_to_string(agent: &mut Agent, number: f64) -> HeapString {
    if number.is_nan() {
        agent.heap.well_known.nan
    } else if number == f64::INFINITY {
        agent.heap.well_known.infinity
    } else if number == f64::NEG_INFINITY {
        agent.heap.well_known.neg_infinity
    } else {
        let mut buffer = ryu_js::Buffer::new();
        let formatted = buffer.format(number).to_string();
        agent.heap.alloc_string(&formatted)
    }
}

/// ### [7.1.18 ToObject ( argument )](https://tc39.es/ecma262/#sec-toobject)
///
/// Primitive wrapper objects are not modelled; a primitive receiver
/// throws instead of boxing.
pub fn to_object(agent: &mut Agent, argument: Value) -> JsResult<Object> {
    Object::try_from(argument).map_err(|_| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert to object",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_number_follows_the_grammar() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("  42  "), 42.0);
        assert_eq!(string_to_number("1.5e3"), 1500.0);
        assert_eq!(string_to_number("0x10"), 16.0);
        assert_eq!(string_to_number("Infinity"), f64::INFINITY);
        assert!(string_to_number("not a number").is_nan());
    }

    #[test]
    fn to_uint32_wraps_modulo() {
        assert_eq!(to_uint32(0.0), 0);
        assert_eq!(to_uint32(-1.0), u32::MAX);
        assert_eq!(to_uint32(4294967296.0), 0);
        assert_eq!(to_uint32(f64::NAN), 0);
    }
}
