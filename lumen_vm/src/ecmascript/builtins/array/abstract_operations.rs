// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Array abstract operations and the specialization guards.

use crate::{
    ecmascript::{
        abstract_operations::type_conversion::{to_number, to_uint32},
        builtins::array::Array,
        execution::{Agent, ExceptionType, JsResult},
        types::{PropertyKey, Value},
    },
    heap::element_array::MAX_ARRAY_LENGTH,
};

/// ### [10.4.2.2 ArrayCreate ( length )](https://tc39.es/ecma262/#sec-arraycreate)
pub fn array_create(agent: &mut Agent, length: u64) -> JsResult<Array> {
    if length > MAX_ARRAY_LENGTH {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    Ok(Array::create_with_length(agent, length as u32))
}

/// The receiver guard shared by every array fast path: a heap Array
/// whose own-property behavior is still the trivial dense shape.
#[inline]
pub fn as_trivial_array(agent: &Agent, value: Value) -> Option<Array> {
    match value {
        Value::Array(array) if array.is_trivial(agent) => Some(array),
        _ => None,
    }
}

/// Index-like arguments must not be able to run user code during
/// coercion; only `undefined` and integral numbers qualify.
#[inline]
pub fn is_trivial_index(value: Value) -> bool {
    matches!(value, Value::Undefined | Value::Integer(_))
}

/// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
///
/// The value-only portion; attribute changes are handled by the
/// caller's `[[DefineOwnProperty]]`.
pub fn array_set_length(agent: &mut Agent, array: Array, value: Value) -> JsResult<bool> {
    let new_len = match value {
        Value::Integer(i) if (0..=MAX_ARRAY_LENGTH as i64).contains(&i) => i as u32,
        _ => {
            let number = to_number(agent, value)?;
            let uint = to_uint32(number);
            if uint as f64 != number {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "Invalid array length",
                ));
            }
            uint
        }
    };
    let elements = &agent[array].elements;
    let old_len = elements.len();
    if new_len == old_len {
        return Ok(true);
    }
    if !elements.len_writable {
        return Ok(false);
    }
    if new_len < old_len
        && let Some(backing) = agent[array].object_index
    {
        // De-specialized index properties live on the backing object;
        // a shrink deletes them from the top down and stops at the
        // first non-configurable one, leaving length just above it.
        let mut doomed: Vec<i64> = agent[backing]
            .properties
            .keys()
            .filter_map(|key| match key {
                PropertyKey::Integer(index)
                    if *index >= new_len as i64 && key.is_array_index() =>
                {
                    Some(*index)
                }
                _ => None,
            })
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        for index in doomed {
            if !backing.internal_delete(agent, PropertyKey::Integer(index))? {
                agent[array].elements.set_len(index as u32 + 1);
                return Ok(false);
            }
        }
    }
    agent[array].elements.set_len(new_len);
    Ok(true)
}
