// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.1.3 Properties of the Array Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-array-prototype-object)
//!
//! Every method follows the same shape: a guarded fast path operating
//! directly on element storage, falling through to a generic spec-step
//! path over the object protocol. Methods that run user callbacks
//! re-validate the specialization guards after every re-entry and
//! delegate the remaining index range to their `*_generic` continuation
//! when the receiver de-specializes mid-loop. Once any guard fails, no
//! storage mutation for that call has happened.

use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::{
                array_species_create, call_function, create_data_property_or_throw,
                delete_property_or_throw, get, has_property, length_of_array_like, set,
            },
            testing_and_comparison::{is_callable, is_strictly_equal, same_value_zero},
            type_conversion::{
                IntegerOrInfinity, to_boolean, to_integer_or_infinity, to_number, to_string,
            },
        },
        builtins::{
            array::{
                Array, ArrayHeapData,
                abstract_operations::{as_trivial_array, is_trivial_index},
            },
            builtin_function::{ArgumentsList, BuiltinFunction},
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{MAX_SAFE_INTEGER, Object, PropertyKey, Value},
    },
    heap::{
        CreateHeapData,
        element_array::{ElementsKind, MAX_ARRAY_LENGTH},
    },
};

#[inline]
fn length_key(agent: &Agent) -> PropertyKey {
    PropertyKey::String(agent.heap.well_known.length)
}

fn get_index(agent: &mut Agent, object: Object, index: i64) -> JsResult<Value> {
    get(agent, object, PropertyKey::Integer(index))
}

fn has_index(agent: &mut Agent, object: Object, index: i64) -> JsResult<bool> {
    has_property(agent, object, PropertyKey::Integer(index))
}

fn set_index(agent: &mut Agent, object: Object, index: i64, value: Value) -> JsResult<()> {
    set(agent, object, PropertyKey::Integer(index), value, true)
}

fn set_length(agent: &mut Agent, object: Object, length: i64) -> JsResult<()> {
    let key = length_key(agent);
    set(agent, object, key, Value::from(length), true)
}

fn require_callable(agent: &mut Agent, value: Value) -> JsResult<BuiltinFunction> {
    is_callable(value).ok_or_else(|| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Callback is not callable",
        )
    })
}

fn to_object(agent: &mut Agent, value: Value) -> JsResult<Object> {
    crate::ecmascript::abstract_operations::type_conversion::to_object(agent, value)
}

/// Resolves a relative-index argument against `len`, clamped to
/// `[0, len]`. The fast paths only reach this with `Undefined` or
/// `Integer` arguments, so no user code can run.
fn relative_argument(
    agent: &mut Agent,
    argument: Value,
    len: i64,
    default: i64,
) -> JsResult<i64> {
    if argument.is_undefined() {
        return Ok(default);
    }
    Ok(to_integer_or_infinity(agent, argument)?.relative_index(len))
}

/// ### [23.1.3.23 Array.prototype.push ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.push)
pub fn array_prototype_push(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    if let Some(array) = as_trivial_array(agent, this_value)
        && array.length_writable(agent)
        && array.len(agent) as u64 + arguments.len() as u64 <= MAX_ARRAY_LENGTH
    {
        for argument in arguments.iter() {
            agent[array].elements.push(Some(*argument));
        }
        return Ok(Value::from(array.len(agent)));
    }
    push_generic(agent, this_value, arguments)
}

fn push_generic(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    // 1. Let O be ? ToObject(this value).
    let o = to_object(agent, this_value)?;
    // 2. Let len be ? LengthOfArrayLike(O).
    let mut len = length_of_array_like(agent, o)?;
    // 3. If len + argCount > 2**53 - 1, throw a TypeError exception.
    if len + arguments.len() as i64 > MAX_SAFE_INTEGER {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Array length exceeds the maximum safe integer",
        ));
    }
    // 4. For each element E of items, perform ? Set(O, len, E, true).
    for index in 0..arguments.len() {
        let argument = arguments.get(index);
        set_index(agent, o, len, argument)?;
        len += 1;
    }
    // 5. Perform ? Set(O, "length", len, true).
    set_length(agent, o, len)?;
    Ok(Value::from(len))
}

/// ### [23.1.3.22 Array.prototype.pop ( )](https://tc39.es/ecma262/#sec-array.prototype.pop)
pub fn array_prototype_pop(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    if let Some(array) = as_trivial_array(agent, this_value)
        && array.length_writable(agent)
    {
        let len = array.len(agent);
        if len == 0 {
            return Ok(Value::Undefined);
        }
        // A hole at the tail may shadow an inherited accessor; the
        // generic path performs the observable read.
        if let Some(value) = agent[array].elements.get(len - 1) {
            agent[array].elements.set_len(len - 1);
            return Ok(value);
        }
    }
    pop_generic(agent, this_value)
}

fn pop_generic(agent: &mut Agent, this_value: Value) -> JsResult<Value> {
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    if len == 0 {
        set_length(agent, o, 0)?;
        return Ok(Value::Undefined);
    }
    let index = len - 1;
    let element = get_index(agent, o, index)?;
    delete_property_or_throw(agent, o, PropertyKey::Integer(index))?;
    set_length(agent, o, index)?;
    Ok(element)
}

/// ### [23.1.3.29 Array.prototype.shift ( )](https://tc39.es/ecma262/#sec-array.prototype.shift)
pub fn array_prototype_shift(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    if let Some(array) = as_trivial_array(agent, this_value)
        && array.length_writable(agent)
    {
        let len = array.len(agent);
        if len == 0 {
            return Ok(Value::Undefined);
        }
        if let Some(first) = agent[array].elements.get(0) {
            let elements = &mut agent[array].elements;
            elements.copy_within_range(1, len, 0);
            elements.set_len(len - 1);
            return Ok(first);
        }
    }
    shift_generic(agent, this_value)
}

fn shift_generic(agent: &mut Agent, this_value: Value) -> JsResult<Value> {
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    if len == 0 {
        set_length(agent, o, 0)?;
        return Ok(Value::Undefined);
    }
    let first = get_index(agent, o, 0)?;
    for from in 1..len {
        let to = from - 1;
        if has_index(agent, o, from)? {
            let value = get_index(agent, o, from)?;
            set_index(agent, o, to, value)?;
        } else {
            delete_property_or_throw(agent, o, PropertyKey::Integer(to))?;
        }
    }
    delete_property_or_throw(agent, o, PropertyKey::Integer(len - 1))?;
    set_length(agent, o, len - 1)?;
    Ok(first)
}

/// ### [23.1.3.34 Array.prototype.unshift ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.unshift)
pub fn array_prototype_unshift(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    if let Some(array) = as_trivial_array(agent, this_value)
        && array.length_writable(agent)
        && array.len(agent) as u64 + arguments.len() as u64 <= MAX_ARRAY_LENGTH
    {
        let len = array.len(agent);
        let count = arguments.len() as u32;
        if count > 0 {
            let elements = &mut agent[array].elements;
            // Every grown slot is overwritten below, so the kind need
            // not widen to a holey one.
            elements.grow_for_overwrite(len + count);
            // One overlapping move right, then the new head.
            elements.copy_within_range(0, len, count);
            for (index, argument) in arguments.iter().enumerate() {
                agent[array].elements.set(index as u32, *argument);
            }
        }
        return Ok(Value::from(len + count));
    }
    unshift_generic(agent, this_value, arguments)
}

fn unshift_generic(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let arg_count = arguments.len() as i64;
    if arg_count > 0 {
        if len + arg_count > MAX_SAFE_INTEGER {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Array length exceeds the maximum safe integer",
            ));
        }
        // Move the existing window right, tail first.
        let mut k = len;
        while k > 0 {
            let from = k - 1;
            let to = k + arg_count - 1;
            if has_index(agent, o, from)? {
                let value = get_index(agent, o, from)?;
                set_index(agent, o, to, value)?;
            } else {
                delete_property_or_throw(agent, o, PropertyKey::Integer(to))?;
            }
            k -= 1;
        }
        for index in 0..arguments.len() {
            let argument = arguments.get(index);
            set_index(agent, o, index as i64, argument)?;
        }
    }
    set_length(agent, o, len + arg_count)?;
    Ok(Value::from(len + arg_count))
}

/// ### [23.1.3.28 Array.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-array.prototype.slice)
pub fn array_prototype_slice(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let start = arguments.get(0);
    let end = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value)
        && !array.has_custom_constructor(agent)
        && is_trivial_index(start)
        && is_trivial_index(end)
    {
        let len = array.len(agent) as i64;
        let k = relative_argument(agent, start, len, 0)?;
        let final_index = relative_argument(agent, end, len, len)?;
        let (k, final_index) = (k as u32, final_index.max(k) as u32);
        let elements = if k == 0 && final_index == len as u32 {
            // A full-range copy aliases the backing store; whichever
            // side writes first clones it.
            let mut elements = agent[array].elements.clone();
            elements.len_writable = true;
            elements
        } else {
            // Hole-preserving storage-level copy.
            agent[array].elements.copy_range(k, final_index)
        };
        let result = agent.heap.create(ArrayHeapData::new(elements));
        return Ok(result.into());
    }
    slice_generic(agent, this_value, start, end)
}

fn slice_generic(agent: &mut Agent, this_value: Value, start: Value, end: Value) -> JsResult<Value> {
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let mut k = to_integer_or_infinity(agent, start)?.relative_index(len);
    let final_index = if end.is_undefined() {
        len
    } else {
        to_integer_or_infinity(agent, end)?.relative_index(len)
    };
    let count = (final_index - k).max(0);
    let a = array_species_create(agent, o, count as u64)?;
    let mut n = 0i64;
    while k < final_index {
        if has_index(agent, o, k)? {
            let value = get_index(agent, o, k)?;
            create_data_property_or_throw(agent, a, PropertyKey::Integer(n), value)?;
        }
        k += 1;
        n += 1;
    }
    set_length(agent, a, n)?;
    Ok(a.into_value())
}

/// ### [23.1.3.32 Array.prototype.splice ( start, deleteCount, ...items )](https://tc39.es/ecma262/#sec-array.prototype.splice)
pub fn array_prototype_splice(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let start = arguments.get(0);
    let delete_count = arguments.get(1);
    let items = if arguments.len() > 2 { &arguments[2..] } else { &[] };
    if let Some(array) = as_trivial_array(agent, this_value)
        && array.length_writable(agent)
        && !array.has_custom_constructor(agent)
        && is_trivial_index(start)
        && is_trivial_index(delete_count)
    {
        let len = array.len(agent) as i64;
        let actual_start = relative_argument(agent, start, len, 0)?;
        let actual_delete = if arguments.is_empty() {
            0
        } else if arguments.len() == 1 {
            len - actual_start
        } else {
            to_integer_or_infinity(agent, delete_count)?
                .into_i64_clamped()
                .clamp(0, len - actual_start)
        };
        let insert_count = items.len() as i64;
        let new_len = len - actual_delete + insert_count;
        if new_len as u64 <= MAX_ARRAY_LENGTH {
            let s = actual_start as u32;
            let d = actual_delete as u32;
            let n = insert_count as u32;
            let old_len = len as u32;
            let removed = agent[array].elements.copy_range(s, s + d);
            let elements = &mut agent[array].elements;
            if n < d {
                elements.copy_within_range(s + d, old_len, s + n);
                elements.set_len(old_len - d + n);
            } else if n > d {
                // The grown slots are all covered by the tail move and
                // the insertions, so the kind stays put.
                elements.grow_for_overwrite(old_len - d + n);
                elements.copy_within_range(s + d, old_len, s + n);
            }
            for (offset, item) in items.iter().enumerate() {
                agent[array].elements.set(s + offset as u32, *item);
            }
            let result = agent.heap.create(ArrayHeapData::new(removed));
            return Ok(result.into());
        }
    }
    splice_generic(agent, this_value, arguments)
}

fn splice_generic(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let start = arguments.get(0);
    let delete_count = arguments.get(1);
    let items: Vec<Value> = if arguments.len() > 2 {
        arguments[2..].to_vec()
    } else {
        Vec::new()
    };
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let actual_start = to_integer_or_infinity(agent, start)?.relative_index(len);
    let insert_count = items.len() as i64;
    let actual_delete_count = if arguments.is_empty() {
        0
    } else if arguments.len() == 1 {
        len - actual_start
    } else {
        to_integer_or_infinity(agent, delete_count)?
            .into_i64_clamped()
            .clamp(0, len - actual_start)
    };
    if len + insert_count - actual_delete_count > MAX_SAFE_INTEGER {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Array length exceeds the maximum safe integer",
        ));
    }
    let a = array_species_create(agent, o, actual_delete_count as u64)?;
    for k in 0..actual_delete_count {
        let from = actual_start + k;
        if has_index(agent, o, from)? {
            let value = get_index(agent, o, from)?;
            create_data_property_or_throw(agent, a, PropertyKey::Integer(k), value)?;
        }
    }
    set_length(agent, a, actual_delete_count)?;
    if insert_count < actual_delete_count {
        for k in actual_start..(len - actual_delete_count) {
            let from = k + actual_delete_count;
            let to = k + insert_count;
            if has_index(agent, o, from)? {
                let value = get_index(agent, o, from)?;
                set_index(agent, o, to, value)?;
            } else {
                delete_property_or_throw(agent, o, PropertyKey::Integer(to))?;
            }
        }
        for k in ((len - actual_delete_count + insert_count)..len).rev() {
            delete_property_or_throw(agent, o, PropertyKey::Integer(k))?;
        }
    } else if insert_count > actual_delete_count {
        for k in (actual_start..(len - actual_delete_count)).rev() {
            let from = k + actual_delete_count;
            let to = k + insert_count;
            if has_index(agent, o, from)? {
                let value = get_index(agent, o, from)?;
                set_index(agent, o, to, value)?;
            } else {
                delete_property_or_throw(agent, o, PropertyKey::Integer(to))?;
            }
        }
    }
    for (offset, item) in items.iter().enumerate() {
        set_index(agent, o, actual_start + offset as i64, *item)?;
    }
    set_length(agent, o, len - actual_delete_count + insert_count)?;
    Ok(a.into_value())
}

/// ### [23.1.3.1 Array.prototype.concat ( ...items )](https://tc39.es/ecma262/#sec-array.prototype.concat)
pub fn array_prototype_concat(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    'fast: {
        let Some(array) = as_trivial_array(agent, this_value) else {
            break 'fast;
        };
        if array.has_custom_constructor(agent) {
            break 'fast;
        }
        // Every spread source must itself be trivial, and the result
        // must fit the array index range.
        let mut total = array.len(agent) as u64;
        for argument in arguments.iter() {
            match argument {
                Value::Array(other) if other.is_trivial(agent) => {
                    total += other.len(agent) as u64;
                }
                Value::Array(_) => break 'fast,
                _ => total += 1,
            }
        }
        if total > MAX_ARRAY_LENGTH {
            break 'fast;
        }
        let mut values: Vec<Option<Value>> = Vec::with_capacity(total as usize);
        for index in 0..array.len(agent) {
            values.push(agent[array].elements.get(index));
        }
        for argument in arguments.iter() {
            match argument {
                Value::Array(other) => {
                    for index in 0..other.len(agent) {
                        values.push(agent[*other].elements.get(index));
                    }
                }
                _ => values.push(Some(*argument)),
            }
        }
        return Ok(Array::from_optional_slice(agent, &values).into());
    }
    concat_generic(agent, this_value, arguments)
}

fn concat_generic(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let o = to_object(agent, this_value)?;
    let a = array_species_create(agent, o, 0)?;
    let mut n = 0i64;
    let mut spread = |agent: &mut Agent, n: &mut i64, item: Value| -> JsResult<()> {
        // Arrays are concat-spreadable; everything else appends.
        if let Value::Array(_) = item {
            let item_object = Object::try_from(item).unwrap();
            let item_len = length_of_array_like(agent, item_object)?;
            if *n + item_len > MAX_SAFE_INTEGER {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Array length exceeds the maximum safe integer",
                ));
            }
            for k in 0..item_len {
                if has_index(agent, item_object, k)? {
                    let value = get_index(agent, item_object, k)?;
                    create_data_property_or_throw(agent, a, PropertyKey::Integer(*n), value)?;
                }
                *n += 1;
            }
        } else {
            create_data_property_or_throw(agent, a, PropertyKey::Integer(*n), item)?;
            *n += 1;
        }
        Ok(())
    };
    spread(agent, &mut n, this_value)?;
    for index in 0..arguments.len() {
        let argument = arguments.get(index);
        spread(agent, &mut n, argument)?;
    }
    set_length(agent, a, n)?;
    Ok(a.into_value())
}

/// ### [23.1.3.26 Array.prototype.reverse ( )](https://tc39.es/ecma262/#sec-array.prototype.reverse)
pub fn array_prototype_reverse(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    if let Some(array) = as_trivial_array(agent, this_value) {
        agent[array].elements.reverse_in_place();
        return Ok(this_value);
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let middle = len / 2;
    let mut lower = 0;
    while lower != middle {
        let upper = len - lower - 1;
        let lower_exists = has_index(agent, o, lower)?;
        let lower_value = if lower_exists {
            get_index(agent, o, lower)?
        } else {
            Value::Undefined
        };
        let upper_exists = has_index(agent, o, upper)?;
        let upper_value = if upper_exists {
            get_index(agent, o, upper)?
        } else {
            Value::Undefined
        };
        match (lower_exists, upper_exists) {
            (true, true) => {
                set_index(agent, o, lower, upper_value)?;
                set_index(agent, o, upper, lower_value)?;
            }
            (false, true) => {
                set_index(agent, o, lower, upper_value)?;
                delete_property_or_throw(agent, o, PropertyKey::Integer(upper))?;
            }
            (true, false) => {
                delete_property_or_throw(agent, o, PropertyKey::Integer(lower))?;
                set_index(agent, o, upper, lower_value)?;
            }
            (false, false) => {}
        }
        lower += 1;
    }
    Ok(this_value)
}

/// ### [23.1.3.10 Array.prototype.fill ( value, start, end )](https://tc39.es/ecma262/#sec-array.prototype.fill)
pub fn array_prototype_fill(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let value = arguments.get(0);
    let start = arguments.get(1);
    let end = arguments.get(2);
    if let Some(array) = as_trivial_array(agent, this_value)
        && is_trivial_index(start)
        && is_trivial_index(end)
    {
        let len = array.len(agent) as i64;
        let k = relative_argument(agent, start, len, 0)?;
        let final_index = relative_argument(agent, end, len, len)?.max(k);
        agent[array]
            .elements
            .fill_range(k as u32, final_index as u32, value);
        return Ok(this_value);
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let mut k = to_integer_or_infinity(agent, start)?.relative_index(len);
    let final_index = if end.is_undefined() {
        len
    } else {
        to_integer_or_infinity(agent, end)?.relative_index(len)
    };
    while k < final_index {
        set_index(agent, o, k, value)?;
        k += 1;
    }
    Ok(this_value)
}

/// ### [23.1.3.4 Array.prototype.copyWithin ( target, start, end )](https://tc39.es/ecma262/#sec-array.prototype.copywithin)
pub fn array_prototype_copy_within(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let target = arguments.get(0);
    let start = arguments.get(1);
    let end = arguments.get(2);
    if let Some(array) = as_trivial_array(agent, this_value)
        && is_trivial_index(target)
        && is_trivial_index(start)
        && is_trivial_index(end)
    {
        let len = array.len(agent) as i64;
        let to = relative_argument(agent, target, len, 0)?;
        let from = relative_argument(agent, start, len, 0)?;
        let final_index = relative_argument(agent, end, len, len)?;
        let count = (final_index - from).min(len - to).max(0);
        if count > 0 {
            agent[array].elements.copy_within_range(
                from as u32,
                (from + count) as u32,
                to as u32,
            );
        }
        return Ok(this_value);
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let mut to = to_integer_or_infinity(agent, target)?.relative_index(len);
    let mut from = to_integer_or_infinity(agent, start)?.relative_index(len);
    let final_index = if end.is_undefined() {
        len
    } else {
        to_integer_or_infinity(agent, end)?.relative_index(len)
    };
    let mut count = (final_index - from).min(len - to).max(0);
    // Walk backwards over an overlapping forward copy.
    let (step, adjust) = if from < to && to < from + count {
        (-1, count - 1)
    } else {
        (1, 0)
    };
    from += adjust;
    to += adjust;
    while count > 0 {
        if has_index(agent, o, from)? {
            let value = get_index(agent, o, from)?;
            set_index(agent, o, to, value)?;
        } else {
            delete_property_or_throw(agent, o, PropertyKey::Integer(to))?;
        }
        from += step;
        to += step;
        count -= 1;
    }
    Ok(this_value)
}

/// ### [23.1.3.14 Array.prototype.includes ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.includes)
pub fn array_prototype_includes(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let search = arguments.get(0);
    let from_index = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value)
        && is_trivial_index(from_index)
    {
        let len = array.len(agent) as i64;
        if len == 0 {
            return Ok(Value::Boolean(false));
        }
        let n = match to_integer_or_infinity(agent, from_index)? {
            IntegerOrInfinity::PositiveInfinity => return Ok(Value::Boolean(false)),
            IntegerOrInfinity::NegativeInfinity => 0,
            IntegerOrInfinity::Integer(n) if n < 0 => (len + n).max(0),
            IntegerOrInfinity::Integer(n) => n,
        };
        // Packed scalar storage cannot hold a non-number.
        let kind = agent[array].elements.kind();
        if matches!(kind, ElementsKind::Int | ElementsKind::Number) && !search.is_number() {
            return Ok(Value::Boolean(false));
        }
        if kind == ElementsKind::Int
            && matches!(search, Value::Float(f) if f.is_nan())
        {
            return Ok(Value::Boolean(false));
        }
        for k in n..len {
            match agent[array].elements.get(k as u32) {
                Some(value) => {
                    if same_value_zero(search, value) {
                        return Ok(Value::Boolean(true));
                    }
                }
                // The read through a hole is observable.
                None => return includes_generic(agent, Object::Array(array), search, k, len),
            }
        }
        return Ok(Value::Boolean(false));
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    if len == 0 {
        return Ok(Value::Boolean(false));
    }
    let n = to_integer_or_infinity(agent, from_index)?;
    let k = match n {
        IntegerOrInfinity::PositiveInfinity => return Ok(Value::Boolean(false)),
        IntegerOrInfinity::NegativeInfinity => 0,
        IntegerOrInfinity::Integer(n) if n < 0 => (len + n).max(0),
        IntegerOrInfinity::Integer(n) => n,
    };
    includes_generic(agent, o, search, k, len)
}

fn includes_generic(
    agent: &mut Agent,
    o: Object,
    search: Value,
    mut k: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        let element = get_index(agent, o, k)?;
        if same_value_zero(search, element) {
            return Ok(Value::Boolean(true));
        }
        k += 1;
    }
    Ok(Value::Boolean(false))
}

/// ### [23.1.3.17 Array.prototype.indexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.indexof)
pub fn array_prototype_index_of(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let search = arguments.get(0);
    let from_index = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value)
        && is_trivial_index(from_index)
    {
        let len = array.len(agent) as i64;
        if len == 0 {
            return Ok(Value::Integer(-1));
        }
        let n = match to_integer_or_infinity(agent, from_index)? {
            IntegerOrInfinity::PositiveInfinity => return Ok(Value::Integer(-1)),
            IntegerOrInfinity::NegativeInfinity => 0,
            IntegerOrInfinity::Integer(n) if n < 0 => (len + n).max(0),
            IntegerOrInfinity::Integer(n) => n,
        };
        // Strict equality can never match NaN, and packed scalar
        // storage can never hold a non-number.
        let kind = agent[array].elements.kind();
        if matches!(search, Value::Float(f) if f.is_nan())
            || (matches!(kind, ElementsKind::Int | ElementsKind::Number) && !search.is_number())
        {
            return Ok(Value::Integer(-1));
        }
        for k in n..len {
            match agent[array].elements.get(k as u32) {
                Some(value) => {
                    if is_strictly_equal(search, value) {
                        return Ok(Value::Integer(k));
                    }
                }
                None => return index_of_generic(agent, Object::Array(array), search, k, len),
            }
        }
        return Ok(Value::Integer(-1));
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    if len == 0 {
        return Ok(Value::Integer(-1));
    }
    let k = match to_integer_or_infinity(agent, from_index)? {
        IntegerOrInfinity::PositiveInfinity => return Ok(Value::Integer(-1)),
        IntegerOrInfinity::NegativeInfinity => 0,
        IntegerOrInfinity::Integer(n) if n < 0 => (len + n).max(0),
        IntegerOrInfinity::Integer(n) => n,
    };
    index_of_generic(agent, o, search, k, len)
}

fn index_of_generic(
    agent: &mut Agent,
    o: Object,
    search: Value,
    mut k: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        if has_index(agent, o, k)? {
            let element = get_index(agent, o, k)?;
            if is_strictly_equal(search, element) {
                return Ok(Value::Integer(k));
            }
        }
        k += 1;
    }
    Ok(Value::Integer(-1))
}

/// ### [23.1.3.20 Array.prototype.lastIndexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-array.prototype.lastindexof)
pub fn array_prototype_last_index_of(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let search = arguments.get(0);
    let from_index = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value)
        && (arguments.len() < 2 || is_trivial_index(from_index))
    {
        let len = array.len(agent) as i64;
        if len == 0 {
            return Ok(Value::Integer(-1));
        }
        let mut k = if arguments.len() < 2 {
            len - 1
        } else {
            match to_integer_or_infinity(agent, from_index)? {
                IntegerOrInfinity::PositiveInfinity => len - 1,
                IntegerOrInfinity::NegativeInfinity => return Ok(Value::Integer(-1)),
                IntegerOrInfinity::Integer(n) if n < 0 => len + n,
                IntegerOrInfinity::Integer(n) => n.min(len - 1),
            }
        };
        // Strict equality can never match NaN, and packed scalar
        // storage can never hold a non-number.
        let kind = agent[array].elements.kind();
        if matches!(search, Value::Float(f) if f.is_nan())
            || (matches!(kind, ElementsKind::Int | ElementsKind::Number) && !search.is_number())
        {
            return Ok(Value::Integer(-1));
        }
        while k >= 0 {
            match agent[array].elements.get(k as u32) {
                Some(value) => {
                    if is_strictly_equal(search, value) {
                        return Ok(Value::Integer(k));
                    }
                }
                None => return last_index_of_generic(agent, Object::Array(array), search, k),
            }
            k -= 1;
        }
        return Ok(Value::Integer(-1));
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    if len == 0 {
        return Ok(Value::Integer(-1));
    }
    let k = if arguments.len() < 2 {
        len - 1
    } else {
        match to_integer_or_infinity(agent, from_index)? {
            IntegerOrInfinity::PositiveInfinity => len - 1,
            IntegerOrInfinity::NegativeInfinity => return Ok(Value::Integer(-1)),
            IntegerOrInfinity::Integer(n) if n < 0 => len + n,
            IntegerOrInfinity::Integer(n) => n.min(len - 1),
        }
    };
    last_index_of_generic(agent, o, search, k)
}

fn last_index_of_generic(
    agent: &mut Agent,
    o: Object,
    search: Value,
    mut k: i64,
) -> JsResult<Value> {
    while k >= 0 {
        if has_index(agent, o, k)? {
            let element = get_index(agent, o, k)?;
            if is_strictly_equal(search, element) {
                return Ok(Value::Integer(k));
            }
        }
        k -= 1;
    }
    Ok(Value::Integer(-1))
}

/// ### [23.1.3.12 Array.prototype.forEach ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.foreach)
pub fn array_prototype_for_each(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let callback = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value) {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        let mut k = 0;
        while k < len {
            // The callback may have de-specialized the receiver.
            if !array.is_trivial(agent) {
                return for_each_generic(agent, o, callback, this_arg, k, len);
            }
            match agent[array].elements.get(k as u32) {
                Some(value) => {
                    call_function(
                        agent,
                        callback,
                        this_arg,
                        &[value, Value::Integer(k), o.into_value()],
                    )?;
                }
                None => {
                    // A hole is only skipped if nothing on the
                    // prototype chain provides the index.
                    if has_index(agent, o, k)? {
                        let value = get_index(agent, o, k)?;
                        call_function(
                            agent,
                            callback,
                            this_arg,
                            &[value, Value::Integer(k), o.into_value()],
                        )?;
                    }
                }
            }
            k += 1;
        }
        return Ok(Value::Undefined);
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    for_each_generic(agent, o, callback, this_arg, 0, len)
}

fn for_each_generic(
    agent: &mut Agent,
    o: Object,
    callback: BuiltinFunction,
    this_arg: Value,
    mut k: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        if has_index(agent, o, k)? {
            let value = get_index(agent, o, k)?;
            call_function(
                agent,
                callback,
                this_arg,
                &[value, Value::Integer(k), o.into_value()],
            )?;
        }
        k += 1;
    }
    Ok(Value::Undefined)
}

/// ### [23.1.3.21 Array.prototype.map ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.map)
pub fn array_prototype_map(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let callback = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value)
        && !array.has_custom_constructor(agent)
    {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        let mut mapped: Vec<Option<Value>> = Vec::with_capacity(len as usize);
        let mut k = 0;
        while k < len {
            if !array.is_trivial(agent) {
                let partial = Array::from_optional_slice(agent, &mapped);
                agent[partial].elements.set_len(len as u32);
                return map_generic(
                    agent,
                    o,
                    callback,
                    this_arg,
                    Object::Array(partial),
                    k,
                    len,
                );
            }
            match agent[array].elements.get(k as u32) {
                Some(value) => {
                    let result = call_function(
                        agent,
                        callback,
                        this_arg,
                        &[value, Value::Integer(k), o.into_value()],
                    )?;
                    mapped.push(Some(result));
                }
                None => {
                    if has_index(agent, o, k)? {
                        let value = get_index(agent, o, k)?;
                        let result = call_function(
                            agent,
                            callback,
                            this_arg,
                            &[value, Value::Integer(k), o.into_value()],
                        )?;
                        mapped.push(Some(result));
                    } else {
                        // Holes stay holes in the mapped result.
                        mapped.push(None);
                    }
                }
            }
            k += 1;
        }
        return Ok(Array::from_optional_slice(agent, &mapped).into());
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let a = array_species_create(agent, o, len as u64)?;
    map_generic(agent, o, callback, this_arg, a, 0, len)
}

fn map_generic(
    agent: &mut Agent,
    o: Object,
    callback: BuiltinFunction,
    this_arg: Value,
    a: Object,
    mut k: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        if has_index(agent, o, k)? {
            let value = get_index(agent, o, k)?;
            let mapped = call_function(
                agent,
                callback,
                this_arg,
                &[value, Value::Integer(k), o.into_value()],
            )?;
            create_data_property_or_throw(agent, a, PropertyKey::Integer(k), mapped)?;
        }
        k += 1;
    }
    Ok(a.into_value())
}

/// ### [23.1.3.11 Array.prototype.filter ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.filter)
pub fn array_prototype_filter(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let callback = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value)
        && !array.has_custom_constructor(agent)
    {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        let mut kept: Vec<Value> = Vec::new();
        let mut k = 0;
        while k < len {
            if !array.is_trivial(agent) {
                let partial = Array::from_slice(agent, &kept);
                let to = kept.len() as i64;
                return filter_generic(
                    agent,
                    o,
                    callback,
                    this_arg,
                    Object::Array(partial),
                    k,
                    to,
                    len,
                );
            }
            let value = match agent[array].elements.get(k as u32) {
                Some(value) => Some(value),
                None => {
                    if has_index(agent, o, k)? {
                        Some(get_index(agent, o, k)?)
                    } else {
                        None
                    }
                }
            };
            if let Some(value) = value {
                let selected = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, Value::Integer(k), o.into_value()],
                )?;
                if to_boolean(agent, selected) {
                    kept.push(value);
                }
            }
            k += 1;
        }
        return Ok(Array::from_slice(agent, &kept).into());
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let a = array_species_create(agent, o, 0)?;
    filter_generic(agent, o, callback, this_arg, a, 0, 0, len)
}

#[allow(clippy::too_many_arguments)]
fn filter_generic(
    agent: &mut Agent,
    o: Object,
    callback: BuiltinFunction,
    this_arg: Value,
    a: Object,
    mut k: i64,
    mut to: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        if has_index(agent, o, k)? {
            let value = get_index(agent, o, k)?;
            let selected = call_function(
                agent,
                callback,
                this_arg,
                &[value, Value::Integer(k), o.into_value()],
            )?;
            if to_boolean(agent, selected) {
                create_data_property_or_throw(agent, a, PropertyKey::Integer(to), value)?;
                to += 1;
            }
        }
        k += 1;
    }
    Ok(a.into_value())
}

/// ### [23.1.3.30 Array.prototype.some ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.some)
pub fn array_prototype_some(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let callback = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value) {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        let mut k = 0;
        while k < len {
            if !array.is_trivial(agent) {
                return some_generic(agent, o, callback, this_arg, k, len);
            }
            let value = match agent[array].elements.get(k as u32) {
                Some(value) => Some(value),
                None => {
                    if has_index(agent, o, k)? {
                        Some(get_index(agent, o, k)?)
                    } else {
                        None
                    }
                }
            };
            if let Some(value) = value {
                let result = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, Value::Integer(k), o.into_value()],
                )?;
                if to_boolean(agent, result) {
                    return Ok(Value::Boolean(true));
                }
            }
            k += 1;
        }
        return Ok(Value::Boolean(false));
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    some_generic(agent, o, callback, this_arg, 0, len)
}

fn some_generic(
    agent: &mut Agent,
    o: Object,
    callback: BuiltinFunction,
    this_arg: Value,
    mut k: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        if has_index(agent, o, k)? {
            let value = get_index(agent, o, k)?;
            let result = call_function(
                agent,
                callback,
                this_arg,
                &[value, Value::Integer(k), o.into_value()],
            )?;
            if to_boolean(agent, result) {
                return Ok(Value::Boolean(true));
            }
        }
        k += 1;
    }
    Ok(Value::Boolean(false))
}

/// ### [23.1.3.9 Array.prototype.every ( callback \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.every)
pub fn array_prototype_every(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let callback = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value) {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        let mut k = 0;
        while k < len {
            if !array.is_trivial(agent) {
                return every_generic(agent, o, callback, this_arg, k, len);
            }
            let value = match agent[array].elements.get(k as u32) {
                Some(value) => Some(value),
                None => {
                    if has_index(agent, o, k)? {
                        Some(get_index(agent, o, k)?)
                    } else {
                        None
                    }
                }
            };
            if let Some(value) = value {
                let result = call_function(
                    agent,
                    callback,
                    this_arg,
                    &[value, Value::Integer(k), o.into_value()],
                )?;
                if !to_boolean(agent, result) {
                    return Ok(Value::Boolean(false));
                }
            }
            k += 1;
        }
        return Ok(Value::Boolean(true));
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    every_generic(agent, o, callback, this_arg, 0, len)
}

fn every_generic(
    agent: &mut Agent,
    o: Object,
    callback: BuiltinFunction,
    this_arg: Value,
    mut k: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        if has_index(agent, o, k)? {
            let value = get_index(agent, o, k)?;
            let result = call_function(
                agent,
                callback,
                this_arg,
                &[value, Value::Integer(k), o.into_value()],
            )?;
            if !to_boolean(agent, result) {
                return Ok(Value::Boolean(false));
            }
        }
        k += 1;
    }
    Ok(Value::Boolean(true))
}

/// ### [23.1.3.2.1 FindViaPredicate ( O, len, direction, predicate, thisArg )](https://tc39.es/ecma262/#sec-findviapredicate)
///
/// The find family does not skip holes; a hole reads as the resolved
/// property value (usually `undefined`). Returns `(-1, undefined)`
/// when nothing matches.
fn find_via_predicate(
    agent: &mut Agent,
    o: Object,
    len: i64,
    ascending: bool,
    predicate: BuiltinFunction,
    this_arg: Value,
) -> JsResult<(i64, Value)> {
    let fast_array = match o {
        Object::Array(array) => Some(array),
        _ => None,
    };
    let indices: Box<dyn Iterator<Item = i64>> = if ascending {
        Box::new(0..len)
    } else {
        Box::new((0..len).rev())
    };
    for k in indices {
        let value = match fast_array {
            Some(array) if array.is_trivial(agent) => {
                match agent[array].elements.get(k as u32) {
                    Some(value) => value,
                    None => get_index(agent, o, k)?,
                }
            }
            _ => get_index(agent, o, k)?,
        };
        let result = call_function(
            agent,
            predicate,
            this_arg,
            &[value, Value::Integer(k), o.into_value()],
        )?;
        if to_boolean(agent, result) {
            return Ok((k, value));
        }
    }
    Ok((-1, Value::Undefined))
}

/// ### [23.1.3.8 Array.prototype.find ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.find)
pub fn array_prototype_find(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let predicate = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let (_, value) = find_via_predicate(agent, o, len, true, predicate, this_arg)?;
    Ok(value)
}

/// ### [23.1.3.9 Array.prototype.findIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.findindex)
pub fn array_prototype_find_index(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let predicate = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let (index, _) = find_via_predicate(agent, o, len, true, predicate, this_arg)?;
    Ok(Value::Integer(index))
}

/// ### [23.1.3.11 Array.prototype.findLast ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.findlast)
pub fn array_prototype_find_last(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let predicate = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let (_, value) = find_via_predicate(agent, o, len, false, predicate, this_arg)?;
    Ok(value)
}

/// ### [23.1.3.12 Array.prototype.findLastIndex ( predicate \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.findlastindex)
pub fn array_prototype_find_last_index(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let predicate = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let (index, _) = find_via_predicate(agent, o, len, false, predicate, this_arg)?;
    Ok(Value::Integer(index))
}

/// ### [23.1.3.24 Array.prototype.reduce ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-array.prototype.reduce)
pub fn array_prototype_reduce(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let callback = require_callable(agent, arguments.get(0))?;
    let initial = if arguments.len() > 1 {
        Some(arguments.get(1))
    } else {
        None
    };
    if let Some(array) = as_trivial_array(agent, this_value) {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        return reduce_generic_or_fast(agent, o, Some(array), callback, initial, 0, len);
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    reduce_generic_or_fast(agent, o, None, callback, initial, 0, len)
}

/// Shared reduce loop: storage reads while the receiver stays trivial,
/// the object protocol otherwise. The continuation after
/// de-specialization is the same function with `fast_array` cleared.
fn reduce_generic_or_fast(
    agent: &mut Agent,
    o: Object,
    fast_array: Option<Array>,
    callback: BuiltinFunction,
    mut accumulator: Option<Value>,
    mut k: i64,
    len: i64,
) -> JsResult<Value> {
    while k < len {
        let use_fast = fast_array.is_some_and(|array| array.is_trivial(agent));
        let value = if use_fast {
            let array = fast_array.unwrap();
            match agent[array].elements.get(k as u32) {
                Some(value) => Some(value),
                None => {
                    if has_index(agent, o, k)? {
                        Some(get_index(agent, o, k)?)
                    } else {
                        None
                    }
                }
            }
        } else if has_index(agent, o, k)? {
            Some(get_index(agent, o, k)?)
        } else {
            None
        };
        if let Some(value) = value {
            accumulator = Some(match accumulator {
                Some(accumulator) => call_function(
                    agent,
                    callback,
                    Value::Undefined,
                    &[accumulator, value, Value::Integer(k), o.into_value()],
                )?,
                None => value,
            });
        }
        k += 1;
    }
    accumulator.ok_or_else(|| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Reduce of empty array with no initial value",
        )
    })
}

/// ### [23.1.3.25 Array.prototype.reduceRight ( callback \[ , initialValue \] )](https://tc39.es/ecma262/#sec-array.prototype.reduceright)
pub fn array_prototype_reduce_right(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let callback = require_callable(agent, arguments.get(0))?;
    let mut accumulator = if arguments.len() > 1 {
        Some(arguments.get(1))
    } else {
        None
    };
    let fast_array = as_trivial_array(agent, this_value);
    let (o, len) = match fast_array {
        Some(array) => (Object::Array(array), array.len(agent) as i64),
        None => {
            let o = to_object(agent, this_value)?;
            let len = length_of_array_like(agent, o)?;
            (o, len)
        }
    };
    let mut k = len - 1;
    while k >= 0 {
        let use_fast = fast_array.is_some_and(|array| array.is_trivial(agent));
        let value = if use_fast {
            let array = fast_array.unwrap();
            match agent[array].elements.get(k as u32) {
                Some(value) => Some(value),
                None => {
                    if has_index(agent, o, k)? {
                        Some(get_index(agent, o, k)?)
                    } else {
                        None
                    }
                }
            }
        } else if has_index(agent, o, k)? {
            Some(get_index(agent, o, k)?)
        } else {
            None
        };
        if let Some(value) = value {
            accumulator = Some(match accumulator {
                Some(accumulator) => call_function(
                    agent,
                    callback,
                    Value::Undefined,
                    &[accumulator, value, Value::Integer(k), o.into_value()],
                )?,
                None => value,
            });
        }
        k -= 1;
    }
    accumulator.ok_or_else(|| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Reduce of empty array with no initial value",
        )
    })
}

/// ### [23.1.3.13 Array.prototype.flatMap ( mapperFunction \[ , thisArg \] )](https://tc39.es/ecma262/#sec-array.prototype.flatmap)
///
/// Depth-1 flatten: an Array callback result is spread with its holes
/// skipped, anything else appends as a single element.
pub fn array_prototype_flat_map(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let mapper = require_callable(agent, arguments.get(0))?;
    let this_arg = arguments.get(1);
    if let Some(array) = as_trivial_array(agent, this_value)
        && !array.has_custom_constructor(agent)
    {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        let mut out: Vec<Value> = Vec::new();
        let mut k = 0;
        while k < len {
            let use_fast = array.is_trivial(agent);
            let value = if use_fast {
                match agent[array].elements.get(k as u32) {
                    Some(value) => Some(value),
                    None => {
                        if has_index(agent, o, k)? {
                            Some(get_index(agent, o, k)?)
                        } else {
                            None
                        }
                    }
                }
            } else if has_index(agent, o, k)? {
                Some(get_index(agent, o, k)?)
            } else {
                None
            };
            if let Some(value) = value {
                let mapped = call_function(
                    agent,
                    mapper,
                    this_arg,
                    &[value, Value::Integer(k), o.into_value()],
                )?;
                flatten_into(agent, &mut out, mapped)?;
            }
            k += 1;
        }
        return Ok(Array::from_slice(agent, &out).into());
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    let a = array_species_create(agent, o, 0)?;
    let mut target = 0i64;
    let mut k = 0;
    while k < len {
        if has_index(agent, o, k)? {
            let value = get_index(agent, o, k)?;
            let mapped = call_function(
                agent,
                mapper,
                this_arg,
                &[value, Value::Integer(k), o.into_value()],
            )?;
            if let Value::Array(_) = mapped {
                let mapped_object = Object::try_from(mapped).unwrap();
                let mapped_len = length_of_array_like(agent, mapped_object)?;
                for j in 0..mapped_len {
                    if has_index(agent, mapped_object, j)? {
                        let element = get_index(agent, mapped_object, j)?;
                        create_data_property_or_throw(
                            agent,
                            a,
                            PropertyKey::Integer(target),
                            element,
                        )?;
                        target += 1;
                    }
                }
            } else {
                create_data_property_or_throw(agent, a, PropertyKey::Integer(target), mapped)?;
                target += 1;
            }
        }
        k += 1;
    }
    set_length(agent, a, target)?;
    Ok(a.into_value())
}

fn flatten_into(agent: &mut Agent, out: &mut Vec<Value>, mapped: Value) -> JsResult<()> {
    match mapped {
        Value::Array(inner) if inner.is_trivial(agent) => {
            for j in 0..inner.len(agent) {
                if let Some(element) = agent[inner].elements.get(j) {
                    out.push(element);
                }
            }
        }
        Value::Array(_) => {
            let inner = Object::try_from(mapped).unwrap();
            let inner_len = length_of_array_like(agent, inner)?;
            for j in 0..inner_len {
                if has_index(agent, inner, j)? {
                    out.push(get_index(agent, inner, j)?);
                }
            }
        }
        _ => out.push(mapped),
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum SortOutcome {
    Done,
    Bailed,
}

/// ### [23.1.3.31 Array.prototype.sort ( comparator )](https://tc39.es/ecma262/#sec-array.prototype.sort)
pub fn array_prototype_sort(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let comparator = arguments.get(0);
    let comparator = if comparator.is_undefined() {
        None
    } else {
        match is_callable(comparator) {
            Some(function) => Some(function),
            None => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "The comparison function must be either a function or undefined",
                ));
            }
        }
    };
    // The fast sort requires packed storage; holey arrays go generic
    // (holes compact to the tail there).
    if let Some(array) = as_trivial_array(agent, this_value)
        && agent[array].elements.kind().is_packed()
    {
        if sort_fast(agent, array, comparator)? == SortOutcome::Done {
            return Ok(this_value);
        }
        sort_generic(agent, Object::Array(array), comparator)?;
        return Ok(this_value);
    }
    let o = to_object(agent, this_value)?;
    sort_generic(agent, o, comparator)?;
    Ok(this_value)
}

/// Stable binary-insertion sort over packed element storage. The
/// sorted prefix `[0, i)` is maintained; ties insert after the
/// rightmost equal element. Bails on a mixed-type pair under the
/// default comparator, and on any de-specialization under a user
/// comparator; the prefix stays in place for the generic path.
fn sort_fast(
    agent: &mut Agent,
    array: Array,
    comparator: Option<BuiltinFunction>,
) -> JsResult<SortOutcome> {
    let mut i = 1u32;
    while i < array.len(agent) {
        if !array.is_trivial(agent) || !agent[array].elements.kind().is_packed() {
            return Ok(SortOutcome::Bailed);
        }
        let value = agent[array].elements.get(i).unwrap();
        let mut lo = 0u32;
        let mut hi = i;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let probe = agent[array].elements.get(mid).unwrap();
            let is_less = match comparator {
                Some(function) => {
                    let result =
                        call_function(agent, function, Value::Undefined, &[value, probe])?;
                    let number = to_number(agent, result)?;
                    // The comparator ran user code; everything about
                    // the receiver must be re-established.
                    if !array.is_trivial(agent)
                        || !agent[array].elements.kind().is_packed()
                        || array.len(agent) <= i
                    {
                        return Ok(SortOutcome::Bailed);
                    }
                    number < 0.0
                }
                None => match fast_default_is_less(agent, value, probe) {
                    Some(is_less) => is_less,
                    None => return Ok(SortOutcome::Bailed),
                },
            };
            if is_less {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        if lo < i {
            let elements = &mut agent[array].elements;
            elements.copy_within_range(lo, i, lo + 1);
            elements.set(lo, value);
        }
        i += 1;
    }
    Ok(SortOutcome::Done)
}

/// The default comparator restricted to same-type pairs: numbers order
/// by total order (NaN last), strings lexicographically. `None` means
/// a mixed pair the fast path cannot order.
fn fast_default_is_less(agent: &Agent, x: Value, y: Value) -> Option<bool> {
    if let (Some(a), Some(b)) = (x.as_number(), y.as_number()) {
        return Some(a.total_cmp(&b).is_lt());
    }
    if let (Value::String(a), Value::String(b)) = (x, y) {
        return Some(a.as_str(agent) < b.as_str(agent));
    }
    None
}

/// ### [23.1.3.31.1 SortIndexedProperties](https://tc39.es/ecma262/#sec-sortindexedproperties)
///
/// Collect the present elements, insertion-sort them with the fallible
/// comparator, write the result back and delete the tail.
fn sort_generic(
    agent: &mut Agent,
    o: Object,
    comparator: Option<BuiltinFunction>,
) -> JsResult<()> {
    let len = length_of_array_like(agent, o)?;
    let mut items: Vec<Value> = Vec::with_capacity(len as usize);
    for k in 0..len {
        if has_index(agent, o, k)? {
            items.push(get_index(agent, o, k)?);
        }
    }
    sort_items(agent, &mut items, comparator)?;
    for (k, item) in items.iter().enumerate() {
        set_index(agent, o, k as i64, *item)?;
    }
    for k in items.len() as i64..len {
        delete_property_or_throw(agent, o, PropertyKey::Integer(k))?;
    }
    Ok(())
}

/// Stable binary-insertion sort of a collected item list.
fn sort_items(
    agent: &mut Agent,
    items: &mut [Value],
    comparator: Option<BuiltinFunction>,
) -> JsResult<()> {
    for i in 1..items.len() {
        let value = items[i];
        let mut lo = 0;
        let mut hi = i;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if sort_compare(agent, comparator, value, items[mid])?.is_lt() {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        items[lo..=i].rotate_right(1);
        items[lo] = value;
    }
    Ok(())
}

/// ### [23.1.3.31.2 CompareArrayElements ( x, y, comparator )](https://tc39.es/ecma262/#sec-comparearrayelements)
///
/// Undefined sorts last. With no comparator, number pairs order
/// numerically and every other pair orders by ToString.
fn sort_compare(
    agent: &mut Agent,
    comparator: Option<BuiltinFunction>,
    x: Value,
    y: Value,
) -> JsResult<core::cmp::Ordering> {
    use core::cmp::Ordering;
    match (x.is_undefined(), y.is_undefined()) {
        (true, true) => return Ok(Ordering::Equal),
        (true, false) => return Ok(Ordering::Greater),
        (false, true) => return Ok(Ordering::Less),
        (false, false) => {}
    }
    if let Some(function) = comparator {
        let result = call_function(agent, function, Value::Undefined, &[x, y])?;
        let number = to_number(agent, result)?;
        return Ok(if number.is_nan() {
            Ordering::Equal
        } else if number < 0.0 {
            Ordering::Less
        } else if number > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        });
    }
    if let (Some(a), Some(b)) = (x.as_number(), y.as_number()) {
        return Ok(a.total_cmp(&b));
    }
    let x_string = to_string(agent, x)?;
    let y_string = to_string(agent, y)?;
    Ok(agent
        .heap
        .string(x_string)
        .cmp(agent.heap.string(y_string)))
}

/// ### [23.1.3.33 Array.prototype.toReversed ( )](https://tc39.es/ecma262/#sec-array.prototype.toreversed)
pub fn array_prototype_to_reversed(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    if let Some(array) = as_trivial_array(agent, this_value)
        && !array.has_custom_constructor(agent)
    {
        let o = Object::Array(array);
        let len = array.len(agent) as i64;
        let mut values: Vec<Value> = Vec::with_capacity(len as usize);
        for k in (0..len).rev() {
            // Dense result: holes resolve through the property read.
            let value = if array.is_trivial(agent)
                && let Some(value) = agent[array].elements.get(k as u32)
            {
                value
            } else {
                get_index(agent, o, k)?
            };
            values.push(value);
        }
        return Ok(Array::from_slice(agent, &values).into());
    }
    let o = to_object(agent, this_value)?;
    let len = length_of_array_like(agent, o)?;
    if len as u64 > MAX_ARRAY_LENGTH {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    let mut values: Vec<Value> = Vec::with_capacity(len as usize);
    for k in (0..len).rev() {
        values.push(get_index(agent, o, k)?);
    }
    Ok(Array::from_slice(agent, &values).into())
}

/// ### [23.1.3.39 Array.prototype.with ( index, value )](https://tc39.es/ecma262/#sec-array.prototype.with)
pub fn array_prototype_with(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let index = arguments.get(0);
    let value = arguments.get(1);
    let fast_array = match as_trivial_array(agent, this_value) {
        Some(array) if !array.has_custom_constructor(agent) && is_trivial_index(index) => {
            Some(array)
        }
        _ => None,
    };
    let (o, len) = match fast_array {
        Some(array) => (Object::Array(array), array.len(agent) as i64),
        None => {
            let o = to_object(agent, this_value)?;
            let len = length_of_array_like(agent, o)?;
            (o, len)
        }
    };
    if len as u64 > MAX_ARRAY_LENGTH {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    let relative = to_integer_or_infinity(agent, index)?.into_i64_clamped();
    let actual = if relative >= 0 { relative } else { len + relative };
    if !(0..len).contains(&actual) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid index",
        ));
    }
    let mut values: Vec<Value> = Vec::with_capacity(len as usize);
    for k in 0..len {
        if k == actual {
            values.push(value);
            continue;
        }
        let element = if let Some(array) = fast_array
            && array.is_trivial(agent)
            && let Some(element) = agent[array].elements.get(k as u32)
        {
            element
        } else {
            get_index(agent, o, k)?
        };
        values.push(element);
    }
    Ok(Array::from_slice(agent, &values).into())
}

/// ### [23.1.3.34 Array.prototype.toSorted ( comparator )](https://tc39.es/ecma262/#sec-array.prototype.tosorted)
pub fn array_prototype_to_sorted(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let comparator = arguments.get(0);
    let comparator = if comparator.is_undefined() {
        None
    } else {
        match is_callable(comparator) {
            Some(function) => Some(function),
            None => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "The comparison function must be either a function or undefined",
                ));
            }
        }
    };
    let fast_array = match as_trivial_array(agent, this_value) {
        Some(array) if !array.has_custom_constructor(agent) => Some(array),
        _ => None,
    };
    let (o, len) = match fast_array {
        Some(array) => (Object::Array(array), array.len(agent) as i64),
        None => {
            let o = to_object(agent, this_value)?;
            let len = length_of_array_like(agent, o)?;
            (o, len)
        }
    };
    if len as u64 > MAX_ARRAY_LENGTH {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    // The list is materialized before any comparator runs, so the
    // sort itself needs no re-validation.
    let mut items: Vec<Value> = Vec::with_capacity(len as usize);
    for k in 0..len {
        let value = if let Some(array) = fast_array
            && array.is_trivial(agent)
            && let Some(value) = agent[array].elements.get(k as u32)
        {
            value
        } else {
            get_index(agent, o, k)?
        };
        items.push(value);
    }
    sort_items(agent, &mut items, comparator)?;
    Ok(Array::from_slice(agent, &items).into())
}

/// ### [23.1.3.35 Array.prototype.toSpliced ( start, skipCount, ...items )](https://tc39.es/ecma262/#sec-array.prototype.tospliced)
pub fn array_prototype_to_spliced(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let start = arguments.get(0);
    let skip_count = arguments.get(1);
    let items = if arguments.len() > 2 { &arguments[2..] } else { &[] };
    let fast_array = match as_trivial_array(agent, this_value) {
        Some(array)
            if !array.has_custom_constructor(agent)
                && is_trivial_index(start)
                && is_trivial_index(skip_count) =>
        {
            Some(array)
        }
        _ => None,
    };
    let (o, len) = match fast_array {
        Some(array) => (Object::Array(array), array.len(agent) as i64),
        None => {
            let o = to_object(agent, this_value)?;
            let len = length_of_array_like(agent, o)?;
            (o, len)
        }
    };
    let actual_start = to_integer_or_infinity(agent, start)?.relative_index(len);
    let actual_skip = if arguments.is_empty() {
        0
    } else if arguments.len() == 1 {
        len - actual_start
    } else {
        to_integer_or_infinity(agent, skip_count)?
            .into_i64_clamped()
            .clamp(0, len - actual_start)
    };
    let new_len = len - actual_skip + items.len() as i64;
    if new_len as u64 > MAX_ARRAY_LENGTH {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid array length",
        ));
    }
    let read = |agent: &mut Agent, k: i64| -> JsResult<Value> {
        if let Some(array) = fast_array
            && array.is_trivial(agent)
            && let Some(value) = agent[array].elements.get(k as u32)
        {
            return Ok(value);
        }
        get_index(agent, o, k)
    };
    let mut values: Vec<Value> = Vec::with_capacity(new_len as usize);
    for k in 0..actual_start {
        values.push(read(agent, k)?);
    }
    values.extend_from_slice(items);
    for k in (actual_start + actual_skip)..len {
        values.push(read(agent, k)?);
    }
    Ok(Array::from_slice(agent, &values).into())
}
