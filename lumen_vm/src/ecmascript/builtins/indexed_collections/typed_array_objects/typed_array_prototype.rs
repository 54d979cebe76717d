// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [23.2.3 Properties of the %TypedArray% Prototype Object](https://tc39.es/ecma262/#sec-properties-of-the-%typedarray%-prototype-object)
//!
//! The TypedArray variant of the fast-path methods. The shape hazards
//! of plain arrays do not exist here: fixed length, no holes, no
//! shared storage. The guard that replaces them is buffer detachment,
//! re-checked after every argument coercion or comparator call that
//! can run user code.

use crate::ecmascript::{
    abstract_operations::{
        testing_and_comparison::{is_callable, is_strictly_equal, same_value_zero},
        type_conversion::{IntegerOrInfinity, to_integer_or_infinity, to_number},
    },
    builtins::{
        builtin_function::{ArgumentsList, BuiltinFunction},
        typed_array::TypedArray,
    },
    execution::{Agent, ExceptionType, JsResult},
    types::Value,
};

use crate::ecmascript::abstract_operations::operations_on_objects::call_function;

/// ### [23.2.4.4 ValidateTypedArray ( O, order )](https://tc39.es/ecma262/#sec-validatetypedarray)
fn validate_typed_array(agent: &mut Agent, this_value: Value) -> JsResult<TypedArray> {
    let Value::TypedArray(typed_array) = this_value else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Receiver is not a TypedArray",
        ));
    };
    if typed_array.is_detached(agent) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "TypedArray buffer is detached",
        ));
    }
    Ok(typed_array)
}

fn detached_error(agent: &mut Agent) -> crate::ecmascript::execution::JsError {
    agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "TypedArray buffer is detached",
    )
}

fn relative_argument(agent: &mut Agent, argument: Value, len: i64, default: i64) -> JsResult<i64> {
    if argument.is_undefined() {
        return Ok(default);
    }
    Ok(to_integer_or_infinity(agent, argument)?.relative_index(len))
}

/// ### [23.2.3.9 %TypedArray%.prototype.fill ( value, start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.fill)
pub fn typed_array_prototype_fill(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let len = typed_array.len(agent) as i64;
    // ToNumber and the index coercions may run user code; detachment
    // is re-checked before any write.
    let number = to_number(agent, arguments.get(0))?;
    let k = relative_argument(agent, arguments.get(1), len, 0)?;
    let final_index = relative_argument(agent, arguments.get(2), len, len)?;
    if typed_array.is_detached(agent) {
        return Err(detached_error(agent));
    }
    for index in k..final_index {
        typed_array.write(agent, index as u32, number);
    }
    Ok(this_value)
}

/// ### [23.2.3.5 %TypedArray%.prototype.copyWithin ( target, start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.copywithin)
pub fn typed_array_prototype_copy_within(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let len = typed_array.len(agent) as i64;
    let to = relative_argument(agent, arguments.get(0), len, 0)?;
    let from = relative_argument(agent, arguments.get(1), len, 0)?;
    let final_index = relative_argument(agent, arguments.get(2), len, len)?;
    if typed_array.is_detached(agent) {
        return Err(detached_error(agent));
    }
    let count = (final_index - from).min(len - to).max(0);
    if count > 0 {
        let data = &agent[typed_array];
        let width = data.kind.byte_width();
        let base = data.byte_offset;
        let src = base + from as usize * width;
        let dest = base + to as usize * width;
        let byte_count = count as usize * width;
        let buffer_handle = data.buffer;
        let buffer = agent[buffer_handle].data.as_mut().unwrap();
        buffer.copy_within(src..src + byte_count, dest);
    }
    Ok(this_value)
}

/// ### [23.2.3.16 %TypedArray%.prototype.includes ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.includes)
pub fn typed_array_prototype_includes(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let search = arguments.get(0);
    let len = typed_array.len(agent) as i64;
    if len == 0 {
        return Ok(Value::Boolean(false));
    }
    let k = match to_integer_or_infinity(agent, arguments.get(1))? {
        IntegerOrInfinity::PositiveInfinity => return Ok(Value::Boolean(false)),
        IntegerOrInfinity::NegativeInfinity => 0,
        IntegerOrInfinity::Integer(n) if n < 0 => (len + n).max(0),
        IntegerOrInfinity::Integer(n) => n,
    };
    if typed_array.is_detached(agent) {
        return Err(detached_error(agent));
    }
    // Only numbers are ever stored.
    if !search.is_number() {
        return Ok(Value::Boolean(false));
    }
    for index in k..len {
        let element = typed_array.read(agent, index as u32);
        if same_value_zero(search, element) {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

/// ### [23.2.3.18 %TypedArray%.prototype.indexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.indexof)
pub fn typed_array_prototype_index_of(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let search = arguments.get(0);
    let len = typed_array.len(agent) as i64;
    if len == 0 {
        return Ok(Value::Integer(-1));
    }
    let k = match to_integer_or_infinity(agent, arguments.get(1))? {
        IntegerOrInfinity::PositiveInfinity => return Ok(Value::Integer(-1)),
        IntegerOrInfinity::NegativeInfinity => 0,
        IntegerOrInfinity::Integer(n) if n < 0 => (len + n).max(0),
        IntegerOrInfinity::Integer(n) => n,
    };
    if typed_array.is_detached(agent) {
        return Err(detached_error(agent));
    }
    if !search.is_number() || matches!(search, Value::Float(f) if f.is_nan()) {
        return Ok(Value::Integer(-1));
    }
    for index in k..len {
        let element = typed_array.read(agent, index as u32);
        if is_strictly_equal(search, element) {
            return Ok(Value::Integer(index));
        }
    }
    Ok(Value::Integer(-1))
}

/// ### [23.2.3.20 %TypedArray%.prototype.lastIndexOf ( searchElement \[ , fromIndex \] )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.lastindexof)
pub fn typed_array_prototype_last_index_of(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let search = arguments.get(0);
    let len = typed_array.len(agent) as i64;
    if len == 0 {
        return Ok(Value::Integer(-1));
    }
    let k = if arguments.len() < 2 {
        len - 1
    } else {
        match to_integer_or_infinity(agent, arguments.get(1))? {
            IntegerOrInfinity::PositiveInfinity => len - 1,
            IntegerOrInfinity::NegativeInfinity => return Ok(Value::Integer(-1)),
            IntegerOrInfinity::Integer(n) if n < 0 => len + n,
            IntegerOrInfinity::Integer(n) => n.min(len - 1),
        }
    };
    if typed_array.is_detached(agent) {
        return Err(detached_error(agent));
    }
    if !search.is_number() || matches!(search, Value::Float(f) if f.is_nan()) {
        return Ok(Value::Integer(-1));
    }
    let mut index = k;
    while index >= 0 {
        let element = typed_array.read(agent, index as u32);
        if is_strictly_equal(search, element) {
            return Ok(Value::Integer(index));
        }
        index -= 1;
    }
    Ok(Value::Integer(-1))
}

/// ### [23.2.3.26 %TypedArray%.prototype.reverse ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.reverse)
pub fn typed_array_prototype_reverse(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let len = typed_array.len(agent);
    let mut lower = 0;
    while lower < len / 2 {
        let upper = len - lower - 1;
        let lower_value = typed_array.read(agent, lower).as_number().unwrap();
        let upper_value = typed_array.read(agent, upper).as_number().unwrap();
        typed_array.write(agent, lower, upper_value);
        typed_array.write(agent, upper, lower_value);
        lower += 1;
    }
    Ok(this_value)
}

/// ### [23.2.3.32 %TypedArray%.prototype.toReversed ( )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.toreversed)
pub fn typed_array_prototype_to_reversed(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let len = typed_array.len(agent);
    let kind = typed_array.kind(agent);
    let result = TypedArray::create(agent, kind, len);
    for index in 0..len {
        let value = typed_array.read(agent, len - index - 1).as_number().unwrap();
        result.write(agent, index, value);
    }
    Ok(result.into())
}

/// ### [23.2.3.27 %TypedArray%.prototype.slice ( start, end )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.slice)
pub fn typed_array_prototype_slice(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let len = typed_array.len(agent) as i64;
    let k = relative_argument(agent, arguments.get(0), len, 0)?;
    let final_index = relative_argument(agent, arguments.get(1), len, len)?;
    if typed_array.is_detached(agent) {
        return Err(detached_error(agent));
    }
    let count = (final_index - k).max(0) as u32;
    let kind = typed_array.kind(agent);
    let result = TypedArray::create(agent, kind, count);
    for index in 0..count {
        let value = typed_array.read(agent, k as u32 + index).as_number().unwrap();
        result.write(agent, index, value);
    }
    Ok(result.into())
}

/// ### [23.2.3.36 %TypedArray%.prototype.with ( index, value )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.with)
pub fn typed_array_prototype_with(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let typed_array = validate_typed_array(agent, this_value)?;
    let len = typed_array.len(agent) as i64;
    let relative = to_integer_or_infinity(agent, arguments.get(0))?.into_i64_clamped();
    let actual = if relative >= 0 { relative } else { len + relative };
    let number = to_number(agent, arguments.get(1))?;
    if !(0..len).contains(&actual) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Invalid index",
        ));
    }
    if typed_array.is_detached(agent) {
        return Err(detached_error(agent));
    }
    let kind = typed_array.kind(agent);
    let result = TypedArray::create(agent, kind, len as u32);
    for index in 0..len as u32 {
        let value = if index as i64 == actual {
            number
        } else {
            typed_array.read(agent, index).as_number().unwrap()
        };
        result.write(agent, index, value);
    }
    Ok(result.into())
}

/// ### [23.2.3.29 %TypedArray%.prototype.sort ( comparator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.sort)
pub fn typed_array_prototype_sort(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let comparator = sort_comparator(agent, arguments.get(0))?;
    let typed_array = validate_typed_array(agent, this_value)?;
    let mut items = collect_elements(agent, typed_array);
    sort_number_items(agent, typed_array, &mut items, comparator)?;
    for (index, value) in items.iter().enumerate() {
        typed_array.write(agent, index as u32, *value);
    }
    Ok(this_value)
}

/// ### [23.2.3.33 %TypedArray%.prototype.toSorted ( comparator )](https://tc39.es/ecma262/#sec-%typedarray%.prototype.tosorted)
pub fn typed_array_prototype_to_sorted(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let comparator = sort_comparator(agent, arguments.get(0))?;
    let typed_array = validate_typed_array(agent, this_value)?;
    let mut items = collect_elements(agent, typed_array);
    sort_number_items(agent, typed_array, &mut items, comparator)?;
    let kind = typed_array.kind(agent);
    let result = TypedArray::create(agent, kind, items.len() as u32);
    for (index, value) in items.iter().enumerate() {
        result.write(agent, index as u32, *value);
    }
    Ok(result.into())
}

fn sort_comparator(agent: &mut Agent, argument: Value) -> JsResult<Option<BuiltinFunction>> {
    if argument.is_undefined() {
        return Ok(None);
    }
    match is_callable(argument) {
        Some(function) => Ok(Some(function)),
        None => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "The comparison function must be either a function or undefined",
        )),
    }
}

fn collect_elements(agent: &Agent, typed_array: TypedArray) -> Vec<f64> {
    (0..typed_array.len(agent))
        .map(|index| typed_array.read(agent, index).as_number().unwrap())
        .collect()
}

/// Stable binary-insertion sort over a collected element list. A user
/// comparator can detach the buffer; that is checked after every call.
fn sort_number_items(
    agent: &mut Agent,
    typed_array: TypedArray,
    items: &mut [f64],
    comparator: Option<BuiltinFunction>,
) -> JsResult<()> {
    for i in 1..items.len() {
        let value = items[i];
        let mut lo = 0;
        let mut hi = i;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let is_less = match comparator {
                Some(function) => {
                    let result = call_function(
                        agent,
                        function,
                        Value::Undefined,
                        &[Value::from_f64(value), Value::from_f64(items[mid])],
                    )?;
                    let number = to_number(agent, result)?;
                    if typed_array.is_detached(agent) {
                        return Err(detached_error(agent));
                    }
                    !number.is_nan() && number < 0.0
                }
                None => default_number_compare(value, items[mid]).is_lt(),
            };
            if is_less {
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

/// ### [23.2.4.8 CompareTypedArrayElements ( x, y, comparator )](https://tc39.es/ecma262/#sec-comparetypedarrayelements)
///
/// NaN sorts last regardless of sign; `-0` before `+0`.
fn default_number_compare(x: f64, y: f64) -> core::cmp::Ordering {
    let x = if x.is_nan() { f64::NAN } else { x };
    let y = if y.is_nan() { f64::NAN } else { y };
    x.total_cmp(&y)
}
