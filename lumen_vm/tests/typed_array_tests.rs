// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use lumen_vm::ecmascript::{
    builtins::{
        ArgumentsList, BuiltinFunction, TypedArray, TypedArrayKind,
        indexed_collections::typed_array_objects::typed_array_prototype::*,
    },
    execution::{Agent, ExceptionType, JsResult},
    types::Value,
};

fn empty_args() -> ArgumentsList<'static> {
    ArgumentsList::new(&[])
}

fn elements(agent: &Agent, array: TypedArray) -> Vec<Value> {
    (0..array.len(agent)).map(|i| array.read(agent, i)).collect()
}

#[test]
fn int8_wraps_modulo_and_nan_converts_to_zero() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(
        agent,
        TypedArrayKind::Int8,
        &[300.0, f64::NAN, -129.0, f64::INFINITY],
    );
    assert_eq!(
        elements(agent, array),
        vec![
            Value::Integer(44),
            Value::Integer(0),
            Value::Integer(127),
            Value::Integer(0),
        ]
    );
}

#[test]
fn uint8_clamped_saturates_and_rounds_half_to_even() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(
        agent,
        TypedArrayKind::Uint8Clamped,
        &[1.5, 2.5, 300.0, -5.0, f64::NAN],
    );
    assert_eq!(
        elements(agent, array),
        vec![
            Value::Integer(2),
            Value::Integer(2),
            Value::Integer(255),
            Value::Integer(0),
            Value::Integer(0),
        ]
    );
}

#[test]
fn float32_stores_at_single_precision() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Float32, &[1.1]);
    assert_eq!(array.read(agent, 0), Value::Float(1.1f32 as f64));
}

#[test]
fn fill_converts_and_respects_the_range() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Int32, &[1.0, 2.0, 3.0, 4.0]);
    let this = Value::TypedArray(array);
    typed_array_prototype_fill(
        agent,
        this,
        ArgumentsList::new(&[Value::Float(7.9), Value::Integer(1), Value::Integer(3)]),
    )
    .unwrap();
    assert_eq!(
        elements(agent, array),
        vec![
            Value::Integer(1),
            Value::Integer(7),
            Value::Integer(7),
            Value::Integer(4),
        ]
    );
}

#[test]
fn copy_within_moves_overlapping_ranges() {
    let agent = &mut Agent::default();
    let array =
        TypedArray::from_f64_slice(agent, TypedArrayKind::Int32, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    typed_array_prototype_copy_within(
        agent,
        Value::TypedArray(array),
        ArgumentsList::new(&[Value::Integer(0), Value::Integer(3)]),
    )
    .unwrap();
    assert_eq!(
        elements(agent, array),
        vec![
            Value::Integer(4),
            Value::Integer(5),
            Value::Integer(3),
            Value::Integer(4),
            Value::Integer(5),
        ]
    );
}

#[test]
fn includes_finds_nan_but_index_of_does_not() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Float64, &[1.0, f64::NAN]);
    let this = Value::TypedArray(array);
    assert_eq!(
        typed_array_prototype_includes(agent, this, ArgumentsList::new(&[Value::nan()])).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        typed_array_prototype_index_of(agent, this, ArgumentsList::new(&[Value::nan()])).unwrap(),
        Value::Integer(-1)
    );
    assert_eq!(
        typed_array_prototype_last_index_of(agent, this, ArgumentsList::new(&[Value::Integer(1)]))
            .unwrap(),
        Value::Integer(0)
    );
    // Nothing in a typed array equals a non-number.
    assert_eq!(
        typed_array_prototype_includes(agent, this, ArgumentsList::new(&[Value::Undefined]))
            .unwrap(),
        Value::Boolean(false)
    );
}

#[test]
fn reverse_mutates_and_to_reversed_copies() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Int16, &[1.0, 2.0, 3.0]);
    let this = Value::TypedArray(array);
    let Value::TypedArray(reversed) =
        typed_array_prototype_to_reversed(agent, this, empty_args()).unwrap()
    else {
        panic!("toReversed did not return a typed array");
    };
    assert_eq!(
        elements(agent, reversed),
        vec![Value::Integer(3), Value::Integer(2), Value::Integer(1)]
    );
    assert_eq!(array.read(agent, 0), Value::Integer(1));
    typed_array_prototype_reverse(agent, this, empty_args()).unwrap();
    assert_eq!(
        elements(agent, array),
        vec![Value::Integer(3), Value::Integer(2), Value::Integer(1)]
    );
}

#[test]
fn slice_copies_the_requested_range() {
    let agent = &mut Agent::default();
    let array =
        TypedArray::from_f64_slice(agent, TypedArrayKind::Uint32, &[1.0, 2.0, 3.0, 4.0]);
    let Value::TypedArray(sliced) = typed_array_prototype_slice(
        agent,
        Value::TypedArray(array),
        ArgumentsList::new(&[Value::Integer(1), Value::Integer(-1)]),
    )
    .unwrap() else {
        panic!("slice did not return a typed array");
    };
    assert_eq!(
        elements(agent, sliced),
        vec![Value::Integer(2), Value::Integer(3)]
    );
    assert_eq!(sliced.kind(agent), TypedArrayKind::Uint32);
}

#[test]
fn with_replaces_one_index_and_validates_range() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Int8, &[1.0, 2.0, 3.0]);
    let this = Value::TypedArray(array);
    let Value::TypedArray(result) = typed_array_prototype_with(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(-1), Value::Integer(300)]),
    )
    .unwrap() else {
        panic!("with did not return a typed array");
    };
    // The replacement converts like any other element write.
    assert_eq!(result.read(agent, 2), Value::Integer(44));
    assert_eq!(array.read(agent, 2), Value::Integer(3));
    let error = typed_array_prototype_with(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(3), Value::Integer(0)]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::RangeError);
}

#[test]
fn default_sort_orders_numerically_with_nan_last() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(
        agent,
        TypedArrayKind::Float64,
        &[3.0, f64::NAN, -1.0, 2.0],
    );
    typed_array_prototype_sort(agent, Value::TypedArray(array), empty_args()).unwrap();
    assert_eq!(array.read(agent, 0), Value::Integer(-1));
    assert_eq!(array.read(agent, 1), Value::Integer(2));
    assert_eq!(array.read(agent, 2), Value::Integer(3));
    let Some(last) = array.read(agent, 3).as_number() else {
        panic!("expected a number");
    };
    assert!(last.is_nan());
}

fn descending_comparator(
    _agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let (Some(x), Some(y)) = (arguments.get(0).as_number(), arguments.get(1).as_number())
    else {
        return Ok(Value::Undefined);
    };
    Ok(Value::Float(y - x))
}

#[test]
fn to_sorted_with_a_comparator_leaves_the_receiver_alone() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Int32, &[1.0, 3.0, 2.0]);
    let comparator = BuiltinFunction::create(agent, descending_comparator, 2, "descending");
    let Value::TypedArray(sorted) = typed_array_prototype_to_sorted(
        agent,
        Value::TypedArray(array),
        ArgumentsList::new(&[comparator.into()]),
    )
    .unwrap() else {
        panic!("toSorted did not return a typed array");
    };
    assert_eq!(
        elements(agent, sorted),
        vec![Value::Integer(3), Value::Integer(2), Value::Integer(1)]
    );
    assert_eq!(
        elements(agent, array),
        vec![Value::Integer(1), Value::Integer(3), Value::Integer(2)]
    );
}

#[test]
fn operations_on_a_detached_array_throw() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Int32, &[1.0, 2.0]);
    let buffer = array.buffer(agent);
    buffer.detach(agent);
    let error = typed_array_prototype_fill(
        agent,
        Value::TypedArray(array),
        ArgumentsList::new(&[Value::Integer(0)]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    let error = typed_array_prototype_sort(agent, Value::TypedArray(array), empty_args())
        .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
}

fn detaching_comparator(
    agent: &mut Agent,
    _this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    // The only typed array in these tests is the receiver under sort.
    let buffer = agent.heap.typed_arrays[0].buffer;
    buffer.detach(agent);
    Ok(Value::Integer(-1))
}

#[test]
fn comparator_detaching_the_buffer_mid_sort_throws() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Int32, &[3.0, 1.0, 2.0]);
    let comparator = BuiltinFunction::create(agent, detaching_comparator, 2, "detaching");
    let error = typed_array_prototype_sort(
        agent,
        Value::TypedArray(array),
        ArgumentsList::new(&[comparator.into()]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
}

#[test]
fn sort_rejects_a_non_callable_comparator() {
    let agent = &mut Agent::default();
    let array = TypedArray::from_f64_slice(agent, TypedArrayKind::Int32, &[1.0]);
    let error = typed_array_prototype_sort(
        agent,
        Value::TypedArray(array),
        ArgumentsList::new(&[Value::Integer(1)]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
}
