// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use lumen_vm::{
    ecmascript::{
        abstract_operations::operations_on_objects::{get, set},
        builtins::{
            ArgumentsList, Array, BuiltinFunction,
            indexed_collections::array_objects::array_prototype::*,
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{HeapString, Object, OrdinaryObject, PropertyDescriptor, PropertyKey, Value},
    },
    heap::element_array::ElementsKind,
};

fn empty_args() -> ArgumentsList<'static> {
    ArgumentsList::new(&[])
}

fn int_array(agent: &mut Agent, values: &[i64]) -> Array {
    let values: Vec<Value> = values.iter().map(|v| Value::Integer(*v)).collect();
    Array::from_slice(agent, &values)
}

fn element(agent: &Agent, array: Array, index: u32) -> Option<Value> {
    agent[array].elements.get(index)
}

#[test]
fn push_pop_roundtrip() {
    let agent = &mut Agent::default();
    let array = Array::from_slice(agent, &[]);
    let this = Value::Array(array);
    let result = array_prototype_push(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(1), Value::Integer(2), Value::Integer(3)]),
    )
    .unwrap();
    assert_eq!(result, Value::Integer(3));
    assert_eq!(array.len(agent), 3);
    assert_eq!(
        array_prototype_pop(agent, this, empty_args()).unwrap(),
        Value::Integer(3)
    );
    assert_eq!(
        array_prototype_pop(agent, this, empty_args()).unwrap(),
        Value::Integer(2)
    );
    assert_eq!(
        array_prototype_pop(agent, this, empty_args()).unwrap(),
        Value::Integer(1)
    );
    assert_eq!(
        array_prototype_pop(agent, this, empty_args()).unwrap(),
        Value::Undefined
    );
    assert_eq!(array.len(agent), 0);
}

#[test]
fn push_widens_element_kind() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2]);
    let this = Value::Array(array);
    assert_eq!(agent[array].elements.kind(), ElementsKind::Int);
    array_prototype_push(agent, this, ArgumentsList::new(&[Value::Float(1.5)])).unwrap();
    assert_eq!(agent[array].elements.kind(), ElementsKind::Number);
    assert_eq!(element(agent, array, 0), Some(Value::Integer(1)));
    let string = HeapString::from_str(agent, "tail").into();
    array_prototype_push(agent, this, ArgumentsList::new(&[string])).unwrap();
    assert_eq!(agent[array].elements.kind(), ElementsKind::Tagged);
    assert_eq!(element(agent, array, 1), Some(Value::Integer(2)));
}

#[test]
fn shift_unshift_roundtrip() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[3, 4]);
    let this = Value::Array(array);
    let result = array_prototype_unshift(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(1), Value::Integer(2)]),
    )
    .unwrap();
    assert_eq!(result, Value::Integer(4));
    for (index, expected) in [1, 2, 3, 4].into_iter().enumerate() {
        assert_eq!(element(agent, array, index as u32), Some(Value::Integer(expected)));
    }
    assert_eq!(
        array_prototype_shift(agent, this, empty_args()).unwrap(),
        Value::Integer(1)
    );
    assert_eq!(array.len(agent), 3);
    assert_eq!(element(agent, array, 0), Some(Value::Integer(2)));
}

#[test]
fn reverse_is_an_involution_with_holes() {
    let agent = &mut Agent::default();
    let array = Array::from_optional_slice(
        agent,
        &[Some(Value::Integer(1)), None, Some(Value::Integer(3))],
    );
    let this = Value::Array(array);
    array_prototype_reverse(agent, this, empty_args()).unwrap();
    assert_eq!(element(agent, array, 0), Some(Value::Integer(3)));
    assert_eq!(element(agent, array, 1), None);
    assert_eq!(element(agent, array, 2), Some(Value::Integer(1)));
    array_prototype_reverse(agent, this, empty_args()).unwrap();
    assert_eq!(element(agent, array, 0), Some(Value::Integer(1)));
    assert_eq!(element(agent, array, 1), None);
    assert_eq!(element(agent, array, 2), Some(Value::Integer(3)));
}

#[test]
fn slice_preserves_holes() {
    let agent = &mut Agent::default();
    let array = Array::from_optional_slice(
        agent,
        &[
            Some(Value::Integer(0)),
            None,
            Some(Value::Integer(2)),
            Some(Value::Integer(3)),
        ],
    );
    let this = Value::Array(array);
    let result = array_prototype_slice(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(0), Value::Integer(3)]),
    )
    .unwrap();
    let Value::Array(sliced) = result else {
        panic!("slice did not return an array");
    };
    assert_eq!(sliced.len(agent), 3);
    assert_eq!(element(agent, sliced, 0), Some(Value::Integer(0)));
    assert_eq!(element(agent, sliced, 1), None);
    assert_eq!(element(agent, sliced, 2), Some(Value::Integer(2)));
}

#[test]
fn splice_removes_and_inserts() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3, 4, 5]);
    let this = Value::Array(array);
    let inserted = HeapString::from_str(agent, "a").into();
    let result = array_prototype_splice(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(1), Value::Integer(2), inserted]),
    )
    .unwrap();
    let Value::Array(removed) = result else {
        panic!("splice did not return an array");
    };
    assert_eq!(removed.len(agent), 2);
    assert_eq!(element(agent, removed, 0), Some(Value::Integer(2)));
    assert_eq!(element(agent, removed, 1), Some(Value::Integer(3)));
    assert_eq!(array.len(agent), 4);
    assert_eq!(element(agent, array, 0), Some(Value::Integer(1)));
    assert_eq!(element(agent, array, 1), Some(inserted));
    assert_eq!(element(agent, array, 2), Some(Value::Integer(4)));
    assert_eq!(element(agent, array, 3), Some(Value::Integer(5)));
}

#[test]
fn concat_spreads_arrays_and_preserves_holes() {
    let agent = &mut Agent::default();
    let left = Array::from_optional_slice(agent, &[Some(Value::Integer(1)), None]);
    let right = int_array(agent, &[3]);
    let result = array_prototype_concat(
        agent,
        Value::Array(left),
        ArgumentsList::new(&[Value::Array(right), Value::Integer(4)]),
    )
    .unwrap();
    let Value::Array(combined) = result else {
        panic!("concat did not return an array");
    };
    assert_eq!(combined.len(agent), 4);
    assert_eq!(element(agent, combined, 0), Some(Value::Integer(1)));
    assert_eq!(element(agent, combined, 1), None);
    assert_eq!(element(agent, combined, 2), Some(Value::Integer(3)));
    assert_eq!(element(agent, combined, 3), Some(Value::Integer(4)));
}

#[test]
fn fill_and_copy_within() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3, 4, 5]);
    let this = Value::Array(array);
    array_prototype_fill(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(0), Value::Integer(1), Value::Integer(3)]),
    )
    .unwrap();
    for (index, expected) in [1, 0, 0, 4, 5].into_iter().enumerate() {
        assert_eq!(element(agent, array, index as u32), Some(Value::Integer(expected)));
    }
    array_prototype_copy_within(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(0), Value::Integer(3)]),
    )
    .unwrap();
    for (index, expected) in [4, 5, 0, 4, 5].into_iter().enumerate() {
        assert_eq!(element(agent, array, index as u32), Some(Value::Integer(expected)));
    }
}

#[test]
fn includes_uses_same_value_zero_and_index_of_strict_equality() {
    let agent = &mut Agent::default();
    let array = Array::from_slice(agent, &[Value::nan(), Value::Integer(0)]);
    let this = Value::Array(array);
    assert_eq!(
        array_prototype_includes(agent, this, ArgumentsList::new(&[Value::nan()])).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        array_prototype_index_of(agent, this, ArgumentsList::new(&[Value::nan()])).unwrap(),
        Value::Integer(-1)
    );
    // -0 matches +0 under both equalities.
    assert_eq!(
        array_prototype_includes(agent, this, ArgumentsList::new(&[Value::Float(-0.0)])).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        array_prototype_index_of(agent, this, ArgumentsList::new(&[Value::Float(-0.0)])).unwrap(),
        Value::Integer(1)
    );
}

#[test]
fn includes_resolves_holes_and_index_of_skips_them() {
    let agent = &mut Agent::default();
    let array = Array::from_optional_slice(
        agent,
        &[Some(Value::Integer(7)), None, Some(Value::Integer(9))],
    );
    let this = Value::Array(array);
    // A hole reads as undefined through the property protocol.
    assert_eq!(
        array_prototype_includes(agent, this, ArgumentsList::new(&[Value::Undefined])).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        array_prototype_index_of(agent, this, ArgumentsList::new(&[Value::Undefined])).unwrap(),
        Value::Integer(-1)
    );
    assert_eq!(
        array_prototype_index_of(agent, this, ArgumentsList::new(&[Value::Integer(9)])).unwrap(),
        Value::Integer(2)
    );
    assert_eq!(
        array_prototype_last_index_of(agent, this, ArgumentsList::new(&[Value::Integer(7)]))
            .unwrap(),
        Value::Integer(0)
    );
}

fn record_argument(
    agent: &mut Agent,
    this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let value = arguments.get(0);
    array_prototype_push(agent, this_value, ArgumentsList::new(&[value]))?;
    Ok(Value::Undefined)
}

#[test]
fn for_each_skips_holes_but_visits_prototype_properties() {
    let agent = &mut Agent::default();
    let array = Array::from_optional_slice(
        agent,
        &[Some(Value::Integer(10)), None, Some(Value::Integer(30))],
    );
    let recorder = Array::from_slice(agent, &[]);
    let callback = BuiltinFunction::create(agent, record_argument, 1, "record");
    // The hole is skipped while nothing provides index 1.
    array_prototype_for_each(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[callback.into(), Value::Array(recorder)]),
    )
    .unwrap();
    assert_eq!(recorder.len(agent), 2);
    assert_eq!(element(agent, recorder, 0), Some(Value::Integer(10)));
    assert_eq!(element(agent, recorder, 1), Some(Value::Integer(30)));
    // An index property on the prototype chain fills the hole in.
    let prototype = agent.current_realm_record().intrinsics().array_prototype();
    Object::Object(prototype)
        .internal_set(
            agent,
            PropertyKey::Integer(1),
            Value::Integer(99),
            Value::Object(prototype),
        )
        .unwrap();
    let recorder = Array::from_slice(agent, &[]);
    array_prototype_for_each(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[callback.into(), Value::Array(recorder)]),
    )
    .unwrap();
    assert_eq!(recorder.len(agent), 3);
    assert_eq!(element(agent, recorder, 1), Some(Value::Integer(99)));
}

fn double_argument(
    _agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    match arguments.get(0) {
        Value::Integer(i) => Ok(Value::Integer(i * 2)),
        other => Ok(other),
    }
}

#[test]
fn map_preserves_holes() {
    let agent = &mut Agent::default();
    let array = Array::from_optional_slice(
        agent,
        &[Some(Value::Integer(1)), None, Some(Value::Integer(3))],
    );
    let callback = BuiltinFunction::create(agent, double_argument, 1, "double");
    let result = array_prototype_map(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[callback.into()]),
    )
    .unwrap();
    let Value::Array(mapped) = result else {
        panic!("map did not return an array");
    };
    assert_eq!(mapped.len(agent), 3);
    assert_eq!(element(agent, mapped, 0), Some(Value::Integer(2)));
    assert_eq!(element(agent, mapped, 1), None);
    assert_eq!(element(agent, mapped, 2), Some(Value::Integer(6)));
}

fn keep_and_pop(
    agent: &mut Agent,
    this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    array_prototype_pop(agent, this_value, ArgumentsList::new(&[]))?;
    Ok(Value::Boolean(true))
}

#[test]
fn filter_with_shrinking_callback_revalidates() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3, 4]);
    // The callback pops the receiver on every call; indexes past the
    // shrunk length read as absent.
    let callback = BuiltinFunction::create(agent, keep_and_pop, 1, "keepAndPop");
    let result = array_prototype_filter(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[callback.into(), Value::Array(array)]),
    )
    .unwrap();
    let Value::Array(kept) = result else {
        panic!("filter did not return an array");
    };
    assert_eq!(kept.len(agent), 2);
    assert_eq!(element(agent, kept, 0), Some(Value::Integer(1)));
    assert_eq!(element(agent, kept, 1), Some(Value::Integer(2)));
    assert_eq!(array.len(agent), 2);
}

fn sum_accumulator(
    _agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let (Value::Integer(a), Value::Integer(b)) = (arguments.get(0), arguments.get(1)) else {
        return Ok(Value::Undefined);
    };
    Ok(Value::Integer(a + b))
}

#[test]
fn reduce_sums_and_rejects_empty_without_initial() {
    let agent = &mut Agent::default();
    let array = Array::from_optional_slice(
        agent,
        &[Some(Value::Integer(1)), None, Some(Value::Integer(2))],
    );
    let callback = BuiltinFunction::create(agent, sum_accumulator, 2, "sum");
    let total = array_prototype_reduce(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[callback.into(), Value::Integer(10)]),
    )
    .unwrap();
    assert_eq!(total, Value::Integer(13));
    let empty = Array::from_slice(agent, &[]);
    let error = array_prototype_reduce(
        agent,
        Value::Array(empty),
        ArgumentsList::new(&[callback.into()]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
}

#[test]
fn flat_map_spreads_array_results_one_level() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2]);
    fn pair(agent: &mut Agent, _this: Value, arguments: ArgumentsList<'_>) -> JsResult<Value> {
        let Value::Integer(i) = arguments.get(0) else {
            return Ok(Value::Undefined);
        };
        Ok(Array::from_slice(agent, &[Value::Integer(i), Value::Integer(-i)]).into())
    }
    let callback = BuiltinFunction::create(agent, pair, 1, "pair");
    let result = array_prototype_flat_map(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[callback.into()]),
    )
    .unwrap();
    let Value::Array(flat) = result else {
        panic!("flatMap did not return an array");
    };
    assert_eq!(flat.len(agent), 4);
    for (index, expected) in [1, -1, 2, -2].into_iter().enumerate() {
        assert_eq!(element(agent, flat, index as u32), Some(Value::Integer(expected)));
    }
}

#[test]
fn sort_default_orders_numbers_and_mixed_by_string() {
    let agent = &mut Agent::default();
    let numbers = int_array(agent, &[5, 1, 4, 2]);
    array_prototype_sort(agent, Value::Array(numbers), empty_args()).unwrap();
    for (index, expected) in [1, 2, 4, 5].into_iter().enumerate() {
        assert_eq!(element(agent, numbers, index as u32), Some(Value::Integer(expected)));
    }
    // A mixed pair bails out of the fast comparator; the generic path
    // orders by ToString (so 10 sorts before "a").
    let a = Value::from(HeapString::from_str(agent, "a"));
    let b = Value::from(HeapString::from_str(agent, "b"));
    let mixed = Array::from_slice(agent, &[b, Value::Integer(10), a]);
    array_prototype_sort(agent, Value::Array(mixed), empty_args()).unwrap();
    assert_eq!(element(agent, mixed, 0), Some(Value::Integer(10)));
    assert_eq!(element(agent, mixed, 1), Some(a));
    assert_eq!(element(agent, mixed, 2), Some(b));
}

fn always_equal(
    _agent: &mut Agent,
    _this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    Ok(Value::Integer(0))
}

#[test]
fn sort_is_stable() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[3, 1, 2]);
    let comparator = BuiltinFunction::create(agent, always_equal, 2, "alwaysEqual");
    array_prototype_sort(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[comparator.into()]),
    )
    .unwrap();
    // Everything compares equal, so nothing may move.
    for (index, expected) in [3, 1, 2].into_iter().enumerate() {
        assert_eq!(element(agent, array, index as u32), Some(Value::Integer(expected)));
    }
}

fn throwing_comparator(
    agent: &mut Agent,
    _this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    Err(agent.throw_exception_with_static_message(ExceptionType::Error, "comparator failed"))
}

#[test]
fn sort_with_throwing_comparator_leaves_a_well_formed_array() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[3, 1, 2]);
    let comparator = BuiltinFunction::create(agent, throwing_comparator, 2, "throwing");
    let error = array_prototype_sort(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[comparator.into()]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::Error);
    assert_eq!(array.len(agent), 3);
    let mut remaining: Vec<i64> = (0..3)
        .map(|i| match element(agent, array, i) {
            Some(Value::Integer(v)) => v,
            other => panic!("unexpected element {other:?}"),
        })
        .collect();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![1, 2, 3]);
}

#[test]
fn non_mutating_variants_produce_dense_results() {
    let agent = &mut Agent::default();
    let array = Array::from_optional_slice(
        agent,
        &[Some(Value::Integer(1)), None, Some(Value::Integer(3))],
    );
    let this = Value::Array(array);
    let Value::Array(reversed) = array_prototype_to_reversed(agent, this, empty_args()).unwrap()
    else {
        panic!("toReversed did not return an array");
    };
    assert!(!agent[reversed].elements.has_holes());
    assert_eq!(element(agent, reversed, 0), Some(Value::Integer(3)));
    assert_eq!(element(agent, reversed, 1), Some(Value::Undefined));
    assert_eq!(element(agent, reversed, 2), Some(Value::Integer(1)));
    // The receiver is untouched.
    assert_eq!(element(agent, array, 1), None);

    let Value::Array(sorted) = array_prototype_to_sorted(agent, this, empty_args()).unwrap()
    else {
        panic!("toSorted did not return an array");
    };
    // Undefined (from the hole) sorts last.
    assert_eq!(element(agent, sorted, 0), Some(Value::Integer(1)));
    assert_eq!(element(agent, sorted, 1), Some(Value::Integer(3)));
    assert_eq!(element(agent, sorted, 2), Some(Value::Undefined));
}

#[test]
fn with_replaces_one_index_and_validates_range() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3]);
    let this = Value::Array(array);
    let Value::Array(result) = array_prototype_with(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(-1), Value::Integer(9)]),
    )
    .unwrap() else {
        panic!("with did not return an array");
    };
    assert_eq!(element(agent, result, 2), Some(Value::Integer(9)));
    assert_eq!(element(agent, array, 2), Some(Value::Integer(3)));
    let error = array_prototype_with(
        agent,
        this,
        ArgumentsList::new(&[Value::Integer(3), Value::Integer(9)]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::RangeError);
}

#[test]
fn to_spliced_returns_a_dense_copy() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3]);
    let x = Value::from(HeapString::from_str(agent, "x"));
    let y = Value::from(HeapString::from_str(agent, "y"));
    let Value::Array(result) = array_prototype_to_spliced(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[Value::Integer(1), Value::Integer(1), x, y]),
    )
    .unwrap() else {
        panic!("toSpliced did not return an array");
    };
    assert_eq!(result.len(agent), 4);
    assert_eq!(element(agent, result, 0), Some(Value::Integer(1)));
    assert_eq!(element(agent, result, 1), Some(x));
    assert_eq!(element(agent, result, 2), Some(y));
    assert_eq!(element(agent, result, 3), Some(Value::Integer(3)));
    assert_eq!(array.len(agent), 3);
}

fn marked_object_constructor(
    agent: &mut Agent,
    _this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    let prototype = agent.current_realm_record().intrinsics().object_prototype();
    let object = OrdinaryObject::create(agent, Some(Object::Object(prototype)));
    let key = PropertyKey::from_str(agent, "marker");
    Object::Object(object)
        .internal_set(agent, key, Value::Boolean(true), Value::Object(object))?;
    Ok(Value::Object(object))
}

#[test]
fn custom_constructor_routes_slice_through_species() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3]);
    let constructor = BuiltinFunction::create(agent, marked_object_constructor, 1, "Marked");
    let constructor_key = PropertyKey::String(agent.heap.well_known.constructor);
    Object::Array(array)
        .internal_set(agent, constructor_key, constructor.into(), Value::Array(array))
        .unwrap();
    assert!(array.has_custom_constructor(agent));
    let result = array_prototype_slice(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[Value::Integer(1)]),
    )
    .unwrap();
    let object = Object::try_from(result).unwrap();
    let marker_key = PropertyKey::from_str(agent, "marker");
    assert_eq!(get(agent, object, marker_key).unwrap(), Value::Boolean(true));
    assert_eq!(
        get(agent, object, PropertyKey::Integer(0)).unwrap(),
        Value::Integer(2)
    );
    assert_eq!(
        get(agent, object, PropertyKey::Integer(1)).unwrap(),
        Value::Integer(3)
    );
}

#[test]
fn frozen_length_rejects_push() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1]);
    let length_key = PropertyKey::String(agent.heap.well_known.length);
    Object::Array(array)
        .internal_define_own_property(
            agent,
            length_key,
            PropertyDescriptor {
                writable: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!array.length_writable(agent));
    let error = array_prototype_push(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[Value::Integer(2)]),
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    assert_eq!(array.len(agent), 1);
}

#[test]
fn invalid_length_write_is_a_range_error() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1]);
    let length_key = PropertyKey::String(agent.heap.well_known.length);
    let error = set(
        agent,
        Object::Array(array),
        length_key,
        Value::Float(4294967296.5),
        true,
    )
    .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::RangeError);
}

fn constant_getter(
    _agent: &mut Agent,
    _this_value: Value,
    _arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    Ok(Value::Integer(42))
}

#[test]
fn index_accessor_despecializes_the_array() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2]);
    assert!(array.is_trivial(agent));
    let getter = BuiltinFunction::create(agent, constant_getter, 0, "get0");
    Object::Array(array)
        .internal_define_own_property(
            agent,
            PropertyKey::Integer(0),
            PropertyDescriptor {
                get: Some(getter.into()),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!array.is_trivial(agent));
    // Reads route through the accessor on the generic path.
    assert_eq!(
        get(agent, Object::Array(array), PropertyKey::Integer(0)).unwrap(),
        Value::Integer(42)
    );
    assert_eq!(
        array_prototype_includes(
            agent,
            Value::Array(array),
            ArgumentsList::new(&[Value::Integer(42)]),
        )
        .unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn delete_punches_a_hole_and_widens_the_kind() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3]);
    assert_eq!(agent[array].elements.kind(), ElementsKind::Int);
    Object::Array(array)
        .internal_delete(agent, PropertyKey::Integer(1))
        .unwrap();
    assert_eq!(agent[array].elements.kind(), ElementsKind::HoleInt);
    assert_eq!(element(agent, array, 1), None);
    assert!(agent[array].elements.has_holes());
    // The array stays trivial: a hole is still the dense-data shape.
    assert!(array.is_trivial(agent));
}

#[test]
fn full_range_slice_shares_storage_until_a_write() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3]);
    let Value::Array(copy) =
        array_prototype_slice(agent, Value::Array(array), empty_args()).unwrap()
    else {
        panic!("slice did not return an array");
    };
    assert!(agent[array].elements.is_cow());
    assert!(agent[copy].elements.is_cow());
    // The first write on the source clones the store; the copy keeps
    // the original contents.
    set(
        agent,
        Object::Array(array),
        PropertyKey::Integer(0),
        Value::Integer(99),
        true,
    )
    .unwrap();
    assert_eq!(element(agent, array, 0), Some(Value::Integer(99)));
    assert_eq!(element(agent, copy, 0), Some(Value::Integer(1)));
    assert!(!agent[copy].elements.is_cow());
}

#[test]
fn splice_inserting_more_than_it_removes_grows_in_place() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3, 4, 5]);
    let result = array_prototype_splice(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(10),
            Value::Integer(20),
            Value::Integer(30),
        ]),
    )
    .unwrap();
    let Value::Array(removed) = result else {
        panic!("splice did not return an array");
    };
    assert_eq!(removed.len(agent), 2);
    assert_eq!(element(agent, removed, 0), Some(Value::Integer(2)));
    assert_eq!(element(agent, removed, 1), Some(Value::Integer(3)));
    assert_eq!(array.len(agent), 6);
    for (index, expected) in [1, 10, 20, 30, 4, 5].into_iter().enumerate() {
        assert_eq!(element(agent, array, index as u32), Some(Value::Integer(expected)));
    }
    // Growth overwrites every new slot, so the kind stays packed.
    assert_eq!(agent[array].elements.kind(), ElementsKind::Int);
}

#[test]
fn unshift_keeps_the_packed_kind() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[3, 4]);
    array_prototype_unshift(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[Value::Integer(1), Value::Integer(2)]),
    )
    .unwrap();
    assert_eq!(agent[array].elements.kind(), ElementsKind::Int);
    assert!(!agent[array].elements.has_holes());
}

fn double_and_unhook_prototype(
    agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    if arguments.get(1) == Value::Integer(1)
        && let Value::Array(receiver) = arguments.get(2)
    {
        receiver.set_prototype(agent, None);
    }
    match arguments.get(0) {
        Value::Integer(i) => Ok(Value::Integer(i * 2)),
        other => Ok(other),
    }
}

#[test]
fn map_despecialized_mid_loop_finishes_on_the_generic_path() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3, 4]);
    // The callback replaces the receiver's prototype on the second
    // call, so the remaining indexes must run through the generic
    // continuation with the partial results carried over.
    let callback = BuiltinFunction::create(agent, double_and_unhook_prototype, 1, "double");
    let result = array_prototype_map(
        agent,
        Value::Array(array),
        ArgumentsList::new(&[callback.into()]),
    )
    .unwrap();
    let Value::Array(mapped) = result else {
        panic!("map did not return an array");
    };
    assert!(!array.is_trivial(agent));
    assert_eq!(mapped.len(agent), 4);
    assert!(!agent[mapped].elements.has_holes());
    for (index, expected) in [2, 4, 6, 8].into_iter().enumerate() {
        assert_eq!(element(agent, mapped, index as u32), Some(Value::Integer(expected)));
    }
}

#[test]
fn scans_reject_non_numbers_in_packed_storage() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2]);
    let needle = Value::from(HeapString::from_str(agent, "1"));
    let this = Value::Array(array);
    assert_eq!(
        array_prototype_includes(agent, this, ArgumentsList::new(&[needle])).unwrap(),
        Value::Boolean(false)
    );
    assert_eq!(
        array_prototype_index_of(agent, this, ArgumentsList::new(&[needle])).unwrap(),
        Value::Integer(-1)
    );
    assert_eq!(
        array_prototype_last_index_of(agent, this, ArgumentsList::new(&[needle])).unwrap(),
        Value::Integer(-1)
    );
}

#[test]
fn shrinking_length_deletes_despecialized_index_properties() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3]);
    let getter = BuiltinFunction::create(agent, constant_getter, 0, "get1");
    Object::Array(array)
        .internal_define_own_property(
            agent,
            PropertyKey::Integer(1),
            PropertyDescriptor {
                get: Some(getter.into()),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        get(agent, Object::Array(array), PropertyKey::Integer(1)).unwrap(),
        Value::Integer(42)
    );
    let length_key = PropertyKey::String(agent.heap.well_known.length);
    set(agent, Object::Array(array), length_key, Value::Integer(0), true).unwrap();
    assert_eq!(array.len(agent), 0);
    // The accessor went with the shrink.
    assert_eq!(
        get(agent, Object::Array(array), PropertyKey::Integer(1)).unwrap(),
        Value::Undefined
    );
}

#[test]
fn length_shrink_stops_at_a_non_configurable_index() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2, 3]);
    Object::Array(array)
        .internal_define_own_property(
            agent,
            PropertyKey::Integer(2),
            PropertyDescriptor {
                value: Some(Value::Integer(7)),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    let length_key = PropertyKey::String(agent.heap.well_known.length);
    let error = set(agent, Object::Array(array), length_key, Value::Integer(0), true).unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    // The shrink stopped just above the undeletable index.
    assert_eq!(array.len(agent), 3);
    assert_eq!(
        get(agent, Object::Array(array), PropertyKey::Integer(2)).unwrap(),
        Value::Integer(7)
    );
}

#[test]
fn prototype_replacement_despecializes() {
    let agent = &mut Agent::default();
    let array = int_array(agent, &[1, 2]);
    array.set_prototype(agent, None);
    assert!(!array.is_trivial(agent));
    // The generic path still serves the method correctly.
    assert_eq!(
        array_prototype_index_of(
            agent,
            Value::Array(array),
            ArgumentsList::new(&[Value::Integer(2)]),
        )
        .unwrap(),
        Value::Integer(1)
    );
}
