// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use crate::{
    ecmascript::{
        abstract_operations::{
            testing_and_comparison::is_callable, type_conversion::to_length,
        },
        builtins::{
            array::Array,
            builtin_function::{ArgumentsList, Behaviour, BuiltinFunction},
        },
        execution::{Agent, ExceptionType, JsResult},
        types::{Object, PropertyDescriptor, PropertyKey, Value},
    },
    heap::element_array::MAX_ARRAY_LENGTH,
};

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
#[inline]
pub fn get(agent: &mut Agent, object: Object, key: PropertyKey) -> JsResult<Value> {
    object.internal_get(agent, key, object.into_value())
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
pub fn set(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    value: Value,
    throw: bool,
) -> JsResult<()> {
    let success = object.internal_set(agent, key, value, object.into_value())?;
    if !success && throw {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Could not set property",
        ));
    }
    Ok(())
}

/// ### [7.3.7 CreateDataPropertyOrThrow ( O, P, V )](https://tc39.es/ecma262/#sec-createdatapropertyorthrow)
pub fn create_data_property_or_throw(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
    value: Value,
) -> JsResult<()> {
    let success = object.internal_define_own_property(
        agent,
        key,
        PropertyDescriptor {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(true),
            configurable: Some(true),
            ..Default::default()
        },
    )?;
    if !success {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Could not create property",
        ));
    }
    Ok(())
}

/// ### [7.3.10 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub fn delete_property_or_throw(
    agent: &mut Agent,
    object: Object,
    key: PropertyKey,
) -> JsResult<()> {
    let success = object.internal_delete(agent, key)?;
    if !success {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Could not delete property",
        ));
    }
    Ok(())
}

/// ### [7.3.12 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
#[inline]
pub fn has_property(agent: &mut Agent, object: Object, key: PropertyKey) -> JsResult<bool> {
    object.internal_has_property(agent, key)
}

/// ### [7.3.13 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
pub fn call(
    agent: &mut Agent,
    callable: Value,
    this_argument: Value,
    arguments: &[Value],
) -> JsResult<Value> {
    match is_callable(callable) {
        Some(function) => call_function(agent, function, this_argument, arguments),
        None => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a callable object",
        )),
    }
}

/// Invokes a known function. Every callback re-entry in the array
/// methods funnels through here.
pub fn call_function(
    agent: &mut Agent,
    function: BuiltinFunction,
    this_argument: Value,
    arguments: &[Value],
) -> JsResult<Value> {
    let Behaviour::Regular(behaviour) = agent[function].behaviour;
    behaviour(agent, this_argument, ArgumentsList::new(arguments))
}

/// ### [7.3.19 LengthOfArrayLike ( obj )](https://tc39.es/ecma262/#sec-lengthofarraylike)
pub fn length_of_array_like(agent: &mut Agent, object: Object) -> JsResult<i64> {
    // Fast arrays keep their length in the elements vector.
    if let Object::Array(array) = object {
        return Ok(array.len(agent) as i64);
    }
    let length_key = PropertyKey::String(agent.heap.well_known.length);
    let length = get(agent, object, length_key)?;
    to_length(agent, length)
}

/// ### [7.3.17 CreateArrayFromList ( elements )](https://tc39.es/ecma262/#sec-createarrayfromlist)
pub fn create_array_from_list(agent: &mut Agent, elements: &[Value]) -> Array {
    Array::from_slice(agent, elements)
}

/// ### [9.4.2.3 ArraySpeciesCreate ( originalArray, length )](https://tc39.es/ecma262/#sec-arrayspeciescreate)
///
/// The species protocol collapsed to constructor identity: a fast array
/// whose `constructor` is absent or the intrinsic `%Array%` allocates a
/// plain array, anything callable is invoked as the species, and
/// anything else is a TypeError. This is the check
/// [Array::has_custom_constructor](crate::ecmascript::builtins::array::Array::has_custom_constructor)
/// front-runs on the fast path.
pub fn array_species_create(
    agent: &mut Agent,
    original_array: Object,
    length: u64,
) -> JsResult<Object> {
    let constructor = if let Object::Array(_) = original_array {
        let constructor_key = PropertyKey::String(agent.heap.well_known.constructor);
        get(agent, original_array, constructor_key)?
    } else {
        Value::Undefined
    };
    let is_intrinsic = matches!(
        constructor,
        Value::BuiltinFunction(f) if f == agent.current_realm_record().intrinsics().array_constructor()
    );
    if constructor.is_undefined() || is_intrinsic {
        if length > MAX_ARRAY_LENGTH {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::RangeError,
                "Invalid array length",
            ));
        }
        return Ok(Object::Array(Array::create_with_length(
            agent,
            length as u32,
        )));
    }
    let result = call(
        agent,
        constructor,
        Value::Undefined,
        &[Value::from_f64(length as f64)],
    )?;
    Object::try_from(result).map_err(|_| {
        agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Species constructor did not return an object",
        )
    })
}
