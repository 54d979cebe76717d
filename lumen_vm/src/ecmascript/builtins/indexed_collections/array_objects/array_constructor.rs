// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    abstract_operations::{
        operations_on_objects::create_array_from_list, type_conversion::to_uint32,
    },
    builtins::{
        array::{Array, abstract_operations::array_create},
        builtin_function::ArgumentsList,
    },
    execution::{Agent, ExceptionType, JsResult},
    types::Value,
};

/// ### [23.1.1.1 Array ( ...values )](https://tc39.es/ecma262/#sec-array)
///
/// This is the intrinsic `%Array%`; its identity (not this body) is
/// what the species check compares against.
pub fn array_constructor_call(
    agent: &mut Agent,
    _this_value: Value,
    arguments: ArgumentsList<'_>,
) -> JsResult<Value> {
    match arguments.len() {
        0 => Ok(create_array_from_list(agent, &[]).into()),
        1 => {
            let length = arguments.get(0);
            match length.as_number() {
                Some(number) => {
                    let int_len = to_uint32(number);
                    if int_len as f64 != number {
                        return Err(agent.throw_exception_with_static_message(
                            ExceptionType::RangeError,
                            "Invalid array length",
                        ));
                    }
                    Ok(array_create(agent, int_len as u64)?.into())
                }
                None => Ok(Array::from_slice(agent, &[length]).into()),
            }
        }
        _ => Ok(create_array_from_list(agent, &arguments).into()),
    }
}
