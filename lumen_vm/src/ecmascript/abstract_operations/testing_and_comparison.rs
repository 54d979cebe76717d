// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use crate::ecmascript::{builtins::builtin_function::BuiltinFunction, types::Value};

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
pub fn is_callable(argument: Value) -> Option<BuiltinFunction> {
    match argument {
        Value::BuiltinFunction(function) => Some(function),
        _ => None,
    }
}

/// ### [7.2.10 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
///
/// `NaN` equals `NaN`; `+0` and `-0` differ.
pub fn same_value(x: Value, y: Value) -> bool {
    if let (Some(x), Some(y)) = (x.as_number(), y.as_number()) {
        if x.is_nan() && y.is_nan() {
            return true;
        }
        return x == y && x.is_sign_negative() == y.is_sign_negative();
    }
    x == y
}

/// ### [7.2.11 SameValueZero ( x, y )](https://tc39.es/ecma262/#sec-samevaluezero)
///
/// `NaN` equals `NaN`; `+0` equals `-0`. The equality `includes` uses.
pub fn same_value_zero(x: Value, y: Value) -> bool {
    if let (Some(x), Some(y)) = (x.as_number(), y.as_number()) {
        return (x.is_nan() && y.is_nan()) || x == y;
    }
    x == y
}

/// ### [7.2.16 IsStrictlyEqual ( x, y )](https://tc39.es/ecma262/#sec-isstrictlyequal)
///
/// `NaN` equals nothing; `+0` equals `-0`. The equality `indexOf` uses.
pub fn is_strictly_equal(x: Value, y: Value) -> bool {
    if let (Some(x), Some(y)) = (x.as_number(), y.as_number()) {
        return x == y;
    }
    x == y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_and_zero_edge_cases() {
        let nan = Value::nan();
        let pos_zero = Value::Integer(0);
        let neg_zero = Value::Float(-0.0);
        assert!(same_value(nan, nan));
        assert!(same_value_zero(nan, nan));
        assert!(!is_strictly_equal(nan, nan));
        assert!(!same_value(pos_zero, neg_zero));
        assert!(same_value_zero(pos_zero, neg_zero));
        assert!(is_strictly_equal(pos_zero, neg_zero));
    }
}
