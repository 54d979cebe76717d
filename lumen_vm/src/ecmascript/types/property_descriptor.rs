// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::types::Value;

/// ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyDescriptor {
    pub value: Option<Value>,
    pub writable: Option<bool>,
    /// Getter function, `Some(Value::Undefined)` for an explicit
    /// undefined getter.
    pub get: Option<Value>,
    pub set: Option<Value>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// Default data descriptor: writable, enumerable, configurable.
    pub fn data(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(true),
            configurable: Some(true),
            ..Default::default()
        }
    }

    /// True if this describes a plain writable-enumerable-configurable
    /// data property; anything else on an array index de-specializes
    /// the array.
    pub fn is_default_data_descriptor(&self) -> bool {
        self.is_data_descriptor()
            && !self.is_accessor_descriptor()
            && self.writable != Some(false)
            && self.enumerable != Some(false)
            && self.configurable != Some(false)
    }
}
