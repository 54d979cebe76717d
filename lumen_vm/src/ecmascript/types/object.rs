// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object union and ordinary object semantics.
//!
//! [Object] carries the internal methods every fast path's generic
//! collaborator needs: `[[Get]]`, `[[Set]]`, `[[HasProperty]]`,
//! `[[GetOwnProperty]]`, `[[DefineOwnProperty]]` and `[[Delete]]`.
//! Array and TypedArray exotic behavior lives with their handle types;
//! this module dispatches to them.

use hashbrown::HashMap;

use crate::{
    ecmascript::{
        abstract_operations::{
            operations_on_objects::call_function, testing_and_comparison::same_value,
        },
        builtins::{
            array::Array, array_buffer::ArrayBuffer, builtin_function::BuiltinFunction,
            typed_array::TypedArray,
        },
        execution::{Agent, JsResult},
        types::{PropertyDescriptor, PropertyKey, Value},
    },
    heap::{CreateHeapData, Heap, indexes::ObjectIndex},
};

/// Handle to an ordinary object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrdinaryObject(ObjectIndex);

/// One own property of an ordinary object.
#[derive(Debug, Clone, Copy)]
pub enum ObjectProperty {
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<Value>,
        set: Option<Value>,
        enumerable: bool,
        configurable: bool,
    },
}

impl ObjectProperty {
    fn is_configurable(&self) -> bool {
        match self {
            ObjectProperty::Data { configurable, .. }
            | ObjectProperty::Accessor { configurable, .. } => *configurable,
        }
    }

    fn to_descriptor(self) -> PropertyDescriptor {
        match self {
            ObjectProperty::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => PropertyDescriptor {
                value: Some(value),
                writable: Some(writable),
                enumerable: Some(enumerable),
                configurable: Some(configurable),
                ..Default::default()
            },
            ObjectProperty::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => PropertyDescriptor {
                get,
                set,
                enumerable: Some(enumerable),
                configurable: Some(configurable),
                ..Default::default()
            },
        }
    }

    fn from_descriptor(descriptor: PropertyDescriptor) -> Self {
        if descriptor.is_accessor_descriptor() {
            ObjectProperty::Accessor {
                get: descriptor.get,
                set: descriptor.set,
                enumerable: descriptor.enumerable.unwrap_or(false),
                configurable: descriptor.configurable.unwrap_or(false),
            }
        } else {
            ObjectProperty::Data {
                value: descriptor.value.unwrap_or(Value::Undefined),
                writable: descriptor.writable.unwrap_or(false),
                enumerable: descriptor.enumerable.unwrap_or(false),
                configurable: descriptor.configurable.unwrap_or(false),
            }
        }
    }
}

#[derive(Debug)]
pub struct ObjectHeapData {
    pub prototype: Option<Object>,
    pub extensible: bool,
    pub properties: HashMap<PropertyKey, ObjectProperty>,
}

impl ObjectHeapData {
    pub fn new(prototype: Option<Object>) -> Self {
        Self {
            prototype,
            extensible: true,
            properties: HashMap::new(),
        }
    }
}

impl OrdinaryObject {
    pub(crate) fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn create(agent: &mut Agent, prototype: Option<Object>) -> Self {
        agent.heap.create(ObjectHeapData::new(prototype))
    }

    fn own_property(self, agent: &Agent, key: PropertyKey) -> Option<ObjectProperty> {
        agent[self].properties.get(&key).copied()
    }

    pub(crate) fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        agent[self].prototype
    }

    pub(crate) fn internal_get_own_property(
        self,
        agent: &Agent,
        key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        self.own_property(agent, key).map(|p| p.to_descriptor())
    }

    /// ### [10.1.8 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-get-p-receiver)
    pub(crate) fn internal_get(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        match self.own_property(agent, key) {
            Some(ObjectProperty::Data { value, .. }) => Ok(value),
            Some(ObjectProperty::Accessor { get, .. }) => match get {
                Some(Value::BuiltinFunction(getter)) => {
                    call_function(agent, getter, receiver, &[])
                }
                _ => Ok(Value::Undefined),
            },
            None => match self.internal_prototype(agent) {
                Some(parent) => parent.internal_get(agent, key, receiver),
                None => Ok(Value::Undefined),
            },
        }
    }

    /// ### [10.1.9 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-set-p-v-receiver)
    pub(crate) fn internal_set(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        match self.own_property(agent, key) {
            Some(ObjectProperty::Data { writable, .. }) => {
                if !writable {
                    return Ok(false);
                }
                if let Some(ObjectProperty::Data { value: slot, .. }) =
                    agent[self].properties.get_mut(&key)
                {
                    *slot = value;
                }
                Ok(true)
            }
            Some(ObjectProperty::Accessor { set, .. }) => match set {
                Some(Value::BuiltinFunction(setter)) => {
                    call_function(agent, setter, receiver, &[value])?;
                    Ok(true)
                }
                _ => Ok(false),
            },
            None => {
                if let Some(parent) = self.internal_prototype(agent) {
                    // A setter or a non-writable data property anywhere
                    // on the chain intercepts the write.
                    if let Some(descriptor) = parent.lookup_property(agent, key) {
                        match descriptor {
                            ObjectProperty::Accessor { set, .. } => {
                                return match set {
                                    Some(Value::BuiltinFunction(setter)) => {
                                        call_function(agent, setter, receiver, &[value])?;
                                        Ok(true)
                                    }
                                    _ => Ok(false),
                                };
                            }
                            ObjectProperty::Data { writable: false, .. } => return Ok(false),
                            ObjectProperty::Data { .. } => {}
                        }
                    }
                }
                if !agent[self].extensible {
                    return Ok(false);
                }
                agent[self].properties.insert(
                    key,
                    ObjectProperty::Data {
                        value,
                        writable: true,
                        enumerable: true,
                        configurable: true,
                    },
                );
                Ok(true)
            }
        }
    }

    pub(crate) fn internal_has_property(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        if self.own_property(agent, key).is_some() {
            return Ok(true);
        }
        match self.internal_prototype(agent) {
            Some(parent) => parent.internal_has_property(agent, key),
            None => Ok(false),
        }
    }

    /// ### [10.1.6 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-defineownproperty-p-desc)
    ///
    /// Validation is the subset the array engine can observe: a
    /// non-configurable property rejects reconfiguration.
    pub(crate) fn internal_define_own_property(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        match self.own_property(agent, key) {
            Some(current) => {
                if !current.is_configurable() {
                    let shape_change = descriptor.is_accessor_descriptor()
                        != matches!(current, ObjectProperty::Accessor { .. });
                    if descriptor.configurable == Some(true) || shape_change {
                        return Ok(false);
                    }
                    if let ObjectProperty::Data {
                        value,
                        writable: false,
                        ..
                    } = current
                    {
                        if descriptor.writable == Some(true) {
                            return Ok(false);
                        }
                        if let Some(new_value) = descriptor.value
                            && !same_value(new_value, value)
                        {
                            return Ok(false);
                        }
                    }
                }
                let merged = merge_descriptor(current, descriptor);
                agent[self].properties.insert(key, merged);
                Ok(true)
            }
            None => {
                if !agent[self].extensible {
                    return Ok(false);
                }
                agent[self]
                    .properties
                    .insert(key, ObjectProperty::from_descriptor(descriptor));
                Ok(true)
            }
        }
    }

    pub(crate) fn internal_delete(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        match self.own_property(agent, key) {
            Some(property) if !property.is_configurable() => Ok(false),
            Some(_) => {
                agent[self].properties.remove(&key);
                Ok(true)
            }
            None => Ok(true),
        }
    }
}

fn merge_descriptor(current: ObjectProperty, descriptor: PropertyDescriptor) -> ObjectProperty {
    if descriptor.is_accessor_descriptor() {
        let (old_get, old_set, enumerable, configurable) = match current {
            ObjectProperty::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => (get, set, enumerable, configurable),
            ObjectProperty::Data {
                enumerable,
                configurable,
                ..
            } => (None, None, enumerable, configurable),
        };
        ObjectProperty::Accessor {
            get: descriptor.get.or(old_get),
            set: descriptor.set.or(old_set),
            enumerable: descriptor.enumerable.unwrap_or(enumerable),
            configurable: descriptor.configurable.unwrap_or(configurable),
        }
    } else {
        let (old_value, old_writable, enumerable, configurable) = match current {
            ObjectProperty::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => (value, writable, enumerable, configurable),
            ObjectProperty::Accessor {
                enumerable,
                configurable,
                ..
            } => (Value::Undefined, false, enumerable, configurable),
        };
        ObjectProperty::Data {
            value: descriptor.value.unwrap_or(old_value),
            writable: descriptor.writable.unwrap_or(old_writable),
            enumerable: descriptor.enumerable.unwrap_or(enumerable),
            configurable: descriptor.configurable.unwrap_or(configurable),
        }
    }
}

/// Union of every object-like value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Object(OrdinaryObject),
    Array(Array),
    ArrayBuffer(ArrayBuffer),
    TypedArray(TypedArray),
    BuiltinFunction(BuiltinFunction),
}

impl Object {
    pub fn into_value(self) -> Value {
        match self {
            Object::Object(o) => Value::Object(o),
            Object::Array(a) => Value::Array(a),
            Object::ArrayBuffer(b) => Value::ArrayBuffer(b),
            Object::TypedArray(t) => Value::TypedArray(t),
            Object::BuiltinFunction(f) => Value::BuiltinFunction(f),
        }
    }

    pub(crate) fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        match self {
            Object::Object(o) => o.internal_prototype(agent),
            Object::Array(a) => a.internal_prototype(agent),
            Object::TypedArray(t) => t.internal_prototype(agent),
            Object::ArrayBuffer(_) | Object::BuiltinFunction(_) => None,
        }
    }

    /// Nearest own-or-inherited property, for `[[Set]]` interception.
    fn lookup_property(self, agent: &Agent, key: PropertyKey) -> Option<ObjectProperty> {
        let mut cursor = Some(self);
        while let Some(object) = cursor {
            if let Object::Object(o) = object
                && let Some(property) = o.own_property(agent, key)
            {
                return Some(property);
            }
            cursor = object.internal_prototype(agent);
        }
        None
    }

    pub fn internal_get(self, agent: &mut Agent, key: PropertyKey, receiver: Value) -> JsResult<Value> {
        match self {
            Object::Object(o) => o.internal_get(agent, key, receiver),
            Object::Array(a) => a.internal_get(agent, key, receiver),
            Object::TypedArray(t) => t.internal_get(agent, key, receiver),
            Object::ArrayBuffer(_) | Object::BuiltinFunction(_) => Ok(Value::Undefined),
        }
    }

    pub fn internal_set(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        match self {
            Object::Object(o) => o.internal_set(agent, key, value, receiver),
            Object::Array(a) => a.internal_set(agent, key, value, receiver),
            Object::TypedArray(t) => t.internal_set(agent, key, value),
            Object::ArrayBuffer(_) | Object::BuiltinFunction(_) => Ok(false),
        }
    }

    pub fn internal_has_property(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        match self {
            Object::Object(o) => o.internal_has_property(agent, key),
            Object::Array(a) => a.internal_has_property(agent, key),
            Object::TypedArray(t) => t.internal_has_property(agent, key),
            Object::ArrayBuffer(_) | Object::BuiltinFunction(_) => Ok(false),
        }
    }

    pub fn internal_get_own_property(
        self,
        agent: &mut Agent,
        key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        match self {
            Object::Object(o) => Ok(o.internal_get_own_property(agent, key)),
            Object::Array(a) => Ok(a.internal_get_own_property(agent, key)),
            Object::TypedArray(t) => Ok(t.internal_get_own_property(agent, key)),
            Object::ArrayBuffer(_) | Object::BuiltinFunction(_) => Ok(None),
        }
    }

    pub fn internal_define_own_property(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        match self {
            Object::Object(o) => o.internal_define_own_property(agent, key, descriptor),
            Object::Array(a) => a.internal_define_own_property(agent, key, descriptor),
            Object::TypedArray(_) | Object::ArrayBuffer(_) | Object::BuiltinFunction(_) => {
                Ok(false)
            }
        }
    }

    pub fn internal_delete(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        match self {
            Object::Object(o) => o.internal_delete(agent, key),
            Object::Array(a) => a.internal_delete(agent, key),
            Object::TypedArray(_) | Object::ArrayBuffer(_) | Object::BuiltinFunction(_) => Ok(true),
        }
    }
}

impl TryFrom<Value> for Object {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(o) => Ok(Object::Object(o)),
            Value::Array(a) => Ok(Object::Array(a)),
            Value::ArrayBuffer(b) => Ok(Object::ArrayBuffer(b)),
            Value::TypedArray(t) => Ok(Object::TypedArray(t)),
            Value::BuiltinFunction(f) => Ok(Object::BuiltinFunction(f)),
            _ => Err(()),
        }
    }
}

impl From<OrdinaryObject> for Object {
    fn from(value: OrdinaryObject) -> Self {
        Object::Object(value)
    }
}

impl From<Array> for Object {
    fn from(value: Array) -> Self {
        Object::Array(value)
    }
}

impl From<OrdinaryObject> for Value {
    fn from(value: OrdinaryObject) -> Self {
        Value::Object(value)
    }
}

impl core::ops::Index<OrdinaryObject> for Agent {
    type Output = ObjectHeapData;

    fn index(&self, index: OrdinaryObject) -> &Self::Output {
        &self.heap.objects[index.get_index()]
    }
}

impl core::ops::IndexMut<OrdinaryObject> for Agent {
    fn index_mut(&mut self, index: OrdinaryObject) -> &mut Self::Output {
        &mut self.heap.objects[index.get_index()]
    }
}

impl CreateHeapData<ObjectHeapData, OrdinaryObject> for Heap {
    fn create(&mut self, data: ObjectHeapData) -> OrdinaryObject {
        self.objects.push(data);
        OrdinaryObject(ObjectIndex::last(&self.objects))
    }
}
