// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Array exotic object.
//!
//! An Array keeps its index properties in an [ElementsVector] and
//! everything else in an optional backing ordinary object. The fast
//! paths in
//! [array_prototype](crate::ecmascript::builtins::indexed_collections::array_objects::array_prototype)
//! only engage while [Array::is_trivial] holds; every operation here
//! that breaks the dense-data-property shape clears the `stable` flag.

pub mod abstract_operations;
mod data;

pub use data::ArrayHeapData;

use core::ops::{Index, IndexMut};

use crate::{
    ecmascript::{
        execution::{Agent, JsResult},
        types::{
            Object, ObjectHeapData, OrdinaryObject, PropertyDescriptor, PropertyKey, Value,
        },
    },
    heap::{
        CreateHeapData, Heap,
        element_array::ElementsVector,
        indexes::ArrayIndex,
    },
};

use abstract_operations::array_set_length;

/// Writes this far past the current length transition to dictionary
/// elements instead of materializing a run of holes.
const SPARSE_GAP_LIMIT: u64 = 1024;

/// Handle to an Array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Array(ArrayIndex);

impl Array {
    pub(crate) fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn from_slice(agent: &mut Agent, values: &[Value]) -> Self {
        agent
            .heap
            .create(ArrayHeapData::new(ElementsVector::from_values(values)))
    }

    /// Builds an array from a slice where `None` entries are holes.
    pub fn from_optional_slice(agent: &mut Agent, values: &[Option<Value>]) -> Self {
        agent.heap.create(ArrayHeapData::new(
            ElementsVector::from_optional_values(values),
        ))
    }

    /// ### [10.4.2.2 ArrayCreate ( length )](https://tc39.es/ecma262/#sec-arraycreate)
    ///
    /// All `length` slots start as holes.
    pub fn create_with_length(agent: &mut Agent, length: u32) -> Self {
        let mut elements = ElementsVector::with_capacity(length);
        elements.set_len(length);
        agent.heap.create(ArrayHeapData::new(elements))
    }

    pub fn len(self, agent: &Agent) -> u32 {
        agent[self].elements.len()
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        agent[self].elements.is_empty()
    }

    /// The base specialization guard: dense data properties only, no
    /// dictionary storage.
    pub fn is_trivial(self, agent: &Agent) -> bool {
        let data = &agent[self];
        data.stable && !data.elements.kind().is_dictionary()
    }

    pub fn length_writable(self, agent: &Agent) -> bool {
        agent[self].elements.len_writable
    }

    /// True when the species lookup could observe anything but the
    /// intrinsic `%Array%`: an own `constructor`, or a replaced
    /// `%Array.prototype%.constructor`.
    pub fn has_custom_constructor(self, agent: &Agent) -> bool {
        let constructor_key = PropertyKey::String(agent.heap.well_known.constructor);
        if let Some(backing) = agent[self].object_index
            && agent[backing].properties.contains_key(&constructor_key)
        {
            return true;
        }
        let intrinsics = agent.current_realm_record().intrinsics();
        let prototype = intrinsics.array_prototype();
        match agent[prototype].properties.get(&constructor_key) {
            Some(crate::ecmascript::types::ObjectProperty::Data {
                value: Value::BuiltinFunction(function),
                ..
            }) => *function != intrinsics.array_constructor(),
            _ => true,
        }
    }

    pub(crate) fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        match agent[self].object_index {
            Some(backing) => backing.internal_prototype(agent),
            None => Some(Object::Object(
                agent.current_realm_record().intrinsics().array_prototype(),
            )),
        }
    }

    /// Replaces the prototype; the array stops being trivial.
    pub fn set_prototype(self, agent: &mut Agent, prototype: Option<Object>) {
        let backing = self.materialize_backing_object(agent);
        agent[backing].prototype = prototype;
        agent[self].stable = false;
    }

    fn materialize_backing_object(self, agent: &mut Agent) -> OrdinaryObject {
        if let Some(backing) = agent[self].object_index {
            return backing;
        }
        let prototype = self.internal_prototype(agent);
        let backing = agent.heap.create(ObjectHeapData::new(prototype));
        agent[self].object_index = Some(backing);
        backing
    }

    fn is_length_key(agent: &Agent, key: PropertyKey) -> bool {
        key == PropertyKey::String(agent.heap.well_known.length)
    }

    pub(crate) fn internal_get(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        if Self::is_length_key(agent, key) {
            return Ok(Value::from(self.len(agent)));
        }
        if let PropertyKey::Integer(index) = key
            && key.is_array_index()
            && let Some(value) = agent[self].elements.get(index as u32)
        {
            return Ok(value);
        }
        // Hole, out of range, or a non-index key: the backing object
        // (which may hold an index accessor) and the prototype chain.
        match agent[self].object_index {
            Some(backing) => backing.internal_get(agent, key, receiver),
            None => match self.internal_prototype(agent) {
                Some(prototype) => prototype.internal_get(agent, key, receiver),
                None => Ok(Value::Undefined),
            },
        }
    }

    pub(crate) fn internal_set(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        if Self::is_length_key(agent, key) {
            return array_set_length(agent, self, value);
        }
        if let PropertyKey::Integer(index) = key
            && key.is_array_index()
        {
            // A de-specialized index (accessor, non-writable) lives on
            // the backing object and takes precedence over storage.
            if let Some(backing) = agent[self].object_index
                && agent[backing].properties.contains_key(&key)
            {
                return backing.internal_set(agent, key, value, receiver);
            }
            return Ok(self.try_write_index(agent, index as u32, value));
        }
        let backing = self.materialize_backing_object(agent);
        backing.internal_set(agent, key, value, receiver)
    }

    /// Writes an in-range or appending index into element storage.
    /// Returns false when length is frozen below the index.
    fn try_write_index(self, agent: &mut Agent, index: u32, value: Value) -> bool {
        let data = &mut agent[self];
        let len = data.elements.len();
        if index < len {
            data.elements.set(index, value);
            return true;
        }
        if !data.elements.len_writable {
            return false;
        }
        if index as u64 > len as u64 + SPARSE_GAP_LIMIT {
            data.elements.convert_to_dictionary();
            data.stable = false;
        }
        data.elements.set_len(index + 1);
        data.elements.set(index, value);
        true
    }

    pub(crate) fn internal_has_property(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        if Self::is_length_key(agent, key) {
            return Ok(true);
        }
        if let PropertyKey::Integer(index) = key
            && key.is_array_index()
            && agent[self].elements.get(index as u32).is_some()
        {
            return Ok(true);
        }
        match agent[self].object_index {
            Some(backing) => backing.internal_has_property(agent, key),
            None => match self.internal_prototype(agent) {
                Some(prototype) => prototype.internal_has_property(agent, key),
                None => Ok(false),
            },
        }
    }

    pub(crate) fn internal_get_own_property(
        self,
        agent: &Agent,
        key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        if Self::is_length_key(agent, key) {
            return Some(PropertyDescriptor {
                value: Some(Value::from(self.len(agent))),
                writable: Some(self.length_writable(agent)),
                enumerable: Some(false),
                configurable: Some(false),
                ..Default::default()
            });
        }
        if let PropertyKey::Integer(index) = key
            && key.is_array_index()
            && let Some(value) = agent[self].elements.get(index as u32)
        {
            return Some(PropertyDescriptor::data(value));
        }
        agent[self]
            .object_index
            .and_then(|backing| backing.internal_get_own_property(agent, key))
    }

    /// ### [10.4.2.1 \[\[DefineOwnProperty\]\] ( P, Desc )](https://tc39.es/ecma262/#sec-array-exotic-objects-defineownproperty-p-desc)
    pub(crate) fn internal_define_own_property(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        if Self::is_length_key(agent, key) {
            if descriptor.is_accessor_descriptor() || descriptor.configurable == Some(true) {
                return Ok(false);
            }
            if let Some(value) = descriptor.value
                && !array_set_length(agent, self, value)?
            {
                return Ok(false);
            }
            if descriptor.writable == Some(false) {
                agent[self].elements.len_writable = false;
            }
            return Ok(true);
        }
        if let PropertyKey::Integer(index) = key
            && key.is_array_index()
        {
            let index = index as u32;
            if descriptor.is_default_data_descriptor()
                && !agent[self]
                    .object_index
                    .is_some_and(|backing| agent[backing].properties.contains_key(&key))
            {
                let value = descriptor.value.unwrap_or(Value::Undefined);
                return Ok(self.try_write_index(agent, index, value));
            }
            // Non-default descriptor on an index: the property moves
            // to the backing object and the array de-specializes.
            if index >= self.len(agent) {
                if !self.length_writable(agent) {
                    return Ok(false);
                }
                agent[self].elements.set_len(index + 1);
            } else if agent[self].elements.get(index).is_some() {
                // Carry the current value over before punching the
                // hole, so a writability-only change keeps it.
                let current = agent[self].elements.get(index);
                agent[self].elements.set_hole(index);
                let backing = self.materialize_backing_object(agent);
                let merged = if descriptor.is_accessor_descriptor() {
                    PropertyDescriptor {
                        enumerable: descriptor.enumerable.or(Some(true)),
                        configurable: descriptor.configurable.or(Some(true)),
                        ..descriptor
                    }
                } else {
                    PropertyDescriptor {
                        value: descriptor.value.or(current),
                        writable: descriptor.writable.or(Some(true)),
                        enumerable: descriptor.enumerable.or(Some(true)),
                        configurable: descriptor.configurable.or(Some(true)),
                        ..descriptor
                    }
                };
                agent[self].stable = false;
                return backing.internal_define_own_property(agent, key, merged);
            } else {
                agent[self].elements.set_hole(index);
            }
            let backing = self.materialize_backing_object(agent);
            agent[self].stable = false;
            return backing.internal_define_own_property(agent, key, descriptor);
        }
        let backing = self.materialize_backing_object(agent);
        backing.internal_define_own_property(agent, key, descriptor)
    }

    pub(crate) fn internal_delete(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        if Self::is_length_key(agent, key) {
            return Ok(false);
        }
        if let PropertyKey::Integer(index) = key
            && key.is_array_index()
        {
            let index = index as u32;
            if agent[self].elements.get(index).is_some() {
                agent[self].elements.set_hole(index);
                return Ok(true);
            }
            if let Some(backing) = agent[self].object_index {
                return backing.internal_delete(agent, key);
            }
            return Ok(true);
        }
        match agent[self].object_index {
            Some(backing) => backing.internal_delete(agent, key),
            None => Ok(true),
        }
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl Index<Array> for Agent {
    type Output = ArrayHeapData;

    fn index(&self, index: Array) -> &Self::Output {
        &self.heap.arrays[index.get_index()]
    }
}

impl IndexMut<Array> for Agent {
    fn index_mut(&mut self, index: Array) -> &mut Self::Output {
        &mut self.heap.arrays[index.get_index()]
    }
}

impl CreateHeapData<ArrayHeapData, Array> for Heap {
    fn create(&mut self, data: ArrayHeapData) -> Array {
        self.arrays.push(data);
        Array(ArrayIndex::last(&self.arrays))
    }
}
