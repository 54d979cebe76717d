// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The TypedArray exotic object.
//!
//! Fixed length, no holes, no shared storage; the only shape hazard is
//! buffer detachment. Element writes convert per kind: modular wrap
//! for the integer kinds, saturate-and-round-half-to-even for
//! Uint8Clamped, f32 truncation for Float32.

mod data;

pub use data::{TypedArrayHeapData, TypedArrayKind};

use core::ops::{Index, IndexMut};

use crate::{
    ecmascript::{
        abstract_operations::type_conversion::to_number,
        builtins::array_buffer::ArrayBuffer,
        execution::{Agent, JsResult},
        types::{Object, PropertyDescriptor, PropertyKey, Value},
    },
    heap::{CreateHeapData, Heap, indexes::TypedArrayIndex},
};

/// Handle to a TypedArray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedArray(TypedArrayIndex);

impl TypedArray {
    pub(crate) fn get_index(self) -> usize {
        self.0.into_index()
    }

    /// Allocates a zeroed TypedArray with its own buffer.
    pub fn create(agent: &mut Agent, kind: TypedArrayKind, length: u32) -> Self {
        let buffer = ArrayBuffer::create(agent, length as usize * kind.byte_width());
        agent.heap.create(TypedArrayHeapData {
            buffer,
            byte_offset: 0,
            array_length: length,
            kind,
        })
    }

    /// Allocates a TypedArray and stores `values` through the usual
    /// per-kind conversion.
    pub fn from_f64_slice(agent: &mut Agent, kind: TypedArrayKind, values: &[f64]) -> Self {
        let this = Self::create(agent, kind, values.len() as u32);
        for (index, value) in values.iter().enumerate() {
            this.write(agent, index as u32, *value);
        }
        this
    }

    pub fn len(self, agent: &Agent) -> u32 {
        agent[self].array_length
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        agent[self].array_length == 0
    }

    pub fn kind(self, agent: &Agent) -> TypedArrayKind {
        agent[self].kind
    }

    pub fn buffer(self, agent: &Agent) -> ArrayBuffer {
        agent[self].buffer
    }

    pub fn is_detached(self, agent: &Agent) -> bool {
        agent[self].buffer.is_detached(agent)
    }

    pub(crate) fn internal_prototype(self, agent: &Agent) -> Option<Object> {
        Some(Object::Object(
            agent
                .current_realm_record()
                .intrinsics()
                .typed_array_prototype(),
        ))
    }

    /// Reads element `index`; the caller has checked attachment and
    /// range.
    pub fn read(self, agent: &Agent, index: u32) -> Value {
        let data = &agent[self];
        debug_assert!(!data.buffer.is_detached(agent) && index < data.array_length);
        let offset = data.byte_offset + index as usize * data.kind.byte_width();
        let buffer = agent[data.buffer].data.as_ref().unwrap();
        match data.kind {
            TypedArrayKind::Int8 => Value::Integer(buffer[offset] as i8 as i64),
            TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => {
                Value::Integer(buffer[offset] as i64)
            }
            TypedArrayKind::Int16 => {
                let raw = i16::from_le_bytes([buffer[offset], buffer[offset + 1]]);
                Value::Integer(raw as i64)
            }
            TypedArrayKind::Uint16 => {
                let raw = u16::from_le_bytes([buffer[offset], buffer[offset + 1]]);
                Value::Integer(raw as i64)
            }
            TypedArrayKind::Int32 => {
                let raw = i32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap());
                Value::Integer(raw as i64)
            }
            TypedArrayKind::Uint32 => {
                let raw = u32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap());
                Value::Integer(raw as i64)
            }
            TypedArrayKind::Float32 => {
                let raw = f32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap());
                Value::from_f64(raw as f64)
            }
            TypedArrayKind::Float64 => {
                let raw = f64::from_le_bytes(buffer[offset..offset + 8].try_into().unwrap());
                Value::from_f64(raw)
            }
        }
    }

    /// Converts and stores `number` at element `index`; the caller has
    /// checked attachment and range.
    pub fn write(self, agent: &mut Agent, index: u32, number: f64) {
        let data = &agent[self];
        debug_assert!(index < data.array_length);
        let kind = data.kind;
        let offset = data.byte_offset + index as usize * kind.byte_width();
        let buffer_handle = data.buffer;
        let buffer = agent[buffer_handle].data.as_mut().unwrap();
        match kind {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 => {
                buffer[offset] = to_modular_int(number, 8) as u8;
            }
            TypedArrayKind::Uint8Clamped => {
                buffer[offset] = to_uint8_clamped(number);
            }
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => {
                let raw = to_modular_int(number, 16) as u16;
                buffer[offset..offset + 2].copy_from_slice(&raw.to_le_bytes());
            }
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 => {
                let raw = to_modular_int(number, 32) as u32;
                buffer[offset..offset + 4].copy_from_slice(&raw.to_le_bytes());
            }
            TypedArrayKind::Float32 => {
                let raw = number as f32;
                buffer[offset..offset + 4].copy_from_slice(&raw.to_le_bytes());
            }
            TypedArrayKind::Float64 => {
                buffer[offset..offset + 8].copy_from_slice(&number.to_le_bytes());
            }
        }
    }

    /// ### [10.4.5.4 \[\[Get\]\] ( P, Receiver )](https://tc39.es/ecma262/#sec-typedarray-get)
    ///
    /// A canonical numeric index on a detached or out-of-range view
    /// reads `undefined`; nothing else is modelled on a TypedArray.
    pub(crate) fn internal_get(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        _receiver: Value,
    ) -> JsResult<Value> {
        if key == PropertyKey::String(agent.heap.well_known.length) {
            return Ok(Value::from(if self.is_detached(agent) {
                0
            } else {
                self.len(agent)
            }));
        }
        if let PropertyKey::Integer(index) = key {
            if self.is_detached(agent) || !(0..self.len(agent) as i64).contains(&index) {
                return Ok(Value::Undefined);
            }
            return Ok(self.read(agent, index as u32));
        }
        match self.internal_prototype(agent) {
            Some(prototype) => prototype.internal_get(agent, key, _receiver),
            None => Ok(Value::Undefined),
        }
    }

    /// ### [10.4.5.5 \[\[Set\]\] ( P, V, Receiver )](https://tc39.es/ecma262/#sec-typedarray-set)
    ///
    /// Out-of-range and detached writes succeed without storing.
    pub(crate) fn internal_set(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        value: Value,
    ) -> JsResult<bool> {
        if let PropertyKey::Integer(index) = key {
            let number = to_number(agent, value)?;
            if !self.is_detached(agent) && (0..self.len(agent) as i64).contains(&index) {
                self.write(agent, index as u32, number);
            }
            return Ok(true);
        }
        Ok(false)
    }

    pub(crate) fn internal_has_property(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        if let PropertyKey::Integer(index) = key {
            return Ok(!self.is_detached(agent) && (0..self.len(agent) as i64).contains(&index));
        }
        match self.internal_prototype(agent) {
            Some(prototype) => prototype.internal_has_property(agent, key),
            None => Ok(false),
        }
    }

    pub(crate) fn internal_get_own_property(
        self,
        agent: &Agent,
        key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        if let PropertyKey::Integer(index) = key {
            if self.is_detached(agent) || !(0..self.len(agent) as i64).contains(&index) {
                return None;
            }
            return Some(PropertyDescriptor {
                value: Some(self.read(agent, index as u32)),
                writable: Some(true),
                enumerable: Some(true),
                configurable: Some(true),
                ..Default::default()
            });
        }
        None
    }
}

/// Integer conversion shared by the wrapping kinds: truncate, then
/// wrap modulo 2^bits. NaN and infinities store 0.
fn to_modular_int(number: f64, bits: u32) -> u64 {
    if !number.is_finite() || number == 0.0 {
        return 0;
    }
    let modulus = (1u64 << bits) as f64;
    number.trunc().rem_euclid(modulus) as u64
}

/// ### [7.1.12 ToUint8Clamp ( argument )](https://tc39.es/ecma262/#sec-touint8clamp)
fn to_uint8_clamped(number: f64) -> u8 {
    if number.is_nan() {
        return 0;
    }
    number.clamp(0.0, 255.0).round_ties_even() as u8
}

impl From<TypedArray> for Value {
    fn from(value: TypedArray) -> Self {
        Value::TypedArray(value)
    }
}

impl Index<TypedArray> for Agent {
    type Output = TypedArrayHeapData;

    fn index(&self, index: TypedArray) -> &Self::Output {
        &self.heap.typed_arrays[index.get_index()]
    }
}

impl IndexMut<TypedArray> for Agent {
    fn index_mut(&mut self, index: TypedArray) -> &mut Self::Output {
        &mut self.heap.typed_arrays[index.get_index()]
    }
}

impl CreateHeapData<TypedArrayHeapData, TypedArray> for Heap {
    fn create(&mut self, data: TypedArrayHeapData) -> TypedArray {
        self.typed_arrays.push(data);
        TypedArray(TypedArrayIndex::last(&self.typed_arrays))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint8_clamped_rounds_half_to_even() {
        assert_eq!(to_uint8_clamped(0.5), 0);
        assert_eq!(to_uint8_clamped(1.5), 2);
        assert_eq!(to_uint8_clamped(2.5), 2);
        assert_eq!(to_uint8_clamped(-3.0), 0);
        assert_eq!(to_uint8_clamped(300.0), 255);
        assert_eq!(to_uint8_clamped(f64::NAN), 0);
    }

    #[test]
    fn integer_kinds_wrap_modulo() {
        assert_eq!(to_modular_int(-1.0, 8), 255);
        assert_eq!(to_modular_int(258.0, 8), 2);
        assert_eq!(to_modular_int(f64::NAN, 32), 0);
        assert_eq!(to_modular_int(f64::INFINITY, 16), 0);
        assert_eq!(to_modular_int(-2.9, 8), 254);
    }
}
