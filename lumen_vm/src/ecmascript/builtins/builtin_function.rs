// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::ops::{Deref, Index, IndexMut};

use crate::{
    ecmascript::{
        execution::{Agent, JsResult},
        types::{HeapString, Value},
    },
    heap::{CreateHeapData, Heap, indexes::BuiltinFunctionIndex},
};

/// Positional arguments of a call; indexing past the end yields
/// `undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentsList<'a>(pub(crate) &'a [Value]);

impl<'a> Deref for ArgumentsList<'a> {
    type Target = &'a [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> ArgumentsList<'a> {
    pub fn new(arguments: &'a [Value]) -> Self {
        Self(arguments)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Value {
        *self.0.get(index).unwrap_or(&Value::Undefined)
    }
}

pub type RegularFn = fn(&mut Agent, Value, ArgumentsList<'_>) -> JsResult<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Regular(RegularFn),
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinFunctionHeapData {
    pub behaviour: Behaviour,
    pub length: u8,
    pub initial_name: Option<HeapString>,
}

/// Handle to a builtin (or host-supplied) function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuiltinFunction(BuiltinFunctionIndex);

impl BuiltinFunction {
    pub(crate) fn get_index(self) -> usize {
        self.0.into_index()
    }

    /// Creates a callable the engine can invoke; hosts and tests use
    /// this to build callbacks and custom constructors.
    pub fn create(agent: &mut Agent, behaviour: RegularFn, length: u8, name: &str) -> Self {
        let name = agent.heap.alloc_string(name);
        agent.heap.create(BuiltinFunctionHeapData {
            behaviour: Behaviour::Regular(behaviour),
            length,
            initial_name: Some(name),
        })
    }
}

impl From<BuiltinFunction> for Value {
    fn from(value: BuiltinFunction) -> Self {
        Value::BuiltinFunction(value)
    }
}

impl Index<BuiltinFunction> for Agent {
    type Output = BuiltinFunctionHeapData;

    fn index(&self, index: BuiltinFunction) -> &Self::Output {
        &self.heap.builtin_functions[index.get_index()]
    }
}

impl IndexMut<BuiltinFunction> for Agent {
    fn index_mut(&mut self, index: BuiltinFunction) -> &mut Self::Output {
        &mut self.heap.builtin_functions[index.get_index()]
    }
}

impl CreateHeapData<BuiltinFunctionHeapData, BuiltinFunction> for Heap {
    fn create(&mut self, data: BuiltinFunctionHeapData) -> BuiltinFunction {
        self.builtin_functions.push(data);
        BuiltinFunction(BuiltinFunctionIndex::last(&self.builtin_functions))
    }
}
