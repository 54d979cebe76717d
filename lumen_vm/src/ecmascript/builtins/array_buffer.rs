// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::ops::{Index, IndexMut};

use crate::{
    ecmascript::{execution::Agent, types::Value},
    heap::{CreateHeapData, Heap, indexes::ArrayBufferIndex},
};

/// An ArrayBuffer's heap data; `None` bytes mean detached.
#[derive(Debug, Default)]
pub struct ArrayBufferHeapData {
    pub data: Option<Vec<u8>>,
}

/// Handle to an ArrayBuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayBuffer(ArrayBufferIndex);

impl ArrayBuffer {
    pub(crate) fn get_index(self) -> usize {
        self.0.into_index()
    }

    /// ### [25.1.3.1 AllocateArrayBuffer ( constructor, byteLength )](https://tc39.es/ecma262/#sec-allocatearraybuffer)
    pub fn create(agent: &mut Agent, byte_length: usize) -> Self {
        agent.heap.create(ArrayBufferHeapData {
            data: Some(vec![0; byte_length]),
        })
    }

    /// ### [25.1.3.5 DetachArrayBuffer ( arrayBuffer \[ , key \] )](https://tc39.es/ecma262/#sec-detacharraybuffer)
    pub fn detach(self, agent: &mut Agent) {
        agent[self].data = None;
    }

    pub fn is_detached(self, agent: &Agent) -> bool {
        agent[self].data.is_none()
    }
}

impl From<ArrayBuffer> for Value {
    fn from(value: ArrayBuffer) -> Self {
        Value::ArrayBuffer(value)
    }
}

impl Index<ArrayBuffer> for Agent {
    type Output = ArrayBufferHeapData;

    fn index(&self, index: ArrayBuffer) -> &Self::Output {
        &self.heap.array_buffers[index.get_index()]
    }
}

impl IndexMut<ArrayBuffer> for Agent {
    fn index_mut(&mut self, index: ArrayBuffer) -> &mut Self::Output {
        &mut self.heap.array_buffers[index.get_index()]
    }
}

impl CreateHeapData<ArrayBufferHeapData, ArrayBuffer> for Heap {
    fn create(&mut self, data: ArrayBufferHeapData) -> ArrayBuffer {
        self.array_buffers.push(data);
        ArrayBuffer(ArrayBufferIndex::last(&self.array_buffers))
    }
}
