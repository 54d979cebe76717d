// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod element_array;
pub mod indexes;

use hashbrown::HashMap;

use crate::ecmascript::{
    builtins::{
        array::ArrayHeapData, array_buffer::ArrayBufferHeapData,
        builtin_function::BuiltinFunctionHeapData, typed_array::TypedArrayHeapData,
    },
    types::{HeapString, ObjectHeapData},
};

use indexes::StringIndex;

/// Strings the engine itself needs to name; interned once at heap
/// creation so comparisons are handle comparisons.
#[derive(Debug, Clone, Copy)]
pub struct WellKnownStrings {
    pub length: HeapString,
    pub constructor: HeapString,
    pub value_of: HeapString,
    pub undefined: HeapString,
    pub null: HeapString,
    pub r#true: HeapString,
    pub r#false: HeapString,
    pub nan: HeapString,
    pub infinity: HeapString,
    pub neg_infinity: HeapString,
}

/// Owner of all heap-allocated language values.
///
/// Handles are indexes into these vectors; nothing is ever removed, so
/// handles stay valid for the lifetime of the heap. Reclamation is the
/// surrounding embedder's concern, not this engine's.
#[derive(Debug)]
pub struct Heap {
    pub strings: Vec<Box<str>>,
    pub objects: Vec<ObjectHeapData>,
    pub arrays: Vec<ArrayHeapData>,
    pub array_buffers: Vec<ArrayBufferHeapData>,
    pub typed_arrays: Vec<TypedArrayHeapData>,
    pub builtin_functions: Vec<BuiltinFunctionHeapData>,
    string_lookup: HashMap<Box<str>, HeapString>,
    pub well_known: WellKnownStrings,
}

/// Allocates `data` into the heap, returning a handle of type `F`.
pub trait CreateHeapData<T, F> {
    fn create(&mut self, data: T) -> F;
}

impl Heap {
    pub fn new() -> Self {
        let mut heap = Self {
            strings: Vec::with_capacity(64),
            objects: Vec::new(),
            arrays: Vec::new(),
            array_buffers: Vec::new(),
            typed_arrays: Vec::new(),
            builtin_functions: Vec::new(),
            string_lookup: HashMap::new(),
            // Placeholder handles, replaced immediately below.
            well_known: WellKnownStrings {
                length: HeapString::from_u32_index(0),
                constructor: HeapString::from_u32_index(0),
                value_of: HeapString::from_u32_index(0),
                undefined: HeapString::from_u32_index(0),
                null: HeapString::from_u32_index(0),
                r#true: HeapString::from_u32_index(0),
                r#false: HeapString::from_u32_index(0),
                nan: HeapString::from_u32_index(0),
                infinity: HeapString::from_u32_index(0),
                neg_infinity: HeapString::from_u32_index(0),
            },
        };
        heap.well_known = WellKnownStrings {
            length: heap.alloc_string("length"),
            constructor: heap.alloc_string("constructor"),
            value_of: heap.alloc_string("valueOf"),
            undefined: heap.alloc_string("undefined"),
            null: heap.alloc_string("null"),
            r#true: heap.alloc_string("true"),
            r#false: heap.alloc_string("false"),
            nan: heap.alloc_string("NaN"),
            infinity: heap.alloc_string("Infinity"),
            neg_infinity: heap.alloc_string("-Infinity"),
        };
        heap
    }

    /// Interns `string`, so equal strings always share a handle.
    pub fn alloc_string(&mut self, string: &str) -> HeapString {
        if let Some(existing) = self.string_lookup.get(string) {
            return *existing;
        }
        self.strings.push(string.into());
        let handle = HeapString::from_string_index(StringIndex::last(&self.strings));
        self.string_lookup.insert(string.into(), handle);
        handle
    }

    pub fn string(&self, handle: HeapString) -> &str {
        &self.strings[handle.get_index()]
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
