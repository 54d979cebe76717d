// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{
        builtins::{
            builtin_function::{Behaviour, BuiltinFunction, BuiltinFunctionHeapData},
            indexed_collections::array_objects::array_constructor::array_constructor_call,
        },
        types::{Object, ObjectHeapData, ObjectProperty, OrdinaryObject, PropertyKey, Value},
    },
    heap::{CreateHeapData, Heap},
};

/// The one realm this engine hosts.
#[derive(Debug)]
pub struct Realm {
    intrinsics: Intrinsics,
}

impl Realm {
    pub(crate) fn initialize(heap: &mut Heap) -> Self {
        Self {
            intrinsics: Intrinsics::initialize(heap),
        }
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }
}

/// The intrinsic objects the array engine consults: the prototypes that
/// anchor stability checks and the default `Array` constructor identity
/// that anchors the species check.
#[derive(Debug)]
pub struct Intrinsics {
    object_prototype: OrdinaryObject,
    array_prototype: OrdinaryObject,
    typed_array_prototype: OrdinaryObject,
    array_constructor: BuiltinFunction,
}

impl Intrinsics {
    fn initialize(heap: &mut Heap) -> Self {
        let object_prototype = heap.create(ObjectHeapData::new(None));
        let array_prototype =
            heap.create(ObjectHeapData::new(Some(Object::Object(object_prototype))));
        let typed_array_prototype =
            heap.create(ObjectHeapData::new(Some(Object::Object(object_prototype))));
        let name = heap.alloc_string("Array");
        let array_constructor = heap.create(BuiltinFunctionHeapData {
            behaviour: Behaviour::Regular(array_constructor_call),
            length: 1,
            initial_name: Some(name),
        });
        // %Array.prototype%.constructor === %Array%
        let constructor_key = PropertyKey::String(heap.well_known.constructor);
        heap.objects[array_prototype.get_index()].properties.insert(
            constructor_key,
            ObjectProperty::Data {
                value: Value::BuiltinFunction(array_constructor),
                writable: true,
                enumerable: false,
                configurable: true,
            },
        );
        Self {
            object_prototype,
            array_prototype,
            typed_array_prototype,
            array_constructor,
        }
    }

    pub fn object_prototype(&self) -> OrdinaryObject {
        self.object_prototype
    }

    pub fn array_prototype(&self) -> OrdinaryObject {
        self.array_prototype
    }

    pub fn typed_array_prototype(&self) -> OrdinaryObject {
        self.typed_array_prototype
    }

    pub fn array_constructor(&self) -> BuiltinFunction {
        self.array_constructor
    }
}
