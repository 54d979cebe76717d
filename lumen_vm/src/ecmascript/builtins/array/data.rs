// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{ecmascript::types::OrdinaryObject, heap::element_array::ElementsVector};

/// An Array's heap data.
///
/// Index properties live in `elements`; everything else, including any
/// index that stops being a plain data property, lives in the backing
/// object. `stable` is true while own-property behavior is exactly
/// "dense data properties 0..len"; it flips false on prototype
/// replacement, on a non-default index or `length` descriptor, or on
/// the dictionary transition, and never flips back.
#[derive(Debug, Default)]
pub struct ArrayHeapData {
    pub object_index: Option<OrdinaryObject>,
    pub elements: ElementsVector,
    pub stable: bool,
}

impl ArrayHeapData {
    pub fn new(elements: ElementsVector) -> Self {
        Self {
            object_index: None,
            elements,
            stable: true,
        }
    }
}
