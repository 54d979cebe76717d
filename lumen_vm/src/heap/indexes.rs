// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed indexes into the [Heap](crate::heap::Heap) vectors.
//!
//! Every heap-allocated language value is referred to by a small Copy
//! handle wrapping one of these indexes. The wrapper types themselves
//! live next to the data they point at; this module only provides the
//! raw index newtypes.

use core::fmt;

macro_rules! heap_index {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) const fn from_u32_index(value: u32) -> Self {
                Self(value)
            }

            pub(crate) const fn from_index(value: usize) -> Self {
                Self(value as u32)
            }

            pub(crate) const fn into_index(self) -> usize {
                self.0 as usize
            }

            /// Index of the last item pushed to the backing vector.
            pub(crate) fn last<T>(vec: &[T]) -> Self {
                assert!(!vec.is_empty());
                Self::from_index(vec.len() - 1)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

heap_index!(StringIndex, "Index into [Heap::strings](crate::heap::Heap).");
heap_index!(ObjectIndex, "Index into [Heap::objects](crate::heap::Heap).");
heap_index!(ArrayIndex, "Index into [Heap::arrays](crate::heap::Heap).");
heap_index!(
    ArrayBufferIndex,
    "Index into [Heap::array_buffers](crate::heap::Heap)."
);
heap_index!(
    TypedArrayIndex,
    "Index into [Heap::typed_arrays](crate::heap::Heap)."
);
heap_index!(
    BuiltinFunctionIndex,
    "Index into [Heap::builtin_functions](crate::heap::Heap)."
);
