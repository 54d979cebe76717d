// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod array;
pub mod array_buffer;
pub mod builtin_function;
pub mod indexed_collections;
pub mod typed_array;

pub use array::Array;
pub use array_buffer::ArrayBuffer;
pub use builtin_function::{ArgumentsList, Behaviour, BuiltinFunction};
pub use typed_array::{TypedArray, TypedArrayKind};
