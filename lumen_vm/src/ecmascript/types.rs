// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod object;
mod property_descriptor;
mod property_key;
mod string;
mod value;

pub use object::{Object, ObjectHeapData, ObjectProperty, OrdinaryObject};
pub use property_descriptor::PropertyDescriptor;
pub use property_key::PropertyKey;
pub use string::HeapString;
pub use value::{MAX_SAFE_INTEGER, MIN_SAFE_INTEGER, Value};
