// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{execution::Agent, types::HeapString};

/// A property key: an integer index or an interned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Integer(i64),
    String(HeapString),
}

impl PropertyKey {
    pub fn from_str(agent: &mut Agent, key: &str) -> Self {
        PropertyKey::String(HeapString::from_str(agent, key))
    }

    /// True for keys in the array index range `0..=2^32 - 2`.
    pub fn is_array_index(self) -> bool {
        matches!(self, PropertyKey::Integer(index)
            if (0..=(u32::MAX as i64 - 1)).contains(&index))
    }
}

impl From<u32> for PropertyKey {
    fn from(value: u32) -> Self {
        PropertyKey::Integer(value as i64)
    }
}

impl From<i64> for PropertyKey {
    fn from(value: i64) -> Self {
        PropertyKey::Integer(value)
    }
}

impl From<HeapString> for PropertyKey {
    fn from(value: HeapString) -> Self {
        PropertyKey::String(value)
    }
}
