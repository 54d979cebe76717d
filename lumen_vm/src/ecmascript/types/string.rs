// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::execution::Agent,
    heap::indexes::StringIndex,
};

/// Handle to an interned heap string.
///
/// Strings are interned on allocation, so handle equality is string
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapString(StringIndex);

impl HeapString {
    pub(crate) const fn from_u32_index(value: u32) -> Self {
        Self(StringIndex::from_u32_index(value))
    }

    pub(crate) fn from_string_index(index: StringIndex) -> Self {
        Self(index)
    }

    pub(crate) fn get_index(self) -> usize {
        self.0.into_index()
    }

    pub fn from_str(agent: &mut Agent, string: &str) -> Self {
        agent.heap.alloc_string(string)
    }

    pub fn as_str(self, agent: &Agent) -> &str {
        agent.heap.string(self)
    }
}
