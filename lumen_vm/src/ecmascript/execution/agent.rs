// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    ecmascript::{execution::Realm, types::HeapString},
    heap::Heap,
};

#[derive(Debug, Default)]
pub struct Options {}

pub type JsResult<T> = std::result::Result<T, JsError>;

/// A thrown language-level exception.
///
/// Exceptions travel on the `Err` channel and are checked with `?`
/// after every operation that can run user code; nothing in this layer
/// is fatal to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsError {
    kind: ExceptionType,
    message: HeapString,
}

impl JsError {
    pub fn kind(self) -> ExceptionType {
        self.kind
    }

    pub fn message(self, agent: &Agent) -> &str {
        self.message.as_str(agent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    RangeError,
    ReferenceError,
    TypeError,
}

/// The engine's execution context: owns the heap and the single realm.
///
/// Execution is single-threaded and synchronous; the only re-entrancy
/// is user callbacks invoked from inside built-in fast paths.
#[derive(Debug)]
pub struct Agent {
    pub heap: Heap,
    pub(crate) realm: Realm,
    pub options: Options,
}

impl Agent {
    pub fn new(options: Options) -> Self {
        let mut heap = Heap::new();
        let realm = Realm::initialize(&mut heap);
        Self {
            heap,
            realm,
            options,
        }
    }

    pub fn current_realm_record(&self) -> &Realm {
        &self.realm
    }

    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        let message = self.heap.alloc_string(message);
        JsError { kind, message }
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
