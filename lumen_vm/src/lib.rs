// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A fast-path engine for the built-in Array and TypedArray methods.
//!
//! Each method entry point checks a short-circuiting guard chain over
//! the receiver's shape (element kind, stability, length writability,
//! constructor identity) and, while the guards hold, runs directly on
//! element storage; otherwise it falls back to the generic spec-step
//! path over the object protocol. Callback re-entrancy is handled by
//! re-validating the guards after every return and delegating the
//! remaining index range to the generic path on de-specialization.

pub mod ecmascript;
pub mod heap;
