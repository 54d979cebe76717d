// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Array element storage.
//!
//! An array's backing store carries an [ElementsKind] describing how the
//! elements are physically encoded: packed 64-bit integers, packed
//! doubles, their has-hole variants, tagged values, or a sparse
//! dictionary. Kinds only ever widen over the lifetime of an array; a
//! write that does not fit the current kind transitions the kind and
//! re-materializes the storage in the new encoding.
//!
//! Storage is shared copy-on-write: cloning an [ElementsVector] is cheap
//! and aliases the backing store, and every mutation goes through
//! [ElementsVector::storage_mut] which clones first if the store is
//! shared.

use std::rc::Rc;

use ahash::AHashMap;

use crate::ecmascript::types::Value;

/// One past the largest valid array index; also the largest array length.
pub const MAX_ARRAY_LENGTH: u64 = (1 << 32) - 1;

/// Capacity classes for element storage.
///
/// Backing stores are sized to one of these buckets so that repeated
/// pushes do not chronically reallocate, and pops do not chronically
/// shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElementArrayKey {
    Empty,
    /// up to 16 elements
    E4,
    /// up to 64 elements
    E6,
    /// up to 256 elements
    E8,
    /// up to 1024 elements
    E10,
    /// up to 4096 elements
    E12,
    /// up to 65536 elements
    E16,
    /// up to 16777216 elements
    E24,
    /// up to 4294967296 elements
    E32,
}

impl ElementArrayKey {
    pub fn cap(self) -> usize {
        match self {
            ElementArrayKey::Empty => 0,
            ElementArrayKey::E4 => usize::pow(2, 4),
            ElementArrayKey::E6 => usize::pow(2, 6),
            ElementArrayKey::E8 => usize::pow(2, 8),
            ElementArrayKey::E10 => usize::pow(2, 10),
            ElementArrayKey::E12 => usize::pow(2, 12),
            ElementArrayKey::E16 => usize::pow(2, 16),
            ElementArrayKey::E24 => usize::pow(2, 24),
            ElementArrayKey::E32 => usize::pow(2, 32),
        }
    }

    fn ordinal(self) -> u8 {
        match self {
            ElementArrayKey::Empty => 0,
            ElementArrayKey::E4 => 1,
            ElementArrayKey::E6 => 2,
            ElementArrayKey::E8 => 3,
            ElementArrayKey::E10 => 4,
            ElementArrayKey::E12 => 5,
            ElementArrayKey::E16 => 6,
            ElementArrayKey::E24 => 7,
            ElementArrayKey::E32 => 8,
        }
    }
}

impl From<usize> for ElementArrayKey {
    fn from(value: usize) -> Self {
        if value == 0 {
            ElementArrayKey::Empty
        } else if value <= usize::pow(2, 4) {
            ElementArrayKey::E4
        } else if value <= usize::pow(2, 6) {
            ElementArrayKey::E6
        } else if value <= usize::pow(2, 8) {
            ElementArrayKey::E8
        } else if value <= usize::pow(2, 10) {
            ElementArrayKey::E10
        } else if value <= usize::pow(2, 12) {
            ElementArrayKey::E12
        } else if value <= usize::pow(2, 16) {
            ElementArrayKey::E16
        } else if value <= usize::pow(2, 24) {
            ElementArrayKey::E24
        } else if value as u64 <= MAX_ARRAY_LENGTH {
            ElementArrayKey::E32
        } else {
            panic!("Elements array length over 2 ** 32 - 1");
        }
    }
}

/// The lattice of backing-storage representations.
///
/// ```text
/// Generic < { Int, Number } < { HoleInt, HoleNumber } < Tagged
/// ```
///
/// with `Dictionary` as a terminal element above everything. `Generic`
/// is the entry state of a fresh array with no representative writes
/// yet. Kinds never narrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementsKind {
    Generic,
    Int,
    Number,
    HoleInt,
    HoleNumber,
    Tagged,
    Dictionary,
}

impl ElementsKind {
    /// The narrowest kind able to hold `value`.
    pub fn of_value(value: Value) -> Self {
        match value {
            Value::Integer(_) => ElementsKind::Int,
            Value::Float(_) => ElementsKind::Number,
            _ => ElementsKind::Tagged,
        }
    }

    /// Least upper bound of two kinds; the widening function.
    pub fn widen(self, other: Self) -> Self {
        use ElementsKind::*;
        match (self, other) {
            (Dictionary, _) | (_, Dictionary) => Dictionary,
            (Tagged, _) | (_, Tagged) => Tagged,
            (Generic, k) | (k, Generic) => k,
            (Int, Int) => Int,
            (Number, Number) | (Int, Number) | (Number, Int) => Number,
            (HoleInt, HoleInt) | (HoleInt, Int) | (Int, HoleInt) => HoleInt,
            (HoleNumber, HoleNumber)
            | (HoleNumber, HoleInt)
            | (HoleInt, HoleNumber)
            | (HoleNumber, Int)
            | (Int, HoleNumber)
            | (HoleNumber, Number)
            | (Number, HoleNumber)
            | (HoleInt, Number)
            | (Number, HoleInt) => HoleNumber,
        }
    }

    /// The nearest kind above `self` that can represent a hole.
    pub fn with_hole(self) -> Self {
        match self {
            ElementsKind::Generic => ElementsKind::Tagged,
            ElementsKind::Int => ElementsKind::HoleInt,
            ElementsKind::Number => ElementsKind::HoleNumber,
            other => other,
        }
    }

    /// Packed kinds cannot contain holes.
    pub fn is_packed(self) -> bool {
        matches!(
            self,
            ElementsKind::Generic | ElementsKind::Int | ElementsKind::Number
        )
    }

    pub fn is_dictionary(self) -> bool {
        matches!(self, ElementsKind::Dictionary)
    }

    /// True if `self` is below or equal to `other` in the lattice.
    pub fn le(self, other: Self) -> bool {
        self.widen(other) == other
    }
}

/// Physical element storage, one variant per encoding.
///
/// `None` slots in the holey and tagged variants are holes: missing
/// elements, distinct from `undefined`.
#[derive(Debug, Clone)]
pub enum ElementStorage {
    Int(Vec<i64>),
    Number(Vec<f64>),
    HoleInt(Vec<Option<i64>>),
    HoleNumber(Vec<Option<f64>>),
    Tagged(Vec<Option<Value>>),
    Dictionary(AHashMap<u32, Value>),
}

impl ElementStorage {
    fn with_capacity(kind: ElementsKind, cap: usize) -> Self {
        match kind {
            ElementsKind::Generic | ElementsKind::Tagged => {
                ElementStorage::Tagged(Vec::with_capacity(cap))
            }
            ElementsKind::Int => ElementStorage::Int(Vec::with_capacity(cap)),
            ElementsKind::Number => ElementStorage::Number(Vec::with_capacity(cap)),
            ElementsKind::HoleInt => ElementStorage::HoleInt(Vec::with_capacity(cap)),
            ElementsKind::HoleNumber => ElementStorage::HoleNumber(Vec::with_capacity(cap)),
            ElementsKind::Dictionary => ElementStorage::Dictionary(AHashMap::new()),
        }
    }

    /// Re-encode `values` in the representation of `kind`.
    ///
    /// The caller guarantees every value fits the target kind; this is
    /// only reachable through a widening transition.
    fn encode(values: &[Option<Value>], kind: ElementsKind) -> Self {
        let cap = ElementArrayKey::from(values.len()).cap();
        let mut storage = ElementStorage::with_capacity(kind, cap);
        match &mut storage {
            ElementStorage::Int(vec) => {
                vec.extend(values.iter().map(|v| match v {
                    Some(Value::Integer(i)) => *i,
                    _ => unreachable!("non-integer in Int transition"),
                }));
            }
            ElementStorage::Number(vec) => {
                vec.extend(values.iter().map(|v| match v {
                    Some(Value::Integer(i)) => *i as f64,
                    Some(Value::Float(f)) => *f,
                    _ => unreachable!("non-number in Number transition"),
                }));
            }
            ElementStorage::HoleInt(vec) => {
                vec.extend(values.iter().map(|v| match v {
                    Some(Value::Integer(i)) => Some(*i),
                    None => None,
                    _ => unreachable!("non-integer in HoleInt transition"),
                }));
            }
            ElementStorage::HoleNumber(vec) => {
                vec.extend(values.iter().map(|v| match v {
                    Some(Value::Integer(i)) => Some(*i as f64),
                    Some(Value::Float(f)) => Some(*f),
                    None => None,
                    _ => unreachable!("non-number in HoleNumber transition"),
                }));
            }
            ElementStorage::Tagged(vec) => {
                vec.extend(values.iter().copied());
            }
            ElementStorage::Dictionary(map) => {
                for (index, value) in values.iter().enumerate() {
                    if let Some(value) = value {
                        map.insert(index as u32, *value);
                    }
                }
            }
        }
        storage
    }

    fn vec_capacity(&self) -> usize {
        match self {
            ElementStorage::Int(vec) => vec.capacity(),
            ElementStorage::Number(vec) => vec.capacity(),
            ElementStorage::HoleInt(vec) => vec.capacity(),
            ElementStorage::HoleNumber(vec) => vec.capacity(),
            ElementStorage::Tagged(vec) => vec.capacity(),
            ElementStorage::Dictionary(_) => usize::MAX,
        }
    }
}

/// An array's element storage: logical length, length writability, and
/// a shared backing store.
#[derive(Debug, Clone)]
pub struct ElementsVector {
    storage: Rc<ElementStorage>,
    kind: ElementsKind,
    len: u32,
    pub(crate) len_writable: bool,
}

impl Default for ElementsVector {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementsVector {
    pub fn new() -> Self {
        Self {
            storage: Rc::new(ElementStorage::Tagged(Vec::new())),
            kind: ElementsKind::Generic,
            len: 0,
            len_writable: true,
        }
    }

    /// An empty vector with storage reserved for `len` elements.
    pub fn with_capacity(len: u32) -> Self {
        let cap = ElementArrayKey::from(len as usize).cap();
        Self {
            storage: Rc::new(ElementStorage::Tagged(Vec::with_capacity(cap))),
            kind: ElementsKind::Generic,
            len: 0,
            len_writable: true,
        }
    }

    pub fn from_values(values: &[Value]) -> Self {
        let kind = values
            .iter()
            .fold(ElementsKind::Generic, |kind, v| {
                kind.widen(ElementsKind::of_value(*v))
            });
        let tagged: Vec<Option<Value>> = values.iter().map(|v| Some(*v)).collect();
        Self {
            storage: Rc::new(ElementStorage::encode(&tagged, kind)),
            kind,
            len: values.len() as u32,
            len_writable: true,
        }
    }

    /// Builds a vector from a slice where `None` entries are holes.
    pub fn from_optional_values(values: &[Option<Value>]) -> Self {
        let kind = values.iter().fold(ElementsKind::Generic, |kind, v| match v {
            Some(v) => kind.widen(ElementsKind::of_value(*v)),
            None => kind.with_hole(),
        });
        Self {
            storage: Rc::new(ElementStorage::encode(values, kind)),
            kind,
            len: values.len() as u32,
            len_writable: true,
        }
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn kind(&self) -> ElementsKind {
        self.kind
    }

    /// True while the backing store is aliased by another array.
    pub fn is_cow(&self) -> bool {
        Rc::strong_count(&self.storage) > 1
    }

    pub fn storage(&self) -> &ElementStorage {
        &self.storage
    }

    /// The copy-before-write utility: every mutation funnels through
    /// here, cloning the backing store first when it is shared.
    pub(crate) fn storage_mut(&mut self) -> &mut ElementStorage {
        Rc::make_mut(&mut self.storage)
    }

    /// Reads the element at `index`; `None` is a hole.
    pub fn get(&self, index: u32) -> Option<Value> {
        if index >= self.len {
            return None;
        }
        let index = index as usize;
        match &*self.storage {
            ElementStorage::Int(vec) => Some(Value::Integer(vec[index])),
            ElementStorage::Number(vec) => Some(Value::from_f64(vec[index])),
            ElementStorage::HoleInt(vec) => vec[index].map(Value::Integer),
            ElementStorage::HoleNumber(vec) => vec[index].map(Value::from_f64),
            ElementStorage::Tagged(vec) => vec[index],
            ElementStorage::Dictionary(map) => map.get(&(index as u32)).copied(),
        }
    }

    /// Writes `value` at `index < len`, widening the kind first when the
    /// value does not fit the current encoding.
    pub fn set(&mut self, index: u32, value: Value) {
        debug_assert!(index < self.len);
        let target = self.kind.widen(ElementsKind::of_value(value));
        if target != self.kind {
            self.convert(target);
        }
        let index = index as usize;
        match (self.storage_mut(), value) {
            (ElementStorage::Int(vec), Value::Integer(i)) => vec[index] = i,
            (ElementStorage::Number(vec), Value::Integer(i)) => vec[index] = i as f64,
            (ElementStorage::Number(vec), Value::Float(f)) => vec[index] = f,
            (ElementStorage::HoleInt(vec), Value::Integer(i)) => vec[index] = Some(i),
            (ElementStorage::HoleNumber(vec), Value::Integer(i)) => vec[index] = Some(i as f64),
            (ElementStorage::HoleNumber(vec), Value::Float(f)) => vec[index] = Some(f),
            (ElementStorage::Tagged(vec), value) => vec[index] = Some(value),
            (ElementStorage::Dictionary(map), value) => {
                map.insert(index as u32, value);
            }
            _ => unreachable!("storage kind out of sync with widened kind"),
        }
    }

    /// Punches a hole at `index`, widening to a holey kind if needed.
    pub fn set_hole(&mut self, index: u32) {
        debug_assert!(index < self.len);
        let target = self.kind.with_hole();
        if target != self.kind {
            self.convert(target);
        }
        let index = index as usize;
        match self.storage_mut() {
            ElementStorage::HoleInt(vec) => vec[index] = None,
            ElementStorage::HoleNumber(vec) => vec[index] = None,
            ElementStorage::Tagged(vec) => vec[index] = None,
            ElementStorage::Dictionary(map) => {
                map.remove(&(index as u32));
            }
            _ => unreachable!("packed kind after with_hole widening"),
        }
    }

    /// Appends a value or hole, growing capacity to the covering bucket.
    pub fn push(&mut self, value: Option<Value>) {
        debug_assert!((self.len as u64) < MAX_ARRAY_LENGTH);
        let target = match value {
            Some(v) => self.kind.widen(ElementsKind::of_value(v)),
            None => self.kind.with_hole(),
        };
        if target != self.kind {
            self.convert(target);
        }
        self.reserve(self.len + 1);
        let len = self.len;
        match (self.storage_mut(), value) {
            (ElementStorage::Int(vec), Some(Value::Integer(i))) => vec.push(i),
            (ElementStorage::Number(vec), Some(Value::Integer(i))) => vec.push(i as f64),
            (ElementStorage::Number(vec), Some(Value::Float(f))) => vec.push(f),
            (ElementStorage::HoleInt(vec), Some(Value::Integer(i))) => vec.push(Some(i)),
            (ElementStorage::HoleInt(vec), None) => vec.push(None),
            (ElementStorage::HoleNumber(vec), Some(Value::Integer(i))) => vec.push(Some(i as f64)),
            (ElementStorage::HoleNumber(vec), Some(Value::Float(f))) => vec.push(Some(f)),
            (ElementStorage::HoleNumber(vec), None) => vec.push(None),
            (ElementStorage::Tagged(vec), value) => vec.push(value),
            (ElementStorage::Dictionary(map), value) => {
                if let Some(value) = value {
                    map.insert(len, value);
                }
            }
            _ => unreachable!("storage kind out of sync with widened kind"),
        }
        self.len += 1;
    }

    /// Grows the logical length for slots the caller overwrites before
    /// they can be observed. The kind does not change, so a packed
    /// store stays packed; the interim slot contents are meaningless.
    pub fn grow_for_overwrite(&mut self, new_len: u32) {
        debug_assert!(new_len >= self.len);
        if new_len == self.len {
            return;
        }
        self.reserve(new_len);
        let new_len_usize = new_len as usize;
        match self.storage_mut() {
            ElementStorage::Int(vec) => vec.resize(new_len_usize, 0),
            ElementStorage::Number(vec) => vec.resize(new_len_usize, 0.0),
            ElementStorage::HoleInt(vec) => vec.resize(new_len_usize, None),
            ElementStorage::HoleNumber(vec) => vec.resize(new_len_usize, None),
            ElementStorage::Tagged(vec) => vec.resize(new_len_usize, None),
            ElementStorage::Dictionary(_) => {}
        }
        // A fresh array has tagged storage; the placeholder slots must
        // not be re-encoded by a later widening.
        if self.kind == ElementsKind::Generic {
            self.kind = ElementsKind::Tagged;
        }
        self.len = new_len;
    }

    /// Grows physical capacity to the bucket covering `new_len` without
    /// changing the logical length.
    pub fn reserve(&mut self, new_len: u32) {
        let needed = ElementArrayKey::from(new_len as usize).cap();
        if self.storage.vec_capacity() >= needed {
            return;
        }
        let additional = needed - self.len as usize;
        match self.storage_mut() {
            ElementStorage::Int(vec) => vec.reserve_exact(additional),
            ElementStorage::Number(vec) => vec.reserve_exact(additional),
            ElementStorage::HoleInt(vec) => vec.reserve_exact(additional),
            ElementStorage::HoleNumber(vec) => vec.reserve_exact(additional),
            ElementStorage::Tagged(vec) => vec.reserve_exact(additional),
            ElementStorage::Dictionary(_) => {}
        }
    }

    /// Sets the logical length. Growth fills with holes (forcing a holey
    /// kind); shrinking truncates and trims capacity only once the
    /// unused tail spans at least two capacity buckets.
    pub fn set_len(&mut self, new_len: u32) {
        if new_len == self.len {
            return;
        }
        if new_len > self.len {
            if !self.kind.is_dictionary() {
                let target = self.kind.with_hole();
                if target != self.kind {
                    self.convert(target);
                }
                self.reserve(new_len);
                match self.storage_mut() {
                    ElementStorage::HoleInt(vec) => vec.resize(new_len as usize, None),
                    ElementStorage::HoleNumber(vec) => vec.resize(new_len as usize, None),
                    ElementStorage::Tagged(vec) => vec.resize(new_len as usize, None),
                    _ => unreachable!("packed kind after with_hole widening"),
                }
            }
            self.len = new_len;
            return;
        }
        let old_cap_key = ElementArrayKey::from(self.storage.vec_capacity().min(
            ElementArrayKey::E32.cap(),
        ));
        let new_cap_key = ElementArrayKey::from(new_len as usize);
        let trim = old_cap_key.ordinal().saturating_sub(new_cap_key.ordinal()) >= 2;
        match self.storage_mut() {
            ElementStorage::Int(vec) => {
                vec.truncate(new_len as usize);
                if trim {
                    vec.shrink_to(new_cap_key.cap());
                }
            }
            ElementStorage::Number(vec) => {
                vec.truncate(new_len as usize);
                if trim {
                    vec.shrink_to(new_cap_key.cap());
                }
            }
            ElementStorage::HoleInt(vec) => {
                vec.truncate(new_len as usize);
                if trim {
                    vec.shrink_to(new_cap_key.cap());
                }
            }
            ElementStorage::HoleNumber(vec) => {
                vec.truncate(new_len as usize);
                if trim {
                    vec.shrink_to(new_cap_key.cap());
                }
            }
            ElementStorage::Tagged(vec) => {
                vec.truncate(new_len as usize);
                if trim {
                    vec.shrink_to(new_cap_key.cap());
                }
            }
            ElementStorage::Dictionary(map) => {
                map.retain(|key, _| *key < new_len);
            }
        }
        self.len = new_len;
    }

    /// Falls off the deep end into sparse dictionary storage.
    pub fn convert_to_dictionary(&mut self) {
        if !self.kind.is_dictionary() {
            self.convert(ElementsKind::Dictionary);
        }
    }

    /// True if any slot within the logical length is a hole.
    pub fn has_holes(&self) -> bool {
        match &*self.storage {
            ElementStorage::Int(_) | ElementStorage::Number(_) => false,
            ElementStorage::HoleInt(vec) => vec.iter().any(|v| v.is_none()),
            ElementStorage::HoleNumber(vec) => vec.iter().any(|v| v.is_none()),
            ElementStorage::Tagged(vec) => vec.iter().any(|v| v.is_none()),
            ElementStorage::Dictionary(map) => map.len() as u32 != self.len,
        }
    }

    /// Hole-preserving copy of `[start, end)` into a fresh vector with
    /// the narrowest kind that fits the copied values.
    pub fn copy_range(&self, start: u32, end: u32) -> ElementsVector {
        debug_assert!(start <= end && end <= self.len);
        let values: Vec<Option<Value>> = (start..end).map(|i| self.get(i)).collect();
        ElementsVector::from_optional_values(&values)
    }

    /// Moves `[src_start, src_end)` to start at `dest`, handling overlap
    /// like `slice::copy_within`.
    pub fn copy_within_range(&mut self, src_start: u32, src_end: u32, dest: u32) {
        debug_assert!(src_start <= src_end && src_end <= self.len);
        debug_assert!(dest as u64 + (src_end - src_start) as u64 <= self.len as u64);
        if src_start == src_end || src_start == dest {
            return;
        }
        let (src_start, src_end, dest) = (src_start as usize, src_end as usize, dest as usize);
        match self.storage_mut() {
            ElementStorage::Int(vec) => vec.copy_within(src_start..src_end, dest),
            ElementStorage::Number(vec) => vec.copy_within(src_start..src_end, dest),
            ElementStorage::HoleInt(vec) => vec.copy_within(src_start..src_end, dest),
            ElementStorage::HoleNumber(vec) => vec.copy_within(src_start..src_end, dest),
            ElementStorage::Tagged(vec) => vec.copy_within(src_start..src_end, dest),
            ElementStorage::Dictionary(_) => {
                let moved: Vec<Option<Value>> = (src_start..src_end)
                    .map(|i| self.get(i as u32))
                    .collect();
                for (offset, value) in moved.into_iter().enumerate() {
                    let target = (dest + offset) as u32;
                    match value {
                        Some(value) => self.set(target, value),
                        None => self.set_hole(target),
                    }
                }
            }
        }
    }

    /// Writes `value` into every slot of `[start, end)`.
    pub fn fill_range(&mut self, start: u32, end: u32, value: Value) {
        debug_assert!(start <= end && end <= self.len);
        let target = self.kind.widen(ElementsKind::of_value(value));
        if target != self.kind {
            self.convert(target);
        }
        let range = start as usize..end as usize;
        match (self.storage_mut(), value) {
            (ElementStorage::Int(vec), Value::Integer(i)) => vec[range].fill(i),
            (ElementStorage::Number(vec), Value::Integer(i)) => vec[range].fill(i as f64),
            (ElementStorage::Number(vec), Value::Float(f)) => vec[range].fill(f),
            (ElementStorage::HoleInt(vec), Value::Integer(i)) => vec[range].fill(Some(i)),
            (ElementStorage::HoleNumber(vec), Value::Integer(i)) => {
                vec[range].fill(Some(i as f64))
            }
            (ElementStorage::HoleNumber(vec), Value::Float(f)) => vec[range].fill(Some(f)),
            (ElementStorage::Tagged(vec), value) => vec[range].fill(Some(value)),
            (ElementStorage::Dictionary(map), value) => {
                for index in start..end {
                    map.insert(index, value);
                }
            }
            _ => unreachable!("storage kind out of sync with widened kind"),
        }
    }

    /// In-place reversal; holes swap like any other slot.
    pub fn reverse_in_place(&mut self) {
        let len = self.len as usize;
        match self.storage_mut() {
            ElementStorage::Int(vec) => vec[..len].reverse(),
            ElementStorage::Number(vec) => vec[..len].reverse(),
            ElementStorage::HoleInt(vec) => vec[..len].reverse(),
            ElementStorage::HoleNumber(vec) => vec[..len].reverse(),
            ElementStorage::Tagged(vec) => vec[..len].reverse(),
            ElementStorage::Dictionary(map) => {
                let last = len as u32 - 1;
                let reversed: AHashMap<u32, Value> =
                    map.drain().map(|(key, value)| (last - key, value)).collect();
                *map = reversed;
            }
        }
    }

    fn convert(&mut self, target: ElementsKind) {
        debug_assert!(self.kind.le(target) && self.kind != target);
        let values: Vec<Option<Value>> = (0..self.len).map(|i| self.get(i)).collect();
        self.storage = Rc::new(ElementStorage::encode(&values, target));
        self.kind = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_is_monotone_and_idempotent() {
        use ElementsKind::*;
        let kinds = [Generic, Int, Number, HoleInt, HoleNumber, Tagged, Dictionary];
        for a in kinds {
            assert_eq!(a.widen(a), a);
            for b in kinds {
                let w = a.widen(b);
                assert_eq!(w, b.widen(a));
                assert!(a.le(w));
                assert!(b.le(w));
            }
        }
    }

    #[test]
    fn widening_write_preserves_existing_values() {
        let mut elements = ElementsVector::from_values(&[
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
        ]);
        assert_eq!(elements.kind(), ElementsKind::Int);
        elements.set(1, Value::Float(1.5));
        assert_eq!(elements.kind(), ElementsKind::Number);
        assert_eq!(elements.get(0), Some(Value::Integer(1)));
        assert_eq!(elements.get(1), Some(Value::Float(1.5)));
        assert_eq!(elements.get(2), Some(Value::Integer(3)));
        elements.set(2, Value::Null);
        assert_eq!(elements.kind(), ElementsKind::Tagged);
        assert_eq!(elements.get(2), Some(Value::Null));
    }

    #[test]
    fn hole_requires_holey_kind() {
        let mut elements = ElementsVector::from_values(&[Value::Integer(7), Value::Integer(8)]);
        assert!(elements.kind().is_packed());
        elements.set_hole(0);
        assert_eq!(elements.kind(), ElementsKind::HoleInt);
        assert_eq!(elements.get(0), None);
        assert_eq!(elements.get(1), Some(Value::Integer(8)));
        assert!(elements.has_holes());
    }

    #[test]
    fn capacity_follows_buckets() {
        let mut elements = ElementsVector::new();
        for i in 0..17 {
            elements.push(Some(Value::Integer(i)));
        }
        assert_eq!(elements.len(), 17);
        assert!(elements.storage().vec_capacity() >= ElementArrayKey::E6.cap());
        // Shrinking within two buckets keeps the slack.
        elements.set_len(16);
        assert!(elements.storage().vec_capacity() >= ElementArrayKey::E6.cap());
        // A deep shrink trims.
        for i in 0..300 {
            elements.push(Some(Value::Integer(i)));
        }
        elements.set_len(1);
        assert!(elements.storage().vec_capacity() < ElementArrayKey::E6.cap());
    }

    #[test]
    fn cow_clones_before_write() {
        let mut source = ElementsVector::from_values(&[Value::Integer(1), Value::Integer(2)]);
        let alias = source.clone();
        assert!(source.is_cow());
        source.set(0, Value::Integer(99));
        assert!(!source.is_cow());
        assert_eq!(source.get(0), Some(Value::Integer(99)));
        assert_eq!(alias.get(0), Some(Value::Integer(1)));
    }

    #[test]
    fn grow_for_overwrite_keeps_the_packed_kind() {
        let mut elements = ElementsVector::from_values(&[Value::Integer(1), Value::Integer(2)]);
        elements.grow_for_overwrite(4);
        assert_eq!(elements.kind(), ElementsKind::Int);
        assert_eq!(elements.len(), 4);
        elements.copy_within_range(0, 2, 2);
        elements.set(0, Value::Integer(8));
        elements.set(1, Value::Integer(9));
        assert_eq!(elements.kind(), ElementsKind::Int);
        for (index, expected) in [8, 9, 1, 2].into_iter().enumerate() {
            assert_eq!(elements.get(index as u32), Some(Value::Integer(expected)));
        }
    }

    #[test]
    fn grow_with_set_len_fills_holes() {
        let mut elements = ElementsVector::from_values(&[Value::Integer(1)]);
        elements.set_len(4);
        assert_eq!(elements.kind(), ElementsKind::HoleInt);
        assert_eq!(elements.get(0), Some(Value::Integer(1)));
        assert_eq!(elements.get(1), None);
        assert_eq!(elements.get(3), None);
    }
}
