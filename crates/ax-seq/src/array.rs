//! Contiguous sequence.

use std::mem;

use ax_core::{
    Any, AxError, BoxInstanceId, Boxed, Capability, Direction, Duplicate, Iter, One, Seq, Stuff,
    Traverse, TypeInfo,
};
use ax_scope::{Handle, Runtime, ScopeId};
use tracing::trace;

use crate::init::{init, FromItem, Item};

static ARRAY: TypeInfo = TypeInfo::new(
    "one.any.box.seq.array",
    &[
        Capability::One,
        Capability::Any,
        Capability::Box,
        Capability::Seq,
        Capability::Array,
    ],
);

/// Backward sentinel position, one before index 0.
const REND: usize = usize::MAX;

/// A growable contiguous sequence.
///
/// Positions are element indices in both directions. The forward sentinel
/// sits at `len`, the backward sentinel one before index 0.
///
/// When storage runs out, capacity grows to twice its current value or to
/// the size needed, whichever is larger. This holds for push, insert and
/// a growing [`trunc`](Seq::trunc) alike.
pub struct Array<T> {
    id: BoxInstanceId,
    tr: Stuff<T>,
    items: Vec<T>,
}

impl<T: 'static> Array<T> {
    /// Create an empty array.
    pub fn new(tr: Stuff<T>) -> Self {
        Self {
            id: BoxInstanceId::next(),
            tr,
            items: Vec::new(),
        }
    }

    /// Create an empty array with room for `capacity` elements.
    pub fn with_capacity(tr: Stuff<T>, capacity: usize) -> Result<Self, AxError> {
        let mut array = Self::new(tr);
        array
            .items
            .try_reserve_exact(capacity)
            .map_err(|_| AxError::AllocFailed {
                requested: capacity,
            })?;
        Ok(array)
    }

    /// Create an empty array owned by `scope`.
    pub fn create(rt: &mut Runtime, scope: ScopeId, tr: Stuff<T>) -> Handle<Self> {
        rt.create(scope, Self::new(tr))
    }

    /// Create an array holding `items`, owned by `scope`.
    ///
    /// Nothing is attached if filling fails.
    ///
    /// # Panics
    ///
    /// If an item's type does not match the element type.
    pub fn init(
        rt: &mut Runtime,
        scope: ScopeId,
        tr: Stuff<T>,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<Handle<Self>, AxError>
    where
        T: FromItem,
    {
        let mut array = Self::new(tr);
        init(&mut array, items)?;
        Ok(rt.create(scope, array))
    }

    /// Elements in order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Allocated element capacity.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Make room for one more element.
    fn grow(&mut self) -> Result<(), AxError> {
        self.reserve_for(self.items.len() + 1)
    }

    /// Make room for `needed` elements in total, at least doubling the
    /// capacity when it has to change.
    fn reserve_for(&mut self, needed: usize) -> Result<(), AxError> {
        let len = self.items.len();
        let capacity = self.items.capacity();
        if needed <= capacity {
            return Ok(());
        }
        let target = capacity.saturating_mul(2).max(needed);
        if target > self.maxsize() {
            return Err(AxError::CapacityExceeded {
                requested: target,
                max: self.maxsize(),
            });
        }
        self.items
            .try_reserve_exact(target - len)
            .map_err(|_| AxError::AllocFailed { requested: target })?;
        trace!(from = capacity, to = target, "array grow");
        Ok(())
    }
}

impl<T> Array<T> {
    fn release_from(&mut self, start: usize) {
        let tr = self.tr;
        for value in self.items.drain(start..) {
            tr.release(value);
        }
    }
}

impl<T: 'static> One for Array<T> {
    fn type_info(&self) -> &'static TypeInfo {
        &ARRAY
    }
}

impl<T: 'static> Duplicate for Array<T> {
    fn duplicate(&self) -> Result<Self, AxError> {
        let mut copy = Self::with_capacity(self.tr, self.items.len())?;
        copy.items.extend(self.items.iter().map(|v| self.tr.dup(v)));
        Ok(copy)
    }
}

impl<T: 'static> Any for Array<T> {
    fn copy(&self) -> Result<Box<dyn Any>, AxError> {
        Ok(Box::new(self.duplicate()?))
    }

    fn take(&mut self) -> Result<Box<dyn Any>, AxError> {
        let mut moved = Self::new(self.tr);
        moved.items = mem::take(&mut self.items);
        Ok(Box::new(moved))
    }

    fn as_boxed(&self) -> Option<&dyn Boxed> {
        Some(self)
    }

    fn as_boxed_mut(&mut self) -> Option<&mut dyn Boxed> {
        Some(self)
    }
}

impl<T: 'static> Boxed for Array<T> {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn maxsize(&self) -> usize {
        isize::MAX as usize / mem::size_of::<T>().max(1)
    }

    fn clear(&mut self) {
        self.release_from(0);
    }

    fn elem_name(&self) -> &'static str {
        self.tr.name
    }
}

impl<T: 'static> Traverse for Array<T> {
    type Elem = T;
    type Pos = usize;

    fn begin(&self) -> Iter<usize> {
        Iter::new(self.id, 0, Direction::Forward)
    }

    fn end(&self) -> Iter<usize> {
        Iter::new(self.id, self.items.len(), Direction::Forward)
    }

    fn rbegin(&self) -> Iter<usize> {
        Iter::new(self.id, self.items.len().wrapping_sub(1), Direction::Backward)
    }

    fn rend(&self) -> Iter<usize> {
        Iter::new(self.id, REND, Direction::Backward)
    }

    fn advance(&self, it: &mut Iter<usize>) {
        let pos = it.pos();
        match it.direction() {
            Direction::Forward => {
                assert!(pos < self.items.len(), "advance past the end of an array");
                it.set_pos(pos + 1);
            }
            Direction::Backward => {
                assert!(pos != REND, "advance past the rend of an array");
                it.set_pos(pos.wrapping_sub(1));
            }
        }
    }

    fn get(&self, it: &Iter<usize>) -> Option<&T> {
        self.items.get(it.pos())
    }

    fn get_mut(&mut self, it: &Iter<usize>) -> Option<&mut T> {
        self.items.get_mut(it.pos())
    }

    fn elem_tr(&self) -> &Stuff<T> {
        &self.tr
    }
}

impl<T: 'static> Seq for Array<T> {
    fn construct(tr: Stuff<T>) -> Self {
        Self::new(tr)
    }

    fn push(&mut self, value: T) -> Result<(), AxError> {
        self.grow()?;
        self.items.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<T, AxError> {
        self.items.pop().ok_or(AxError::Empty)
    }

    fn invert(&mut self) {
        self.items.reverse();
    }

    fn trunc(&mut self, size: usize) -> Result<(), AxError> {
        let len = self.items.len();
        if size <= len {
            self.release_from(size);
            return Ok(());
        }
        self.reserve_for(size)?;
        let tr = self.tr;
        self.items.resize_with(size, || tr.make());
        Ok(())
    }

    fn at(&self, index: usize) -> Option<Iter<usize>> {
        (index <= self.items.len()).then(|| Iter::new(self.id, index, Direction::Forward))
    }

    fn insert(&mut self, it: &mut Iter<usize>, value: T) -> Result<(), AxError> {
        let len = self.items.len();
        // Backward iterators insert after their element in forward order.
        let index = match it.direction() {
            Direction::Forward => it.pos(),
            Direction::Backward => it.pos().wrapping_add(1),
        };
        if index > len {
            return Err(AxError::OutOfRange { index, size: len });
        }
        self.grow()?;
        self.items.insert(index, value);
        it.set_pos(index);
        Ok(())
    }

    fn erase(&mut self, it: &mut Iter<usize>) -> Result<T, AxError> {
        let pos = it.pos();
        let size = self.items.len();
        if pos >= size {
            return Err(AxError::OutOfRange { index: pos, size });
        }
        let value = self.items.remove(pos);
        if !it.is_forward() {
            it.set_pos(pos.wrapping_sub(1));
        }
        Ok(value)
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        self.release_from(0);
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Array")
            .field("elem", &self.tr.name)
            .field("items", &self.items)
            .finish()
    }
}
