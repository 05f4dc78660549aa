//! Ordered collections and FIFO adapters.

use crate::any::Any;
use crate::boxed::{Iter, Traverse};
use crate::error::AxError;
use crate::stuff::Stuff;

/// Ordered-collection capability.
///
/// Every implementation must behave identically on this contract; only
/// the complexity of the operations differs.
pub trait Seq: Traverse {
    /// Build an empty sequence for the given element descriptor.
    ///
    /// This is the constructor adapters such as a queue use to create
    /// their backing storage.
    fn construct(tr: Stuff<Self::Elem>) -> Self
    where
        Self: Sized;

    /// Append `value` at the back.
    fn push(&mut self, value: Self::Elem) -> Result<(), AxError>;

    /// Remove and return the most recently pushed element.
    ///
    /// Fails with [`AxError::Empty`] and leaves the sequence unchanged when
    /// there is nothing to pop.
    fn pop(&mut self) -> Result<Self::Elem, AxError>;

    /// Reverse the element order in place.
    fn invert(&mut self);

    /// Resize to exactly `size`, dropping the tail or filling it with the
    /// descriptor's default value.
    fn trunc(&mut self, size: usize) -> Result<(), AxError>;

    /// Forward iterator at logical position `index`.
    ///
    /// `index == size` yields `end`; anything beyond returns `None`.
    fn at(&self, index: usize) -> Option<Iter<Self::Pos>>;

    /// Insert `value` just before `it` in the iterator's direction.
    ///
    /// On success `it` designates the new element.
    fn insert(&mut self, it: &mut Iter<Self::Pos>, value: Self::Elem) -> Result<(), AxError>;

    /// Remove the element under `it` and return it.
    ///
    /// `it` moves to the following element in its direction. Erasing at a
    /// sentinel fails with [`AxError::OutOfRange`].
    fn erase(&mut self, it: &mut Iter<Self::Pos>) -> Result<Self::Elem, AxError>;

    /// First element in forward order.
    fn front(&self) -> Option<&Self::Elem> {
        self.get(&self.begin())
    }

    /// Last element in forward order.
    fn back(&self) -> Option<&Self::Elem> {
        self.get(&self.rbegin())
    }

    /// Element at logical position `index`.
    fn get_at(&self, index: usize) -> Option<&Self::Elem> {
        let it = self.at(index)?;
        self.get(&it)
    }
}

/// FIFO capability.
pub trait Tube: Any {
    /// Stored element type.
    type Elem;

    /// Enqueue `value`.
    fn push(&mut self, value: Self::Elem) -> Result<(), AxError>;

    /// Dequeue the oldest element. Fails with [`AxError::Empty`].
    fn pop(&mut self) -> Result<Self::Elem, AxError>;

    /// The element the next `pop` would return.
    fn prime(&self) -> Option<&Self::Elem>;

    /// Number of queued elements.
    fn size(&self) -> usize;

    /// Returns `true` if nothing is queued.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
