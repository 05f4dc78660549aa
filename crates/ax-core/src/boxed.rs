//! The collection ("box") capability and the iterator protocol.
//!
//! The capability is split in two traits:
//!
//! - [`Boxed`] is object-safe and element-agnostic: size, bounds, clear.
//!   It is what [`Any::as_boxed`](crate::Any::as_boxed) hands out when the
//!   concrete type is unknown.
//! - [`Traverse`] adds the element type and an opaque per-container
//!   position token, and defines the begin/end/rbegin/rend protocol every
//!   collection walks the same way.
//!
//! An [`Iter`] is only meaningful for the box that produced it and only
//! until that box is structurally mutated (insert, erase, clear).

use std::fmt;

use crate::any::Any;
use crate::id::BoxInstanceId;
use crate::stuff::Stuff;

/// Element-agnostic collection capability.
pub trait Boxed: Any {
    /// Number of elements.
    fn size(&self) -> usize;

    /// Upper bound on the number of elements.
    fn maxsize(&self) -> usize;

    /// Returns `true` if the box holds no elements.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Remove every element. Invalidates all outstanding iterators.
    fn clear(&mut self);

    /// Name of the element descriptor.
    fn elem_name(&self) -> &'static str;
}

/// Traversal direction of an [`Iter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From `begin` towards `end`.
    Forward,
    /// From `rbegin` towards `rend`.
    Backward,
}

impl Direction {
    /// The opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Cursor over a box.
///
/// Equality compares the owning box and the position token only; a
/// forward and a backward iterator resting on the same token are equal.
#[derive(Clone, Copy)]
pub struct Iter<P> {
    owner: BoxInstanceId,
    pos: P,
    dir: Direction,
}

impl<P: Copy> Iter<P> {
    /// Build an iterator. Called by container implementations.
    pub fn new(owner: BoxInstanceId, pos: P, dir: Direction) -> Self {
        Self { owner, pos, dir }
    }

    /// The box this iterator belongs to.
    pub fn owner(&self) -> BoxInstanceId {
        self.owner
    }

    /// The opaque position token.
    pub fn pos(&self) -> P {
        self.pos
    }

    /// Move the iterator to another token of the same box.
    pub fn set_pos(&mut self, pos: P) {
        self.pos = pos;
    }

    /// Traversal direction.
    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Whether this iterator walks from `begin` towards `end`.
    pub fn is_forward(&self) -> bool {
        self.dir == Direction::Forward
    }
}

impl<P: PartialEq> PartialEq for Iter<P> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.pos == other.pos
    }
}

impl<P: Eq> Eq for Iter<P> {}

impl<P: fmt::Debug> fmt::Debug for Iter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("owner", &self.owner)
            .field("pos", &self.pos)
            .field("dir", &self.dir)
            .finish()
    }
}

/// Typed traversal over a box.
///
/// `end` and `rend` are sentinels: [`get`](Traverse::get) returns `None`
/// for them and [`advance`](Traverse::advance) past them panics.
pub trait Traverse: Boxed {
    /// Stored element type.
    type Elem;

    /// Container-specific position token.
    type Pos: Copy + Eq + fmt::Debug;

    /// First element in forward order.
    fn begin(&self) -> Iter<Self::Pos>;

    /// Forward sentinel.
    fn end(&self) -> Iter<Self::Pos>;

    /// First element in backward order.
    fn rbegin(&self) -> Iter<Self::Pos>;

    /// Backward sentinel.
    fn rend(&self) -> Iter<Self::Pos>;

    /// Step `it` one element in its own direction.
    fn advance(&self, it: &mut Iter<Self::Pos>);

    /// Element under `it`, `None` at a sentinel.
    fn get(&self, it: &Iter<Self::Pos>) -> Option<&Self::Elem>;

    /// Mutable element under `it`, `None` at a sentinel.
    fn get_mut(&mut self, it: &Iter<Self::Pos>) -> Option<&mut Self::Elem>;

    /// Element descriptor the box was built with.
    fn elem_tr(&self) -> &Stuff<Self::Elem>;

    /// Walk from `begin` to `end`.
    fn iter(&self) -> Walk<'_, Self> {
        Walk {
            boxed: self,
            cur: self.begin(),
            stop: self.end(),
        }
    }

    /// Walk from `rbegin` to `rend`.
    fn iter_rev(&self) -> Walk<'_, Self> {
        Walk {
            boxed: self,
            cur: self.rbegin(),
            stop: self.rend(),
        }
    }
}

/// Std iterator adapter over the begin/end protocol.
pub struct Walk<'a, B: Traverse + ?Sized> {
    boxed: &'a B,
    cur: Iter<B::Pos>,
    stop: Iter<B::Pos>,
}

impl<'a, B: Traverse + ?Sized> Iterator for Walk<'a, B> {
    type Item = &'a B::Elem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == self.stop {
            return None;
        }
        let boxed = self.boxed;
        let item = boxed.get(&self.cur);
        boxed.advance(&mut self.cur);
        item
    }
}
