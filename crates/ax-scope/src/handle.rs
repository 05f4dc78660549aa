//! Object and scope identifiers.
//!
//! Ids are `(index, generation)` pairs into the runtime's slot vectors.
//! A slot's generation is bumped every time it is vacated, so an id that
//! outlives its object resolves to nothing instead of aliasing whatever
//! reuses the slot.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Identifies an object owned by a [`Runtime`](crate::Runtime).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ObjectId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the object arena.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}.{}", self.index, self.generation)
    }
}

/// Identifies a scope node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ScopeId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the scope arena.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}.{}", self.index, self.generation)
    }
}

/// An [`ObjectId`] that remembers the concrete type it was created with.
///
/// Converting to [`ObjectId`] forgets the type, which is how a handle is
/// passed to operations working at the base (`one`/`any`) level.
pub struct Handle<C> {
    id: ObjectId,
    _type: PhantomData<fn() -> C>,
}

impl<C> Handle<C> {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self {
            id,
            _type: PhantomData,
        }
    }

    /// The untyped id.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl<C> Clone for Handle<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Handle<C> {}

impl<C> PartialEq for Handle<C> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<C> Eq for Handle<C> {}

impl<C> Hash for Handle<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<C> fmt::Debug for Handle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

impl<C> From<Handle<C>> for ObjectId {
    fn from(handle: Handle<C>) -> Self {
        handle.id
    }
}

/// Where an attached object sits: its owning scope and its slot there.
///
/// The slot is opaque to callers; it only changes when the object is
/// attached, detached, or its scope compacts its entry list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Linkage {
    /// Owning scope.
    pub scope: ScopeId,
    /// Slot within the scope's entry list.
    pub slot: u32,
}
