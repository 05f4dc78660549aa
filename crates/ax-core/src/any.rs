//! Value semantics: copy, move and free.

use crate::boxed::Boxed;
use crate::error::AxError;
use crate::one::{unsupported, One};

/// Value-semantics capability every runtime object implements.
///
/// `copy` and `take` are optional. A type that does not override them is
/// non-copyable (non-movable) and calling them panics. Both report
/// allocation failure through `Err` without touching `self`.
///
/// Neither operation knows about scopes: the runtime attaches a copy to
/// the caller's active scope and a moved-out replacement to the source's
/// scope.
pub trait Any: One {
    /// Deep-duplicate the object into an independent value.
    fn copy(&self) -> Result<Box<dyn Any>, AxError> {
        unsupported(self.name(), "copy")
    }

    /// Move the payload into a new object, leaving `self` empty.
    ///
    /// After a successful call `self` is still valid and holds its
    /// default (empty) state.
    fn take(&mut self) -> Result<Box<dyn Any>, AxError> {
        unsupported(self.name(), "move")
    }

    /// Destroy the object.
    fn free(self: Box<Self>) {}

    /// Upcast to the type-erased collection level, if this is a collection.
    fn as_boxed(&self) -> Option<&dyn Boxed> {
        None
    }

    /// Mutable form of [`as_boxed`](Any::as_boxed).
    fn as_boxed_mut(&mut self) -> Option<&mut dyn Boxed> {
        None
    }
}

impl dyn Any {
    /// Whether the concrete type is `T`.
    pub fn is_type<T: Any>(&self) -> bool {
        (self as &dyn std::any::Any).is::<T>()
    }

    /// Attempt to downcast to a concrete object type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (self as &dyn std::any::Any).downcast_ref::<T>()
    }

    /// Attempt to downcast to a concrete object type, mutably.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (self as &mut dyn std::any::Any).downcast_mut::<T>()
    }

    /// View the object at its base level.
    pub fn as_one(&self) -> &dyn One {
        self
    }
}

/// Fallible deep copy of a concrete value.
///
/// Implemented by every copyable container; their [`Any::copy`] boxes the
/// result. Adapters use it to duplicate the storage they wrap.
pub trait Duplicate: Sized {
    /// Produce an independent copy with equal observable content.
    fn duplicate(&self) -> Result<Self, AxError>;
}
