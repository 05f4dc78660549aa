//! Keyed collections.

use crate::boxed::{Iter, Traverse};
use crate::error::AxError;
use crate::stuff::Stuff;

/// Associative-collection capability.
///
/// The element type of the underlying box is the value type; keys are
/// described by a separate descriptor supplied at construction. Iteration
/// order is unspecified but stable until the next structural mutation.
pub trait Map: Traverse {
    /// Key type.
    type Key;

    /// Key descriptor.
    fn key_tr(&self) -> &Stuff<Self::Key>;

    /// Insert or replace.
    ///
    /// If an equal key is present its value is replaced and the stored key
    /// is kept; otherwise a new pair is added. Returns an iterator at the
    /// pair.
    fn put(&mut self, key: Self::Key, value: Self::Elem) -> Result<Iter<Self::Pos>, AxError>;

    /// Iterator at the pair whose key equals `key`, or `end` on a miss.
    fn find(&self, key: &Self::Key) -> Iter<Self::Pos>;

    /// Remove the pair for `key` and return its value.
    ///
    /// Fails with [`AxError::Missing`] when no pair matches.
    fn remove(&mut self, key: &Self::Key) -> Result<Self::Elem, AxError>;

    /// Key of the pair under `it`, `None` at a sentinel.
    fn iter_key(&self, it: &Iter<Self::Pos>) -> Option<&Self::Key>;

    /// Whether a pair for `key` exists.
    fn exist(&self, key: &Self::Key) -> bool {
        self.find(key) != self.end()
    }

    /// The stored key equal to `key`.
    fn key(&self, key: &Self::Key) -> Option<&Self::Key> {
        let it = self.find(key);
        self.iter_key(&it)
    }

    /// The value stored for `key`.
    fn value(&self, key: &Self::Key) -> Option<&Self::Elem> {
        let it = self.find(key);
        self.get(&it)
    }
}
