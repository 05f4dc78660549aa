//! Instance identifiers for collections.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`BoxInstanceId`] allocation.
static BOX_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a collection.
///
/// Every iterator records the id of the box that produced it, so two
/// iterators compare equal only when they come from the same instance.
/// Copies and moved-out replacements receive a fresh id; an id is never
/// handed out twice within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxInstanceId(u64);

impl BoxInstanceId {
    /// Allocate a fresh, unique instance ID.
    pub fn next() -> Self {
        Self(BOX_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BoxInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = BoxInstanceId::next();
        let b = BoxInstanceId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
