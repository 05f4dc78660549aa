//! Buffer bounds.

/// Initial bounds of a [`Buff`](crate::Buff).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuffConfig {
    /// Floor of the allocation; allocated up front.
    ///
    /// Default: 0.
    pub min: usize,

    /// Ceiling of both the logical size and the allocation.
    ///
    /// Default: `usize::MAX >> 1`. Must not be below `min`.
    pub max: usize,
}

impl BuffConfig {
    /// Default floor.
    pub const DEFAULT_MIN: usize = 0;

    /// Default ceiling.
    pub const DEFAULT_MAX: usize = usize::MAX >> 1;

    /// Create a config with default bounds.
    pub fn new() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }

    /// Whether `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl Default for BuffConfig {
    fn default() -> Self {
        Self::new()
    }
}
