//! The buffer object.

use std::fmt;
use std::mem;

use ax_core::{Any, AxError, Capability, One, TypeInfo};
use ax_scope::{Handle, Runtime, ScopeId};
use tracing::trace;

use crate::config::BuffConfig;

static BUFF: TypeInfo = TypeInfo::new(
    "one.any.buff",
    &[Capability::One, Capability::Any, Capability::Buff],
);

/// A byte buffer with a logical size and a separately managed allocation.
///
/// `size` is the number of meaningful bytes, `real` the number allocated.
/// The allocation never drops below `min` (except in a fresh copy, which
/// is allocated to exactly its size) and never exceeds `max`.
///
/// Bytes between the logical size and the allocation keep whatever they
/// held last; growing the logical size within the allocation exposes them.
pub struct Buff {
    data: Vec<u8>,
    used: usize,
    min: usize,
    max: usize,
}

impl Buff {
    /// Create an empty buffer with default bounds.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            used: 0,
            min: BuffConfig::DEFAULT_MIN,
            max: BuffConfig::DEFAULT_MAX,
        }
    }

    /// Create an empty buffer with explicit bounds, allocating `min` bytes.
    ///
    /// # Panics
    ///
    /// If `config.min > config.max`.
    pub fn with_config(config: BuffConfig) -> Result<Self, AxError> {
        assert!(
            config.is_valid(),
            "buffer min {} is greater than max {}",
            config.min,
            config.max
        );
        let mut buff = Self {
            min: config.min,
            max: config.max,
            ..Self::new()
        };
        buff.realloc(config.min)?;
        Ok(buff)
    }

    /// Create an empty buffer owned by `scope`.
    pub fn create(rt: &mut Runtime, scope: ScopeId) -> Handle<Self> {
        rt.create(scope, Self::new())
    }

    /// Create a bounded buffer owned by `scope`.
    ///
    /// Nothing is attached if the initial allocation fails.
    ///
    /// # Panics
    ///
    /// If `config.min > config.max`.
    pub fn create_with(
        rt: &mut Runtime,
        scope: ScopeId,
        config: BuffConfig,
    ) -> Result<Handle<Self>, AxError> {
        Ok(rt.create(scope, Self::with_config(config)?))
    }

    /// Logical size in bytes.
    pub fn size(&self) -> usize {
        self.used
    }

    /// Allocated size in bytes.
    pub fn real(&self) -> usize {
        self.data.len()
    }

    /// Allocation floor.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Ceiling.
    pub fn max(&self) -> usize {
        self.max
    }

    /// The meaningful bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// The meaningful bytes, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.used]
    }

    /// Set the logical size to `size`, growing or shrinking the allocation
    /// as needed. Content up to the smaller of the old and new sizes is
    /// kept.
    ///
    /// Growing allocates `2 * size + 1` bytes, or `max` once `size`
    /// reaches half of it. Shrinking halves the allocation (not below
    /// `min`) once `size` is at most a quarter of it.
    pub fn adapt(&mut self, size: usize) -> Result<(), AxError> {
        let real = self.plan(size)?;
        if real != self.real() {
            self.realloc(real)?;
        }
        self.used = size;
        Ok(())
    }

    /// Like [`adapt`](Self::adapt), but never shrinks the allocation.
    pub fn resize(&mut self, size: usize) -> Result<(), AxError> {
        if size <= self.real() {
            self.used = size;
            return Ok(());
        }
        self.adapt(size)
    }

    /// Like [`adapt`](Self::adapt), but when the allocation has to change
    /// the content is not carried over: a zeroed region replaces it and the
    /// old meaningful bytes are handed back.
    pub fn alloc(&mut self, size: usize) -> Result<Option<Vec<u8>>, AxError> {
        let real = self.plan(size)?;
        if real == self.real() {
            self.used = size;
            return Ok(None);
        }
        let fresh = zeroed(real)?;
        let mut old = mem::replace(&mut self.data, fresh);
        old.truncate(self.used);
        trace!(to = real, "buff alloc");
        self.used = size;
        Ok(Some(old))
    }

    /// Allocate exactly `size` bytes and make that the new floor. Content
    /// past `size` is dropped.
    ///
    /// # Panics
    ///
    /// If `size` is not below `max`.
    pub fn reserve(&mut self, size: usize) -> Result<(), AxError> {
        assert!(
            size < self.max,
            "reserve of {size} bytes reaches the buffer max {}",
            self.max
        );
        self.realloc(size)?;
        self.used = self.used.min(size);
        self.min = size;
        Ok(())
    }

    /// Shrink the allocation to the logical size, but not below `min`.
    pub fn shrink(&mut self) -> Result<(), AxError> {
        let target = self.used.max(self.min);
        if target != self.real() {
            self.realloc(target)?;
        }
        Ok(())
    }

    /// Change the ceiling. A ceiling below the current allocation
    /// truncates both the allocation and the content.
    ///
    /// # Panics
    ///
    /// If `max` is below `min`.
    pub fn set_max(&mut self, max: usize) -> Result<(), AxError> {
        assert!(
            self.min <= max,
            "buffer min {} is greater than max {max}",
            self.min
        );
        if self.real() > max {
            self.realloc(max)?;
            self.used = self.used.min(max);
        }
        self.max = max;
        Ok(())
    }

    /// New allocation size for a logical size of `size`.
    fn plan(&self, size: usize) -> Result<usize, AxError> {
        if size > self.max {
            return Err(AxError::CapacityExceeded {
                requested: size,
                max: self.max,
            });
        }
        let real = self.real();
        if size > real {
            return Ok(if self.max / 2 <= size {
                self.max
            } else {
                size * 2 + 1
            });
        }
        if real >> 2 >= size {
            return Ok((real >> 1).max(self.min));
        }
        Ok(real)
    }

    fn realloc(&mut self, real: usize) -> Result<(), AxError> {
        let old = self.data.len();
        if real > old {
            self.data
                .try_reserve_exact(real - old)
                .map_err(|_| AxError::AllocFailed { requested: real })?;
            self.data.resize(real, 0);
        } else {
            self.data.truncate(real);
            self.data.shrink_to(real);
        }
        trace!(from = old, to = real, "buff realloc");
        Ok(())
    }
}

fn zeroed(len: usize) -> Result<Vec<u8>, AxError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| AxError::AllocFailed { requested: len })?;
    data.resize(len, 0);
    Ok(data)
}

impl Default for Buff {
    fn default() -> Self {
        Self::new()
    }
}

impl One for Buff {
    fn type_info(&self) -> &'static TypeInfo {
        &BUFF
    }
}

impl Any for Buff {
    fn copy(&self) -> Result<Box<dyn Any>, AxError> {
        let mut data = zeroed(self.used)?;
        data.copy_from_slice(self.as_slice());
        Ok(Box::new(Self {
            data,
            used: self.used,
            min: self.min,
            max: self.max,
        }))
    }

    fn take(&mut self) -> Result<Box<dyn Any>, AxError> {
        let fresh = zeroed(self.min)?;
        let moved = Self {
            data: mem::replace(&mut self.data, fresh),
            used: mem::take(&mut self.used),
            min: self.min,
            max: self.max,
        };
        Ok(Box::new(moved))
    }
}

impl fmt::Debug for Buff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buff")
            .field("used", &self.used)
            .field("real", &self.real())
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}
