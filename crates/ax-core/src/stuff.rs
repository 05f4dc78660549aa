//! Element-type descriptors.
//!
//! A [`Stuff`] tells a container how to treat the values it stores: how to
//! hash, compare, copy, default-initialise and release them. Descriptors
//! are plain tables of function pointers, `Copy`, and shared by value;
//! a container keeps its own copy and never frees it.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Element-type descriptor.
pub struct Stuff<T> {
    /// Type name used in dumps and diagnostics.
    pub name: &'static str,
    /// Hash of a value. Equal values must hash equally.
    pub hash: fn(&T) -> u64,
    /// Equality.
    pub equal: fn(&T, &T) -> bool,
    /// Strict ordering.
    pub less: fn(&T, &T) -> bool,
    /// Deep copy.
    pub copy: fn(&T) -> T,
    /// Default value, used when a container fills new slots.
    pub init: fn() -> T,
    /// Release hook run on every element a container destroys.
    pub free: fn(T),
}

impl<T> Clone for Stuff<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Stuff<T> {}

impl<T> fmt::Debug for Stuff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stuff").field("name", &self.name).finish()
    }
}

impl<T> Stuff<T> {
    /// Hash `value`.
    pub fn hash_of(&self, value: &T) -> u64 {
        (self.hash)(value)
    }

    /// Compare two values for equality.
    pub fn equals(&self, a: &T, b: &T) -> bool {
        (self.equal)(a, b)
    }

    /// Whether `a` orders strictly before `b`.
    pub fn less_than(&self, a: &T, b: &T) -> bool {
        (self.less)(a, b)
    }

    /// Copy `value`.
    pub fn dup(&self, value: &T) -> T {
        (self.copy)(value)
    }

    /// Produce a default value.
    pub fn make(&self) -> T {
        (self.init)()
    }

    /// Release `value` through the free hook.
    pub fn release(&self, value: T) {
        (self.free)(value)
    }
}

impl<T: Hash + Ord + Clone + Default> Stuff<T> {
    /// Descriptor built from the type's own trait implementations.
    pub const fn native(name: &'static str) -> Self {
        Self {
            name,
            hash: hash_native::<T>,
            equal: equal_native::<T>,
            less: less_native::<T>,
            copy: T::clone,
            init: T::default,
            free: std::mem::drop::<T>,
        }
    }
}

fn hash_native<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn equal_native<T: Eq>(a: &T, b: &T) -> bool {
    a == b
}

fn less_native<T: Ord>(a: &T, b: &T) -> bool {
    a < b
}

// Floats compare by total order so that they can serve as map keys.
fn hash_f64(value: &f64) -> u64 {
    hash_native(&value.to_bits())
}

fn equal_f64(a: &f64, b: &f64) -> bool {
    a.total_cmp(b).is_eq()
}

fn less_f64(a: &f64, b: &f64) -> bool {
    a.total_cmp(b).is_lt()
}

fn hash_f32(value: &f32) -> u64 {
    hash_native(&value.to_bits())
}

fn equal_f32(a: &f32, b: &f32) -> bool {
    a.total_cmp(b).is_eq()
}

fn less_f32(a: &f32, b: &f32) -> bool {
    a.total_cmp(b).is_lt()
}

fn copy_of<T: Copy>(value: &T) -> T {
    *value
}

fn zero_f64() -> f64 {
    0.0
}

fn zero_f32() -> f32 {
    0.0
}

/// `i8` descriptor.
pub const I8: Stuff<i8> = Stuff::native("i8");
/// `i16` descriptor.
pub const I16: Stuff<i16> = Stuff::native("i16");
/// `i32` descriptor.
pub const I32: Stuff<i32> = Stuff::native("i32");
/// `i64` descriptor.
pub const I64: Stuff<i64> = Stuff::native("i64");
/// `u8` descriptor.
pub const U8: Stuff<u8> = Stuff::native("u8");
/// `u16` descriptor.
pub const U16: Stuff<u16> = Stuff::native("u16");
/// `u32` descriptor.
pub const U32: Stuff<u32> = Stuff::native("u32");
/// `u64` descriptor.
pub const U64: Stuff<u64> = Stuff::native("u64");
/// `usize` descriptor.
pub const USIZE: Stuff<usize> = Stuff::native("usize");
/// `bool` descriptor.
pub const BOOL: Stuff<bool> = Stuff::native("bool");
/// Owned string descriptor.
pub const STR: Stuff<String> = Stuff::native("str");

/// `f32` descriptor (total order).
pub const F32: Stuff<f32> = Stuff {
    name: "f32",
    hash: hash_f32,
    equal: equal_f32,
    less: less_f32,
    copy: copy_of::<f32>,
    init: zero_f32,
    free: std::mem::drop::<f32>,
};

/// `f64` descriptor (total order).
pub const F64: Stuff<f64> = Stuff {
    name: "f64",
    hash: hash_f64,
    equal: equal_f64,
    less: less_f64,
    copy: copy_of::<f64>,
    init: zero_f64,
    free: std::mem::drop::<f64>,
};
