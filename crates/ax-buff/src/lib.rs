//! Growable byte buffer for the ax runtime.
//!
//! [`Buff`] separates the logical size (`used`) from the allocated size
//! (`real`) and adapts the allocation with hysteresis: it doubles when a
//! request outgrows it and halves only once usage drops to a quarter, so a
//! size oscillating around a boundary does not reallocate every time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buff;
pub mod config;

pub use buff::Buff;
pub use config::BuffConfig;
