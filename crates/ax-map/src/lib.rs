//! Keyed containers for the ax runtime.
//!
//! [`Hmap`] implements the [`Map`](ax_core::Map) contract with hashing and
//! equality taken from the key's [`Stuff`](ax_core::Stuff) descriptor, so
//! any key type with a descriptor can be used, whether or not it
//! implements `Hash`/`Eq`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod hmap;

pub use hmap::Hmap;
