//! Core abstractions of the ax object runtime.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! capability chain every runtime object declares and the traits that make
//! up each level of it:
//!
//! ```text
//! One        name, type table, capability checks
//! └── Any    value semantics: copy, move (take), free
//!     ├── Boxed / Traverse    collection protocol + typed iterators
//!     │   ├── Seq             ordered collections (array, list)
//!     │   └── Map             keyed collections (hmap)
//!     ├── Tube                FIFO adapters (queue)
//!     └── (buff)              plain value objects
//! ```
//!
//! Element types are described by [`Stuff`] descriptors which containers
//! hold by value and never own.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod any;
pub mod boxed;
pub mod capability;
pub mod error;
pub mod id;
pub mod map;
pub mod one;
pub mod seq;
pub mod stuff;

pub use any::{Any, Duplicate};
pub use boxed::{Boxed, Direction, Iter, Traverse, Walk};
pub use capability::{Capability, CapabilitySet, TypeInfo};
pub use error::AxError;
pub use id::BoxInstanceId;
pub use map::Map;
pub use one::{unsupported, One};
pub use seq::{Seq, Tube};
pub use stuff::Stuff;
