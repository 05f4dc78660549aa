//! Sequence containers for the ax runtime.
//!
//! [`Array`] and [`List`] implement the same [`Seq`](ax_core::Seq)
//! contract and differ only in cost: arrays index in O(1) and insert in
//! O(n), lists the other way round. [`Queue`] adapts either one into a
//! FIFO [`Tube`](ax_core::Tube).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
#[cfg(test)]
pub(crate) mod conformance;
pub mod init;
pub mod list;
pub mod queue;

pub use array::Array;
pub use init::{init, FromItem, Item};
pub use list::List;
pub use queue::Queue;
