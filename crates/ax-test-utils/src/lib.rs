//! Test fixtures for ax development.
//!
//! - [`DropProbe`]: a runtime object that records its tag in a shared
//!   [`DropLog`] when destroyed, for checking teardown order.
//! - [`tracked`]: element descriptors whose free hook records the value
//!   being released, for checking which elements a container destroys.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod probe;
pub mod tracked;

pub use probe::{DropLog, DropProbe};
