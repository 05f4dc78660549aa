//! ax: a scope-owned object runtime.
//!
//! Objects live in a [`Runtime`] and belong to scopes arranged in a tree.
//! Tearing a scope down frees what it owns, newest first. Every object
//! declares a capability chain (`one.any.box.seq.array`, ...) that can be
//! checked at run time through [`One::is`], and the containers implement
//! the matching traits so they can be used generically at compile time.
//!
//! This crate only re-exports the component crates:
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`types`] | capability traits, element descriptors, errors |
//! | [`scope`] | the runtime, scopes, handles |
//! | [`seq`] | array, list, queue, bulk initializer |
//! | [`map`] | hash map |
//! | [`buff`] | adaptive byte buffer |
//!
//! # Example
//!
//! ```
//! use ax::prelude::*;
//! use ax::stuff::I32;
//!
//! let mut rt = Runtime::new();
//! let scope = rt.enter();
//! let h = Array::init(&mut rt, scope, I32, ax::items![1, 2, 3]).unwrap();
//!
//! let a = rt.get(h).unwrap();
//! assert_eq!(a.iter_rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
//!
//! rt.leave();
//! assert!(rt.get(h).is_none());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use ax_buff as buff;
pub use ax_core as types;
pub use ax_map as map;
pub use ax_scope as scope;
pub use ax_seq as seq;

pub use ax_core::stuff;
pub use ax_core::{
    unsupported, Any, AxError, Boxed, Capability, Direction, Iter, Map, One, Seq, Stuff,
    Traverse, Tube, TypeInfo,
};
pub use ax_scope::{Handle, ObjectId, Role, Runtime, RuntimeConfig, ScopeError, ScopeId};
pub use ax_seq::{init, items, Array, Item, List, Queue};
pub use ax_map::Hmap;
pub use ax_buff::{Buff, BuffConfig};

/// The types and traits most programs need.
pub mod prelude {
    pub use ax_buff::Buff;
    pub use ax_core::{Any, AxError, Boxed, Map, One, Seq, Traverse, Tube};
    pub use ax_map::Hmap;
    pub use ax_scope::{Handle, Runtime, ScopeError, ScopeId};
    pub use ax_seq::{Array, List, Queue};
}
