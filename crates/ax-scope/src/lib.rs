//! Scope ownership tree and object arena for the ax runtime.
//!
//! Every object belongs to at most one scope, and every scope but the
//! root belongs to exactly one parent scope. Tearing a scope down frees
//! everything it owns, newest first, recursively. Objects are addressed by
//! generational [`ObjectId`]s (or typed [`Handle`]s), so a reference that
//! outlives its object is detected instead of dangling.
//!
//! [`Runtime`] is the single owner of both the object arena and the scope
//! tree; see its docs for the full operation set.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod runtime;
pub mod scope;

pub use config::RuntimeConfig;
pub use error::{ConfigError, ScopeError};
pub use handle::{Handle, Linkage, ObjectId, ScopeId};
pub use runtime::{Role, Runtime};
pub use scope::Attachment;
