//! Data model and host capability traits for a live-state snapshot and
//! restore engine.
//!
//! This crate defines the pieces every other `splice-*` crate shares:
//!
//! - [`host`] — the small capability surface ([`host::Host`]) a scripting
//!   interpreter must expose for its object graph to be walked, snapshotted,
//!   and restored.
//! - [`value`] — the tagged [`value::Value`] sum describing one script
//!   value of any kind.
//! - [`builtin`] — [`builtin::BuiltinRegistry`], the bijection between
//!   certain host values and symbolic names that lets native functions and
//!   other host-opaque tables cross between interpreter instances.
//! - [`id`] — opaque, snapshot-local identifiers for values, upvalue cells,
//!   and prototypes.
//! - [`error`] — the error enums raised by the walker and the restore
//!   loader.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builtin;
pub mod error;
pub mod host;
pub mod id;
pub mod value;

pub use builtin::BuiltinRegistry;
pub use error::{RestoreError, WalkError};
pub use host::{Host, Identity};
pub use id::{NodeId, ProtoId, UpvalueId};
pub use value::{ScriptString, Value};
