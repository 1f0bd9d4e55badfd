//! The snapshot record shape and builder (spec §4.3, §6.2).
//!
//! Mirrors `murk-replay`'s split of `types.rs` (the wire-shaped data) from
//! `codec.rs` (the routine that produces it): [`types`] holds [`Record`]
//! and its constituent descriptors, [`builder`] holds [`build`], the only
//! function that constructs one.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod types;

pub use builder::build;
pub use types::{EncodedValue, ProtoEntry, Record, UpvalueEntry, ValueDescriptor};
