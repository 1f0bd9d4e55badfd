//! A reference in-memory interpreter implementing [`splice_core::Host`].
//!
//! Mirrors `murk-test-utils`: a small, reusable set of fakes so every
//! `splice-*` crate's tests exercise the same concrete `Host` rather than
//! each inventing its own. [`FakeTable`], [`FakeClosure`], and [`FakeCell`]
//! are `Rc`-based, matching the interior-mutability pattern used throughout
//! the Rust scripting-engine ecosystem (e.g. `rhai`'s `Shared`/`Locked`
//! aliases) for values with sharable identity in a single-threaded engine.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod fixtures;
mod registry;

pub use fixtures::{FakeCell, FakeClosure, FakeHost, FakeProto, FakeTable};
pub use registry::FakeRegistry;
