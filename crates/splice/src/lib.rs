//! Splice: a live-state snapshot and restore engine for an embedded
//! scripting runtime.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all `splice-*` sub-crates. For most users, adding `splice` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use splice::prelude::*;
//! use splice_test_utils::{FakeCell, FakeClosure, FakeHost, FakeProto, FakeTable};
//!
//! // `j = 77`, captured by two closures that each bump and return it.
//! let cell = FakeCell::new_closed(Value::Number(77.0));
//! let proto = FakeProto::leaf(1);
//! let env = FakeTable::new();
//! let bump_a = FakeClosure::scripted(proto.clone(), env.clone(), vec![cell.clone()]);
//! let bump_b = FakeClosure::scripted(proto.clone(), env, vec![cell]);
//!
//! let record = build(
//!     &[Value::Closure(bump_a), Value::Closure(bump_b)],
//!     &EmptyRegistry,
//!     &proto,
//! )
//! .unwrap();
//!
//! // A fresh interpreter, freshly loaded from the same program text.
//! let target_a = FakeClosure::native();
//! let target_b = FakeClosure::native();
//! load::<FakeHost>(
//!     &record,
//!     &EmptyRegistry,
//!     &proto,
//!     &[Target::Closure(target_a.clone()), Target::Closure(target_b.clone())],
//!     &RestoreOptions::default(),
//! )
//! .unwrap();
//!
//! // The restored closures still share one upvalue cell.
//! let upvalues_a = FakeHost::closure_upvalues(&target_a);
//! let upvalues_b = FakeHost::closure_upvalues(&target_b);
//! assert_eq!(upvalues_a[0], upvalues_b[0]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! [`prelude`]:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `splice-core` | [`Host`](core::Host) trait, [`Value`](core::Value), IDs, errors, the builtin registry |
//! | [`walk`] | `splice-walk` | Reachability walker and prototype indexer |
//! | [`codec`] | `splice-codec` | The snapshot [`Record`](codec::Record) shape and builder |
//! | [`restore`] | `splice-restore` | The restore loader and splice targets |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Data model and host capability traits (`splice-core`).
pub use splice_core as core;

/// Reachability walker and prototype indexer (`splice-walk`).
pub use splice_walk as walk;

/// Snapshot record shape and builder (`splice-codec`).
pub use splice_codec as codec;

/// Restore loader and splice targets (`splice-restore`).
pub use splice_restore as restore;

/// Commonly used items, re-exported flat for convenience.
///
/// Mirrors `murk::prelude`: the handful of types and functions most callers
/// need for a snapshot/restore round trip, without having to know which
/// sub-crate each one lives in.
pub mod prelude {
    pub use splice_codec::{build, EncodedValue, ProtoEntry, Record, UpvalueEntry, ValueDescriptor};
    pub use splice_core::{
        BuiltinRegistry, EmptyRegistry, Host, Identity, NodeId, ProtoId, RestoreError,
        ScriptString, UpvalueId, Value, WalkError,
    };
    pub use splice_restore::{load, RestoreOptions, Target};
    pub use splice_walk::{index_prototypes, walk, GraphNode, Reachable};
}
