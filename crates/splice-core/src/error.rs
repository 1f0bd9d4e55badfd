//! Error types for the snapshot/restore engine (spec §7).
//!
//! Mirrors `murk-core::error`'s convention: plain enums, manual
//! [`fmt::Display`] and [`std::error::Error`] impls (no `thiserror`), struct
//! variants carrying the context a caller needs to act on the failure.
//! Defined here, in the foundational crate, even though [`WalkError`] is
//! raised by `splice-walk` and [`RestoreError`] by `splice-restore` — the
//! teacher workspace centralizes error enums the same way (`StepError` is
//! defined in `murk-core` but raised from `murk-engine`).

use std::error::Error;
use std::fmt;

use crate::host::Identity;

/// Errors raised while walking the reachable object graph (spec §4.1) or
/// building a snapshot record from it (spec §4.3, which does not introduce
/// failure modes of its own and simply propagates these).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalkError {
    /// A closure backed by host-native code was encountered outside the
    /// builtin registry.
    NativeNotSerializable {
        /// Identity of the offending closure, for diagnostics.
        closure: Identity,
    },
    /// A closure's upvalue cell was not in the closed state.
    OpenUpvalue {
        /// Identity of the closure whose upvalue was open.
        closure: Identity,
        /// Index of the open upvalue within the closure's upvalue list.
        upvalue_index: usize,
    },
    /// A coroutine, channel, or user-data value was encountered outside the
    /// builtin registry.
    UnsupportedKind {
        /// The rejected value's kind name (`"coroutine"`, `"channel"`, or
        /// `"userdata"`).
        kind: &'static str,
    },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NativeNotSerializable { closure } => {
                write!(f, "native-backed closure {closure:?} is not serializable")
            }
            Self::OpenUpvalue {
                closure,
                upvalue_index,
            } => write!(
                f,
                "closure {closure:?} has an open upvalue at index {upvalue_index}"
            ),
            Self::UnsupportedKind { kind } => {
                write!(f, "value of kind '{kind}' cannot be snapshotted")
            }
        }
    }
}

impl Error for WalkError {}

/// Errors raised while restoring a snapshot record onto a fresh interpreter
/// (spec §4.4).
#[derive(Debug)]
pub enum RestoreError {
    /// `len(targets) != len(record.roots)`. Checked before any other
    /// validation or construction (spec §9 / `original_source`: the Go
    /// source checks this before touching prototypes or target kinds).
    ArityMismatchRoots {
        /// Number of target holders the caller supplied.
        targets: usize,
        /// Number of roots in the snapshot record.
        roots: usize,
    },
    /// The restore side's prototype tree has a different size than the
    /// snapshot side's.
    PrototypeMismatch {
        /// Number of prototypes recorded in the snapshot.
        recorded: usize,
        /// Number of prototypes found by indexing the restore side's
        /// program.
        found: usize,
    },
    /// A closure's declared upvalue count disagrees with its prototype's.
    ArityMismatch {
        /// The prototype's declared upvalue count.
        expected: usize,
        /// The number of upvalue IDs recorded for the closure.
        found: usize,
    },
    /// A builtin name in the snapshot is not present in the restore side's
    /// registry.
    UnknownBuiltin {
        /// The unresolvable builtin name.
        name: String,
    },
    /// A caller-supplied target holder is not of the same kind as the
    /// corresponding root in the snapshot, or is not a splice-supported
    /// kind.
    TargetKindMismatch {
        /// Index of the offending target.
        index: usize,
    },
    /// An unexpected error occurred during construction (e.g. a host
    /// constructor routine failed). The original condition is attached.
    RestoreFailed {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArityMismatchRoots { targets, roots } => write!(
                f,
                "{targets} target(s) supplied but snapshot has {roots} root(s)"
            ),
            Self::PrototypeMismatch { recorded, found } => write!(
                f,
                "prototype tree size mismatch: snapshot recorded {recorded}, restore side has {found}"
            ),
            Self::ArityMismatch { expected, found } => write!(
                f,
                "closure upvalue count mismatch: prototype declares {expected}, snapshot has {found}"
            ),
            Self::UnknownBuiltin { name } => {
                write!(f, "builtin '{name}' is not registered on the restore side")
            }
            Self::TargetKindMismatch { index } => {
                write!(f, "target {index} has a different kind than its snapshot root")
            }
            Self::RestoreFailed { reason } => write!(f, "restore failed: {reason}"),
        }
    }
}

impl Error for RestoreError {}
