//! The snapshot record (spec §6.2): a logical, in-memory structure — not a
//! wire format. Byte-level framing is explicitly out of scope (spec.md §1).

use indexmap::IndexMap;

use splice_core::value::ScriptString;
use splice_core::{NodeId, ProtoId, UpvalueId};

/// An inline scalar, or a pointer to a defined node.
///
/// `Bool` is inline here alongside `Nil`/`Number`/`String` (SPEC_FULL.md §C)
/// — the source this was distilled from omits it from its inline-value set,
/// which is the bug that section calls out and this type does not repeat.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodedValue {
    /// The nil value.
    Nil,
    /// An inline boolean.
    Bool(bool),
    /// An inline IEEE-754 double.
    Number(f64),
    /// An inline byte string.
    String(ScriptString),
    /// A reference to a node defined elsewhere in the same record.
    Ptr(NodeId),
}

/// What a reachable value actually is: a builtin substituted by name, a
/// table, or a closure.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueDescriptor {
    /// A value mediated by the builtin registry; restored by name lookup,
    /// never by structural reconstruction.
    Builtin(String),
    /// A table's array part and dictionary part, flattened to parallel
    /// `keys`/`values` arrays of equal length (spec §4.3 step 4).
    Table {
        /// The array part, `1..n`, in order.
        array: Vec<EncodedValue>,
        /// Dictionary keys, string-keyed entries first, in encounter order.
        keys: Vec<EncodedValue>,
        /// Dictionary values, in the same order as `keys`.
        values: Vec<EncodedValue>,
    },
    /// A closure: its environment, its prototype (by snapshot-local ID, not
    /// by program-structural index directly — see [`ProtoEntry`]), and its
    /// upvalue cell IDs in declaration order.
    Closure {
        /// The closure's environment table.
        env: NodeId,
        /// The closure's prototype, by snapshot-local ID.
        proto: ProtoId,
        /// The closure's upvalue cells, by snapshot-local ID, in order.
        upvalues: Vec<UpvalueId>,
    },
}

/// A single reachable upvalue cell's contents.
#[derive(Clone, Debug, PartialEq)]
pub struct UpvalueEntry {
    /// The value the cell held at snapshot time.
    pub value: EncodedValue,
}

/// A single prototype's position in the program's pre-order listing.
///
/// Indirected through [`ProtoId`] rather than storing the position directly
/// on [`ValueDescriptor::Closure`] so that restore can validate the
/// prototype *count* up front (SPEC_FULL.md §D.4) before resolving any
/// individual closure's prototype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtoEntry {
    /// Position in the pre-order prototype listing (spec §4.2).
    pub idx: u64,
}

/// The snapshot record (spec §6.2): everything needed to restore the graph
/// reachable from a set of roots, independent of any interpreter instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Every prototype in the root program's pre-order listing, by
    /// snapshot-local ID.
    pub protos: IndexMap<ProtoId, ProtoEntry>,
    /// Every reachable closed upvalue cell, by snapshot-local ID.
    pub upvalues: IndexMap<UpvalueId, UpvalueEntry>,
    /// Every reachable table or closure, by snapshot-local ID.
    pub values: IndexMap<NodeId, ValueDescriptor>,
    /// The roots, in the order they were passed to [`crate::build`].
    pub roots: Vec<NodeId>,
}
