//! The capability surface a scripting interpreter must expose (spec §6.1).
//!
//! The engine never owns an interpreter's values directly — the value
//! representation, bytecode, calling convention, and global environment are
//! the host's problem (spec §1, out of scope here). Instead, the host
//! implements [`Host`], a small set of associated types plus the
//! introspection and construction methods the walker, builder, and loader
//! need. Everything in this crate and its siblings is generic over `H:
//! Host`, the same way `murk-core`'s `FieldReader`/`FieldWriter` traits
//! decouple the tick engine from a concrete arena implementation.

use crate::value::{ScriptString, Value};

/// A node's identity, used for cycle detection and for deriving snapshot-local
/// IDs (spec §9: "the source uses in-process pointers as node identity").
///
/// Two handles with the same `Identity` refer to the same underlying table,
/// closure, cell, or prototype. Hosts typically derive this from a pointer
/// (e.g. `Rc::as_ptr(&cell) as usize`), but any scheme that is stable for the
/// lifetime of a single walk/build/restore call and injective over live
/// nodes is sufficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub usize);

/// The capability surface consumed from a host scripting interpreter.
///
/// `H::Table`, `H::Closure`, and `H::Cell` are opaque, cheaply-`Clone`able
/// handles (the host's own reference type — typically `Rc<RefCell<_>>` or
/// equivalent); the engine never reaches into their representation except
/// through the methods below. `H::Proto` is the host's function-prototype
/// node, treated as an opaque, immutable tree (spec §3 "Function prototype").
/// `H::Opaque` stands in for the four non-serializable value kinds
/// (`Native`, `Coroutine`, `Channel`, `UserData`) — the engine never calls
/// into it, only rejects it.
pub trait Host: Sized {
    /// A table handle. Has identity: cloning a handle does not clone the
    /// table it refers to.
    type Table: Clone;
    /// A closure handle. Has identity.
    type Closure: Clone;
    /// A closed or open upvalue cell handle. Has identity.
    type Cell: Clone;
    /// A function prototype node. Static; addressed only by pre-order
    /// position (spec §4.2), never by value.
    type Proto: Clone;
    /// Any of the four non-serializable value kinds the engine cannot and
    /// does not need to introspect.
    type Opaque: Clone;

    /// Identity of a table handle.
    fn table_identity(table: &Self::Table) -> Identity;
    /// Identity of a closure handle.
    fn closure_identity(closure: &Self::Closure) -> Identity;
    /// Identity of an upvalue cell handle.
    fn cell_identity(cell: &Self::Cell) -> Identity;
    /// Identity of a prototype node.
    fn proto_identity(proto: &Self::Proto) -> Identity;

    /// The table's array part, `1..n`, in order.
    fn table_array(table: &Self::Table) -> Vec<Value<Self>>;
    /// The table's string-keyed dictionary entries, in iteration order.
    fn table_string_entries(table: &Self::Table) -> Vec<(ScriptString, Value<Self>)>;
    /// The table's non-string, non-nil-keyed dictionary entries, in
    /// iteration order.
    fn table_other_entries(table: &Self::Table) -> Vec<(Value<Self>, Value<Self>)>;

    /// Allocate a new, empty table with capacity hints for the array and
    /// dictionary parts.
    fn new_table(array_hint: usize, dict_hint: usize) -> Self::Table;
    /// Append a value to a table's array part.
    fn table_append(table: &Self::Table, value: Value<Self>);
    /// Raw-set a string key in a table's dictionary part.
    fn table_set_string(table: &Self::Table, key: ScriptString, value: Value<Self>);
    /// Raw-set a non-string key in a table's dictionary part.
    fn table_set_other(table: &Self::Table, key: Value<Self>, value: Value<Self>);

    /// Whether a closure is backed by host-native code rather than a
    /// prototype (spec §3, §4.1 `NativeNotSerializable`).
    fn closure_is_native(closure: &Self::Closure) -> bool;
    /// The closure's function prototype.
    fn closure_proto(closure: &Self::Closure) -> Self::Proto;
    /// The closure's environment table.
    fn closure_env(closure: &Self::Closure) -> Self::Table;
    /// The closure's upvalue cells, in declaration order.
    fn closure_upvalues(closure: &Self::Closure) -> Vec<Self::Cell>;

    /// Construct a new closure from a prototype, with `upvalue_count` empty
    /// upvalue slots and no environment set yet.
    fn new_closure(proto: Self::Proto, upvalue_count: usize) -> Self::Closure;
    /// Set a closure's environment table after construction.
    fn closure_set_env(closure: &Self::Closure, env: Self::Table);
    /// Set one of a closure's upvalue slots after construction.
    fn closure_set_upvalue(closure: &Self::Closure, index: usize, cell: Self::Cell);

    /// Whether an upvalue cell is closed (its storage is independent of any
    /// call frame). Only closed cells are snapshottable (spec §3).
    fn cell_is_closed(cell: &Self::Cell) -> bool;
    /// The value currently held by an upvalue cell.
    fn cell_value(cell: &Self::Cell) -> Value<Self>;
    /// Construct a new, already-closed upvalue cell holding `value`.
    fn new_closed_cell(value: Value<Self>) -> Self::Cell;
    /// Overwrite a closed cell's contents after construction.
    ///
    /// The restore loader memoizes a freshly built cell *before* resolving
    /// the value it holds (spec §4.4 `getOrBuildUpvalue`), so that a cycle
    /// running back through the cell resolves to the same cell rather than
    /// recursing forever. This method is what lets it fill the cell in once
    /// that resolution completes.
    fn cell_set_value(cell: &Self::Cell, value: Value<Self>);

    /// The prototype's declared upvalue count (spec invariant 3: must equal
    /// a closure's upvalue count).
    fn proto_upvalue_count(proto: &Self::Proto) -> usize;
    /// The prototype's nested prototypes, in the order they appear in the
    /// source (spec §4.2).
    fn proto_nested(proto: &Self::Proto) -> Vec<Self::Proto>;

    /// Overwrite `target`'s array part and both dictionary parts with
    /// `source`'s, so that every existing reference to `target` observes
    /// `source`'s content from then on (spec §4.4 "Splicing to targets").
    fn table_overwrite(target: &Self::Table, source: &Self::Table);
    /// Overwrite `target`'s environment, prototype, and upvalues with
    /// `source`'s, preserving `target`'s identity (spec §4.4 "Splicing to
    /// targets").
    fn closure_overwrite(target: &Self::Closure, source: &Self::Closure);
}
