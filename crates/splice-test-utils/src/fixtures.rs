use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use splice_core::host::{Host, Identity};
use splice_core::value::{ScriptString, Value};

/// A zero-sized marker implementing [`Host`] over the `Fake*` fixtures.
///
/// Carries no state itself — every fixture type already owns its data via
/// `Rc`, so `FakeHost` exists only to hang the trait impl on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FakeHost;

struct TableData {
    array: RefCell<Vec<Value<FakeHost>>>,
    str_dict: RefCell<IndexMap<ScriptString, Value<FakeHost>>>,
    other_dict: RefCell<Vec<(Value<FakeHost>, Value<FakeHost>)>>,
}

/// A table fixture: an array part, a string-keyed dict, and a catch-all
/// dict for every other key kind, matching the three-part shape
/// [`Host::table_array`]/[`Host::table_string_entries`]/
/// [`Host::table_other_entries`] expose.
#[derive(Clone)]
pub struct FakeTable(Rc<TableData>);

impl FakeTable {
    /// A table with no hinted capacity.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// A table pre-sized for `array_hint` array slots and `dict_hint` dict
    /// entries, mirroring [`Host::new_table`].
    pub fn with_capacity(array_hint: usize, dict_hint: usize) -> Self {
        Self(Rc::new(TableData {
            array: RefCell::new(Vec::with_capacity(array_hint)),
            str_dict: RefCell::new(IndexMap::with_capacity(dict_hint)),
            other_dict: RefCell::new(Vec::new()),
        }))
    }

    /// Appends to the array part.
    pub fn append(&self, value: Value<FakeHost>) {
        self.0.array.borrow_mut().push(value);
    }

    /// Sets a string key, overwriting any existing entry for it.
    pub fn set_string(&self, key: &str, value: Value<FakeHost>) {
        let key: ScriptString = Rc::from(key.as_bytes());
        self.0.str_dict.borrow_mut().insert(key, value);
    }

    /// Sets a non-string key, overwriting any existing entry whose key
    /// compares equal under [`value_key_eq`].
    pub fn set_other(&self, key: Value<FakeHost>, value: Value<FakeHost>) {
        let mut dict = self.0.other_dict.borrow_mut();
        if let Some(slot) = dict.iter_mut().find(|(k, _)| value_key_eq(k, &key)) {
            slot.1 = value;
        } else {
            dict.push((key, value));
        }
    }

    /// Reads a string-keyed entry.
    pub fn get_string(&self, key: &str) -> Option<Value<FakeHost>> {
        self.0.str_dict.borrow().get(key.as_bytes()).cloned()
    }

    fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as usize)
    }
}

impl Default for FakeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FakeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FakeTable({:#x})", self.identity().0)
    }
}

impl PartialEq for FakeTable {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for FakeTable {}

struct ClosureData {
    native: Cell<bool>,
    proto: RefCell<Option<FakeProto>>,
    env: RefCell<Option<FakeTable>>,
    upvalues: RefCell<Vec<FakeCell>>,
}

/// A closure fixture: either native (opaque, host-only) or scripted (backed
/// by a [`FakeProto`], an environment table, and a fixed set of upvalue
/// cells).
#[derive(Clone)]
pub struct FakeClosure(Rc<ClosureData>);

impl FakeClosure {
    /// A scripted closure over `proto`, closing `env` and `upvalues`.
    pub fn scripted(proto: FakeProto, env: FakeTable, upvalues: Vec<FakeCell>) -> Self {
        Self(Rc::new(ClosureData {
            native: Cell::new(false),
            proto: RefCell::new(Some(proto)),
            env: RefCell::new(Some(env)),
            upvalues: RefCell::new(upvalues),
        }))
    }

    fn scripted_uninit(proto: FakeProto, upvalue_count: usize) -> Self {
        let placeholder = FakeCell::new_closed(Value::Nil);
        Self(Rc::new(ClosureData {
            native: Cell::new(false),
            proto: RefCell::new(Some(proto)),
            env: RefCell::new(None),
            upvalues: RefCell::new(vec![placeholder; upvalue_count]),
        }))
    }

    /// A native closure: opaque to the walker, serializable only through a
    /// builtin-name binding.
    pub fn native() -> Self {
        Self(Rc::new(ClosureData {
            native: Cell::new(true),
            proto: RefCell::new(None),
            env: RefCell::new(None),
            upvalues: RefCell::new(Vec::new()),
        }))
    }

    fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as usize)
    }
}

impl fmt::Debug for FakeClosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FakeClosure({:#x})", self.identity().0)
    }
}

impl PartialEq for FakeClosure {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for FakeClosure {}

struct CellData {
    closed: Cell<bool>,
    value: RefCell<Value<FakeHost>>,
}

/// An upvalue cell fixture, either open (still aliasing a live stack slot in
/// the interpreter this fixture is standing in for) or closed.
#[derive(Clone)]
pub struct FakeCell(Rc<CellData>);

impl FakeCell {
    /// A closed cell holding `value`.
    pub fn new_closed(value: Value<FakeHost>) -> Self {
        Self(Rc::new(CellData {
            closed: Cell::new(true),
            value: RefCell::new(value),
        }))
    }

    /// An open cell holding `value` — rejected by the walker (spec §4.1
    /// "open upvalue").
    pub fn new_open(value: Value<FakeHost>) -> Self {
        Self(Rc::new(CellData {
            closed: Cell::new(false),
            value: RefCell::new(value),
        }))
    }

    /// Overwrites the held value.
    pub fn set(&self, value: Value<FakeHost>) {
        *self.0.value.borrow_mut() = value;
    }

    /// Reads the held value.
    pub fn get(&self) -> Value<FakeHost> {
        self.0.value.borrow().clone()
    }

    fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as usize)
    }
}

impl fmt::Debug for FakeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FakeCell({:#x})", self.identity().0)
    }
}

impl PartialEq for FakeCell {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for FakeCell {}

struct ProtoData {
    upvalue_count: usize,
    nested: Vec<FakeProto>,
}

/// A function prototype fixture: an upvalue count and a list of nested
/// prototypes, in source order.
#[derive(Clone)]
pub struct FakeProto(Rc<ProtoData>);

impl FakeProto {
    /// A prototype with no nested functions.
    pub fn leaf(upvalue_count: usize) -> Self {
        Self::with_nested(upvalue_count, Vec::new())
    }

    /// A prototype with the given nested prototypes, in source order.
    pub fn with_nested(upvalue_count: usize, nested: Vec<FakeProto>) -> Self {
        Self(Rc::new(ProtoData {
            upvalue_count,
            nested,
        }))
    }

    fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as usize)
    }
}

impl fmt::Debug for FakeProto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FakeProto({:#x})", self.identity().0)
    }
}

impl PartialEq for FakeProto {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for FakeProto {}

/// Structural key equality for `FakeTable`'s "other" dict: `Nil` never
/// matches anything (including another `Nil`, mirroring Lua's refusal to
/// key a table on nil), numbers compare bitwise, tables/closures compare by
/// identity.
fn value_key_eq(a: &Value<FakeHost>, b: &Value<FakeHost>) -> bool {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x.to_bits() == y.to_bits(),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Table(x), Value::Table(y)) => x == y,
        (Value::Closure(x), Value::Closure(y)) => x == y,
        _ => false,
    }
}

impl Host for FakeHost {
    type Table = FakeTable;
    type Closure = FakeClosure;
    type Cell = FakeCell;
    type Proto = FakeProto;
    type Opaque = ();

    fn table_identity(table: &Self::Table) -> Identity {
        table.identity()
    }

    fn closure_identity(closure: &Self::Closure) -> Identity {
        closure.identity()
    }

    fn cell_identity(cell: &Self::Cell) -> Identity {
        cell.identity()
    }

    fn proto_identity(proto: &Self::Proto) -> Identity {
        proto.identity()
    }

    fn table_array(table: &Self::Table) -> Vec<Value<Self>> {
        table.0.array.borrow().clone()
    }

    fn table_string_entries(table: &Self::Table) -> Vec<(ScriptString, Value<Self>)> {
        table
            .0
            .str_dict
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn table_other_entries(table: &Self::Table) -> Vec<(Value<Self>, Value<Self>)> {
        table.0.other_dict.borrow().clone()
    }

    fn new_table(array_hint: usize, dict_hint: usize) -> Self::Table {
        FakeTable::with_capacity(array_hint, dict_hint)
    }

    fn table_append(table: &Self::Table, value: Value<Self>) {
        table.append(value);
    }

    fn table_set_string(table: &Self::Table, key: ScriptString, value: Value<Self>) {
        let mut dict = table.0.str_dict.borrow_mut();
        dict.insert(key, value);
    }

    fn table_set_other(table: &Self::Table, key: Value<Self>, value: Value<Self>) {
        table.set_other(key, value);
    }

    fn closure_is_native(closure: &Self::Closure) -> bool {
        closure.0.native.get()
    }

    fn closure_proto(closure: &Self::Closure) -> Self::Proto {
        closure
            .0
            .proto
            .borrow()
            .clone()
            .expect("native closures have no prototype")
    }

    fn closure_env(closure: &Self::Closure) -> Self::Table {
        closure
            .0
            .env
            .borrow()
            .clone()
            .expect("closure environment read before being set")
    }

    fn closure_upvalues(closure: &Self::Closure) -> Vec<Self::Cell> {
        closure.0.upvalues.borrow().clone()
    }

    fn new_closure(proto: Self::Proto, upvalue_count: usize) -> Self::Closure {
        FakeClosure::scripted_uninit(proto, upvalue_count)
    }

    fn closure_set_env(closure: &Self::Closure, env: Self::Table) {
        *closure.0.env.borrow_mut() = Some(env);
    }

    fn closure_set_upvalue(closure: &Self::Closure, index: usize, cell: Self::Cell) {
        closure.0.upvalues.borrow_mut()[index] = cell;
    }

    fn cell_is_closed(cell: &Self::Cell) -> bool {
        cell.0.closed.get()
    }

    fn cell_value(cell: &Self::Cell) -> Value<Self> {
        cell.get()
    }

    fn new_closed_cell(value: Value<Self>) -> Self::Cell {
        FakeCell::new_closed(value)
    }

    fn cell_set_value(cell: &Self::Cell, value: Value<Self>) {
        cell.set(value);
    }

    fn proto_upvalue_count(proto: &Self::Proto) -> usize {
        proto.0.upvalue_count
    }

    fn proto_nested(proto: &Self::Proto) -> Vec<Self::Proto> {
        proto.0.nested.clone()
    }

    fn table_overwrite(target: &Self::Table, source: &Self::Table) {
        *target.0.array.borrow_mut() = source.0.array.borrow().clone();
        *target.0.str_dict.borrow_mut() = source.0.str_dict.borrow().clone();
        *target.0.other_dict.borrow_mut() = source.0.other_dict.borrow().clone();
    }

    fn closure_overwrite(target: &Self::Closure, source: &Self::Closure) {
        target.0.native.set(source.0.native.get());
        *target.0.proto.borrow_mut() = source.0.proto.borrow().clone();
        *target.0.env.borrow_mut() = source.0.env.borrow().clone();
        *target.0.upvalues.borrow_mut() = source.0.upvalues.borrow().clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_table_does_not_hang_debug_formatting() {
        let t = FakeTable::new();
        t.set_string("self", Value::Table(t.clone()));
        let _ = format!("{:?}", t);
    }

    #[test]
    fn set_other_overwrites_matching_key() {
        let t = FakeTable::new();
        t.set_other(Value::Number(1.0), Value::Bool(true));
        t.set_other(Value::Number(1.0), Value::Bool(false));
        assert_eq!(FakeHost::table_other_entries(&t).len(), 1);
    }

    #[test]
    fn nil_key_never_matches_for_overwrite() {
        let t = FakeTable::new();
        t.set_other(Value::Nil, Value::Bool(true));
        t.set_other(Value::Nil, Value::Bool(false));
        assert_eq!(FakeHost::table_other_entries(&t).len(), 2);
    }
}
