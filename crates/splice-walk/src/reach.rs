//! The reachability walker (spec §4.1).

use indexmap::IndexMap;

use splice_core::host::Identity;
use splice_core::{BuiltinRegistry, Host, Value, WalkError};

/// A reached first-class value: either a table or a closure.
///
/// Builtins are included here too (as whichever of the two kinds they are) —
/// the walker stops at them rather than unfolding their contents, but they
/// are still present in the reachable set so `splice-codec` can substitute
/// them by name (spec §4.1 "builtins are thus not unfolded ... they are
/// substituted wholesale by name").
pub enum GraphNode<H: Host> {
    /// A reachable table.
    Table(H::Table),
    /// A reachable closure.
    Closure(H::Closure),
}

// Written by hand rather than `#[derive(Clone)]`: a derive would add a
// spurious `H: Clone` bound (the derive macro can't see that only
// `H::Table`/`H::Closure` need to be `Clone`, which `Host` already
// requires).
impl<H: Host> Clone for GraphNode<H> {
    fn clone(&self) -> Self {
        match self {
            GraphNode::Table(table) => GraphNode::Table(table.clone()),
            GraphNode::Closure(closure) => GraphNode::Closure(closure.clone()),
        }
    }
}

/// The result of a reachability walk: every first-class value and every
/// closed upvalue cell reachable from the roots, keyed by identity.
///
/// Uses [`IndexMap`] rather than a hash map so that a given walk call
/// produces deterministic iteration order; this has no bearing on
/// correctness (spec §4.1: "not required to be deterministic in traversal
/// order"), but it makes snapshot output reproducible across runs, which
/// property tests rely on.
pub struct Reachable<H: Host> {
    /// Reachable tables and closures, keyed by identity.
    pub values: IndexMap<Identity, GraphNode<H>>,
    /// Reachable closed upvalue cells, keyed by identity.
    pub upvalues: IndexMap<Identity, H::Cell>,
}

/// Walk the object graph reachable from `roots`, stopping at any value
/// registered in `registry` and rejecting any non-serializable node not
/// mediated by it.
///
/// Seeded by the registry's builtin tables/closures (spec §4.1 part (a))
/// plus each of `roots` (part (b)).
pub fn walk<H: Host>(
    roots: &[Value<H>],
    registry: &impl BuiltinRegistry<H>,
) -> Result<Reachable<H>, WalkError> {
    let mut values = IndexMap::new();
    let mut upvalues = IndexMap::new();

    for table in registry.builtin_tables() {
        let id = H::table_identity(&table);
        values.entry(id).or_insert(GraphNode::Table(table));
    }
    for closure in registry.builtin_closures() {
        let id = H::closure_identity(&closure);
        values.entry(id).or_insert(GraphNode::Closure(closure));
    }

    for root in roots {
        walk_value(root, registry, &mut values, &mut upvalues)?;
    }

    Ok(Reachable { values, upvalues })
}

fn walk_value<H: Host>(
    value: &Value<H>,
    registry: &impl BuiltinRegistry<H>,
    values: &mut IndexMap<Identity, GraphNode<H>>,
    upvalues: &mut IndexMap<Identity, H::Cell>,
) -> Result<(), WalkError> {
    match value {
        Value::Nil | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
        Value::Table(table) => walk_table(table, registry, values, upvalues),
        Value::Closure(closure) => walk_closure(closure, registry, values, upvalues),
        Value::Native(_) | Value::Coroutine(_) | Value::Channel(_) | Value::UserData(_) => {
            Err(WalkError::UnsupportedKind {
                kind: value.kind_name(),
            })
        }
    }
}

fn walk_table<H: Host>(
    table: &H::Table,
    registry: &impl BuiltinRegistry<H>,
    values: &mut IndexMap<Identity, GraphNode<H>>,
    upvalues: &mut IndexMap<Identity, H::Cell>,
) -> Result<(), WalkError> {
    let id = H::table_identity(table);
    if values.contains_key(&id) {
        return Ok(());
    }
    if registry.name_for_table(table).is_some() {
        values.insert(id, GraphNode::Table(table.clone()));
        return Ok(());
    }
    values.insert(id, GraphNode::Table(table.clone()));

    for element in H::table_array(table) {
        walk_value(&element, registry, values, upvalues)?;
    }
    for (_key, value) in H::table_string_entries(table) {
        walk_value(&value, registry, values, upvalues)?;
    }
    for (key, value) in H::table_other_entries(table) {
        walk_value(&key, registry, values, upvalues)?;
        walk_value(&value, registry, values, upvalues)?;
    }
    Ok(())
}

fn walk_closure<H: Host>(
    closure: &H::Closure,
    registry: &impl BuiltinRegistry<H>,
    values: &mut IndexMap<Identity, GraphNode<H>>,
    upvalues: &mut IndexMap<Identity, H::Cell>,
) -> Result<(), WalkError> {
    let id = H::closure_identity(closure);
    if values.contains_key(&id) {
        return Ok(());
    }
    if registry.name_for_closure(closure).is_some() {
        values.insert(id, GraphNode::Closure(closure.clone()));
        return Ok(());
    }
    if H::closure_is_native(closure) {
        return Err(WalkError::NativeNotSerializable { closure: id });
    }
    values.insert(id, GraphNode::Closure(closure.clone()));

    // Upvalues before environment (spec: SPEC_FULL.md §D.2), matching
    // `original_source/checkpoint.go`'s `FlattenVars` closure arm.
    for (index, cell) in H::closure_upvalues(closure).into_iter().enumerate() {
        let cell_id = H::cell_identity(&cell);
        if upvalues.contains_key(&cell_id) {
            continue;
        }
        if !H::cell_is_closed(&cell) {
            return Err(WalkError::OpenUpvalue {
                closure: id,
                upvalue_index: index,
            });
        }
        upvalues.insert(cell_id, cell.clone());
        walk_value(&H::cell_value(&cell), registry, values, upvalues)?;
    }

    let env = Value::Table(H::closure_env(closure));
    walk_value(&env, registry, values, upvalues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_core::EmptyRegistry;
    use splice_test_utils::{FakeCell, FakeClosure, FakeHost, FakeTable};

    #[test]
    fn leaf_roots_reach_nothing() {
        let roots = vec![Value::<FakeHost>::Nil, Value::Number(1.0), Value::Bool(true)];
        let reached = walk(&roots, &EmptyRegistry).unwrap();
        assert!(reached.values.is_empty());
        assert!(reached.upvalues.is_empty());
    }

    #[test]
    fn cyclic_table_is_visited_once() {
        let t = FakeTable::new();
        t.set_string("self", Value::Table(t.clone()));
        let reached = walk(&[Value::Table(t.clone())], &EmptyRegistry).unwrap();
        assert_eq!(reached.values.len(), 1);
    }

    #[test]
    fn shared_table_via_two_roots_is_one_node() {
        let shared = FakeTable::new();
        let roots = vec![Value::Table(shared.clone()), Value::Table(shared.clone())];
        let reached = walk(&roots, &EmptyRegistry).unwrap();
        assert_eq!(reached.values.len(), 1);
    }

    #[test]
    fn shared_upvalue_between_two_closures_is_one_cell() {
        let cell = FakeCell::new_closed(Value::Number(77.0));
        let proto = splice_test_utils::FakeProto::leaf(1);
        let env = FakeTable::new();
        let a = FakeClosure::scripted(proto.clone(), env.clone(), vec![cell.clone()]);
        let b = FakeClosure::scripted(proto, env, vec![cell]);
        let reached = walk(&[Value::Closure(a), Value::Closure(b)], &EmptyRegistry).unwrap();
        assert_eq!(reached.upvalues.len(), 1);
        assert_eq!(reached.values.len(), 3); // 2 closures + shared env table
    }

    #[test]
    fn open_upvalue_is_rejected() {
        let cell = FakeCell::new_open(Value::Number(1.0));
        let proto = splice_test_utils::FakeProto::leaf(1);
        let closure = FakeClosure::scripted(proto, FakeTable::new(), vec![cell]);
        let err = walk(&[Value::Closure(closure)], &EmptyRegistry).unwrap_err();
        assert!(matches!(err, WalkError::OpenUpvalue { .. }));
    }

    #[test]
    fn native_closure_outside_registry_is_rejected() {
        let closure = FakeClosure::native();
        let err = walk(&[Value::Closure(closure)], &EmptyRegistry).unwrap_err();
        assert!(matches!(err, WalkError::NativeNotSerializable { .. }));
    }

    #[test]
    fn native_closure_inside_registry_is_not_unfolded() {
        let closure = FakeClosure::native();
        let mut registry = splice_test_utils::FakeRegistry::default();
        registry.register_closure("lib.print", closure.clone());
        let reached = walk(&[Value::Closure(closure)], &registry).unwrap();
        assert_eq!(reached.values.len(), 1);
    }

    #[test]
    fn coroutine_is_rejected() {
        let err = walk(&[Value::<FakeHost>::Coroutine(())], &EmptyRegistry).unwrap_err();
        assert!(matches!(err, WalkError::UnsupportedKind { kind: "coroutine" }));
    }
}
