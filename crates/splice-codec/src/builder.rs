//! The snapshot builder (spec §4.3).

use indexmap::IndexMap;

use splice_core::{BuiltinRegistry, Host, NodeId, ProtoId, UpvalueId, Value, WalkError};
use splice_walk::{index_prototypes, GraphNode};

use crate::types::{EncodedValue, ProtoEntry, Record, UpvalueEntry, ValueDescriptor};

/// Builds a [`Record`] describing the graph reachable from `roots`.
///
/// Runs the reachability walk first (spec §4.3 step 1); every subsequent
/// step operates on its already-validated output, so the only way this
/// fails is a walk failure — builder logic itself does not introduce new
/// error kinds (spec §4.3 "Failure").
pub fn build<H: Host>(
    roots: &[Value<H>],
    registry: &impl BuiltinRegistry<H>,
    root_proto: &H::Proto,
) -> Result<Record, WalkError> {
    let proto_list = index_prototypes::<H>(root_proto);
    let mut protos = IndexMap::with_capacity(proto_list.len());
    for (position, proto) in proto_list.iter().enumerate() {
        let id = ProtoId::from_identity(H::proto_identity(proto));
        protos.insert(
            id,
            ProtoEntry {
                idx: position as u64,
            },
        );
    }

    let reached = splice_walk::walk(roots, registry)?;

    let mut upvalues = IndexMap::with_capacity(reached.upvalues.len());
    for (identity, cell) in &reached.upvalues {
        let id = UpvalueId::from_identity(*identity);
        let value = encode::<H>(&H::cell_value(cell));
        upvalues.insert(id, UpvalueEntry { value });
    }

    let mut values = IndexMap::with_capacity(reached.values.len());
    for (identity, node) in &reached.values {
        let id = NodeId::from_identity(*identity);
        let descriptor = match node {
            GraphNode::Table(table) => {
                if let Some(name) = registry.name_for_table(table) {
                    ValueDescriptor::Builtin(name.to_string())
                } else {
                    describe_table::<H>(table)
                }
            }
            GraphNode::Closure(closure) => {
                if let Some(name) = registry.name_for_closure(closure) {
                    ValueDescriptor::Builtin(name.to_string())
                } else {
                    describe_closure::<H>(closure)
                }
            }
        };
        values.insert(id, descriptor);
    }

    let roots = roots
        .iter()
        .map(root_node_id::<H>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Record {
        protos,
        upvalues,
        values,
        roots,
    })
}

fn root_node_id<H: Host>(root: &Value<H>) -> Result<NodeId, WalkError> {
    match root {
        Value::Table(table) => Ok(NodeId::from_identity(H::table_identity(table))),
        Value::Closure(closure) => Ok(NodeId::from_identity(H::closure_identity(closure))),
        other => Err(WalkError::UnsupportedKind {
            kind: other.kind_name(),
        }),
    }
}

fn describe_table<H: Host>(table: &H::Table) -> ValueDescriptor {
    let array = H::table_array(table).iter().map(encode::<H>).collect();

    let mut keys = Vec::new();
    let mut values = Vec::new();
    for (key, value) in H::table_string_entries(table) {
        keys.push(EncodedValue::String(key));
        values.push(encode::<H>(&value));
    }
    for (key, value) in H::table_other_entries(table) {
        keys.push(encode::<H>(&key));
        values.push(encode::<H>(&value));
    }

    ValueDescriptor::Table {
        array,
        keys,
        values,
    }
}

fn describe_closure<H: Host>(closure: &H::Closure) -> ValueDescriptor {
    let env = NodeId::from_identity(H::table_identity(&H::closure_env(closure)));
    let proto = ProtoId::from_identity(H::proto_identity(&H::closure_proto(closure)));
    let upvalues = H::closure_upvalues(closure)
        .iter()
        .map(|cell| UpvalueId::from_identity(H::cell_identity(cell)))
        .collect();

    ValueDescriptor::Closure {
        env,
        proto,
        upvalues,
    }
}

/// Encodes a value already proven reachable-without-failure by the walk
/// that precedes every call site in this module.
fn encode<H: Host>(value: &Value<H>) -> EncodedValue {
    match value {
        Value::Nil => EncodedValue::Nil,
        Value::Bool(b) => EncodedValue::Bool(*b),
        Value::Number(n) => EncodedValue::Number(*n),
        Value::String(s) => EncodedValue::String(s.clone()),
        Value::Table(table) => EncodedValue::Ptr(NodeId::from_identity(H::table_identity(table))),
        Value::Closure(closure) => {
            EncodedValue::Ptr(NodeId::from_identity(H::closure_identity(closure)))
        }
        Value::Native(_) | Value::Coroutine(_) | Value::Channel(_) | Value::UserData(_) => {
            unreachable!("non-serializable value survived the reachability walk")
        }
    }
}
