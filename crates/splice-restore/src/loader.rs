//! The restore loader (spec §4.4).

use indexmap::IndexMap;

use splice_codec::{EncodedValue, ProtoEntry, Record, ValueDescriptor};
use splice_core::{BuiltinRegistry, Host, NodeId, ProtoId, RestoreError, UpvalueId, Value};
use splice_walk::index_prototypes;

use crate::config::RestoreOptions;
use crate::target::{Built, Target};

/// Restore `record` onto `targets`, using `registry` to resolve builtin
/// names and `root_proto` as the restore side's loaded program.
///
/// `targets[i]` receives the root at `record.roots[i]`. Preconditions and
/// check order follow spec §4.4 and SPEC_FULL.md §D exactly:
///
/// 1. `targets.len() == record.roots.len()` ([`ArityMismatchRoots`]).
/// 2. `index_prototypes(root_proto).len() == record.protos.len()`
///    ([`PrototypeMismatch`]).
/// 3. Every reachable node is constructed, in a local memo, via on-demand
///    construction with pre-memoization — the scheme that makes cycles and
///    shared upvalues resolve to one shared object rather than diverging.
/// 4. Only once every root is fully built does splicing begin; a
///    [`TargetKindMismatch`] found here is checked either fully up front or
///    one target at a time, per
///    [`RestoreOptions::validate_before_splice`].
///
/// No `targets` entry is mutated before step 4, and construction failures
/// (steps 1-3) leave `targets` untouched (spec §4.4 "Failure").
///
/// [`ArityMismatchRoots`]: splice_core::RestoreError::ArityMismatchRoots
/// [`PrototypeMismatch`]: splice_core::RestoreError::PrototypeMismatch
/// [`TargetKindMismatch`]: splice_core::RestoreError::TargetKindMismatch
pub fn load<H: Host>(
    record: &Record,
    registry: &impl BuiltinRegistry<H>,
    root_proto: &H::Proto,
    targets: &[Target<H>],
    options: &RestoreOptions,
) -> Result<(), RestoreError> {
    if targets.len() != record.roots.len() {
        return Err(RestoreError::ArityMismatchRoots {
            targets: targets.len(),
            roots: record.roots.len(),
        });
    }

    let proto_list = index_prototypes::<H>(root_proto);
    if proto_list.len() != record.protos.len() {
        return Err(RestoreError::PrototypeMismatch {
            recorded: record.protos.len(),
            found: proto_list.len(),
        });
    }

    let proto_by_id = resolve_protos::<H>(record, &proto_list)?;

    let mut loader = Loader {
        record,
        registry,
        proto_by_id,
        values: IndexMap::with_capacity(record.values.len()),
        upvalues: IndexMap::with_capacity(record.upvalues.len()),
    };

    let mut built_roots = Vec::with_capacity(record.roots.len());
    for root_id in &record.roots {
        built_roots.push(loader.get_or_build(*root_id)?);
    }

    splice_roots(targets, &built_roots, options)
}

/// Maps every prototype ID in the record to the restore side's concrete
/// prototype handle, via its recorded pre-order position.
///
/// A dangling or out-of-range `idx` indicates a malformed record rather
/// than anything a caller passed wrong at this call — surfaced as
/// [`RestoreError::RestoreFailed`], matching spec §7's catch-all for
/// unexpected conditions encountered during construction.
fn resolve_protos<H: Host>(
    record: &Record,
    proto_list: &[H::Proto],
) -> Result<IndexMap<ProtoId, H::Proto>, RestoreError> {
    let mut by_id = IndexMap::with_capacity(record.protos.len());
    for (id, ProtoEntry { idx }) in &record.protos {
        let proto = proto_list.get(*idx as usize).ok_or_else(|| RestoreError::RestoreFailed {
            reason: format!("prototype id {id} has out-of-range index {idx}"),
        })?;
        by_id.insert(*id, proto.clone());
    }
    Ok(by_id)
}

/// Splices every built root onto its target, per
/// [`RestoreOptions::validate_before_splice`].
fn splice_roots<H: Host>(
    targets: &[Target<H>],
    built_roots: &[Built<H>],
    options: &RestoreOptions,
) -> Result<(), RestoreError> {
    if options.validate_before_splice {
        for (index, (target, built)) in targets.iter().zip(built_roots).enumerate() {
            check_kind(target, built, index)?;
        }
        for (target, built) in targets.iter().zip(built_roots) {
            splice_one::<H>(target, built);
        }
    } else {
        for (index, (target, built)) in targets.iter().zip(built_roots).enumerate() {
            check_kind(target, built, index)?;
            splice_one::<H>(target, built);
        }
    }
    Ok(())
}

fn check_kind<H: Host>(target: &Target<H>, built: &Built<H>, index: usize) -> Result<(), RestoreError> {
    match (target, built) {
        (Target::Table(_), Built::Table(_)) | (Target::Closure(_), Built::Closure(_)) => Ok(()),
        _ => Err(RestoreError::TargetKindMismatch { index }),
    }
}

fn splice_one<H: Host>(target: &Target<H>, built: &Built<H>) {
    match (target, built) {
        (Target::Table(target), Built::Table(source)) => H::table_overwrite(target, source),
        (Target::Closure(target), Built::Closure(source)) => H::closure_overwrite(target, source),
        _ => unreachable!("kind checked by check_kind before splice_one is ever called"),
    }
}

/// Per-call construction state: the in-flight node and upvalue memos that
/// make on-demand construction with pre-memoization work (spec §4.4).
struct Loader<'a, H: Host, R: BuiltinRegistry<H> + ?Sized> {
    record: &'a Record,
    registry: &'a R,
    proto_by_id: IndexMap<ProtoId, H::Proto>,
    values: IndexMap<NodeId, Built<H>>,
    upvalues: IndexMap<UpvalueId, H::Cell>,
}

impl<'a, H: Host, R: BuiltinRegistry<H> + ?Sized> Loader<'a, H, R> {
    /// Builds (or returns the already-built) node for `id`.
    ///
    /// The memo insert happens *before* recursing into a node's children —
    /// this is the ordering that resolves cycles and shared sub-structure
    /// to one object instead of infinite recursion (spec §4.4).
    fn get_or_build(&mut self, id: NodeId) -> Result<Built<H>, RestoreError> {
        if let Some(built) = self.values.get(&id) {
            return Ok(built.clone());
        }

        let descriptor = self
            .record
            .values
            .get(&id)
            .ok_or_else(|| RestoreError::RestoreFailed {
                reason: format!("value id {id} is referenced but not defined in the record"),
            })?;

        match descriptor {
            ValueDescriptor::Builtin(name) => self.build_builtin(id, name),
            ValueDescriptor::Table { array, keys, values } => {
                self.build_table(id, array, keys, values)
            }
            ValueDescriptor::Closure { env, proto, upvalues } => {
                self.build_closure(id, *env, *proto, upvalues)
            }
        }
    }

    fn build_builtin(&mut self, id: NodeId, name: &str) -> Result<Built<H>, RestoreError> {
        let built = if let Some(table) = self.registry.table_by_name(name) {
            Built::Table(table)
        } else if let Some(closure) = self.registry.closure_by_name(name) {
            Built::Closure(closure)
        } else {
            return Err(RestoreError::UnknownBuiltin {
                name: name.to_string(),
            });
        };
        self.values.insert(id, built.clone());
        Ok(built)
    }

    fn build_table(
        &mut self,
        id: NodeId,
        array: &[EncodedValue],
        keys: &[EncodedValue],
        values: &[EncodedValue],
    ) -> Result<Built<H>, RestoreError> {
        let table = H::new_table(array.len(), keys.len());
        self.values.insert(id, Built::Table(table.clone())); // memoize before children

        for encoded in array {
            let value = self.resolve(encoded)?;
            H::table_append(&table, value);
        }
        for (key, value) in keys.iter().zip(values.iter()) {
            match key {
                EncodedValue::String(s) => {
                    let value = self.resolve(value)?;
                    H::table_set_string(&table, s.clone(), value);
                }
                other => {
                    let key = self.resolve(other)?;
                    let value = self.resolve(value)?;
                    H::table_set_other(&table, key, value);
                }
            }
        }

        Ok(Built::Table(table))
    }

    fn build_closure(
        &mut self,
        id: NodeId,
        env: NodeId,
        proto: ProtoId,
        upvalues: &[UpvalueId],
    ) -> Result<Built<H>, RestoreError> {
        let proto_handle = self
            .proto_by_id
            .get(&proto)
            .cloned()
            .ok_or_else(|| RestoreError::RestoreFailed {
                reason: format!("closure {id} references undefined prototype {proto}"),
            })?;

        let expected = H::proto_upvalue_count(&proto_handle);
        if expected != upvalues.len() {
            return Err(RestoreError::ArityMismatch {
                expected,
                found: upvalues.len(),
            });
        }

        let closure = H::new_closure(proto_handle, expected);
        self.values.insert(id, Built::Closure(closure.clone())); // memoize before children

        let env_built = self.get_or_build(env)?;
        let env_table = match env_built {
            Built::Table(table) => table,
            Built::Closure(_) => {
                return Err(RestoreError::RestoreFailed {
                    reason: format!(
                        "closure {id}'s environment ({env}) resolved to a closure, not a table"
                    ),
                })
            }
        };
        H::closure_set_env(&closure, env_table);

        for (index, upvalue_id) in upvalues.iter().enumerate() {
            let cell = self.get_or_build_upvalue(*upvalue_id)?;
            H::closure_set_upvalue(&closure, index, cell);
        }

        Ok(Built::Closure(closure))
    }

    /// Resolves an inline scalar directly, or a pointer by building (or
    /// returning the memoized build of) the node it names.
    fn resolve(&mut self, encoded: &EncodedValue) -> Result<Value<H>, RestoreError> {
        Ok(match encoded {
            EncodedValue::Nil => Value::Nil,
            EncodedValue::Bool(b) => Value::Bool(*b),
            EncodedValue::Number(n) => Value::Number(*n),
            EncodedValue::String(s) => Value::String(s.clone()),
            EncodedValue::Ptr(id) => match self.get_or_build(*id)? {
                Built::Table(table) => Value::Table(table),
                Built::Closure(closure) => Value::Closure(closure),
            },
        })
    }

    /// Builds (or returns the already-built) upvalue cell for `uid`.
    ///
    /// The cell is created and memoized *before* its held value is
    /// resolved — a cell may transitively hold a value that leads back to
    /// a closure capturing this same cell, and the memo is what breaks
    /// that cycle (spec §4.4 `getOrBuildUpvalue`).
    fn get_or_build_upvalue(&mut self, uid: UpvalueId) -> Result<H::Cell, RestoreError> {
        if let Some(cell) = self.upvalues.get(&uid) {
            return Ok(cell.clone());
        }

        let entry = self
            .record
            .upvalues
            .get(&uid)
            .ok_or_else(|| RestoreError::RestoreFailed {
                reason: format!("upvalue id {uid} is referenced but not defined in the record"),
            })?;

        let cell = H::new_closed_cell(Value::Nil);
        self.upvalues.insert(uid, cell.clone()); // memoize before the held value

        let value = self.resolve(&entry.value)?;
        H::cell_set_value(&cell, value);

        Ok(cell)
    }
}
