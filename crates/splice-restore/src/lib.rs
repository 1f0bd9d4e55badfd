//! The restore loader (spec §4.4): rebuilds a snapshot record onto a fresh
//! interpreter and splices the result onto caller-supplied targets.
//!
//! Mirrors `murk-engine`'s orchestration layer: `splice-walk` and
//! `splice-codec` are the narrow, single-purpose crates (graph traversal,
//! record shape), and this crate is where the pieces are driven end to end,
//! the way `murk-engine::lockstep`/`realtime` drive `murk-arena` and
//! `murk-propagator` through a full tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod loader;
pub mod target;

pub use config::RestoreOptions;
pub use loader::load;
pub use target::Target;

#[cfg(test)]
mod tests {
    use splice_codec::build;
    use splice_core::{EmptyRegistry, Host, Value};
    use splice_test_utils::{FakeCell, FakeClosure, FakeHost, FakeProto, FakeRegistry, FakeTable};

    use super::*;

    #[test]
    fn round_trips_a_cyclic_table() {
        let t = FakeTable::new();
        t.set_string("self", Value::Table(t.clone()));
        let proto = FakeProto::leaf(0);
        let record = build(&[Value::Table(t)], &EmptyRegistry, &proto).unwrap();

        let target = FakeTable::new();
        let targets = vec![Target::Table(target.clone())];
        load::<FakeHost>(
            &record,
            &EmptyRegistry,
            &proto,
            &targets,
            &RestoreOptions::default(),
        )
        .unwrap();

        match target.get_string("self") {
            Some(Value::Table(inner)) => assert_eq!(inner, target),
            other => panic!(
                "expected self-referential table, got kind {:?}",
                other.as_ref().map(Value::kind_name)
            ),
        }
    }

    #[test]
    fn shared_upvalue_stays_shared_across_two_restored_closures() {
        let cell = FakeCell::new_closed(Value::Number(77.0));
        let proto = FakeProto::leaf(1);
        let env = FakeTable::new();
        let a = FakeClosure::scripted(proto.clone(), env.clone(), vec![cell.clone()]);
        let b = FakeClosure::scripted(proto.clone(), env, vec![cell]);
        let record = build(
            &[Value::Closure(a), Value::Closure(b)],
            &EmptyRegistry,
            &proto,
        )
        .unwrap();

        let target_a = FakeClosure::native();
        let target_b = FakeClosure::native();
        let targets = vec![
            Target::Closure(target_a.clone()),
            Target::Closure(target_b.clone()),
        ];
        load::<FakeHost>(
            &record,
            &EmptyRegistry,
            &proto,
            &targets,
            &RestoreOptions::default(),
        )
        .unwrap();

        let upvalues_a = FakeHost::closure_upvalues(&target_a);
        let upvalues_b = FakeHost::closure_upvalues(&target_b);
        assert_eq!(upvalues_a[0], upvalues_b[0]);

        upvalues_a[0].set(Value::Number(100.0));
        assert!(matches!(upvalues_b[0].get(), Value::Number(n) if n == 100.0));
    }

    #[test]
    fn builtin_resolves_to_the_restore_side_value() {
        let mut snapshot_registry = FakeRegistry::default();
        let snapshot_builtin = FakeTable::new();
        snapshot_builtin.set_string("poison", Value::Number(1.0));
        snapshot_registry.register_table("lib.base", snapshot_builtin.clone());

        let root = FakeTable::new();
        root.set_string("base", Value::Table(snapshot_builtin));
        let proto = FakeProto::leaf(0);
        let record = build(&[Value::Table(root)], &snapshot_registry, &proto).unwrap();

        let mut restore_registry = FakeRegistry::default();
        let restore_side_builtin = FakeTable::new();
        restore_registry.register_table("lib.base", restore_side_builtin.clone());

        let target = FakeTable::new();
        let targets = vec![Target::Table(target.clone())];
        load::<FakeHost>(
            &record,
            &restore_registry,
            &proto,
            &targets,
            &RestoreOptions::default(),
        )
        .unwrap();

        match target.get_string("base") {
            Some(Value::Table(resolved)) => {
                assert_eq!(resolved, restore_side_builtin);
                assert!(resolved.get_string("poison").is_none());
            }
            other => panic!(
                "expected the restore-side builtin table, got kind {:?}",
                other.as_ref().map(Value::kind_name)
            ),
        }
    }

    #[test]
    fn unknown_builtin_on_restore_side_fails() {
        let mut snapshot_registry = FakeRegistry::default();
        let builtin = FakeTable::new();
        snapshot_registry.register_table("lib.only-on-snapshot-side", builtin.clone());
        let proto = FakeProto::leaf(0);
        let record = build(&[Value::Table(builtin)], &snapshot_registry, &proto).unwrap();

        let target = FakeTable::new();
        let targets = vec![Target::Table(target)];
        let err = load::<FakeHost>(
            &record,
            &EmptyRegistry,
            &proto,
            &targets,
            &RestoreOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, splice_core::RestoreError::UnknownBuiltin { .. }));
    }

    #[test]
    fn root_count_mismatch_fails_before_touching_any_target() {
        let t = FakeTable::new();
        let proto = FakeProto::leaf(0);
        let record = build(&[Value::Table(t)], &EmptyRegistry, &proto).unwrap();

        let sentinel = FakeTable::new();
        sentinel.set_string("untouched", Value::Bool(true));
        let targets = vec![
            Target::Table(sentinel.clone()),
            Target::Table(FakeTable::new()),
        ];
        let err = load::<FakeHost>(
            &record,
            &EmptyRegistry,
            &proto,
            &targets,
            &RestoreOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            splice_core::RestoreError::ArityMismatchRoots { targets: 2, roots: 1 }
        ));
        assert!(matches!(sentinel.get_string("untouched"), Some(Value::Bool(true))));
    }

    #[test]
    fn prototype_count_mismatch_is_rejected() {
        let t = FakeTable::new();
        let snapshot_proto = FakeProto::with_nested(0, vec![FakeProto::leaf(0)]);
        let record = build(&[Value::Table(t)], &EmptyRegistry, &snapshot_proto).unwrap();

        let restore_proto = FakeProto::leaf(0); // only 1 proto, snapshot recorded 2
        let targets = vec![Target::Table(FakeTable::new())];
        let err = load::<FakeHost>(
            &record,
            &EmptyRegistry,
            &restore_proto,
            &targets,
            &RestoreOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            splice_core::RestoreError::PrototypeMismatch { recorded: 2, found: 1 }
        ));
    }

    #[test]
    fn target_kind_mismatch_with_validation_leaves_both_targets_untouched() {
        let table_root = FakeTable::new();
        table_root.set_string("marker", Value::Bool(true));
        let proto = FakeProto::leaf(1);
        let env = FakeTable::new();
        let closure_root = FakeClosure::scripted(proto.clone(), env, vec![]);
        let record = build(
            &[Value::Table(table_root), Value::Closure(closure_root)],
            &EmptyRegistry,
            &proto,
        )
        .unwrap();

        // Swap the target kinds: root 0 is a table but we hand a closure, and
        // vice versa.
        let closure_target = FakeClosure::native();
        let table_target = FakeTable::new();
        table_target.set_string("sentinel", Value::Bool(true));
        let targets = vec![
            Target::Closure(closure_target.clone()),
            Target::Table(table_target.clone()),
        ];

        let err = load::<FakeHost>(
            &record,
            &EmptyRegistry,
            &proto,
            &targets,
            &RestoreOptions::default(), // validate_before_splice: true
        )
        .unwrap_err();
        assert!(matches!(
            err,
            splice_core::RestoreError::TargetKindMismatch { index: 0 }
        ));
        // Neither target was touched: the second target's kind also
        // mismatches, and pre-validation runs before any splice.
        assert!(matches!(
            table_target.get_string("sentinel"),
            Some(Value::Bool(true))
        ));
    }

    #[test]
    fn closure_upvalue_arity_mismatch_is_rejected() {
        // Build a record by hand where the closure descriptor's upvalue list
        // disagrees with the prototype's declared count.
        let proto_two_upvalues = FakeProto::leaf(2);
        let env = FakeTable::new();
        let one_cell = vec![FakeCell::new_closed(Value::Nil)];
        let closure = FakeClosure::scripted(proto_two_upvalues.clone(), env, one_cell);
        let record = build(
            &[Value::Closure(closure)],
            &EmptyRegistry,
            &proto_two_upvalues,
        )
        .unwrap();

        let target = FakeClosure::native();
        let targets = vec![Target::Closure(target)];
        let err = load::<FakeHost>(
            &record,
            &EmptyRegistry,
            &proto_two_upvalues,
            &targets,
            &RestoreOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            splice_core::RestoreError::ArityMismatch { expected: 2, found: 1 }
        ));
    }
}
