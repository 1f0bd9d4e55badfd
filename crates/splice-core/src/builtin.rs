//! The builtin registry (spec §3 "Builtin registry").
//!
//! A caller-supplied bijection between a set of script values — tables or
//! native-backed closures, typically standard-library roots — and short
//! symbolic names. This is the only way a non-serializable or host-opaque
//! value is permitted to enter the reachable graph: the walker stops at any
//! value registered here and the builder substitutes it with its name
//! (spec §4.1, §4.3); the restore loader resolves the name back to a live
//! value on the target side (spec §4.4).
//!
//! Mirrors `gopher-lua`'s `map[LValue]string` / `map[string]LValue` pair
//! (`original_source/checkpoint.go`), but as one trait so a single registry
//! type can be constructed once per interpreter instance and handed to both
//! directions of the engine.

use crate::host::Host;

/// A bijection between host values and symbolic names.
///
/// Implementations are expected to be cheap to query — the walker calls
/// `name_for_*` once per reachable table/closure node.
pub trait BuiltinRegistry<H: Host> {
    /// The symbolic name registered for `table`, if any.
    fn name_for_table(&self, table: &H::Table) -> Option<&str>;
    /// The symbolic name registered for `closure`, if any.
    fn name_for_closure(&self, closure: &H::Closure) -> Option<&str>;

    /// The table registered under `name`, if any.
    fn table_by_name(&self, name: &str) -> Option<H::Table>;
    /// The closure registered under `name`, if any.
    fn closure_by_name(&self, name: &str) -> Option<H::Closure>;

    /// All registered table builtins, for walker pre-seeding (spec §4.1:
    /// "seeded by ... the non-static builtin values pre-inserted into
    /// `values`").
    fn builtin_tables(&self) -> Vec<H::Table>;
    /// All registered closure builtins, for walker pre-seeding.
    fn builtin_closures(&self) -> Vec<H::Closure>;
}

/// A [`BuiltinRegistry`] with no entries.
///
/// Useful for roots that reach no builtins, or in tests.
pub struct EmptyRegistry;

impl<H: Host> BuiltinRegistry<H> for EmptyRegistry {
    fn name_for_table(&self, _table: &H::Table) -> Option<&str> {
        None
    }

    fn name_for_closure(&self, _closure: &H::Closure) -> Option<&str> {
        None
    }

    fn table_by_name(&self, _name: &str) -> Option<H::Table> {
        None
    }

    fn closure_by_name(&self, _name: &str) -> Option<H::Closure> {
        None
    }

    fn builtin_tables(&self) -> Vec<H::Table> {
        Vec::new()
    }

    fn builtin_closures(&self) -> Vec<H::Closure> {
        Vec::new()
    }
}
