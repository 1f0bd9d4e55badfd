use indexmap::IndexMap;

use splice_core::builtin::BuiltinRegistry;

use crate::fixtures::{FakeClosure, FakeHost, FakeTable};

/// A [`BuiltinRegistry`] backed by two name-keyed maps.
///
/// Registration takes `&mut self` rather than interior mutability: returning
/// `Option<&str>` borrowed from a `RefCell`-wrapped map would tie the
/// borrow's lifetime to a temporary `Ref`, which the trait signature (a
/// borrow of `&self`) can't express. Plain fields sidestep that.
#[derive(Default)]
pub struct FakeRegistry {
    tables: IndexMap<String, FakeTable>,
    closures: IndexMap<String, FakeClosure>,
}

impl FakeRegistry {
    /// Registers `table` under `name`.
    pub fn register_table(&mut self, name: &str, table: FakeTable) {
        self.tables.insert(name.to_string(), table);
    }

    /// Registers `closure` under `name`.
    pub fn register_closure(&mut self, name: &str, closure: FakeClosure) {
        self.closures.insert(name.to_string(), closure);
    }
}

impl BuiltinRegistry<FakeHost> for FakeRegistry {
    fn name_for_table(&self, table: &FakeTable) -> Option<&str> {
        self.tables
            .iter()
            .find(|(_, t)| *t == table)
            .map(|(name, _)| name.as_str())
    }

    fn name_for_closure(&self, closure: &FakeClosure) -> Option<&str> {
        self.closures
            .iter()
            .find(|(_, c)| *c == closure)
            .map(|(name, _)| name.as_str())
    }

    fn table_by_name(&self, name: &str) -> Option<FakeTable> {
        self.tables.get(name).cloned()
    }

    fn closure_by_name(&self, name: &str) -> Option<FakeClosure> {
        self.closures.get(name).cloned()
    }

    fn builtin_tables(&self) -> Vec<FakeTable> {
        self.tables.values().cloned().collect()
    }

    fn builtin_closures(&self) -> Vec<FakeClosure> {
        self.closures.values().cloned().collect()
    }
}
