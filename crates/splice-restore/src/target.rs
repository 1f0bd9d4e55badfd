//! Splice targets (spec §4.4 "Splicing to targets").

use splice_core::Host;

/// A caller-supplied holder to splice a restored root onto.
///
/// The loader never constructs these — they come from the caller, typically
/// already reachable from the restore side's globals — and are overwritten
/// in place so every existing reference to them observes the restored
/// content from then on.
pub enum Target<H: Host> {
    /// A table holder.
    Table(H::Table),
    /// A closure holder.
    Closure(H::Closure),
}

impl<H: Host> Clone for Target<H> {
    fn clone(&self) -> Self {
        match self {
            Target::Table(table) => Target::Table(table.clone()),
            Target::Closure(closure) => Target::Closure(closure.clone()),
        }
    }
}

/// A freshly built root or sub-node: either a table or a closure, never one
/// of the non-serializable kinds (the loader only ever constructs these
/// two, or resolves a builtin name to a host value of one of these two
/// kinds).
pub(crate) enum Built<H: Host> {
    Table(H::Table),
    Closure(H::Closure),
}

impl<H: Host> Clone for Built<H> {
    fn clone(&self) -> Self {
        match self {
            Built::Table(table) => Built::Table(table.clone()),
            Built::Closure(closure) => Built::Closure(closure.clone()),
        }
    }
}
