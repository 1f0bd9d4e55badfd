//! Snapshot-local identifiers.
//!
//! A [`NodeId`], [`UpvalueId`], or [`ProtoId`] is unique only within the
//! [`Record`](https://docs.rs/splice-codec) it was assigned in; stability
//! across records is not guaranteed (spec §6.2). The reference design
//! derives these directly from the in-process [`Identity`](crate::Identity)
//! of the node they name — any injective function from identity to integer
//! is equally valid (spec §9 "Identity via stable keys").

use std::fmt;

use crate::host::Identity;

/// Identifies a reachable value (a table, a closure, or a builtin) within
/// one snapshot record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Identifies a reachable, closed upvalue cell within one snapshot record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UpvalueId(pub u64);

/// Identifies a reachable function prototype within one snapshot record.
///
/// Distinct from the prototype's pre-order position (its `idx`, see
/// [`ProtoEntry`](https://docs.rs/splice-codec)): the ID is an opaque node
/// identity, the `idx` is the stable, cross-process index into the
/// [prototype indexer's](https://docs.rs/splice-walk) listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProtoId(pub u64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Derive an ID from a node's in-process identity.
            #[must_use]
            pub fn from_identity(identity: Identity) -> Self {
                Self(identity.0 as u64)
            }
        }

        impl From<Identity> for $name {
            fn from(identity: Identity) -> Self {
                Self::from_identity(identity)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(NodeId);
impl_id!(UpvalueId);
impl_id!(ProtoId);
