//! Reachability walker and prototype indexer (spec §4.1, §4.2).
//!
//! Mirrors the identity/graph modules of `murk-arena`: this crate owns
//! traversal of a live, mutable, possibly-cyclic object graph and hands the
//! result to `splice-codec` as plain, already-classified data — it never
//! touches the wire-shaped [`Record`](https://docs.rs/splice-codec).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod indexer;
pub mod reach;

pub use indexer::index_prototypes;
pub use reach::{walk, GraphNode, Reachable};
