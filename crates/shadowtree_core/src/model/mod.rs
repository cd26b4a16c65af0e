//! Outline node identity and property-source model.
//!
//! # Responsibility
//! - Define the handle/id pair used to address outline nodes.
//! - Define how inheritable node properties report their origin.
//!
//! # Invariants
//! - A `NodeId` is allocated at most once per node and never reused.
//! - Handles are only meaningful for the store that issued them.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod node;
