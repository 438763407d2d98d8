//! Schema data model
//!
//! Typed records for RDF classes and predicates, the static namespace table,
//! and the immutable snapshot bundle published by the refresher.

mod element;
mod namespace;
mod snapshot;

pub use element::{local_name, namespace_of, ElementKind, SchemaElement};
pub use namespace::{NamespaceInfo, NamespaceTable, DEFAULT_COLOR};
pub use snapshot::{NamespaceSummary, SchemaSnapshot, SnapshotSource, SnapshotStats};
