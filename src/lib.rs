//! Schemascope - Live Exploration Dashboard for RDF Schema Graphs
//!
//! Schemascope fetches the class and predicate inventory of a knowledge
//! graph from its SPARQL endpoint, keeps it in an atomically-replaced
//! in-memory snapshot with a file-backed fallback, and serves browsable
//! views and a force-directed schema visualization over HTTP.
//!
//! # Architecture
//!
//! - **schema**: Core data structures (SchemaElement, NamespaceTable, SchemaSnapshot)
//! - **sparql**: SPARQL endpoint client and the `SchemaSource` seam
//! - **cache**: Snapshot store with publish/fallback semantics
//! - **refresher**: Background refresh loop with manual-refresh coalescing
//! - **viz**: Graph assembly and spring layout
//! - **server**: axum dashboard and JSON API
//! - **config**: YAML configuration file handling

// Core modules
pub mod config;
pub mod error;
pub mod schema;

// Components
pub mod cache;
pub mod logging;
pub mod refresher;
pub mod server;
pub mod sparql;
pub mod viz;

// Re-exports
pub use error::{Result, SchemascopeError};
