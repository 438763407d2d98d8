//! SPARQL endpoint access
//!
//! The `SchemaSource` trait is the seam between the refresher and the
//! network; `SparqlClient` is the production implementation.

mod client;

pub use client::{SchemaSource, SparqlClient};
