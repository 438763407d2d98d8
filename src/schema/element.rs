//! Schema element records
//!
//! A schema element is either an RDF class or a predicate, identified by its
//! URI. Labels and namespaces are derived from the URI, never stored
//! authoritatively elsewhere.

use serde::{Deserialize, Serialize};

/// Kind of schema element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Class,
    Predicate,
}

impl ElementKind {
    /// Lowercase display name ("class" / "predicate")
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Predicate => "predicate",
        }
    }
}

/// A single class or predicate from the schema graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaElement {
    /// Full URI, globally unique within its kind
    pub uri: String,

    /// Display label derived from the URI suffix
    pub label: String,

    /// Namespace prefix (up to and including '#' or the last '/')
    pub namespace: String,

    /// Class or predicate
    pub kind: ElementKind,
}

impl SchemaElement {
    /// Build an element from a bare URI, deriving label and namespace
    pub fn from_uri(uri: impl Into<String>, kind: ElementKind) -> Self {
        let uri = uri.into();
        let label = local_name(&uri);
        let namespace = namespace_of(&uri);
        Self {
            uri,
            label,
            namespace,
            kind,
        }
    }
}

/// Extract the local name from a URI: the part after '#', or after the last '/'
pub fn local_name(uri: &str) -> String {
    if let Some((_, frag)) = uri.rsplit_once('#') {
        frag.to_string()
    } else {
        uri.rsplit('/').next().unwrap_or(uri).to_string()
    }
}

/// Extract the namespace prefix from a URI, including the trailing '#' or '/'
pub fn namespace_of(uri: &str) -> String {
    if let Some((base, _)) = uri.rsplit_once('#') {
        format!("{}#", base)
    } else if let Some((base, _)) = uri.rsplit_once('/') {
        format!("{}/", base)
    } else {
        uri.to_string()
    }
}
