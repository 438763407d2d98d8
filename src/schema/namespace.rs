//! Static namespace table
//!
//! Maps namespace prefixes to canonical short names and display colors.
//! Lookup is longest-prefix match so nested prefixes resolve to the most
//! specific entry; unknown namespaces get the default color.

use lazy_static::lazy_static;

/// Color assigned to namespaces not present in the table
pub const DEFAULT_COLOR: &str = "#6B7280";

/// One known namespace prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceInfo {
    /// Namespace prefix, including the trailing '#' or '/'
    pub prefix: &'static str,

    /// Canonical short name used in tables and legends
    pub short_name: &'static str,

    /// Display color (hex)
    pub color: &'static str,
}

lazy_static! {
    static ref KNOWN_NAMESPACES: Vec<NamespaceInfo> = vec![
        ns("https://portal.odissei.nl/schema/geospatial#", "geospatial", "#3B82F6"),
        ns("https://portal.odissei.nl/schema/dansMetadata#", "dansMetadata", "#10B981"),
        ns("https://portal.odissei.nl/schema/enrichments#", "enrichments", "#F59E0B"),
        ns("https://portal.odissei.nl/schema/provenance#", "provenance", "#EF4444"),
        ns(
            "https://portal.odissei.nl/schema/questionInformation#",
            "questionInformation",
            "#8B5CF6"
        ),
        ns("https://portal.odissei.nl/schema/socialscience#", "socialscience", "#EC4899"),
        ns(
            "https://portal.odissei.nl/schema/variableInformation#",
            "variableInformation",
            "#06B6D4"
        ),
        ns("https://dataverse.org/schema/citation/", "citation", "#F97316"),
        ns("https://dataverse.org/schema/core#", "core", "#84CC16"),
        ns("https://w3id.org/nwo-research-fields#", "nwo-research-fields", "#6366F1"),
        ns(
            "https://w3id.org/research-technology-readiness-levels#",
            "research-technology-readiness-levels",
            "#14B8A6"
        ),
        ns("https://w3id.org/software-types#", "software-types", "#F43F5E"),
        ns(
            "http://rdf-vocabulary.ddialliance.org/discovery#",
            "discovery",
            "#A855F7"
        ),
        ns("http://xmlns.com/foaf/0.1/", "foaf", "#22C55E"),
        ns("https://www.w3.org/TR/prov-o/#", "prov-o", "#64748B"),
    ];
}

fn ns(prefix: &'static str, short_name: &'static str, color: &'static str) -> NamespaceInfo {
    NamespaceInfo {
        prefix,
        short_name,
        color,
    }
}

/// Read-only view over the known namespace prefixes
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceTable;

impl NamespaceTable {
    /// All known namespace entries
    pub fn entries() -> &'static [NamespaceInfo] {
        &KNOWN_NAMESPACES
    }

    /// Longest-prefix match of a namespace (or full URI) against the table
    pub fn lookup(namespace: &str) -> Option<&'static NamespaceInfo> {
        KNOWN_NAMESPACES
            .iter()
            .filter(|info| namespace.starts_with(info.prefix) || info.prefix == namespace)
            .max_by_key(|info| info.prefix.len())
    }

    /// Display color for a namespace, defaulting for unknown prefixes
    pub fn color(namespace: &str) -> &'static str {
        Self::lookup(namespace).map(|i| i.color).unwrap_or(DEFAULT_COLOR)
    }

    /// Short display name for a namespace
    ///
    /// Known prefixes use their canonical short name; unknown ones derive it
    /// from the last meaningful path segment.
    pub fn short_name(namespace: &str) -> String {
        if let Some(info) = Self::lookup(namespace) {
            return info.short_name.to_string();
        }
        derive_short_name(namespace)
    }

    /// True when the namespace belongs to the dashboard's home domains
    /// (used to mark predicates as domain-specific)
    pub fn is_domain_predicate(namespace: &str) -> bool {
        let lower = namespace.to_lowercase();
        lower.contains("odissei") || lower.contains("dataverse")
    }

    /// True when the namespace is domain-relevant for classes, which casts a
    /// wider net than predicates (w3id vocabularies and FOAF included)
    pub fn is_domain_class(namespace: &str) -> bool {
        let lower = namespace.to_lowercase();
        lower.contains("odissei")
            || lower.contains("dataverse")
            || lower.contains("w3id.org")
            || lower.contains("foaf")
    }
}

/// Derive a short name from a namespace URI: the last path segment, with a
/// trailing '#' stripped, falling back to the segment before a trailing '/'
fn derive_short_name(namespace: &str) -> String {
    let trimmed = namespace.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let segment = segment.trim_end_matches('#');
    if segment.is_empty() {
        trimmed.to_string()
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let info = NamespaceTable::lookup("https://dataverse.org/schema/core#").unwrap();
        assert_eq!(info.short_name, "core");
        assert_eq!(info.color, "#84CC16");
    }

    #[test]
    fn test_lookup_longest_prefix_wins() {
        // A full element URI still resolves to its namespace entry
        let info =
            NamespaceTable::lookup("https://portal.odissei.nl/schema/geospatial#Location").unwrap();
        assert_eq!(info.short_name, "geospatial");
    }

    #[test]
    fn test_unknown_namespace_defaults() {
        assert_eq!(NamespaceTable::color("https://example.org/vocab#"), DEFAULT_COLOR);
        assert_eq!(
            NamespaceTable::short_name("https://example.org/vocab#"),
            "vocab"
        );
    }

    #[test]
    fn test_short_name_trailing_slash() {
        assert_eq!(
            NamespaceTable::short_name("https://example.org/schema/citation/"),
            "citation"
        );
    }

    #[test]
    fn test_domain_classification() {
        assert!(NamespaceTable::is_domain_predicate(
            "https://portal.odissei.nl/schema/provenance#"
        ));
        assert!(NamespaceTable::is_domain_predicate("https://dataverse.org/schema/core#"));
        assert!(!NamespaceTable::is_domain_predicate("http://xmlns.com/foaf/0.1/"));

        // Classes match the wider net
        assert!(NamespaceTable::is_domain_class("http://xmlns.com/foaf/0.1/"));
        assert!(NamespaceTable::is_domain_class("https://w3id.org/software-types#"));
        assert!(!NamespaceTable::is_domain_class("https://schema.org/"));
    }
}
