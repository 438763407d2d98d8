//! Schema snapshots
//!
//! A snapshot is the fully-formed bundle of classes and predicates as of one
//! fetch. It is constructed wholly off to the side and never mutated after
//! publication; the refresher replaces the published snapshot atomically.

use super::{ElementKind, NamespaceTable, SchemaElement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Where a snapshot's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    /// Fetched live from the SPARQL endpoint
    Live,

    /// Loaded from the persisted cache file or bundled fallback data
    Cached,
}

/// Aggregate counts over a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub total_classes: usize,
    pub total_predicates: usize,
    pub domain_classes: usize,
    pub domain_predicates: usize,
}

/// Namespaces observed in a snapshot, grouped by home domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSummary {
    /// ODISSEI schema namespaces
    pub odissei: Vec<String>,

    /// Dataverse schema namespaces
    pub dataverse: Vec<String>,

    /// Every namespace seen, insertion-ordered
    pub all: Vec<String>,
}

/// Immutable-once-published bundle of schema elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub classes: Vec<SchemaElement>,
    pub predicates: Vec<SchemaElement>,
    pub namespaces: NamespaceSummary,
    pub stats: SnapshotStats,

    /// When the data was fetched; None for the explicit "no data" state
    pub fetched_at: Option<DateTime<Utc>>,

    pub source: SnapshotSource,
}

impl SchemaSnapshot {
    /// The explicit "no data" snapshot used when neither a live fetch nor
    /// any fallback is available at startup
    pub fn empty() -> Self {
        Self {
            classes: Vec::new(),
            predicates: Vec::new(),
            namespaces: NamespaceSummary::default(),
            stats: SnapshotStats::default(),
            fetched_at: None,
            source: SnapshotSource::Cached,
        }
    }

    /// Build a snapshot stamped with the current time
    pub fn from_elements(
        classes: Vec<SchemaElement>,
        predicates: Vec<SchemaElement>,
        source: SnapshotSource,
    ) -> Self {
        Self::from_elements_at(classes, predicates, source, Some(Utc::now()))
    }

    /// Build a snapshot with an explicit fetch timestamp
    ///
    /// Duplicate URIs within a kind are collapsed, first occurrence wins.
    pub fn from_elements_at(
        classes: Vec<SchemaElement>,
        predicates: Vec<SchemaElement>,
        source: SnapshotSource,
        fetched_at: Option<DateTime<Utc>>,
    ) -> Self {
        let classes = dedup_by_uri(classes);
        let predicates = dedup_by_uri(predicates);

        let namespaces = summarize_namespaces(&classes, &predicates);
        let stats = SnapshotStats {
            total_classes: classes.len(),
            total_predicates: predicates.len(),
            domain_classes: classes
                .iter()
                .filter(|c| NamespaceTable::is_domain_class(&c.namespace))
                .count(),
            domain_predicates: predicates
                .iter()
                .filter(|p| NamespaceTable::is_domain_predicate(&p.namespace))
                .count(),
        };

        Self {
            classes,
            predicates,
            namespaces,
            stats,
            fetched_at,
            source,
        }
    }

    /// True when the snapshot carries no elements at all
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.predicates.is_empty()
    }

    /// Domain-specific classes (ODISSEI, Dataverse, w3id, FOAF namespaces)
    pub fn domain_classes(&self) -> impl Iterator<Item = &SchemaElement> {
        self.classes
            .iter()
            .filter(|c| NamespaceTable::is_domain_class(&c.namespace))
    }

    /// Domain-specific predicates (ODISSEI and Dataverse namespaces)
    pub fn domain_predicates(&self) -> impl Iterator<Item = &SchemaElement> {
        self.predicates
            .iter()
            .filter(|p| NamespaceTable::is_domain_predicate(&p.namespace))
    }

    /// Same snapshot re-tagged with a different source
    ///
    /// Used when a persisted live snapshot is re-loaded at startup: the data
    /// is the old fetch, so it is published as cached.
    pub fn with_source(mut self, source: SnapshotSource) -> Self {
        self.source = source;
        self
    }

    /// Elements of one kind
    pub fn elements(&self, kind: ElementKind) -> &[SchemaElement] {
        match kind {
            ElementKind::Class => &self.classes,
            ElementKind::Predicate => &self.predicates,
        }
    }
}

fn dedup_by_uri(elements: Vec<SchemaElement>) -> Vec<SchemaElement> {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter(|el| seen.insert(el.uri.clone()))
        .collect()
}

fn summarize_namespaces(
    classes: &[SchemaElement],
    predicates: &[SchemaElement],
) -> NamespaceSummary {
    let mut summary = NamespaceSummary::default();
    let mut seen = HashSet::new();

    for el in classes.iter().chain(predicates) {
        if !seen.insert(el.namespace.clone()) {
            continue;
        }
        summary.all.push(el.namespace.clone());

        let lower = el.namespace.to_lowercase();
        if lower.contains("odissei") {
            summary.odissei.push(el.namespace.clone());
        } else if lower.contains("dataverse") {
            summary.dataverse.push(el.namespace.clone());
        }
    }

    summary
}
