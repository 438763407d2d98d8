//! HTTP server for the schema dashboard
//!
//! Serves read-only JSON views over the current snapshot plus one
//! write-like action: "refresh now", which only signals the background
//! refresher and returns immediately.
//!
//! # Routes
//!
//! - `GET /` - embedded dashboard page
//! - `GET /health` - liveness probe
//! - `GET /api/stats` - snapshot statistics and freshness
//! - `GET /api/classes?search=&namespace=` - filtered class table
//! - `GET /api/predicates?search=&namespace=` - filtered predicate table
//! - `GET /api/namespaces` - namespaces with short names and colors
//! - `GET /api/graph?group=` - positioned force-directed layout
//! - `POST /api/refresh` - fire-and-forget manual refresh
//!
//! # Example
//!
//! ```no_run
//! use schemascope::cache::SnapshotStore;
//! use schemascope::refresher::{Refresher, RefresherConfig};
//! use schemascope::server::DashboardServer;
//! use schemascope::sparql::SparqlClient;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(SnapshotStore::new("schema_cache.json"));
//!     store.bootstrap();
//!
//!     let client = SparqlClient::new("https://example.org/sparql", Duration::from_secs(30))
//!         .expect("client");
//!     let refresher = Refresher::new(client, store.clone(), RefresherConfig::default());
//!     let handle = refresher.handle();
//!     tokio::spawn(refresher.run());
//!
//!     let server = DashboardServer::new(store, handle);
//!     server.run("127.0.0.1:8052").await.expect("server failed");
//! }
//! ```

use crate::cache::SnapshotStore;
use crate::refresher::RefreshHandle;
use crate::schema::{NamespaceTable, SchemaElement, SnapshotSource};
use crate::viz::{positioned_graph, GraphGroup, PositionedGraph};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Embedded dashboard page
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared server state
struct AppState {
    store: Arc<SnapshotStore>,
    refresher: RefreshHandle,
}

/// Dashboard HTTP server
pub struct DashboardServer {
    state: Arc<AppState>,
}

impl DashboardServer {
    /// Create a server over a snapshot store and refresher handle
    pub fn new(store: Arc<SnapshotStore>, refresher: RefreshHandle) -> Self {
        Self {
            state: Arc::new(AppState { store, refresher }),
        }
    }

    /// Build the router
    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/health", get(health))
            .route("/api/stats", get(get_stats))
            .route("/api/classes", get(get_classes))
            .route("/api/predicates", get(get_predicates))
            .route("/api/namespaces", get(get_namespaces))
            .route("/api/graph", get(get_graph))
            .route("/api/refresh", post(trigger_refresh))
            .with_state(state)
    }

    /// Run the server on the given address
    pub async fn run(self, addr: &str) -> crate::Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| crate::SchemascopeError::Other(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = addr, "Dashboard listening");

        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(crate::SchemascopeError::Io)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Statistics response from /api/stats
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_classes: usize,
    pub total_predicates: usize,
    pub domain_classes: usize,
    pub domain_predicates: usize,
    pub odissei_namespaces: usize,
    pub dataverse_namespaces: usize,
    pub namespaces: usize,

    /// RFC 3339, or null when no fetch has ever succeeded
    pub last_updated: Option<String>,

    pub source: SnapshotSource,
}

/// Table filters for element views
#[derive(Debug, Default, Deserialize)]
pub struct ElementQuery {
    /// Case-insensitive substring over label and URI
    pub search: Option<String>,

    /// Exact namespace prefix
    pub namespace: Option<String>,
}

/// One table row in /api/classes and /api/predicates
#[derive(Debug, Serialize)]
pub struct ElementRow {
    pub label: String,
    pub namespace: String,
    pub namespace_short: String,
    pub uri: String,
}

impl From<&SchemaElement> for ElementRow {
    fn from(el: &SchemaElement) -> Self {
        Self {
            label: el.label.clone(),
            namespace: el.namespace.clone(),
            namespace_short: NamespaceTable::short_name(&el.namespace),
            uri: el.uri.clone(),
        }
    }
}

/// One entry in /api/namespaces
#[derive(Debug, Serialize)]
pub struct NamespaceEntry {
    pub namespace: String,
    pub short_name: String,
    pub color: String,
}

/// Group selector for /api/graph
#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    pub group: Option<String>,
}

/// Response from /api/refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// False when a refresh was already pending (signal coalesced)
    pub queued: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let snapshot = state.store.current();

    Json(StatsResponse {
        total_classes: snapshot.stats.total_classes,
        total_predicates: snapshot.stats.total_predicates,
        domain_classes: snapshot.stats.domain_classes,
        domain_predicates: snapshot.stats.domain_predicates,
        odissei_namespaces: snapshot.namespaces.odissei.len(),
        dataverse_namespaces: snapshot.namespaces.dataverse.len(),
        namespaces: snapshot.namespaces.all.len(),
        last_updated: snapshot.fetched_at.map(|t| t.to_rfc3339()),
        source: snapshot.source,
    })
}

async fn get_classes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ElementQuery>,
) -> Json<Vec<ElementRow>> {
    let snapshot = state.store.current();
    Json(filter_elements(&snapshot.classes, &query))
}

async fn get_predicates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ElementQuery>,
) -> Json<Vec<ElementRow>> {
    let snapshot = state.store.current();
    Json(filter_elements(&snapshot.predicates, &query))
}

async fn get_namespaces(State(state): State<Arc<AppState>>) -> Json<Vec<NamespaceEntry>> {
    let snapshot = state.store.current();

    let entries = snapshot
        .namespaces
        .all
        .iter()
        .map(|ns| NamespaceEntry {
            namespace: ns.clone(),
            short_name: NamespaceTable::short_name(ns),
            color: NamespaceTable::color(ns).to_string(),
        })
        .collect();

    Json(entries)
}

async fn get_graph(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GraphQuery>,
) -> Json<PositionedGraph> {
    let snapshot = state.store.current();
    let group = GraphGroup::parse(query.group.as_deref().unwrap_or("all"));

    Json(positioned_graph(&snapshot, &group))
}

async fn trigger_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let queued = state.refresher.refresh_now();
    (StatusCode::ACCEPTED, Json(RefreshResponse { queued }))
}

/// Apply table filters to an element list
fn filter_elements(elements: &[SchemaElement], query: &ElementQuery) -> Vec<ElementRow> {
    let search = query.search.as_deref().map(str::to_lowercase);

    elements
        .iter()
        .filter(|el| match &search {
            Some(term) => {
                el.label.to_lowercase().contains(term) || el.uri.to_lowercase().contains(term)
            }
            None => true,
        })
        .filter(|el| match &query.namespace {
            Some(ns) => &el.namespace == ns,
            None => true,
        })
        .map(ElementRow::from)
        .collect()
}
