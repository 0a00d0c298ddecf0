//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{FacadeStats, MemoryPartition, NamedCacheFacade, Namespace, PartitionScope};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{ContainsResponse, GetResponse, HealthResponse, PutRequest, PutResponse};

/// Facade served by the API.
pub type SharedFacade = Arc<RwLock<NamedCacheFacade<MemoryPartition>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Org and session caches behind one lock
    pub cache: SharedFacade,
}

impl AppState {
    /// Creates a new AppState with the given facade.
    pub fn new(cache: NamedCacheFacade<MemoryPartition>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Resolves the namespace once and opens both scoped partitions.
    pub fn from_config(config: &Config) -> Self {
        let namespace = Namespace::resolve(config);
        let facade =
            NamedCacheFacade::in_memory(&namespace, &config.partition_name, config.item_size_limit);
        if !config.cache_enabled {
            facade.org().partition().set_available(false);
            facade.session().partition().set_available(false);
        }
        Self::new(facade)
    }
}

async fn put_scoped(
    state: AppState,
    scope: PartitionScope,
    req: PutRequest,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    let bucket = cache
        .scope_mut(scope)
        .put(req.key.clone(), req.value)
        .owner_of(&req.key);

    Ok(Json(PutResponse::new(req.key, scope, bucket)))
}

/// Handler for PUT /org
///
/// Stores a key-value pair in the organization-wide cache.
pub async fn put_org_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    put_scoped(state, PartitionScope::Org, req).await
}

/// Handler for PUT /session
///
/// Stores a key-value pair in the session-scoped cache.
pub async fn put_session_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    put_scoped(state, PartitionScope::Session, req).await
}

/// Handler for GET /get/:key
///
/// Looks the key up in the session cache, then the org cache.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let cache = state.cache.read().await;
    let value = cache
        .get(&key)
        .cloned()
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /contains/:key
pub async fn contains_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ContainsResponse> {
    let cache = state.cache.read().await;
    let present = cache.contains(&key);

    Json(ContainsResponse::new(key, present))
}

/// Handler for POST /reload
///
/// Rebuilds both caches from their partitions.
pub async fn reload_handler(State(state): State<AppState>) -> Json<FacadeStats> {
    let mut cache = state.cache.write().await;
    cache.reload();

    Json(cache.stats())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<FacadeStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
