//! # shelf-server
//!
//! HTTP API server for shelf. Provides:
//!
//! - REST CRUD for commands, instructions, scripts, and compose files
//! - The raw-content endpoint that substitutes `{{VARIABLE}}` placeholders
//!   from query parameters at fetch time
//! - Health and Prometheus metrics endpoints
//! - Web UI static file serving

pub mod metrics;

use axum::{
    Router,
    body::Body,
    extract::{Path, RawQuery, State},
    http::{Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use shelf_config::schema::ServerConfig;
use shelf_core::{
    Artifact, ArtifactKind, ArtifactMeta, CommandDraft, CommandEntry, CommandPatch, Instruction,
    InstructionDraft, InstructionPatch, ShelfError,
};
use shelf_store::Store;
use shelf_template::{parse_query, substitute};

/// Shared server state.
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<Store>,
    pub metrics: metrics::Metrics,
}

/// Error wrapper that maps [`ShelfError`] variants onto HTTP statuses with a
/// `{"error": …}` JSON body, matching the original API's error shape.
pub struct ApiError(ShelfError);

impl From<ShelfError> for ApiError {
    fn from(err: ShelfError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ShelfError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShelfError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            ShelfError::AlreadyExists { .. } => StatusCode::CONFLICT,
            _ => {
                warn!(error = %self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Request body for saving an artifact.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveArtifactRequest {
    filename: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Request body for renaming an artifact.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameRequest {
    new_filename: String,
}

/// Build the Axum router.
pub fn build_router(config: ServerConfig, store: Arc<Store>) -> Router {
    let cors = config.cors;
    let web_ui = config.web_ui;
    let state = Arc::new(AppState {
        config,
        store,
        metrics: metrics::Metrics::new(),
    });

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/commands", get(list_commands).post(create_command))
        .route(
            "/api/commands/{id}",
            put(update_command).delete(delete_command),
        )
        .route(
            "/api/instructions",
            get(list_instructions).post(create_instruction),
        )
        .route(
            "/api/instructions/{id}",
            put(update_instruction).delete(delete_instruction),
        )
        .route("/api/scripts", get(list_scripts).post(save_script))
        .route(
            "/api/scripts/{filename}",
            get(get_script).delete(delete_script),
        )
        .route("/api/scripts/{filename}/rename", post(rename_script))
        .route("/api/compose", get(list_compose).post(save_compose))
        .route(
            "/api/compose/{filename}",
            get(get_compose).delete(delete_compose),
        )
        .route("/api/compose/{filename}/rename", post(rename_compose))
        // The raw-content endpoints — the download-and-run surface. Scripts
        // sit directly under raw/, compose files under raw/compose/.
        .route("/api/raw/{filename}", get(raw_script))
        .route("/api/raw/compose/{filename}", get(raw_compose))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            metrics_middleware,
        ));

    // Serve static files for the Web UI
    if web_ui {
        if let Some(dir) = find_web_dir() {
            info!(path = %dir.display(), "serving web UI");
            router = router.fallback_service(ServeDir::new(dir));
        }
    }

    let mut router = router.with_state(state);

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Find the web/ directory — checks CWD first (for development), then next to
/// the binary, then ~/.shelf/web as a last resort.
fn find_web_dir() -> Option<std::path::PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let p = cwd.join("web");
        if p.join("index.html").exists() {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("web");
            if p.join("index.html").exists() {
                return Some(p);
            }
        }
    }
    if let Some(home) = dirs::home_dir() {
        let p = home.join(".shelf").join("web");
        if p.join("index.html").exists() {
            return Some(p);
        }
    }
    None
}

/// Middleware that counts every request and every 4xx/5xx response.
async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    state.metrics.inc_http_requests();
    let response = next.run(request).await;
    if response.status().is_client_error() || response.status().is_server_error() {
        state.metrics.inc_http_errors();
    }
    response
}

// ── Service endpoints ──────────────────────────────────────────

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.metrics.uptime_secs(),
    }))
}

/// Prometheus-compatible metrics endpoint.
async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> (
    StatusCode,
    [(axum::http::header::HeaderName, &'static str); 1],
    String,
) {
    let body = state.metrics.render_prometheus();
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

// ── Commands ───────────────────────────────────────────────────

async fn list_commands(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CommandEntry>>> {
    Ok(Json(state.store.list_commands()?))
}

async fn create_command(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<CommandDraft>,
) -> ApiResult<Json<CommandEntry>> {
    Ok(Json(state.store.create_command(draft)?))
}

async fn update_command(
    State(state): State<Arc<AppState>>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<CommandPatch>,
) -> ApiResult<Json<CommandEntry>> {
    Ok(Json(state.store.update_command(id, patch)?))
}

async fn delete_command(
    State(state): State<Arc<AppState>>,
    Path(id): Path<uuid::Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete_command(id)?;
    Ok(Json(json!({ "success": true })))
}

// ── Instructions ───────────────────────────────────────────────

async fn list_instructions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Instruction>>> {
    Ok(Json(state.store.list_instructions()?))
}

async fn create_instruction(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<InstructionDraft>,
) -> ApiResult<Json<Instruction>> {
    Ok(Json(state.store.create_instruction(draft)?))
}

async fn update_instruction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<uuid::Uuid>,
    Json(patch): Json<InstructionPatch>,
) -> ApiResult<Json<Instruction>> {
    Ok(Json(state.store.update_instruction(id, patch)?))
}

async fn delete_instruction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<uuid::Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete_instruction(id)?;
    Ok(Json(json!({ "success": true })))
}

// ── Artifacts (scripts + compose files, identical shape) ───────

async fn list_artifacts(
    state: &AppState,
    kind: ArtifactKind,
) -> ApiResult<Json<Vec<ArtifactMeta>>> {
    Ok(Json(state.store.list_artifacts(kind)?))
}

async fn get_artifact(
    state: &AppState,
    kind: ArtifactKind,
    filename: &str,
) -> ApiResult<Json<Artifact>> {
    Ok(Json(state.store.read_artifact(kind, filename)?))
}

async fn save_artifact(
    state: &AppState,
    kind: ArtifactKind,
    req: SaveArtifactRequest,
) -> ApiResult<Json<serde_json::Value>> {
    let meta = state
        .store
        .save_artifact(kind, &req.filename, &req.content, req.tags)?;
    state.metrics.inc_artifact_writes();
    Ok(Json(json!({
        "filename": meta.filename,
        "success": true,
        "lastModified": meta.last_modified,
    })))
}

async fn delete_artifact_inner(
    state: &AppState,
    kind: ArtifactKind,
    filename: &str,
) -> ApiResult<Json<serde_json::Value>> {
    state.store.delete_artifact(kind, filename)?;
    Ok(Json(json!({ "success": true })))
}

async fn rename_artifact(
    state: &AppState,
    kind: ArtifactKind,
    filename: &str,
    req: RenameRequest,
) -> ApiResult<Json<ArtifactMeta>> {
    let meta = state.store.rename_artifact(kind, filename, &req.new_filename)?;
    state.metrics.inc_artifact_writes();
    Ok(Json(meta))
}

async fn list_scripts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ArtifactMeta>>> {
    list_artifacts(&state, ArtifactKind::Script).await
}

async fn get_script(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Json<Artifact>> {
    get_artifact(&state, ArtifactKind::Script, &filename).await
}

async fn save_script(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveArtifactRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    save_artifact(&state, ArtifactKind::Script, req).await
}

async fn delete_script(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    delete_artifact_inner(&state, ArtifactKind::Script, &filename).await
}

async fn rename_script(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    Json(req): Json<RenameRequest>,
) -> ApiResult<Json<ArtifactMeta>> {
    rename_artifact(&state, ArtifactKind::Script, &filename, req).await
}

async fn list_compose(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ArtifactMeta>>> {
    list_artifacts(&state, ArtifactKind::Compose).await
}

async fn get_compose(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Json<Artifact>> {
    get_artifact(&state, ArtifactKind::Compose, &filename).await
}

async fn save_compose(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveArtifactRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    save_artifact(&state, ArtifactKind::Compose, req).await
}

async fn delete_compose(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    delete_artifact_inner(&state, ArtifactKind::Compose, &filename).await
}

async fn rename_compose(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    Json(req): Json<RenameRequest>,
) -> ApiResult<Json<ArtifactMeta>> {
    rename_artifact(&state, ArtifactKind::Compose, &filename, req).await
}

// ── Raw content ────────────────────────────────────────────────

/// The raw-content contract: load the body by filename, treat every query
/// parameter as a placeholder name/value pair, run substitution, return the
/// result with the kind's content type. Stored content is never mutated —
/// the substituted output is per-request and discarded.
async fn raw_artifact(
    state: &AppState,
    kind: ArtifactKind,
    filename: &str,
    query: Option<&str>,
) -> ApiResult<Response> {
    state.metrics.inc_raw_fetches();
    let content = state.store.read_content(kind, filename)?;

    let values = parse_query(query.unwrap_or(""));
    let body = if values.is_empty() {
        content
    } else {
        state.metrics.inc_raw_substitutions();
        substitute(&content, &values)
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, kind.content_type())],
        body,
    )
        .into_response())
}

async fn raw_script(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    raw_artifact(&state, ArtifactKind::Script, &filename, query.as_deref()).await
}

async fn raw_compose(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Response> {
    raw_artifact(&state, ArtifactKind::Compose, &filename, query.as_deref()).await
}

// ── Entry point ────────────────────────────────────────────────

/// Start the HTTP server.
pub async fn start_server(config: ServerConfig, store: Arc<Store>) -> shelf_core::Result<()> {
    let listen = config.listen.clone();
    let router = build_router(config, store);

    info!(listen = %listen, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| ShelfError::Server(format!("failed to bind {}: {}", listen, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| ShelfError::Server(format!("server error: {}", e)))?;

    Ok(())
}
