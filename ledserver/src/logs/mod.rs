//! Logs en mémoire, consultables par HTTP
//!
//! Les évènements `tracing` sont conservés dans un buffer circulaire et
//! diffusés aux abonnés SSE. Le niveau minimum est rechargeable à chaud.

mod buffer_layer;

pub use buffer_layer::BufferLayer;

use std::{
    collections::VecDeque,
    sync::{Arc, PoisonError, RwLock},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use chrono::{DateTime, Utc};
use ledconfig::get_config;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

const AVAILABLE_LEVELS: [&str; 5] = ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

/// Entrée de log capturée
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
}

type ReloadHandle = reload::Handle<LevelFilter, Registry>;

/// Buffer circulaire partagé
#[derive(Clone)]
pub struct LogState {
    buffer: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
    tx: broadcast::Sender<LogEntry>,
    max_level: Arc<RwLock<Level>>,
    reload_handle: Option<ReloadHandle>,
}

impl LogState {
    pub fn new(capacity: usize, reload_handle: Option<ReloadHandle>) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
            tx: broadcast::channel(256).0,
            max_level: Arc::new(RwLock::new(Level::TRACE)),
            reload_handle,
        }
    }

    pub fn set_max_level(&self, level: Level) {
        *self.max_level.write().unwrap_or_else(PoisonError::into_inner) = level;

        if let Some(handle) = &self.reload_handle {
            if let Err(e) = handle.reload(LevelFilter::from_level(level)) {
                eprintln!("Failed to reload log level filter: {}", e);
            }
        }
    }

    pub fn max_level(&self) -> Level {
        *self.max_level.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push(&self, entry: LogEntry) {
        let mut buf = self.buffer.write().unwrap_or_else(PoisonError::into_inner);
        if self.capacity > 0 && buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(entry.clone());
        // pas d'abonné SSE : rien à faire
        let _ = self.tx.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    pub fn dump(&self) -> Vec<LogEntry> {
        self.buffer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

/// Query params pour /log-sse
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    /// Niveau minimum affiché (ex: `warn`)
    #[serde(default)]
    pub level: Option<String>,
    /// Filtre sur le message ou la cible
    #[serde(default)]
    pub search: Option<String>,
}

impl LogQuery {
    fn accepts(&self, entry: &LogEntry) -> bool {
        if let Some(min) = self.level.as_deref().and_then(string_to_level) {
            match string_to_level(&entry.level) {
                Some(level) if level <= min => {}
                _ => return false,
            }
        }
        match &self.search {
            Some(search) => entry.message.contains(search) || entry.target.contains(search),
            None => true,
        }
    }
}

/// Handler SSE : historique du buffer puis flux temps réel
pub async fn log_sse(State(state): State<LogState>, Query(params): Query<LogQuery>) -> impl IntoResponse {
    let mut rx = state.subscribe();
    let history = state.dump();

    let stream = async_stream::stream! {
        for entry in history {
            if params.accepts(&entry) {
                if let Ok(json) = serde_json::to_string(&entry) {
                    yield Ok::<_, axum::Error>(Event::default().data(json));
                }
            }
        }

        loop {
            match rx.recv().await {
                Ok(entry) => {
                    if !params.accepts(&entry) {
                        continue;
                    }
                    if let Ok(json) = serde_json::to_string(&entry) {
                        yield Ok::<_, axum::Error>(Event::default().data(json));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handler REST (dump JSON du buffer)
pub async fn log_dump(State(state): State<LogState>) -> impl IntoResponse {
    Json(state.dump())
}

/// Initialise le système de logging à partir de la configuration
///
/// Filtre rechargeable, buffer mémoire et, si `host.logger.enable_console`
/// est vrai, sortie console formatée.
pub fn init_logging() -> LogState {
    let config = get_config();

    let level = config
        .get_log_min_level()
        .ok()
        .and_then(|l| string_to_level(&l))
        .unwrap_or(Level::INFO);
    let capacity = config.get_log_cache_size().unwrap_or(1000);
    let enable_console = config.get_log_enable_console().unwrap_or(true);

    let (filter, reload_handle) = reload::Layer::new(LevelFilter::from_level(level));
    let log_state = LogState::new(capacity, Some(reload_handle));
    *log_state
        .max_level
        .write()
        .unwrap_or_else(PoisonError::into_inner) = level;

    // le filtre doit précéder les autres couches
    let subscriber = Registry::default()
        .with(filter)
        .with(BufferLayer::new(log_state.clone()));

    let result = if enable_console {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }

    log_state
}

/// Request body pour la configuration du logging
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogSetupRequest {
    pub level: String,
}

/// Response pour la configuration du logging
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogSetupResponse {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

impl LogSetupResponse {
    fn new(level: Level) -> Self {
        Self {
            current_level: level.as_str().to_string(),
            available_levels: AVAILABLE_LEVELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// GET /api/logs/log_setup - niveau actuel
#[utoipa::path(
    get,
    path = "/api/logs/log_setup",
    responses(
        (status = 200, description = "Log configuration retrieved successfully", body = LogSetupResponse)
    ),
    tag = "logs"
)]
pub async fn log_setup_get(State(state): State<LogState>) -> Json<LogSetupResponse> {
    Json(LogSetupResponse::new(state.max_level()))
}

/// POST /api/logs/log_setup - change le niveau minimum
#[utoipa::path(
    post,
    path = "/api/logs/log_setup",
    request_body = LogSetupRequest,
    responses(
        (status = 200, description = "Log level updated successfully", body = LogSetupResponse),
        (status = 400, description = "Invalid log level")
    ),
    tag = "logs"
)]
pub async fn log_setup_post(
    State(state): State<LogState>,
    Json(payload): Json<LogSetupRequest>,
) -> Response {
    let Some(level) = string_to_level(&payload.level) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Invalid log level. Must be one of: {}", AVAILABLE_LEVELS.join(", "))
            })),
        )
            .into_response();
    };

    state.set_max_level(level);
    tracing::info!("Log level changed to: {}", level);

    Json(LogSetupResponse::new(level)).into_response()
}

fn string_to_level(s: &str) -> Option<Level> {
    s.trim().parse::<Level>().ok()
}

/// Router de l'API de gestion des logs (monté sous `/api/logs`)
pub fn create_logs_router(log_state: LogState) -> Router {
    Router::new()
        .route("/log_setup", get(log_setup_get).post(log_setup_post))
        .with_state(log_state)
}

/// API OpenAPI pour la gestion des logs
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(log_setup_get, log_setup_post),
    components(schemas(LogSetupRequest, LogSetupResponse)),
    tags(
        (name = "logs", description = "Log level configuration endpoints")
    )
)]
pub struct LogsApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: &str, message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: level.to_string(),
            target: "ledserver::tests".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_buffer_is_circular() {
        let state = LogState::new(2, None);
        state.push(entry("INFO", "one"));
        state.push(entry("INFO", "two"));
        state.push(entry("INFO", "three"));

        let messages: Vec<_> = state.dump().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_query_filters_by_level_and_search() {
        let query = LogQuery {
            level: Some("warn".into()),
            search: None,
        };
        assert!(query.accepts(&entry("ERROR", "boom")));
        assert!(query.accepts(&entry("WARN", "careful")));
        assert!(!query.accepts(&entry("INFO", "fine")));

        let query = LogQuery {
            level: None,
            search: Some("rotation".into()),
        };
        assert!(query.accepts(&entry("DEBUG", "rotation advanced")));
        assert!(!query.accepts(&entry("DEBUG", "something else")));
    }

    #[test]
    fn test_set_max_level_without_reload_handle() {
        let state = LogState::new(10, None);
        state.set_max_level(Level::WARN);
        assert_eq!(state.max_level(), Level::WARN);
    }

    #[test]
    fn test_string_to_level() {
        assert_eq!(string_to_level("debug"), Some(Level::DEBUG));
        assert_eq!(string_to_level(" ERROR "), Some(Level::ERROR));
        assert_eq!(string_to_level("loud"), None);
    }
}
