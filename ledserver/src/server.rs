//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module cache la construction du `Router` Axum derrière quelques méthodes
//! d'enregistrement :
//!
//! - Routes JSON simples avec `add_route()`
//! - Handlers avec état avec `add_handler_with_state()`
//! - Sous-routers avec `add_router()`
//! - APIs documentées (OpenAPI + Swagger UI) avec `add_openapi()`
//! - Pages de dashboards et fichiers statiques avec `add_dashboard_pages()`
//!
//! Toutes les réponses portent les en-têtes CORS et `Cache-Control: no-cache`
//! attendus par les sources navigateur des outils de streaming.

use crate::logs::{LogState, LogsApiDoc, create_logs_router, init_logging, log_dump, log_sse};
use axum::extract::{Path as UrlPath, State};
use axum::handler::Handler;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use ledconfig::get_config;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::{sync::RwLock, task::JoinHandle};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const SERVICE_NAME: &str = "dashboard-server";

/// Info serveur sérialisable
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

/// Serveur principal
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
    log_state: Option<LogState>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Hôte annoncé dans les logs (ex: "localhost")
    /// * `http_port` - Port HTTP à écouter
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
            log_state: None,
        }
    }

    pub fn new_configured() -> Self {
        ServerBuilder::new_configured().build()
    }

    async fn merge(&self, route: Router) {
        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(route);
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure est appelée à chaque requête GET sur `path`.
    ///
    /// ```rust,no_run
    /// # use ledserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "localhost", 3002);
    /// server.add_route("/info", || async {
    ///     serde_json::json!({"version": "1.0.0"})
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let handler = move || {
            let f = f.clone();
            async move { Json(f().await) }
        };
        self.merge(Router::new().route(path, get(handler))).await;
    }

    /// Ajoute un handler GET avec état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route(path, get(handler)).with_state(state);
        self.merge(route).await;
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let route = if path == "/" {
            sub_router
        } else {
            let normalized = format!("/{}", path.trim_matches('/'));
            Router::new().nest(&normalized, sub_router)
        };
        self.merge(route).await;
    }

    /// Ajoute une API documentée avec OpenAPI et Swagger UI
    ///
    /// Les routes de `api_router` sont montées sous `/api/{name}`, la
    /// documentation sous `/swagger-ui/{name}` et la spécification JSON
    /// sous `/api-docs/{name}.json`.
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let swagger = SwaggerUi::new(format!("/swagger-ui/{}", name))
            .url(format!("/api-docs/{}.json", name), openapi);

        let nested = Router::new().nest(&format!("/api/{}", name), api_router);
        self.merge(nested.merge(swagger)).await;
    }

    /// Sert les pages de dashboards et les fichiers statiques
    ///
    /// - `GET /dashboard/{slug}` renvoie `{pages_dir}/{slug}.html`
    /// - `GET /public/*` sert le contenu de `public_dir`
    pub async fn add_dashboard_pages(&mut self, pages_dir: PathBuf, public_dir: PathBuf) {
        info!(pages = %pages_dir.display(), public = %public_dir.display(), "Serving dashboard pages");

        let route = Router::new()
            .route("/dashboard/{slug}", get(serve_dashboard_page))
            .with_state(Arc::new(pages_dir))
            .nest_service("/public", ServeDir::new(public_dir));
        self.merge(route).await;
    }

    /// Pages et fichiers statiques aux emplacements configurés
    pub async fn add_configured_pages(&mut self) {
        let config = get_config();
        self.add_dashboard_pages(config.get_pages_dir(), config.get_public_dir())
            .await;
    }

    /// Ajoute `GET /health`
    pub async fn add_health_check(&mut self) {
        self.add_route("/health", || async {
            serde_json::json!({
                "status": "ok",
                "service": SERVICE_NAME,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })
        })
        .await;
    }

    /// Router complet, avec les couches CORS et cache appliquées
    pub async fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers([
                header::ORIGIN,
                HeaderName::from_static("x-requested-with"),
                header::CONTENT_TYPE,
                header::ACCEPT,
            ]);

        self.router
            .read()
            .await
            .clone()
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ))
            .layer(cors)
    }

    /// Démarre le serveur HTTP
    ///
    /// Lance le serveur sur le port configuré ; il s'arrête proprement sur
    /// Ctrl+C ou SIGTERM.
    pub async fn start(&mut self) {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        info!(
            "Server {} running at http://{}:{}",
            self.name, self.base_url, self.http_port
        );

        let router = self.router().await;
        self.join_handle = Some(tokio::spawn(async move {
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    error!("Failed to bind {}: {}", addr, e);
                    return;
                }
            };

            if let Err(e) = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                error!("HTTP server error: {}", e);
            }
        }));
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
        }
    }

    /// Initialise le logging et enregistre les routes de logs
    ///
    /// Routes : `/log-sse`, `/log-dump` et `/api/logs/log_setup`.
    pub async fn init_logging(&mut self) {
        let log_state = init_logging();

        self.add_handler_with_state("/log-sse", log_sse, log_state.clone())
            .await;
        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_openapi(
            create_logs_router(log_state.clone()),
            LogsApiDoc::openapi(),
            "logs",
        )
        .await;

        self.log_state = Some(log_state);
    }

    pub fn log_state(&self) -> Option<&LogState> {
        self.log_state.as_ref()
    }
}

/// Un slug de dashboard : lettres, chiffres et tirets uniquement
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

async fn serve_dashboard_page(
    State(pages_dir): State<Arc<PathBuf>>,
    UrlPath(slug): UrlPath<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let file = pages_dir.join(format!("{slug}.html"));
    match tokio::fs::read_to_string(&file).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(page = %file.display(), "Dashboard page unavailable: {}", e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Dashboard server shutting down...");
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    /// Builder initialisé depuis `ledconfig`
    pub fn new_configured() -> Self {
        let config = get_config();
        Self {
            name: "LED-Dashboard-Server".to_string(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
        }
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}
