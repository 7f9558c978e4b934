//! API REST de la rotation en direct (montée sous `/api/live`)

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::{ConfigPatch, ConfigView, RotationConfig};
use crate::driver::is_due;
use crate::manager::LiveManager;
use crate::registry::{DashboardRegistry, DisplayItem};
use crate::sse::live_events_sse;
use crate::state::CurrentDashboard;
use crate::{Error, Result};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Dashboard courant, tel que renvoyé par l'API et diffusé en SSE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentResponse {
    #[serde(flatten)]
    #[schema(inline)]
    pub current: CurrentDashboard,
    /// Dernier changement de dashboard
    pub last_update: DateTime<Utc>,
}

impl CurrentResponse {
    fn of(manager: &LiveManager) -> Result<Self> {
        Ok(Self {
            current: manager.current()?,
            last_update: manager.last_update(),
        })
    }
}

/// Corps accepté par `POST`/`PATCH /api/live/config`.
///
/// Toutes les clés sont optionnelles. Les nombres et booléens peuvent être
/// envoyés sous forme de chaîne ; `dashboardOrder` accepte une liste ou une
/// chaîne séparée par des virgules.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatchRequest {
    #[schema(value_type = Option<i64>, example = 15000)]
    pub rotation_interval_ms: Option<JsonValue>,
    #[schema(value_type = Option<bool>, example = true)]
    pub auto_rotate: Option<JsonValue>,
    #[schema(value_type = Option<i64>, example = 500)]
    pub transition_duration_ms: Option<JsonValue>,
    #[schema(value_type = Option<Vec<String>>)]
    pub dashboard_order: Option<JsonValue>,
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// État partagé des handlers : le manager et le canal des changements
#[derive(Clone)]
pub struct LiveState {
    manager: Arc<RwLock<LiveManager>>,
    events: broadcast::Sender<CurrentResponse>,
}

impl LiveState {
    pub fn new(manager: LiveManager) -> Self {
        Self {
            manager: Arc::new(RwLock::new(manager)),
            events: broadcast::channel(EVENT_CHANNEL_CAPACITY).0,
        }
    }

    pub fn manager(&self) -> &Arc<RwLock<LiveManager>> {
        &self.manager
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CurrentResponse> {
        self.events.subscribe()
    }

    /// Dashboard courant, `None` si la liste effective est vide
    pub async fn snapshot(&self) -> Option<CurrentResponse> {
        CurrentResponse::of(&*self.manager.read().await).ok()
    }

    /// Applique une navigation sous verrou d'écriture puis diffuse le résultat
    pub async fn navigate<F>(&self, action: &str, f: F) -> Result<CurrentResponse>
    where
        F: FnOnce(&mut LiveManager) -> Result<CurrentDashboard>,
    {
        let mut manager = self.manager.write().await;
        let current = f(&mut *manager)?;
        Ok(self.changed(action, current, manager.last_update()))
    }

    /// Avance d'un cran si le dashboard courant a fait son temps
    pub async fn advance_if_due(&self, now: DateTime<Utc>) -> Result<Option<CurrentResponse>> {
        let mut manager = self.manager.write().await;
        if !is_due(&manager, now) {
            return Ok(None);
        }
        let current = manager.next()?;
        Ok(Some(self.changed("auto", current, manager.last_update())))
    }

    fn changed(
        &self,
        action: &str,
        current: CurrentDashboard,
        last_update: DateTime<Utc>,
    ) -> CurrentResponse {
        info!(
            action,
            index = current.index,
            dashboard = %current.item.name,
            "Live dashboard changed"
        );
        let response = CurrentResponse {
            current,
            last_update,
        };
        self.publish(response.clone());
        response
    }

    /// Met à jour la configuration ; un nouvel ordre est diffusé comme un
    /// changement de dashboard.
    pub async fn update_config(&self, patch: ConfigPatch) -> Result<RotationConfig> {
        let reordered = patch.dashboard_order.is_some();
        let mut manager = self.manager.write().await;
        let config = manager.update_config(patch)?;
        info!(
            interval_ms = config.rotation_interval_ms,
            auto_rotate = config.auto_rotate,
            "Live rotation config updated"
        );

        if reordered {
            self.publish(CurrentResponse::of(&manager)?);
        }
        Ok(config)
    }

    fn publish(&self, response: CurrentResponse) {
        // aucun abonné SSE : rien à faire
        let _ = self.events.send(response);
    }
}

/// Router `/api/live` combinant les différents endpoints REST.
pub fn live_api_router(state: LiveState) -> Router {
    Router::new()
        .route("/current", get(get_current))
        .route(
            "/config",
            get(get_live_config)
                .post(update_live_config)
                .patch(update_live_config),
        )
        .route("/config/update", get(update_live_config_from_query))
        .route("/next", post(next_dashboard))
        .route("/previous", post(previous_dashboard))
        .route("/index/{index}", post(set_dashboard_index))
        .route("/name/{name}", post(set_dashboard_by_name))
        .route("/dashboards", get(list_dashboards))
        .route("/events", get(live_events_sse))
        .with_state(state)
}

/// Document servi sur `GET /` : catalogue complet et géométrie de l'afficheur
pub fn service_listing(registry: &DashboardRegistry) -> JsonValue {
    serde_json::json!({
        "service": "LED Dashboard Server",
        "version": env!("CARGO_PKG_VERSION"),
        "dashboards": registry.list(),
        "display": {
            "width": 128,
            "height": 64,
            "mode": "dual",
            "sections": {
                "top": "128x32 - Weather",
                "bottom": "128x32 - Time"
            }
        }
    })
}

#[utoipa::path(
    get,
    path = "/api/live/current",
    tag = "live",
    responses(
        (status = 200, description = "Dashboard affiché", body = CurrentResponse),
        (status = 409, description = "Aucun dashboard disponible", body = ErrorResponse)
    )
)]
pub async fn get_current(State(state): State<LiveState>) -> Response {
    let manager = state.manager.read().await;
    respond(CurrentResponse::of(&manager))
}

#[utoipa::path(
    get,
    path = "/api/live/config",
    tag = "live",
    responses(
        (status = 200, description = "Configuration et liste effective", body = ConfigView)
    )
)]
pub async fn get_live_config(State(state): State<LiveState>) -> Json<ConfigView> {
    Json(state.manager.read().await.config())
}

#[utoipa::path(
    post,
    path = "/api/live/config",
    tag = "live",
    request_body = ConfigPatchRequest,
    responses(
        (status = 200, description = "Configuration mise à jour", body = RotationConfig),
        (status = 400, description = "Valeur invalide", body = ErrorResponse)
    )
)]
pub async fn update_live_config(
    State(state): State<LiveState>,
    Json(body): Json<JsonValue>,
) -> Response {
    match ConfigPatch::from_value(body) {
        Ok(patch) => respond(state.update_config(patch).await),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/live/config/update",
    tag = "live",
    params(
        ("rotationIntervalMs" = Option<String>, Query, description = "Intervalle en millisecondes"),
        ("autoRotate" = Option<String>, Query, description = "true/false, 1/0, yes/no, on/off"),
        ("transitionDurationMs" = Option<String>, Query, description = "Durée du fondu"),
        ("dashboardOrder" = Option<String>, Query, description = "Liste séparée par des virgules, ou clé répétée")
    ),
    responses(
        (status = 200, description = "Configuration mise à jour", body = RotationConfig),
        (status = 400, description = "Valeur invalide", body = ErrorResponse)
    )
)]
pub async fn update_live_config_from_query(
    State(state): State<LiveState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    match ConfigPatch::from_pairs(pairs) {
        Ok(patch) => respond(state.update_config(patch).await),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/live/next",
    tag = "live",
    responses(
        (status = 200, description = "Dashboard suivant", body = CurrentResponse),
        (status = 409, description = "Aucun dashboard disponible", body = ErrorResponse)
    )
)]
pub async fn next_dashboard(State(state): State<LiveState>) -> Response {
    respond(state.navigate("next", LiveManager::next).await)
}

#[utoipa::path(
    post,
    path = "/api/live/previous",
    tag = "live",
    responses(
        (status = 200, description = "Dashboard précédent", body = CurrentResponse),
        (status = 409, description = "Aucun dashboard disponible", body = ErrorResponse)
    )
)]
pub async fn previous_dashboard(State(state): State<LiveState>) -> Response {
    respond(state.navigate("previous", LiveManager::previous).await)
}

#[utoipa::path(
    post,
    path = "/api/live/index/{index}",
    tag = "live",
    params(("index" = i64, Path, description = "Position dans la liste effective")),
    responses(
        (status = 200, description = "Dashboard sélectionné", body = CurrentResponse),
        (status = 400, description = "Index hors limites", body = ErrorResponse)
    )
)]
pub async fn set_dashboard_index(
    State(state): State<LiveState>,
    Path(index): Path<i64>,
) -> Response {
    respond(state.navigate("index", |m| m.set_index(index)).await)
}

#[utoipa::path(
    post,
    path = "/api/live/name/{name}",
    tag = "live",
    params(("name" = String, Path, description = "Nom ou fragment d'URL, sans casse")),
    responses(
        (status = 200, description = "Dashboard sélectionné", body = CurrentResponse),
        (status = 404, description = "Aucun dashboard ne correspond", body = ErrorResponse)
    )
)]
pub async fn set_dashboard_by_name(
    State(state): State<LiveState>,
    Path(name): Path<String>,
) -> Response {
    respond(state.navigate("name", |m| m.by_name(&name)).await)
}

#[utoipa::path(
    get,
    path = "/api/live/dashboards",
    tag = "live",
    responses(
        (status = 200, description = "Liste effective de la rotation", body = [DisplayItem])
    )
)]
pub async fn list_dashboards(State(state): State<LiveState>) -> Json<Vec<DisplayItem>> {
    Json(state.manager.read().await.dashboards().to_vec())
}

fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => map_error(err),
    }
}

fn map_error(error: Error) -> Response {
    let (status, kind) = match &error {
        Error::EmptyRegistry => (StatusCode::CONFLICT, "EmptyRegistry"),
        Error::IndexOutOfRange { .. } => (StatusCode::BAD_REQUEST, "IndexOutOfRange"),
        Error::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
        Error::InvalidPatch(_) => (StatusCode::BAD_REQUEST, "InvalidPatch"),
    };
    warn!(status = status.as_u16(), "{}", error);

    (
        status,
        Json(ErrorResponse {
            error: kind.to_string(),
            message: error.to_string(),
        }),
    )
        .into_response()
}
