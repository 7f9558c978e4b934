//! SSE pour suivre les changements de dashboard en direct.
//!
//! Route : `GET /api/live/events`. Le premier évènement est l'état courant,
//! les suivants sont émis à chaque navigation ou changement d'ordre.

use async_stream::stream;
use axum::{
    extract::State,
    response::IntoResponse,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio::sync::broadcast::error::RecvError;

use crate::api::{CurrentResponse, LiveState};

fn dashboard_event(payload: &CurrentResponse) -> Option<Event> {
    serde_json::to_string(payload)
        .ok()
        .map(|json| Event::default().event("dashboard").data(json))
}

/// Handler SSE : état courant puis flux des changements.
#[utoipa::path(
    get,
    path = "/api/live/events",
    tag = "live",
    responses(
        (status = 200, description = "Flux SSE des changements de dashboard (évènement `dashboard`)", content_type = "text/event-stream")
    )
)]
pub async fn live_events_sse(State(state): State<LiveState>) -> impl IntoResponse {
    let mut rx = state.subscribe();
    let initial = state.snapshot().await;

    let stream = stream! {
        if let Some(event) = initial.as_ref().and_then(dashboard_event) {
            yield Ok::<_, axum::Error>(event);
        }

        loop {
            match rx.recv().await {
                Ok(payload) => {
                    if let Some(event) = dashboard_event(&payload) {
                        yield Ok::<_, axum::Error>(event);
                    }
                }
                // un client lent rate des changements intermédiaires : seul le dernier compte
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Live SSE client lagging");
                    continue;
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
