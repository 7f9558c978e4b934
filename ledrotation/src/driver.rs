//! Pilote de rotation côté serveur
//!
//! Par défaut c'est la page affichée qui interroge `/api/live/current` et
//! demande `next` quand l'intervalle est écoulé. Quand `live.server_driver`
//! est activé, cette tâche tokio prend ce rôle.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::api::LiveState;
use crate::config::RotationConfig;
use crate::manager::LiveManager;

/// Intervalle minimal utilisé pour planifier les avancées
pub const MIN_SCHEDULED_INTERVAL: Duration = Duration::from_millis(1000);

const TICK: Duration = Duration::from_millis(250);

/// Intervalle réellement appliqué, `None` si la rotation automatique est coupée.
///
/// La valeur stockée dans la configuration n'est pas modifiée.
pub fn scheduled_interval(config: &RotationConfig) -> Option<Duration> {
    if !config.auto_rotate {
        return None;
    }
    Some(
        config
            .rotation_interval()
            .map_or(MIN_SCHEDULED_INTERVAL, |d| d.max(MIN_SCHEDULED_INTERVAL)),
    )
}

/// Vrai si le dashboard courant est affiché depuis au moins l'intervalle planifié
pub fn is_due(manager: &LiveManager, now: DateTime<Utc>) -> bool {
    let Some(interval) = scheduled_interval(manager.rotation_config()) else {
        return false;
    };
    let elapsed = (now - manager.last_update()).to_std().unwrap_or_default();
    elapsed >= interval
}

/// Lance la tâche qui avance la rotation quand l'intervalle est écoulé
pub fn spawn_auto_rotation(state: LiveState) -> JoinHandle<()> {
    info!("Server-side live rotation driver started");

    tokio::spawn(async move {
        let mut ticker = interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut clamped: Option<i64> = None;

        loop {
            ticker.tick().await;

            {
                let manager = state.manager().read().await;
                warn_if_clamped(manager.rotation_config(), &mut clamped);
            }

            if let Err(e) = state.advance_if_due(Utc::now()).await {
                debug!("Auto rotation skipped: {}", e);
            }
        }
    })
}

/// Signale une seule fois chaque valeur d'intervalle trop courte
fn warn_if_clamped(config: &RotationConfig, clamped: &mut Option<i64>) {
    let configured = config.rotation_interval_ms;
    let too_short = config.auto_rotate && configured < MIN_SCHEDULED_INTERVAL.as_millis() as i64;
    if too_short && *clamped != Some(configured) {
        warn!(
            configured_ms = configured,
            "Rotation interval below {} ms, scheduling at the minimum",
            MIN_SCHEDULED_INTERVAL.as_millis()
        );
    }
    *clamped = too_short.then_some(configured);
}
