//! LiveManager : catalogue + état de rotation + configuration
//!
//! Le manager est construit explicitement par l'application hôte et n'a pas
//! de verrou interne : un seul écrivain à la fois. Côté serveur, il vit
//! derrière un `tokio::sync::RwLock` (voir `server_ext`).

use chrono::{DateTime, Utc};

use crate::config::{ConfigPatch, ConfigView, RotationConfig};
use crate::registry::{DashboardRegistry, DisplayItem};
use crate::state::{CurrentDashboard, RotationState};
use crate::Result;

/// Gestionnaire de la rotation des dashboards en direct
#[derive(Debug, Clone)]
pub struct LiveManager {
    registry: DashboardRegistry,
    state: RotationState,
    config: RotationConfig,
}

impl LiveManager {
    /// Crée un manager positionné sur le premier dashboard de la liste effective
    pub fn new(registry: DashboardRegistry, config: RotationConfig) -> Self {
        let state = RotationState::new(config.effective_order(&registry));
        Self {
            registry,
            state,
            config,
        }
    }

    /// Manager sur le catalogue intégré, configuration par défaut
    pub fn builtin() -> Self {
        Self::new(DashboardRegistry::builtin(), RotationConfig::default())
    }

    pub fn registry(&self) -> &DashboardRegistry {
        &self.registry
    }

    pub fn current(&self) -> Result<CurrentDashboard> {
        self.state.current()
    }

    pub fn set_index(&mut self, index: i64) -> Result<CurrentDashboard> {
        self.state.set_index(index)
    }

    pub fn next(&mut self) -> Result<CurrentDashboard> {
        self.state.next()
    }

    pub fn previous(&mut self) -> Result<CurrentDashboard> {
        self.state.previous()
    }

    pub fn by_name(&mut self, query: &str) -> Result<CurrentDashboard> {
        self.state.by_name(query)
    }

    /// Configuration courante accompagnée de la liste effective
    pub fn config(&self) -> ConfigView {
        ConfigView {
            config: self.config.clone(),
            items: self.state.items().to_vec(),
        }
    }

    pub fn rotation_config(&self) -> &RotationConfig {
        &self.config
    }

    /// Applique un patch de configuration.
    ///
    /// Couplage avec l'état de rotation : si le patch porte `dashboardOrder`,
    /// la nouvelle liste effective remplace l'espace d'index de
    /// `RotationState`, puis `set_index(0)` place le dashboard courant sur le
    /// premier élément du nouvel ordre. Un patch sans `dashboardOrder` ne
    /// touche pas à l'état.
    pub fn update_config(&mut self, patch: ConfigPatch) -> Result<RotationConfig> {
        let order_changed = self.config.apply(patch);

        if order_changed {
            let effective = self.config.effective_order(&self.registry);
            tracing::debug!(
                requested = ?self.config.dashboard_order,
                resolved = effective.len(),
                "Dashboard order updated"
            );
            self.state.reorder(effective);
            self.state.set_index(0)?;
        }

        Ok(self.config.clone())
    }

    /// Liste effective (ordre personnalisé résolu, ou ordre canonique)
    pub fn dashboards(&self) -> &[DisplayItem] {
        self.state.items()
    }

    /// Catalogue canonique complet
    pub fn all_dashboards(&self) -> &[DisplayItem] {
        self.registry.list()
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.state.last_changed_at()
    }

    /// Millisecondes restantes avant la prochaine avancée automatique.
    ///
    /// `None` si la rotation automatique est désactivée ou si l'intervalle
    /// configuré n'est pas positif.
    pub fn time_until_next(&self, now: DateTime<Utc>) -> Option<u64> {
        if !self.config.auto_rotate {
            return None;
        }
        let interval = self.config.rotation_interval()?;
        let elapsed = (now - self.state.last_changed_at())
            .to_std()
            .unwrap_or_default();
        Some(interval.saturating_sub(elapsed).as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_update_without_order_keeps_position() {
        let mut manager = LiveManager::builtin();
        manager.set_index(5).unwrap();
        manager
            .update_config(ConfigPatch::default().rotation_interval_ms(1000))
            .unwrap();
        assert_eq!(manager.current().unwrap().index, 5);
        assert_eq!(manager.rotation_config().rotation_interval_ms, 1000);
    }

    #[test]
    fn test_clearing_order_restores_canonical_list() {
        let mut manager = LiveManager::builtin();
        manager
            .update_config(ConfigPatch::default().dashboard_order(["Frogger", "Centipede"]))
            .unwrap();
        assert_eq!(manager.dashboards().len(), 2);

        manager.next().unwrap();
        manager
            .update_config(ConfigPatch::default().dashboard_order(Vec::<String>::new()))
            .unwrap();
        assert_eq!(manager.dashboards().len(), 40);
        assert_eq!(manager.current().unwrap().item.name, "Weather & Time");
    }

    #[test]
    fn test_initial_order_is_applied() {
        let config = RotationConfig {
            dashboard_order: vec!["Fireworks".into(), "heart-beat".into()],
            ..RotationConfig::default()
        };
        let manager = LiveManager::new(DashboardRegistry::builtin(), config);
        assert_eq!(manager.current().unwrap().item.name, "Fireworks");
        assert_eq!(manager.dashboards().len(), 2);
        assert_eq!(manager.all_dashboards().len(), 40);
    }

    #[test]
    fn test_time_until_next() {
        let manager = LiveManager::builtin();
        let now = manager.last_update() + Duration::milliseconds(10_000);
        assert_eq!(manager.time_until_next(now), Some(20_000));

        let late = manager.last_update() + Duration::milliseconds(45_000);
        assert_eq!(manager.time_until_next(late), Some(0));
    }

    #[test]
    fn test_time_until_next_disabled() {
        let mut manager = LiveManager::builtin();
        manager
            .update_config(ConfigPatch::default().auto_rotate(false))
            .unwrap();
        assert_eq!(manager.time_until_next(Utc::now()), None);

        manager
            .update_config(ConfigPatch::default().auto_rotate(true).rotation_interval_ms(0))
            .unwrap();
        assert_eq!(manager.time_until_next(Utc::now()), None);
    }
}
