//! Extension de ledconfig pour la rotation en direct
//!
//! Section `live` du fichier de configuration :
//!
//! ```yaml
//! live:
//!   rotation_interval_ms: 30000
//!   auto_rotate: true
//!   transition_duration_ms: 500
//!   dashboard_order: [Tetris, Frogger]   # ou "Tetris, Frogger"
//!   server_driver: false
//! ```
//!
//! Les valeurs ne sont lues qu'au démarrage : les changements faits ensuite
//! par l'API ne sont jamais réécrits dans le fichier.

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};

use crate::config::{ConfigPatch, RotationConfig};

/// (clé YAML, clé du patch)
const LIVE_KEYS: [(&str, &str); 4] = [
    ("rotation_interval_ms", "rotationIntervalMs"),
    ("auto_rotate", "autoRotate"),
    ("transition_duration_ms", "transitionDurationMs"),
    ("dashboard_order", "dashboardOrder"),
];

/// Trait d'extension pour ledconfig::Config
pub trait LiveConfigExt {
    /// Configuration initiale de la rotation (valeurs par défaut complétées
    /// par la section `live`)
    fn get_live_rotation_config(&self) -> Result<RotationConfig>;

    /// Faut-il lancer le pilote de rotation côté serveur ?
    fn get_live_server_driver(&self) -> bool;
}

impl LiveConfigExt for ledconfig::Config {
    fn get_live_rotation_config(&self) -> Result<RotationConfig> {
        let mut seed = Map::new();
        for (yaml_key, patch_key) in LIVE_KEYS {
            let Ok(value) = self.get_value(&["live", yaml_key]) else {
                continue;
            };
            let value = serde_json::to_value(&value)
                .with_context(|| format!("live.{yaml_key} is not representable"))?;
            seed.insert(patch_key.to_string(), value);
        }

        // les valeurs du fichier (ou des variables d'environnement) peuvent
        // être des chaînes : mêmes règles de conversion que l'API
        let patch = ConfigPatch::from_value(JsonValue::Object(seed))
            .context("Invalid live rotation configuration")?;

        let mut config = RotationConfig::default();
        config.apply(patch);
        Ok(config)
    }

    fn get_live_server_driver(&self) -> bool {
        match self.get_value(&["live", "server_driver"]) {
            Ok(serde_yaml::Value::Bool(b)) => b,
            Ok(serde_yaml::Value::String(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
            }
            _ => false,
        }
    }
}
