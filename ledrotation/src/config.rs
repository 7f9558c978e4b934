//! Configuration de la rotation et mise à jour partielle
//!
//! Les valeurs de [`RotationConfig`] sont *indicatives* : elles disent au
//! pilote externe à quel rythme avancer et combien de temps doit durer le
//! fondu, mais `RotationState` ne les lit jamais. Seul `dashboard_order`
//! change le comportement de la rotation, en redéfinissant la liste effective.
//!
//! Aucune validation de plage n'est faite : un intervalle négatif est
//! conservé tel quel.
//!
//! Les patchs arrivent de l'extérieur sous forme faiblement typée (corps JSON,
//! query string). [`ConfigPatch::from_value`] et [`ConfigPatch::from_pairs`]
//! les convertissent champ par champ en un patch fortement typé, ou en
//! [`Error::InvalidPatch`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::registry::{DashboardRegistry, DisplayItem};
use crate::{Error, Result};

pub const DEFAULT_ROTATION_INTERVAL_MS: i64 = 30_000;
pub const DEFAULT_AUTO_ROTATE: bool = true;
pub const DEFAULT_TRANSITION_DURATION_MS: i64 = 500;

/// Paramètres ajustables de la rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ledserver", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RotationConfig {
    /// Délai suggéré entre deux avancées automatiques
    #[cfg_attr(feature = "ledserver", schema(example = 30000))]
    pub rotation_interval_ms: i64,
    pub auto_rotate: bool,
    /// Durée du fondu enchaîné, purement cosmétique
    #[cfg_attr(feature = "ledserver", schema(example = 500))]
    pub transition_duration_ms: i64,
    /// Ordre personnalisé (noms ou fragments d'identifiant)
    pub dashboard_order: Vec<String>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            rotation_interval_ms: DEFAULT_ROTATION_INTERVAL_MS,
            auto_rotate: DEFAULT_AUTO_ROTATE,
            transition_duration_ms: DEFAULT_TRANSITION_DURATION_MS,
            dashboard_order: Vec::new(),
        }
    }
}

impl RotationConfig {
    /// Applique un patch. Retourne `true` si le patch portait `dashboard_order`,
    /// auquel cas l'appelant doit resynchroniser l'état de rotation.
    pub fn apply(&mut self, patch: ConfigPatch) -> bool {
        let ConfigPatch {
            rotation_interval_ms,
            auto_rotate,
            transition_duration_ms,
            dashboard_order,
        } = patch;

        if let Some(interval) = rotation_interval_ms {
            self.rotation_interval_ms = interval;
        }
        if let Some(auto) = auto_rotate {
            self.auto_rotate = auto;
        }
        if let Some(duration) = transition_duration_ms {
            self.transition_duration_ms = duration;
        }

        match dashboard_order {
            Some(order) => {
                self.dashboard_order = order;
                true
            }
            None => false,
        }
    }

    /// Liste effective : ordre personnalisé résolu, ou ordre canonique si
    /// l'ordre est vide ou ne résout aucun dashboard.
    pub fn effective_order(&self, registry: &DashboardRegistry) -> Vec<DisplayItem> {
        registry.ordered(&self.dashboard_order)
    }

    /// Intervalle de rotation, `None` si la valeur stockée n'est pas positive
    pub fn rotation_interval(&self) -> Option<Duration> {
        u64::try_from(self.rotation_interval_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Configuration accompagnée de la liste effective
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ledserver", derive(utoipa::ToSchema))]
pub struct ConfigView {
    #[serde(flatten)]
    #[cfg_attr(feature = "ledserver", schema(inline))]
    pub config: RotationConfig,
    pub items: Vec<DisplayItem>,
}

/// Mise à jour partielle, fortement typée
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub rotation_interval_ms: Option<i64>,
    pub auto_rotate: Option<bool>,
    pub transition_duration_ms: Option<i64>,
    pub dashboard_order: Option<Vec<String>>,
}

impl ConfigPatch {
    pub fn rotation_interval_ms(mut self, value: i64) -> Self {
        self.rotation_interval_ms = Some(value);
        self
    }

    pub fn auto_rotate(mut self, value: bool) -> Self {
        self.auto_rotate = Some(value);
        self
    }

    pub fn transition_duration_ms(mut self, value: i64) -> Self {
        self.transition_duration_ms = Some(value);
        self
    }

    pub fn dashboard_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dashboard_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Construit un patch depuis un document JSON quelconque (corps de requête).
    ///
    /// Les champs inconnus sont ignorés ; `null` équivaut à un champ absent.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        let raw: RawPatch =
            serde_json::from_value(value).map_err(|e| Error::InvalidPatch(e.to_string()))?;
        raw.coerce()
    }

    /// Construit un patch depuis des paires clé/valeur (query string, formulaire).
    ///
    /// Une clé répétée (`dashboardOrder=A&dashboardOrder=B`) devient une liste.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = serde_json::Map::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = JsonValue::String(value.into());
            match map.get_mut(&key) {
                Some(JsonValue::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = JsonValue::Array(vec![first, value]);
                }
                None => {
                    map.insert(key, value);
                }
            }
        }
        Self::from_value(JsonValue::Object(map))
    }
}

/// Valeur externe avant coercition
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPatch {
    #[serde(default, alias = "rotationInterval")]
    rotation_interval_ms: Option<Loose>,
    #[serde(default)]
    auto_rotate: Option<Loose>,
    #[serde(default, alias = "transitionDuration")]
    transition_duration_ms: Option<Loose>,
    #[serde(default)]
    dashboard_order: Option<Loose>,
}

impl RawPatch {
    fn coerce(self) -> Result<ConfigPatch> {
        Ok(ConfigPatch {
            rotation_interval_ms: self
                .rotation_interval_ms
                .map(|v| coerce_number("rotationIntervalMs", v))
                .transpose()?,
            auto_rotate: self
                .auto_rotate
                .map(|v| coerce_bool("autoRotate", v))
                .transpose()?,
            transition_duration_ms: self
                .transition_duration_ms
                .map(|v| coerce_number("transitionDurationMs", v))
                .transpose()?,
            dashboard_order: self
                .dashboard_order
                .map(|v| coerce_order("dashboardOrder", v))
                .transpose()?,
        })
    }
}

fn invalid(field: &str, value: &Loose) -> Error {
    Error::InvalidPatch(format!("{field}: unexpected value {value:?}"))
}

fn float_to_int(field: &str, f: f64) -> Result<i64> {
    if f.is_finite() {
        Ok(f.trunc() as i64)
    } else {
        Err(Error::InvalidPatch(format!("{field}: {f} is not a finite number")))
    }
}

/// Entier, flottant (tronqué) ou chaîne numérique
fn coerce_number(field: &str, value: Loose) -> Result<i64> {
    match value {
        Loose::Int(n) => Ok(n),
        Loose::Float(f) => float_to_int(field, f),
        Loose::Text(ref s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                Ok(n)
            } else if let Ok(f) = s.parse::<f64>() {
                float_to_int(field, f)
            } else {
                Err(invalid(field, &value))
            }
        }
        other => Err(invalid(field, &other)),
    }
}

/// Booléen, nombre (non nul = vrai) ou chaîne usuelle
fn coerce_bool(field: &str, value: Loose) -> Result<bool> {
    match value {
        Loose::Bool(b) => Ok(b),
        Loose::Int(n) => Ok(n != 0),
        Loose::Float(f) => Ok(f != 0.0),
        Loose::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(invalid(field, &value)),
        },
        other => Err(invalid(field, &other)),
    }
}

/// Liste de chaînes telle quelle, ou chaîne séparée par des virgules
fn coerce_order(field: &str, value: Loose) -> Result<Vec<String>> {
    match value {
        Loose::List(list) => Ok(list),
        Loose::Text(s) => Ok(split_order(&s)),
        other => Err(invalid(field, &other)),
    }
}

/// Découpe `"A, B ,C"` en `["A", "B", "C"]`, sans éléments vides
pub fn split_order(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_number_is_coerced() {
        let patch = ConfigPatch::from_value(json!({"rotationIntervalMs": "5000"})).unwrap();
        assert_eq!(patch.rotation_interval_ms, Some(5000));

        let patch = ConfigPatch::from_value(json!({"transitionDurationMs": " 750.9 "})).unwrap();
        assert_eq!(patch.transition_duration_ms, Some(750));
    }

    #[test]
    fn test_legacy_field_names() {
        let patch =
            ConfigPatch::from_value(json!({"rotationInterval": 10000, "transitionDuration": 250}))
                .unwrap();
        assert_eq!(patch.rotation_interval_ms, Some(10000));
        assert_eq!(patch.transition_duration_ms, Some(250));
    }

    #[test]
    fn test_negative_values_are_kept() {
        let patch = ConfigPatch::from_value(json!({"rotationIntervalMs": -1})).unwrap();
        let mut config = RotationConfig::default();
        config.apply(patch);
        assert_eq!(config.rotation_interval_ms, -1);
        assert_eq!(config.rotation_interval(), None);
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let err = ConfigPatch::from_value(json!({"rotationIntervalMs": "soon"})).unwrap_err();
        assert!(matches!(err, Error::InvalidPatch(_)));
        assert!(ConfigPatch::from_value(json!({"rotationIntervalMs": true})).is_err());
    }

    #[test]
    fn test_bool_coercion() {
        for (input, expected) in [
            (json!(true), true),
            (json!("false"), false),
            (json!("ON"), true),
            (json!("0"), false),
            (json!(1), true),
        ] {
            let patch = ConfigPatch::from_value(json!({ "autoRotate": input })).unwrap();
            assert_eq!(patch.auto_rotate, Some(expected));
        }
        assert!(ConfigPatch::from_value(json!({"autoRotate": "maybe"})).is_err());
    }

    #[test]
    fn test_comma_separated_order() {
        let patch = ConfigPatch::from_value(json!({"dashboardOrder": "A, B ,C"})).unwrap();
        assert_eq!(
            patch.dashboard_order,
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );

        let patch = ConfigPatch::from_value(json!({"dashboardOrder": " , "})).unwrap();
        assert_eq!(patch.dashboard_order, Some(vec![]));
    }

    #[test]
    fn test_list_order_is_kept_as_given() {
        let patch =
            ConfigPatch::from_value(json!({"dashboardOrder": ["Tetris", "Snake Game"]})).unwrap();
        assert_eq!(
            patch.dashboard_order,
            Some(vec!["Tetris".to_string(), "Snake Game".to_string()])
        );
        assert!(ConfigPatch::from_value(json!({"dashboardOrder": [1, 2]})).is_err());
    }

    #[test]
    fn test_null_and_unknown_fields() {
        let patch =
            ConfigPatch::from_value(json!({"autoRotate": null, "colour": "red"})).unwrap();
        assert!(patch.is_empty());
        assert!(ConfigPatch::from_value(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_from_pairs() {
        let patch = ConfigPatch::from_pairs(vec![
            ("rotationIntervalMs", "15000"),
            ("autoRotate", "false"),
            ("dashboardOrder", "Tetris"),
            ("dashboardOrder", "Frogger"),
        ])
        .unwrap();

        assert_eq!(
            patch,
            ConfigPatch::default()
                .rotation_interval_ms(15000)
                .auto_rotate(false)
                .dashboard_order(["Tetris", "Frogger"])
        );
    }

    #[test]
    fn test_apply_reports_order_change() {
        let mut config = RotationConfig::default();
        assert!(!config.apply(ConfigPatch::default().auto_rotate(false)));
        assert!(!config.auto_rotate);
        assert_eq!(config.rotation_interval_ms, DEFAULT_ROTATION_INTERVAL_MS);

        assert!(config.apply(ConfigPatch::default().dashboard_order(["Tetris"])));
        assert_eq!(config.dashboard_order, vec!["Tetris".to_string()]);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(RotationConfig::default()).unwrap();
        assert_eq!(
            json,
            json!({
                "rotationIntervalMs": 30000,
                "autoRotate": true,
                "transitionDurationMs": 500,
                "dashboardOrder": []
            })
        );
    }
}
