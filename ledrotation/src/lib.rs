//! # ledrotation - Rotation en direct des dashboards du panneau LED
//!
//! Cette crate décide quel dashboard est affiché à un instant donné :
//! - **DashboardRegistry** : catalogue figé des dashboards (ordre canonique)
//! - **RotationState** : index courant sur la liste effective, avec bouclage
//! - **RotationConfig** : intervalle, rotation automatique, fondu et ordre
//!   personnalisé, modifiables par patch partiel
//! - **LiveManager** : les trois réunis, avec le couplage ordre → position
//!
//! Aucune minuterie n'est embarquée : un pilote externe appelle `next()`.
//!
//! # Features
//!
//! - `ledconfig` (par défaut) : lecture de la section `live` via [`LiveConfigExt`]
//! - `ledserver` : API REST `/api/live`, flux SSE et pilote côté serveur
//!
//! # Exemple d'utilisation
//!
//! ```
//! use ledrotation::{ConfigPatch, LiveManager};
//!
//! let mut manager = LiveManager::builtin();
//! assert_eq!(manager.current()?.item.name, "Weather & Time");
//!
//! manager.next()?;
//! manager.by_name("tetris")?;
//!
//! // un nouvel ordre replace la rotation sur son premier élément
//! manager.update_config(ConfigPatch::default().dashboard_order(["Frogger", "Tetris"]))?;
//! assert_eq!(manager.current()?.item.name, "Frogger");
//! # Ok::<(), ledrotation::Error>(())
//! ```

mod config;
mod error;
mod manager;
mod registry;
mod state;

#[cfg(feature = "ledconfig")]
mod config_ext;

#[cfg(feature = "ledserver")]
pub mod api;
#[cfg(feature = "ledserver")]
pub mod driver;
#[cfg(feature = "ledserver")]
mod ledserver_ext;
#[cfg(feature = "ledserver")]
mod ledserver_impl;
#[cfg(feature = "ledserver")]
pub mod openapi;
#[cfg(feature = "ledserver")]
pub mod sse;

// Réexports publics
pub use config::{
    ConfigPatch, ConfigView, DEFAULT_AUTO_ROTATE, DEFAULT_ROTATION_INTERVAL_MS,
    DEFAULT_TRANSITION_DURATION_MS, RotationConfig, split_order,
};
pub use error::{Error, Result};
pub use manager::LiveManager;
pub use registry::{DashboardRegistry, DisplayItem};
pub use state::{CurrentDashboard, RotationState};

#[cfg(feature = "ledconfig")]
pub use config_ext::LiveConfigExt;

#[cfg(feature = "ledserver")]
pub use api::{LiveState, live_api_router};
#[cfg(feature = "ledserver")]
pub use driver::spawn_auto_rotation;
#[cfg(feature = "ledserver")]
pub use ledserver_ext::LiveRotationExt;
