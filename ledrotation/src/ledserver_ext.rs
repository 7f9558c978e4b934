//! Extension ledserver pour la rotation en direct
//!
//! Ce module fournit un trait d'extension pour ajouter l'API `/api/live`
//! à un serveur ledserver, sans que ledserver dépende de ledrotation.

use anyhow::Result;

use crate::api::LiveState;
use crate::manager::LiveManager;

/// Trait pour étendre ledserver avec la rotation en direct
///
/// # Exemple
///
/// ```rust,no_run
/// use ledrotation::{LiveManager, LiveRotationExt};
/// use ledserver::ServerBuilder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut server = ServerBuilder::new_configured().build();
///
///     server.init_live_rotation(LiveManager::builtin()).await?;
///
///     server.start().await;
///     server.wait().await;
///     Ok(())
/// }
/// ```
pub trait LiveRotationExt {
    /// Enregistre l'API de rotation et la page d'accueil
    ///
    /// # Routes enregistrées
    ///
    /// - `/api/live/*` - Navigation, configuration et flux SSE
    /// - `/swagger-ui/live` - Documentation de l'API
    /// - `GET /` - Catalogue complet et géométrie de l'afficheur
    ///
    /// # Returns
    /// État partagé, à passer au pilote serveur éventuel
    async fn init_live_rotation(&mut self, manager: LiveManager) -> Result<LiveState>;
}
