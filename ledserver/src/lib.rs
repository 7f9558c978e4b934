//! # ledserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit l'enveloppe HTTP commune aux services du tableau LED :
//! enregistrement de routes, APIs documentées, pages de dashboards et logs
//! consultables à distance.
//!
//! ## Fonctionnalités
//!
//! - **API de haut niveau** : routes JSON, handlers avec état, sous-routers
//! - **Documentation OpenAPI** : Swagger UI par API (`/swagger-ui/{nom}`)
//! - **Pages de dashboards** : `/dashboard/{slug}` et fichiers `/public/*`
//! - **Logs** : buffer circulaire, flux SSE, niveau modifiable à chaud
//! - **CORS et cache** : `Access-Control-Allow-Origin: *`, `Cache-Control: no-cache`
//! - **Arrêt gracieux** : Ctrl+C et SIGTERM
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use ledserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_logging().await;
//!     server.add_health_check().await;
//!     server.add_configured_pages().await;
//!
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, init_logging, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
