//! Implémentation du trait LiveRotationExt pour ledserver::Server

use anyhow::Result;
use ledserver::Server;
use tracing::info;
use utoipa::OpenApi;

use crate::api::{LiveState, live_api_router, service_listing};
use crate::ledserver_ext::LiveRotationExt;
use crate::manager::LiveManager;
use crate::openapi::ApiDoc;

impl LiveRotationExt for Server {
    async fn init_live_rotation(&mut self, manager: LiveManager) -> Result<LiveState> {
        info!("Initializing live rotation API...");

        let listing = service_listing(manager.registry());
        let current = manager.current()?;
        info!(
            dashboards = manager.dashboards().len(),
            current = %current.item.name,
            "Live rotation ready"
        );

        let state = LiveState::new(manager);
        self.add_openapi(live_api_router(state.clone()), ApiDoc::openapi(), "live")
            .await;

        self.add_route("/", move || {
            let listing = listing.clone();
            async move { listing }
        })
        .await;

        info!("API endpoints available at /api/live/*");
        Ok(state)
    }
}
