use anyhow::Context;
use ledconfig::get_config;
use ledrotation::{DashboardRegistry, LiveConfigExt, LiveManager, LiveRotationExt, spawn_auto_rotation};
use ledserver::ServerBuilder;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Infrastructure HTTP ==========
    let mut server = ServerBuilder::new_configured().build();
    server.init_logging().await;
    server.add_health_check().await;

    let config = get_config();

    // ========== PHASE 2 : Rotation en direct ==========
    info!("📺 Initializing live dashboard rotation...");
    let rotation_config = config
        .get_live_rotation_config()
        .context("Failed to read live rotation configuration")?;
    let manager = LiveManager::new(DashboardRegistry::builtin(), rotation_config);
    let live = server.init_live_rotation(manager).await?;

    if config.get_live_server_driver() {
        spawn_auto_rotation(live);
    } else {
        info!("Rotation is driven by the displayed page (live.server_driver = false)");
    }

    // Pages des dashboards et fichiers statiques
    let pages_dir = config.get_pages_dir();
    if !pages_dir.is_dir() {
        warn!(pages = %pages_dir.display(), "⚠️ Dashboard pages directory not found");
    }
    server.add_configured_pages().await;

    // ========== PHASE 3 : Démarrage du serveur ==========
    let info = server.info();
    info!("🌐 Starting HTTP server...");
    server.start().await;

    info!(
        "✅ Dashboard URL: http://{}:{}/dashboard/weather-time",
        info.base_url, info.http_port
    );
    info!("Display: 128x64 pixels, top section weather, bottom section time");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
