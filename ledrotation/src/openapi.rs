//! Documentation OpenAPI pour l'API de rotation en direct.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API `/api/live`.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::get_current,
        crate::api::get_live_config,
        crate::api::update_live_config,
        crate::api::update_live_config_from_query,
        crate::api::next_dashboard,
        crate::api::previous_dashboard,
        crate::api::set_dashboard_index,
        crate::api::set_dashboard_by_name,
        crate::api::list_dashboards,
        crate::sse::live_events_sse,
    ),
    components(
        schemas(
            crate::api::CurrentResponse,
            crate::api::ConfigPatchRequest,
            crate::api::ErrorResponse,
            crate::config::RotationConfig,
            crate::config::ConfigView,
            crate::registry::DisplayItem,
        )
    ),
    tags(
        (name = "live", description = "Rotation des dashboards affichés sur le panneau LED")
    ),
    info(
        title = "LED Dashboard Live Rotation API",
        version = "0.1.0",
        description = r#"
# Rotation en direct

Un seul dashboard est affiché à la fois. La rotation parcourt la liste
*effective* : l'ordre personnalisé (`dashboardOrder`) résolu, ou l'ordre
canonique si celui-ci est vide ou ne désigne aucun dashboard connu.

- `next` / `previous` bouclent aux extrémités
- `index/{index}` refuse un index hors de la liste effective (400)
- `name/{name}` cherche un nom ou un fragment d'URL, sans casse (404 sinon)
- changer `dashboardOrder` revient au premier dashboard du nouvel ordre

`rotationIntervalMs`, `autoRotate` et `transitionDurationMs` sont indicatifs :
le client (ou le pilote serveur optionnel) décide quand avancer.
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
