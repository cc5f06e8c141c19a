use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    routing::get,
};
use invitely_config::CorsConfig;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    handlers::{handle_websocket, health, invitees, settings, stats},
};

/// Route paths shared by the router and its clients.
pub mod paths {
    pub const INVITEES: &str = "/invitees";
    pub const INVITEE: &str = "/invitees/{id}";
    pub const INVITEE_CHECKIN: &str = "/invitees/{id}/checkin";
    pub const STATS: &str = "/stats";
    pub const SETTINGS: &str = "/settings";
    pub const SETTINGS_ITEM: &str = "/settings/{slug}";
    pub const WS: &str = "/ws";
    pub const HEALTH: &str = "/health";

    /// Substitute `{name}` in a route template.
    pub fn with_param(template: &str, name: &str, value: &str) -> String {
        template.replace(&format!("{{{name}}}"), value)
    }
}

/// All routes, without middleware or state.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(
            paths::INVITEES,
            get(invitees::list_invitees).post(invitees::create_invitee),
        )
        .route(
            paths::INVITEE,
            get(invitees::get_invitee)
                .patch(invitees::update_invitee)
                .delete(invitees::delete_invitee),
        )
        .route(
            paths::INVITEE_CHECKIN,
            axum::routing::put(invitees::check_in_invitee),
        )
        .route(paths::STATS, get(stats::get_stats))
        .route(
            paths::SETTINGS,
            get(settings::get_active_settings).put(settings::upsert_settings),
        )
        .route(paths::SETTINGS_ITEM, get(settings::get_settings_by_slug))
        .route(paths::WS, get(handle_websocket::websocket_handler))
        .route(paths::HEALTH, get(health::health))
}

/// The full application: routes, CORS and request tracing, bound to `state`.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config().cors);

    create_api_router()
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let allow_origin = if cors.is_wildcard_included() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
            .collect();
        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|method| Method::from_bytes(method.trim().as_bytes()).ok())
        .collect();

    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|header| {
            HeaderName::from_bytes(header.trim().as_bytes()).ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_param_substitutes_template() {
        assert_eq!(
            paths::with_param(paths::INVITEE_CHECKIN, "id", "abc"),
            "/invitees/abc/checkin"
        );
    }
}
