pub mod assets;
pub mod auth;
pub mod chart;
pub mod dashboard;
pub mod entries;
pub mod home;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/assets/{*path}", get(assets::serve))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(entries::router())
        .merge(chart::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
