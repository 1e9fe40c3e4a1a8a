use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::chart;
use crate::db::entries;
use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /weight-graph — PNG of the user's weight over time
async fn weight_graph(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let points = {
        let conn = state.db.get()?;
        entries::weight_series(&conn, user.id)?
    };

    let png = tokio::task::spawn_blocking(move || chart::render_weight_chart(&points)).await??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    )
        .into_response())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/weight-graph", get(weight_graph))
}
