use askama::Template;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::db::entries;
use crate::db::models::HealthEntry;
use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::routes::home::{current_year, Html};
use crate::state::AppState;

/// One table row; absent metrics render as a dash.
pub struct EntryRow {
    pub id: i64,
    pub date: String,
    pub weight: String,
    pub steps: String,
    pub calories: String,
}

impl From<&HealthEntry> for EntryRow {
    fn from(entry: &HealthEntry) -> Self {
        fn or_dash<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
        }

        Self {
            id: entry.id,
            date: entry.date.clone(),
            weight: or_dash(entry.weight),
            steps: or_dash(entry.steps),
            calories: or_dash(entry.calories_burned),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
struct DashboardTemplate {
    current_year: i32,
    username: String,
    rows: Vec<EntryRow>,
}

/// Dashboard listing every entry the user owns, oldest first
async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let conn = state.db.get()?;
    let rows = entries::list_for_user(&conn, user.id)?
        .iter()
        .map(EntryRow::from)
        .collect();

    Ok(Html(DashboardTemplate {
        current_year: current_year(),
        username: user.username,
        rows,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
