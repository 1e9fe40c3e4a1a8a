use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};

use crate::db::entries;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, EntryId};
use crate::forms::EntryForm;
use crate::routes::home::{current_year, Html};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/add_data.html")]
struct AddEntryTemplate {
    current_year: i32,
    form: EntryForm,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/edit_data.html")]
struct EditEntryTemplate {
    current_year: i32,
    entry_id: i64,
    form: EntryForm,
    error: Option<String>,
}

/// GET /add-data
async fn add_page(_user: CurrentUser) -> Html<AddEntryTemplate> {
    Html(AddEntryTemplate {
        current_year: current_year(),
        form: EntryForm::default(),
        error: None,
    })
}

/// POST /add-data — insert an entry for the current user
async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<EntryForm>,
) -> AppResult<Response> {
    let values = match form.validate() {
        Ok(values) => values,
        Err(e) => {
            let page = AddEntryTemplate {
                current_year: current_year(),
                error: Some(e.to_string()),
                form,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    let conn = state.db.get()?;
    let entry_id = entries::insert(&conn, user.id, &values)?;
    tracing::debug!(user_id = user.id, entry_id, "Added health entry");

    Ok(Redirect::to("/dashboard").into_response())
}

/// GET /edit/{entry_id} — form prefilled with the stored values
async fn edit_page(
    State(state): State<AppState>,
    user: CurrentUser,
    EntryId(entry_id): EntryId,
) -> AppResult<Html<EditEntryTemplate>> {
    let conn = state.db.get()?;
    let entry = entries::find_for_user(&conn, user.id, entry_id)?.ok_or(AppError::EntryNotFound)?;

    Ok(Html(EditEntryTemplate {
        current_year: current_year(),
        entry_id,
        form: EntryForm::from(&entry),
        error: None,
    }))
}

/// POST /edit/{entry_id} — replace every field of an owned entry
async fn edit(
    State(state): State<AppState>,
    user: CurrentUser,
    EntryId(entry_id): EntryId,
    Form(form): Form<EntryForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    if entries::find_for_user(&conn, user.id, entry_id)?.is_none() {
        return Err(AppError::EntryNotFound);
    }

    let values = match form.validate() {
        Ok(values) => values,
        Err(e) => {
            let page = EditEntryTemplate {
                current_year: current_year(),
                entry_id,
                error: Some(e.to_string()),
                form,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    entries::update_for_user(&conn, user.id, entry_id, &values)?;
    tracing::debug!(user_id = user.id, entry_id, "Updated health entry");

    Ok(Redirect::to("/dashboard").into_response())
}

/// GET /delete/{entry_id} — ids the user does not own are ignored
async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    EntryId(entry_id): EntryId,
) -> AppResult<Redirect> {
    let conn = state.db.get()?;
    let deleted = entries::delete_for_user(&conn, user.id, entry_id)?;
    tracing::debug!(user_id = user.id, entry_id, deleted, "Delete health entry");

    Ok(Redirect::to("/dashboard"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-data", get(add_page).post(add))
        .route("/edit/{entry_id}", get(edit_page).post(edit))
        .route("/delete/{entry_id}", get(delete))
}
