use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;

use crate::auth::accounts;
use crate::error::{AppError, AppResult};
use crate::forms::{LoginForm, RegisterForm};
use crate::routes::home::{current_year, Html};
use crate::state::AppState;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterTemplate {
    pub current_year: i32,
    pub username: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub current_year: i32,
    pub username: String,
    pub error: Option<String>,
}

impl RegisterTemplate {
    fn new(username: String, error: Option<String>, success: Option<String>) -> Self {
        Self {
            current_year: current_year(),
            username,
            error,
            success,
        }
    }
}

impl LoginTemplate {
    fn new(username: String, error: Option<String>) -> Self {
        Self {
            current_year: current_year(),
            username,
            error,
        }
    }
}

// -- Registration --

/// GET /register
pub async fn register_page() -> Html<RegisterTemplate> {
    Html(RegisterTemplate::new(String::new(), None, None))
}

/// POST /register — create an account; problems are shown on the form
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let submitted_username = form.username.clone();
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(e) => {
            let page = RegisterTemplate::new(submitted_username, Some(e.to_string()), None);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    let username = registration.username.clone();
    let pool = state.db.clone();
    let cost = state.config.auth.bcrypt_cost;

    // bcrypt hashing blocks, so it runs on the blocking pool
    let outcome = tokio::task::spawn_blocking(move || {
        let conn = pool.get()?;
        Ok::<_, AppError>(accounts::register(&conn, registration, cost))
    })
    .await??;

    match outcome {
        Ok(user_id) => {
            tracing::info!(user_id, "Registered user {}", username);
            let page = RegisterTemplate::new(
                String::new(),
                None,
                Some("Registration successful! Please login.".to_string()),
            );
            Ok(Html(page).into_response())
        }
        Err(e) if e.is_user_facing() => {
            tracing::info!("Registration rejected for {}: {}", username, e);
            let page = RegisterTemplate::new(username, Some(e.to_string()), None);
            Ok(Html(page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// -- Login / logout --

/// GET /login
pub async fn login_page() -> Html<LoginTemplate> {
    Html(LoginTemplate::new(String::new(), None))
}

/// POST /login — verify credentials, set the session cookie and go to the dashboard
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let LoginForm { username, password } = form.normalize();
    let pool = state.db.clone();
    let lookup_name = username.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let conn = pool.get()?;
        Ok::<_, AppError>(accounts::login(&conn, &lookup_name, &password))
    })
    .await??;

    match outcome {
        Ok(user) => {
            tracing::info!(user_id = user.id, "User {} logged in", user.username);
            let token = state.sessions.issue(user.id, &user.username);
            let cookie = state.sessions.session_cookie(&token);
            Ok((
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Redirect::to("/dashboard"),
            )
                .into_response())
        }
        Err(e) if e.is_user_facing() => {
            tracing::warn!("Failed login for {}: {}", username, e);
            Ok(Html(LoginTemplate::new(username, Some(e.to_string()))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout — clear the session cookie and redirect to login
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, state.sessions.clear_cookie())]),
        Redirect::to("/login"),
    )
        .into_response()
}
