// src/api/handlers/page.rs
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, Result, web};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::state::SharedSession;
use crate::backend::PredictionBackend;
use crate::controller::SubmitBlocked;
use crate::models::Field;
use crate::validation::Violation;
use crate::view;

pub const SESSION_COOKIE: &str = "predict_session";

#[derive(Deserialize)]
pub struct FieldEdit {
    pub name: String,
    pub value: String,
}

/// The caller's page session, if the cookie names a live one.
pub async fn current_session(req: &HttpRequest, state: &AppState) -> Option<SharedSession> {
    let id = req
        .cookie(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())?;
    state.sessions.get(&id).await
}

/// Existing session, or a new one whose options fetch has already run.
/// The id is returned only for a new session, so the caller can set the cookie.
async fn find_or_start(req: &HttpRequest, state: &AppState) -> (SharedSession, Option<Uuid>) {
    if let Some(session) = current_session(req, state).await {
        return (session, None);
    }

    let mut controller = state.new_controller();
    controller.load_options(&state.backend).await;
    let status = controller.api_status();
    log::info!(
        "New page session (running: {}, model loaded: {})",
        status.running,
        status.model_loaded
    );

    let (id, session) = state.sessions.insert(controller).await;
    (session, Some(id))
}

fn respond(status: StatusCode, new_session: Option<Uuid>) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    if let Some(id) = new_session {
        builder.cookie(
            Cookie::build(SESSION_COOKIE, id.to_string())
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish(),
        );
    }
    builder
}

fn redirect_home(new_session: Option<Uuid>) -> HttpResponse {
    respond(StatusCode::SEE_OTHER, new_session)
        .insert_header((header::LOCATION, "/"))
        .finish()
}

async fn render(
    session: &SharedSession,
    status: StatusCode,
    new_session: Option<Uuid>,
    violations: &[Violation],
) -> HttpResponse {
    let html = {
        let page = session.lock().await;
        view::render_page(&page.controller, violations)
    };
    respond(status, new_session)
        .content_type("text/html; charset=utf-8")
        .body(html)
}

pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let (session, new_session) = find_or_start(&req, &state).await;
    Ok(render(&session, StatusCode::OK, new_session, &[]).await)
}

pub async fn edit_field(
    req: HttpRequest,
    state: web::Data<AppState>,
    edit: web::Form<FieldEdit>,
) -> Result<HttpResponse> {
    let (session, new_session) = find_or_start(&req, &state).await;
    let edit = edit.into_inner();

    let updated = session
        .lock()
        .await
        .controller
        .update_field(&edit.name, edit.value);

    match updated {
        Ok(()) => Ok(redirect_home(new_session)),
        Err(e) => Ok(respond(StatusCode::BAD_REQUEST, new_session).json(json!({
            "error": e.to_string()
        }))),
    }
}

pub async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    fields: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse> {
    let (session, new_session) = find_or_start(&req, &state).await;

    let begun = {
        let mut page = session.lock().await;
        for (name, value) in fields.into_inner() {
            match name.parse::<Field>() {
                Ok(field) => page.controller.set_field(field, value),
                Err(_) => log::debug!("Ignoring unknown form field '{}'", name),
            }
        }
        page.controller.begin_submit()
    };

    // The session lock is not held across the prediction call.
    match begun {
        Ok(payload) => {
            let outcome = state.backend.predict(&payload).await;
            session.lock().await.controller.resolve_submit(outcome);
            Ok(redirect_home(new_session))
        }
        Err(SubmitBlocked::Invalid(violations)) => {
            log::info!("Submission blocked by {} invalid field(s)", violations.len());
            Ok(render(
                &session,
                StatusCode::UNPROCESSABLE_ENTITY,
                new_session,
                &violations,
            )
            .await)
        }
        Err(SubmitBlocked::Disabled) => {
            log::info!("Submission refused: submit control is disabled");
            Ok(render(&session, StatusCode::CONFLICT, new_session, &[]).await)
        }
    }
}

pub async fn reset(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let (session, new_session) = find_or_start(&req, &state).await;
    session.lock().await.controller.reset();
    Ok(redirect_home(new_session))
}
