// src/api/handlers/session.rs
use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde_json::json;

use crate::api::AppState;
use crate::api::handlers::page::current_session;
use crate::view;

pub async fn get_session(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(session) = current_session(&req, &state).await else {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "No page session. Load / first."
        })));
    };

    let page = session.lock().await;
    Ok(HttpResponse::Ok().json(view::snapshot(&page.controller)))
}
