// src/api/handlers/health.rs
use actix_web::{HttpResponse, Result, web};
use serde_json::json;

use crate::api::AppState;

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "diabetes-predict",
        "version": env!("CARGO_PKG_VERSION"),
        "prediction_api": state.backend.api_base(),
        "sessions": state.sessions.len().await
    })))
}
