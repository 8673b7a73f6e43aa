// tests/common/mod.rs
//! A stand-in prediction service bound to an ephemeral local port.

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::net::TcpListener;
use tokio::sync::Notify;

/// Starts a stub service with the given routes and returns its base URL.
pub fn spawn_stub<F>(routes: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(move || App::new().configure(routes.clone()))
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
    actix_rt::spawn(server);
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub async fn features_ok() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "numerical_features": ["age", "hypertension", "heart_disease", "bmi", "HbA1c_level", "blood_glucose_level"],
        "categorical_features": ["gender", "smoking_history"],
        "gender_options": ["Male", "Female"],
        "smoking_history_options": ["never", "current"]
    }))
}

pub async fn features_not_loaded() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "error": "Feature names not loaded. Please train the model first"
    }))
}

/// Answers like the real service, rejecting bodies that miss a wire key.
pub async fn predict_ok(body: web::Json<Value>) -> HttpResponse {
    let keys = [
        "gender",
        "age",
        "hypertension",
        "heart_disease",
        "smoking_history",
        "bmi",
        "HbA1c_level",
        "blood_glucose_level",
    ];
    if let Some(missing) = keys.iter().find(|k| body.get(**k).and_then(Value::as_str).is_none()) {
        return HttpResponse::BadRequest().json(json!({ "error": format!("missing {}", missing) }));
    }
    HttpResponse::Ok().json(json!({
        "prediction": 1,
        "probability": 0.87,
        "message": "Diabetes detected"
    }))
}

pub async fn predict_invalid_bmi() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": "invalid bmi" }))
}

pub async fn predict_blank_error() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": "" }))
}

pub async fn predict_out_of_range() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "prediction": 2, "probability": 0.4 }))
}

pub async fn predict_probability_above_one() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "prediction": 1, "probability": 1.5 }))
}

/// Holds the answer until the test releases the gate.
pub async fn predict_gated(gate: web::Data<Notify>) -> HttpResponse {
    gate.notified().await;
    HttpResponse::Ok().json(json!({ "prediction": 0, "probability": 0.12 }))
}

pub async fn features_garbage() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "genders": ["Male"] }))
}

pub async fn predict_empty_failure() -> HttpResponse {
    HttpResponse::BadGateway().finish()
}

pub async fn predict_garbage() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("not json")
}

/// The healthy service: both endpoints answer successfully.
pub fn healthy_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/features", web::get().to(features_ok))
        .route("/api/predict", web::post().to(predict_ok));
}
