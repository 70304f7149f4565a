use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest, HttpResponse, Responder,
};

mod auth;
mod demo;
mod url;

use crate::errors::AppError;
use crate::types::{AppState, HealthStatus, ResponsePayload};

// Handler function for the root route "/"
async fn index() -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: String::from("Welcome and have a great time!"),
    };

    // Return the struct as JSON
    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    // Calculate uptime in seconds
    let uptime = data.start_time.elapsed().as_secs();

    let (storage, db_health) = match &data.db {
        Some(db) => ("postgres", Some(db.health_check().await)),
        None => ("memory", None),
    };

    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        storage: storage.to_string(),
        db_health,
        uptime_seconds: uptime,
    };

    // Return the status as JSON
    HttpResponse::Ok().json(status)
}

// Malformed bodies answer with the same error shape as everything else
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid request body: {}", err)).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid path parameter: {}", err)).into()
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));

    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));

    cfg.service(
        web::scope("/api")
            .configure(auth::configure_routes)
            .configure(url::configure_routes)
            .configure(demo::configure_routes),
    );
}
