use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::{models::Credentials, services::AuthService, types::Result};

/// Register route handler
pub async fn register_handler(
    credentials: web::Json<Credentials>,
    service: web::Data<AuthService>,
) -> Result<impl Responder> {
    let token = service.register(credentials.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .cookie(service.session_cookie(token))
        .json(json!({ "message": "registered!" })))
}

/// Login route handler
pub async fn login_handler(
    credentials: web::Json<Credentials>,
    service: web::Data<AuthService>,
) -> Result<impl Responder> {
    let token = service.login(credentials.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .cookie(service.session_cookie(token))
        .json(json!({ "message": "logged in!" })))
}

/// Never fails: anything wrong with the session reads as logged out
pub async fn is_authenticated_handler(
    req: HttpRequest,
    service: web::Data<AuthService>,
) -> impl Responder {
    let cookie = req.cookie(service.cookie_name());
    let status = service.status(cookie.as_ref().map(|c| c.value())).await;
    HttpResponse::Ok().json(status)
}

pub async fn logout_handler(service: web::Data<AuthService>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(service.removal_cookie())
        .json(json!({ "message": "Logged out successfully" }))
}
