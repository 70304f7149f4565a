use actix_web::{http::header::LOCATION, web, HttpRequest, HttpResponse};

pub mod auth;
pub mod demo;
pub mod url;

use crate::{
    errors::AppError,
    models::{LinkKind, QrCodeResponse},
    services::{AuthService, LinkService, LinkServiceTrait, RedirectService},
    types::Result,
    utils::token::Claims,
};

/// Identity carried by the session cookie, if any
fn session(req: &HttpRequest, auth: &AuthService) -> Option<Claims> {
    let cookie = req.cookie(auth.cookie_name());
    auth.verify(cookie.as_ref().map(|c| c.value()))
}

fn require_session(req: &HttpRequest, auth: &AuthService) -> Result<Claims> {
    session(req, auth).ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
}

async fn redirect(
    kind: LinkKind,
    code: web::Path<String>,
    service: web::Data<RedirectService>,
) -> Result<HttpResponse> {
    let link = service.resolve(kind, &code.into_inner()).await?;

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, link.original_url))
        .finish())
}

async fn qr_code(
    kind: LinkKind,
    code: web::Path<String>,
    service: web::Data<LinkService>,
) -> Result<HttpResponse> {
    let qr_code = service.qr_code(kind, &code.into_inner()).await?;
    Ok(HttpResponse::Ok().json(QrCodeResponse { qr_code }))
}
