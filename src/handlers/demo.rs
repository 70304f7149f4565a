use actix_web::{web, HttpResponse, Responder};

use crate::{
    models::{LinkKind, ShortenRequest, ShortenResponse},
    services::{LinkService, LinkServiceTrait, RedirectService},
    types::Result,
};

/// Anonymous shortening, no account needed
pub async fn shorten_handler(
    dto: web::Json<ShortenRequest>,
    service: web::Data<LinkService>,
) -> Result<impl Responder> {
    let link = service.shorten(LinkKind::Demo, dto.into_inner(), None).await?;

    Ok(HttpResponse::Ok().json(ShortenResponse {
        short_url: service.short_url(&link),
    }))
}

pub async fn redirect_handler(
    code: web::Path<String>,
    service: web::Data<RedirectService>,
) -> Result<impl Responder> {
    super::redirect(LinkKind::Demo, code, service).await
}

pub async fn qr_handler(
    code: web::Path<String>,
    service: web::Data<LinkService>,
) -> Result<impl Responder> {
    super::qr_code(LinkKind::Demo, code, service).await
}
