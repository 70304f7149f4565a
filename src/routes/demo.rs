use actix_web::web;

use crate::handlers::demo::{qr_handler, redirect_handler, shorten_handler};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/demo")
            .route("/shorten", web::post().to(shorten_handler))
            .route("/qr/{code}", web::get().to(qr_handler))
            .route("/{code}", web::get().to(redirect_handler)),
    );
}
