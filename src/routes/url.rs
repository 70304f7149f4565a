use actix_web::web;

use crate::handlers::url::{
    delete_handler, details_handler, qr_handler, redirect_handler, shorten_handler,
    user_data_handler,
};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/url")
            .route("/userData", web::get().to(user_data_handler))
            .route("/shorten", web::post().to(shorten_handler))
            .route("/details/{id}", web::get().to(details_handler))
            .route("/qr/{code}", web::get().to(qr_handler))
            .route("/delete/{id}", web::delete().to(delete_handler))
            // Catch-all, keep last
            .route("/{code}", web::get().to(redirect_handler)),
    );
}
