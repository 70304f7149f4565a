use actix_web::web;

use crate::handlers::auth::{
    is_authenticated_handler, login_handler, logout_handler, register_handler,
};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register_handler))
            .route("/login", web::post().to(login_handler))
            .route("/isAuthenticated", web::get().to(is_authenticated_handler))
            .route("/logout", web::post().to(logout_handler)),
    );
}
