use actix_web::web;
use crate::handlers::auth_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/login/provider", web::post().to(auth_handlers::login_with_provider))
            .route("/logout/{id}", web::post().to(auth_handlers::logout))
            .route("/me", web::get().to(auth_handlers::me))
    );
}
