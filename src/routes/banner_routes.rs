use actix_web::web;
use crate::handlers::banner_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/banner")
            .route("", web::get().to(banner_handlers::get_all_banners))
            .route("/create", web::post().to(banner_handlers::create_banner))
            .route("/update/{id}", web::post().to(banner_handlers::update_banner))
            .route("/{id}", web::delete().to(banner_handlers::delete_banner))
    );
}
