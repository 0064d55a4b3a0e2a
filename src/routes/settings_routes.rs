use actix_web::web;
use crate::handlers::settings_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("", web::post().to(settings_handlers::create_settings))
            .route("", web::get().to(settings_handlers::get_settings))
            .route("", web::patch().to(settings_handlers::update_settings))
            .route("/logo", web::get().to(settings_handlers::get_logo))
            .route("/slider-images", web::get().to(settings_handlers::get_slider_images))
            .route("/contact-and-social", web::get().to(settings_handlers::get_contact_and_social))
            .route("/mobile-mfs", web::get().to(settings_handlers::get_mobile_mfs))
            .route("/delivery-charge", web::get().to(settings_handlers::get_delivery_charge))
    );
}
