use actix_web::web;
use crate::handlers::coupon_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/coupon")
            .route("", web::get().to(coupon_handlers::get_all_coupons))
            .route("/create-coupon", web::post().to(coupon_handlers::create_coupon))
            .route("/{id}", web::get().to(coupon_handlers::get_single_coupon))
    );
}
