use actix_web::web;
use crate::handlers::stats_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stats")
            .route("/admin", web::get().to(stats_handlers::get_admin_stats))
            .route("/vendor/{id}", web::get().to(stats_handlers::get_vendor_stats))
    );
}
