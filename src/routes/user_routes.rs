use actix_web::web;
use crate::handlers::user_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("", web::get().to(user_handlers::get_all_users))
            .route("/admins", web::get().to(user_handlers::get_admins))
            .route("/vendors", web::get().to(user_handlers::get_vendors))
            .route("/super-admin/{id}", web::get().to(user_handlers::get_super_admin))
            .route("/{id}", web::get().to(user_handlers::get_single_user))
            .route("/{id}", web::patch().to(user_handlers::update_user))
            .route("/{id}/status", web::patch().to(user_handlers::update_user_status))
    );
}
