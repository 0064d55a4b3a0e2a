use actix_web::web;
use crate::handlers::order_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Fixed paths go first so they are not captured by `/{id}`.
    cfg.service(
        web::scope("/order")
            .route("", web::post().to(order_handlers::create_order))
            .route("", web::get().to(order_handlers::get_all_orders))
            .route("/summary", web::get().to(order_handlers::get_order_summary))
            .route("/my-orders/{user_id}", web::get().to(order_handlers::get_my_orders))
            .route(
                "/user/{user_id}/commission-summary",
                web::get().to(order_handlers::get_user_commission_summary),
            )
            .route("/{id}", web::get().to(order_handlers::get_single_order))
            .route("/{id}", web::patch().to(order_handlers::update_order))
            .route("/{id}/status", web::patch().to(order_handlers::update_order_status))
    );
}
