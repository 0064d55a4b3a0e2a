use actix_web::{middleware::Logger, web};

mod auth_routes;
mod banner_routes;
mod coupon_routes;
mod order_routes;
mod product_routes;
mod settings_routes;
mod stats_routes;
mod user_routes;

pub use auth_routes::configure as configure_auth_routes;
pub use banner_routes::configure as configure_banner_routes;
pub use coupon_routes::configure as configure_coupon_routes;
pub use order_routes::configure as configure_order_routes;
pub use product_routes::configure as configure_product_routes;
pub use settings_routes::configure as configure_settings_routes;
pub use stats_routes::configure as configure_stats_routes;
pub use user_routes::configure as configure_user_routes;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(Logger::default())
            .configure(configure_auth_routes)
            .configure(configure_user_routes)
            .configure(configure_product_routes)
            .configure(configure_order_routes)
            .configure(configure_stats_routes)
            .configure(configure_settings_routes)
            .configure(configure_banner_routes)
            .configure(configure_coupon_routes),
    );
}
