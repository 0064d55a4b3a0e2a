mod mongodb;
pub mod auth_service;
mod banner_service;
mod catalog_service;
mod coupon_service;
mod order_service;
mod settings_service;
mod stats_service;
mod user_service;

pub use mongodb::MongoDBService;
pub use auth_service::AuthService;
pub use banner_service::BannerService;
pub use catalog_service::CatalogService;
pub use coupon_service::CouponService;
pub use order_service::OrderService;
pub use settings_service::SettingsService;
pub use stats_service::StatsService;
pub use user_service::UserService;
