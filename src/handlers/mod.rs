mod auth_extractor;
pub mod extractor_config;
pub mod auth_handlers;
pub mod banner_handlers;
pub mod brand_handlers;
pub mod category_handlers;
pub mod coupon_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod settings_handlers;
pub mod stats_handlers;
pub mod user_handlers;
