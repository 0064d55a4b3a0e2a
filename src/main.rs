use std::sync::Arc;
use actix_web::{App, HttpServer, web, HttpResponse};
use actix_cors::Cors;
use log::{info, error};
use dotenv::dotenv;
mod models;
mod handlers;
mod routes;
mod services;
mod utils;
mod config;
use config::AppConfig;
use handlers::extractor_config::{json_config, path_config, query_config};
use services::{
    AuthService, BannerService, CatalogService, CouponService, MongoDBService, OrderService, SettingsService,
    StatsService, UserService,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = AppConfig::load()?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_level.clone()));

    let mongodb = Arc::new(MongoDBService::init(&config).await.map_err(|e| {
        error!("Failed to initialize MongoDB: {}", e);
        e
    })?);

    let auth_service = web::Data::new(AuthService::new(mongodb.clone(), &config));
    if let Some(seed) = &config.super_admin {
        auth_service.ensure_super_admin(&seed.email, &seed.password).await?;
    }

    let user_service = web::Data::new(UserService::new(mongodb.clone(), config.bcrypt_salt_rounds));
    let catalog_service = web::Data::new(CatalogService::new(mongodb.clone()));
    let order_service = web::Data::new(OrderService::new(mongodb.clone()));
    let stats_service = web::Data::new(StatsService::new(mongodb.clone()));
    let settings_service = web::Data::new(SettingsService::new(mongodb.clone()));
    let banner_service = web::Data::new(BannerService::new(mongodb.clone()));
    let coupon_service = web::Data::new(CouponService::new(mongodb));

    let host = config.host.clone();
    let port = config.port;
    let config_data = web::Data::new(config);

    info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_headers(vec!["content-type", "content-length", "accept"])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(config_data.clone())
            .app_data(auth_service.clone())
            .app_data(user_service.clone())
            .app_data(catalog_service.clone())
            .app_data(order_service.clone())
            .app_data(stats_service.clone())
            .app_data(settings_service.clone())
            .app_data(banner_service.clone())
            .app_data(coupon_service.clone())
            .configure(routes::configure)
            .route("/health", web::get().to(|| async {
                info!("Health check");
                HttpResponse::Ok().body("OK")
            }))
    })
    .bind(format!("{host}:{port}"))?
    .run()
    .await?;

    info!("Server shutting down");
    Ok(())
}
