use actix_web::web;
use crate::handlers::{brand_handlers, category_handlers, product_handlers};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/product")
            .route("", web::post().to(product_handlers::create_product))
            .route("", web::get().to(product_handlers::get_all_products))
            .route("/{id}", web::get().to(product_handlers::get_single_product))
            .route("/{id}", web::patch().to(product_handlers::update_product))
            .route("/{id}", web::delete().to(product_handlers::delete_product))
    )
    .service(
        web::scope("/category")
            .route("", web::post().to(category_handlers::create_category))
            .route("", web::get().to(category_handlers::get_all_categories))
            .route("/{id}", web::get().to(category_handlers::get_single_category))
    )
    .service(
        web::scope("/brand")
            .route("", web::post().to(brand_handlers::create_brand))
            .route("", web::get().to(brand_handlers::get_all_brands))
            .route("/{id}", web::get().to(brand_handlers::get_single_brand))
    );
}
