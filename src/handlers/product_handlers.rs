use std::collections::HashMap;
use actix_web::{web, HttpResponse};
use log::info;
use validator::Validate;

use crate::models::{ApiError, ApiResponse, CreateProductRequest, UpdateProductRequest};
use crate::services::CatalogService;
use crate::utils::parse_object_id;

pub async fn create_product(
    catalog_service: web::Data<CatalogService>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;
    info!("Creating product {}", request.description.name);

    let product = catalog_service.create_product(request).await?;
    Ok(ApiResponse::created("Product created successfully!", product))
}

pub async fn get_all_products(
    catalog_service: web::Data<CatalogService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let products = catalog_service.get_products(&query).await?;
    Ok(ApiResponse::ok("Products retrieve successfully!", products))
}

pub async fn get_single_product(
    catalog_service: web::Data<CatalogService>,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&product_id)?;
    let product = catalog_service.get_product(&id).await?;
    Ok(ApiResponse::ok("Product retrieve successfully!", product))
}

pub async fn update_product(
    catalog_service: web::Data<CatalogService>,
    product_id: web::Path<String>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&product_id)?;
    let product = catalog_service.update_product(&id, body.into_inner()).await?;
    Ok(ApiResponse::ok("Product updated successfully!", product))
}

pub async fn delete_product(
    catalog_service: web::Data<CatalogService>,
    product_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&product_id)?;
    catalog_service.delete_product(&id).await?;
    Ok(ApiResponse::ok("Product deleted successfully!", ()))
}
