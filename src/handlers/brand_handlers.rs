use std::collections::HashMap;
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{ApiError, ApiResponse, CreateBrandRequest};
use crate::services::CatalogService;
use crate::utils::parse_object_id;

pub async fn create_brand(
    catalog_service: web::Data<CatalogService>,
    body: web::Json<CreateBrandRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let brand = catalog_service.create_brand(request).await?;
    Ok(ApiResponse::created("Brand created successfully!", brand))
}

pub async fn get_all_brands(
    catalog_service: web::Data<CatalogService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let brands = catalog_service.get_brands(&query).await?;
    Ok(ApiResponse::ok("Brands retrieve successfully!", brands))
}

pub async fn get_single_brand(
    catalog_service: web::Data<CatalogService>,
    brand_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&brand_id)?;
    let brand = catalog_service.get_brand(&id).await?;
    Ok(ApiResponse::ok("Brand retrieve successfully!", brand))
}
