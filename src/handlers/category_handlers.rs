use std::collections::HashMap;
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{ApiError, ApiResponse, CreateCategoryRequest};
use crate::services::CatalogService;
use crate::utils::parse_object_id;

pub async fn create_category(
    catalog_service: web::Data<CatalogService>,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let category = catalog_service.create_category(request).await?;
    Ok(ApiResponse::created("Category created successfully!", category))
}

pub async fn get_all_categories(
    catalog_service: web::Data<CatalogService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let categories = catalog_service.get_categories(&query).await?;
    Ok(ApiResponse::ok("Categories retrieve successfully!", categories))
}

pub async fn get_single_category(
    catalog_service: web::Data<CatalogService>,
    category_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&category_id)?;
    let category = catalog_service.get_category(&id).await?;
    Ok(ApiResponse::ok("Category retrieve successfully!", category))
}
