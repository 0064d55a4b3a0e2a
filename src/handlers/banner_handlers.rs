use actix_web::{web, HttpResponse};
use serde::Serialize;
use validator::Validate;

use crate::models::{ApiError, ApiResponse, CreateBannerRequest, UpdateBannerRequest};
use crate::services::BannerService;
use crate::utils::parse_object_id;

pub async fn create_banner(
    banner_service: web::Data<BannerService>,
    body: web::Json<CreateBannerRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let banner = banner_service.create_banner(request).await?;
    Ok(banner_created(banner))
}

fn banner_created<T: Serialize>(banner: T) -> HttpResponse {
    ApiResponse::ok("Banner created successfully!", banner)
}

pub async fn update_banner(
    banner_service: web::Data<BannerService>,
    banner_id: web::Path<String>,
    body: web::Json<UpdateBannerRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&banner_id)?;
    let request = body.into_inner();
    request.validate()?;

    let banner = banner_service.update_banner(&id, request).await?;
    Ok(ApiResponse::ok("Banner updated successfully!", banner))
}

pub async fn get_all_banners(banner_service: web::Data<BannerService>) -> Result<HttpResponse, ApiError> {
    let listing = banner_service.get_all_banners().await?;
    Ok(ApiResponse::ok("Banners retrieve successfully!", listing))
}

pub async fn delete_banner(
    banner_service: web::Data<BannerService>,
    banner_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&banner_id)?;
    banner_service.delete_banner(&id).await?;
    Ok(ApiResponse::ok("Banner deleted successfully!", ()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_banner_created_is_ok() {
        let response = banner_created(serde_json::json!({ "title": "Winter Sale" }));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
