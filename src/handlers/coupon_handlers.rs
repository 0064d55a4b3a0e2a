use std::collections::HashMap;
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{ApiError, ApiResponse, CreateCouponRequest};
use crate::services::CouponService;
use crate::utils::parse_object_id;

pub async fn get_all_coupons(
    coupon_service: web::Data<CouponService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let coupons = coupon_service.get_all_coupons(&query).await?;
    Ok(ApiResponse::ok("Coupons retrieve successfully!", coupons))
}

pub async fn get_single_coupon(
    coupon_service: web::Data<CouponService>,
    coupon_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&coupon_id)?;
    let coupon = coupon_service.get_single_coupon(&id).await?;
    Ok(ApiResponse::ok("Coupon retrieve successfully!", coupon))
}

pub async fn create_coupon(
    coupon_service: web::Data<CouponService>,
    body: web::Json<CreateCouponRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let coupon = coupon_service.create_coupon(request).await?;
    Ok(ApiResponse::created("Coupon created successfully!", coupon))
}
