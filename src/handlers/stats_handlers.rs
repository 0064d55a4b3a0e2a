use actix_web::{web, HttpResponse};

use crate::models::{ApiError, ApiResponse};
use crate::services::StatsService;
use crate::utils::parse_object_id;

/// Window covered by the dashboard series.
const STATS_WINDOW_DAYS: i64 = 7;

pub async fn get_admin_stats(stats_service: web::Data<StatsService>) -> Result<HttpResponse, ApiError> {
    let stats = stats_service.get_admin_stats(STATS_WINDOW_DAYS).await?;
    Ok(ApiResponse::ok("Admin stats retrieve successfully!", stats))
}

pub async fn get_vendor_stats(
    stats_service: web::Data<StatsService>,
    vendor_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&vendor_id)?;
    let stats = stats_service.get_vendor_stats(STATS_WINDOW_DAYS, &id).await?;
    Ok(ApiResponse::ok("Vendor stats retrieve successfully!", stats))
}
