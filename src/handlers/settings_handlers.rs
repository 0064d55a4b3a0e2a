use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::models::{ApiError, ApiResponse, CreateSettingsRequest, UpdateSettingsRequest};
use crate::services::SettingsService;

pub async fn create_settings(
    settings_service: web::Data<SettingsService>,
    body: web::Json<CreateSettingsRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let settings = settings_service.create_settings(request).await?;
    Ok(ApiResponse::created("Settings created successfully!", settings.to_response()?))
}

pub async fn get_settings(settings_service: web::Data<SettingsService>) -> Result<HttpResponse, ApiError> {
    let settings = settings_service.get_settings().await?.map(|s| s.to_response()).transpose()?;
    Ok(ApiResponse::ok("Settings retrieve successfully!", settings))
}

pub async fn update_settings(
    settings_service: web::Data<SettingsService>,
    body: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let settings = settings_service.update_settings(request).await?;
    Ok(ApiResponse::ok("Settings updated successfully!", settings.to_response()?))
}

pub async fn get_logo(settings_service: web::Data<SettingsService>) -> Result<HttpResponse, ApiError> {
    let logo = settings_service.get_logo().await?;
    Ok(ApiResponse::ok("Logo retrieve successfully!", json!({ "logo": logo })))
}

pub async fn get_slider_images(settings_service: web::Data<SettingsService>) -> Result<HttpResponse, ApiError> {
    let images = settings_service.get_slider_images().await?;
    Ok(ApiResponse::ok("Slider images retrieve successfully!", json!({ "sliderImages": images })))
}

pub async fn get_contact_and_social(settings_service: web::Data<SettingsService>) -> Result<HttpResponse, ApiError> {
    let contact = settings_service.get_contact_and_social().await?;
    Ok(ApiResponse::ok(
        "Contact and social info retrieve successfully!",
        json!({ "contactAndSocial": contact }),
    ))
}

pub async fn get_mobile_mfs(settings_service: web::Data<SettingsService>) -> Result<HttpResponse, ApiError> {
    let mfs = settings_service.get_mobile_mfs().await?;
    Ok(ApiResponse::ok("Mobile MFS info retrieve successfully!", json!({ "mobileMfs": mfs })))
}

pub async fn get_delivery_charge(settings_service: web::Data<SettingsService>) -> Result<HttpResponse, ApiError> {
    let charge = settings_service.get_delivery_charge().await?;
    Ok(ApiResponse::ok(
        "Delivery charge retrieve successfully!",
        json!({ "deliveryCharge": charge }),
    ))
}
