use std::collections::HashMap;
use actix_web::{web, HttpResponse};
use log::info;
use validator::Validate;

use crate::models::{ApiError, ApiResponse, UpdateUserRequest, UpdateUserStatusRequest};
use crate::services::UserService;
use crate::utils::parse_object_id;

pub async fn get_all_users(user_service: web::Data<UserService>) -> Result<HttpResponse, ApiError> {
    let users = user_service.get_all_users().await?;
    Ok(ApiResponse::ok("All user data retrieve successfully!", users))
}

pub async fn get_single_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&user_id)?;
    let user = user_service.get_user(&id).await?;
    Ok(ApiResponse::ok("User data retrieve successfully!", user))
}

pub async fn get_admins(user_service: web::Data<UserService>) -> Result<HttpResponse, ApiError> {
    let admins = user_service.get_admins().await?;
    Ok(ApiResponse::ok("All admin data retrieve successfully!", admins))
}

pub async fn get_super_admin(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&user_id)?;
    let admin = user_service.get_super_admin(&id).await?;
    Ok(ApiResponse::ok("Super admin data retrieve successfully!", admin))
}

pub async fn get_vendors(
    user_service: web::Data<UserService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let vendors = user_service.get_vendors(&query).await?;
    Ok(ApiResponse::ok("All vendor data retrieve successfully!", vendors))
}

pub async fn update_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&user_id)?;
    let request = body.into_inner();
    request.validate()?;

    let user = user_service.update_user(&id, request).await?;
    Ok(ApiResponse::ok("User updated successfully!", user))
}

pub async fn update_user_status(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
    body: web::Json<UpdateUserStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&user_id)?;
    info!("Setting status of user {} to {}", id, body.status.as_str());

    let user = user_service.update_status(&id, body.status).await?;
    Ok(ApiResponse::ok("User status updated successfully!", user))
}
