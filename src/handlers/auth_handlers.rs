use actix_web::{web, HttpResponse};
use log::info;
use validator::Validate;

use crate::models::{ApiError, ApiResponse, Claims, LoginRequest, ProviderLoginRequest, RegisterRequest};
use crate::services::AuthService;
use crate::utils::parse_object_id;

pub async fn register(
    auth_service: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;
    info!("Registering {}", request.email);

    let user = auth_service.register(request).await?;
    Ok(ApiResponse::created("User registered successfully!", user))
}

pub async fn login(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let response = auth_service.login(request).await?;
    Ok(ApiResponse::ok("User logged in successfully!", response))
}

pub async fn login_with_provider(
    auth_service: web::Data<AuthService>,
    body: web::Json<ProviderLoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;
    info!("Provider login for {}", request.email);

    let response = auth_service.login_with_provider(request).await?;
    Ok(ApiResponse::ok("User logged in successfully!", response))
}

pub async fn logout(
    auth_service: web::Data<AuthService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&user_id)?;
    auth_service.logout(&id).await?;
    Ok(ApiResponse::ok("User logged out successfully!", ()))
}

pub async fn me(auth_service: web::Data<AuthService>, claims: Claims) -> Result<HttpResponse, ApiError> {
    let user = auth_service.me(&claims).await?;
    Ok(ApiResponse::ok("User data retrieve successfully!", user))
}
