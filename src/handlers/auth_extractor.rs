use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};

use crate::config::AppConfig;
use crate::models::{ApiError, Claims};
use crate::services::auth_service::decode_token;

/// Pulls the access-token claims out of `Authorization: Bearer <token>`.
impl FromRequest for Claims {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<Claims, ApiError> {
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| ApiError::InternalError("Auth configuration is not registered".to_string()))?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("You are not authorized!".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid token format".to_string()))?;

    decode_token(&config.jwt_secret, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use mongodb::bson::oid::ObjectId;

    use crate::models::{User, UserRole};
    use crate::services::auth_service::issue_token;

    fn config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            log_level: "info".into(),
            mongodb_uri: "mongodb://localhost".into(),
            database_name: "test".into(),
            jwt_secret: "test-secret".into(),
            jwt_expires_in_hours: 1,
            bcrypt_salt_rounds: 4,
            super_admin: None,
        }
    }

    #[actix_web::test]
    async fn test_valid_bearer_token() {
        let mut user = User::new("Admin".into(), "admin@shop.com".into(), None, UserRole::Admin, None);
        user.id = Some(ObjectId::new());
        let token = issue_token("test-secret", 1, &user).unwrap();

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .app_data(web::Data::new(config()))
            .to_http_request();

        let claims = Claims::extract(&req).await.unwrap();
        assert_eq!(claims.email, "admin@shop.com");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[actix_web::test]
    async fn test_missing_header() {
        let req = TestRequest::default().app_data(web::Data::new(config())).to_http_request();
        assert!(matches!(Claims::extract(&req).await, Err(ApiError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn test_wrong_scheme() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .app_data(web::Data::new(config()))
            .to_http_request();
        assert!(matches!(Claims::extract(&req).await, Err(ApiError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn test_garbage_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .app_data(web::Data::new(config()))
            .to_http_request();
        assert!(matches!(Claims::extract(&req).await, Err(ApiError::Unauthorized(_))));
    }
}
