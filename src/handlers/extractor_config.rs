use actix_web::{web, HttpRequest};

use crate::models::ApiError;

/// Body, query and path rejections use the same error envelope as the handlers.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| ApiError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| ApiError::BadRequest(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req: &HttpRequest| ApiError::BadRequest(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};

    use crate::models::UpdateOrderStatusRequest;

    async fn echo_status(body: web::Json<UpdateOrderStatusRequest>) -> HttpResponse {
        HttpResponse::Ok().body(body.status.as_str())
    }

    #[actix_web::test]
    async fn test_unknown_status_uses_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/order/{id}/status", web::patch().to(echo_status)),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri("/order/abc/status")
            .set_json(serde_json::json!({ "status": "shipped" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "BAD_REQUEST");
    }

    #[actix_web::test]
    async fn test_known_status_passes() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/order/{id}/status", web::patch().to(echo_status)),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri("/order/abc/status")
            .set_json(serde_json::json!({ "status": "paid" }))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "paid");
    }
}
