use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Envelope shared by every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }

    pub fn ok(message: impl Into<String>, data: T) -> HttpResponse {
        Self::new(message, data).respond(StatusCode::OK)
    }

    pub fn created(message: impl Into<String>, data: T) -> HttpResponse {
        Self::new(message, data).respond(StatusCode::CREATED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let envelope = ApiResponse::new("Order created successfully!", serde_json::json!({ "totalQuantity": 3 }));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Order created successfully!");
        assert_eq!(json["data"]["totalQuantity"], 3);
    }
}
