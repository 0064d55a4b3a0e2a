use std::collections::HashMap;
use actix_web::{web, HttpResponse};
use log::info;
use validator::Validate;

use serde::Serialize;

use crate::models::{ApiError, ApiResponse, CreateOrderRequest, UpdateOrderRequest, UpdateOrderStatusRequest};
use crate::services::OrderService;
use crate::utils::parse_object_id;

pub async fn create_order(
    order_service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    request.validate()?;

    let order = order_service.create_order(request).await?;
    Ok(order_placed(order))
}

/// Placing an order answers 200, not 201.
fn order_placed<T: Serialize>(order: T) -> HttpResponse {
    ApiResponse::ok("Order placed successfully!", order)
}

pub async fn get_all_orders(
    order_service: web::Data<OrderService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let orders = order_service.get_all_orders(&query).await?;
    Ok(ApiResponse::ok("Orders retrieve successfully!", orders))
}

pub async fn get_my_orders(
    order_service: web::Data<OrderService>,
    user_id: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&user_id)?;
    let orders = order_service.get_my_orders(&id, &query).await?;
    Ok(ApiResponse::ok("My orders retrieve successfully!", orders))
}

pub async fn get_single_order(
    order_service: web::Data<OrderService>,
    order_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&order_id)?;
    let order = order_service.get_single_order(&id).await?;
    Ok(ApiResponse::ok("Order retrieve successfully!", order))
}

pub async fn update_order(
    order_service: web::Data<OrderService>,
    order_id: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&order_id)?;
    let request = body.into_inner();
    request.validate()?;

    let order = order_service.update_order(&id, request).await?;
    Ok(ApiResponse::ok("Order updated successfully!", order))
}

pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    order_id: web::Path<String>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&order_id)?;
    info!("Moving order {} to {}", id, body.status);

    let order = order_service.update_order_status(&id, body.status).await?;
    Ok(ApiResponse::ok("Order status updated successfully!", order))
}

pub async fn get_order_summary(order_service: web::Data<OrderService>) -> Result<HttpResponse, ApiError> {
    let summary = order_service.get_order_summary().await?;
    Ok(ApiResponse::ok("Order summary retrieve successfully!", summary))
}

pub async fn get_user_commission_summary(
    order_service: web::Data<OrderService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&user_id)?;
    let summary = order_service.get_user_commission_summary(&id).await?;
    Ok(ApiResponse::ok("Commission summary retrieve successfully!", summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_order_placed_is_ok() {
        let response = order_placed(serde_json::json!({ "totalQuantity": 2 }));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
