use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::models::{
    ApiError, Commission, CreateOrderRequest, LineItem, LineItemInput, Order, OrderLine, OrderLineInput,
};
use crate::utils::commission::precompute_commission;
use crate::utils::parse_object_id;

fn optional_id(id: Option<String>) -> Result<Option<ObjectId>, ApiError> {
    id.as_deref().map(parse_object_id).transpose()
}

fn build_item(input: LineItemInput) -> Result<LineItem, ApiError> {
    Ok(LineItem {
        product: parse_object_id(&input.product)?,
        shop: optional_id(input.shop)?,
        name: input.name,
        sku: input.sku,
        price: input.price,
        sale_price: input.sale_price,
        retail_price: input.retail_price,
        whole_sale_price: input.whole_sale_price,
        wholesale_price: input.wholesale_price,
        quantity: input.quantity,
        variant: input.variant,
        subtotal: input.subtotal,
    })
}

fn build_line(input: OrderLineInput) -> Result<OrderLine, ApiError> {
    let products = input.products.into_iter().map(build_item).collect::<Result<Vec<_>, _>>()?;

    let mut line = OrderLine {
        order_by: optional_id(input.order_by)?,
        user_role: input.user_role.unwrap_or_default(),
        shop_info: optional_id(input.shop_info)?,
        vendor_id: optional_id(input.vendor_id)?,
        product_info: optional_id(input.product_info)?,
        tracking_number: String::new(),
        status: input.status.unwrap_or_default(),
        is_cancelled: input.is_cancelled,
        quantity: input.quantity,
        selected_price: input.selected_price.unwrap_or(0.0),
        total_quantity: input.total_quantity,
        products,
        total_amount: input.total_amount,
        commission: input.commission.map(|c| Commission {
            kind: c.kind,
            value: c.value,
            amount: c.amount,
            is_added_to_balance: false,
        }),
    };
    line.fold_legacy_product();

    if line.products.is_empty() {
        return Err(ApiError::BadRequest("Each order line needs at least one product!".into()));
    }
    Ok(line)
}

/// Turns a create request into an order document ready for insert.
/// Any invalid line fails the whole order.
pub fn build_order(req: CreateOrderRequest, mut next_tracking_number: impl FnMut() -> String) -> Result<Order, ApiError> {
    let mut total_quantity = 0;
    let mut lines = Vec::with_capacity(req.order_info.len());

    for input in req.order_info {
        let mut line = build_line(input)?;
        line.tracking_number = next_tracking_number();
        if line.quantity > 0 {
            total_quantity += line.quantity;
        }
        precompute_commission(&mut line);
        lines.push(line);
    }

    let now = Utc::now();
    Ok(Order {
        id: None,
        total_quantity,
        order_info: lines,
        customer_info: req.customer_info,
        payment_info: req.payment_info,
        total_amount: req.total_amount,
        order_note: req.order_note,
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommissionType, OrderStatus, UserRole};

    fn request(json: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(json).unwrap()
    }

    fn customer() -> serde_json::Value {
        serde_json::json!({ "firstName": "Karim", "phone": "01700000000", "address": "Mirpur, Dhaka" })
    }

    #[test]
    fn test_build_order_defaults() {
        let product = ObjectId::new().to_hex();
        let req = request(serde_json::json!({
            "orderInfo": [
                { "productInfo": product, "quantity": 2, "totalAmount": { "subTotal": 200, "total": 220 } },
                { "products": [{ "product": product, "quantity": 1, "price": 90 }], "quantity": 1, "userRole": "sr" }
            ],
            "customerInfo": customer(),
            "paymentInfo": "cash-on",
            "totalAmount": 310
        }));

        let mut counter = 0;
        let order = build_order(req, || {
            counter += 1;
            format!("TRK{}", counter)
        })
        .unwrap();

        assert_eq!(order.total_quantity, 3);
        assert_eq!(order.order_info[0].tracking_number, "TRK1");
        assert_eq!(order.order_info[1].tracking_number, "TRK2");
        assert_eq!(order.order_info[0].user_role, UserRole::Customer);
        assert_eq!(order.order_info[1].user_role, UserRole::SalesRep);
        assert_eq!(order.order_info[0].status, OrderStatus::Pending);
        assert_eq!(order.order_info[0].selected_price, 0.0);

        let legacy = &order.order_info[0];
        assert!(legacy.product_info.is_none());
        assert_eq!(legacy.products.len(), 1);
        assert_eq!(legacy.products[0].quantity, 2);
        assert_eq!(legacy.products[0].subtotal, 200.0);
    }

    #[test]
    fn test_commission_precomputed_from_total() {
        let req = request(serde_json::json!({
            "orderInfo": [{
                "productInfo": ObjectId::new().to_hex(),
                "quantity": 1,
                "totalAmount": { "subTotal": 1000, "total": 1100 },
                "commission": { "type": "percentage", "value": 10 }
            }, {
                "productInfo": ObjectId::new().to_hex(),
                "quantity": 1,
                "commission": { "type": "fixed", "value": 25 }
            }],
            "customerInfo": customer(),
            "paymentInfo": "cash-on"
        }));

        let order = build_order(req, || "T".to_string()).unwrap();
        let first = order.order_info[0].commission.as_ref().unwrap();
        assert_eq!(first.kind, CommissionType::Percentage);
        assert_eq!(first.amount, 110.0);
        assert!(!first.is_added_to_balance);
        // no totals on the line, so nothing is precomputed
        assert_eq!(order.order_info[1].commission.as_ref().unwrap().amount, 0.0);
    }

    #[test]
    fn test_invalid_line_fails_whole_order() {
        let req = request(serde_json::json!({
            "orderInfo": [
                { "productInfo": ObjectId::new().to_hex(), "quantity": 1 },
                { "productInfo": "not-an-id", "quantity": 1 }
            ],
            "customerInfo": customer(),
            "paymentInfo": "cash-on"
        }));
        assert!(matches!(build_order(req, || "T".to_string()), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_line_without_products_rejected() {
        let req = request(serde_json::json!({
            "orderInfo": [{ "quantity": 1 }],
            "customerInfo": customer(),
            "paymentInfo": "cash-on"
        }));
        assert!(build_order(req, || "T".to_string()).is_err());
    }
}
