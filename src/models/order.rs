use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::models::UserRole;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "at-local-facility")]
    AtLocalFacility,
    #[serde(rename = "delivered")]
    Delivered,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "paid")]
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::AtLocalFacility => "at-local-facility",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
    Percentage,
    Fixed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    #[serde(rename = "type")]
    pub kind: CommissionType,
    /// 10 means 10% for percentage commissions, 10 currency units for fixed ones.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub is_added_to_balance: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShippingType {
    Free,
    Percentage,
    Amount,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Shipping {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ShippingType,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Shipping>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[validate(length(min = 1, message = "First name is required!"))]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Phone is required!"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required!"))]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "cash-on")]
    CashOn,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_on_card: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum PaymentInfo {
    Method(PaymentMethod),
    Card(CardDetails),
}

/// One product inside a line. Every line keeps its products in this list,
/// including lines that were submitted with the single `productInfo` field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Zero means "use the product's own price".
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whole_sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wholesale_price: Option<f64>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default)]
    pub subtotal: f64,
}

/// One vendor/shop scoped sub-order.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<ObjectId>,
    #[serde(default)]
    pub user_role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_info: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<ObjectId>,
    /// Single-product reference found on older documents. Folded into
    /// `products` on read and never written back.
    #[serde(default, skip_serializing)]
    pub product_info: Option<ObjectId>,
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub selected_price: f64,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub products: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<LineTotals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<Commission>,
}

impl OrderLine {
    /// `totalQuantity` when positive, otherwise `quantity`.
    pub fn effective_quantity(&self) -> i64 {
        if self.total_quantity > 0 {
            self.total_quantity
        } else {
            self.quantity
        }
    }

    pub fn sub_total(&self) -> f64 {
        self.total_amount.as_ref().map(|t| t.sub_total).unwrap_or(0.0)
    }

    /// Moves a legacy single-product reference into the item list.
    pub fn fold_legacy_product(&mut self) {
        let Some(product) = self.product_info.take() else {
            return;
        };
        if !self.products.is_empty() {
            return;
        }
        self.products.push(LineItem {
            product,
            shop: self.shop_info,
            name: None,
            sku: None,
            price: 0.0,
            sale_price: None,
            retail_price: None,
            whole_sale_price: None,
            wholesale_price: None,
            quantity: self.effective_quantity(),
            variant: None,
            subtotal: self.sub_total(),
        });
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub order_info: Vec<OrderLine>,
    pub customer_info: CustomerInfo,
    pub payment_info: PaymentInfo,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_note: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn fold_legacy_products(mut self) -> Self {
        for line in &mut self.order_info {
            line.fold_legacy_product();
        }
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product: String,
    pub shop: Option<String>,
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(default)]
    pub price: f64,
    pub sale_price: Option<f64>,
    pub retail_price: Option<f64>,
    pub whole_sale_price: Option<f64>,
    pub wholesale_price: Option<f64>,
    #[validate(range(min = 1, message = "Product quantity must be at least 1!"))]
    pub quantity: i64,
    pub variant: Option<String>,
    #[serde(default)]
    pub subtotal: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommissionInput {
    #[serde(rename = "type")]
    pub kind: CommissionType,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub order_by: Option<String>,
    pub user_role: Option<UserRole>,
    pub shop_info: Option<String>,
    pub vendor_id: Option<String>,
    pub product_info: Option<String>,
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub quantity: i64,
    pub selected_price: Option<f64>,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    #[validate]
    pub products: Vec<LineItemInput>,
    pub total_amount: Option<LineTotals>,
    pub commission: Option<CommissionInput>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "An order needs at least one order line!"))]
    #[validate]
    pub order_info: Vec<OrderLineInput>,
    #[validate]
    pub customer_info: CustomerInfo,
    pub payment_info: PaymentInfo,
    #[serde(default)]
    pub total_amount: f64,
    pub order_note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[validate]
    pub customer_info: Option<CustomerInfo>,
    pub payment_info: Option<PaymentInfo>,
    pub total_amount: Option<f64>,
    pub order_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub paid_orders: i64,
    pub customer_orders: i64,
    pub sr_orders: i64,
    pub total_order_sale_amount: f64,
    pub total_pending_sale: f64,
    pub total_paid_order_sale_amount: f64,
}

#[derive(Debug, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    pub total_orders: i64,
    pub completed_orders: i64,
    pub pending_orders: i64,
    pub total_quantity: i64,
    pub total_commission: f64,
    pub total_percentage_commission_amount: f64,
    pub total_fixed_commission_amount: f64,
    pub average_percentage_rate: f64,
    pub total_sale_amount: f64,
    pub total_retail_amount: f64,
    pub total_wholesale_amount: f64,
}
