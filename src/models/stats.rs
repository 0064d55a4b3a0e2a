use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

use crate::models::{CustomerInfo, Order, OrderLine};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesAndCost {
    pub date: String,
    pub day: String,
    pub total_sales: f64,
    pub total_cost: f64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SalesAndCostStats {
    pub days: i64,
    pub total_sales_sum: f64,
    pub total_cost_sum: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sales: Option<f64>,
    pub stats: Vec<DailySalesAndCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_current_above_max: Option<bool>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    pub percent_change: Option<f64>,
    pub trend: Trend,
    pub compared_to: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TotalOrdersStats {
    pub total_orders: i64,
    pub percent_change: f64,
    pub compared_to: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfitStats {
    pub total_sales: f64,
    pub percent_change: Option<f64>,
    pub trend: Trend,
    pub compared_to: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VendorCountStats {
    pub total_vendors: i64,
    pub compared_to: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ShopCountStats {
    pub total_shops: i64,
    pub compared_to: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusCount {
    pub status: String,
    pub total_orders: i64,
    pub compared_to: String,
}

/// Best-seller row. Admin rows rank by revenue (`totalSales`), vendor rows by
/// units (`totalSold` and `totalRevenue`).
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingProduct {
    pub product: String,
    pub product_name: String,
    pub category: Option<String>,
    pub stock: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrendingProduct {
    #[serde(rename = "_id")]
    pub id: String,
    pub total_sold: i64,
    pub total_revenue: f64,
    pub name: String,
    pub featured_img: String,
    pub price: f64,
    pub sale_price: f64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrendingProducts {
    pub compared_to: String,
    pub trending_products: Vec<TrendingProduct>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourlyCount {
    pub hour_label: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TodayOrdersStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    pub today_count: i64,
    pub percent_change: f64,
    pub today_hourly_data: Vec<HourlyCount>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    pub month: u32,
    pub month_name: String,
    pub year: i32,
    pub total_sales: f64,
    pub order_count: i64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VendorMonthlySales {
    pub vendor_id: Option<String>,
    pub monthly_sales: Vec<MonthlySales>,
}

/// One unwound order line, as returned by the vendor recent-orders feed.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrderLine {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    pub customer_info: CustomerInfo,
    pub order_info: OrderLine,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminStats {
    pub sales_and_cost_stats: SalesAndCostStats,
    pub user_stats: UserStats,
    pub total_orders_stats: TotalOrdersStats,
    pub profit_stats: ProfitStats,
    pub total_vendors_stats: VendorCountStats,
    pub total_shops_stats: ShopCountStats,
    pub trending_products_stats: TrendingProducts,
    pub pending_order: OrderStatusCount,
    pub processing_order: OrderStatusCount,
    pub completed_order: OrderStatusCount,
    pub cancelled_order: OrderStatusCount,
    pub top_selling_products_stats: Vec<TopSellingProduct>,
    pub today_orders_stats: TodayOrdersStats,
    pub recent_orders: Vec<Order>,
    pub monthly_sales_history: Vec<MonthlySales>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VendorStats {
    pub sales_and_cost_stats: SalesAndCostStats,
    pub total_orders_stats: TotalOrdersStats,
    pub profit_stats: ProfitStats,
    pub total_shops_stats: ShopCountStats,
    pub pending_order: OrderStatusCount,
    pub processing_order: OrderStatusCount,
    pub completed_order: OrderStatusCount,
    pub cancelled_order: OrderStatusCount,
    pub top_selling_products_stats: Vec<TopSellingProduct>,
    pub trending_products_stats: TrendingProducts,
    pub today_orders_stats: TodayOrdersStats,
    pub recent_orders: Vec<RecentOrderLine>,
    pub monthly_sales_history: VendorMonthlySales,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_keys_are_pascal_case() {
        let count = OrderStatusCount { status: "pending".into(), total_orders: 2, compared_to: "Last 7 days".into() };
        let json = serde_json::to_value(&count).unwrap();
        assert_eq!(json["totalOrders"], 2);
        assert_eq!(json["comparedTo"], "Last 7 days");
        assert_eq!(serde_json::to_string(&Trend::Neutral).unwrap(), "\"neutral\"");
    }

    #[test]
    fn test_null_percent_change_serializes_as_null() {
        let stats = UserStats { total_users: 4, percent_change: None, trend: Trend::Neutral, compared_to: "Last 7 days".into() };
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["percentChange"].is_null());
    }
}
