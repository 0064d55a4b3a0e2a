use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::FindOptions;

use crate::models::{
    AdminStats, ApiError, HourlyCount, MonthlySales, Order, OrderStatus, OrderStatusCount, ProfitStats,
    RecentOrderLine, SalesAndCostStats, ShopCountStats, TodayOrdersStats, TopSellingProduct, TotalOrdersStats,
    TrendingProduct, TrendingProducts, UserRole, UserStats, VendorCountStats, VendorMonthlySales, VendorStats,
};
use crate::services::MongoDBService;
use crate::utils::aggregate::{canonical_items_stage, count, number};
use crate::utils::stats_window::{
    best_window_sum, compare_periods, compared_to, daily_series, hour_label, local_day_bounds, month_name,
    percent_change, round_to, series_start, trend, NoBaseline, Period, LOCAL_OFFSET,
};

const TOP_SELLING_DAYS: i64 = 365;
const RANKING_LIMIT: i64 = 5;
const RECENT_LIMIT: i64 = 5;

// Pipelines below take `vendor: Option<&ObjectId>`. `None` is the admin
// view and works on whole orders; `Some` unwinds to the vendor's lines.

fn created_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Document {
    doc! {
        "createdAt": {
            "$gte": bson::DateTime::from_chrono(start),
            "$lte": bson::DateTime::from_chrono(end),
        }
    }
}

fn not_cancelled(vendor: Option<&ObjectId>) -> Document {
    let mut filter = doc! { "orderInfo.isCancelled": { "$ne": true } };
    if let Some(vendor) = vendor {
        filter.insert("orderInfo.vendorId", *vendor);
    }
    filter
}

/// Unwinds to one row per line item, legacy lines included.
fn line_item_stages(line_match: Document) -> Vec<Document> {
    vec![
        doc! { "$unwind": "$orderInfo" },
        doc! { "$match": line_match },
        canonical_items_stage(),
        doc! { "$unwind": "$orderInfo.products" },
    ]
}

/// Item subtotal, or price times quantity when no subtotal was recorded.
fn item_revenue() -> Document {
    doc! {
        "$cond": [
            { "$gt": [{ "$ifNull": ["$orderInfo.products.subtotal", 0] }, 0] },
            "$orderInfo.products.subtotal",
            {
                "$multiply": [
                    { "$ifNull": ["$orderInfo.products.price", 0] },
                    { "$ifNull": ["$orderInfo.products.quantity", 0] },
                ]
            },
        ]
    }
}

fn daily_sales_pipeline(window: Option<(DateTime<Utc>, DateTime<Utc>)>, vendor: Option<&ObjectId>) -> Vec<Document> {
    let mut line_match = Document::new();
    if let Some((start, end)) = window {
        line_match.extend(created_between(start, end));
    }
    if let Some(vendor) = vendor {
        line_match.insert("orderInfo.vendorId", *vendor);
    }

    let mut pipeline = line_item_stages(line_match);
    pipeline.extend([
        doc! {
            "$lookup": {
                "from": "products",
                "localField": "orderInfo.products.product",
                "foreignField": "_id",
                "as": "productData",
            }
        },
        doc! { "$unwind": "$productData" },
        doc! {
            "$group": {
                "_id": { "$dateToString": { "format": "%Y-%m-%d", "date": "$createdAt" } },
                "totalSales": {
                    "$sum": {
                        "$multiply": [
                            { "$ifNull": ["$productData.productInfo.salePrice", 0] },
                            "$orderInfo.products.quantity",
                        ]
                    }
                },
                "totalCost": {
                    "$sum": {
                        "$multiply": [
                            { "$ifNull": ["$productData.productInfo.price", 0] },
                            "$orderInfo.products.quantity",
                        ]
                    }
                },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]);
    pipeline
}

fn sales_and_cost_from(now: DateTime<Utc>, days: i64, rows: &[Document]) -> SalesAndCostStats {
    let found: HashMap<String, (f64, f64)> = rows
        .iter()
        .filter_map(|d| {
            let date = d.get_str("_id").ok()?;
            Some((date.to_string(), (number(d, "totalSales"), number(d, "totalCost"))))
        })
        .collect();

    let stats = daily_series(now, days, &found);
    SalesAndCostStats {
        days,
        total_sales_sum: stats.iter().map(|d| d.total_sales).sum(),
        total_cost_sum: stats.iter().map(|d| d.total_cost).sum(),
        max_sales: None,
        stats,
        is_current_above_max: None,
    }
}

/// Counts or sums in the current and the previous window with one `$facet`.
fn period_facet(
    current: &Period,
    previous: &Period,
    vendor: Option<&ObjectId>,
    line_level: bool,
    accumulators: &Document,
) -> Vec<Document> {
    let branch = |period: &Period| {
        let mut filter = created_between(period.start, period.end);
        if let Some(vendor) = vendor {
            filter.insert("orderInfo.vendorId", *vendor);
        }
        let mut group = doc! { "_id": Bson::Null };
        group.extend(accumulators.clone());
        vec![doc! { "$match": filter }, doc! { "$group": group }]
    };

    let mut pipeline = Vec::new();
    if line_level {
        pipeline.push(doc! { "$unwind": "$orderInfo" });
    }
    pipeline.push(doc! {
        "$facet": {
            "currentPeriod": branch(current),
            "previousPeriod": branch(previous),
        }
    });
    pipeline
}

fn facet_number(rows: &[Document], branch: &str, key: &str) -> f64 {
    rows.first()
        .and_then(|d| d.get_array(branch).ok())
        .and_then(|results| results.first())
        .and_then(Bson::as_document)
        .map(|d| number(d, key))
        .unwrap_or(0.0)
}

fn status_count_pipeline(start: DateTime<Utc>, end: DateTime<Utc>, status: OrderStatus, vendor: Option<&ObjectId>) -> Vec<Document> {
    let mut filter = created_between(start, end);
    filter.insert("orderInfo.status", status.as_str());
    if let Some(vendor) = vendor {
        filter.insert("orderInfo.vendorId", *vendor);
    }
    vec![
        doc! { "$unwind": "$orderInfo" },
        doc! { "$match": filter },
        doc! { "$group": { "_id": Bson::Null, "totalOrders": { "$sum": 1 } } },
    ]
}

/// Groups line items per product, ranks by `sort_key` and joins the product.
fn product_ranking_pipeline(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    vendor: Option<&ObjectId>,
    sort_key: &str,
) -> Vec<Document> {
    let mut sort = Document::new();
    sort.insert(sort_key, -1);
    sort.insert("_id", 1);

    let mut pipeline = vec![doc! { "$match": created_between(start, end) }];
    pipeline.extend(line_item_stages(not_cancelled(vendor)));
    pipeline.extend([
        doc! {
            "$group": {
                "_id": "$orderInfo.products.product",
                "totalSold": { "$sum": { "$ifNull": ["$orderInfo.products.quantity", 0] } },
                "totalRevenue": { "$sum": item_revenue() },
            }
        },
        doc! { "$sort": sort },
        doc! { "$limit": RANKING_LIMIT },
        doc! {
            "$lookup": {
                "from": "products",
                "localField": "_id",
                "foreignField": "_id",
                "as": "productDetails",
            }
        },
        doc! { "$unwind": "$productDetails" },
    ]);
    pipeline
}

fn top_selling_pipeline(start: DateTime<Utc>, end: DateTime<Utc>, vendor: Option<&ObjectId>) -> Vec<Document> {
    let sort_key = if vendor.is_some() { "totalSold" } else { "totalRevenue" };
    let mut pipeline = product_ranking_pipeline(start, end, vendor, sort_key);
    pipeline.extend([
        doc! {
            "$lookup": {
                "from": "categories",
                "localField": "productDetails.brandAndCategories.categories",
                "foreignField": "_id",
                "as": "categoryDetails",
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "product": "$productDetails.featuredImg",
                "productName": "$productDetails.description.name",
                "category": { "$arrayElemAt": ["$categoryDetails.name", 0] },
                "stock": {
                    "$cond": {
                        "if": { "$gt": ["$productDetails.productInfo.quantity", 0] },
                        "then": "Available",
                        "else": "Sold Out",
                    }
                },
                "totalSold": 1,
                "totalRevenue": 1,
            }
        },
    ]);
    pipeline
}

fn top_selling_from(d: &Document, by_units: bool) -> TopSellingProduct {
    let revenue = number(d, "totalRevenue");
    TopSellingProduct {
        product: d.get_str("product").unwrap_or_default().to_string(),
        product_name: d.get_str("productName").unwrap_or_default().to_string(),
        category: d.get_str("category").ok().map(str::to_string),
        stock: d.get_str("stock").unwrap_or("Sold Out").to_string(),
        total_sales: (!by_units).then(|| round_to(revenue, 2)),
        total_sold: by_units.then(|| count(d, "totalSold")),
        total_revenue: by_units.then_some(revenue),
    }
}

fn trending_pipeline(start: DateTime<Utc>, end: DateTime<Utc>, vendor: Option<&ObjectId>) -> Vec<Document> {
    let mut pipeline = product_ranking_pipeline(start, end, vendor, "totalSold");
    pipeline.push(doc! {
        "$project": {
            "_id": 1,
            "totalSold": 1,
            "totalRevenue": 1,
            "name": "$productDetails.description.name",
            "featuredImg": "$productDetails.featuredImg",
            "price": "$productDetails.productInfo.price",
            "salePrice": "$productDetails.productInfo.salePrice",
        }
    });
    pipeline
}

fn trending_from(d: &Document) -> Option<TrendingProduct> {
    Some(TrendingProduct {
        id: d.get_object_id("_id").ok()?.to_hex(),
        total_sold: count(d, "totalSold"),
        total_revenue: number(d, "totalRevenue"),
        name: d.get_str("name").unwrap_or_default().to_string(),
        featured_img: d.get_str("featuredImg").unwrap_or_default().to_string(),
        price: number(d, "price"),
        sale_price: number(d, "salePrice"),
    })
}

/// Admin counts orders; a vendor counts its own non-cancelled lines.
fn order_rows_stages(start: DateTime<Utc>, end: DateTime<Utc>, vendor: Option<&ObjectId>) -> Vec<Document> {
    let mut stages = vec![doc! { "$match": created_between(start, end) }];
    if vendor.is_some() {
        stages.push(doc! { "$unwind": "$orderInfo" });
        stages.push(doc! { "$match": not_cancelled(vendor) });
    }
    stages
}

fn hourly_pipeline(start: DateTime<Utc>, end: DateTime<Utc>, vendor: Option<&ObjectId>) -> Vec<Document> {
    let mut pipeline = order_rows_stages(start, end, vendor);
    pipeline.extend([
        doc! { "$project": { "hour": { "$hour": { "date": "$createdAt", "timezone": LOCAL_OFFSET } } } },
        doc! { "$group": { "_id": "$hour", "count": { "$sum": 1 } } },
        doc! { "$sort": { "_id": 1 } },
    ]);
    pipeline
}

fn hourly_from(rows: &[Document]) -> Vec<HourlyCount> {
    rows.iter()
        .map(|d| HourlyCount {
            hour_label: hour_label(count(d, "_id").clamp(0, 23) as u32),
            count: count(d, "count"),
        })
        .collect()
}

fn monthly_pipeline(vendor: Option<&ObjectId>) -> Vec<Document> {
    let (mut pipeline, amount) = match vendor {
        Some(_) => (
            vec![doc! { "$unwind": "$orderInfo" }, doc! { "$match": not_cancelled(vendor) }],
            "$orderInfo.totalAmount.total",
        ),
        None => (
            vec![doc! { "$match": { "orderInfo.status": { "$ne": OrderStatus::Cancelled.as_str() } } }],
            "$totalAmount",
        ),
    };
    pipeline.extend([
        doc! {
            "$group": {
                "_id": { "month": { "$month": "$createdAt" }, "year": { "$year": "$createdAt" } },
                "totalSales": { "$sum": { "$ifNull": [amount, 0] } },
                "orderCount": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "_id.year": -1, "_id.month": -1 } },
    ]);
    pipeline
}

fn monthly_from(d: &Document) -> Option<MonthlySales> {
    let id = d.get_document("_id").ok()?;
    let month = count(id, "month") as u32;
    Some(MonthlySales {
        month,
        month_name: month_name(month).to_string(),
        year: count(id, "year") as i32,
        total_sales: number(d, "totalSales"),
        order_count: count(d, "orderCount"),
    })
}

fn recent_lines_pipeline(vendor: &ObjectId) -> Vec<Document> {
    vec![
        doc! { "$unwind": "$orderInfo" },
        doc! { "$match": not_cancelled(Some(vendor)) },
        doc! { "$sort": { "createdAt": -1 } },
        doc! { "$limit": RECENT_LIMIT },
        doc! {
            "$project": {
                "_id": 1,
                "createdAt": 1,
                "customerInfo": 1,
                "orderInfo": 1,
                "totalAmount": 1,
                "orderNote": 1,
            }
        },
    ]
}

pub struct StatsService {
    mongodb_service: Arc<MongoDBService>,
}

impl StatsService {
    pub fn new(mongodb_service: Arc<MongoDBService>) -> Self {
        Self { mongodb_service }
    }

    async fn aggregate_orders(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, ApiError> {
        self.mongodb_service
            .orders()
            .aggregate(pipeline, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    async fn sales_and_cost(&self, now: DateTime<Utc>, days: i64, vendor: Option<&ObjectId>) -> Result<SalesAndCostStats, ApiError> {
        let window = Some((series_start(now, days), now));
        let rows = self.aggregate_orders(daily_sales_pipeline(window, vendor)).await?;
        let mut stats = sales_and_cost_from(now, days, &rows);

        if vendor.is_some() {
            let history = self.aggregate_orders(daily_sales_pipeline(None, vendor)).await?;
            let daily: Vec<f64> = history.iter().map(|d| number(d, "totalSales")).collect();
            let max_sales = best_window_sum(&daily, days.max(0) as usize);
            stats.is_current_above_max = Some(stats.total_sales_sum > max_sales);
            stats.max_sales = Some(max_sales);
        }
        Ok(stats)
    }

    async fn user_stats(&self, now: DateTime<Utc>, days: i64) -> Result<UserStats, ApiError> {
        let (current, previous) = compare_periods(now, days);
        let pipeline = period_facet(&current, &previous, None, false, &doc! { "count": { "$sum": 1 } });
        let rows: Vec<Document> = self.mongodb_service
            .users()
            .aggregate(pipeline, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;

        let current_total = facet_number(&rows, "currentPeriod", "count");
        let previous_total = facet_number(&rows, "previousPeriod", "count");
        Ok(UserStats {
            total_users: current_total as i64,
            percent_change: percent_change(current_total, previous_total, NoBaseline::Null, 2),
            trend: trend(current_total, previous_total),
            compared_to: compared_to(days),
        })
    }

    async fn total_orders(&self, now: DateTime<Utc>, days: i64, vendor: Option<&ObjectId>) -> Result<TotalOrdersStats, ApiError> {
        let (current, previous) = compare_periods(now, days);
        let pipeline = period_facet(&current, &previous, vendor, vendor.is_some(), &doc! { "count": { "$sum": 1 } });
        let rows = self.aggregate_orders(pipeline).await?;

        let current_total = facet_number(&rows, "currentPeriod", "count");
        let previous_total = facet_number(&rows, "previousPeriod", "count");
        Ok(TotalOrdersStats {
            total_orders: current_total as i64,
            percent_change: percent_change(current_total, previous_total, NoBaseline::HundredIfAny, 2).unwrap_or(0.0),
            compared_to: compared_to(days),
        })
    }

    async fn profit(&self, now: DateTime<Utc>, days: i64, vendor: Option<&ObjectId>) -> Result<ProfitStats, ApiError> {
        let (current, previous) = compare_periods(now, days);
        let amount = if vendor.is_some() { "$orderInfo.totalAmount.total" } else { "$totalAmount" };
        let accumulators = doc! { "totalSales": { "$sum": { "$ifNull": [amount, 0] } } };
        let rows = self.aggregate_orders(period_facet(&current, &previous, vendor, vendor.is_some(), &accumulators)).await?;

        let current_sales = facet_number(&rows, "currentPeriod", "totalSales");
        let previous_sales = facet_number(&rows, "previousPeriod", "totalSales");
        Ok(ProfitStats {
            total_sales: round_to(current_sales, 2),
            percent_change: percent_change(current_sales, previous_sales, NoBaseline::Null, 2),
            trend: trend(current_sales, previous_sales),
            compared_to: compared_to(days),
        })
    }

    async fn total_vendors(&self, now: DateTime<Utc>, days: i64) -> Result<VendorCountStats, ApiError> {
        let mut filter = created_between(now - Duration::days(days), now);
        filter.insert("role", UserRole::Vendor.as_str());
        let total_vendors = self.mongodb_service
            .users()
            .count_documents(filter, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(VendorCountStats { total_vendors: total_vendors as i64, compared_to: compared_to(days) })
    }

    async fn total_shops(&self, now: DateTime<Utc>, days: i64, vendor: Option<&ObjectId>) -> Result<ShopCountStats, ApiError> {
        let mut filter = created_between(now - Duration::days(days), now);
        if let Some(vendor) = vendor {
            // shops written by older clients store the vendor id as a string
            filter.insert("vendorId", doc! { "$in": [*vendor, vendor.to_hex()] });
        }
        let total_shops = self.mongodb_service
            .shops()
            .count_documents(filter, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(ShopCountStats { total_shops: total_shops as i64, compared_to: compared_to(days) })
    }

    async fn order_count_by_status(
        &self,
        now: DateTime<Utc>,
        status: OrderStatus,
        days: i64,
        vendor: Option<&ObjectId>,
    ) -> Result<OrderStatusCount, ApiError> {
        let rows = self
            .aggregate_orders(status_count_pipeline(series_start(now, days), now, status, vendor))
            .await?;
        Ok(OrderStatusCount {
            status: status.as_str().to_string(),
            total_orders: rows.first().map(|d| count(d, "totalOrders")).unwrap_or(0),
            compared_to: compared_to(days),
        })
    }

    async fn top_selling(&self, now: DateTime<Utc>, vendor: Option<&ObjectId>) -> Result<Vec<TopSellingProduct>, ApiError> {
        let start = now - Duration::days(TOP_SELLING_DAYS);
        let rows = self.aggregate_orders(top_selling_pipeline(start, now, vendor)).await?;
        Ok(rows.iter().map(|d| top_selling_from(d, vendor.is_some())).collect())
    }

    async fn trending(&self, now: DateTime<Utc>, days: i64, vendor: Option<&ObjectId>) -> Result<TrendingProducts, ApiError> {
        let rows = self.aggregate_orders(trending_pipeline(series_start(now, days), now, vendor)).await?;
        Ok(TrendingProducts {
            compared_to: compared_to(days),
            trending_products: rows.iter().filter_map(trending_from).collect(),
        })
    }

    async fn today_orders(&self, now: DateTime<Utc>, vendor: Option<&ObjectId>) -> Result<TodayOrdersStats, ApiError> {
        let (yesterday, today, tomorrow) = local_day_bounds(now);
        let end_of_today = tomorrow - Duration::milliseconds(1);
        let end_of_yesterday = today - Duration::milliseconds(1);

        let hourly = self.aggregate_orders(hourly_pipeline(today, end_of_today, vendor)).await?;
        let mut yesterday_pipeline = order_rows_stages(yesterday, end_of_yesterday, vendor);
        yesterday_pipeline.push(doc! { "$count": "count" });
        let yesterday_rows = self.aggregate_orders(yesterday_pipeline).await?;

        let today_hourly_data = hourly_from(&hourly);
        let today_count: i64 = today_hourly_data.iter().map(|h| h.count).sum();
        let yesterday_count = yesterday_rows.first().map(|d| count(d, "count")).unwrap_or(0);

        Ok(TodayOrdersStats {
            vendor_id: vendor.map(|v| v.to_hex()),
            today_count,
            percent_change: percent_change(today_count as f64, yesterday_count as f64, NoBaseline::HundredIfAny, 1)
                .unwrap_or(0.0),
            today_hourly_data,
        })
    }

    async fn recent_orders(&self) -> Result<Vec<Order>, ApiError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .limit(RECENT_LIMIT)
            .build();
        let orders: Vec<Order> = self.mongodb_service
            .orders()
            .find(doc! {}, options)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(orders.into_iter().map(Order::fold_legacy_products).collect())
    }

    async fn vendor_recent_orders(&self, vendor: &ObjectId) -> Result<Vec<RecentOrderLine>, ApiError> {
        let rows = self.aggregate_orders(recent_lines_pipeline(vendor)).await?;
        rows.into_iter()
            .map(|d| -> Result<RecentOrderLine, ApiError> {
                let mut line: RecentOrderLine = bson::from_document(d)?;
                line.order_info.fold_legacy_product();
                Ok(line)
            })
            .collect()
    }

    async fn monthly_sales(&self, vendor: Option<&ObjectId>) -> Result<Vec<MonthlySales>, ApiError> {
        let rows = self.aggregate_orders(monthly_pipeline(vendor)).await?;
        Ok(rows.iter().filter_map(monthly_from).collect())
    }

    pub async fn get_admin_stats(&self, days: i64) -> Result<AdminStats, ApiError> {
        let now = Utc::now();
        let (
            sales_and_cost_stats,
            user_stats,
            total_orders_stats,
            profit_stats,
            total_vendors_stats,
            total_shops_stats,
            trending_products_stats,
            pending_order,
            processing_order,
            completed_order,
            cancelled_order,
            top_selling_products_stats,
            today_orders_stats,
            recent_orders,
            monthly_sales_history,
        ) = futures::try_join!(
            self.sales_and_cost(now, days, None),
            self.user_stats(now, days),
            self.total_orders(now, days, None),
            self.profit(now, days, None),
            self.total_vendors(now, days),
            self.total_shops(now, days, None),
            self.trending(now, days, None),
            self.order_count_by_status(now, OrderStatus::Pending, days, None),
            self.order_count_by_status(now, OrderStatus::Processing, days, None),
            self.order_count_by_status(now, OrderStatus::Paid, days, None),
            self.order_count_by_status(now, OrderStatus::Cancelled, days, None),
            self.top_selling(now, None),
            self.today_orders(now, None),
            self.recent_orders(),
            self.monthly_sales(None),
        )?;

        info!("Admin stats computed over the last {} days", days);
        Ok(AdminStats {
            sales_and_cost_stats,
            user_stats,
            total_orders_stats,
            profit_stats,
            total_vendors_stats,
            total_shops_stats,
            trending_products_stats,
            pending_order,
            processing_order,
            completed_order,
            cancelled_order,
            top_selling_products_stats,
            today_orders_stats,
            recent_orders,
            monthly_sales_history,
        })
    }

    pub async fn get_vendor_stats(&self, days: i64, vendor_id: &ObjectId) -> Result<VendorStats, ApiError> {
        let now = Utc::now();
        let vendor = Some(vendor_id);
        let (
            sales_and_cost_stats,
            total_orders_stats,
            profit_stats,
            total_shops_stats,
            pending_order,
            processing_order,
            completed_order,
            cancelled_order,
            top_selling_products_stats,
            trending_products_stats,
            today_orders_stats,
            recent_orders,
            monthly_sales,
        ) = futures::try_join!(
            self.sales_and_cost(now, days, vendor),
            self.total_orders(now, days, vendor),
            self.profit(now, days, vendor),
            self.total_shops(now, days, vendor),
            self.order_count_by_status(now, OrderStatus::Pending, days, vendor),
            self.order_count_by_status(now, OrderStatus::Processing, days, vendor),
            self.order_count_by_status(now, OrderStatus::Paid, days, vendor),
            self.order_count_by_status(now, OrderStatus::Cancelled, days, vendor),
            self.top_selling(now, vendor),
            self.trending(now, days, vendor),
            self.today_orders(now, vendor),
            self.vendor_recent_orders(vendor_id),
            self.monthly_sales(vendor),
        )?;

        info!("Vendor stats for {} computed over the last {} days", vendor_id, days);
        Ok(VendorStats {
            sales_and_cost_stats,
            total_orders_stats,
            profit_stats,
            total_shops_stats,
            pending_order,
            processing_order,
            completed_order,
            cancelled_order,
            top_selling_products_stats,
            trending_products_stats,
            today_orders_stats,
            recent_orders,
            monthly_sales_history: VendorMonthlySales {
                vendor_id: Some(vendor_id.to_hex()),
                monthly_sales,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_sales_and_cost_fills_missing_days() {
        let now = at("2024-03-10T15:00:00Z");
        let rows = vec![
            doc! { "_id": "2024-03-08", "totalSales": 300_i32, "totalCost": 200_i32 },
            doc! { "_id": "2024-03-10", "totalSales": 50.5, "totalCost": 20.0 },
            doc! { "_id": "2024-02-01", "totalSales": 999.0, "totalCost": 1.0 },
        ];
        let stats = sales_and_cost_from(now, 3, &rows);
        assert_eq!(stats.stats.len(), 3);
        assert_eq!(stats.stats[0].date, "2024-03-08");
        assert_eq!(stats.stats[1].total_sales, 0.0);
        assert_eq!(stats.total_sales_sum, 350.5);
        assert_eq!(stats.total_cost_sum, 220.0);
        assert!(stats.max_sales.is_none());
    }

    #[test]
    fn test_facet_number_reads_either_branch() {
        let rows = vec![doc! {
            "currentPeriod": [{ "_id": Bson::Null, "count": 4_i32 }],
            "previousPeriod": [],
        }];
        assert_eq!(facet_number(&rows, "currentPeriod", "count"), 4.0);
        assert_eq!(facet_number(&rows, "previousPeriod", "count"), 0.0);
        assert_eq!(facet_number(&[], "currentPeriod", "count"), 0.0);
    }

    #[test]
    fn test_period_facet_filters_vendor_lines() {
        let now = at("2024-03-10T00:00:00Z");
        let (current, previous) = compare_periods(now, 7);
        let vendor = ObjectId::new();
        let pipeline = period_facet(&current, &previous, Some(&vendor), true, &doc! { "count": { "$sum": 1 } });

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline[0].get_str("$unwind").unwrap(), "$orderInfo");
        let facet = pipeline[1].get_document("$facet").unwrap();
        let current_branch = facet.get_array("currentPeriod").unwrap();
        let filter = current_branch[0].as_document().unwrap().get_document("$match").unwrap();
        assert_eq!(filter.get_object_id("orderInfo.vendorId").unwrap(), vendor);
        let group = current_branch[1].as_document().unwrap().get_document("$group").unwrap();
        assert!(group.contains_key("count"));
    }

    #[test]
    fn test_admin_facet_stays_at_order_level() {
        let now = at("2024-03-10T00:00:00Z");
        let (current, previous) = compare_periods(now, 7);
        let pipeline = period_facet(&current, &previous, None, false, &doc! { "count": { "$sum": 1 } });
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline[0].contains_key("$facet"));
    }

    #[test]
    fn test_rankings_sort_by_units_for_vendors() {
        let now = at("2024-03-10T00:00:00Z");
        let vendor = ObjectId::new();
        let sort_of = |pipeline: &[Document]| {
            pipeline
                .iter()
                .find_map(|stage| stage.get_document("$sort").ok().cloned())
                .unwrap()
        };

        let admin = top_selling_pipeline(now - Duration::days(365), now, None);
        assert!(sort_of(&admin).contains_key("totalRevenue"));
        let own = top_selling_pipeline(now - Duration::days(365), now, Some(&vendor));
        assert!(sort_of(&own).contains_key("totalSold"));
        let trending = trending_pipeline(now - Duration::days(7), now, None);
        assert!(sort_of(&trending).contains_key("totalSold"));
    }

    #[test]
    fn test_top_selling_rows() {
        let row = doc! {
            "product": "img.png",
            "productName": "Rice",
            "category": "Grocery",
            "stock": "Available",
            "totalSold": 7_i32,
            "totalRevenue": 1234.567,
        };
        let admin = top_selling_from(&row, false);
        assert_eq!(admin.total_sales, Some(1234.57));
        assert!(admin.total_sold.is_none());

        let vendor = top_selling_from(&row, true);
        assert_eq!(vendor.total_sold, Some(7));
        assert_eq!(vendor.total_revenue, Some(1234.567));
        assert!(vendor.total_sales.is_none());
        assert_eq!(vendor.category.as_deref(), Some("Grocery"));
    }

    #[test]
    fn test_trending_row_needs_product_id() {
        let id = ObjectId::new();
        let row = doc! { "_id": id, "totalSold": 3_i64, "totalRevenue": 30.0, "name": "Tea", "price": 12_i32, "salePrice": 10.0 };
        let product = trending_from(&row).unwrap();
        assert_eq!(product.id, id.to_hex());
        assert_eq!(product.total_sold, 3);
        assert_eq!(product.price, 12.0);
        assert!(trending_from(&doc! { "_id": Bson::Null }).is_none());
    }

    #[test]
    fn test_hourly_labels() {
        let rows = vec![doc! { "_id": 0_i32, "count": 2_i32 }, doc! { "_id": 13_i32, "count": 1_i32 }];
        let hourly = hourly_from(&rows);
        assert_eq!(hourly[0], HourlyCount { hour_label: "12 AM".into(), count: 2 });
        assert_eq!(hourly[1].hour_label, "1 PM");
    }

    #[test]
    fn test_hourly_pipeline_uses_local_offset() {
        let now = at("2024-03-10T00:00:00Z");
        let pipeline = hourly_pipeline(now, now + Duration::days(1), None);
        let project = pipeline[1].get_document("$project").unwrap();
        let hour = project.get_document("hour").unwrap().get_document("$hour").unwrap();
        assert_eq!(hour.get_str("timezone").unwrap(), LOCAL_OFFSET);
    }

    #[test]
    fn test_monthly_rows() {
        let row = doc! { "_id": { "month": 2_i32, "year": 2024_i32 }, "totalSales": 500.0, "orderCount": 4_i32 };
        let month = monthly_from(&row).unwrap();
        assert_eq!(month.month_name, "February");
        assert_eq!(month.year, 2024);
        assert_eq!(month.order_count, 4);
        assert!(monthly_from(&doc! { "totalSales": 1.0 }).is_none());
    }

    #[test]
    fn test_monthly_pipeline_scopes() {
        let admin = monthly_pipeline(None);
        let group = admin[1].get_document("$group").unwrap();
        let sum = group.get_document("totalSales").unwrap().get_document("$sum").unwrap();
        assert_eq!(sum.get_array("$ifNull").unwrap()[0].as_str(), Some("$totalAmount"));

        let vendor = ObjectId::new();
        let own = monthly_pipeline(Some(&vendor));
        assert_eq!(own[0].get_str("$unwind").unwrap(), "$orderInfo");
    }

    #[test]
    fn test_status_count_matches_status_and_vendor() {
        let now = at("2024-03-10T00:00:00Z");
        let vendor = ObjectId::new();
        let pipeline = status_count_pipeline(now - Duration::days(7), now, OrderStatus::Paid, Some(&vendor));
        let filter = pipeline[1].get_document("$match").unwrap();
        assert_eq!(filter.get_str("orderInfo.status").unwrap(), "paid");
        assert_eq!(filter.get_object_id("orderInfo.vendorId").unwrap(), vendor);
    }
}
