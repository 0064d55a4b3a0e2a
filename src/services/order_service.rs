use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;
use futures_util::TryStreamExt;
use log::{info, warn};
use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

use crate::models::{
    ApiError, CommissionSummary, CreateOrderRequest, Order, OrderStatus, OrderSummary, Product, UpdateOrderRequest,
};
use crate::services::MongoDBService;
use crate::utils::aggregate::{count, number};
use crate::utils::commission::{plan_paid_settlement, summarize_commissions, StockTake};
use crate::utils::order_builder::build_order;
use crate::utils::{build_list_query, generate_tracking_number};

const ORDER_SEARCHABLE_FIELDS: [&str; 5] = [
    "customerInfo.firstName",
    "customerInfo.lastName",
    "customerInfo.phone",
    "customerInfo.email",
    "orderInfo.trackingNumber",
];

/// Line-level counters over every order, plus the number of distinct orders.
fn line_summary_pipeline() -> Vec<Document> {
    let when = |field: &str, value: &str, then: bson::Bson| {
        doc! { "$sum": { "$cond": [{ "$eq": [format!("$orderInfo.{}", field), value] }, then, 0] } }
    };
    let line_total = bson::Bson::Document(doc! { "$ifNull": ["$orderInfo.totalAmount.total", 0] });

    vec![
        doc! { "$unwind": "$orderInfo" },
        doc! {
            "$group": {
                "_id": bson::Bson::Null,
                "orders": { "$addToSet": "$_id" },
                "pendingOrders": when("status", "pending", 1.into()),
                "paidOrders": when("status", "paid", 1.into()),
                "customerOrders": when("userRole", "customer", 1.into()),
                "srOrders": when("userRole", "sr", 1.into()),
                "totalPendingSale": when("status", "pending", line_total.clone()),
                "totalPaidOrderSaleAmount": when("status", "paid", line_total),
            }
        },
        doc! {
            "$project": {
                "totalOrders": { "$size": "$orders" },
                "pendingOrders": 1,
                "paidOrders": 1,
                "customerOrders": 1,
                "srOrders": 1,
                "totalPendingSale": 1,
                "totalPaidOrderSaleAmount": 1,
            }
        },
    ]
}

fn order_summary_from(lines: Option<&Document>, root: Option<&Document>) -> OrderSummary {
    let mut summary = OrderSummary::default();
    if let Some(d) = lines {
        summary.total_orders = count(d, "totalOrders");
        summary.pending_orders = count(d, "pendingOrders");
        summary.paid_orders = count(d, "paidOrders");
        summary.customer_orders = count(d, "customerOrders");
        summary.sr_orders = count(d, "srOrders");
        summary.total_pending_sale = number(d, "totalPendingSale");
        summary.total_paid_order_sale_amount = number(d, "totalPaidOrderSaleAmount");
    }
    if let Some(d) = root {
        summary.total_order_sale_amount = number(d, "totalOrderSaleAmount");
    }
    summary
}

pub struct OrderService {
    mongodb_service: Arc<MongoDBService>,
}

impl OrderService {
    pub fn new(mongodb_service: Arc<MongoDBService>) -> Self {
        Self { mongodb_service }
    }

    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError> {
        let mut order = build_order(request, generate_tracking_number)?;

        let result = self.mongodb_service
            .orders()
            .insert_one(&order, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        order.id = result.inserted_id.as_object_id();

        info!(
            "Created order {:?} with {} line(s), total quantity {}",
            order.id,
            order.order_info.len(),
            order.total_quantity
        );
        Ok(order)
    }

    async fn find_orders(&self, params: &HashMap<String, String>, base: Document) -> Result<Vec<Order>, ApiError> {
        let query = build_list_query(params, &ORDER_SEARCHABLE_FIELDS, base);
        let orders: Vec<Order> = self.mongodb_service
            .orders()
            .find(query.filter, query.options)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(orders.into_iter().map(Order::fold_legacy_products).collect())
    }

    pub async fn get_all_orders(&self, params: &HashMap<String, String>) -> Result<Vec<Order>, ApiError> {
        self.find_orders(params, doc! {}).await
    }

    pub async fn get_my_orders(&self, user_id: &ObjectId, params: &HashMap<String, String>) -> Result<Vec<Order>, ApiError> {
        self.find_orders(params, doc! { "orderInfo.orderBy": user_id }).await
    }

    async fn find_order(&self, id: &ObjectId) -> Result<Option<Order>, ApiError> {
        self.mongodb_service
            .orders()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)
            .map(|order| order.map(Order::fold_legacy_products))
    }

    pub async fn get_single_order(&self, id: &ObjectId) -> Result<Order, ApiError> {
        self.find_order(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Order does not exist!".to_string()))
    }

    pub async fn update_order(&self, id: &ObjectId, update: UpdateOrderRequest) -> Result<Order, ApiError> {
        if self.find_order(id).await?.is_none() {
            return Err(ApiError::NotFound("Order does not exists!".to_string()));
        }

        let mut set = doc! { "updatedAt": DateTime::now() };
        if let Some(customer_info) = update.customer_info {
            set.insert("customerInfo", bson::to_bson(&customer_info)?);
        }
        if let Some(payment_info) = update.payment_info {
            set.insert("paymentInfo", bson::to_bson(&payment_info)?);
        }
        if let Some(total_amount) = update.total_amount {
            set.insert("totalAmount", total_amount);
        }
        if let Some(note) = update.order_note {
            set.insert("orderNote", note);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let order = self.mongodb_service
            .orders()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Order does not exists!".to_string()))?;

        info!("Updated order {}", id);
        Ok(order.fold_legacy_products())
    }

    /// Sets every line to `status`. Moving to paid also takes stock and
    /// credits sales rep commissions that were not credited before.
    pub async fn update_order_status(&self, id: &ObjectId, status: OrderStatus) -> Result<Order, ApiError> {
        let mut order = self.find_order(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Order not found!".to_string()))?;

        if order.order_info.is_empty() {
            return Err(ApiError::BadRequest("Order info is missing!".to_string()));
        }

        for line in &mut order.order_info {
            line.status = status;
        }

        if status == OrderStatus::Paid {
            self.settle_paid_order(&mut order).await?;
        }

        order.updated_at = Utc::now();
        self.mongodb_service
            .orders()
            .replace_one(doc! { "_id": id }, &order, None)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Order {} moved to {}", id, status);
        Ok(order)
    }

    async fn settle_paid_order(&self, order: &mut Order) -> Result<(), ApiError> {
        let ids: Vec<ObjectId> = order
            .order_info
            .iter()
            .flat_map(|line| line.products.iter().map(|item| item.product))
            .collect();
        let mut products: HashMap<ObjectId, Product> = self.mongodb_service
            .get_products_by_ids(&ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        let plan = plan_paid_settlement(order, &mut products)?;

        for (product, tracking_number) in &plan.missing {
            warn!("Product {} of line {} no longer exists", product, tracking_number);
        }
        for take in &plan.stock {
            self.take_stock(take).await?;
        }
        for (user, amount) in plan.credits {
            self.mongodb_service
                .users()
                .update_one(
                    doc! { "_id": user },
                    doc! { "$inc": { "commissionBalance": amount }, "$set": { "updatedAt": DateTime::now() } },
                    None,
                )
                .await
                .map_err(ApiError::DatabaseError)?;
            info!("Credited {} commission to {}", amount, user);
        }
        Ok(())
    }

    async fn take_stock(&self, take: &StockTake) -> Result<(), ApiError> {
        let result = self.mongodb_service
            .products()
            .update_one(
                doc! { "_id": take.product, "productInfo.quantity": { "$gte": take.quantity } },
                doc! { "$inc": { "productInfo.quantity": -take.quantity }, "$set": { "updatedAt": DateTime::now() } },
                None,
            )
            .await
            .map_err(ApiError::DatabaseError)?;

        // stock changed between the read and this write
        if result.matched_count == 0 {
            return Err(ApiError::BadRequest(format!("Not enough stock for \"{}\".", take.name)));
        }
        Ok(())
    }

    pub async fn get_order_summary(&self) -> Result<OrderSummary, ApiError> {
        let orders = self.mongodb_service.orders();

        let lines: Vec<Document> = orders
            .aggregate(line_summary_pipeline(), None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;

        let root_pipeline = vec![doc! {
            "$group": {
                "_id": bson::Bson::Null,
                "totalOrderSaleAmount": { "$sum": { "$ifNull": ["$totalAmount", 0] } },
            }
        }];
        let root: Vec<Document> = orders
            .aggregate(root_pipeline, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;

        Ok(order_summary_from(lines.first(), root.first()))
    }

    pub async fn get_user_commission_summary(&self, user_id: &ObjectId) -> Result<CommissionSummary, ApiError> {
        let orders: Vec<Order> = self.mongodb_service
            .orders()
            .find(doc! { "orderInfo.orderBy": user_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;

        if orders.is_empty() {
            return Err(ApiError::NotFound("No orders found for this user".to_string()));
        }
        let orders: Vec<Order> = orders.into_iter().map(Order::fold_legacy_products).collect();

        let ids: Vec<ObjectId> = orders
            .iter()
            .flat_map(|o| o.order_info.iter())
            .filter(|line| line.order_by.as_ref() == Some(user_id))
            .flat_map(|line| line.products.iter().map(|item| item.product))
            .collect();
        let products: HashMap<ObjectId, Product> = self.mongodb_service
            .get_products_by_ids(&ids)
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        Ok(summarize_commissions(user_id, &orders, &products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_defaults_to_zero_without_orders() {
        assert_eq!(order_summary_from(None, None), OrderSummary::default());
    }

    #[test]
    fn test_summary_reads_mixed_numeric_types() {
        let lines = doc! {
            "totalOrders": 3_i32,
            "pendingOrders": 2_i32,
            "paidOrders": 1_i64,
            "customerOrders": 2_i32,
            "srOrders": 1_i32,
            "totalPendingSale": 250_i32,
            "totalPaidOrderSaleAmount": 99.5,
        };
        let root = doc! { "totalOrderSaleAmount": 349.5 };
        let summary = order_summary_from(Some(&lines), Some(&root));
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.pending_orders, 2);
        assert_eq!(summary.paid_orders, 1);
        assert_eq!(summary.sr_orders, 1);
        assert_eq!(summary.total_pending_sale, 250.0);
        assert_eq!(summary.total_paid_order_sale_amount, 99.5);
        assert_eq!(summary.total_order_sale_amount, 349.5);
    }

    #[test]
    fn test_line_summary_pipeline_counts_distinct_orders() {
        let pipeline = line_summary_pipeline();
        assert_eq!(pipeline.len(), 3);
        let group = pipeline[1].get_document("$group").unwrap();
        assert!(group.get_document("orders").unwrap().contains_key("$addToSet"));
        let paid = group.get_document("paidOrders").unwrap();
        assert!(paid.contains_key("$sum"));
    }
}
