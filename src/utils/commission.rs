use std::collections::HashMap;

use mongodb::bson::oid::ObjectId;

use crate::models::{
    ApiError, CommissionSummary, CommissionType, LineItem, Order, OrderLine, OrderStatus, Product, UserRole,
};

pub fn commission_amount(kind: CommissionType, value: f64, base: f64) -> f64 {
    match kind {
        CommissionType::Percentage => base * value / 100.0,
        CommissionType::Fixed => value,
    }
}

/// Commission estimate stored when the order is placed, based on the line total.
pub fn precompute_commission(line: &mut OrderLine) {
    let Some(total) = line.total_amount.as_ref().map(|t| t.total) else {
        return;
    };
    if let Some(commission) = line.commission.as_mut() {
        commission.amount = commission_amount(commission.kind, commission.value, total);
    }
}

/// Settles a line's commission on payment. The amount is derived from the
/// line subtotal if it was never set. Returns the user and amount to credit
/// when the line was placed by a sales rep and has not been credited yet.
pub fn settle_commission(line: &mut OrderLine) -> Option<(ObjectId, f64)> {
    let sub_total = line.sub_total();
    let commission = line.commission.as_mut()?;

    if commission.amount == 0.0 && commission.value != 0.0 {
        commission.amount = commission_amount(commission.kind, commission.value, sub_total);
    }

    let user = line.order_by?;
    if line.user_role == UserRole::SalesRep && commission.amount != 0.0 && !commission.is_added_to_balance {
        Some((user, commission.amount))
    } else {
        None
    }
}

pub fn mark_credited(line: &mut OrderLine) {
    if let Some(commission) = line.commission.as_mut() {
        commission.is_added_to_balance = true;
    }
}

/// Returns the stock left after taking `requested` units.
pub fn deduct_stock(product_name: &str, requested: i64, available: i64) -> Result<i64, ApiError> {
    if requested <= 0 {
        return Err(ApiError::BadRequest(format!("Invalid order quantity for \"{}\".", product_name)));
    }
    if available < requested {
        return Err(ApiError::BadRequest(format!(
            "Not enough stock for \"{}\". Only {} left.",
            product_name, available
        )));
    }
    Ok(available - requested)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockTake {
    pub product: ObjectId,
    pub name: String,
    pub quantity: i64,
}

/// Writes a paid transition needs besides the order itself.
#[derive(Debug, Default, PartialEq)]
pub struct PaidSettlement {
    pub stock: Vec<StockTake>,
    pub credits: Vec<(ObjectId, f64)>,
    /// `(product, tracking number)` of items whose product no longer exists.
    pub missing: Vec<(ObjectId, String)>,
}

/// Plans stock and commission for an order moving to paid. Stock is checked
/// against `products` and decremented there, so several lines of the same
/// product share one count. A line settles its commission only when at least
/// one of its products still exists. Credited lines are marked on `order`.
pub fn plan_paid_settlement(
    order: &mut Order,
    products: &mut HashMap<ObjectId, Product>,
) -> Result<PaidSettlement, ApiError> {
    let mut plan = PaidSettlement::default();

    for line in &mut order.order_info {
        let mut resolved = false;

        for item in &line.products {
            let Some(product) = products.get_mut(&item.product) else {
                plan.missing.push((item.product, line.tracking_number.clone()));
                continue;
            };
            resolved = true;

            product.product_info.quantity = deduct_stock(product.name(), item.quantity, product.product_info.quantity)?;
            plan.stock.push(StockTake {
                product: item.product,
                name: product.name().to_string(),
                quantity: item.quantity,
            });
        }

        if !resolved {
            continue;
        }
        if let Some(credit) = settle_commission(line) {
            mark_credited(line);
            plan.credits.push(credit);
        }
    }
    Ok(plan)
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn sale_price(item: &LineItem, product: Option<&Product>) -> f64 {
    if item.price > 0.0 {
        return item.price;
    }
    product
        .map(|p| positive(Some(p.product_info.sale_price)).unwrap_or(p.product_info.price))
        .unwrap_or(0.0)
}

fn retail_price(item: &LineItem, product: Option<&Product>) -> f64 {
    positive(item.retail_price)
        .or_else(|| product.and_then(|p| positive(p.product_info.retail_price)))
        .unwrap_or(0.0)
}

fn wholesale_price(item: &LineItem, product: Option<&Product>) -> f64 {
    positive(item.wholesale_price)
        .or_else(|| positive(item.whole_sale_price))
        .or_else(|| {
            product.and_then(|p| {
                positive(p.product_info.whole_sale_price).or_else(|| positive(p.product_info.wholesale_price))
            })
        })
        .unwrap_or(0.0)
}

/// Aggregates every line placed by `user_id`. Quantities, sale amounts and
/// commissions only count paid lines.
pub fn summarize_commissions(
    user_id: &ObjectId,
    orders: &[Order],
    products: &HashMap<ObjectId, Product>,
) -> CommissionSummary {
    let mut summary = CommissionSummary::default();
    let mut rate_total = 0.0;
    let mut rate_count = 0u32;

    for line in orders.iter().flat_map(|o| o.order_info.iter()) {
        if line.order_by.as_ref() != Some(user_id) {
            continue;
        }
        summary.total_orders += 1;

        match line.status {
            OrderStatus::Paid => {
                summary.completed_orders += 1;
                // Legacy lines are stored with their product folded into `products`,
                // so item quantities would repeat the line's own count. Only the
                // line quantity is added.
                summary.total_quantity += line.effective_quantity().max(1);

                for item in &line.products {
                    let product = products.get(&item.product);
                    let qty = item.quantity.max(1) as f64;
                    summary.total_sale_amount += sale_price(item, product) * qty;
                    summary.total_retail_amount += retail_price(item, product) * qty;
                    summary.total_wholesale_amount += wholesale_price(item, product) * qty;
                }

                if let Some(commission) = &line.commission {
                    match commission.kind {
                        CommissionType::Percentage => {
                            summary.total_percentage_commission_amount += commission.amount;
                            rate_total += commission.value;
                            rate_count += 1;
                        }
                        CommissionType::Fixed => summary.total_fixed_commission_amount += commission.amount,
                    }
                }
            }
            OrderStatus::Pending => summary.pending_orders += 1,
            _ => {}
        }
    }

    summary.average_percentage_rate = if rate_count > 0 { rate_total / rate_count as f64 } else { 0.0 };
    summary.total_commission = summary.total_percentage_commission_amount + summary.total_fixed_commission_amount;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::{
        BrandAndCategories, Commission, CustomerInfo, LineTotals, PaymentInfo, PaymentMethod, ProductDescription,
        ProductInfo, ProductType, PublishStatus,
    };

    fn line(role: UserRole, status: OrderStatus, commission: Option<Commission>) -> OrderLine {
        OrderLine {
            order_by: None,
            user_role: role,
            shop_info: None,
            vendor_id: None,
            product_info: None,
            tracking_number: "T".into(),
            status,
            is_cancelled: false,
            quantity: 2,
            selected_price: 0.0,
            total_quantity: 0,
            products: vec![],
            total_amount: Some(LineTotals { sub_total: 1000.0, total: 1100.0, ..Default::default() }),
            commission,
        }
    }

    fn percentage(value: f64) -> Commission {
        Commission { kind: CommissionType::Percentage, value, amount: 0.0, is_added_to_balance: false }
    }

    fn item(product: ObjectId, price: f64, quantity: i64) -> LineItem {
        LineItem {
            product,
            shop: None,
            name: None,
            sku: None,
            price,
            sale_price: None,
            retail_price: None,
            whole_sale_price: None,
            wholesale_price: None,
            quantity,
            variant: None,
            subtotal: 0.0,
        }
    }

    fn product(id: ObjectId, price: f64, sale: f64) -> Product {
        let now = Utc::now();
        Product {
            id: Some(id),
            shop_id: None,
            featured_img: "img".into(),
            gallery: vec![],
            video: None,
            brand_and_categories: BrandAndCategories::default(),
            description: ProductDescription {
                name: "Rice".into(),
                slug: None,
                unit: "kg".into(),
                description: "Rice".into(),
                status: PublishStatus::Publish,
            },
            product_type: ProductType::Simple,
            product_info: ProductInfo {
                price,
                sale_price: sale,
                retail_price: Some(90.0),
                whole_sale_price: None,
                wholesale_price: Some(70.0),
                discount: 0,
                quantity: 10,
                sku: "R-1".into(),
                width: String::new(),
                height: String::new(),
                length: String::new(),
                is_digital: None,
                digital: None,
                is_external: None,
                external: None,
            },
            specifications: vec![],
            commission: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn order(lines: Vec<OrderLine>) -> Order {
        let now = Utc::now();
        Order {
            id: Some(ObjectId::new()),
            total_quantity: 0,
            order_info: lines,
            customer_info: CustomerInfo {
                first_name: "Karim".into(),
                last_name: String::new(),
                email: None,
                phone: "017".into(),
                address: "Dhaka".into(),
                city: None,
                postal_code: None,
                country: None,
            },
            payment_info: PaymentInfo::Method(PaymentMethod::CashOn),
            total_amount: 1100.0,
            order_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_commission_amount() {
        assert_eq!(commission_amount(CommissionType::Percentage, 10.0, 1100.0), 110.0);
        assert_eq!(commission_amount(CommissionType::Fixed, 50.0, 1100.0), 50.0);
    }

    #[test]
    fn test_precompute_uses_line_total() {
        let mut l = line(UserRole::SalesRep, OrderStatus::Pending, Some(percentage(10.0)));
        precompute_commission(&mut l);
        assert_eq!(l.commission.unwrap().amount, 110.0);

        let mut no_totals = line(UserRole::SalesRep, OrderStatus::Pending, Some(percentage(10.0)));
        no_totals.total_amount = None;
        precompute_commission(&mut no_totals);
        assert_eq!(no_totals.commission.unwrap().amount, 0.0);
    }

    #[test]
    fn test_settle_uses_subtotal_when_unset() {
        let user = ObjectId::new();
        let mut l = line(UserRole::SalesRep, OrderStatus::Paid, Some(percentage(10.0)));
        l.order_by = Some(user);

        assert_eq!(settle_commission(&mut l), Some((user, 100.0)));
        mark_credited(&mut l);
        assert!(l.commission.as_ref().unwrap().is_added_to_balance);
        assert_eq!(settle_commission(&mut l), None);
    }

    #[test]
    fn test_settle_keeps_existing_amount() {
        let mut c = percentage(10.0);
        c.amount = 110.0;
        let mut l = line(UserRole::SalesRep, OrderStatus::Paid, Some(c));
        l.order_by = Some(ObjectId::new());
        assert_eq!(settle_commission(&mut l).map(|(_, a)| a), Some(110.0));
    }

    #[test]
    fn test_settle_customer_line_is_not_credited() {
        let mut l = line(UserRole::Customer, OrderStatus::Paid, Some(percentage(10.0)));
        l.order_by = Some(ObjectId::new());
        assert_eq!(settle_commission(&mut l), None);
        assert_eq!(l.commission.unwrap().amount, 100.0);
    }

    #[test]
    fn test_deduct_stock() {
        assert_eq!(deduct_stock("Rice", 3, 10).unwrap(), 7);
        assert_eq!(deduct_stock("Rice", 10, 10).unwrap(), 0);

        match deduct_stock("Rice", 0, 10) {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Invalid order quantity for \"Rice\"."),
            other => panic!("unexpected: {:?}", other),
        }
        match deduct_stock("Rice", 11, 10) {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Not enough stock for \"Rice\". Only 10 left."),
            other => panic!("unexpected: {:?}", other),
        }
    }

    fn sr_line(user: ObjectId, items: Vec<LineItem>) -> OrderLine {
        let mut l = line(UserRole::SalesRep, OrderStatus::Paid, Some(percentage(10.0)));
        l.order_by = Some(user);
        l.products = items;
        l
    }

    #[test]
    fn test_paid_plan_takes_stock_and_credits() {
        let user = ObjectId::new();
        let pid = ObjectId::new();
        let mut products = HashMap::from([(pid, product(pid, 120.0, 100.0))]);
        let mut o = order(vec![sr_line(user, vec![item(pid, 0.0, 3)])]);

        let plan = plan_paid_settlement(&mut o, &mut products).unwrap();
        assert_eq!(plan.stock, vec![StockTake { product: pid, name: "Rice".into(), quantity: 3 }]);
        assert_eq!(plan.credits, vec![(user, 100.0)]);
        assert!(plan.missing.is_empty());
        assert_eq!(products[&pid].product_info.quantity, 7);
        assert!(o.order_info[0].commission.as_ref().unwrap().is_added_to_balance);
    }

    #[test]
    fn test_paid_plan_shares_stock_across_lines() {
        let pid = ObjectId::new();
        let mut products = HashMap::from([(pid, product(pid, 120.0, 100.0))]);
        let mut o = order(vec![
            sr_line(ObjectId::new(), vec![item(pid, 0.0, 6)]),
            sr_line(ObjectId::new(), vec![item(pid, 0.0, 4)]),
        ]);
        let plan = plan_paid_settlement(&mut o, &mut products).unwrap();
        assert_eq!(plan.stock.len(), 2);
        assert_eq!(products[&pid].product_info.quantity, 0);

        let mut products = HashMap::from([(pid, product(pid, 120.0, 100.0))]);
        let mut o = order(vec![
            sr_line(ObjectId::new(), vec![item(pid, 0.0, 6)]),
            sr_line(ObjectId::new(), vec![item(pid, 0.0, 5)]),
        ]);
        match plan_paid_settlement(&mut o, &mut products) {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Not enough stock for \"Rice\". Only 4 left."),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_paid_plan_skips_missing_products() {
        let user = ObjectId::new();
        let gone = ObjectId::new();
        let mut products = HashMap::new();
        let mut o = order(vec![sr_line(user, vec![item(gone, 0.0, 1)])]);

        let plan = plan_paid_settlement(&mut o, &mut products).unwrap();
        assert!(plan.stock.is_empty());
        assert!(plan.credits.is_empty());
        assert_eq!(plan.missing, vec![(gone, "T".to_string())]);
        assert!(!o.order_info[0].commission.as_ref().unwrap().is_added_to_balance);
    }

    #[test]
    fn test_paid_plan_rejects_zero_quantity() {
        let pid = ObjectId::new();
        let mut products = HashMap::from([(pid, product(pid, 120.0, 100.0))]);
        let mut o = order(vec![sr_line(ObjectId::new(), vec![item(pid, 0.0, 0)])]);
        assert!(matches!(plan_paid_settlement(&mut o, &mut products), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_repeated_paid_takes_stock_again_but_credits_once() {
        let user = ObjectId::new();
        let pid = ObjectId::new();
        let mut products = HashMap::from([(pid, product(pid, 120.0, 100.0))]);
        let mut o = order(vec![sr_line(user, vec![item(pid, 0.0, 2)])]);

        let first = plan_paid_settlement(&mut o, &mut products).unwrap();
        let second = plan_paid_settlement(&mut o, &mut products).unwrap();
        assert_eq!(first.credits, vec![(user, 100.0)]);
        assert!(second.credits.is_empty());
        assert_eq!(second.stock.len(), 1);
        assert_eq!(products[&pid].product_info.quantity, 6);
    }

    #[test]
    fn test_summary_counts_and_amounts() {
        let user = ObjectId::new();
        let pid = ObjectId::new();
        let products = HashMap::from([(pid, product(pid, 120.0, 100.0))]);

        let mut paid = line(UserRole::SalesRep, OrderStatus::Paid, Some(Commission {
            kind: CommissionType::Percentage,
            value: 10.0,
            amount: 100.0,
            is_added_to_balance: true,
        }));
        paid.order_by = Some(user);
        paid.products = vec![item(pid, 0.0, 2), item(pid, 80.0, 1)];

        let mut fixed = line(UserRole::SalesRep, OrderStatus::Paid, Some(Commission {
            kind: CommissionType::Fixed,
            value: 50.0,
            amount: 50.0,
            is_added_to_balance: true,
        }));
        fixed.order_by = Some(user);
        fixed.total_quantity = 4;

        let mut pending = line(UserRole::SalesRep, OrderStatus::Pending, None);
        pending.order_by = Some(user);

        let mut someone_else = line(UserRole::SalesRep, OrderStatus::Paid, None);
        someone_else.order_by = Some(ObjectId::new());

        let orders = vec![order(vec![paid, fixed]), order(vec![pending, someone_else])];
        let s = summarize_commissions(&user, &orders, &products);

        assert_eq!(s.total_orders, 3);
        assert_eq!(s.completed_orders, 2);
        assert_eq!(s.pending_orders, 1);
        assert_eq!(s.total_quantity, 2 + 4);
        assert_eq!(s.total_sale_amount, 100.0 * 2.0 + 80.0);
        assert_eq!(s.total_retail_amount, 90.0 * 3.0);
        assert_eq!(s.total_wholesale_amount, 70.0 * 3.0);
        assert_eq!(s.total_percentage_commission_amount, 100.0);
        assert_eq!(s.total_fixed_commission_amount, 50.0);
        assert_eq!(s.total_commission, 150.0);
        assert_eq!(s.average_percentage_rate, 10.0);
    }

    #[test]
    fn test_summary_falls_back_to_list_price() {
        let user = ObjectId::new();
        let pid = ObjectId::new();
        let products = HashMap::from([(pid, product(pid, 120.0, 0.0))]);

        let mut paid = line(UserRole::Customer, OrderStatus::Paid, None);
        paid.order_by = Some(user);
        paid.products = vec![item(pid, 0.0, 1), item(ObjectId::new(), 0.0, 1)];

        let s = summarize_commissions(&user, &[order(vec![paid])], &products);
        assert_eq!(s.total_sale_amount, 120.0);
        assert_eq!(s.average_percentage_rate, 0.0);
    }
}
