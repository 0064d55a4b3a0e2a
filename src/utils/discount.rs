/// Whole-number discount percentage of `sale_price` against `price`.
/// Zero when there is no sale price or no list price.
pub fn calculate_discount(price: f64, sale_price: f64) -> i64 {
    if sale_price <= 0.0 || price <= 0.0 {
        return 0;
    }
    let percent = (price - sale_price) / price * 100.0;
    // half-up, matching how the stored values were produced
    (percent + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount() {
        assert_eq!(calculate_discount(1000.0, 800.0), 20);
        assert_eq!(calculate_discount(300.0, 200.0), 33);
        assert_eq!(calculate_discount(200.0, 199.0), 1);
        assert_eq!(calculate_discount(8.0, 7.0), 13);
    }

    #[test]
    fn test_no_sale_price() {
        assert_eq!(calculate_discount(500.0, 0.0), 0);
        assert_eq!(calculate_discount(0.0, 100.0), 0);
    }

    #[test]
    fn test_sale_above_price_is_negative() {
        assert_eq!(calculate_discount(100.0, 150.0), -50);
    }
}
