use mongodb::bson::{doc, Bson, Document};

/// Numeric field of an aggregation result, whatever width the server chose.
pub fn number(doc: &Document, key: &str) -> f64 {
    match doc.get(key) {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => *v as f64,
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

pub fn count(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => *v as i64,
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}

/// After `$unwind: "$orderInfo"`: makes sure `orderInfo.products` is populated,
/// deriving a single item from the legacy `orderInfo.productInfo` reference
/// on documents written before line items existed.
pub fn canonical_items_stage() -> Document {
    doc! {
        "$addFields": {
            "orderInfo.products": {
                "$cond": [
                    { "$gt": [{ "$size": { "$ifNull": ["$orderInfo.products", []] } }, 0] },
                    "$orderInfo.products",
                    [{
                        "product": "$orderInfo.productInfo",
                        "price": 0,
                        "quantity": {
                            "$cond": [
                                { "$gt": [{ "$ifNull": ["$orderInfo.totalQuantity", 0] }, 0] },
                                "$orderInfo.totalQuantity",
                                { "$ifNull": ["$orderInfo.quantity", 0] }
                            ]
                        },
                        "subtotal": { "$ifNull": ["$orderInfo.totalAmount.subTotal", 0] }
                    }]
                ]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_widths() {
        let d = doc! { "a": 1_i32, "b": 2_i64, "c": 2.5, "d": "x" };
        assert_eq!(number(&d, "a"), 1.0);
        assert_eq!(number(&d, "b"), 2.0);
        assert_eq!(number(&d, "c"), 2.5);
        assert_eq!(number(&d, "d"), 0.0);
        assert_eq!(number(&d, "missing"), 0.0);
        assert_eq!(count(&d, "b"), 2);
        assert_eq!(count(&d, "missing"), 0);
    }

    #[test]
    fn test_canonical_items_stage_targets_line_products() {
        let stage = canonical_items_stage();
        let fields = stage.get_document("$addFields").unwrap();
        assert!(fields.contains_key("orderInfo.products"));
    }
}
