use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};

use crate::utils::parse_date;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    Fixed,
    Percentage,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub image: String,
    pub code: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CouponType,
    pub discount_amount: f64,
    #[serde(default)]
    pub is_verified_customer: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub active_date: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub expire_date: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value).map(|_| ()).ok_or_else(|| {
        let mut err = ValidationError::new("date");
        err.message = Some("Not a valid date string!".into());
        err
    })
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    #[validate(url(message = "Invalid image URL!"))]
    pub image: String,
    #[validate(length(min = 1, message = "Code is required!"))]
    pub code: String,
    #[validate(length(min = 1, message = "Description is required!"))]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CouponType,
    pub discount_amount: f64,
    #[serde(default)]
    pub is_verified_customer: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[validate(custom = "validate_date")]
    pub active_date: String,
    #[validate(custom = "validate_date")]
    pub expire_date: String,
}

impl CreateCouponRequest {
    /// Call after `validate()`; dates that fail to parse are reported as `None`.
    pub fn into_coupon(self) -> Option<Coupon> {
        let active_date = parse_date(&self.active_date)?;
        let expire_date = parse_date(&self.expire_date)?;
        let now = Utc::now();
        Some(Coupon {
            id: None,
            image: self.image,
            code: self.code,
            description: self.description,
            kind: self.kind,
            discount_amount: self.discount_amount,
            is_verified_customer: self.is_verified_customer,
            is_approved: self.is_approved,
            active_date,
            expire_date,
            created_at: now,
            updated_at: now,
        })
    }
}
