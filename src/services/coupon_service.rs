use std::collections::HashMap;
use std::sync::Arc;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};

use crate::models::{is_duplicate_key, ApiError, Coupon, CreateCouponRequest};
use crate::services::MongoDBService;
use crate::utils::build_list_query;

const COUPON_SEARCHABLE_FIELDS: [&str; 2] = ["code", "description"];

pub struct CouponService {
    mongodb_service: Arc<MongoDBService>,
}

impl CouponService {
    pub fn new(mongodb_service: Arc<MongoDBService>) -> Self {
        Self { mongodb_service }
    }

    pub async fn get_all_coupons(&self, params: &HashMap<String, String>) -> Result<Vec<Coupon>, ApiError> {
        let query = build_list_query(params, &COUPON_SEARCHABLE_FIELDS, doc! {});
        self.mongodb_service
            .coupons()
            .find(query.filter, query.options)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_single_coupon(&self, id: &ObjectId) -> Result<Coupon, ApiError> {
        self.mongodb_service
            .coupons()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Coupon does not exists!".to_string()))
    }

    pub async fn create_coupon(&self, request: CreateCouponRequest) -> Result<Coupon, ApiError> {
        let conflict = || ApiError::Conflict("Coupon already exists!".to_string());

        let existing = self.mongodb_service
            .coupons()
            .find_one(doc! { "code": &request.code }, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        if existing.is_some() {
            return Err(conflict());
        }

        let mut coupon = request
            .into_coupon()
            .ok_or_else(|| ApiError::ValidationError("Not a valid date string!".to_string()))?;

        match self.mongodb_service.coupons().insert_one(&coupon, None).await {
            Ok(result) => coupon.id = result.inserted_id.as_object_id(),
            Err(e) if is_duplicate_key(&e) => return Err(conflict()),
            Err(e) => return Err(ApiError::DatabaseError(e)),
        }

        info!("Created coupon {}", coupon.code);
        Ok(coupon)
    }
}
