use std::sync::Arc;
use chrono::Utc;
use futures_util::TryStreamExt;
use log::{info, warn};
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

use crate::models::{
    ApiError, Banner, BannerListing, CategoryWithChildren, CreateBannerRequest, UpdateBannerRequest, MAX_BANNERS,
};
use crate::services::MongoDBService;

fn featured_categories_pipeline() -> Vec<Document> {
    vec![
        doc! { "$match": { "isFeatured": true } },
        doc! {
            "$lookup": {
                "from": "categories",
                "localField": "subCategories",
                "foreignField": "_id",
                "as": "subCategories",
            }
        },
    ]
}

fn banner_changes(update: UpdateBannerRequest) -> Document {
    let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(Utc::now()) };
    if let Some(v) = update.title {
        set.insert("title", v);
    }
    if let Some(v) = update.sub_title {
        set.insert("subTitle", v);
    }
    if let Some(v) = update.image {
        set.insert("image", v);
    }
    if let Some(v) = update.button_text {
        set.insert("buttonText", v);
    }
    if let Some(v) = update.button_link {
        set.insert("buttonLink", v);
    }
    if let Some(v) = update.discount {
        set.insert("discount", v);
    }
    if let Some(v) = update.tag {
        set.insert("tag", v);
    }
    if let Some(v) = update.is_active {
        set.insert("isActive", v);
    }
    set
}

pub struct BannerService {
    mongodb_service: Arc<MongoDBService>,
}

impl BannerService {
    pub fn new(mongodb_service: Arc<MongoDBService>) -> Self {
        Self { mongodb_service }
    }

    pub async fn create_banner(&self, request: CreateBannerRequest) -> Result<Banner, ApiError> {
        if !self.mongodb_service.reserve_banner_slot().await? {
            return Err(ApiError::BadRequest(format!(
                "Maximum {} banners allowed. Please delete an existing banner before adding a new one.",
                MAX_BANNERS
            )));
        }

        let mut banner = Banner::from(request);
        match self.mongodb_service.banners().insert_one(&banner, None).await {
            Ok(result) => banner.id = result.inserted_id.as_object_id(),
            Err(e) => {
                if let Err(release_err) = self.mongodb_service.release_banner_slot().await {
                    warn!("Failed to release banner slot: {}", release_err);
                }
                return Err(ApiError::DatabaseError(e));
            }
        }

        info!("Created banner {}", banner.title);
        Ok(banner)
    }

    pub async fn update_banner(&self, id: &ObjectId, update: UpdateBannerRequest) -> Result<Banner, ApiError> {
        let not_found = || ApiError::BadRequest("Banner not Found!".to_string());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let banner = self.mongodb_service
            .banners()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": banner_changes(update) }, options)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(not_found)?;

        info!("Updated banner {}", id);
        Ok(banner)
    }

    pub async fn get_all_banners(&self) -> Result<BannerListing, ApiError> {
        let banners: Vec<Banner> = self.mongodb_service
            .banners()
            .find(doc! {}, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;

        let rows: Vec<Document> = self.mongodb_service
            .categories()
            .aggregate(featured_categories_pipeline(), None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;
        let categories = rows
            .into_iter()
            .map(bson::from_document::<CategoryWithChildren>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BannerListing { banners, categories })
    }

    pub async fn delete_banner(&self, id: &ObjectId) -> Result<(), ApiError> {
        let result = self.mongodb_service
            .banners()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        if result.deleted_count == 0 {
            return Err(ApiError::NotFound("Banner not Found!".to_string()));
        }

        self.mongodb_service.release_banner_slot().await?;
        info!("Deleted banner {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_changes_only_touch_given_fields() {
        let update = UpdateBannerRequest {
            title: Some("Winter Sale".into()),
            is_active: Some(false),
            ..Default::default()
        };
        let set = banner_changes(update);
        assert_eq!(set.get_str("title").unwrap(), "Winter Sale");
        assert!(!set.get_bool("isActive").unwrap());
        assert!(set.contains_key("updatedAt"));
        assert!(!set.contains_key("subTitle"));
        assert!(!set.contains_key("image"));
    }

    #[test]
    fn test_featured_categories_resolve_children() {
        let pipeline = featured_categories_pipeline();
        assert!(pipeline[0].get_document("$match").unwrap().get_bool("isFeatured").unwrap());
        let lookup = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("as").unwrap(), "subCategories");
    }
}
