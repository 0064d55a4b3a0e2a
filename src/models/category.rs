use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategoryIcon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<CategoryIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub banner_img: String,
    #[serde(default)]
    pub sub_categories: Vec<ObjectId>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A featured category with its sub-categories resolved, as shown next to banners.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithChildren {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub banner_img: Option<String>,
    #[serde(default)]
    pub sub_categories: Vec<Category>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Category can't create without a name!"))]
    pub name: String,
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Category need a description!"))]
    pub details: String,
    pub icon: Option<CategoryIcon>,
    pub image: Option<String>,
    #[validate(length(min = 1, message = "A banner image is required to create category!"))]
    pub banner_img: String,
    #[serde(default)]
    pub sub_categories: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}
