use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::models::{ApiError, CommissionType};
use crate::utils::{parse_object_id, parse_object_ids};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Publish,
    #[default]
    Draft,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Simple,
    Variable,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrandAndCategories {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<ObjectId>,
    #[serde(default)]
    pub categories: Vec<ObjectId>,
    #[serde(default)]
    pub tags: Vec<ObjectId>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescription {
    #[validate(length(min = 1, message = "Name is Required!"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Unit is Required!"))]
    pub unit: String,
    #[validate(length(min = 1, message = "A small description is required!"))]
    pub description: String,
    #[serde(default)]
    pub status: PublishStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLink {
    pub product_url: Option<String>,
    pub button_label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    #[validate(range(min = 0.0, message = "Price must not be negative!"))]
    pub price: f64,
    #[validate(range(min = 0.0, message = "Sale price must not be negative!"))]
    pub sale_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whole_sale_price: Option<f64>,
    /// Older documents spell it this way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wholesale_price: Option<f64>,
    #[serde(default)]
    pub discount: i64,
    #[validate(range(min = 0, message = "Quantity must not be negative!"))]
    pub quantity: i64,
    #[validate(length(min = 1, message = "sku is Required!"))]
    pub sku: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub length: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_digital: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_external: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalLink>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Specification {
    pub key: String,
    pub value: String,
}

fn default_commission_type() -> CommissionType {
    CommissionType::Percentage
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductCommission {
    #[serde(default = "default_commission_type")]
    pub regular_type: CommissionType,
    #[serde(default)]
    pub regular_value: f64,
    #[serde(default = "default_commission_type")]
    pub retail_type: CommissionType,
    #[serde(default)]
    pub retail_value: f64,
    #[serde(default)]
    pub allow_manual_override: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<ObjectId>,
    pub featured_img: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default)]
    pub brand_and_categories: BrandAndCategories,
    pub description: ProductDescription,
    pub product_type: ProductType,
    pub product_info: ProductInfo,
    #[serde(default)]
    pub specifications: Vec<Specification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<ProductCommission>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn name(&self) -> &str {
        &self.description.name
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrandAndCategoriesInput {
    pub brand: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<BrandAndCategoriesInput> for BrandAndCategories {
    type Error = ApiError;

    fn try_from(input: BrandAndCategoriesInput) -> Result<Self, Self::Error> {
        Ok(BrandAndCategories {
            brand: input.brand.as_deref().map(parse_object_id).transpose()?,
            categories: parse_object_ids(&input.categories)?,
            tags: parse_object_ids(&input.tags)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub shop_id: Option<String>,
    #[validate(length(min = 1, message = "Feature image is Required!"))]
    pub featured_img: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub video: Option<String>,
    #[serde(default)]
    pub brand_and_categories: BrandAndCategoriesInput,
    #[validate]
    pub description: ProductDescription,
    pub product_type: ProductType,
    #[validate]
    pub product_info: ProductInfo,
    #[serde(default)]
    pub specifications: Vec<Specification>,
    pub commission: Option<ProductCommission>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInfoRequest {
    pub price: Option<f64>,
    pub sale_price: Option<f64>,
    pub retail_price: Option<f64>,
    pub whole_sale_price: Option<f64>,
    pub quantity: Option<i64>,
    pub sku: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub length: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub featured_img: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub video: Option<String>,
    pub brand_and_categories: Option<BrandAndCategoriesInput>,
    pub description: Option<ProductDescription>,
    pub product_type: Option<ProductType>,
    pub product_info: Option<UpdateProductInfoRequest>,
    pub specifications: Option<Vec<Specification>>,
    pub commission: Option<ProductCommission>,
}
