use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};

use crate::models::{
    ApiError, BrandAndCategories, Brand, Category, CreateBrandRequest, CreateCategoryRequest, CreateProductRequest,
    Product, UpdateProductRequest,
};
use crate::services::MongoDBService;
use crate::utils::{build_list_query, calculate_discount, parse_object_id, parse_object_ids};

const PRODUCT_SEARCHABLE_FIELDS: [&str; 3] = ["description.name", "description.slug", "productInfo.sku"];
const CATEGORY_SEARCHABLE_FIELDS: [&str; 2] = ["name", "slug"];
const BRAND_SEARCHABLE_FIELDS: [&str; 1] = ["name"];

/// Lowercase, ASCII alphanumerics joined by single dashes.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Applies a partial update and recomputes the discount from the merged prices.
pub fn apply_product_update(product: &mut Product, update: UpdateProductRequest) -> Result<(), ApiError> {
    if let Some(v) = update.featured_img {
        product.featured_img = v;
    }
    if let Some(v) = update.gallery {
        product.gallery = v;
    }
    if let Some(v) = update.video {
        product.video = Some(v);
    }
    if let Some(v) = update.brand_and_categories {
        product.brand_and_categories = BrandAndCategories::try_from(v)?;
    }
    if let Some(mut v) = update.description {
        if v.slug.is_none() {
            v.slug = Some(slugify(&v.name));
        }
        product.description = v;
    }
    if let Some(v) = update.product_type {
        product.product_type = v;
    }
    if let Some(v) = update.specifications {
        product.specifications = v;
    }
    if let Some(v) = update.commission {
        product.commission = Some(v);
    }
    if let Some(info) = update.product_info {
        let target = &mut product.product_info;
        if let Some(v) = info.price {
            target.price = v;
        }
        if let Some(v) = info.sale_price {
            target.sale_price = v;
        }
        if let Some(v) = info.retail_price {
            target.retail_price = Some(v);
        }
        if let Some(v) = info.whole_sale_price {
            target.whole_sale_price = Some(v);
        }
        if let Some(v) = info.quantity {
            if v < 0 {
                return Err(ApiError::BadRequest("Quantity must not be negative!".to_string()));
            }
            target.quantity = v;
        }
        if let Some(v) = info.sku {
            target.sku = v;
        }
        if let Some(v) = info.width {
            target.width = v;
        }
        if let Some(v) = info.height {
            target.height = v;
        }
        if let Some(v) = info.length {
            target.length = v;
        }
        target.discount = calculate_discount(target.price, target.sale_price);
    }
    product.updated_at = Utc::now();
    Ok(())
}

pub struct CatalogService {
    mongodb_service: Arc<MongoDBService>,
}

impl CatalogService {
    pub fn new(mongodb_service: Arc<MongoDBService>) -> Self {
        Self { mongodb_service }
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product, ApiError> {
        let now = Utc::now();
        let mut description = request.description;
        if description.slug.is_none() {
            description.slug = Some(slugify(&description.name));
        }
        let mut product_info = request.product_info;
        product_info.discount = calculate_discount(product_info.price, product_info.sale_price);

        let mut product = Product {
            id: None,
            shop_id: request.shop_id.as_deref().map(parse_object_id).transpose()?,
            featured_img: request.featured_img,
            gallery: request.gallery,
            video: request.video,
            brand_and_categories: BrandAndCategories::try_from(request.brand_and_categories)?,
            description,
            product_type: request.product_type,
            product_info,
            specifications: request.specifications,
            commission: request.commission,
            created_at: now,
            updated_at: now,
        };

        let result = self.mongodb_service
            .products()
            .insert_one(&product, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        product.id = result.inserted_id.as_object_id();

        info!("Created product {} ({}% off)", product.name(), product.product_info.discount);
        Ok(product)
    }

    pub async fn get_product(&self, id: &ObjectId) -> Result<Product, ApiError> {
        self.mongodb_service
            .products()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Product does not exist!".to_string()))
    }

    pub async fn get_products(&self, params: &HashMap<String, String>) -> Result<Vec<Product>, ApiError> {
        let query = build_list_query(params, &PRODUCT_SEARCHABLE_FIELDS, doc! {});
        self.mongodb_service
            .products()
            .find(query.filter, query.options)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn update_product(&self, id: &ObjectId, update: UpdateProductRequest) -> Result<Product, ApiError> {
        let mut product = self.get_product(id).await?;
        apply_product_update(&mut product, update)?;

        self.mongodb_service
            .products()
            .replace_one(doc! { "_id": id }, &product, None)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Updated product {}", id);
        Ok(product)
    }

    pub async fn delete_product(&self, id: &ObjectId) -> Result<(), ApiError> {
        let result = self.mongodb_service
            .products()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        if result.deleted_count == 0 {
            return Err(ApiError::NotFound("Product does not exist!".to_string()));
        }
        info!("Deleted product {}", id);
        Ok(())
    }

    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, ApiError> {
        let now = Utc::now();
        let mut category = Category {
            id: None,
            slug: Some(request.slug.unwrap_or_else(|| slugify(&request.name))),
            name: request.name,
            details: request.details,
            icon: request.icon,
            image: request.image,
            banner_img: request.banner_img,
            sub_categories: parse_object_ids(&request.sub_categories)?,
            is_featured: request.is_featured,
            created_at: now,
            updated_at: now,
        };

        let result = self.mongodb_service
            .categories()
            .insert_one(&category, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        category.id = result.inserted_id.as_object_id();

        info!("Created category {}", category.name);
        Ok(category)
    }

    pub async fn get_categories(&self, params: &HashMap<String, String>) -> Result<Vec<Category>, ApiError> {
        let query = build_list_query(params, &CATEGORY_SEARCHABLE_FIELDS, doc! {});
        self.mongodb_service
            .categories()
            .find(query.filter, query.options)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_category(&self, id: &ObjectId) -> Result<Category, ApiError> {
        self.mongodb_service
            .categories()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Category does not exist!".to_string()))
    }

    pub async fn create_brand(&self, request: CreateBrandRequest) -> Result<Brand, ApiError> {
        let now = Utc::now();
        let mut brand = Brand {
            id: None,
            name: request.name,
            logo: request.logo,
            description: request.description,
            created_at: now,
            updated_at: now,
        };

        let result = self.mongodb_service
            .brands()
            .insert_one(&brand, None)
            .await
            .map_err(ApiError::DatabaseError)?;
        brand.id = result.inserted_id.as_object_id();

        info!("Created brand {}", brand.name);
        Ok(brand)
    }

    pub async fn get_brands(&self, params: &HashMap<String, String>) -> Result<Vec<Brand>, ApiError> {
        let query = build_list_query(params, &BRAND_SEARCHABLE_FIELDS, doc! {});
        self.mongodb_service
            .brands()
            .find(query.filter, query.options)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_brand(&self, id: &ObjectId) -> Result<Brand, ApiError> {
        self.mongodb_service
            .brands()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Brand does not exist!".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductDescription, ProductInfo, ProductType, PublishStatus, UpdateProductInfoRequest};

    fn product() -> Product {
        let now = Utc::now();
        Product {
            id: Some(ObjectId::new()),
            shop_id: None,
            featured_img: "img.png".into(),
            gallery: vec![],
            video: None,
            brand_and_categories: BrandAndCategories::default(),
            description: ProductDescription {
                name: "Basmati Rice".into(),
                slug: Some("basmati-rice".into()),
                unit: "kg".into(),
                description: "Long grain".into(),
                status: PublishStatus::Draft,
            },
            product_type: ProductType::Simple,
            product_info: ProductInfo {
                price: 1000.0,
                sale_price: 800.0,
                retail_price: None,
                whole_sale_price: None,
                wholesale_price: None,
                discount: 20,
                quantity: 5,
                sku: "BR-1".into(),
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

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Basmati Rice 5kg!"), "basmati-rice-5kg");
        assert_eq!(slugify("  Men's  T-Shirt "), "men-s-t-shirt");
    }

    #[test]
    fn test_update_recomputes_discount_from_merged_prices() {
        let mut p = product();
        let update = UpdateProductRequest {
            product_info: Some(UpdateProductInfoRequest { sale_price: Some(500.0), ..Default::default() }),
            ..Default::default()
        };
        apply_product_update(&mut p, update).unwrap();
        assert_eq!(p.product_info.price, 1000.0);
        assert_eq!(p.product_info.discount, 50);
    }

    #[test]
    fn test_update_clearing_sale_price_clears_discount() {
        let mut p = product();
        let update = UpdateProductRequest {
            product_info: Some(UpdateProductInfoRequest { sale_price: Some(0.0), quantity: Some(9), ..Default::default() }),
            ..Default::default()
        };
        apply_product_update(&mut p, update).unwrap();
        assert_eq!(p.product_info.discount, 0);
        assert_eq!(p.product_info.quantity, 9);
    }

    #[test]
    fn test_update_rejects_negative_stock() {
        let mut p = product();
        let update = UpdateProductRequest {
            product_info: Some(UpdateProductInfoRequest { quantity: Some(-1), ..Default::default() }),
            ..Default::default()
        };
        assert!(apply_product_update(&mut p, update).is_err());
    }

    #[test]
    fn test_update_without_prices_keeps_discount() {
        let mut p = product();
        let update = UpdateProductRequest { featured_img: Some("new.png".into()), ..Default::default() };
        apply_product_update(&mut p, update).unwrap();
        assert_eq!(p.featured_img, "new.png");
        assert_eq!(p.product_info.discount, 20);
    }
}
