use mongodb::{Client, Collection};
use mongodb::bson::{doc, Document, oid::ObjectId};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion, IndexOptions, UpdateOptions};
use mongodb::IndexModel;
use futures_util::TryStreamExt;

use crate::config::AppConfig;
use crate::models::{
    is_duplicate_key, ApiError, Banner, Brand, Category, Coupon, Order, Product, Settings, User, MAX_BANNERS,
};

const BANNER_COUNTER_ID: &str = "banners";

/// Matches the counter only while a slot is free.
fn banner_slot_filter() -> Document {
    doc! { "_id": BANNER_COUNTER_ID, "count": { "$lt": MAX_BANNERS } }
}

#[derive(Clone)]
pub struct MongoDBService {
    users: Collection<User>,
    products: Collection<Product>,
    categories: Collection<Category>,
    brands: Collection<Brand>,
    orders: Collection<Order>,
    settings: Collection<Settings>,
    banners: Collection<Banner>,
    coupons: Collection<Coupon>,
    shops: Collection<Document>,
    counters: Collection<Document>,
}

impl MongoDBService {
    pub async fn init(config: &AppConfig) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;

        let server_api = ServerApi::builder()
            .version(ServerApiVersion::V1)
            .build();
        client_options.server_api = Some(server_api);

        client_options.connect_timeout = Some(std::time::Duration::from_secs(10));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        client
            .database("admin")
            .run_command(doc! {"ping": 1}, None)
            .await?;

        log::info!("Successfully connected to MongoDB, using database {}", config.database_name);

        let db = client.database(&config.database_name);
        let service = Self {
            users: db.collection("users"),
            products: db.collection("products"),
            categories: db.collection("categories"),
            brands: db.collection("brands"),
            orders: db.collection("orders"),
            settings: db.collection("settings"),
            banners: db.collection("banners"),
            coupons: db.collection("coupons"),
            shops: db.collection("shops"),
            counters: db.collection("counters"),
        };

        service.create_indexes().await?;
        service.reconcile_banner_counter().await?;

        Ok(service)
    }

    async fn create_indexes(&self) -> Result<(), mongodb::error::Error> {
        let unique = || IndexOptions::builder().unique(true).build();

        let email_model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique())
            .build();
        self.users.create_index(email_model, None).await?;

        let code_model = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(unique())
            .build();
        self.coupons.create_index(code_model, None).await?;

        // at most one settings document
        let singleton_model = IndexModel::builder()
            .keys(doc! { "singleton": 1 })
            .options(unique())
            .build();
        self.settings.create_index(singleton_model, None).await?;

        let order_by_model = IndexModel::builder()
            .keys(doc! { "orderInfo.orderBy": 1 })
            .build();
        self.orders.create_index(order_by_model, None).await?;

        let vendor_model = IndexModel::builder()
            .keys(doc! { "orderInfo.vendorId": 1, "createdAt": -1 })
            .build();
        self.orders.create_index(vendor_model, None).await?;

        let created_model = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .build();
        self.orders.create_index(created_model, None).await?;

        let featured_model = IndexModel::builder()
            .keys(doc! { "isFeatured": 1 })
            .build();
        self.categories.create_index(featured_model, None).await?;

        log::info!("MongoDB indexes are in place");
        Ok(())
    }

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn products(&self) -> &Collection<Product> {
        &self.products
    }

    pub fn categories(&self) -> &Collection<Category> {
        &self.categories
    }

    pub fn brands(&self) -> &Collection<Brand> {
        &self.brands
    }

    pub fn orders(&self) -> &Collection<Order> {
        &self.orders
    }

    pub fn settings(&self) -> &Collection<Settings> {
        &self.settings
    }

    pub fn banners(&self) -> &Collection<Banner> {
        &self.banners
    }

    pub fn coupons(&self) -> &Collection<Coupon> {
        &self.coupons
    }

    pub fn shops(&self) -> &Collection<Document> {
        &self.shops
    }

    pub async fn get_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, ApiError> {
        self.users
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        self.users
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_products_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.products
            .find(doc! { "_id": { "$in": ids } }, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }

    /// Takes one of the banner slots. Returns false when all are in use.
    pub async fn reserve_banner_slot(&self) -> Result<bool, ApiError> {
        let options = UpdateOptions::builder().upsert(true).build();
        let result = self.counters
            .update_one(
                banner_slot_filter(),
                doc! { "$inc": { "count": 1 } },
                options,
            )
            .await;

        match result {
            Ok(_) => Ok(true),
            // the counter exists but is full, so the upsert collides on _id
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(ApiError::DatabaseError(e)),
        }
    }

    pub async fn release_banner_slot(&self) -> Result<(), ApiError> {
        self.counters
            .update_one(
                doc! { "_id": BANNER_COUNTER_ID, "count": { "$gt": 0 } },
                doc! { "$inc": { "count": -1 } },
                None,
            )
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(())
    }

    async fn reconcile_banner_counter(&self) -> Result<(), mongodb::error::Error> {
        let count = self.banners.count_documents(doc! {}, None).await? as i64;
        let options = UpdateOptions::builder().upsert(true).build();
        self.counters
            .update_one(
                doc! { "_id": BANNER_COUNTER_ID },
                doc! { "$set": { "count": count } },
                options,
            )
            .await?;
        log::info!("Banner counter reconciled at {}", count);
        Ok(())
    }
}
