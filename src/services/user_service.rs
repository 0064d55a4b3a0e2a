use std::collections::HashMap;
use std::sync::Arc;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};

use crate::models::{ApiError, PublicUser, UpdateUserRequest, User, UserRole, UserStatus};
use crate::services::auth_service::hash_password;
use crate::services::MongoDBService;
use crate::utils::build_list_query;

const VENDOR_SEARCHABLE_FIELDS: [&str; 2] = ["name", "email"];

pub struct UserService {
    mongodb_service: Arc<MongoDBService>,
    bcrypt_salt_rounds: u32,
}

impl UserService {
    pub fn new(mongodb_service: Arc<MongoDBService>, bcrypt_salt_rounds: u32) -> Self {
        Self { mongodb_service, bcrypt_salt_rounds }
    }

    async fn find_users(&self, filter: Document, options: Option<FindOptions>) -> Result<Vec<PublicUser>, ApiError> {
        let users: Vec<User> = self
            .mongodb_service
            .users()
            .find(filter, options)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    async fn find_user(&self, id: &ObjectId) -> Result<User, ApiError> {
        self.mongodb_service
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User does not exist!".to_string()))
    }

    pub async fn get_all_users(&self) -> Result<Vec<PublicUser>, ApiError> {
        self.find_users(doc! {}, None).await
    }

    pub async fn get_user(&self, id: &ObjectId) -> Result<PublicUser, ApiError> {
        self.find_user(id).await.map(PublicUser::from)
    }

    pub async fn get_admins(&self) -> Result<Vec<PublicUser>, ApiError> {
        self.find_users(doc! { "role": UserRole::Admin.as_str() }, None).await
    }

    pub async fn get_super_admin(&self, id: &ObjectId) -> Result<PublicUser, ApiError> {
        let user = self.find_user(id).await?;
        if user.role != UserRole::SuperAdmin {
            return Err(ApiError::Unauthorized("Unauthorized User!".to_string()));
        }
        Ok(PublicUser::from(user))
    }

    pub async fn get_vendors(&self, params: &HashMap<String, String>) -> Result<Vec<PublicUser>, ApiError> {
        let query = build_list_query(params, &VENDOR_SEARCHABLE_FIELDS, doc! { "role": UserRole::Vendor.as_str() });
        self.find_users(query.filter, Some(query.options)).await
    }

    /// The caller must echo the account's email; the email itself never changes.
    pub async fn update_user(&self, id: &ObjectId, request: UpdateUserRequest) -> Result<PublicUser, ApiError> {
        let existing = self.find_user(id).await?;
        if existing.email != request.email {
            return Err(ApiError::Unauthorized("Unauthorized User!".to_string()));
        }

        let mut set = doc! { "updatedAt": DateTime::now() };
        if let Some(name) = request.name {
            set.insert("name", name);
        }
        if let Some(image) = request.image {
            set.insert("image", image);
        }
        if let Some(password) = request.password {
            set.insert("password", hash_password(password, self.bcrypt_salt_rounds).await?);
        }

        let user = self.update(id, set).await?;
        info!("Updated profile of {}", user.email);
        Ok(PublicUser::from(user))
    }

    pub async fn update_status(&self, id: &ObjectId, status: UserStatus) -> Result<PublicUser, ApiError> {
        let user = self
            .update(id, doc! { "status": status.as_str(), "updatedAt": DateTime::now() })
            .await?;
        info!("Status of {} set to {}", user.email, status.as_str());
        Ok(PublicUser::from(user))
    }

    async fn update(&self, id: &ObjectId, set: Document) -> Result<User, ApiError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.mongodb_service
            .users()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("User does not exist!".to_string()))
    }
}
