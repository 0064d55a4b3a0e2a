use std::sync::Arc;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

use crate::config::AppConfig;
use crate::models::{
    is_duplicate_key, ApiError, AuthResponse, Claims, LoginRequest, ProviderLoginRequest, PublicUser,
    RegisterRequest, User, UserRole, UserStatus,
};
use crate::services::MongoDBService;

pub fn issue_token(secret: &str, expires_in_hours: i64, user: &User) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        user_id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(expires_in_hours)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| ApiError::InternalError(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))
}

pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))?
        .map_err(|e| ApiError::InternalError(format!("Failed to hash password: {}", e)))
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))?
        .map_err(|e| ApiError::InternalError(format!("Failed to verify password: {}", e)))
}

/// Pending and blocked accounts cannot sign in.
pub fn ensure_can_sign_in(user: &User) -> Result<(), ApiError> {
    match user.status {
        UserStatus::Pending => Err(ApiError::Unauthorized(
            "Your account is under review. Please wait for approval.".to_string(),
        )),
        UserStatus::Blocked => Err(ApiError::Forbidden("Your account is blocked. Contact support.".to_string())),
        UserStatus::Active | UserStatus::Inactive => Ok(()),
    }
}

pub struct AuthService {
    mongodb_service: Arc<MongoDBService>,
    jwt_secret: String,
    jwt_expires_in_hours: i64,
    bcrypt_salt_rounds: u32,
}

impl AuthService {
    pub fn new(mongodb_service: Arc<MongoDBService>, config: &AppConfig) -> Self {
        Self {
            mongodb_service,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expires_in_hours: config.jwt_expires_in_hours,
            bcrypt_salt_rounds: config.bcrypt_salt_rounds,
        }
    }

    async fn insert_user(&self, mut user: User) -> Result<User, ApiError> {
        let result = self.mongodb_service.users().insert_one(&user, None).await;
        match result {
            Ok(inserted) => {
                user.id = inserted.inserted_id.as_object_id();
                Ok(user)
            }
            Err(e) if is_duplicate_key(&e) => {
                Err(ApiError::Conflict("User already exists with this email!".to_string()))
            }
            Err(e) => Err(ApiError::DatabaseError(e)),
        }
    }

    async fn set_status(&self, id: &ObjectId, status: UserStatus) -> Result<User, ApiError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.mongodb_service
            .users()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": status.as_str(), "updatedAt": DateTime::now() } },
                options,
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    fn respond_with_token(&self, user: User) -> Result<AuthResponse, ApiError> {
        let access_token = issue_token(&self.jwt_secret, self.jwt_expires_in_hours, &user)?;
        Ok(AuthResponse { user: PublicUser::from(user), access_token })
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<PublicUser, ApiError> {
        if self.mongodb_service.get_user_by_email(&request.email).await?.is_some() {
            return Err(ApiError::Conflict("User already exists with this email!".to_string()));
        }

        let role = request.role.unwrap_or_default();
        let hashed = hash_password(request.password, self.bcrypt_salt_rounds).await?;
        let user = User::new(request.name, request.email, Some(hashed), role, None);
        let user = self.insert_user(user).await?;

        info!("Registered {} as {} ({})", user.email, user.role, user.status.as_str());
        Ok(PublicUser::from(user))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = self
            .mongodb_service
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiError::NotFound("User does not exist!".to_string()))?;

        let hash = user.password.clone().ok_or_else(|| {
            ApiError::BadRequest(
                "This account is registered via Google login. Please use Google login.".to_string(),
            )
        })?;

        if !verify_password(request.password, hash).await? {
            warn!("Failed login attempt for {}", request.email);
            return Err(ApiError::Unauthorized("Wrong Credentials!".to_string()));
        }

        ensure_can_sign_in(&user)?;

        let id = user.id.ok_or_else(|| ApiError::InternalError("Stored user has no id".to_string()))?;
        let user = self.set_status(&id, UserStatus::Active).await?;
        info!("User {} logged in", user.email);
        self.respond_with_token(user)
    }

    pub async fn login_with_provider(&self, request: ProviderLoginRequest) -> Result<AuthResponse, ApiError> {
        let existing = self.mongodb_service.get_user_by_email(&request.email).await?;

        let user = match existing {
            None => {
                let role = request.role.unwrap_or(UserRole::Customer);
                let user = User::new(request.name, request.email, None, role, request.image);
                let user = self.insert_user(user).await?;
                info!("Created provider account for {}", user.email);
                user
            }
            Some(user) => {
                ensure_can_sign_in(&user)?;
                let id = user.id.ok_or_else(|| ApiError::InternalError("Stored user has no id".to_string()))?;
                self.set_status(&id, UserStatus::Active).await?
            }
        };

        self.respond_with_token(user)
    }

    pub async fn logout(&self, id: &ObjectId) -> Result<(), ApiError> {
        self.set_status(id, UserStatus::Inactive).await?;
        info!("User {} logged out", id);
        Ok(())
    }

    pub async fn me(&self, claims: &Claims) -> Result<PublicUser, ApiError> {
        let id = ObjectId::parse_str(&claims.user_id)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;
        self.mongodb_service
            .get_user_by_id(&id)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Creates the configured super admin if no account uses that email yet.
    pub async fn ensure_super_admin(&self, email: &str, password: &str) -> Result<(), ApiError> {
        if let Some(user) = self.mongodb_service.get_user_by_email(email).await? {
            info!("Super admin {} already exists with role {}", email, user.role);
            return Ok(());
        }

        let hashed = hash_password(password.to_string(), self.bcrypt_salt_rounds).await?;
        let user = User::new("Super Admin".to_string(), email.to_string(), Some(hashed), UserRole::SuperAdmin, None);
        self.insert_user(user).await?;
        info!("Seeded super admin {}", email);
        Ok(())
    }
}
