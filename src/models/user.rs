use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    #[default]
    #[serde(rename = "customer")]
    Customer,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super-admin")]
    SuperAdmin,
    #[serde(rename = "sr")]
    SalesRep,
    #[serde(rename = "vendor")]
    Vendor,
}

impl UserRole {
    /// Roles that are usable right after registration; others wait for approval.
    pub fn is_auto_activated(&self) -> bool {
        matches!(self, UserRole::Customer | UserRole::Admin | UserRole::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "super-admin",
            UserRole::SalesRep => "sr",
            UserRole::Vendor => "vendor",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Active,
    Inactive,
    Blocked,
}

impl UserStatus {
    pub fn initial_for(role: UserRole) -> Self {
        if role.is_auto_activated() {
            UserStatus::Active
        } else {
            UserStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub commission_balance: f64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password: Option<String>, role: UserRole, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            email,
            password,
            role,
            status: UserStatus::initial_for(role),
            image,
            commission_balance: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What the API exposes of a user; never carries the password hash.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub image: Option<String>,
    pub commission_balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: u.name,
            email: u.email,
            role: u.role,
            status: u.status,
            image: u.image,
            commission_balance: u.commission_balance,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 40, message = "Name must be between 1 and 40 characters!"))]
    pub name: String,
    #[validate(email(message = "Invalid email format!"), length(max = 50, message = "Email must be less than 50 characters!"))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters!"))]
    pub password: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format!"), length(max = 50, message = "Email must be less than 50 characters!"))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters!"))]
    pub password: String,
}

/// Profile already verified by an external identity provider.
#[derive(Debug, Deserialize, Validate)]
pub struct ProviderLoginRequest {
    #[validate(length(min = 1, max = 40, message = "Name must be between 1 and 40 characters!"))]
    pub name: String,
    #[validate(email(message = "Invalid email format!"), length(max = 50, message = "Email must be less than 50 characters!"))]
    pub email: String,
    pub image: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: PublicUser,
    pub access_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format!"))]
    pub email: String,
    #[validate(length(min = 1, max = 40, message = "Name must be between 1 and 40 characters!"))]
    pub name: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters!"))]
    pub password: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_by_role() {
        assert_eq!(UserStatus::initial_for(UserRole::Customer), UserStatus::Active);
        assert_eq!(UserStatus::initial_for(UserRole::Admin), UserStatus::Active);
        assert_eq!(UserStatus::initial_for(UserRole::SuperAdmin), UserStatus::Active);
        assert_eq!(UserStatus::initial_for(UserRole::Vendor), UserStatus::Pending);
        assert_eq!(UserStatus::initial_for(UserRole::SalesRep), UserStatus::Pending);
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&UserRole::SuperAdmin).unwrap(), "\"super-admin\"");
        assert_eq!(serde_json::to_string(&UserRole::SalesRep).unwrap(), "\"sr\"");
        let role: UserRole = serde_json::from_str("\"vendor\"").unwrap();
        assert_eq!(role, UserRole::Vendor);
    }

    #[test]
    fn test_public_user_drops_password() {
        let mut user = User::new("Rahim".into(), "rahim@example.com".into(), Some("hash".into()), UserRole::Customer, None);
        user.id = Some(ObjectId::new());
        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_register_validation() {
        let request = RegisterRequest {
            name: "".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            role: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
