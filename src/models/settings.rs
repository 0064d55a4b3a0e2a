use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::models::ApiError;

pub const MAX_SLIDER_IMAGES: usize = 3;

fn default_popup_delay() -> i64 {
    2000
}

fn singleton_key() -> String {
    "settings".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct Policy {
    #[validate(length(min = 1, message = "Policy title is required!"))]
    pub title: String,
    #[validate(length(min = 1, message = "Policy description is required!"))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactAndSocial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_link: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MobileWallet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MobileMfs {
    #[serde(rename = "bKash", default, skip_serializing_if = "Option::is_none")]
    pub bkash: Option<MobileWallet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nagad: Option<MobileWallet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rocket: Option<MobileWallet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upay: Option<MobileWallet>,
}

/// Site-wide settings. The collection holds a single document, pinned by a
/// unique index on `singleton`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default = "singleton_key")]
    pub singleton: String,
    #[serde(default)]
    pub enable_homepage_popup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_description: Option<String>,
    #[serde(default = "default_popup_delay")]
    pub popup_delay: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub slider_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy: Option<Policy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<Policy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_and_social: Option<ContactAndSocial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_mfs: Option<MobileMfs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_charge: Option<f64>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// Body returned to clients. The `singleton` storage key is left out.
    pub fn to_response(&self) -> Result<serde_json::Value, ApiError> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| ApiError::InternalError(format!("Serialization error: {}", e)))?;
        if let Some(fields) = value.as_object_mut() {
            fields.remove("singleton");
        }
        Ok(value)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettingsRequest {
    #[serde(default)]
    pub enable_homepage_popup: bool,
    pub popup_title: Option<String>,
    pub popup_description: Option<String>,
    #[validate(range(min = 0, message = "Popup delay must not be negative!"))]
    pub popup_delay: Option<i64>,
    pub popup_image: Option<String>,
    pub logo: Option<String>,
    #[serde(default)]
    #[validate(length(max = 3, message = "You can upload a maximum of 3 slider images!"))]
    pub slider_images: Vec<String>,
    #[validate]
    pub privacy_policy: Option<Policy>,
    #[validate]
    pub return_policy: Option<Policy>,
    pub contact_and_social: Option<ContactAndSocial>,
    pub mobile_mfs: Option<MobileMfs>,
    #[validate(range(min = 0.0, message = "Delivery charge must not be negative!"))]
    pub delivery_charge: Option<f64>,
}

impl From<CreateSettingsRequest> for Settings {
    fn from(req: CreateSettingsRequest) -> Self {
        let now = Utc::now();
        Settings {
            id: None,
            singleton: singleton_key(),
            enable_homepage_popup: req.enable_homepage_popup,
            popup_title: req.popup_title,
            popup_description: req.popup_description,
            popup_delay: req.popup_delay.unwrap_or_else(default_popup_delay),
            popup_image: req.popup_image,
            logo: req.logo,
            slider_images: req.slider_images,
            privacy_policy: req.privacy_policy,
            return_policy: req.return_policy,
            contact_and_social: req.contact_and_social,
            mobile_mfs: req.mobile_mfs,
            delivery_charge: req.delivery_charge,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub enable_homepage_popup: Option<bool>,
    pub popup_title: Option<String>,
    pub popup_description: Option<String>,
    #[validate(range(min = 0, message = "Popup delay must not be negative!"))]
    pub popup_delay: Option<i64>,
    pub popup_image: Option<String>,
    pub logo: Option<String>,
    pub slider_images: Option<Vec<String>>,
    #[serde(default)]
    pub deleted_slider_images: Vec<String>,
    #[validate]
    pub privacy_policy: Option<Policy>,
    #[validate]
    pub return_policy: Option<Policy>,
    pub contact_and_social: Option<ContactAndSocial>,
    pub mobile_mfs: Option<MobileMfs>,
    #[validate(range(min = 0.0, message = "Delivery charge must not be negative!"))]
    pub delivery_charge: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateSettingsRequest = serde_json::from_str(r#"{"logo":"https://cdn/logo.png"}"#).unwrap();
        let settings = Settings::from(req);
        assert_eq!(settings.popup_delay, 2000);
        assert_eq!(settings.singleton, "settings");
        assert!(!settings.enable_homepage_popup);
        assert!(settings.slider_images.is_empty());
    }

    #[test]
    fn test_response_hides_singleton_key() {
        let req: CreateSettingsRequest = serde_json::from_str(r#"{"logo":"https://cdn/logo.png"}"#).unwrap();
        let body = Settings::from(req).to_response().unwrap();
        assert!(body.get("singleton").is_none());
        assert_eq!(body["logo"], "https://cdn/logo.png");
        assert_eq!(body["popupDelay"], 2000);
    }

    #[test]
    fn test_too_many_slider_images_rejected() {
        let req: CreateSettingsRequest =
            serde_json::from_str(r#"{"sliderImages":["a","b","c","d"]}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_bkash_wire_name() {
        let mfs: MobileMfs = serde_json::from_str(r#"{"bKash":{"number":"017","accountType":"personal"}}"#).unwrap();
        let bkash = mfs.bkash.unwrap();
        assert_eq!(bkash.number.as_deref(), Some("017"));
        assert_eq!(bkash.account_type.as_deref(), Some("personal"));
    }
}
