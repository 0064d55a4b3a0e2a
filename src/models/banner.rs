use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::models::CategoryWithChildren;

pub const MAX_BANNERS: i64 = 6;

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub sub_title: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBannerRequest {
    #[validate(length(min = 1, message = "Title is required!"))]
    pub title: String,
    #[validate(length(min = 1, message = "Sub title is required!"))]
    pub sub_title: String,
    #[validate(length(min = 1, message = "Image is required!"))]
    pub image: String,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub discount: Option<f64>,
    pub tag: Option<String>,
    pub is_active: Option<bool>,
}

impl From<CreateBannerRequest> for Banner {
    fn from(req: CreateBannerRequest) -> Self {
        let now = Utc::now();
        Banner {
            id: None,
            title: req.title,
            sub_title: req.sub_title,
            image: req.image,
            button_text: req.button_text,
            button_link: req.button_link,
            discount: req.discount,
            tag: req.tag,
            is_active: req.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBannerRequest {
    #[validate(length(min = 1, message = "Title must not be empty!"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Sub title must not be empty!"))]
    pub sub_title: Option<String>,
    #[validate(length(min = 1, message = "Image must not be empty!"))]
    pub image: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub discount: Option<f64>,
    pub tag: Option<String>,
    pub is_active: Option<bool>,
}

/// Homepage payload: every banner plus the featured categories.
#[derive(Debug, Serialize)]
pub struct BannerListing {
    pub banners: Vec<Banner>,
    pub categories: Vec<CategoryWithChildren>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_active_by_default() {
        let req: CreateBannerRequest =
            serde_json::from_str(r#"{"title":"Eid Sale","subTitle":"Up to 50%","image":"https://cdn/b.png"}"#).unwrap();
        assert!(req.validate().is_ok());
        let banner = Banner::from(req);
        assert!(banner.is_active);
        assert!(banner.id.is_none());
    }

    #[test]
    fn test_banner_requires_title() {
        let req: CreateBannerRequest =
            serde_json::from_str(r#"{"title":"","subTitle":"x","image":"y"}"#).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("title"));
    }
}
