use std::sync::Arc;
use log::info;
use mongodb::bson::doc;

use crate::models::{
    is_duplicate_key, ApiError, ContactAndSocial, CreateSettingsRequest, MobileMfs, Settings, UpdateSettingsRequest,
};
use crate::services::MongoDBService;
use crate::utils::settings_merge::apply_settings_update;

fn already_exists() -> ApiError {
    ApiError::BadRequest("Settings already exist. Please update instead.".to_string())
}

/// Settings are created once; later changes go through update.
fn ensure_no_settings(existing: Option<&Settings>) -> Result<(), ApiError> {
    match existing {
        Some(_) => Err(already_exists()),
        None => Ok(()),
    }
}

pub struct SettingsService {
    mongodb_service: Arc<MongoDBService>,
}

impl SettingsService {
    pub fn new(mongodb_service: Arc<MongoDBService>) -> Self {
        Self { mongodb_service }
    }

    pub async fn create_settings(&self, request: CreateSettingsRequest) -> Result<Settings, ApiError> {
        ensure_no_settings(self.get_settings().await?.as_ref())?;

        let mut settings = Settings::from(request);
        match self.mongodb_service.settings().insert_one(&settings, None).await {
            Ok(result) => settings.id = result.inserted_id.as_object_id(),
            Err(e) if is_duplicate_key(&e) => return Err(already_exists()),
            Err(e) => return Err(ApiError::DatabaseError(e)),
        }

        info!("Site settings created");
        Ok(settings)
    }

    pub async fn get_settings(&self) -> Result<Option<Settings>, ApiError> {
        self.mongodb_service
            .settings()
            .find_one(doc! {}, None)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_logo(&self) -> Result<String, ApiError> {
        self.get_settings()
            .await?
            .and_then(|s| s.logo)
            .filter(|logo| !logo.is_empty())
            .ok_or_else(|| ApiError::NotFound("Logo not found!".to_string()))
    }

    pub async fn get_slider_images(&self) -> Result<Vec<String>, ApiError> {
        self.get_settings()
            .await?
            .map(|s| s.slider_images)
            .filter(|images| !images.is_empty())
            .ok_or_else(|| ApiError::NotFound("No slider images found!".to_string()))
    }

    pub async fn get_contact_and_social(&self) -> Result<ContactAndSocial, ApiError> {
        self.get_settings()
            .await?
            .and_then(|s| s.contact_and_social)
            .ok_or_else(|| ApiError::NotFound("Contact and social info not found!".to_string()))
    }

    pub async fn get_mobile_mfs(&self) -> Result<MobileMfs, ApiError> {
        self.get_settings()
            .await?
            .and_then(|s| s.mobile_mfs)
            .ok_or_else(|| ApiError::NotFound("Mobile MFS info not found!".to_string()))
    }

    /// Zero is a valid charge.
    pub async fn get_delivery_charge(&self) -> Result<f64, ApiError> {
        self.get_settings()
            .await?
            .and_then(|s| s.delivery_charge)
            .ok_or_else(|| ApiError::NotFound("Delivery charge not found!".to_string()))
    }

    pub async fn update_settings(&self, update: UpdateSettingsRequest) -> Result<Settings, ApiError> {
        let current = self
            .get_settings()
            .await?
            .ok_or_else(|| ApiError::NotFound("Settings not found!".to_string()))?;
        let id = current.id;

        let (settings, removed) = apply_settings_update(current, update);
        self.mongodb_service
            .settings()
            .replace_one(doc! { "_id": id }, &settings, None)
            .await
            .map_err(ApiError::DatabaseError)?;

        for image in &removed {
            info!("Slider image {} removed, deleting it from the CDN", image);
        }
        info!("Site settings updated");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn test_first_settings_may_be_created() {
        assert!(ensure_no_settings(None).is_ok());
    }

    #[test]
    fn test_second_settings_create_rejected() {
        let existing = Settings::from(serde_json::from_str::<CreateSettingsRequest>("{}").unwrap());
        let err = ensure_no_settings(Some(&existing)).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Settings already exist. Please update instead.");
    }
}
