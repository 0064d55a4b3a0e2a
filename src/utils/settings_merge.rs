use chrono::Utc;

use crate::models::{
    ContactAndSocial, MobileMfs, MobileWallet, Settings, UpdateSettingsRequest, MAX_SLIDER_IMAGES,
};

/// Old images followed by new ones, without duplicates, capped at three.
/// Deleted images are removed after the cap.
pub fn merge_slider_images(existing: &[String], incoming: Option<&[String]>, deleted: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for image in existing.iter().chain(incoming.unwrap_or_default()) {
        if !merged.contains(image) {
            merged.push(image.clone());
        }
    }
    merged.truncate(MAX_SLIDER_IMAGES);
    merged.retain(|image| !deleted.contains(image));
    merged
}

pub fn merge_contact_and_social(existing: Option<ContactAndSocial>, incoming: ContactAndSocial) -> ContactAndSocial {
    let old = existing.unwrap_or_default();
    ContactAndSocial {
        address: incoming.address.or(old.address),
        email: incoming.email.or(old.email),
        phone: incoming.phone.or(old.phone),
        facebook_url: incoming.facebook_url.or(old.facebook_url),
        instagram_url: incoming.instagram_url.or(old.instagram_url),
        youtube_url: incoming.youtube_url.or(old.youtube_url),
        whatsapp_link: incoming.whatsapp_link.or(old.whatsapp_link),
    }
}

fn merge_wallet(existing: Option<MobileWallet>, incoming: Option<MobileWallet>) -> Option<MobileWallet> {
    match (existing, incoming) {
        (None, None) => None,
        (old, new) => {
            let old = old.unwrap_or_default();
            let new = new.unwrap_or_default();
            Some(MobileWallet {
                number: new.number.or(old.number),
                account_type: new.account_type.or(old.account_type),
                logo: new.logo.or(old.logo),
            })
        }
    }
}

pub fn merge_mobile_mfs(existing: Option<MobileMfs>, incoming: MobileMfs) -> MobileMfs {
    let old = existing.unwrap_or_default();
    MobileMfs {
        bkash: merge_wallet(old.bkash, incoming.bkash),
        nagad: merge_wallet(old.nagad, incoming.nagad),
        rocket: merge_wallet(old.rocket, incoming.rocket),
        upay: merge_wallet(old.upay, incoming.upay),
    }
}

/// Applies a partial update. Returns the merged document and the slider
/// images that were removed from it.
pub fn apply_settings_update(mut settings: Settings, update: UpdateSettingsRequest) -> (Settings, Vec<String>) {
    let before = settings.slider_images.clone();
    settings.slider_images = merge_slider_images(
        &settings.slider_images,
        update.slider_images.as_deref(),
        &update.deleted_slider_images,
    );
    let removed = before.into_iter().filter(|img| !settings.slider_images.contains(img)).collect();

    if let Some(v) = update.enable_homepage_popup {
        settings.enable_homepage_popup = v;
    }
    if let Some(v) = update.popup_title {
        settings.popup_title = Some(v);
    }
    if let Some(v) = update.popup_description {
        settings.popup_description = Some(v);
    }
    if let Some(v) = update.popup_delay {
        settings.popup_delay = v;
    }
    if let Some(v) = update.popup_image {
        settings.popup_image = Some(v);
    }
    if let Some(v) = update.logo {
        settings.logo = Some(v);
    }
    if let Some(v) = update.privacy_policy {
        settings.privacy_policy = Some(v);
    }
    if let Some(v) = update.return_policy {
        settings.return_policy = Some(v);
    }
    if let Some(v) = update.delivery_charge {
        settings.delivery_charge = Some(v);
    }
    if let Some(incoming) = update.contact_and_social {
        settings.contact_and_social = Some(merge_contact_and_social(settings.contact_and_social.take(), incoming));
    }
    if let Some(incoming) = update.mobile_mfs {
        settings.mobile_mfs = Some(merge_mobile_mfs(settings.mobile_mfs.take(), incoming));
    }
    settings.updated_at = Utc::now();

    (settings, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateSettingsRequest;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn settings() -> Settings {
        let req: CreateSettingsRequest = serde_json::from_value(serde_json::json!({
            "logo": "logo.png",
            "sliderImages": ["a", "b"],
            "contactAndSocial": { "address": "Dhaka", "phone": "017" },
            "mobileMfs": { "bKash": { "number": "018", "accountType": "personal" } }
        }))
        .unwrap();
        Settings::from(req)
    }

    #[test]
    fn test_slider_images_union_capped() {
        let merged = merge_slider_images(&strings(&["a", "b"]), Some(&strings(&["b", "c", "d"])), &[]);
        assert_eq!(merged, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_slider_images_deleted() {
        let merged = merge_slider_images(&strings(&["a", "b", "c"]), Some(&strings(&["d"])), &strings(&["a"]));
        assert_eq!(merged, strings(&["b", "c"]));

        let kept = merge_slider_images(&strings(&["a", "b"]), None, &[]);
        assert_eq!(kept, strings(&["a", "b"]));
    }

    #[test]
    fn test_contact_shallow_merge() {
        let merged = merge_contact_and_social(
            Some(ContactAndSocial { address: Some("Dhaka".into()), phone: Some("017".into()), ..Default::default() }),
            ContactAndSocial { phone: Some("019".into()), email: Some("hi@shop.com".into()), ..Default::default() },
        );
        assert_eq!(merged.address.as_deref(), Some("Dhaka"));
        assert_eq!(merged.phone.as_deref(), Some("019"));
        assert_eq!(merged.email.as_deref(), Some("hi@shop.com"));
    }

    #[test]
    fn test_apply_update() {
        let update: UpdateSettingsRequest = serde_json::from_value(serde_json::json!({
            "sliderImages": ["c"],
            "deletedSliderImages": ["a"],
            "mobileMfs": { "bKash": { "logo": "bkash.png" }, "nagad": { "number": "015" } },
            "deliveryCharge": 60
        }))
        .unwrap();

        let (merged, removed) = apply_settings_update(settings(), update);
        assert_eq!(merged.slider_images, strings(&["b", "c"]));
        assert_eq!(removed, strings(&["a"]));
        assert_eq!(merged.logo.as_deref(), Some("logo.png"));
        assert_eq!(merged.delivery_charge, Some(60.0));

        let mfs = merged.mobile_mfs.unwrap();
        let bkash = mfs.bkash.unwrap();
        assert_eq!(bkash.number.as_deref(), Some("018"));
        assert_eq!(bkash.logo.as_deref(), Some("bkash.png"));
        assert_eq!(mfs.nagad.unwrap().number.as_deref(), Some("015"));
        assert!(mfs.rocket.is_none());
    }
}
