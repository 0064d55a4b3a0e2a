use mongodb::bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::ApiError;

pub fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", id)))
}

pub fn parse_object_ids(ids: &[String]) -> Result<Vec<ObjectId>, ApiError> {
    ids.iter().map(|id| parse_object_id(id)).collect()
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(parse_object_id("nope"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_object_ids_fails_on_any_bad_id() {
        let ids = vec![ObjectId::new().to_hex(), "bad".to_string()];
        assert!(parse_object_ids(&ids).is_err());
        assert!(parse_object_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-01-31").is_some());
        assert!(parse_date("2025-01-31T10:00:00+06:00").is_some());
        assert!(parse_date("31/01/2025").is_none());
    }
}
