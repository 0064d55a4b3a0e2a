use std::env;
use log::{info, debug};

#[derive(Debug, Clone)]
pub struct SuperAdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub bcrypt_salt_rounds: u32,
    pub super_admin: Option<SuperAdminSeed>,
}

impl AppConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, Box<dyn std::error::Error>> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("{} must be set", key).into())
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = or_default("SERVER_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| format!("Invalid SERVER_PORT: {}", e))?;
        let jwt_expires_in_hours = or_default("JWT_EXPIRES_IN_HOURS", "24")
            .parse::<i64>()
            .map_err(|e| format!("Invalid JWT_EXPIRES_IN_HOURS: {}", e))?;
        let bcrypt_salt_rounds = or_default("BCRYPT_SALT_ROUNDS", "10")
            .parse::<u32>()
            .map_err(|e| format!("Invalid BCRYPT_SALT_ROUNDS: {}", e))?;

        let super_admin = match (lookup("SUPER_ADMIN_EMAIL"), lookup("SUPER_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                info!("Super admin seed configured for {}", email);
                Some(SuperAdminSeed { email, password })
            }
            _ => {
                debug!("No super admin seed configured");
                None
            }
        };

        Ok(AppConfig {
            host: or_default("SERVER_HOST", "0.0.0.0"),
            port,
            log_level: or_default("LOG_LEVEL", "info"),
            mongodb_uri: required("MONGODB_URI")?,
            database_name: or_default("DATABASE_NAME", "marketplace"),
            jwt_secret: required("JWT_ACCESS_SECRET")?,
            jwt_expires_in_hours,
            bcrypt_salt_rounds,
            super_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, Box<dyn std::error::Error>> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("MONGODB_URI", "mongodb://localhost:27017"), ("JWT_ACCESS_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.database_name, "marketplace");
        assert_eq!(config.jwt_expires_in_hours, 24);
        assert_eq!(config.bcrypt_salt_rounds, 10);
        assert!(config.super_admin.is_none());
    }

    #[test]
    fn test_missing_required() {
        assert!(load(&[("JWT_ACCESS_SECRET", "s3cret")]).is_err());
        assert!(load(&[("MONGODB_URI", "mongodb://localhost"), ("JWT_ACCESS_SECRET", " ")]).is_err());
    }

    #[test]
    fn test_overrides_and_seed() {
        let config = load(&[
            ("MONGODB_URI", "mongodb://db"),
            ("JWT_ACCESS_SECRET", "s3cret"),
            ("SERVER_PORT", "9000"),
            ("BCRYPT_SALT_ROUNDS", "4"),
            ("SUPER_ADMIN_EMAIL", "root@shop.com"),
            ("SUPER_ADMIN_PASSWORD", "changeme"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bcrypt_salt_rounds, 4);
        assert_eq!(config.super_admin.unwrap().email, "root@shop.com");
    }

    #[test]
    fn test_bad_port() {
        assert!(load(&[("MONGODB_URI", "x"), ("JWT_ACCESS_SECRET", "y"), ("SERVER_PORT", "http")]).is_err());
    }
}
