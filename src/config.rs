use std::env;
use std::str::FromStr;

/// Which storage engine backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Unknown STORAGE_BACKEND '{}'", other)),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub service_name: String,
    pub storage: StorageBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Load configuration from the environment (call `dotenvy::dotenv()` first)
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: parse_var("PORT", 8000)?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "blog-api".to_string()),
            storage: parse_var("STORAGE_BACKEND", StorageBackend::Mongo)?,
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "rust_blogdb".to_string()),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| "JWT_SECRET is required")?,
            jwt_expires_in_hours: parse_var("JWT_EXPIRES_IN_HOURS", 168)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    /// In-memory configuration with a cheap bcrypt cost, for tests and demos.
    pub fn for_memory(jwt_secret: &str) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            api_prefix: "/api".to_string(),
            service_name: "blog-api".to_string(),
            storage: StorageBackend::Memory,
            mongodb_uri: String::new(),
            mongodb_database: String::new(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expires_in_hours: 1,
            bcrypt_cost: 4,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| format!("{} has an invalid value '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_names() {
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!("MongoDB".parse::<StorageBackend>(), Ok(StorageBackend::Mongo));
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
