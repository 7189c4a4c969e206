//! Configuration module
//!
//! Provides the service configuration built once from the environment and
//! passed into handler constructors. No handler reads the environment ad hoc.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

// Common defaults
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PUBLIC_ASSET_URL: &str = "https://assets.playbox.dev";
const DEFAULT_BUCKET: &str = "playbox-arcade";
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 100;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 600;

/// How asset requests under `/play/{game_id}/...` are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetServeMode {
    /// 307 redirect to the object store's public URL.
    Redirect,
    /// Fetch from the public URL and stream the bytes through.
    Proxy,
}

impl FromStr for AssetServeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redirect" => Ok(AssetServeMode::Redirect),
            "proxy" => Ok(AssetServeMode::Proxy),
            _ => Err(anyhow::anyhow!("Invalid asset serve mode: {}", s)),
        }
    }
}

/// Service configuration values.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Public base URL of the object store (where bundles are reachable).
    pub r2_public_url: String,
    /// Bucket holding game bundles and uploaded files.
    pub r2_bucket: String,
    /// Base URL of this service, used to build upload result links.
    pub public_base_url: String,
    pub asset_serve_mode: AssetServeMode,
    pub max_upload_size_bytes: usize,
    pub upload_timeout_secs: u64,
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let r2_public_url = env::var("R2_PUBLIC_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_ASSET_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let r2_bucket = env::var("R2_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let asset_serve_mode = match env::var("ASSET_SERVE_MODE") {
            Ok(s) => s.parse()?,
            Err(_) => AssetServeMode::Redirect,
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let upload_timeout_secs = env::var("UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS);

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => s.parse()?,
            Err(_) => StorageBackend::S3,
        };

        let config = ServiceConfig {
            server_port,
            environment,
            cors_origins,
            r2_public_url,
            r2_bucket,
            public_base_url,
            asset_serve_mode,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            upload_timeout_secs,
            storage_backend,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
        };

        Ok(Config(Box::new(config)))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Validate critical configuration values; fail fast on misconfiguration.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.inner().max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }
        if self.inner().upload_timeout_secs == 0 {
            return Err(anyhow::anyhow!("UPLOAD_TIMEOUT_SECS cannot be 0"));
        }
        if self.inner().storage_backend == StorageBackend::Local
            && self.inner().local_storage_path.is_none()
        {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND is 'local'"
            ));
        }
        if self.is_production() && self.inner().cors_origins.contains(&"*".to_string()) {
            tracing::warn!(
                "CORS configured to allow all origins (*) in production - \
                 set explicit origins via CORS_ORIGINS"
            );
        }
        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn r2_public_url(&self) -> &str {
        &self.inner().r2_public_url
    }

    pub fn r2_bucket(&self) -> &str {
        &self.inner().r2_bucket
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }

    pub fn asset_serve_mode(&self) -> AssetServeMode {
        self.inner().asset_serve_mode
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn upload_timeout_secs(&self) -> u64 {
        self.inner().upload_timeout_secs
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config(Box::new(ServiceConfig {
            server_port: 8080,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            r2_public_url: "https://assets.example.com".to_string(),
            r2_bucket: "playbox-arcade".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            asset_serve_mode: AssetServeMode::Redirect,
            max_upload_size_bytes: 100 * 1024 * 1024,
            upload_timeout_secs: 600,
            storage_backend: StorageBackend::Local,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some("/tmp/playbox".to_string()),
        }))
    }

    #[test]
    fn validate_accepts_sane_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_upload_ceiling() {
        let mut config = test_config();
        config.0.max_upload_size_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_local_backend_without_path() {
        let mut config = test_config();
        config.0.local_storage_path = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn asset_serve_mode_parses_case_insensitively() {
        assert_eq!(
            "Proxy".parse::<AssetServeMode>().unwrap(),
            AssetServeMode::Proxy
        );
        assert!("iframe".parse::<AssetServeMode>().is_err());
    }
}
