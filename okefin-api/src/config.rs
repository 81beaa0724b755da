/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 characters)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to, falling back to `PORT` (default: 3000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `UPLOAD_DIR`: Directory for uploaded files (default: `uploads`)
/// - `UPLOAD_MAX_BYTES`: Body limit for `POST /upload` (default: 10 MiB)
/// - `REGION_API_URL`: Base URL of the province/city service
/// - `REGION_TIMEOUT_SECONDS`: Region lookup timeout (default: 5)
/// - `RUST_LOG`: Log filter, `LOG_FORMAT=json` for JSON logs
///
/// # Example
///
/// ```no_run
/// use okefin_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use okefin_shared::region::DEFAULT_BASE_URL;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Upload storage
    pub upload: UploadConfig,

    /// External region service
    pub region: RegionConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct RegionConfig {
    pub base_url: String,
    pub timeout: Duration,
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = parse_or(lookup("API_PORT").or_else(|| lookup("PORT")), "API_PORT", 3000u16)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = parse_or(lookup("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let upload_dir = lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string());
        let upload_max_bytes = parse_or(lookup("UPLOAD_MAX_BYTES"), "UPLOAD_MAX_BYTES", 10 * 1024 * 1024usize)?;

        let region_base_url = lookup("REGION_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let region_timeout = parse_or(lookup("REGION_TIMEOUT_SECONDS"), "REGION_TIMEOUT_SECONDS", 5u64)?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            upload: UploadConfig {
                dir: PathBuf::from(upload_dir),
                max_bytes: upload_max_bytes,
            },
            region: RegionConfig {
                base_url: region_base_url,
                timeout: Duration::from_secs(region_timeout),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgresql://localhost/okefin"), ("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.upload.dir, PathBuf::from("uploads"));
        assert_eq!(config.upload.max_bytes, 10_485_760);
        assert_eq!(config.region.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.region.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_port_falls_back_to_port_variable() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/okefin"),
            ("JWT_SECRET", SECRET),
            ("PORT", "9090"),
        ])
        .unwrap();
        assert_eq!(config.api.port, 9090);

        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/okefin"),
            ("JWT_SECRET", SECRET),
            ("PORT", "9090"),
            ("API_PORT", "8000"),
        ])
        .unwrap();
        assert_eq!(config.api.port, 8000);
    }

    #[test]
    fn test_cors_origins_are_split() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/okefin"),
            ("JWT_SECRET", SECRET),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();
        assert_eq!(
            config.api.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_missing_required_values() {
        assert!(load(&[("JWT_SECRET", SECRET)]).is_err());
        assert!(load(&[("DATABASE_URL", "postgresql://localhost/okefin")]).is_err());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let err = load(&[("DATABASE_URL", "postgresql://localhost/okefin"), ("JWT_SECRET", "short")]).unwrap_err();
        assert!(err.to_string().contains("32"));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgresql://localhost/okefin"),
            ("JWT_SECRET", SECRET),
            ("API_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }
}
