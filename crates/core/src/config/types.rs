use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    9000
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// How long a connection waits on a locked database before giving up.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("catalog.sqlite3")
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Image store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Directory holding the content-addressed image files.
    #[serde(default = "default_images_dir")]
    pub dir: PathBuf,
    /// File served when a requested image is absent (relative to `dir`).
    #[serde(default = "default_image_name")]
    pub default_image: String,
    /// Upper bound on a multipart upload body.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: default_images_dir(),
            default_image: default_image_name(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_image_name() -> String {
    crate::images::DEFAULT_IMAGE_NAME.to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "catalog.sqlite3");
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert_eq!(config.images.dir.to_str().unwrap(), "images");
        assert_eq!(config.images.default_image, "default.jpg");
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/catalog.sqlite3"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.database.path.to_str().unwrap(),
            "/data/catalog.sqlite3"
        );
        assert_eq!(config.database.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_deserialize_images_and_cors() {
        let toml = r#"
[images]
dir = "/srv/images"
default_image = "missing.jpg"
max_upload_bytes = 1024

[cors]
allowed_origins = ["https://shop.example", "http://localhost:5173"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.images.dir.to_str().unwrap(), "/srv/images");
        assert_eq!(config.images.default_image, "missing.jpg");
        assert_eq!(config.images.max_upload_bytes, 1024);
        assert_eq!(config.cors.allowed_origins.len(), 2);
    }

    #[test]
    fn test_config_serializes_back() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["server"]["port"], 9000);
        assert_eq!(json["images"]["default_image"], "default.jpg");
    }
}
