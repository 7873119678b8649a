//! Application configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_TOKEN: &str = "admin-token";

/// How the admin password is supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminPassword {
    /// bcrypt hash from `ADMIN_HASH_PASSWORD`
    Hashed(String),
    /// Plain text from `ADMIN_PASSWORD`, hashed once at startup
    Plain(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub admin_username: String,
    pub admin_password: AdminPassword,
    pub admin_token: String,
    pub upload_dir: PathBuf,
    pub export_dir: PathBuf,
    pub seed_data: bool,
    pub allowed_origins: Vec<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Default for AppConfig {
    fn default() -> Self {
        let admin_password = match std::env::var("ADMIN_HASH_PASSWORD") {
            Ok(hash) if !hash.is_empty() => AdminPassword::Hashed(hash),
            _ => AdminPassword::Plain(env_or("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD)),
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .or_else(|| std::env::var("FRONTEND_ORIGIN").ok().map(|o| vec![o]))
            .unwrap_or_else(|| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3001),
            environment: env_or("ENVIRONMENT", "development"),
            admin_username: env_or("ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME),
            admin_password,
            admin_token: env_or("ADMIN_TOKEN", DEFAULT_ADMIN_TOKEN),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            export_dir: PathBuf::from(env_or("EXPORT_DIR", "exports")),
            seed_data: std::env::var("SEED_DATA")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
            allowed_origins,
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Warnings for credentials left at their well-known defaults.
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.admin_password == AdminPassword::Plain(DEFAULT_ADMIN_PASSWORD.to_string()) {
            warnings.push(
                "Admin password is the default 'admin123'. Set ADMIN_HASH_PASSWORD to a bcrypt hash of a strong password.",
            );
        }
        if self.admin_token == DEFAULT_ADMIN_TOKEN {
            warnings.push("ADMIN_TOKEN is the default value. Set it to a long random string.");
        }
        if self.admin_username == DEFAULT_ADMIN_USERNAME {
            warnings.push("ADMIN_USERNAME is the default 'admin'.");
        }
        warnings
    }
}
