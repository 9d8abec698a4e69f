use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory that receives uploaded image files
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Document store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Document store settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Backend selector: `mongodb` or `memory`
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Connection string for the mongodb backend
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from an optional `menagerie` file with
    /// environment-variable overrides (`MENAGERIE_PORT`,
    /// `MENAGERIE_STORE__URI`, ...)
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("menagerie").required(false))
            .add_source(config::Environment::with_prefix("MENAGERIE").separator("__"));

        let config: ServiceConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        Ok(addr_str.parse()?)
    }

    /// Reject values the service cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.upload_dir.as_os_str().is_empty(),
            "upload_dir must not be empty"
        );
        anyhow::ensure!(
            !self.store.database.is_empty(),
            "store.database must not be empty"
        );
        anyhow::ensure!(
            !self.store.collection.is_empty(),
            "store.collection must not be empty"
        );
        match self.store.backend.as_str() {
            "mongodb" | "memory" => Ok(()),
            other => {
                anyhow::bail!("unknown store backend `{other}` (expected `mongodb` or `memory`)")
            }
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend() -> String {
    "mongodb".to_string()
}

fn default_uri() -> String {
    "mongodb://127.0.0.1:27017".to_string()
}

fn default_database() -> String {
    "menagerie".to_string()
}

fn default_collection() -> String {
    "images".to_string()
}
