use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths;

/// Registered public-client application id used when nothing overrides it.
pub const DEFAULT_CLIENT_ID: &str = "33e576cd-e2db-4a05-8778-71c7f799375f";

/// Drive path of the shared protocol workbook.
pub const DEFAULT_REMOTE_PATH: &str = "Protocol Automation EXCEL Grid.xlsx";

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client_id: String,
    pub scopes: Vec<String>,
    /// Identity authority base URL; empty means the library default.
    pub authority: Option<String>,
    /// Graph API base URL; empty means the library default.
    pub graph_base: Option<String>,
    pub remote_path: String,
    pub cache_file: PathBuf,
    pub output_dir: PathBuf,
    pub danger_accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            scopes: vec!["Files.Read".to_string()],
            authority: None,
            graph_base: None,
            remote_path: DEFAULT_REMOTE_PATH.to_string(),
            cache_file: paths::token_cache_path(),
            output_dir: paths::download_dir(),
            danger_accept_invalid_certs: false,
        }
    }
}

impl Config {
    /// Settings from the config file when present, overridden by environment
    /// variables.
    pub fn from_file_then_env(config_path: &str) -> Self {
        let mut config = Config::default();

        if std::path::Path::new(config_path).exists() {
            if let Ok(content) = std::fs::read_to_string(config_path) {
                match toml::from_str::<Config>(&content) {
                    Ok(file_config) => config = file_config,
                    Err(err) => log::warn!("ignoring unparseable {config_path}: {err}"),
                }
            }
        }

        if let Ok(client_id) = std::env::var("INTAKE_CLIENT_ID") {
            config.client_id = client_id;
        }
        if let Ok(scopes) = std::env::var("INTAKE_SCOPES") {
            config.scopes = scopes.split_whitespace().map(str::to_string).collect();
        }
        if let Ok(authority) = std::env::var("INTAKE_AUTHORITY") {
            config.authority = Some(authority);
        }
        if let Ok(graph_base) = std::env::var("INTAKE_GRAPH_BASE") {
            config.graph_base = Some(graph_base);
        }
        if let Ok(remote_path) = std::env::var("INTAKE_REMOTE_PATH") {
            config.remote_path = remote_path;
        }
        if let Ok(cache_file) = std::env::var("INTAKE_CACHE_FILE") {
            config.cache_file = PathBuf::from(cache_file);
        }
        if let Ok(output_dir) = std::env::var("INTAKE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(output_dir);
        }
        if let Ok(accept) = std::env::var("INTAKE_ACCEPT_INVALID_CERTS") {
            config.danger_accept_invalid_certs = parse_bool_env(&accept);
        }
        config
    }
}
