use std::path::PathBuf;
use std::time::Duration;

/// Multi-tenant ("common") Microsoft identity authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/common";

/// Microsoft Graph REST endpoint.
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything the token provider and the drive fetcher need, passed in
/// explicitly. No process-wide state.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Application (client) id of the registered public client.
    pub client_id: String,
    /// Scopes requested on every acquisition.
    pub scopes: Vec<String>,
    /// Where the serialized token cache lives on disk.
    pub cache_path: PathBuf,
    /// Identity authority base URL. Overridable so tests can point it at a
    /// mock server.
    pub authority: String,
    /// Graph API base URL, overridable for the same reason.
    pub graph_base: String,
    /// Timeout applied to every HTTP call.
    pub timeout: Duration,
    /// Disables TLS certificate verification on outbound calls. Off by
    /// default; only ever enable this against a trusted test endpoint.
    pub danger_accept_invalid_certs: bool,
}

impl GraphConfig {
    pub fn new(
        client_id: impl Into<String>,
        scopes: Vec<String>,
        cache_path: impl Into<PathBuf>,
    ) -> Self {
        GraphConfig {
            client_id: client_id.into(),
            scopes,
            cache_path: cache_path.into(),
            authority: DEFAULT_AUTHORITY.to_string(),
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            danger_accept_invalid_certs: false,
        }
    }

    /// Space-joined scope string as the identity endpoints expect it.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}
