use std::path::{Path, PathBuf};

use log::warn;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::api::drive_handler::DriveHandler;
use crate::auth::auth_handler::{AccessToken, GraphAuthHandler};
use crate::config::GraphConfig;
use crate::error::{AuthError, GraphError};

/// Token provider and drive fetcher behind one shared HTTP client.
///
/// Single-process, sequential use only: the token cache file carries no
/// locking, so concurrent invocations from multiple processes are out of
/// scope.
#[derive(Debug, Clone)]
pub struct GraphClient {
    auth_handler: GraphAuthHandler,
    drive_handler: DriveHandler,
}

impl GraphClient {
    pub fn new(config: GraphConfig) -> Result<Self, reqwest::Error> {
        let client = Self::build_http_client(&config)?;
        let drive_handler = DriveHandler::new(client.clone(), config.graph_base.clone());
        let auth_handler = GraphAuthHandler::new(client, config);
        Ok(GraphClient {
            auth_handler,
            drive_handler,
        })
    }

    fn build_http_client(config: &GraphConfig) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().timeout(config.timeout);
        if config.danger_accept_invalid_certs {
            // Explicit opt-in only; never the default.
            warn!("TLS certificate verification is disabled for this client");
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder.build()
    }

    /// Silent-or-interactive token acquisition; see [`GraphAuthHandler`].
    pub async fn acquire_token(
        &self,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, AuthError> {
        self.auth_handler.acquire_token(cancel).await
    }

    /// Acquire a token, then download `remote_path` from the signed-in user's
    /// drive to `local_path`.
    pub async fn download(
        &self,
        remote_path: &str,
        local_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, GraphError> {
        let token = self.auth_handler.acquire_token(cancel).await?;
        let path = self
            .drive_handler
            .fetch_to_disk(&token.secret, remote_path, local_path)
            .await?;
        Ok(path)
    }
}
