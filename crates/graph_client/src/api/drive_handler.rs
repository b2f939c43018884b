use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::FetchError;

/// Escaping for the drive-path portion of a `root:/{path}:/content` URL.
/// `/` stays intact so nested folders keep their separators.
const DRIVE_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// Downloads drive items over Graph with a bearer token.
#[derive(Debug, Clone)]
pub struct DriveHandler {
    client: Client,
    graph_base: String,
}

impl DriveHandler {
    pub fn new(client: Client, graph_base: String) -> Self {
        DriveHandler { client, graph_base }
    }

    /// GET `{base}/me/drive/root:/{path}:/content` and write the body to
    /// `local_path`, creating parent directories as needed. A non-2xx status
    /// fails with the code and body attached and leaves the local file
    /// untouched.
    pub async fn fetch_to_disk(
        &self,
        token: &str,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<PathBuf, FetchError> {
        let url = self.content_url(remote_path);
        info!("downloading drive item {remote_path}");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        if let Some(parent) = local_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| FetchError::Io {
                    path: local_path.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(local_path, &bytes).map_err(|source| FetchError::Io {
            path: local_path.to_path_buf(),
            source,
        })?;

        info!("saved {} bytes to {}", bytes.len(), local_path.display());
        Ok(local_path.to_path_buf())
    }

    fn content_url(&self, remote_path: &str) -> String {
        let encoded = utf8_percent_encode(remote_path, DRIVE_PATH);
        format!(
            "{}/me/drive/root:/{}:/content",
            self.graph_base.trim_end_matches('/'),
            encoded
        )
    }
}
