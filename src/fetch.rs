use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use camino::Utf8Path;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::should_act;
use crate::error::ForgeError;

/// Fetch-by-URL primitive. The remote repository is a black box behind this
/// trait; tests substitute a mock.
pub trait FetchClient: Send + Sync {
    fn download_url(&self, url: &str, destination: &Path) -> Result<(), ForgeError>;
}

#[derive(Clone)]
pub struct HttpFetchClient {
    client: Client,
}

impl HttpFetchClient {
    pub fn new() -> Result<Self, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("seqforge/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| ForgeError::Filesystem(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| ForgeError::Fetch {
                url: String::new(),
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl FetchClient for HttpFetchClient {
    fn download_url(&self, url: &str, destination: &Path) -> Result<(), ForgeError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| ForgeError::Fetch {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(ForgeError::FetchStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let mut file =
            File::create(destination).map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched,
    Skipped,
}

/// The fetch gate: download when forced or the destination is absent,
/// otherwise leave the existing file untouched.
pub fn ensure_fetched(
    client: &dyn FetchClient,
    url: &str,
    destination: &Utf8Path,
    force: bool,
) -> Result<FetchOutcome, ForgeError> {
    if !should_act(force, destination.as_std_path().exists()) {
        return Ok(FetchOutcome::Skipped);
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
    }
    client.download_url(url, destination.as_std_path())?;
    Ok(FetchOutcome::Fetched)
}
