//! Silhouettes stored as `<name>.png` files in a GitHub repository directory.
//!
//! File stems are kept as listed, so `Brazil.png` and `united_states.png`
//! both fetch back from the exact path they were found at.

use std::time::Duration;

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;
use reqwest::{header, Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::{ImageFetchError, SilhouetteSource, TerritorySource, TerritorySourceError};
use crate::config::SilhouettesConfig;
use crate::models::PlaceName;

const USER_AGENT: &str = concat!("worldle/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Content store backed by the GitHub repository contents API
pub struct GitHubSilhouettes {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
    branch: String,
    directory: String,
    token: Option<String>,
    /// Listed file stem per normalized name
    stems: RwLock<HashMap<PlaceName, String>>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
}

impl GitHubSilhouettes {
    pub fn new(config: &SilhouettesConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            directory: config.directory.trim_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            stems: RwLock::new(HashMap::new()),
        })
    }

    fn contents_url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!(
                "{}/repos/{}/{}/contents/{}",
                self.api_url, self.owner, self.repo, path
            ),
            &[("ref", self.branch.as_str())],
        )
    }

    /// Stem recorded by the last listing, else the name's slug
    fn file_stem(&self, name: &PlaceName) -> String {
        self.stems
            .read()
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.slug())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Every `*.png` in a directory listing as (normalized name, raw file stem)
fn territories_from_listing(entries: Vec<ContentEntry>) -> Vec<(PlaceName, String)> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let stem = entry.name.strip_suffix(".png")?.to_string();
            let name = PlaceName::new(&stem);
            (!name.is_empty()).then_some((name, stem))
        })
        .collect()
}

#[async_trait]
impl TerritorySource for GitHubSilhouettes {
    async fn list_territory_names(&self) -> Result<Vec<PlaceName>, TerritorySourceError> {
        let url = self.contents_url(&self.directory)?;

        let response = self
            .authorized(self.client.get(url))
            .header(header::ACCEPT, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(TerritorySourceError::Request)?;

        if !response.status().is_success() {
            return Err(TerritorySourceError::Status(response.status()));
        }

        let entries: Vec<ContentEntry> = response
            .json()
            .await
            .map_err(TerritorySourceError::Decode)?;

        let listed = territories_from_listing(entries);
        if listed.is_empty() {
            return Err(TerritorySourceError::Empty);
        }

        let territories: Vec<PlaceName> = {
            let mut stems = self.stems.write();
            listed
                .into_iter()
                .map(|(name, stem)| {
                    stems.insert(name.clone(), stem);
                    name
                })
                .collect()
        };

        info!(
            "Listed {} territories from {}/{}@{}",
            territories.len(),
            self.owner,
            self.repo,
            self.branch
        );
        Ok(territories)
    }
}

#[async_trait]
impl SilhouetteSource for GitHubSilhouettes {
    async fn fetch_silhouette(&self, name: &PlaceName) -> Result<Vec<u8>, ImageFetchError> {
        let path = format!("{}/{}.png", self.directory, self.file_stem(name));
        let url = self
            .contents_url(&path)
            .map_err(|source| ImageFetchError::InvalidUrl {
                name: name.clone(),
                source,
            })?;

        let response = self
            .authorized(self.client.get(url))
            .header(header::ACCEPT, RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(|source| ImageFetchError::Request {
                name: name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::Status {
                name: name.clone(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ImageFetchError::Body {
                name: name.clone(),
                source,
            })?;

        debug!("Fetched {} byte silhouette for {}", bytes.len(), name);
        Ok(bytes.to_vec())
    }
}
