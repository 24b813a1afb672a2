use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Public GitHub REST endpoint root.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

// GitHub rejects requests without a user agent.
const USER_AGENT: &str = concat!("gitfolio/", env!("CARGO_PKG_VERSION"));

/// One repository record as GitHub returns it.
///
/// Decoded as-is and handed to the projector unmodified; filtering and
/// normalization happen there. Unknown response fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRepository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub updated_at: DateTime<Utc>,
    pub fork: bool,
}

/// Ways a repository fetch can fail. Each invocation makes exactly one
/// request; there is no retry and no partial result.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network failure: {source}")]
    Network { source: reqwest::Error },

    #[error("GitHub responded with HTTP {code}")]
    HttpStatus { code: u16 },

    #[error("response body is not a repository list: {source}")]
    MalformedResponse { source: serde_json::Error },
}

/// The one settlement a background fetch delivers to its view.
#[derive(Debug)]
pub enum FetchEvent {
    Completed(Vec<RawRepository>),
    Failed(FetchError),
}

/// Client for the "list repositories for user" endpoint.
#[derive(Debug, Clone)]
pub struct RepoFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl RepoFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(GITHUB_API_BASE)
    }

    /// Point the fetcher at a different endpoint root (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        // No explicit timeout is set; the transport's defaults apply.
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::Network { source })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Fetch every public repository of `username` in one request.
    ///
    /// Returns the decoded records unmodified. A success status with a body
    /// that is anything other than a JSON array of repositories (e.g. a
    /// rate-limit message object) is `MalformedResponse`.
    pub fn fetch_user_repos(&self, username: &str) -> Result<Vec<RawRepository>, FetchError> {
        let url = format!("{}/users/{}/repos", self.base_url, username);
        debug!("Fetching repositories from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Network { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|source| FetchError::Network { source })?;

        serde_json::from_str(&body).map_err(|source| FetchError::MalformedResponse { source })
    }
}

/// Run one fetch on a background thread and deliver the settled result as a
/// single event.
///
/// A failed send means the receiver is gone because the view was torn down;
/// the result is discarded without touching any state.
pub fn fetch_repositories_background(
    fetcher: RepoFetcher,
    username: String,
    sender: Sender<FetchEvent>,
) {
    std::thread::spawn(move || {
        let event = match fetcher.fetch_user_repos(&username) {
            Ok(repos) => FetchEvent::Completed(repos),
            Err(e) => FetchEvent::Failed(e),
        };
        let _ = sender.send(event);
    });
}
