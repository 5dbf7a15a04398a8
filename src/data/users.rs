//! User directory API client
//!
//! Fetches user records from a paginated REST API (reqres.in-style), caches
//! results in memory for five minutes and reports failures through
//! [`UserDirectoryError`].

use chrono::Duration;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use std::error::Error as StdError;
use thiserror::Error;
use tracing::{debug, warn};

use super::decode;
use super::{SingleUserResponse, User, UserPage};
use crate::cache::CacheManager;
use crate::config::{ClientConfig, ConfigError};

/// Cache key for the aggregated list of all users
pub const ALL_USERS_CACHE_KEY: &str = "all_users";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Time-to-live for user cache entries in minutes
const CACHE_TTL_MINUTES: i64 = 5;

/// Ways a response body can fail to match the expected shape
#[derive(Debug, Error)]
pub enum FormatError {
    /// Body is not valid JSON or does not fit the model
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Body could not be read as text
    #[error("undecodable response body: {0}")]
    Body(#[source] reqwest::Error),

    /// Body parsed but lacks a required field
    #[error("missing `{field}` in {location}")]
    MissingField {
        field: &'static str,
        location: String,
    },
}

/// Errors returned by [`UserDirectoryClient`]
///
/// Every failure inside a fetch is reported as exactly one of these variants,
/// with the underlying cause available through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// The requested user does not exist (HTTP 404)
    #[error("User {0} not found")]
    NotFound(u32),

    /// Transport-level failure: connection, DNS, timeout or a non-success status
    #[error("Network error occurred while {context}: {source}")]
    Network {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body missing expected fields or failing to parse
    #[error("Failed to decode response while {context}: {source}")]
    Format {
        context: String,
        #[source]
        source: FormatError,
    },

    /// Anything else
    #[error("An unexpected error occurred while {context}: {source}")]
    Unexpected {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl UserDirectoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    fn format(context: &str, source: impl Into<FormatError>) -> Self {
        Self::Format {
            context: context.to_string(),
            source: source.into(),
        }
    }

    fn unexpected(context: &str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Unexpected {
            context: context.to_string(),
            source: source.into(),
        }
    }

    /// Sorts a transport error into the taxonomy
    ///
    /// Builder errors (e.g. an unparseable URL) never reached the network and
    /// count as unexpected; body decode errors are format errors.
    fn from_transport(context: &str, source: reqwest::Error) -> Self {
        if source.is_builder() {
            Self::unexpected(context, source)
        } else if source.is_decode() {
            Self::format(context, FormatError::Body(source))
        } else {
            Self::Network {
                context: context.to_string(),
                source,
            }
        }
    }
}

/// Client for the remote user directory
///
/// Holds the HTTP transport, the headers sent with every request and the
/// cache. Lookups check the cache first and only hit the network on a miss or
/// after the entry has expired. The all-users entry and per-id entries expire
/// independently and may disagree.
#[derive(Debug, Clone)]
pub struct UserDirectoryClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Headers attached to every request
    default_headers: HeaderMap,
    /// Cache for fetched users
    cache: CacheManager,
    /// Root of the API, without trailing slash
    base_url: String,
}

impl UserDirectoryClient {
    /// Creates a client with its own HTTP transport and an empty cache
    ///
    /// The transport applies `config.timeout` to every request and sends
    /// `Accept: application/json`.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self::with_parts(http_client, default_headers, CacheManager::new(), config)
    }

    /// Creates a client from caller-supplied parts
    ///
    /// If an API key is configured and `default_headers` does not already
    /// carry `x-api-key`, the key is added once here.
    ///
    /// # Returns
    /// * `Err(ConfigError::InvalidApiKey)` if the key is not a valid header value
    pub fn with_parts(
        http_client: Client,
        mut default_headers: HeaderMap,
        cache: CacheManager,
        config: ClientConfig,
    ) -> Result<Self, ConfigError> {
        if let Some(api_key) = config.api_key.as_deref() {
            if !default_headers.contains_key(API_KEY_HEADER) {
                let mut value =
                    HeaderValue::from_str(api_key).map_err(|_| ConfigError::InvalidApiKey)?;
                value.set_sensitive(true);
                default_headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
            }
        }

        Ok(Self {
            http_client,
            default_headers,
            cache,
            base_url: config.base_url,
        })
    }

    /// The cache backing this client
    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Generates the cache key for a single user
    pub fn user_cache_key(user_id: u32) -> String {
        format!("user_{}", user_id)
    }

    /// Fetches every user, following pagination
    ///
    /// # Returns
    /// * `Ok(Vec<User>)` - All users in page order
    /// * `Err(UserDirectoryError)` - Network, format or unexpected failure
    ///
    /// # Behavior
    /// - Returns the cached list if it has not expired
    /// - Otherwise requests `/users?page=N` from page 1 until the reported
    ///   total page count is reached
    /// - Caches the aggregated list for five minutes
    pub async fn get_all_users(&self) -> Result<Vec<User>, UserDirectoryError> {
        if let Some(users) = self.cache.get_fresh::<Vec<User>>(ALL_USERS_CACHE_KEY) {
            debug!(count = users.len(), "all users served from cache");
            return Ok(users);
        }

        self.fetch_all_users()
            .await
            .inspect_err(|err| warn!(error = %err, "failed to fetch all users"))
    }

    /// Fetches one user by id
    ///
    /// # Returns
    /// * `Ok(User)` - The user record
    /// * `Err(UserDirectoryError::NotFound)` - The API answered 404
    /// * `Err(UserDirectoryError)` - Network, format or unexpected failure
    pub async fn get_user_by_id(&self, user_id: u32) -> Result<User, UserDirectoryError> {
        let cache_key = Self::user_cache_key(user_id);
        if let Some(user) = self.cache.get_fresh::<User>(&cache_key) {
            debug!(user_id, "user served from cache");
            return Ok(user);
        }

        self.fetch_user(user_id, &cache_key)
            .await
            .inspect_err(|err| warn!(user_id, error = %err, "failed to fetch user"))
    }

    async fn fetch_all_users(&self) -> Result<Vec<User>, UserDirectoryError> {
        const CONTEXT: &str = "fetching all users";

        let mut users = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!("{}/users?page={}", self.base_url, page);
            let response = self
                .send(&url)
                .await
                .and_then(Response::error_for_status)
                .map_err(|e| UserDirectoryError::from_transport(CONTEXT, e))?;
            let body = response
                .text()
                .await
                .map_err(|e| UserDirectoryError::from_transport(CONTEXT, e))?;

            let user_page: UserPage =
                decode::decode(&body).map_err(|e| UserDirectoryError::format(CONTEXT, e))?;
            let data = user_page.data.ok_or_else(|| {
                UserDirectoryError::format(
                    CONTEXT,
                    FormatError::MissingField {
                        field: "data",
                        location: format!("page {}", page),
                    },
                )
            })?;

            debug!(
                page,
                total_pages = user_page.total_pages,
                count = data.len(),
                "fetched user page"
            );
            users.extend(data);

            if page >= user_page.total_pages {
                break;
            }
            page += 1;
        }

        self.cache
            .write(ALL_USERS_CACHE_KEY, &users, Duration::minutes(CACHE_TTL_MINUTES))
            .map_err(|e| UserDirectoryError::unexpected(CONTEXT, e))?;

        Ok(users)
    }

    async fn fetch_user(&self, user_id: u32, cache_key: &str) -> Result<User, UserDirectoryError> {
        let context = format!("fetching user {}", user_id);

        let url = format!("{}/users/{}", self.base_url, user_id);
        let response = self
            .send(&url)
            .await
            .map_err(|e| UserDirectoryError::from_transport(&context, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UserDirectoryError::NotFound(user_id));
        }

        let body = response
            .error_for_status()
            .map_err(|e| UserDirectoryError::from_transport(&context, e))?
            .text()
            .await
            .map_err(|e| UserDirectoryError::from_transport(&context, e))?;

        let wrapper: SingleUserResponse =
            decode::decode(&body).map_err(|e| UserDirectoryError::format(&context, e))?;
        let user = wrapper.data.ok_or_else(|| {
            UserDirectoryError::format(
                &context,
                FormatError::MissingField {
                    field: "data",
                    location: "user response".to_string(),
                },
            )
        })?;

        self.cache
            .write(cache_key, &user, Duration::minutes(CACHE_TTL_MINUTES))
            .map_err(|e| UserDirectoryError::unexpected(&context, e))?;

        Ok(user)
    }

    /// Issues a GET with the default headers
    async fn send(&self, url: &str) -> Result<Response, reqwest::Error> {
        debug!(url, "GET");
        self.http_client
            .get(url)
            .headers(self.default_headers.clone())
            .send()
            .await
    }
}
