//! Core data models for the user directory client
//!
//! This module contains the user record type, the transient page type used
//! while aggregating paginated responses, and the HTTP client itself.

pub mod decode;
pub mod users;

pub use users::{FormatError, UserDirectoryClient, UserDirectoryError};

use serde::{Deserialize, Serialize};

/// A user record from the remote directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier of the remote record
    pub id: u32,
    /// Email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar image URL
    pub avatar: String,
}

impl User {
    /// Full display name, "first last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of the paginated user listing
///
/// Only lives for the duration of the aggregation loop.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    /// Page number of this batch
    pub page: u32,
    /// Total number of pages in the whole result set
    pub total_pages: u32,
    /// Users on this page; `None` if the body had no `data` list
    #[serde(default)]
    pub data: Option<Vec<User>>,
}

/// Wrapper around a single user, as returned by `GET /users/{id}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SingleUserResponse {
    #[serde(default)]
    pub data: Option<User>,
}
