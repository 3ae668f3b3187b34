//! Static credential table for dashboard logins.
//!
//! Login is a local lookup against a fixed table loaded from configuration.
//! It is unrelated to the vest API, which takes no credentials.

use serde::{Deserialize, Serialize};

use vestdash_types::VestId;

/// One entry of the credential table as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Vests assigned to the user. Empty means every vest.
    #[serde(default)]
    pub vests: Vec<VestId>,
}

/// An authenticated dashboard user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub display_name: Option<String>,
    pub vests: Vec<VestId>,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Whether the user may see `vest_id`.
    #[must_use]
    pub fn is_assigned(&self, vest_id: VestId) -> bool {
        self.vests.is_empty() || self.vests.contains(&vest_id)
    }
}

/// Username/password lookup table.
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    entries: Vec<UserEntry>,
}

impl CredentialTable {
    #[must_use]
    pub fn new(entries: Vec<UserEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return the user when both username and password match exactly.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        self.entries
            .iter()
            .find(|e| e.username == username && e.password == password)
            .map(|e| User {
                username: e.username.clone(),
                display_name: e.display_name.clone(),
                vests: e.vests.clone(),
            })
    }
}

impl FromIterator<UserEntry> for CredentialTable {
    fn from_iter<I: IntoIterator<Item = UserEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
