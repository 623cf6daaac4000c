//! Storage keys and store options.

/// Blob key holding the JSON contact list
pub const CONTACTS_KEY: &str = "phonebook-contacts";

/// Blob key holding the JSON call log
pub const CALL_LOGS_KEY: &str = "phonebook-call-logs";

/// Appended to a key when an unreadable blob is set aside on open
pub const UNREADABLE_SUFFIX: &str = ".unreadable";

/// Key an unreadable blob stored under `key` is copied to
pub fn unreadable_key(key: &str) -> String {
    format!("{key}{UNREADABLE_SUFFIX}")
}

/// Suggestions shown under the search box
pub const MAX_SUGGESTIONS: usize = 5;

/// How a [`ContactStore`](crate::ContactStore) is set up on open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Load the bundled demo contacts when no contact list is persisted yet
    pub seed_defaults: bool,
    pub suggestion_limit: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_defaults: true,
            suggestion_limit: MAX_SUGGESTIONS,
        }
    }
}

impl StoreOptions {
    /// Start from an empty phonebook
    pub fn empty() -> Self {
        Self {
            seed_defaults: false,
            ..Self::default()
        }
    }
}
