//! Phonebook Interface Definition
//!
//! Value types shared between the record store, the prefix index and
//! whatever application layer sits on top of them.

use crate::models::ContactId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Contact group shown as a badge and usable as a list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Family,
    Work,
    Friends,
    #[default]
    Other,
}

impl Tag {
    pub const ALL: [Tag; 4] = [Tag::Family, Tag::Work, Tag::Friends, Tag::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Family => "family",
            Tag::Work => "work",
            Tag::Friends => "friends",
            Tag::Other => "other",
        }
    }

    /// Parse a tag name. Unknown names fall back to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "family" => Tag::Family,
            "work" => Tag::Work,
            "friends" => Tag::Friends,
            _ => Tag::Other,
        }
    }
}

/// Which contacts a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactFilter {
    #[default]
    All,
    Favorites,
    Tag(Tag),
}

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Case-insensitive by display name
    #[default]
    Name,
    /// Most recently called first; never-called contacts last, by name
    Recent,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// User-entered contact fields, as submitted from an add/edit form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub tag: Tag,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    /// Trim every field and reject drafts without a name or phone.
    /// A blank email becomes `None`.
    pub(crate) fn normalized(self) -> Result<Self, PhonebookError> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();
        if name.is_empty() || phone.is_empty() {
            return Err(PhonebookError::InvalidInput(
                "Name and phone number are required".to_string(),
            ));
        }
        let email = self
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Ok(Self {
            name,
            phone,
            email,
            tag: self.tag,
        })
    }
}

/// Header counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhonebookStats {
    pub total_contacts: u64,
    /// Contacts with a `last_called` timestamp
    pub recent_calls: u64,
    pub call_logs: u64,
}

/// Badge counts for each filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCounts {
    pub all: u64,
    pub favorites: u64,
    pub family: u64,
    pub work: u64,
    pub friends: u64,
    pub other: u64,
}

impl FilterCounts {
    pub fn for_tag(&self, tag: Tag) -> u64 {
        match tag {
            Tag::Family => self.family,
            Tag::Work => self.work,
            Tag::Friends => self.friends,
            Tag::Other => self.other,
        }
    }
}

/// Error type for phonebook operations
#[derive(Debug, Error)]
pub enum PhonebookError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Contact {0} not found")]
    NotFound(ContactId),
}

impl From<crate::database::DatabaseError> for PhonebookError {
    fn from(e: crate::database::DatabaseError) -> Self {
        PhonebookError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for PhonebookError {
    fn from(e: serde_json::Error) -> Self {
        PhonebookError::Serialization(e.to_string())
    }
}
