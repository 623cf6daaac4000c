//! Core data models for the phonebook
//!
//! Serialized field names follow the application's JSON export format
//! (`createdAt`, `lastCalled`, ...), so exported files can be re-imported.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use demo_data::DemoContact;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interface::{ContactDraft, Tag};

/// Stable, unique contact identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl ContactId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ContactId {
    fn from(id: i64) -> Self {
        ContactId(id)
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CONTACT
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub tag: Tag,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_called: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn new(id: impl Into<ContactId>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            email: None,
            tag: Tag::Other,
            favorite: false,
            created_at: Utc::now(),
            last_called: None,
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

    /// Build a new contact from a validated draft
    pub(crate) fn from_draft(id: ContactId, draft: ContactDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            tag: draft.tag,
            favorite: false,
            created_at,
            last_called: None,
        }
    }

    /// Overwrite the user-editable fields, keeping identity and history
    pub(crate) fn apply_draft(&mut self, draft: ContactDraft) {
        self.name = draft.name;
        self.phone = draft.phone;
        self.email = draft.email;
        self.tag = draft.tag;
    }

    /// Strings this contact is indexed under, derived from its current fields
    pub fn index_tokens(&self) -> Vec<String> {
        crate::search::index_tokens(&self.name, &self.phone, self.email.as_deref())
    }

    /// Convert a seed row. Rows with an unparsable creation date are dropped.
    pub fn from_demo(demo: &DemoContact) -> Option<Self> {
        Some(Self {
            id: ContactId(demo.id),
            name: demo.name.clone(),
            phone: demo.phone.clone(),
            email: demo.email.clone(),
            tag: Tag::from_name(&demo.tag),
            favorite: demo.favorite,
            created_at: parse_day(&demo.created_at)?,
            last_called: demo.last_called.as_deref().and_then(parse_day),
        })
    }
}

/// Parse a `YYYY-MM-DD` date as midnight UTC
fn parse_day(day: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// CALL LOG
// ─────────────────────────────────────────────────────────────────────────────

/// Direction of a logged call. Only calls placed from the phonebook are
/// logged; the field exists so exported logs carry `"type": "outgoing"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    #[default]
    Outgoing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    pub id: i64,
    pub contact_id: ContactId,
    /// Seconds
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: CallKind,
}
