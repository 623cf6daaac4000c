//! Phonebook Core - contact storage with prefix search
//!
//! Contacts are persisted as JSON blobs in SQLite and indexed in memory by a
//! character trie keyed on name words, phone digits and email parts, so every
//! keystroke of a search box resolves with one walk down the tree.

pub mod config;
pub mod database;
pub mod indexer;
pub mod interface;
pub mod models;
pub mod search;
mod store;

pub use config::StoreOptions;
pub use indexer::{PrefixIndex, TrieNode};
pub use interface::*;
pub use models::{CallKind, CallLog, Contact, ContactId};
pub use store::ContactStore;
