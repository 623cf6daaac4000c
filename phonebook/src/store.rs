//! ContactStore - the record store plus its prefix index
//!
//! The store owns the ordered contact list and keeps the index in step with
//! it: insert on add, reindex on edit, unindex on remove, full rebuild on
//! load and import. Contacts and index sit behind one lock, so a search never
//! observes a half-applied update.
//!
//! Persistence is a pair of JSON blobs in a key/value [`Database`]. Every
//! write is saved before it is committed to the index; a failed save rolls
//! the in-memory change back.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::{unreadable_key, StoreOptions, CALL_LOGS_KEY, CONTACTS_KEY};
use crate::database::Database;
use crate::indexer::PrefixIndex;
use crate::interface::{
    ContactDraft, ContactFilter, FilterCounts, PhonebookError, PhonebookStats, SortOrder, Tag,
};
use crate::models::{CallKind, CallLog, Contact, ContactId};
use crate::search;

struct StoreState {
    contacts: Vec<Contact>,
    call_logs: Vec<CallLog>,
    index: PrefixIndex,
}

impl StoreState {
    fn position(&self, id: ContactId) -> Result<usize, PhonebookError> {
        self.contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(PhonebookError::NotFound(id))
    }
}

/// Thread-safe phonebook: contacts, call log and prefix index
pub struct ContactStore {
    db: Arc<Database>,
    state: RwLock<StoreState>,
    options: StoreOptions,
}

/// Millisecond clock id, bumped above `existing` so it is always fresh.
/// `None` when the largest id leaves no room above it.
fn next_id(existing: impl Iterator<Item = i64>) -> Option<i64> {
    let now = Utc::now().timestamp_millis();
    match existing.max() {
        Some(max) if max >= now => max.checked_add(1),
        _ => Some(now),
    }
}

fn ids_exhausted() -> PhonebookError {
    PhonebookError::InvalidInput("No id is free above the current maximum".to_string())
}

/// Keep the first contact for each id, skipping ids in `taken`
fn unique_by_id(taken: impl Iterator<Item = ContactId>, contacts: Vec<Contact>) -> Vec<Contact> {
    let mut seen: HashSet<ContactId> = taken.collect();
    contacts.into_iter().filter(|c| seen.insert(c.id)).collect()
}

fn seed_contacts() -> Vec<Contact> {
    demo_data::demo_contacts()
        .iter()
        .filter_map(Contact::from_demo)
        .collect()
}

// Internal implementation
impl ContactStore {
    fn from_database(db: Database, options: StoreOptions) -> Result<Self, PhonebookError> {
        let (contacts, seeded) = match db.get_blob(CONTACTS_KEY)? {
            Some(json) => match serde_json::from_str::<Vec<Contact>>(&json) {
                Ok(contacts) => (contacts, false),
                Err(e) => {
                    let backup = unreadable_key(CONTACTS_KEY);
                    warn!(error = %e, %backup, "Persisted contact list is unreadable, set aside and starting from defaults");
                    db.put_blob(&backup, &json)?;
                    (Self::initial_contacts(&options), false)
                }
            },
            None => (Self::initial_contacts(&options), options.seed_defaults),
        };

        let total = contacts.len();
        let contacts = unique_by_id(std::iter::empty(), contacts);
        if contacts.len() < total {
            warn!(dropped = total - contacts.len(), "Persisted contact list repeats ids, keeping the first of each");
        }

        let call_logs = match db.get_blob(CALL_LOGS_KEY)? {
            Some(json) => match serde_json::from_str::<Vec<CallLog>>(&json) {
                Ok(call_logs) => call_logs,
                Err(e) => {
                    let backup = unreadable_key(CALL_LOGS_KEY);
                    warn!(error = %e, %backup, "Persisted call log is unreadable, set aside and starting empty");
                    db.put_blob(&backup, &json)?;
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if seeded {
            db.put_blob(CONTACTS_KEY, &serde_json::to_string(&contacts)?)?;
        }

        let mut index = PrefixIndex::new();
        index.rebuild(&contacts);
        info!(contacts = contacts.len(), call_logs = call_logs.len(), "Loaded contacts from storage");

        Ok(Self {
            db: Arc::new(db),
            state: RwLock::new(StoreState {
                contacts,
                call_logs,
                index,
            }),
            options,
        })
    }

    fn initial_contacts(options: &StoreOptions) -> Vec<Contact> {
        if options.seed_defaults {
            seed_contacts()
        } else {
            Vec::new()
        }
    }

    fn save_contacts(&self, contacts: &[Contact]) -> Result<(), PhonebookError> {
        self.db.put_blob(CONTACTS_KEY, &serde_json::to_string(contacts)?)?;
        Ok(())
    }

    /// Save both blobs in one transaction
    fn save_all(&self, contacts: &[Contact], call_logs: &[CallLog]) -> Result<(), PhonebookError> {
        let contacts = serde_json::to_string(contacts)?;
        let call_logs = serde_json::to_string(call_logs)?;
        self.db.put_blobs(&[
            (CONTACTS_KEY, contacts.as_str()),
            (CALL_LOGS_KEY, call_logs.as_str()),
        ])?;
        Ok(())
    }
}

impl ContactStore {
    /// Open (or create) a phonebook backed by a SQLite file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PhonebookError> {
        Self::open_with_options(path, StoreOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: StoreOptions,
    ) -> Result<Self, PhonebookError> {
        let db = Database::open(path)?;
        Self::from_database(db, options)
    }

    /// Phonebook backed by an in-memory database
    pub fn in_memory(options: StoreOptions) -> Result<Self, PhonebookError> {
        let db = Database::open_in_memory()?;
        Self::from_database(db, options)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// All contacts in store order
    pub fn contacts(&self) -> Vec<Contact> {
        self.state.read().contacts.clone()
    }

    pub fn get(&self, id: ContactId) -> Option<Contact> {
        self.state.read().contacts.iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().contacts.is_empty()
    }

    /// Ids of contacts with a name word, phone digits or email part starting
    /// with `query`. Blank queries match nothing.
    pub fn search_ids(&self, query: &str) -> BTreeSet<ContactId> {
        self.state.read().index.search(query)
    }

    /// Matching contacts, resolved in store order
    pub fn search(&self, query: &str) -> Vec<Contact> {
        let state = self.state.read();
        let ids = state.index.search(query);
        let matches: Vec<Contact> = state
            .contacts
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        debug!(query_len = query.len(), matches = matches.len(), "Searched contacts");
        matches
    }

    /// The first few matches, for a search-as-you-type dropdown
    pub fn suggestions(&self, query: &str) -> Vec<Contact> {
        let mut matches = self.search(query);
        matches.truncate(self.options.suggestion_limit);
        matches
    }

    /// Filtered and sorted listing of the whole phonebook
    pub fn list(&self, filter: ContactFilter, order: SortOrder) -> Vec<Contact> {
        let mut contacts = search::filter_contacts(&self.state.read().contacts, filter);
        search::sort_contacts(&mut contacts, order);
        contacts
    }

    pub fn call_logs(&self) -> Vec<CallLog> {
        self.state.read().call_logs.clone()
    }

    pub fn call_logs_for(&self, id: ContactId) -> Vec<CallLog> {
        self.state
            .read()
            .call_logs
            .iter()
            .filter(|log| log.contact_id == id)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> PhonebookStats {
        let state = self.state.read();
        PhonebookStats {
            total_contacts: state.contacts.len() as u64,
            recent_calls: state.contacts.iter().filter(|c| c.last_called.is_some()).count() as u64,
            call_logs: state.call_logs.len() as u64,
        }
    }

    pub fn filter_counts(&self) -> FilterCounts {
        let state = self.state.read();
        let count_tag = |tag: Tag| state.contacts.iter().filter(|c| c.tag == tag).count() as u64;
        FilterCounts {
            all: state.contacts.len() as u64,
            favorites: state.contacts.iter().filter(|c| c.favorite).count() as u64,
            family: count_tag(Tag::Family),
            work: count_tag(Tag::Work),
            friends: count_tag(Tag::Friends),
            other: count_tag(Tag::Other),
        }
    }

    /// Get the database size in bytes
    pub fn database_size(&self) -> Result<i64, PhonebookError> {
        Ok(self.db.database_size()?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Add a contact and index it. Name and phone are required.
    #[instrument(skip_all)]
    pub fn add_contact(&self, draft: ContactDraft) -> Result<ContactId, PhonebookError> {
        let draft = draft.normalized()?;
        let mut state = self.state.write();

        let id = next_id(state.contacts.iter().map(|c| c.id.as_i64()))
            .map(ContactId)
            .ok_or_else(ids_exhausted)?;

        let StoreState { contacts, index, .. } = &mut *state;
        contacts.push(Contact::from_draft(id, draft, Utc::now()));
        if let Err(e) = self.save_contacts(contacts) {
            contacts.pop();
            return Err(e);
        }
        if let Some(added) = contacts.last() {
            index.insert(added);
        }

        debug!(%id, "Added contact");
        Ok(id)
    }

    /// Replace a contact's editable fields and reindex it under the new values
    #[instrument(skip_all, fields(id = %id))]
    pub fn update_contact(&self, id: ContactId, draft: ContactDraft) -> Result<Contact, PhonebookError> {
        let draft = draft.normalized()?;
        let mut state = self.state.write();
        let pos = state.position(id)?;

        let StoreState { contacts, index, .. } = &mut *state;
        let previous = contacts[pos].clone();
        contacts[pos].apply_draft(draft);
        if let Err(e) = self.save_contacts(contacts) {
            contacts[pos] = previous;
            return Err(e);
        }
        index.reindex(&contacts[pos]);

        debug!("Updated contact");
        Ok(contacts[pos].clone())
    }

    /// Remove a contact from the store and the index
    #[instrument(skip_all, fields(id = %id))]
    pub fn delete_contact(&self, id: ContactId) -> Result<Contact, PhonebookError> {
        let mut state = self.state.write();
        let pos = state.position(id)?;

        let removed = state.contacts.remove(pos);
        if let Err(e) = self.save_contacts(&state.contacts) {
            state.contacts.insert(pos, removed);
            return Err(e);
        }
        state.index.unindex(id);

        debug!("Deleted contact");
        Ok(removed)
    }

    /// Flip the favorite flag, returning the new value. Not an indexed field.
    pub fn toggle_favorite(&self, id: ContactId) -> Result<bool, PhonebookError> {
        let mut state = self.state.write();
        let pos = state.position(id)?;

        let favorite = !state.contacts[pos].favorite;
        state.contacts[pos].favorite = favorite;
        if let Err(e) = self.save_contacts(&state.contacts) {
            state.contacts[pos].favorite = !favorite;
            return Err(e);
        }
        Ok(favorite)
    }

    /// Stamp `last_called` and append an outgoing call to the log
    #[instrument(skip_all, fields(id = %id, duration_secs = duration_secs))]
    pub fn record_call(&self, id: ContactId, duration_secs: u64) -> Result<CallLog, PhonebookError> {
        let mut state = self.state.write();
        let pos = state.position(id)?;
        let log_id = next_id(state.call_logs.iter().map(|l| l.id)).ok_or_else(ids_exhausted)?;

        let now = Utc::now();
        let previous = state.contacts[pos].last_called.replace(now);
        let log = CallLog {
            id: log_id,
            contact_id: id,
            duration: duration_secs,
            timestamp: now,
            kind: CallKind::Outgoing,
        };
        state.call_logs.push(log.clone());

        if let Err(e) = self.save_all(&state.contacts, &state.call_logs) {
            state.contacts[pos].last_called = previous;
            state.call_logs.pop();
            return Err(e);
        }
        Ok(log)
    }

    /// Discard the index and rebuild it from the current contact list
    pub fn rebuild_index(&self) {
        let mut state = self.state.write();
        let StoreState { contacts, index, .. } = &mut *state;
        index.rebuild(contacts.iter());
    }

    /// Replace the whole contact list (bulk load) and rebuild the index.
    /// Only the first contact for each id is kept. Returns how many were kept.
    #[instrument(skip_all, fields(contacts = contacts.len()))]
    pub fn replace_contacts(&self, contacts: Vec<Contact>) -> Result<usize, PhonebookError> {
        let total = contacts.len();
        let contacts = unique_by_id(std::iter::empty(), contacts);
        if contacts.len() < total {
            warn!(dropped = total - contacts.len(), "Dropped contacts with repeated ids");
        }

        let mut state = self.state.write();
        self.save_contacts(&contacts)?;
        state.contacts = contacts;
        let StoreState { contacts, index, .. } = &mut *state;
        index.rebuild(contacts.iter());
        Ok(contacts.len())
    }

    /// Remove every contact and call log
    pub fn clear(&self) -> Result<(), PhonebookError> {
        let mut state = self.state.write();
        self.save_all(&[], &[])?;
        state.contacts.clear();
        state.call_logs.clear();
        state.index.clear();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Import / Export
    // ─────────────────────────────────────────────────────────────────────────────

    /// The contact list as pretty-printed JSON
    pub fn export_json(&self) -> Result<String, PhonebookError> {
        Ok(serde_json::to_string_pretty(&self.state.read().contacts)?)
    }

    /// Merge a JSON array of contacts. Contacts whose id is already present
    /// are skipped. Returns how many were added. On a parse or storage error
    /// the store is left untouched.
    #[instrument(skip_all, fields(bytes = json.len()))]
    pub fn import_json(&self, json: &str) -> Result<usize, PhonebookError> {
        let imported: Vec<Contact> = serde_json::from_str(json)?;

        let mut state = self.state.write();
        let fresh = unique_by_id(state.contacts.iter().map(|c| c.id), imported);
        let added = fresh.len();

        let before = state.contacts.len();
        state.contacts.extend(fresh);
        if let Err(e) = self.save_contacts(&state.contacts) {
            state.contacts.truncate(before);
            return Err(e);
        }
        let StoreState { contacts, index, .. } = &mut *state;
        index.rebuild(contacts.iter());

        info!(added, total = contacts.len(), "Imported contacts");
        Ok(added)
    }
}
