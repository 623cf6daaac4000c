//! Prefix trie over contact tokens
//!
//! Each node caches the ids of every contact with an indexed token passing
//! through it, so a prefix lookup is a single walk followed by a set clone.
//! The trie only ever holds ids; contacts stay owned by the store.
//!
//! Alongside the tree the index keeps, per id, the tokens it was inserted
//! with. That snapshot lets [`PrefixIndex::unindex`] and
//! [`PrefixIndex::reindex`] remove exactly what was added even after the
//! caller has mutated the record.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, instrument};

use crate::models::{Contact, ContactId};
use crate::search::normalize_query;

/// One character position in some indexed token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Ids whose token has the path-so-far as a prefix
    members: BTreeSet<ContactId>,
    /// Ids with a token ending exactly here
    ends: BTreeSet<ContactId>,
}

impl TrieNode {
    pub fn child(&self, ch: char) -> Option<&TrieNode> {
        self.children.get(&ch)
    }

    pub fn children(&self) -> impl Iterator<Item = (char, &TrieNode)> {
        self.children.iter().map(|(ch, node)| (*ch, node))
    }

    pub fn members(&self) -> &BTreeSet<ContactId> {
        &self.members
    }

    /// True if some indexed token ends exactly at this node
    pub fn is_terminal(&self) -> bool {
        !self.ends.is_empty()
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = self;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    /// Walk `token` from this node, creating nodes as needed. `id` is added
    /// to every node visited below this one, never to this node itself.
    fn insert_path(&mut self, token: &str, id: ContactId) {
        let mut node = self;
        for ch in token.chars() {
            node = node.children.entry(ch).or_default();
            node.members.insert(id);
        }
        node.ends.insert(id);
    }

    /// Remove `id` from every node along `token`. A path that does not fully
    /// exist is left untouched.
    fn remove_path(&mut self, token: &str, id: ContactId) -> bool {
        if self.find(token).is_none() {
            return false;
        }
        let mut node = self;
        for ch in token.chars() {
            let Some(child) = node.children.get_mut(&ch) else {
                return false;
            };
            child.members.remove(&id);
            node = child;
        }
        node.ends.remove(&id);
        true
    }

    /// Drop the first node along `chars` whose member set is empty, together
    /// with its subtree. Nothing passes through such a node, so nothing
    /// below it can be reachable by search either.
    fn prune(&mut self, mut chars: std::str::Chars<'_>) {
        let Some(ch) = chars.next() else {
            return;
        };
        let empty = match self.children.get_mut(&ch) {
            Some(child) if child.members.is_empty() => true,
            Some(child) => {
                child.prune(chars);
                false
            }
            None => false,
        };
        if empty {
            self.children.remove(&ch);
        }
    }

    fn count_nodes(&self) -> usize {
        self.children.values().map(|c| 1 + c.count_nodes()).sum()
    }
}

/// Multi-field prefix index over contacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixIndex {
    root: TrieNode,
    /// Tokens each id is currently indexed under, in insertion order
    indexed: HashMap<ContactId, Vec<String>>,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a contact under the tokens derived from its current fields
    pub fn insert(&mut self, contact: &Contact) {
        self.insert_tokens(contact.id, &contact.index_tokens());
    }

    /// Index `id` under each token. Empty tokens are skipped; inserting a
    /// token twice for the same id is a no-op.
    pub fn insert_tokens(&mut self, id: ContactId, tokens: &[String]) {
        for token in tokens.iter().filter(|t| !t.is_empty()) {
            self.root.insert_path(token, id);
            let snapshot = self.indexed.entry(id).or_default();
            if !snapshot.contains(token) {
                snapshot.push(token.clone());
            }
        }
    }

    /// Remove a contact using the tokens derived from its *current* fields.
    ///
    /// If the contact was edited since it was inserted, tokens from the old
    /// values stay indexed; use [`PrefixIndex::reindex`] or
    /// [`PrefixIndex::unindex`] for edits.
    pub fn delete(&mut self, contact: &Contact) {
        self.delete_tokens(contact.id, &contact.index_tokens());
    }

    /// Remove `id` from the path of each token. Tokens that were never
    /// indexed are ignored. Other tokens still indexed for `id` keep their
    /// full paths, including any prefix shared with a removed token.
    pub fn delete_tokens(&mut self, id: ContactId, tokens: &[String]) {
        let mut removed = 0usize;
        for token in tokens.iter().filter(|t| !t.is_empty()) {
            if self.root.remove_path(token, id) {
                removed += 1;
            }
            if let Some(snapshot) = self.indexed.get_mut(&id) {
                snapshot.retain(|t| t != token);
            }
        }

        let remaining = match self.indexed.get(&id) {
            Some(snapshot) if snapshot.is_empty() => {
                self.indexed.remove(&id);
                Vec::new()
            }
            Some(snapshot) => snapshot.clone(),
            None => Vec::new(),
        };
        for token in &remaining {
            self.root.insert_path(token, id);
        }

        for token in tokens {
            self.root.prune(token.chars());
        }
        debug!(%id, removed, remaining = remaining.len(), "Deleted tokens from prefix index");
    }

    /// Remove every token `id` was inserted with. Unknown ids are a no-op.
    pub fn unindex(&mut self, id: ContactId) {
        let Some(tokens) = self.indexed.remove(&id) else {
            return;
        };
        for token in &tokens {
            self.root.remove_path(token, id);
        }
        for token in &tokens {
            self.root.prune(token.chars());
        }
    }

    /// Replace whatever `contact.id` was indexed under with the tokens of
    /// its current fields.
    pub fn reindex(&mut self, contact: &Contact) {
        self.unindex(contact.id);
        self.insert(contact);
    }

    /// Ids of every contact with an indexed token starting with `query`.
    ///
    /// The query is lowercased and walked as given; a blank query matches
    /// nothing.
    pub fn search(&self, query: &str) -> BTreeSet<ContactId> {
        let Some(prefix) = normalize_query(query) else {
            return BTreeSet::new();
        };
        self.root
            .find(&prefix)
            .map(|node| node.members.clone())
            .unwrap_or_default()
    }

    /// Discard the trie and re-insert every contact in order
    #[instrument(skip_all)]
    pub fn rebuild<'a, I>(&mut self, contacts: I)
    where
        I: IntoIterator<Item = &'a Contact>,
    {
        self.clear();
        for contact in contacts {
            self.insert(contact);
        }
        debug!(
            records = self.indexed.len(),
            nodes = self.node_count(),
            "Rebuilt prefix index"
        );
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Node reached by walking `prefix` verbatim from the root
    pub fn find_node(&self, prefix: &str) -> Option<&TrieNode> {
        self.root.find(prefix)
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Tokens `id` is currently indexed under
    pub fn tokens_for(&self, id: ContactId) -> Option<&[String]> {
        self.indexed.get(&id).map(Vec::as_slice)
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.indexed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexed.is_empty()
    }

    /// Number of nodes below the root
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }
}
