//! Property tests for the prefix index over generated contacts

use std::collections::BTreeSet;

use phonebook::{Contact, ContactId, PrefixIndex};
use proptest::prelude::*;

prop_compose! {
    fn contact_fields()(
        words in prop::collection::vec("[A-Za-z]{1,8}", 0..4),
        phone in "(\\+[0-9]{1,3} )?[0-9]{0,5}[- ]?[0-9]{0,5}",
        email in prop::option::of("[a-z0-9.]{0,8}@[a-z]{1,6}\\.(com|in|io)"),
    ) -> (String, String, Option<String>) {
        (words.join(" "), phone, email)
    }
}

fn contacts_strategy(max: usize) -> impl Strategy<Value = Vec<Contact>> {
    prop::collection::vec(contact_fields(), 1..max).prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (name, phone, email))| {
                let contact = Contact::new(i as i64 + 1, name, phone);
                match email {
                    Some(email) => contact.with_email(email),
                    None => contact,
                }
            })
            .collect()
    })
}

/// Every non-empty char prefix of `token`
fn prefixes(token: &str) -> impl Iterator<Item = &str> {
    token
        .char_indices()
        .map(move |(i, ch)| &token[..i + ch.len_utf8()])
}

proptest! {
    #[test]
    fn prop_every_token_prefix_finds_its_contact(contacts in contacts_strategy(12)) {
        let mut index = PrefixIndex::new();
        for contact in &contacts {
            index.insert(contact);
        }

        for contact in &contacts {
            for token in contact.index_tokens() {
                for prefix in prefixes(&token) {
                    prop_assert!(
                        index.search(prefix).contains(&contact.id),
                        "{:?} missing for prefix {:?}", contact.id, prefix
                    );
                }
            }
        }
    }

    #[test]
    fn prop_delete_undoes_insert(contacts in contacts_strategy(2)) {
        let contact = &contacts[0];
        let mut index = PrefixIndex::new();
        index.insert(contact);
        index.delete(contact);

        let empty = PrefixIndex::new();
        for token in contact.index_tokens() {
            for prefix in prefixes(&token) {
                prop_assert_eq!(index.search(prefix), empty.search(prefix));
            }
        }
        prop_assert!(index.is_empty());
        prop_assert_eq!(index.node_count(), 0);
    }

    #[test]
    fn prop_unindex_leaves_other_contacts_intact(contacts in contacts_strategy(8)) {
        let mut index = PrefixIndex::new();
        index.rebuild(&contacts);
        let removed = contacts[0].id;
        index.unindex(removed);

        let mut expected = PrefixIndex::new();
        expected.rebuild(&contacts[1..]);

        for contact in &contacts {
            for token in contact.index_tokens() {
                for prefix in prefixes(&token) {
                    prop_assert_eq!(index.search(prefix), expected.search(prefix));
                }
            }
        }
        prop_assert_eq!(index.node_count(), expected.node_count());
    }

    #[test]
    fn prop_rebuild_is_idempotent(contacts in contacts_strategy(10)) {
        let mut once = PrefixIndex::new();
        once.rebuild(&contacts);

        let mut twice = PrefixIndex::new();
        twice.rebuild(&contacts);
        twice.rebuild(&contacts);

        prop_assert_eq!(&once, &twice);
        for contact in &contacts {
            for token in contact.index_tokens() {
                for prefix in prefixes(&token) {
                    prop_assert_eq!(once.search(prefix), twice.search(prefix));
                }
            }
        }
    }

    #[test]
    fn prop_blank_query_matches_nothing(
        contacts in contacts_strategy(6),
        blank in "[ \\t\\n]{0,4}",
    ) {
        let mut index = PrefixIndex::new();
        index.rebuild(&contacts);
        prop_assert_eq!(index.search(&blank), BTreeSet::<ContactId>::new());
    }
}
