//! End-to-end phonebook session against a database file

use phonebook::{
    ContactDraft, ContactFilter, ContactStore, PhonebookError, SortOrder, StoreOptions, Tag,
};
use tempfile::TempDir;

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("phonebook.sqlite");

    let (amit, neha) = {
        let store = ContactStore::open_with_options(&path, StoreOptions::empty()).unwrap();
        let amit = store
            .add_contact(ContactDraft::new("Amit Singh", "+91 76543 21098").with_tag(Tag::Work))
            .unwrap();
        let neha = store
            .add_contact(
                ContactDraft::new("Neha Agarwal", "+91 99887 76655")
                    .with_email("neha@agarwal.in")
                    .with_tag(Tag::Friends),
            )
            .unwrap();
        store.toggle_favorite(neha).unwrap();
        store.record_call(amit, 95).unwrap();
        store
            .update_contact(amit, ContactDraft::new("Amit Sinha", "+91 76543 21098").with_tag(Tag::Work))
            .unwrap();
        (amit, neha)
    };

    let store = ContactStore::open(&path).unwrap();
    assert_eq!(store.len(), 2, "persisted list replaces the seed contacts");

    assert!(store.search("singh").is_empty());
    assert_eq!(store.search("sinha")[0].id, amit);
    assert_eq!(store.search("7654")[0].id, amit);
    assert_eq!(store.search("agarwal.in")[0].id, neha);

    let favorites = store.list(ContactFilter::Favorites, SortOrder::Name);
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, neha);

    let recent = store.list(ContactFilter::All, SortOrder::Recent);
    assert_eq!(recent[0].id, amit);
    assert_eq!(store.call_logs_for(amit).len(), 1);
    assert_eq!(store.stats().call_logs, 1);
}

#[test]
fn test_remove_then_search() {
    let store = ContactStore::in_memory(StoreOptions::default()).unwrap();
    let pizza = store
        .search("orders")
        .into_iter()
        .next()
        .expect("seed data has the pizza place");

    store.delete_contact(pizza.id).unwrap();
    assert!(store.search("pizza").is_empty());
    assert!(store.search("orders").is_empty());
    assert!(matches!(
        store.delete_contact(pizza.id),
        Err(PhonebookError::NotFound(id)) if id == pizza.id
    ));
}

#[test]
fn test_export_import_between_files() {
    let dir = TempDir::new().unwrap();
    let source = ContactStore::open(dir.path().join("a.sqlite")).unwrap();
    let json = source.export_json().unwrap();

    let target = ContactStore::open_with_options(dir.path().join("b.sqlite"), StoreOptions::empty()).unwrap();
    assert_eq!(target.import_json(&json).unwrap(), source.len());
    assert_eq!(target.import_json(&json).unwrap(), 0);
    assert_eq!(target.search_ids("9198"), source.search_ids("9198"));
}
