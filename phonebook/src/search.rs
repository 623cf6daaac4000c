//! Tokenization and result ordering
//!
//! Every contact is indexed under three independent groups of strings:
//! the lowercased words of its name, the digits of its phone number (with and
//! without a leading country code), and the two halves of its email address.
//! Insert and delete both derive tokens through [`index_tokens`] so the two
//! stay symmetric.

use std::cmp::Ordering;

use crate::interface::{ContactFilter, SortOrder};
use crate::models::Contact;

/// Lowercased whitespace-separated words of a display name
pub fn name_tokens(name: &str) -> Vec<String> {
    name.split_whitespace().map(str::to_lowercase).collect()
}

/// Phone number with every non-digit removed. May be empty.
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Phone tokens: the full digit string and, for an international number
/// written with a separated country code (`+91 76543 21098`), the national
/// digits after that code. Empty when the phone has no digits.
pub fn phone_tokens(phone: &str) -> Vec<String> {
    let digits = phone_digits(phone);
    if digits.is_empty() {
        return Vec::new();
    }
    let national = national_digits(phone).filter(|n| !n.is_empty() && *n != digits);
    let mut tokens = vec![digits];
    tokens.extend(national);
    tokens
}

fn national_digits(phone: &str) -> Option<String> {
    let rest = phone.trim().strip_prefix('+')?;
    let code_len = rest.find(|c: char| !c.is_ascii_digit())?;
    if code_len == 0 {
        return None;
    }
    Some(phone_digits(&rest[code_len..]))
}

/// Local part and domain of an email address, lowercased.
///
/// Splits on the first `@`; an address without one is indexed whole.
/// Empty halves are dropped.
pub fn email_parts(email: &str) -> Vec<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Vec::new();
    }
    let parts = match email.split_once('@') {
        Some((local, domain)) => vec![local.to_string(), domain.to_string()],
        None => vec![email],
    };
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// All index tokens for a record, in field order: name words, phone tokens,
/// email parts. Never contains an empty string.
pub fn index_tokens(name: &str, phone: &str, email: Option<&str>) -> Vec<String> {
    let mut tokens = name_tokens(name);
    tokens.extend(phone_tokens(phone));

    if let Some(email) = email {
        tokens.extend(email_parts(email));
    }

    tokens
}

/// Lowercase a search query for the trie walk. `None` for a blank query,
/// which must never reach the trie. Surrounding whitespace is kept, so
/// `"ami "` is not a prefix of `"amit"`.
pub fn normalize_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering & filtering (applied by callers; the index itself is unordered)
// ─────────────────────────────────────────────────────────────────────────────

pub fn matches_filter(contact: &Contact, filter: ContactFilter) -> bool {
    match filter {
        ContactFilter::All => true,
        ContactFilter::Favorites => contact.favorite,
        ContactFilter::Tag(tag) => contact.tag == tag,
    }
}

pub fn filter_contacts(contacts: &[Contact], filter: ContactFilter) -> Vec<Contact> {
    contacts
        .iter()
        .filter(|c| matches_filter(c, filter))
        .cloned()
        .collect()
}

fn compare_names(a: &Contact, b: &Contact) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_recent(a: &Contact, b: &Contact) -> Ordering {
    match (a.last_called, b.last_called) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| compare_names(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_names(a, b),
    }
}

pub fn sort_contacts(contacts: &mut [Contact], order: SortOrder) {
    match order {
        SortOrder::Name => contacts.sort_by(compare_names),
        SortOrder::Recent => contacts.sort_by(compare_recent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::Tag;
    use chrono::{Duration, Utc};

    #[test]
    fn test_name_tokens_split_on_any_whitespace() {
        assert_eq!(name_tokens("Amit  Singh"), vec!["amit", "singh"]);
        assert_eq!(name_tokens("\tDr. Neha\nAgarwal "), vec!["dr.", "neha", "agarwal"]);
        assert!(name_tokens("   ").is_empty());
    }

    #[test]
    fn test_phone_digits_strips_punctuation() {
        assert_eq!(phone_digits("+91 76543 21098"), "917654321098");
        assert_eq!(phone_digits("000-0000"), "0000000");
        assert_eq!(phone_digits("(n/a)"), "");
    }

    #[test]
    fn test_phone_tokens_add_national_number() {
        assert_eq!(phone_tokens("+91 76543 21098"), vec!["917654321098", "7654321098"]);
        assert_eq!(phone_tokens("+1 (555) 010-0199"), vec!["15550100199", "5550100199"]);
        assert_eq!(phone_tokens("+917654321098"), vec!["917654321098"]);
        assert_eq!(phone_tokens("000-0000"), vec!["0000000"]);
        assert_eq!(phone_tokens("+ 44 20"), vec!["4420"]);
        assert!(phone_tokens("ext. only").is_empty());
    }

    #[test]
    fn test_email_parts() {
        assert_eq!(email_parts("Orders@PizzaPalace.in"), vec!["orders", "pizzapalace.in"]);
        assert_eq!(email_parts("  "), Vec::<String>::new());
        assert_eq!(email_parts("no-at-sign"), vec!["no-at-sign"]);
        assert_eq!(email_parts("@domain.com"), vec!["domain.com"]);
        assert_eq!(email_parts("a@b@c"), vec!["a", "b@c"]);
    }

    #[test]
    fn test_index_tokens_skip_empty_phone() {
        let tokens = index_tokens("Cab Service", "call desk", None);
        assert_eq!(tokens, vec!["cab", "service"]);
        assert!(tokens.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_index_tokens_field_order() {
        let tokens = index_tokens("Amit Singh", "+91 76543 21098", Some("amit.singh@hotmail.com"));
        assert_eq!(
            tokens,
            vec!["amit", "singh", "917654321098", "7654321098", "amit.singh", "hotmail.com"]
        );
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query("AmI"), Some("ami".to_string()));
        assert_eq!(normalize_query(" AmI "), Some(" ami ".to_string()));
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let mut contacts = vec![
            Contact::new(1, "ravi Mehta", "1"),
            Contact::new(2, "Amit Singh", "2"),
            Contact::new(3, "Pooja Nair", "3"),
        ];
        sort_contacts(&mut contacts, SortOrder::Name);
        let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Amit Singh", "Pooja Nair", "ravi Mehta"]);
    }

    #[test]
    fn test_sort_by_recent_puts_never_called_last() {
        let now = Utc::now();
        let mut a = Contact::new(1, "Zed", "1");
        a.last_called = Some(now - Duration::days(3));
        let mut b = Contact::new(2, "Yan", "2");
        b.last_called = Some(now);
        let c = Contact::new(3, "Bob", "3");
        let d = Contact::new(4, "Abe", "4");

        let mut contacts = vec![c, a, d, b];
        sort_contacts(&mut contacts, SortOrder::Recent);
        let ids: Vec<i64> = contacts.iter().map(|c| c.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_filter_contacts() {
        let mut fav = Contact::new(1, "A", "1").with_tag(Tag::Work);
        fav.favorite = true;
        let plain = Contact::new(2, "B", "2").with_tag(Tag::Family);
        let contacts = vec![fav, plain];

        assert_eq!(filter_contacts(&contacts, ContactFilter::All).len(), 2);
        assert_eq!(filter_contacts(&contacts, ContactFilter::Favorites)[0].id.as_i64(), 1);
        assert_eq!(filter_contacts(&contacts, ContactFilter::Tag(Tag::Family))[0].id.as_i64(), 2);
        assert!(filter_contacts(&contacts, ContactFilter::Tag(Tag::Friends)).is_empty());
    }
}
