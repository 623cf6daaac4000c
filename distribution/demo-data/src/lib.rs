//! Seed contacts shipped with the phonebook and shared with tests.
//!
//! The rows live in `data/contacts.csv` and are parsed once on first access.

use once_cell::sync::Lazy;

const CONTACTS_CSV: &str = include_str!("../data/contacts.csv");

pub struct DemoContact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// One of `family`, `work`, `friends`, `other`
    pub tag: String,
    pub favorite: bool,
    /// Calendar date, `YYYY-MM-DD`
    pub created_at: String,
    pub last_called: Option<String>,
}

static DEMO_CONTACTS: Lazy<Vec<DemoContact>> = Lazy::new(|| parse_contacts(CONTACTS_CSV));

/// The default contact list, in display order.
pub fn demo_contacts() -> &'static [DemoContact] {
    &DEMO_CONTACTS
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Rows that fail to parse are skipped rather than aborting the whole list.
fn parse_contacts(csv_text: &str) -> Vec<DemoContact> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());

    reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| {
            Some(DemoContact {
                id: record.get(0)?.trim().parse().ok()?,
                name: non_empty(record.get(1))?,
                phone: non_empty(record.get(2))?,
                email: non_empty(record.get(3)),
                tag: non_empty(record.get(4)).unwrap_or_else(|| "other".to_string()),
                favorite: record.get(5).map(str::trim) == Some("true"),
                created_at: non_empty(record.get(6))?,
                last_called: non_empty(record.get(7)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rows_parse() {
        assert_eq!(demo_contacts().len(), 18);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<i64> = demo_contacts().iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), demo_contacts().len());
    }

    #[test]
    fn test_optional_last_called() {
        let amit = demo_contacts().iter().find(|c| c.id == 3).unwrap();
        assert_eq!(amit.name, "Amit Singh");
        assert!(amit.last_called.is_none());

        let rajesh = demo_contacts().iter().find(|c| c.id == 1).unwrap();
        assert_eq!(rajesh.last_called.as_deref(), Some("2024-06-20"));
        assert!(rajesh.favorite);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "id,name,phone,email,tag,favorite,created_at,last_called\n\
                    x,Bad Id,123,,other,false,2024-01-01,\n\
                    2,,123,,other,false,2024-01-01,\n\
                    3,Good,555 0101,,work,false,2024-01-01,\n";
        let parsed = parse_contacts(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Good");
        assert_eq!(parsed[0].tag, "work");
        assert!(parsed[0].email.is_none());
    }
}
