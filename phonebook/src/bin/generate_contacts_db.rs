//! Generate a synthetic phonebook database for benchmarks.
//!
//! Builds contacts from name/domain word lists and writes them through the
//! real ContactStore, so the file has exactly the layout the app reads.
//!
//! Usage:
//!     cargo run --release --bin generate-contacts-db -- --count 50000

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use phonebook::{Contact, ContactStore, StoreOptions, Tag};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of contacts to generate
    #[arg(short, long, default_value_t = 10_000)]
    count: usize,

    /// Path to save the SQLite database
    #[arg(short, long, default_value = "SyntheticContacts.sqlite")]
    db_path: PathBuf,

    /// RNG seed, for reproducible files
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Share of contacts marked favorite
    #[arg(long, default_value_t = 0.2)]
    favorite_ratio: f64,
}

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Aditi", "Amit", "Ananya", "Arjun", "Deepa", "Divya", "Farhan", "Gaurav", "Ishaan",
    "Kavya", "Karan", "Lakshmi", "Meera", "Neha", "Nikhil", "Pooja", "Priya", "Rahul", "Rajesh",
    "Ravi", "Rohit", "Sanjay", "Shreya", "Sneha", "Sunita", "Tanvi", "Varun", "Vikram", "Zoya",
];

const LAST_NAMES: &[&str] = &[
    "Agarwal", "Bose", "Chopra", "Das", "Gupta", "Iyer", "Joshi", "Kapoor", "Khan", "Kumar",
    "Mehta", "Menon", "Nair", "Patel", "Rao", "Reddy", "Shah", "Sharma", "Singh", "Verma",
];

const DOMAINS: &[&str] = &[
    "gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "company.in", "startup.io",
];

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words[rng.gen_range(0..words.len())]
}

fn generate_contact(rng: &mut StdRng, id: i64, favorite_ratio: f64) -> Contact {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let phone = format!(
        "+91 {}{:04} {:05}",
        rng.gen_range(6..=9),
        rng.gen_range(0..10_000),
        rng.gen_range(0..100_000)
    );

    let mut contact = Contact::new(id, format!("{first} {last}"), phone)
        .with_tag(Tag::ALL[rng.gen_range(0..Tag::ALL.len())]);

    if rng.gen_bool(0.6) {
        contact = contact.with_email(format!(
            "{}.{}{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            rng.gen_range(1..100),
            pick(rng, DOMAINS)
        ));
    }
    contact.favorite = rng.gen_bool(favorite_ratio.clamp(0.0, 1.0));
    contact.created_at = Utc::now() - Duration::days(rng.gen_range(0..730));
    if rng.gen_bool(0.5) {
        contact.last_called = Some(Utc::now() - Duration::minutes(rng.gen_range(0..60 * 24 * 90)));
    }
    contact
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.db_path.exists() {
        std::fs::remove_file(&args.db_path)
            .with_context(|| format!("Failed to remove {}", args.db_path.display()))?;
    }

    println!("Generating {} contacts...", args.count);
    println!("Output: {}", args.db_path.display());

    let store = ContactStore::open_with_options(&args.db_path, StoreOptions::empty())
        .context("Failed to create database")?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let contacts: Vec<Contact> = (1..=args.count as i64)
        .map(|id| generate_contact(&mut rng, id, args.favorite_ratio))
        .collect();
    let with_email = contacts.iter().filter(|c| c.email.is_some()).count();

    store
        .replace_contacts(contacts)
        .context("Failed to write contacts")?;

    let sample_matches = store.search("am").len();
    let size = store.database_size().context("Failed to read database size")?;

    println!();
    println!("Database created: {}", args.db_path.display());
    println!("  Contacts: {}", store.len());
    println!("  With email: {}", with_email);
    println!("  Matches for \"am\": {}", sample_matches);
    println!(
        "  Database size: {:.2} MB",
        size as f64 / 1024.0 / 1024.0
    );
    Ok(())
}
