//! Record ID generation with date-based prefixes.
//!
//! IDs look like `bp-2026-08-05-q7e3`: a kind prefix, the creation date, and
//! a random base36 suffix. The date makes listings sort naturally; the suffix
//! keeps collisions out of same-day batches without a central counter.

use chrono::Local;
use rand::Rng;

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The kinds of record an ID can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Blueprint,
    Style,
    Story,
}

impl RecordKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Blueprint => "bp",
            Self::Style => "ar",
            Self::Story => "st",
        }
    }
}

/// Generate a new record ID in the format `PREFIX-YYYY-MM-DD-XXXX`.
pub fn generate_id(kind: RecordKind) -> String {
    let date = Local::now().format("%Y-%m-%d").to_string();
    format!("{}-{}-{}", kind.prefix(), date, random_base36(4))
}

/// Generate a random base36 string of the given length.
fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36_CHARS[rng.gen_range(0..36)] as char)
        .collect()
}

/// Check whether an ID carries the prefix for a record kind.
pub fn is_kind(id: &str, kind: RecordKind) -> bool {
    id.starts_with(&format!("{}-", kind.prefix()))
}
