use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::sheet::Table;

// Stricter than the `@` check used while extracting records: needs a dotted
// domain ending in two or more letters.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").unwrap());

pub type EmailSet = BTreeSet<String>;

/// Collect every well-formed email found in the given columns, lowercased.
/// Fails before scanning if any column is missing.
pub fn harvest_emails(table: &Table, columns: &[String]) -> Result<EmailSet, ExtractError> {
    let cols = table.require_columns(columns)?;
    let mut emails = EmailSet::new();

    for row in 0..table.rows.len() {
        for &col in &cols {
            emails.extend(find_emails(table.cell(row, col)));
        }
    }

    Ok(emails)
}

pub fn find_emails(text: &str) -> impl Iterator<Item = String> + '_ {
    EMAIL_RE.find_iter(text).map(|m| m.as_str().to_lowercase())
}

pub fn serialize_emails(emails: &EmailSet) -> String {
    emails.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Write the joined list verbatim, no trailing newline.
pub fn write_email_list(path: &Path, emails: &EmailSet) -> Result<(), ExtractError> {
    std::fs::write(path, serialize_emails(emails))?;
    Ok(())
}

// ── Tests ──
