use std::sync::LazyLock;

use regex::Regex;

use super::Record;

// (DDD) DDD-DDDD with at most one space after the area code.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d{3}\) ?\d{3}-\d{4}").unwrap());

/// Derive a record from one entry: the first non-blank line is the name,
/// then the first phone-looking line and the first `@` token are picked up.
pub fn extract_fields(entry: &str) -> Record {
    let mut lines = entry.split('\n').map(str::trim).filter(|l| !l.is_empty());

    let Some(name) = lines.next() else {
        return Record::default();
    };

    let mut phone: Option<&str> = None;
    let mut email: Option<&str> = None;

    for line in lines {
        if phone.is_none() && PHONE_RE.is_match(line) {
            phone = Some(line);
        }
        if email.is_none() && line.contains('@') {
            email = line.split_whitespace().find(|w| w.contains('@'));
        }
        if phone.is_some() && email.is_some() {
            break;
        }
    }

    Record {
        name: name.to_string(),
        phone: phone.unwrap_or_default().to_string(),
        email: email.unwrap_or_default().to_string(),
    }
}

// ── Tests ──
