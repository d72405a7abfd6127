pub mod entries;
pub mod fields;

use tracing::debug;

/// One business listing pulled out of the OCR text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Record {
    /// Records without a name never reach the output table.
    pub fn is_retained(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

pub struct ParsedDocument {
    pub entries: usize,
    pub records: Vec<Record>,
}

/// Two-pass pipeline: document text → entries → retained records.
pub fn parse_document(text: &str) -> ParsedDocument {
    let entries = entries::split_entries(text);
    let mut records = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        debug!(entry = i + 1, preview = %preview(entry, 300), "processing entry");
        let record = fields::extract_fields(entry);
        if record.is_retained() {
            debug!(
                name = %record.name,
                phone = %record.phone,
                email = %record.email,
                "extracted"
            );
            records.push(record);
        } else {
            debug!(entry = i + 1, "skipping entry without a name");
        }
    }

    ParsedDocument {
        entries: entries.len(),
        records,
    }
}

pub(crate) fn preview(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
