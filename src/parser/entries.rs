use std::sync::LazyLock;

use regex::Regex;

// Any whitespace run holding two or more newlines, i.e. at least one blank line.
static BLANK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Split OCR text into blank-line-delimited entries.
///
/// The document is trimmed first. Entries are not guaranteed to be non-empty;
/// an empty document yields one empty entry.
pub fn split_entries(text: &str) -> Vec<&str> {
    BLANK_LINE_RE.split(text.trim()).collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_blank_line() {
        assert_eq!(split_entries("A\n\nB"), vec!["A", "B"]);
    }

    #[test]
    fn many_blank_lines_collapse() {
        assert_eq!(split_entries("A\n\n\n\n\nB"), split_entries("A\n\nB"));
    }

    #[test]
    fn whitespace_only_blank_lines() {
        let entries = split_entries("A\n   \n\t\nB");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "A");
        assert_eq!(entries[1].trim(), "B");
    }

    #[test]
    fn single_newline_keeps_entry_together() {
        assert_eq!(split_entries("Acme\n(555) 123-4567"), vec!["Acme\n(555) 123-4567"]);
    }

    #[test]
    fn document_is_trimmed() {
        assert_eq!(split_entries("\n\n  A\n\nB\n\n   \n"), vec!["A", "B"]);
    }

    #[test]
    fn empty_document() {
        assert_eq!(split_entries(""), vec![""]);
        assert_eq!(split_entries(" \n\n \n"), vec![""]);
    }
}
