use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::harvest;
use crate::ocr::{self, PageSource};
use crate::parser;
use crate::settings::{ExtractConfig, HarvestConfig};
use crate::sheet;

#[derive(Debug)]
pub struct ExtractSummary {
    pub pages: usize,
    pub entries: usize,
    pub records: usize,
}

impl ExtractSummary {
    pub fn print(&self) {
        println!(
            "Read {} pages, {} entries, saved {} records.",
            self.pages, self.entries, self.records
        );
    }
}

#[derive(Debug)]
pub struct HarvestSummary {
    pub rows: usize,
    pub emails: usize,
}

impl HarvestSummary {
    pub fn print(&self) {
        println!("Scanned {} rows, saved {} unique emails.", self.rows, self.emails);
    }
}

/// Pages → text → entries → records → sheet. Pages past the end of the
/// document are skipped; nothing is written if an existing page fails.
pub fn run_extract(cfg: &ExtractConfig, source: &impl PageSource) -> Result<ExtractSummary> {
    cfg.validate()?;
    info!(
        pdf = %cfg.pdf.display(),
        first = cfg.first_page,
        last = cfg.last_page,
        dpi = cfg.dpi,
        "reading pages"
    );

    let pages = ocr::read_pages(source, cfg.first_page, cfg.last_page)
        .with_context(|| format!("Failed to read pages from {:?}", cfg.pdf))?;
    let blank: Vec<u32> = pages
        .iter()
        .filter(|p| p.text.trim().is_empty())
        .map(|p| p.page)
        .collect();
    if !blank.is_empty() {
        info!(pages = ?blank, "pages without text");
    }
    let text = ocr::join_pages(&pages);

    let doc = parser::parse_document(&text);
    info!(entries = doc.entries, records = doc.records.len(), "parsed entries");
    if doc.records.is_empty() {
        warn!("no records extracted; the sheet will only hold the header row");
    }

    sheet::write_records(&cfg.output, &doc.records)
        .with_context(|| format!("Failed to write {:?}", cfg.output))?;
    info!(output = %cfg.output.display(), "records saved");

    Ok(ExtractSummary {
        pages: pages.len(),
        entries: doc.entries,
        records: doc.records.len(),
    })
}

/// Sheet → strict email matches → sorted list file.
pub fn run_harvest(cfg: &HarvestConfig) -> Result<HarvestSummary> {
    let table = sheet::read_table(&cfg.input)
        .with_context(|| format!("Failed to read {:?}", cfg.input))?;
    let emails = harvest::harvest_emails(&table, &cfg.columns)
        .with_context(|| format!("Cannot harvest emails from {:?}", cfg.input))?;
    info!(rows = table.rows.len(), emails = emails.len(), "harvested emails");

    harvest::write_email_list(&cfg.output, &emails)
        .with_context(|| format!("Failed to write {:?}", cfg.output))?;
    info!(output = %cfg.output.display(), "email list saved");

    Ok(HarvestSummary {
        rows: table.rows.len(),
        emails: emails.len(),
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use std::path::Path;

    struct Pages(Vec<&'static str>);

    impl PageSource for Pages {
        fn page_count(&self) -> Result<u32, ExtractError> {
            Ok(self.0.len() as u32)
        }

        fn page_text(&self, page: u32) -> Result<String, ExtractError> {
            Ok(self.0.get(page as usize - 1).copied().unwrap_or_default().to_string())
        }
    }

    struct Broken;

    impl PageSource for Broken {
        fn page_count(&self) -> Result<u32, ExtractError> {
            Ok(5)
        }

        fn page_text(&self, page: u32) -> Result<String, ExtractError> {
            Err(ExtractError::ToolFailed {
                tool: "pdftoppm",
                page,
                stderr: "Syntax Error: Couldn't read xref table".into(),
            })
        }
    }

    fn extract_cfg(dir: &Path, first: u32, last: u32) -> ExtractConfig {
        ExtractConfig {
            pdf: dir.join("doc.pdf"),
            output: dir.join("output.xlsx"),
            first_page: first,
            last_page: last,
            ..ExtractConfig::default()
        }
    }

    fn harvest_cfg(dir: &Path) -> HarvestConfig {
        HarvestConfig {
            input: dir.join("output.xlsx"),
            output: dir.join("emails.txt"),
            ..HarvestConfig::default()
        }
    }

    #[test]
    fn two_pages_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let source = Pages(vec![
            "Biz One\n(111) 222-3333\nbiz1@example.com\n",
            "Biz Two\nbiz2@example.com\n\n   \n",
        ]);

        let summary = run_extract(&extract_cfg(dir.path(), 1, 2), &source).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.records, 2);

        let table = sheet::read_table(&dir.path().join("output.xlsx")).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 0), "Biz One");
        assert_eq!(table.cell(0, 1), "(111) 222-3333");
        assert_eq!(table.cell(1, 2), "biz2@example.com");

        let h = run_harvest(&harvest_cfg(dir.path())).unwrap();
        assert_eq!(h.rows, 2);
        assert_eq!(h.emails, 2);
        let list = std::fs::read_to_string(dir.path().join("emails.txt")).unwrap();
        assert_eq!(list, "biz1@example.com, biz2@example.com");
    }

    #[test]
    fn page_range_selects_pages() {
        let dir = tempfile::tempdir().unwrap();
        let source = Pages(vec!["Skipped Co", "Kept Co\n(555) 123-4567", "Also Skipped"]);
        let summary = run_extract(&extract_cfg(dir.path(), 2, 2), &source).unwrap();
        assert_eq!(summary.pages, 1);

        let table = sheet::read_table(&dir.path().join("output.xlsx")).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, 0), "Kept Co");
    }

    #[test]
    fn blank_pages_still_write_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run_extract(&extract_cfg(dir.path(), 1, 3), &Pages(vec!["", "  \n", ""])).unwrap();
        assert_eq!(summary.records, 0);

        let table = sheet::read_table(&dir.path().join("output.xlsx")).unwrap();
        assert_eq!(table.headers, vec!["Name", "Phone", "Email"]);
        assert!(table.rows.is_empty());

        run_harvest(&harvest_cfg(dir.path())).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("emails.txt")).unwrap(), "");
    }

    #[test]
    fn range_past_document_end_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let source = Pages(vec!["First Co\n(555) 123-4567\n", "Second Co\nsecond@example.com"]);
        let summary = run_extract(&extract_cfg(dir.path(), 1, 3), &source).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.records, 2);

        let table = sheet::read_table(&dir.path().join("output.xlsx")).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 0), "First Co");
        assert_eq!(table.cell(1, 0), "Second Co");
    }

    #[test]
    fn range_starting_past_end_writes_empty_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run_extract(&extract_cfg(dir.path(), 4, 6), &Pages(vec!["Only Co"])).unwrap();
        assert_eq!(summary.pages, 0);
        assert_eq!(summary.records, 0);

        let table = sheet::read_table(&dir.path().join("output.xlsx")).unwrap();
        assert_eq!(table.headers, vec!["Name", "Phone", "Email"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn page_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_extract(&extract_cfg(dir.path(), 1, 2), &Broken).is_err());
        assert!(!dir.path().join("output.xlsx").exists());
    }

    #[test]
    fn invalid_range_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_extract(&extract_cfg(dir.path(), 5, 4), &Broken).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::PageRange { first: 5, last: 4 })
        ));
    }

    #[test]
    fn harvest_missing_columns_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("other.xlsx");
        let mut wb = rust_xlsxwriter::Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "Company").unwrap();
        ws.write_string(0, 1, "Email").unwrap();
        ws.write_string(1, 0, "a@b.com").unwrap();
        wb.save(&input).unwrap();

        let cfg = HarvestConfig {
            input,
            ..harvest_cfg(dir.path())
        };
        let err = run_harvest(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("Name"));
        assert!(!dir.path().join("emails.txt").exists());
    }

    #[test]
    fn harvest_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_harvest(&harvest_cfg(dir.path())).is_err());
        assert!(!dir.path().join("emails.txt").exists());
    }
}
