use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to start {tool}: {source}")]
    ToolLaunch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed for page {page}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        page: u32,
        stderr: String,
    },

    #[error("pdfinfo could not read {}: {stderr}", .pdf.display())]
    PdfInfo { pdf: PathBuf, stderr: String },

    #[error("pdftoppm did not produce {}", .0.display())]
    MissingImage(PathBuf),

    #[error("invalid page range {first}..={last} (pages are 1-based, first <= last)")]
    PageRange { first: u32, last: u32 },

    #[error("dpi must be greater than zero")]
    Dpi,

    #[error("the input file must have columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("workbook has no worksheets")]
    EmptyWorkbook,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Calamine(#[from] calamine::Error),
}
