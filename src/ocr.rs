//! Scanned-page text source.
//!
//! Pages are counted with `pdfinfo`, rendered with `pdftoppm` (both
//! poppler-utils) and read with `tesseract`. Both tools sit behind small traits so the rest of the
//! pipeline only ever sees page text.

use std::path::{Path, PathBuf};
use std::process::Command;

use indicatif::{ProgressBar, ProgressStyle};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::ExtractError;

/// Renders one PDF page into an image file inside `out_dir`.
pub trait Rasterizer {
    fn page_count(&self, pdf: &Path) -> Result<u32, ExtractError>;
    fn render(&self, pdf: &Path, page: u32, dpi: u32, out_dir: &Path) -> Result<PathBuf, ExtractError>;
}

/// Turns a page image into plain text. Empty text is a valid result.
pub trait OcrEngine {
    fn recognize(&self, image: &Path) -> Result<String, ExtractError>;
}

/// Anything that can hand back the text of a 1-based page.
pub trait PageSource {
    fn page_count(&self) -> Result<u32, ExtractError>;
    fn page_text(&self, page: u32) -> Result<String, ExtractError>;
}

#[derive(Debug, Clone)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}

pub struct Pdftoppm;

impl Rasterizer for Pdftoppm {
    fn page_count(&self, pdf: &Path) -> Result<u32, ExtractError> {
        let output = Command::new("pdfinfo")
            .arg(pdf)
            .output()
            .map_err(|source| ExtractError::ToolLaunch { tool: "pdfinfo", source })?;

        if !output.status.success() {
            return Err(ExtractError::PdfInfo {
                pdf: pdf.to_path_buf(),
                stderr: single_line(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        parse_page_count(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| ExtractError::PdfInfo {
            pdf: pdf.to_path_buf(),
            stderr: "no Pages: line in pdfinfo output".to_string(),
        })
    }

    fn render(&self, pdf: &Path, page: u32, dpi: u32, out_dir: &Path) -> Result<PathBuf, ExtractError> {
        let prefix = out_dir.join(format!("page_{}", page));
        let output = Command::new("pdftoppm")
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg("-singlefile")
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|source| ExtractError::ToolLaunch { tool: "pdftoppm", source })?;

        if !output.status.success() {
            return Err(ExtractError::ToolFailed {
                tool: "pdftoppm",
                page,
                stderr: single_line(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        let png = prefix.with_extension("png");
        if !png.exists() {
            return Err(ExtractError::MissingImage(png));
        }
        Ok(png)
    }
}

fn parse_page_count(info: &str) -> Option<u32> {
    info.lines()
        .find_map(|l| l.strip_prefix("Pages:"))
        .and_then(|n| n.trim().parse().ok())
}

pub struct Tesseract {
    pub lang: String,
}

impl OcrEngine for Tesseract {
    fn recognize(&self, image: &Path) -> Result<String, ExtractError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|source| ExtractError::ToolLaunch { tool: "tesseract", source })?;

        // A page tesseract chokes on contributes whatever it printed, usually nothing.
        if !output.status.success() {
            warn!(
                image = %image.display(),
                stderr = %single_line(&String::from_utf8_lossy(&output.stderr)),
                "tesseract exited with an error"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A PDF read page by page through a rasterizer and an OCR engine.
/// Rendered images live in a temporary directory removed on drop.
pub struct ScannedPdf<R, O> {
    pdf: PathBuf,
    dpi: u32,
    rasterizer: R,
    ocr: O,
    scratch: TempDir,
}

impl<R: Rasterizer, O: OcrEngine> ScannedPdf<R, O> {
    pub fn open(pdf: &Path, dpi: u32, rasterizer: R, ocr: O) -> Result<Self, ExtractError> {
        if !pdf.is_file() {
            return Err(ExtractError::MissingInput(pdf.to_path_buf()));
        }
        Ok(Self {
            pdf: pdf.to_path_buf(),
            dpi,
            rasterizer,
            ocr,
            scratch: tempfile::tempdir()?,
        })
    }
}

impl<R: Rasterizer, O: OcrEngine> PageSource for ScannedPdf<R, O> {
    fn page_count(&self) -> Result<u32, ExtractError> {
        self.rasterizer.page_count(&self.pdf)
    }

    fn page_text(&self, page: u32) -> Result<String, ExtractError> {
        let image = self.rasterizer.render(&self.pdf, page, self.dpi, self.scratch.path())?;
        let text = self.ocr.recognize(&image)?;
        // Each image is consumed once; leftovers go with the scratch dir.
        if let Err(e) = std::fs::remove_file(&image) {
            debug!(image = %image.display(), error = %e, "could not remove page image");
        }
        Ok(text)
    }
}

/// Whether `pdfinfo`, `pdftoppm` and `tesseract` can be launched from `PATH`.
pub fn tools_available() -> Vec<(&'static str, bool)> {
    [("pdfinfo", "-v"), ("pdftoppm", "-v"), ("tesseract", "--version")]
        .into_iter()
        .map(|(tool, flag)| (tool, command_available(tool, flag)))
        .collect()
}

fn command_available(tool: &str, flag: &str) -> bool {
    Command::new(tool).arg(flag).output().is_ok()
}

/// Read pages `first..=last` in order, one at a time. `last` is clamped to
/// the document's page count; a range starting past the end reads nothing.
pub fn read_pages(source: &impl PageSource, first: u32, last: u32) -> Result<Vec<PageText>, ExtractError> {
    if first == 0 || first > last {
        return Err(ExtractError::PageRange { first, last });
    }

    let count = source.page_count()?;
    let last = if last > count {
        warn!(requested = last, pages = count, "page range runs past the end of the document");
        count
    } else {
        last
    };
    if first > last {
        return Ok(Vec::new());
    }

    let pb = ProgressBar::new(u64::from(last - first + 1));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages (eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut pages = Vec::with_capacity((last - first + 1) as usize);
    for page in first..=last {
        let text = source.page_text(page)?;
        let chars = text.chars().count();
        pb.suspend(|| {
            if chars > 0 {
                info!(page, chars, "page read");
                debug!(page, snippet = %crate::parser::preview(&text, 200), "text snippet");
            } else {
                warn!(page, "no text extracted; the page may have poor image quality or no text");
            }
        });
        pages.push(PageText { page, text });
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(pages)
}

/// Concatenate page texts in page order, each preceded by a newline.
pub fn join_pages(pages: &[PageText]) -> String {
    let mut all = String::with_capacity(pages.iter().map(|p| p.text.len() + 1).sum());
    for p in pages {
        all.push('\n');
        all.push_str(&p.text);
    }
    all
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──
