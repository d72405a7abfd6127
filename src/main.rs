mod error;
mod harvest;
mod ocr;
mod parser;
mod pipeline;
mod settings;
mod sheet;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use ocr::{Pdftoppm, ScannedPdf, Tesseract};
use settings::{ExtractConfig, HarvestConfig, Settings};

#[derive(Parser)]
#[command(name = "chamber_extract", about = "Business directory extraction from scanned PDFs")]
struct Cli {
    /// TOML settings file (default: ./chamber.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR a page range and save Name/Phone/Email rows to a spreadsheet
    Extract(ExtractArgs),
    /// Collect unique emails from a spreadsheet into a text file
    Emails(EmailArgs),
    /// Extract, then collect emails from the sheet just written
    Run {
        #[command(flatten)]
        extract: ExtractArgs,
        /// Email list output file
        #[arg(long)]
        emails_output: Option<PathBuf>,
    },
    /// Check that pdftoppm and tesseract are installed
    Check,
}

#[derive(Args)]
struct ExtractArgs {
    /// Source PDF
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// Spreadsheet to write
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// First page, 1-based
    #[arg(short, long)]
    first_page: Option<u32>,
    /// Last page, inclusive
    #[arg(short, long)]
    last_page: Option<u32>,
    /// Rasterization resolution
    #[arg(long)]
    dpi: Option<u32>,
    /// Tesseract language
    #[arg(long)]
    lang: Option<String>,
}

impl ExtractArgs {
    fn apply(self, cfg: &mut ExtractConfig) {
        if let Some(v) = self.pdf {
            cfg.pdf = v;
        }
        if let Some(v) = self.output {
            cfg.output = v;
        }
        if let Some(v) = self.first_page {
            cfg.first_page = v;
        }
        if let Some(v) = self.last_page {
            cfg.last_page = v;
        }
        if let Some(v) = self.dpi {
            cfg.dpi = v;
        }
        if let Some(v) = self.lang {
            cfg.lang = v;
        }
    }
}

#[derive(Args)]
struct EmailArgs {
    /// Spreadsheet with Name and Email columns
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Email list output file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl EmailArgs {
    fn apply(self, cfg: &mut HarvestConfig) {
        if let Some(v) = self.input {
            cfg.input = v;
        }
        if let Some(v) = self.output {
            cfg.output = v;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Extract(args) => {
            args.apply(&mut settings.extract);
            extract(&settings.extract)
        }
        Commands::Emails(args) => {
            args.apply(&mut settings.emails);
            emails(&settings.emails)
        }
        Commands::Run { extract: args, emails_output } => {
            args.apply(&mut settings.extract);
            // The harvester always reads the sheet this run produced.
            settings.emails.input = settings.extract.output.clone();
            if let Some(v) = emails_output {
                settings.emails.output = v;
            }
            extract(&settings.extract).and_then(|()| emails(&settings.emails))
        }
        Commands::Check => {
            let mut missing = 0;
            for (tool, ok) in ocr::tools_available() {
                println!("{:<10} {}", tool, if ok { "ok" } else { "not found" });
                if !ok {
                    missing += 1;
                }
            }
            if missing > 0 {
                println!("\nInstall poppler-utils and tesseract-ocr to run 'extract'.");
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn extract(cfg: &ExtractConfig) -> anyhow::Result<()> {
    println!(
        "Extracting pages {}-{} of {} at {} dpi...",
        cfg.first_page,
        cfg.last_page,
        cfg.pdf.display(),
        cfg.dpi
    );
    let source = ScannedPdf::open(
        &cfg.pdf,
        cfg.dpi,
        Pdftoppm,
        Tesseract {
            lang: cfg.lang.clone(),
        },
    )
    .with_context(|| format!("Cannot open {:?}", cfg.pdf))?;

    let summary = pipeline::run_extract(cfg, &source)?;
    summary.print();
    println!("Saved to {}", cfg.output.display());
    Ok(())
}

fn emails(cfg: &HarvestConfig) -> anyhow::Result<()> {
    println!("Collecting emails from {}...", cfg.input.display());
    let summary = pipeline::run_harvest(cfg)?;
    summary.print();
    println!("Saved to {}", cfg.output.display());
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
