mod error;
mod output;
mod parser;
mod pdf;
mod record;
mod settings;
mod stats;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use parser::fragments;
use pdf::{PdfDocument, SpanSource};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "quiz_extractor",
    about = "Extract multiple-choice quizbowl questions from a PDF question bank"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract questions and write them as a JSON array
    Extract {
        /// PDF to read (default: `input` setting)
        input: Option<PathBuf>,
        /// JSON file to write (default: `output` setting)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Leading pages to skip entirely
        #[arg(long)]
        cover_pages: Option<usize>,
        /// Number of extracted questions to print after saving
        #[arg(long)]
        preview: Option<usize>,
    },
    /// Extract questions and report counts without writing anything
    Stats {
        /// PDF to read (default: `input` setting)
        input: Option<PathBuf>,
        #[arg(long)]
        cover_pages: Option<usize>,
    },
    /// Print the text fragments the parser sees, with bold and marker flags
    Spans {
        /// PDF to read (default: `input` setting)
        input: Option<PathBuf>,
        /// 1-based page to dump (default: all pages)
        #[arg(short, long)]
        page: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;

    match cli.command {
        Commands::Extract {
            input,
            output,
            cover_pages,
            preview,
        } => {
            if let Some(n) = cover_pages {
                settings.cover_pages = n;
            }
            let input = input.unwrap_or_else(|| PathBuf::from(&settings.input));
            let output = output.unwrap_or_else(|| PathBuf::from(&settings.output));
            let preview = preview.unwrap_or(settings.preview);

            println!("Extracting questions from {}...", input.display());
            let extraction = run_extraction(&input, &settings)?;
            let summary = stats::Summary::new(&extraction);
            println!("\n{}", summary.render(false));

            output::write_questions(&output, &extraction.records)?;
            println!("Saved {} questions to {}", extraction.records.len(), output.display());

            if preview > 0 && !extraction.records.is_empty() {
                println!("\n=== FIRST {} QUESTIONS ===", preview.min(extraction.records.len()));
                for record in extraction.records.iter().take(preview) {
                    println!("{}\n", serde_json::to_string_pretty(record)?);
                }
            }
        }
        Commands::Stats { input, cover_pages } => {
            if let Some(n) = cover_pages {
                settings.cover_pages = n;
            }
            let input = input.unwrap_or_else(|| PathBuf::from(&settings.input));
            let extraction = run_extraction(&input, &settings)?;
            print!("{}", stats::Summary::new(&extraction).render(true));

            for q in &extraction.rejected {
                info!(page = q.page, grade = %q.grade, number = %q.number, reason = %q.rejection, "rejected");
            }
        }
        Commands::Spans { input, page } => {
            let input = input.unwrap_or_else(|| PathBuf::from(&settings.input));
            dump_fragments(&input, page, &settings)?;
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", stats::format_duration(elapsed));
    }

    Ok(())
}

/// Open the PDF, run the parser over every page, and release the document.
fn run_extraction(input: &Path, settings: &Settings) -> Result<parser::Extraction> {
    let pdf = PdfDocument::open(input)?;
    info!(path = %input.display(), pages = pdf.page_count(), "opened PDF");

    let pb = ProgressBar::new(pdf.page_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages")?
            .progress_chars("#>-"),
    );

    let extraction = parser::extract_document(&pdf, &settings.parse_options(), &pb);
    pb.finish_and_clear();
    Ok(extraction)
}

fn dump_fragments(input: &Path, page: Option<usize>, settings: &Settings) -> Result<()> {
    let pdf = PdfDocument::open(input)?;
    let pages: Vec<usize> = match page {
        Some(p) if (1..=pdf.page_count()).contains(&p) => vec![p - 1],
        Some(p) => anyhow::bail!("page {p} out of range (document has {} pages)", pdf.page_count()),
        None => (0..pdf.page_count()).collect(),
    };
    let sections = parser::sections::SectionTracker::new(settings.header_marker.as_str());

    for index in pages {
        println!("--- page {} ---", index + 1);
        for frag in parser::page_fragments(&pdf, index, &settings.bold_marker)? {
            let kind = if sections.is_header(&frag) {
                "H"
            } else if fragments::is_question_start(&frag.text) {
                "Q"
            } else if fragments::is_option_start(&frag.text) {
                "O"
            } else {
                " "
            };
            let bold = if frag.is_bold { "B" } else { " " };
            println!("{kind}{bold} {}", frag.text);
        }
    }
    Ok(())
}
