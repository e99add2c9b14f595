use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ocr_narrator::export::{default_output_path, export};
use ocr_narrator::pipeline::{extract_and_clean, narrate};
use ocr_narrator::speech::{EdgeTtsSynthesizer, JoinerKind, Voice};
use ocr_narrator::utils::TesseractEngine;
use ocr_narrator::{AppConfig, PdfMode};

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract clean text from scanned documents and narrate it")]
struct Cli {
    #[command(flatten)]
    shared: SharedArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract and clean text, then save it as .txt or .docx
    Extract(ExtractArgs),
    /// Extract, clean and narrate a document to MP3
    Narrate(NarrateArgs),
    /// List the available voices
    Voices,
    /// Report which external tools are installed
    Check,
}

#[derive(Debug, Args)]
struct SharedArgs {
    /// Path to configuration JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not correct page orientation before OCR
    #[arg(long, global = true)]
    no_rotate: bool,

    /// Never split landscape scans into two pages
    #[arg(long, global = true)]
    no_split: bool,

    /// How PDFs are read
    #[arg(long, global = true, value_enum)]
    pdf_mode: Option<PdfMode>,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Document to read (pdf, docx, txt, epub)
    input: PathBuf,

    /// Output file; the extension selects the format
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct NarrateArgs {
    /// Document to read (pdf, docx, txt, epub)
    input: PathBuf,

    /// Output MP3 file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    voice: Option<Voice>,

    /// Maximum characters per synthesis request
    #[arg(long)]
    chunk_budget: Option<usize>,

    /// How audio parts are joined
    #[arg(long, value_enum)]
    joiner: Option<JoinerKind>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => extract_command(&cli.shared, args),
        Commands::Narrate(args) => narrate_command(&cli.shared, args),
        Commands::Voices => {
            for voice in Voice::ALL {
                let name = voice
                    .to_possible_value()
                    .map(|v| v.get_name().to_string())
                    .unwrap_or_default();
                println!("{:<12} {:<22} {}", name, voice.service_id(), voice.label());
            }
            Ok(())
        }
        Commands::Check => check_command(),
    }
}

fn load_config(shared: &SharedArgs) -> Result<AppConfig> {
    let mut config = match &shared.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            AppConfig::load(path)
                .with_context(|| format!("Failed to load config file: {:?}", path))?
        }
        None => AppConfig::default(),
    };

    if shared.no_rotate {
        config.extraction.auto_rotate = false;
    }
    if shared.no_split {
        config.extraction.split_double_page = false;
    }
    if let Some(mode) = shared.pdf_mode {
        config.extraction.pdf_mode = mode;
    }

    Ok(config)
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extract_command(shared: &SharedArgs, args: ExtractArgs) -> Result<()> {
    let config = load_config(shared)?;
    let engine = TesseractEngine::new();

    let cleaned = extract_and_clean(&args.input, &config, &engine)
        .with_context(|| format!("Failed to extract text from {:?}", args.input))?;

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input, "_extraido.docx"));

    export(&cleaned, &source_name(&args.input), &output)
        .with_context(|| format!("Failed to write {:?}", output))?;

    info!(
        "Extraction completed: {} pages, {} characters",
        cleaned.pages.len(),
        cleaned.char_count()
    );
    Ok(())
}

fn narrate_command(shared: &SharedArgs, args: NarrateArgs) -> Result<()> {
    let mut config = load_config(shared)?;
    if let Some(voice) = args.voice {
        config.speech.voice = voice;
    }
    if let Some(budget) = args.chunk_budget {
        config.speech.chunk_budget = budget;
    }
    if let Some(joiner) = args.joiner {
        config.speech.joiner = joiner;
    }
    config.validate().context("Invalid configuration")?;

    let engine = TesseractEngine::new();
    let cleaned = extract_and_clean(&args.input, &config, &engine)
        .with_context(|| format!("Failed to extract text from {:?}", args.input))?;

    let synthesizer = EdgeTtsSynthesizer::new();
    let joiner = config.speech.joiner.build();

    let narration = narrate(&cleaned, &config, &synthesizer, joiner.as_deref())
        .context("Failed to narrate document")?;

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input, "_audiolibro.mp3"));

    fs::write(&output, &narration.audio)
        .with_context(|| format!("Failed to write audio file: {:?}", output))?;

    info!(
        "Audiobook saved to {:?} ({} words, ~{:.1} min)",
        output, narration.metrics.words, narration.metrics.estimated_minutes
    );
    Ok(())
}

fn check_command() -> Result<()> {
    let tools = [
        ("tesseract", "--version", "OCR"),
        ("pdfinfo", "-v", "PDF page count"),
        ("pdftoppm", "-v", "PDF page rendering"),
        ("edge-tts", "--version", "speech synthesis"),
        ("ffmpeg", "-version", "audio joining"),
    ];

    let mut missing = 0;
    for (binary, probe, purpose) in tools {
        if tool_available(binary, probe) {
            println!("[ok]      {:<10} {}", binary, purpose);
        } else {
            missing += 1;
            println!("[missing] {:<10} {}", binary, purpose);
        }
    }

    if missing > 0 {
        warn!("{} external tools are missing", missing);
    }
    Ok(())
}

fn tool_available(binary: &str, probe: &str) -> bool {
    // poppler tools print their version and exit non-zero on some builds
    Command::new(binary).arg(probe).output().is_ok()
}
