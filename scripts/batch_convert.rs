use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use ocr_narrator::extraction::SourceKind;
use ocr_narrator::pipeline::extract_and_clean;
use ocr_narrator::utils::text_processor::word_count;
use ocr_narrator::utils::TesseractEngine;
use ocr_narrator::{AppConfig, CleanedDocument, PdfMode};

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract and clean every document in a directory")]
struct Args {
    /// Input directory containing PDF/DOCX/TXT/EPUB files
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the cleaned text files
    #[arg(short, long)]
    output: PathBuf,

    /// Path to configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// How PDFs are read
    #[arg(long, value_enum)]
    pdf_mode: Option<PdfMode>,

    /// Keep the page separator between pages in the output files
    #[arg(long, default_value = "false")]
    keep_page_markers: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentMetadata {
    filename: String,
    file_type: String,
    page_count: usize,
    character_count: usize,
    word_count: usize,
    processed_at: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CorpusMetadata {
    total_documents: usize,
    failed_documents: usize,
    total_characters: usize,
    total_words: usize,
    documents: Vec<DocumentMetadata>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Starting batch conversion");
    info!("Input directory: {:?}", args.input);
    info!("Output directory: {:?}", args.output);

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None => AppConfig::default(),
    };
    if let Some(mode) = args.pdf_mode {
        config.extraction.pdf_mode = mode;
    }

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory: {:?}", args.output))?;

    let files = find_documents(&args.input);
    info!("Found {} documents", files.len());

    if files.is_empty() {
        anyhow::bail!("No supported documents found in {:?}", args.input);
    }

    let engine = TesseractEngine::new();
    let mut documents = Vec::new();
    let mut failed = 0;

    for (idx, path) in files.iter().enumerate() {
        info!("Processing {}/{}: {:?}", idx + 1, files.len(), path);

        match extract_and_clean(path, &config, &engine) {
            Ok(cleaned) => {
                let metadata = write_document(
                    &args.input,
                    path,
                    &cleaned,
                    &args.output,
                    args.keep_page_markers,
                )?;
                documents.push(metadata);
            }
            Err(e) => {
                failed += 1;
                warn!("Failed to process {:?}: {}", path, e);
            }
        }
    }

    if documents.is_empty() {
        anyhow::bail!("No text extracted from any document");
    }

    let metadata = CorpusMetadata {
        total_documents: documents.len(),
        failed_documents: failed,
        total_characters: documents.iter().map(|d| d.character_count).sum(),
        total_words: documents.iter().map(|d| d.word_count).sum(),
        documents,
    };

    let metadata_path = args.output.join("metadata.json");
    let metadata_json = serde_json::to_string_pretty(&metadata)?;
    fs::write(&metadata_path, metadata_json)
        .with_context(|| format!("Failed to write metadata: {:?}", metadata_path))?;
    info!("Metadata saved to: {:?}", metadata_path);

    info!("Batch conversion complete!");
    info!("Summary:");
    info!("  - Documents: {}", metadata.total_documents);
    info!("  - Failed: {}", metadata.failed_documents);
    info!("  - Characters: {}", metadata.total_characters);
    info!("  - Words: {}", metadata.total_words);

    Ok(())
}

fn find_documents(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| SourceKind::is_supported(p))
        .collect();
    files.sort();
    files
}

/// Output file name for a source document: its path below `root` with
/// separators flattened, extension kept, so `libro.pdf` and `libro.docx`
/// (or `a/libro.pdf` and `b/libro.pdf`) never overwrite each other.
fn output_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let flattened = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.txt", flattened)
}

fn write_document(
    root: &Path,
    path: &Path,
    cleaned: &CleanedDocument,
    output_dir: &Path,
    keep_page_markers: bool,
) -> Result<DocumentMetadata> {
    let text = if keep_page_markers {
        cleaned.to_marked_text()
    } else {
        cleaned.to_plain_text()
    };

    let filename = output_name(root, path);

    let doc_path = output_dir.join(&filename);
    fs::write(&doc_path, &text)
        .with_context(|| format!("Failed to write document: {:?}", doc_path))?;

    let plain = cleaned.to_plain_text();

    Ok(DocumentMetadata {
        file_type: path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_lowercase(),
        filename,
        page_count: cleaned.pages.len(),
        character_count: plain.chars().count(),
        word_count: word_count(&plain),
        processed_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
    })
}
