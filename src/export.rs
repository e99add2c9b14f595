use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::document::CleanedDocument;
use crate::error::{NarratorError, Result};
use crate::utils::docx;

/// Output formats for extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Docx,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" => Ok(ExportFormat::Text),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(NarratorError::UnsupportedFormat(format!(
                "cannot export to '{}'",
                other
            ))),
        }
    }
}

/// `libro.pdf` + `_extraido.docx` -> `libro_extraido.docx`, next to the input.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("documento");
    input.with_file_name(format!("{}{}", stem, suffix))
}

/// Split text into paragraphs on blank lines.
pub fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

/// Write the cleaned document to `output`, format chosen by extension.
pub fn export(cleaned: &CleanedDocument, source_name: &str, output: &Path) -> Result<()> {
    let text = cleaned.to_plain_text();

    let bytes = match ExportFormat::from_path(output)? {
        ExportFormat::Text => text.into_bytes(),
        ExportFormat::Docx => {
            let heading = format!("Texto extraído de: {}", source_name);
            docx::build_docx(&heading, &paragraphs(&text))?
        }
    };

    fs::write(output, bytes).map_err(|e| NarratorError::Export {
        path: output.to_path_buf(),
        reason: e.to_string(),
    })?;

    info!("Exported text to {:?}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cleaned() -> CleanedDocument {
        CleanedDocument::new(vec![
            "Primer párrafo\n\nSegundo".to_string(),
            "Tercero".to_string(),
        ])
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        assert_eq!(
            paragraphs("a\nb\n\n\n\nc\n\n  \n\nd"),
            vec!["a\nb".to_string(), "c".to_string(), "d".to_string()]
        );
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/tmp/libro.pdf"), "_extraido.docx");
        assert_eq!(path, PathBuf::from("/tmp/libro_extraido.docx"));
    }

    #[test]
    fn test_export_text_and_docx() {
        let dir = TempDir::new().unwrap();

        let txt = dir.path().join("out.txt");
        export(&cleaned(), "libro.pdf", &txt).unwrap();
        assert_eq!(
            fs::read_to_string(&txt).unwrap(),
            "Primer párrafo\n\nSegundo\n\nTercero"
        );

        let docx_path = dir.path().join("out.docx");
        export(&cleaned(), "libro.pdf", &docx_path).unwrap();
        let read = docx::extract_paragraphs(&fs::read(&docx_path).unwrap(), "out.docx").unwrap();
        assert_eq!(
            read,
            vec![
                "Texto extraído de: libro.pdf",
                "Primer párrafo",
                "Segundo",
                "Tercero"
            ]
        );
    }

    #[test]
    fn test_unknown_export_format() {
        let result = ExportFormat::from_path(Path::new("out.odt"));
        assert!(matches!(result, Err(NarratorError::UnsupportedFormat(_))));
    }
}
