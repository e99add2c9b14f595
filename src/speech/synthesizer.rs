use std::fs;
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

use super::{SpeechError, Voice};

/// Capability to turn one chunk of text into compressed audio.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SpeechError>;
}

/// Speech synthesis through the `edge-tts` command line client (MP3 output).
#[derive(Debug, Clone)]
pub struct EdgeTtsSynthesizer {
    binary: String,
}

impl EdgeTtsSynthesizer {
    pub fn new() -> Self {
        Self {
            binary: "edge-tts".to_string(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for EdgeTtsSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for EdgeTtsSynthesizer {
    fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SpeechError> {
        let work_dir = TempDir::new()?;
        let text_path = work_dir.path().join("input.txt");
        let audio_path = work_dir.path().join("output.mp3");

        fs::write(&text_path, text)?;

        debug!(
            "Synthesizing {} characters with {}",
            text.chars().count(),
            voice.service_id()
        );

        let output = Command::new(&self.binary)
            .args(["--voice", voice.service_id()])
            .arg("--file")
            .arg(&text_path)
            .arg("--write-media")
            .arg(&audio_path)
            .output();

        match output {
            Ok(output) if output.status.success() => Ok(fs::read(&audio_path)?),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(SpeechError::Failed(format!("edge-tts failed: {}", stderr.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SpeechError::NotAvailable(
                "edge-tts not found (pip install edge-tts)".to_string(),
            )),
            Err(e) => Err(SpeechError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        let synth = EdgeTtsSynthesizer::with_binary("definitely-not-edge-tts");
        assert!(!synth.is_available());
        assert!(matches!(
            synth.synthesize("hola", Voice::AlvaroEs),
            Err(SpeechError::NotAvailable(_))
        ));
    }
}
