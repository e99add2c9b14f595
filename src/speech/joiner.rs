use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::SpeechError;

/// Which audio concatenation capability to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JoinerKind {
    /// ffmpeg concat demuxer, stream copy
    Ffmpeg,
    /// Raw MP3 frame concatenation
    Stream,
    /// No concatenation; long text is truncated
    None,
}

impl JoinerKind {
    pub fn build(self) -> Option<Box<dyn AudioJoiner>> {
        match self {
            JoinerKind::Ffmpeg => Some(Box::new(FfmpegJoiner::new())),
            JoinerKind::Stream => Some(Box::new(StreamJoiner)),
            JoinerKind::None => None,
        }
    }
}

/// Concatenates audio segments, in order, with no gap between them.
pub trait AudioJoiner {
    fn is_available(&self) -> bool;

    fn join(&self, parts: &[PathBuf], output: &Path) -> Result<(), SpeechError>;
}

#[derive(Debug, Clone)]
pub struct FfmpegJoiner {
    binary: String,
}

impl FfmpegJoiner {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }
}

impl Default for FfmpegJoiner {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioJoiner for FfmpegJoiner {
    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn join(&self, parts: &[PathBuf], output: &Path) -> Result<(), SpeechError> {
        let list_path = output.with_extension("list.txt");
        let mut list = fs::File::create(&list_path)?;
        for part in parts {
            // concat demuxer quoting: ' becomes '\''
            let quoted = part.display().to_string().replace('\'', "'\\''");
            writeln!(list, "file '{}'", quoted)?;
        }
        drop(list);

        let result = Command::new(&self.binary)
            .args(["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list_path)
            .args(["-c", "copy"])
            .arg(output)
            .output();

        let _ = fs::remove_file(&list_path);

        match result {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => Err(SpeechError::Join(
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SpeechError::NotAvailable("ffmpeg not found".to_string()))
            }
            Err(e) => Err(SpeechError::Io(e)),
        }
    }
}

/// Appends the bytes of each MP3 part. MP3 is a sequence of independent
/// frames, so the result plays back as one stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamJoiner;

impl AudioJoiner for StreamJoiner {
    fn is_available(&self) -> bool {
        true
    }

    fn join(&self, parts: &[PathBuf], output: &Path) -> Result<(), SpeechError> {
        let mut out = fs::File::create(output)?;
        for part in parts {
            out.write_all(&fs::read(part)?)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stream_joiner_keeps_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mp3");
        let b = dir.path().join("b.mp3");
        fs::write(&a, b"first").unwrap();
        fs::write(&b, b"second").unwrap();

        let out = dir.path().join("out.mp3");
        StreamJoiner.join(&[a, b], &out).unwrap();

        assert_eq!(fs::read(&out).unwrap(), b"firstsecond");
    }

    #[test]
    fn test_none_kind_builds_nothing() {
        assert!(JoinerKind::None.build().is_none());
        assert!(JoinerKind::Stream.build().unwrap().is_available());
    }
}
