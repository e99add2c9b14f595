use image::{DynamicImage, GenericImageView};
use tracing::{debug, warn};

use crate::document::OCR_ERROR_PREFIX;
use crate::error::NarratorError;
use crate::utils::ocr::{OcrEngine, OcrError, DEFAULT_LANGUAGES};

/// Longest slice of an error message embedded in the page placeholder.
const MAX_ERROR_CHARS: usize = 100;

/// An image region handed to OCR.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub image: DynamicImage,
    pub rotated: bool,
}

/// Per-page options for segmentation.
#[derive(Debug, Clone, Copy)]
pub struct SegmentOptions {
    pub split_double_page: bool,
    pub auto_rotate: bool,
}

/// Turns one rendered page into recognized text: orientation fix, optional
/// double-page split, then OCR of each fragment, left before right.
pub struct PageSegmenter<'e> {
    engine: &'e dyn OcrEngine,
    options: SegmentOptions,
}

impl<'e> PageSegmenter<'e> {
    pub fn new(engine: &'e dyn OcrEngine, options: SegmentOptions) -> Self {
        Self { engine, options }
    }

    /// Rotate if needed, then split landscape images into left and right halves.
    pub fn fragments(&self, image: DynamicImage) -> Vec<Fragment> {
        let (image, rotated) = if self.options.auto_rotate {
            correct_orientation(self.engine, image)
        } else {
            (image, false)
        };

        let (width, height) = image.dimensions();

        if self.options.split_double_page && width > height {
            let mid = width / 2;
            debug!("Splitting double page {}x{} at column {}", width, height, mid);

            let left = image.crop_imm(0, 0, mid, height);
            let right = image.crop_imm(mid, 0, width - mid, height);

            return vec![
                Fragment { image: left, rotated },
                Fragment { image: right, rotated },
            ];
        }

        vec![Fragment { image, rotated }]
    }

    /// Recognize every fragment of the page; halves are joined by a blank line.
    pub fn recognize(&self, image: DynamicImage) -> Result<String, OcrError> {
        let texts = self
            .fragments(image)
            .iter()
            .enumerate()
            .map(|(idx, fragment)| {
                debug!(
                    "Recognizing fragment {} ({}x{}, rotated: {})",
                    idx + 1,
                    fragment.image.width(),
                    fragment.image.height(),
                    fragment.rotated
                );
                self.engine.recognize(&fragment.image, DEFAULT_LANGUAGES)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(texts.join("\n\n"))
    }

    /// Like [`PageSegmenter::recognize`], but a failure (including a failed
    /// render passed in as `image`) becomes an inline placeholder so the rest
    /// of the document still gets extracted.
    pub fn recognize_page(
        &self,
        page_idx: usize,
        image: Result<DynamicImage, OcrError>,
    ) -> String {
        match image.and_then(|image| self.recognize(image)) {
            Ok(text) => text,
            Err(source) => {
                let err = NarratorError::PageRecognition {
                    page: page_idx + 1,
                    source,
                };
                warn!("{}", err);
                error_placeholder(&err)
            }
        }
    }
}

/// Ask the engine for an orientation estimate and undo it. Failures mean
/// "leave the image as it is".
fn correct_orientation(engine: &dyn OcrEngine, image: DynamicImage) -> (DynamicImage, bool) {
    match engine.detect_orientation(&image) {
        Ok(0) => (image, false),
        Ok(degrees) => match rotate_ccw(&image, degrees) {
            Some(rotated) => {
                debug!("Rotated page by {} degrees", degrees);
                (rotated, true)
            }
            None => {
                warn!("Ignoring unsupported orientation estimate: {} degrees", degrees);
                (image, false)
            }
        },
        Err(e) => {
            warn!("{}", NarratorError::OrientationDetection(e));
            (image, false)
        }
    }
}

/// Counter-clockwise rotation by a quarter-turn multiple. Quarter turns swap
/// the canvas dimensions, so nothing is cropped.
fn rotate_ccw(image: &DynamicImage, degrees: u32) -> Option<DynamicImage> {
    match degrees % 360 {
        90 => Some(image.rotate270()),
        180 => Some(image.rotate180()),
        270 => Some(image.rotate90()),
        _ => None,
    }
}

fn error_placeholder(err: &NarratorError) -> String {
    let reason = match err {
        NarratorError::PageRecognition { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    let reason: String = reason.chars().take(MAX_ERROR_CHARS).collect();
    format!("{} {}]", OCR_ERROR_PREFIX, reason)
}
