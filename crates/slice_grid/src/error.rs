use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a whole grid invocation.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("no DICOM files found under '{}'", path.display())]
    EmptyInput { path: PathBuf },

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Per-slice decode failures. Callers report these and move on to the
/// next slice; they never abort the batch.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("'{label}': failed to read file: {source}")]
    Read {
        label: String,
        source: dicom_object::ReadError,
    },

    #[error("'{label}': failed to decode pixel data: {source}")]
    Pixels {
        label: String,
        source: dicom_pixeldata::Error,
    },

    #[error("'{label}': unsupported samples per pixel: {samples}")]
    UnsupportedSamples { label: String, samples: usize },

    #[error("'{label}': pixel data contains no frames")]
    NoFrames { label: String },
}

impl DecodeError {
    /// Label of the slice that failed.
    pub fn label(&self) -> &str {
        match self {
            DecodeError::Read { label, .. }
            | DecodeError::Pixels { label, .. }
            | DecodeError::UnsupportedSamples { label, .. }
            | DecodeError::NoFrames { label } => label,
        }
    }
}

/// Failures while composing or presenting the visual output.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("sixel encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
