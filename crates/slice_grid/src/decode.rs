use dicom_dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject};
use dicom_pixeldata::ndarray::Axis;
use dicom_pixeldata::{ConvertOptions, PixelDecoder, VoiLutOption};

use crate::discover::SliceFile;
use crate::error::DecodeError;

/// Photometric interpretation value that asks for inverted polarity
/// (lowest stored value renders brightest).
const INVERTED_POLARITY: &str = "MONOCHROME1";

/// A slice decoded into display-ready intensities.
///
/// The intensities have the modality rescale and the file's first
/// value-of-interest window applied, followed by the polarity remap for
/// `MONOCHROME1` sources, so a canvas only has to normalize them into
/// its own gray range.
#[derive(Debug, Clone)]
pub struct DecodedSlice {
    pub label: String,
    pub rows: u32,
    pub cols: u32,
    /// True when the source declared inverted polarity and the remap
    /// `v -> max - v` has been applied.
    pub inverted: bool,
    /// Row-major, `rows * cols` values.
    pub intensities: Vec<u16>,
}

/// Reads and decodes a single slice file.
///
/// Frame 0 is used; only monochrome (single-sample) pixel data is
/// accepted. Any failure carries the slice label so the caller can
/// report it and continue with the rest of the batch.
pub fn decode_slice(file: &SliceFile) -> Result<DecodedSlice, DecodeError> {
    let label = file.label.clone();

    let obj = open_file(&file.path).map_err(|source| DecodeError::Read {
        label: label.clone(),
        source,
    })?;
    let inverted = photometric_interpretation(&obj).is_some_and(|pi| pi == INVERTED_POLARITY);

    let decoded = obj
        .decode_pixel_data()
        .map_err(|source| DecodeError::Pixels {
            label: label.clone(),
            source,
        })?;

    // Windowing happens inside the decode collaborator; the polarity
    // remap below stays out of it on purpose.
    let options = ConvertOptions::new().with_voi_lut(VoiLutOption::First);
    let arr = decoded
        .to_ndarray_with_options::<u16>(&options)
        .map_err(|source| DecodeError::Pixels {
            label: label.clone(),
            source,
        })?;

    // Shape is [frames, rows, cols, samples].
    let shape = arr.shape().to_vec();
    if shape.len() != 4 || shape[0] == 0 {
        return Err(DecodeError::NoFrames { label });
    }
    if shape[3] != 1 {
        return Err(DecodeError::UnsupportedSamples {
            label,
            samples: shape[3],
        });
    }

    let plane = arr.index_axis_move(Axis(0), 0).index_axis_move(Axis(2), 0);
    let mut intensities: Vec<u16> = plane.iter().copied().collect();

    if inverted {
        if let Some(max) = intensities.iter().copied().max() {
            for v in &mut intensities {
                *v = max - *v;
            }
        }
    }

    Ok(DecodedSlice {
        label,
        rows: shape[1] as u32,
        cols: shape[2] as u32,
        inverted,
        intensities,
    })
}

fn photometric_interpretation(obj: &DefaultDicomObject) -> Option<String> {
    let elem = obj.element(tags::PHOTOMETRIC_INTERPRETATION).ok()?;
    let value = elem.to_str().ok()?;
    Some(value.trim().to_string())
}
