use std::io::Write;

use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, Rgba, RgbaImage};
use icy_sixel::{sixel_encode, EncodeOptions, QuantizeMethod};

use crate::decode::DecodedSlice;
use crate::error::CanvasError;
use crate::font::{self, GLYPH_H, GLYPH_W};
use crate::layout::GridLayout;

/// Height of the caption strip under each image cell.
const CAPTION_H: u32 = GLYPH_H + 3;

const BACKGROUND: Rgba<u8> = Rgba([16, 16, 16, 255]);
const CAPTION_COLOR: Rgba<u8> = Rgba([208, 208, 208, 255]);

/// Caller-owned drawing surface for one grid invocation.
///
/// Replaces the hidden "current figure" state a plotting library would
/// keep: every placement targets an explicit cell, and nothing is shown
/// until [`present`](SliceCanvas::present) is called once at the end.
pub trait SliceCanvas {
    /// Draws a decoded slice into the given cell, captioned with its label.
    fn place(&mut self, cell: usize, slice: &DecodedSlice);

    /// Leaves the given cell empty.
    fn blank(&mut self, cell: usize);

    /// Flushes the assembled grid to its output.
    fn present(&mut self) -> Result<(), CanvasError>;
}

/// Composes cells into one RGBA mosaic and presents it as a DEC SIXEL
/// sequence on a writer (normally stdout of a sixel-capable terminal).
///
/// Each cell is `cell_size` pixels square plus a caption strip; slices
/// keep their aspect ratio and are centered. Intensities are stretched
/// min..max into the 8-bit gray range, which is what an auto-scaling
/// grayscale plot would do.
pub struct MosaicCanvas<W: Write> {
    layout: GridLayout,
    cell_size: u32,
    image: RgbaImage,
    out: W,
}

impl<W: Write> MosaicCanvas<W> {
    pub fn new(layout: GridLayout, cell_size: u32, out: W) -> Self {
        let cell_size = cell_size.max(4 * GLYPH_W);
        let width = (layout.cols as u32 * cell_size).max(1);
        let height = (layout.rows as u32 * (cell_size + CAPTION_H)).max(1);
        let image = RgbaImage::from_pixel(width, height, BACKGROUND);
        MosaicCanvas {
            layout,
            cell_size,
            image,
            out,
        }
    }

    /// The assembled mosaic so far.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn cell_origin(&self, cell: usize) -> Option<(u32, u32)> {
        if cell >= self.layout.cell_count() {
            log::warn!("Cell {cell} is outside the {:?} grid", self.layout);
            return None;
        }
        let (row, col) = self.layout.position(cell);
        Some((
            col as u32 * self.cell_size,
            row as u32 * (self.cell_size + CAPTION_H),
        ))
    }
}

impl<W: Write> SliceCanvas for MosaicCanvas<W> {
    fn place(&mut self, cell: usize, slice: &DecodedSlice) {
        let Some((x0, y0)) = self.cell_origin(cell) else {
            return;
        };
        let Some(gray) = normalize_to_gray(slice) else {
            log::warn!("Slice '{}' has no pixels to draw", slice.label);
            return;
        };

        let cs = self.cell_size;
        let scale = (cs as f32 / gray.width() as f32).min(cs as f32 / gray.height() as f32);
        let w = ((gray.width() as f32 * scale) as u32).clamp(1, cs);
        let h = ((gray.height() as f32 * scale) as u32).clamp(1, cs);
        let resized = imageops::resize(&gray, w, h, FilterType::Triangle);
        let rgba = DynamicImage::ImageLuma8(resized).to_rgba8();
        imageops::overlay(
            &mut self.image,
            &rgba,
            (x0 + (cs - w) / 2) as i64,
            (y0 + (cs - h) / 2) as i64,
        );

        let max_chars = (cs / GLYPH_W) as usize;
        let caption: String = slice.label.chars().take(max_chars).collect();
        let text_w = caption.chars().count() as u32 * GLYPH_W;
        let tx = x0 + cs.saturating_sub(text_w) / 2;
        font::draw_text(&mut self.image, tx, y0 + cs + 2, &caption, CAPTION_COLOR);
    }

    fn blank(&mut self, cell: usize) {
        let Some((x0, y0)) = self.cell_origin(cell) else {
            return;
        };
        for y in y0..y0 + self.cell_size + CAPTION_H {
            for x in x0..x0 + self.cell_size {
                self.image.put_pixel(x, y, BACKGROUND);
            }
        }
    }

    fn present(&mut self) -> Result<(), CanvasError> {
        let options = EncodeOptions {
            max_colors: 256,
            diffusion: 0.875,
            quantize_method: QuantizeMethod::Wu,
        };
        let data = sixel_encode(
            self.image.as_raw(),
            self.image.width() as usize,
            self.image.height() as usize,
            &options,
        )
        .map_err(|err| CanvasError::Encode(err.to_string()))?;
        self.out.write_all(data.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Stretches the slice intensities min..max into 0..255 gray.
fn normalize_to_gray(slice: &DecodedSlice) -> Option<GrayImage> {
    if slice.rows == 0 || slice.cols == 0 || slice.intensities.is_empty() {
        return None;
    }
    let min = *slice.intensities.iter().min()?;
    let max = *slice.intensities.iter().max()?;
    let range = f32::from(max - min);
    let data: Vec<u8> = slice
        .intensities
        .iter()
        .map(|&v| {
            if range > 0.0 {
                (f32::from(v - min) / range * 255.0).round() as u8
            } else {
                0
            }
        })
        .collect();
    GrayImage::from_raw(slice.cols, slice.rows, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_slice(label: &str, rows: u32, cols: u32) -> DecodedSlice {
        DecodedSlice {
            label: label.to_string(),
            rows,
            cols,
            inverted: false,
            intensities: (0..rows * cols).map(|v| v as u16).collect(),
        }
    }

    #[test]
    fn mosaic_dimensions_follow_layout() {
        let layout = GridLayout::for_count(3);
        let canvas = MosaicCanvas::new(layout, 100, Vec::new());
        assert_eq!(canvas.image().width(), 200);
        assert_eq!(canvas.image().height(), 2 * (100 + CAPTION_H));
    }

    #[test]
    fn place_draws_into_the_right_cell() {
        let layout = GridLayout::for_count(4);
        let mut canvas = MosaicCanvas::new(layout, 64, Vec::new());
        canvas.place(3, &test_slice("s", 8, 8));

        let cell_h = 64 + CAPTION_H;
        let top_left_changed = (0..64u32)
            .flat_map(|y| (0..64u32).map(move |x| (x, y)))
            .any(|(x, y)| *canvas.image().get_pixel(x, y) != BACKGROUND);
        let bottom_right_changed = (cell_h..cell_h + 64)
            .flat_map(|y| (64..128u32).map(move |x| (x, y)))
            .any(|(x, y)| *canvas.image().get_pixel(x, y) != BACKGROUND);
        assert!(!top_left_changed);
        assert!(bottom_right_changed);
    }

    #[test]
    fn blank_restores_background() {
        let layout = GridLayout::for_count(1);
        let mut canvas = MosaicCanvas::new(layout, 32, Vec::new());
        canvas.place(0, &test_slice("s", 4, 4));
        canvas.blank(0);
        assert!(canvas.image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn present_writes_sixel_payload() {
        let layout = GridLayout::for_count(1);
        let mut canvas = MosaicCanvas::new(layout, 32, Vec::new());
        canvas.place(0, &test_slice("s", 4, 4));
        canvas.present().unwrap();
        assert!(!canvas.out.is_empty());
    }

    #[test]
    fn flat_slices_normalize_without_panic() {
        let slice = DecodedSlice {
            label: "flat".into(),
            rows: 2,
            cols: 2,
            inverted: false,
            intensities: vec![7, 7, 7, 7],
        };
        let gray = normalize_to_gray(&slice).unwrap();
        assert!(gray.pixels().all(|p| p.0 == [0]));
    }
}
