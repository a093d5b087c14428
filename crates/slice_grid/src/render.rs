use std::num::NonZeroUsize;
use std::path::Path;

use crate::canvas::SliceCanvas;
use crate::decode::decode_slice;
use crate::discover::discover_slices;
use crate::error::GridError;
use crate::layout::GridLayout;

/// Outcome of one grid invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridReport {
    pub layout: GridLayout,
    /// Cells populated with an image.
    pub placed: usize,
    /// Labels of selected slices that failed to decode, in cell order.
    pub failed: Vec<String>,
}

/// Discovers slices under `dir`, decodes up to `max_slices` of them and
/// renders the batch onto a canvas built from the computed layout.
///
/// Selection is a plain prefix of the discovered (label-sorted) sequence;
/// files beyond the cap are never opened. A slice that fails to decode is
/// reported and its cell blanked, never aborting the rest of the batch.
/// The canvas is presented exactly once, after all cells are filled.
pub fn render_grid<C, F>(
    dir: impl AsRef<Path>,
    max_slices: NonZeroUsize,
    make_canvas: F,
) -> Result<GridReport, GridError>
where
    C: SliceCanvas,
    F: FnOnce(GridLayout) -> C,
{
    let files = discover_slices(dir)?;
    let count = files.len().min(max_slices.get());
    let layout = GridLayout::for_count(count);
    log::debug!(
        "Showing {count} of {} slices in a {}x{} grid",
        files.len(),
        layout.rows,
        layout.cols
    );

    let mut canvas = make_canvas(layout);
    let mut placed = 0;
    let mut failed = Vec::new();

    for (cell, file) in files.iter().take(count).enumerate() {
        match decode_slice(file) {
            Ok(slice) => {
                canvas.place(cell, &slice);
                placed += 1;
            }
            Err(err) => {
                log::error!("Error processing slice: {err}");
                failed.push(err.label().to_string());
                canvas.blank(cell);
            }
        }
    }
    for cell in count..layout.cell_count() {
        canvas.blank(cell);
    }

    canvas.present()?;
    Ok(GridReport {
        layout,
        placed,
        failed,
    })
}
