//! Renders DICOM CT slices from a directory as a thumbnail grid.
//!
//! The pipeline is a single synchronous pass: discover `.dcm` files,
//! decode each one into display-ready intensities (value-of-interest
//! windowing plus photometric inversion where the file asks for it),
//! and place the results into a near-square grid on a caller-owned
//! [`SliceCanvas`].
//!
//! ```no_run
//! use std::{io, num::NonZeroUsize};
//! use slice_grid::{render_grid, MosaicCanvas};
//!
//! # fn main() -> Result<(), slice_grid::GridError> {
//! let max = NonZeroUsize::new(4).unwrap();
//! let report = render_grid("ct/series0", max, |layout| {
//!     MosaicCanvas::new(layout, 240, io::stdout().lock())
//! })?;
//! log::info!("{} slices shown", report.placed);
//! # Ok(())
//! # }
//! ```

mod canvas;
mod decode;
mod discover;
mod error;
mod font;
mod layout;
mod render;

pub use canvas::{MosaicCanvas, SliceCanvas};
pub use decode::{decode_slice, DecodedSlice};
pub use discover::{discover_slices, SliceFile};
pub use error::{CanvasError, DecodeError, GridError};
pub use layout::GridLayout;
pub use render::{render_grid, GridReport};
