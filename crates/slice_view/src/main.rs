use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flexi_logger::Logger;

use slice_grid::{render_grid, GridError, MosaicCanvas};

#[derive(Parser, Debug)]
#[command(version, about = "Shows DICOM CT slices as a thumbnail grid in a sixel-capable terminal", long_about = None)]
struct Args {
    /// Directory scanned recursively for .dcm slice files
    #[arg(value_name = "DIR")]
    directory: PathBuf,

    /// Maximum number of slices shown in the grid
    #[clap(long, short = 'n', default_value = "4")]
    max_slices: NonZeroUsize,

    /// Edge length of one grid cell in pixels
    #[clap(long, default_value_t = 240)]
    cell_size: u32,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Log to stderr; stdout carries the sixel stream.
    let logger = Logger::try_with_env_or_str("info").and_then(|logger| logger.log_to_stderr().start());
    let _logger = match logger {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to initialize logging: {err}");
            None
        }
    };

    let stdout = io::stdout().lock();
    match render_grid(&args.directory, args.max_slices, |layout| {
        MosaicCanvas::new(layout, args.cell_size, stdout)
    }) {
        Ok(report) => {
            log::info!(
                "Displayed {} slice(s) in a {}x{} grid ({} decode failure(s))",
                report.placed,
                report.layout.rows,
                report.layout.cols,
                report.failed.len()
            );
            ExitCode::SUCCESS
        }
        Err(GridError::EmptyInput { path }) => {
            log::error!("No DICOM files found under '{}'.", path.display());
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
