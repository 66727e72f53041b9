//! zenconvert - convert an image between BMP, PPM and JPEG.

use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use zenconvert::{Converter, Limits};

/// Exit status for malformed invocations.
const USAGE_EXIT_CODE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "zenconvert")]
#[command(version)]
#[command(about = "Convert an image between BMP, PPM and JPEG")]
#[command(long_about = "Convert an image between BMP, PPM and JPEG.\n\n\
    Formats are chosen from the file extensions: .bmp, .ppm, .jpg/.jpeg \
    (case-sensitive).\n\n\
    Exit status: 0 success, 1 usage error, 2 unknown input format, \
    3 unknown output format, 4 load failed, 5 save failed.")]
struct Args {
    /// Image to read
    input: PathBuf,

    /// Image to write
    output: PathBuf,

    /// JPEG output quality
    #[arg(short, long, default_value_t = zenconvert::DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Refuse to decode images with more pixels than this. Replaces the
    /// default 65535 cap on width and height.
    #[arg(long)]
    max_pixels: Option<u64>,

    /// Log codec details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// An explicit pixel budget replaces the default per-axis caps, so a long
/// thin image within the budget is accepted.
fn limits_for(args: &Args) -> Limits {
    match args.max_pixels {
        Some(max_pixels) => Limits {
            max_pixels: Some(max_pixels),
            max_width: None,
            max_height: None,
            ..Limits::default()
        },
        None => Limits::default(),
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                eprint!("{e}");
                return ExitCode::from(USAGE_EXIT_CODE);
            }
        },
    };

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let converter = Converter::new()
        .with_limits(limits_for(&args))
        .with_jpeg_quality(args.quality);

    match converter.convert(&args.input, &args.output) {
        Ok(()) => {
            println!("Successfully converted");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::from(err.exit_code())
        }
    }
}
