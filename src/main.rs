use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use trackkit::convert::convert;
use trackkit::formats::track::{Direction, Splitter};

/// Compress or decompress a track file. The direction is detected from the
/// file's content.
#[derive(Parser, Debug)]
#[command(name = "trackkit", version)]
struct Cli {
    /// Track file to convert
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output path [default: next to INPUT, named <stem>_decompressed or <stem>_compressed]
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Drop "HEND\0" when compressing and restore it when decompressing
    #[arg(long = "legacy")]
    legacy: bool,

    /// Only search the first N bytes for markers
    #[arg(long = "search-limit", value_name = "N")]
    search_limit: Option<usize>,
}

impl Cli {
    fn splitter(&self) -> Splitter {
        let splitter = if self.legacy {
            Splitter::legacy()
        } else {
            Splitter::default()
        };
        match self.search_limit {
            Some(limit) => splitter.with_search_limit(Some(limit)),
            None => splitter,
        }
    }
}

/// `track.trk` becomes `track_decompressed.trk` (or `_compressed`) in the
/// same directory.
fn default_output_path(input: &Path, direction: Direction) -> PathBuf {
    let suffix = match direction {
        Direction::Decompress => "decompressed",
        Direction::Compress => "compressed",
    };
    let mut name = match input.file_stem() {
        Some(stem) => {
            let mut name = stem.to_os_string();
            name.push("_");
            name.push(suffix);
            name
        }
        None => OsString::from(suffix),
    };
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

/// Convert `cli.input` and write the result, returning the output path.
///
/// Nothing is written unless the conversion succeeds.
fn run(cli: Cli) -> Result<PathBuf> {
    let path = &cli.input;
    let input = fs::read(path).with_context(|| format!("Read track: {}", path.display()))?;
    log::debug!("Read {} bytes from {:?}", input.len(), path);

    let splitter = cli.splitter();
    let split = splitter.split(&input).context("Split track")?;
    log::debug!("Marker at offset {}", split.marker_offset);

    let conversion = convert(&input, &splitter)
        .with_context(|| format!("Convert track: {}", path.display()))?;
    log::debug!(
        "{:?}: {} bytes in, {} bytes out",
        conversion.direction,
        input.len(),
        conversion.data.len()
    );

    let output = match cli.output {
        Some(output) => output,
        None => default_output_path(path, conversion.direction),
    };
    fs::write(&output, &conversion.data)
        .with_context(|| format!("Write track: {}", output.display()))?;
    Ok(output)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("Parsed CLI options: {:?}", cli);

    let output = run(cli)?;
    log::info!("Wrote {}", output.display());

    Ok(())
}
