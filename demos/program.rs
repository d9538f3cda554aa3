use std::fs;

use trackkit::Result;
use trackkit::compression::lzma::Preamble;
use trackkit::convert::convert;
use trackkit::formats::track::{Direction, Splitter};

fn main() -> Result<()> {
    let input = fs::read("track.trk")?;
    let splitter = Splitter::legacy();

    let split = splitter.split(&input)?;
    println!(
        "header: {} bytes, direction: {:?}",
        split.header.len(),
        split.direction
    );
    if split.direction == Direction::Decompress {
        let preamble = Preamble::parse_foreign(split.payload)?;
        println!("declared size: {} bytes", preamble.uncompressed_size);
    }

    let out = convert(&input, &splitter)?;
    fs::write("track_converted.trk", &out.data)?;

    Ok(())
}
