//! Handles reading BLAST result tables
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

#[cfg(feature = "compression")]
use bzip2::read::BzDecoder;
#[cfg(feature = "compression")]
use flate2::read::MultiGzDecoder;
#[cfg(feature = "compression")]
use xz2::read::XzDecoder;

use crate::errors::TableError;

mod header;
mod reader;
mod utils;

pub use header::Header;
pub use reader::{ReaderOptions, TableReader};
pub use utils::{find_line_ending, LineEnding, Position, DEFAULT_DELIMITER};

// Magic bytes for each compression format
#[cfg(feature = "compression")]
const GZ_MAGIC: [u8; 2] = [0x1F, 0x8B];
#[cfg(feature = "compression")]
const BZ_MAGIC: [u8; 2] = [0x42, 0x5A];
#[cfg(feature = "compression")]
const XZ_MAGIC: [u8; 2] = [0xFD, 0x37];

/// File name suffixes of the compression formats we understand
pub const COMPRESSION_SUFFIXES: [&str; 3] = ["gz", "bz2", "xz"];

/// Peek at the first (up to) two bytes and rewind
fn sniff(f: &mut File) -> io::Result<Vec<u8>> {
    let mut first = Vec::with_capacity(2);
    Read::by_ref(f).take(2).read_to_end(&mut first)?;
    // Back to the beginning of the file
    f.seek(SeekFrom::Start(0))?;
    Ok(first)
}

#[cfg(not(feature = "compression"))]
fn open_decoded(f: File, _first: &[u8]) -> Box<dyn Read> {
    Box::new(f)
}

#[cfg(feature = "compression")]
fn open_decoded(f: File, first: &[u8]) -> Box<dyn Read> {
    if first == &GZ_MAGIC[..] {
        Box::new(MultiGzDecoder::new(f))
    } else if first == &BZ_MAGIC[..] {
        Box::new(BzDecoder::new(f))
    } else if first == &XZ_MAGIC[..] {
        Box::new(XzDecoder::new(f))
    } else {
        Box::new(f)
    }
}

/// The main entry point of blastfilt's reading side.
/// Opens the table at `path`, reads its header and returns a reader over
/// its rows. With the `compression` feature enabled gzip, bz2 and xz input
/// is detected from its magic bytes and decoded on the fly.
///
/// # Errors
///
/// `FileAccess` if the path can't be opened, `Schema` if the header is
/// missing or lacks required columns.
pub fn parse_table_file<P: AsRef<Path>>(
    path: P,
    options: ReaderOptions,
) -> Result<TableReader<Box<dyn Read>>, TableError> {
    let path = path.as_ref();
    let mut f = File::open(path).map_err(|e| TableError::new_file_access(path, &e))?;
    let first = sniff(&mut f).map_err(|e| TableError::new_file_access(path, &e))?;
    TableReader::new(open_decoded(f, &first), options).map_err(|e| e.with_path(path))
}

/// Same as [parse_table_file](fn.parse_table_file.html) over an
/// uncompressed stream.
pub fn parse_table_reader<'a, R: Read + 'a>(
    reader: R,
    options: ReaderOptions,
) -> Result<TableReader<Box<dyn Read + 'a>>, TableError> {
    TableReader::new(Box::new(reader), options)
}
