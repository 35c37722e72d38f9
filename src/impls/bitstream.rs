/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Textual bitstream images.

A bitstream image is a text file in which only the characters `0` and `1`
are significant: every other character (whitespace, separators, comments
not containing digits) is skipped. Each group of eight significant
characters defines a byte, most-significant bit first. There is no header
and no length: bits at the end of the file that do not complete a byte are
discarded.

Note that this is the opposite bit order of the [codec](crate::impls::LineCodec),
which stores values least-significant bit first.

*/

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// The error returned when loading a bitstream image.
#[derive(Debug)]
pub enum LoadError {
    /// The image file could not be opened, or it is a directory.
    FileNotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Reading the image failed.
    Io(std::io::Error),
    /// The image contains more than `capacity` bytes; the first `capacity`
    /// bytes have been stored.
    BufferFull { capacity: usize },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::FileNotFound { path, source } => write!(
                f,
                "Memory image file '{}' not found: {}",
                path.display(),
                source
            ),
            LoadError::Io(e) => write!(f, "Could not read memory image: {}", e),
            LoadError::BufferFull { capacity } => {
                write!(f, "Memory image does not fit in {} bytes", capacity)
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::FileNotFound { source, .. } => Some(source),
            LoadError::Io(e) => Some(e),
            LoadError::BufferFull { .. } => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// Incremental decoder of bitstream characters.
///
/// # Example
/// ```
/// use cl_bitpack::prelude::*;
///
/// let mut decoder = BitstreamDecoder::default();
/// let bytes: Vec<u8> = b"1111 0000\n1".iter().filter_map(|&c| decoder.push(c)).collect();
/// assert_eq!(bytes, [0xf0]);
/// assert_eq!(decoder.pending_bits(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitstreamDecoder {
    byte: u8,
    bits: usize,
}

impl BitstreamDecoder {
    /// Feed a character, returning a byte when eight bits have been
    /// accepted.
    #[inline]
    pub fn push(&mut self, c: u8) -> Option<u8> {
        let bit = match c {
            b'0' => 0,
            b'1' => 1,
            _ => return None,
        };
        self.byte = (self.byte << 1) | bit;
        self.bits += 1;
        if self.bits == 8 {
            let byte = self.byte;
            *self = Self::default();
            Some(byte)
        } else {
            None
        }
    }

    /// Return the number of accepted bits not forming a byte yet.
    pub fn pending_bits(&self) -> usize {
        self.bits
    }
}

/// Decode a bitstream image from `reader` into `data`, returning the number
/// of bytes stored.
pub fn load_bitstream<R: Read>(reader: R, data: &mut [u8]) -> Result<usize, LoadError> {
    let capacity = data.len();
    let mut decoder = BitstreamDecoder::default();
    let mut pos = 0;
    let mut reader = BufReader::new(reader);
    loop {
        let chunk = match reader.fill_buf() {
            Ok([]) => break,
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &c in chunk {
            if let Some(byte) = decoder.push(c) {
                *data
                    .get_mut(pos)
                    .ok_or(LoadError::BufferFull { capacity })? = byte;
                pos += 1;
            }
        }
        let consumed = chunk.len();
        reader.consume(consumed);
    }
    Ok(pos)
}

/// Decode the bitstream image in the file at `path` into `data`, returning
/// the number of bytes stored.
pub fn load_bitstream_file(path: impl AsRef<Path>, data: &mut [u8]) -> Result<usize, LoadError> {
    load_bitstream(open(path.as_ref())?, data)
}

/// Decode a bitstream image from `reader`.
pub fn read_bitstream<R: Read>(reader: R) -> Result<Vec<u8>, LoadError> {
    let mut decoder = BitstreamDecoder::default();
    let mut bytes = Vec::new();
    for c in BufReader::new(reader).bytes() {
        bytes.extend(decoder.push(c?));
    }
    Ok(bytes)
}

/// Decode the bitstream image in the file at `path`.
pub fn read_bitstream_file(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    read_bitstream(open(path.as_ref())?)
}

fn open(path: &Path) -> Result<File, LoadError> {
    let not_found = |source| LoadError::FileNotFound {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(not_found)?;
    // opening a directory succeeds on some platforms
    if file.metadata().map_err(not_found)?.is_dir() {
        return Err(not_found(std::io::Error::new(
            ErrorKind::InvalidInput,
            "is a directory",
        )));
    }
    Ok(file)
}

/// Write `data` as a bitstream image, most-significant bit first, ending a
/// text line every `bytes_per_line` bytes (never, if zero).
pub fn write_bitstream<W: Write>(
    mut writer: W,
    data: &[u8],
    bytes_per_line: usize,
) -> std::io::Result<()> {
    for (i, byte) in data.iter().enumerate() {
        write!(writer, "{:08b}", byte)?;
        if bytes_per_line != 0 && (i + 1) % bytes_per_line == 0 {
            writeln!(writer)?;
        }
    }
    if bytes_per_line == 0 || data.len() % bytes_per_line != 0 {
        writeln!(writer)?;
    }
    writer.flush()
}
