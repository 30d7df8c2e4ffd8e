//! Program Image Loading.
//!
//! This module turns files into memory contents. It performs:
//! 1. **Binary loading:** Reads an image file from disk into a byte buffer.
//! 2. **Format detection:** ELF32 images are split into their loadable segments (via `object`);
//!    anything else is a raw binary placed at the RAM base.
//! 3. **Built-in image:** A short program used when no image is given, which ends in `ebreak`
//!    with `a0 = 0`.

use std::fs;
use std::path::Path;

use object::read::elf::ElfFile32;
use object::{LittleEndian, Object, ObjectSegment};
use tracing::{debug, info};

use super::error::LoadError;
use crate::soc::Memory;

/// ELF magic number at the start of every ELF file.
const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

/// Built-in program, as little-endian words.
///
/// Stores a zero byte over the data word's low byte, loads it back into `a0`
/// and stops with `ebreak`, so a correct simulator reports a good trap.
pub const DEFAULT_IMAGE: [u32; 5] = [
    0x0000_0297, // auipc t0, 0
    0x0002_8823, // sb    $0, 16(t0)
    0x0102_c503, // lbu   a0, 16(t0)
    0x0010_0073, // ebreak
    0xdead_beef, // data
];

/// A contiguous run of bytes to place in guest memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Physical load address.
    pub addr: u32,
    /// Bytes to copy.
    pub data: Vec<u8>,
}

/// A loadable program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// Segments in file order.
    pub segments: Vec<Segment>,
    /// Entry point, when the format records one.
    pub entry: Option<u32>,
}

impl Image {
    /// Wraps a raw binary placed at `base`.
    pub fn raw(bytes: Vec<u8>, base: u32) -> Self {
        Self {
            segments: vec![Segment {
                addr: base,
                data: bytes,
            }],
            entry: None,
        }
    }

    /// The built-in program placed at `base`.
    pub fn builtin(base: u32) -> Self {
        let bytes = DEFAULT_IMAGE.iter().flat_map(|w| w.to_le_bytes()).collect();
        Self::raw(bytes, base)
    }

    /// Total number of bytes across all segments.
    pub fn size(&self) -> usize {
        self.segments.iter().map(|s| s.data.len()).sum()
    }

    /// Copies every segment into `mem`.
    ///
    /// # Returns
    ///
    /// [`LoadError::DoesNotFit`] for the first segment outside the memory window.
    pub fn place(&self, mem: &mut Memory) -> Result<(), LoadError> {
        for seg in &self.segments {
            mem.load(seg.addr, &seg.data)
                .map_err(|_| LoadError::DoesNotFit {
                    addr: seg.addr,
                    len: seg.data.len(),
                })?;
            debug!(addr = seg.addr, len = seg.data.len(), "segment placed");
        }
        Ok(())
    }
}

/// Loads a binary file from disk into a byte vector.
///
/// # Arguments
///
/// * `path` - Path to the image file.
///
/// # Returns
///
/// The raw bytes of the file.
pub fn load_binary(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Interprets image bytes as ELF32 when they carry the ELF magic, otherwise as raw.
///
/// # Arguments
///
/// * `bytes` - File contents.
/// * `base` - Load address for raw binaries.
pub fn parse_image(bytes: Vec<u8>, base: u32) -> Result<Image, LoadError> {
    if bytes.starts_with(ELF_MAGIC) {
        return parse_elf(&bytes);
    }
    info!(size = bytes.len(), base, "loading raw image");
    Ok(Image::raw(bytes, base))
}

/// Reads and parses the image at `path`.
pub fn load_image(path: &Path, base: u32) -> Result<Image, LoadError> {
    parse_image(load_binary(path)?, base)
}

fn parse_elf(bytes: &[u8]) -> Result<Image, LoadError> {
    let elf = ElfFile32::<LittleEndian>::parse(bytes)?;
    let mut segments = Vec::new();
    for seg in elf.segments() {
        let data = seg.data()?;
        if data.is_empty() {
            continue;
        }
        let addr = seg.address();
        let addr = u32::try_from(addr).map_err(|_| LoadError::AddressOverflow { addr })?;
        segments.push(Segment {
            addr,
            data: data.to_vec(),
        });
    }
    let entry = elf.entry();
    let entry = u32::try_from(entry).map_err(|_| LoadError::AddressOverflow { addr: entry })?;
    info!(segments = segments.len(), entry, "loading ELF image");
    Ok(Image {
        segments,
        entry: Some(entry),
    })
}
