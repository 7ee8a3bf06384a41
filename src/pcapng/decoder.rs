use log::{debug, info, warn};

use crate::endianness::{Endianness, PcapBE, PcapLE};
use crate::error::PcapError;
use crate::utils::array4;

use super::*;

/// A provider of capture bytes, consumed one block at a time
///
/// `fill` returns the bytes starting at the current position, without consuming them. The
/// decoder calls `consume` once a block has been fully read.
pub trait BlockSource {
    /// Return at least `len` bytes starting at the current position
    ///
    /// Fewer bytes are returned only if the source is exhausted. An empty slice means there is
    /// no more data.
    fn fill(&mut self, len: usize) -> Result<&[u8], PcapError>;

    /// Advance the current position by `len` bytes
    fn consume(&mut self, len: usize);
}

/// Random-access source over an in-memory buffer
#[derive(Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, offset: 0 }
    }

    /// Current offset in the buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true if all bytes have been consumed
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }
}

impl<'a> BlockSource for SliceSource<'a> {
    fn fill(&mut self, len: usize) -> Result<&[u8], PcapError> {
        let rem = &self.data[self.offset..];
        Ok(&rem[..len.min(rem.len())])
    }

    fn consume(&mut self, len: usize) {
        self.offset = (self.offset + len).min(self.data.len());
    }
}

/// Decoding state: nothing seen yet, or inside a section with a known byte order
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DecoderState {
    Scanning,
    InSection(Endianness),
}

/// PcapNG block decoder
///
/// The decoder owns the byte order of the current section, which changes only when a Section
/// Header Block is decoded. Blocks of unknown type, and blocks whose content does not fit their
/// framing, are skipped (and logged).
///
/// One decoder must be used per capture: the byte order state is not shared.
///
/// ## Example
///
/// ```rust
/// use pcapng_decode::{PcapNGDecoder, PcapError};
///
/// # let data: &[u8] = &[
/// #     0x0a, 0x0d, 0x0d, 0x0a, 0, 0, 0, 0x1c, 0x1a, 0x2b, 0x3c, 0x4d, 0, 1, 0, 0,
/// #     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0x1c,
/// # ];
/// let mut decoder = PcapNGDecoder::new();
/// let blocks = decoder.decode_all(data)?;
/// println!("{} blocks, {} skipped", blocks.len(), decoder.skipped_blocks());
/// # Ok::<(), PcapError>(())
/// ```
#[derive(Debug)]
pub struct PcapNGDecoder {
    state: DecoderState,
    skipped: usize,
}

impl Default for PcapNGDecoder {
    fn default() -> Self {
        PcapNGDecoder::new()
    }
}

impl PcapNGDecoder {
    pub fn new() -> Self {
        PcapNGDecoder {
            state: DecoderState::Scanning,
            skipped: 0,
        }
    }

    /// Byte order of the current section, or `None` if no Section Header Block was seen yet
    pub fn endianness(&self) -> Option<Endianness> {
        match self.state {
            DecoderState::Scanning => None,
            DecoderState::InSection(en) => Some(en),
        }
    }

    /// Number of blocks skipped so far
    pub fn skipped_blocks(&self) -> usize {
        self.skipped
    }

    /// Decode all blocks of an in-memory capture
    ///
    /// The buffer must contain at least one block, and end on a block boundary.
    pub fn decode_all(&mut self, data: &[u8]) -> Result<Vec<Block>, PcapError> {
        if data.len() < MIN_BLOCK_LEN {
            return Err(PcapError::UnexpectedEof);
        }
        let mut source = SliceSource::new(data);
        let mut blocks = Vec::new();
        while let Some(block) = self.decode_block(&mut source)? {
            blocks.push(block);
        }
        debug!(
            "decoded {} blocks ({} skipped) from {} bytes",
            blocks.len(),
            self.skipped,
            source.offset()
        );
        Ok(blocks)
    }

    /// Decode the next block from `source`
    ///
    /// Returns `Ok(None)` when the source is exhausted at a block boundary. Skipped blocks are
    /// consumed, and decoding continues with the following block.
    pub fn decode_block<S: BlockSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Option<Block>, PcapError> {
        loop {
            let header = source.fill(BLOCK_HEADER_LEN)?;
            if header.is_empty() {
                return Ok(None);
            }
            if header.len() < BLOCK_HEADER_LEN {
                return Err(PcapError::UnexpectedEof);
            }
            // until the first section header, read lengths as big-endian
            let mut endianness = self.endianness().unwrap_or(Endianness::Big);
            let block_type = endianness.u32_from_bytes(array4(header, 0));
            if block_type == SHB_MAGIC {
                endianness = detect_endianness(source)?;
            }
            let block_len = read_block_len(source, endianness)?;
            let data = source.fill(block_len as usize)?;
            if data.len() < block_len as usize {
                return Err(PcapError::UnexpectedEof);
            }
            let trailing = endianness.u32_from_bytes(array4(data, data.len() - 4));
            if trailing != block_len {
                warn!(
                    "block length mismatch (leading {}, trailing {})",
                    block_len, trailing
                );
                return Err(PcapError::BlockLengthMismatch {
                    leading: block_len,
                    trailing,
                });
            }
            let body = &data[BLOCK_HEADER_LEN..data.len() - 4];
            let res = match endianness {
                Endianness::Big => parse_block_body::<PcapBE>(block_type, body),
                Endianness::Little => parse_block_body::<PcapLE>(block_type, body),
            };
            source.consume(block_len as usize);
            if block_type == SHB_MAGIC {
                info!("new section, {:?} endian", endianness);
                self.state = DecoderState::InSection(endianness);
            }
            match res {
                Some(Ok(block)) => {
                    debug!("block type {:#010x}, {} bytes", block_type, block_len);
                    return Ok(Some(block));
                }
                Some(Err(e)) => {
                    warn!(
                        "skipping malformed block type {:#010x} ({} bytes): {}",
                        block_type, block_len, e
                    );
                    self.skipped += 1;
                }
                None => {
                    warn!(
                        "skipping unknown block type {:#010x} ({} bytes)",
                        block_type, block_len
                    );
                    self.skipped += 1;
                }
            }
        }
    }
}

/// Read the byte-order magic of a Section Header Block
fn detect_endianness<S: BlockSource + ?Sized>(source: &mut S) -> Result<Endianness, PcapError> {
    let header = source.fill(BLOCK_HEADER_LEN + 4)?;
    if header.len() < BLOCK_HEADER_LEN + 4 {
        return Err(PcapError::UnexpectedEof);
    }
    match Endianness::from_bom(array4(header, BLOCK_HEADER_LEN)) {
        Some(en) => Ok(en),
        None => {
            warn!("unable to detect byte order from section header");
            Err(PcapError::HeaderNotRecognized)
        }
    }
}

/// Read and check the leading total length
fn read_block_len<S: BlockSource + ?Sized>(
    source: &mut S,
    endianness: Endianness,
) -> Result<u32, PcapError> {
    let header = source.fill(BLOCK_HEADER_LEN)?;
    if header.len() < BLOCK_HEADER_LEN {
        return Err(PcapError::UnexpectedEof);
    }
    let block_len = endianness.u32_from_bytes(array4(header, 4));
    if (block_len as usize) < MIN_BLOCK_LEN || block_len % 4 != 0 {
        warn!("invalid block length {}", block_len);
        return Err(PcapError::InvalidBlockLength(block_len));
    }
    Ok(block_len)
}

/// Decode all blocks of an in-memory capture
///
/// This is a shortcut for [`PcapNGDecoder::decode_all`].
pub fn decode_all(data: &[u8]) -> Result<Vec<Block>, PcapError> {
    PcapNGDecoder::new().decode_all(data)
}
