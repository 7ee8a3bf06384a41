use std::io::{self, Read};

use circular::Buffer;
use log::{debug, warn};

use crate::endianness::Endianness;
use crate::error::PcapError;

use super::*;

/// Default maximum size of a block, and of the reader buffer
pub const MAX_BLOCK_LEN: usize = 16 * 1024 * 1024;

/// Pull-based source over any input providing the `Read` trait
///
/// Data is stored in a circular buffer, which means memory usage is constant. The buffer grows
/// when a block does not fit, up to a maximum size.
pub struct ReaderSource<R>
where
    R: Read,
{
    reader: R,
    buffer: Buffer,
    consumed: usize,
    max_len: usize,
    reader_exhausted: bool,
}

impl<R> ReaderSource<R>
where
    R: Read,
{
    /// Creates a new `ReaderSource<R>` with the provided buffer capacity.
    pub fn new(capacity: usize, reader: R) -> ReaderSource<R> {
        ReaderSource {
            reader,
            buffer: Buffer::with_capacity(capacity),
            consumed: 0,
            max_len: MAX_BLOCK_LEN.max(capacity),
            reader_exhausted: false,
        }
    }

    /// Get the number of consumed bytes
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns true if underlying reader is exhausted
    ///
    /// Note that exhausted reader only means that next `fill` will not
    /// add any data, but there can still be data not consumed in the current buffer.
    pub fn reader_exhausted(&self) -> bool {
        self.reader_exhausted
    }

    fn refill(&mut self) -> Result<(), PcapError> {
        self.buffer.shift();
        let space = self.buffer.space();
        if space.is_empty() {
            return Ok(());
        }
        let sz = loop {
            match self.reader.read(space) {
                Ok(sz) => break sz,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("read error: {}", e);
                    return Err(PcapError::ReadError);
                }
            }
        };
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
}

impl<R> BlockSource for ReaderSource<R>
where
    R: Read,
{
    fn fill(&mut self, len: usize) -> Result<&[u8], PcapError> {
        if len > self.buffer.capacity() {
            if len > self.max_len {
                return Err(PcapError::BlockTooLarge(len as u32));
            }
            debug!("growing reader buffer to {} bytes", len);
            self.buffer.grow(len);
        }
        while self.buffer.available_data() < len && !self.reader_exhausted {
            self.refill()?;
        }
        let data = self.buffer.data();
        Ok(&data[..len.min(data.len())])
    }

    fn consume(&mut self, len: usize) {
        self.consumed += len;
        self.buffer.consume(len);
    }
}

/// Streaming decoder over pcap-ng data
///
/// ## Pcap-NG Reader
///
/// This reader pulls data from any input providing the `Read` trait, and decodes one block per
/// call to `decode_next`. Each block is read completely (its header first, then the rest of the
/// block) before being decoded, so the input does not need to be seekable.
///
/// The first block should be a Section Header Block (SHB), marking the start of a
/// new section.
/// For each section, calls to `decode_next` will return blocks, some of them containing data
/// (SPB, EPB), and others containing information (IDB, NRB, etc.).
///
/// The size of the buffer should be big enough for most blocks. Using a larger value (at least
/// 65k) is advised to avoid frequent reads and buffer shifts.
///
/// ## Example
///
/// ```rust
/// use pcapng_decode::*;
///
/// # let data: &[u8] = &[
/// #     0x0a, 0x0d, 0x0d, 0x0a, 0, 0, 0, 0x1c, 0x1a, 0x2b, 0x3c, 0x4d, 0, 1, 0, 0,
/// #     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0x1c,
/// # ];
/// let mut reader = PcapNGReader::new(65536, data);
/// let mut if_linktypes = Vec::new();
/// loop {
///     match reader.decode_next() {
///         Ok(Some(Block::SectionHeader(_))) => {
///             // starting a new section, clear known interfaces
///             if_linktypes = Vec::new();
///         }
///         Ok(Some(Block::InterfaceDescription(idb))) => {
///             if_linktypes.push(idb.linktype);
///         }
///         Ok(Some(Block::EnhancedPacket(epb))) => {
///             assert!((epb.if_id as usize) < if_linktypes.len());
///         }
///         Ok(Some(_)) => (),
///         Ok(None) => break,
///         Err(e) => panic!("error while reading: {}", e),
///     }
/// }
/// ```
pub struct PcapNGReader<R>
where
    R: Read,
{
    decoder: PcapNGDecoder,
    source: ReaderSource<R>,
    failed: bool,
}

impl<R> PcapNGReader<R>
where
    R: Read,
{
    /// Creates a new `PcapNGReader<R>` with the provided buffer capacity.
    pub fn new(capacity: usize, reader: R) -> PcapNGReader<R> {
        PcapNGReader {
            decoder: PcapNGDecoder::new(),
            source: ReaderSource::new(capacity, reader),
            failed: false,
        }
    }

    /// Set the maximum size of a block (and of the internal buffer)
    ///
    /// Blocks larger than this limit cause a `BlockTooLarge` error.
    pub fn with_max_block_len(mut self, max_len: usize) -> PcapNGReader<R> {
        self.source.max_len = max_len;
        self
    }

    /// Decode the next block
    ///
    /// Returns `Ok(None)` at the end of the input.
    pub fn decode_next(&mut self) -> Result<Option<Block>, PcapError> {
        self.decoder.decode_block(&mut self.source)
    }

    /// Byte order of the current section
    pub fn endianness(&self) -> Option<Endianness> {
        self.decoder.endianness()
    }

    /// Get the number of consumed bytes
    pub fn consumed(&self) -> usize {
        self.source.consumed()
    }

    /// Number of blocks skipped so far
    pub fn skipped_blocks(&self) -> usize {
        self.decoder.skipped_blocks()
    }
}

impl<R> Iterator for PcapNGReader<R>
where
    R: Read,
{
    type Item = Result<Block, PcapError>;

    // stops after the first error: the position of the next block is unknown
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let res = self.decode_next().transpose();
        self.failed = matches!(res, Some(Err(_)));
        res
    }
}
