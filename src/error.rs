use nom::error::{ErrorKind, ParseError};
use std::fmt;

/// The error type which is returned when decoding a pcap-ng capture
///
/// All variants are fatal for the current decode call: the byte offset of the next block
/// cannot be trusted anymore. Blocks that are correctly framed but cannot be interpreted are
/// skipped by the decoder instead, and never surface as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PcapError {
    /// Expected more data but got EOF (truncated block, or buffer shorter than one block)
    UnexpectedEof,
    /// An error happened during a `read` operation
    ReadError,
    /// A block is larger than the maximum buffer size allowed by the reader
    BlockTooLarge(u32),
    /// Byte-order magic of a Section Header Block was not recognized
    HeaderNotRecognized,
    /// Block total length is smaller than 12 or not a multiple of 4
    InvalidBlockLength(u32),
    /// Leading and trailing block total lengths differ
    BlockLengthMismatch { leading: u32, trailing: u32 },
    /// An error encountered during a nom operation
    NomError(ErrorKind),
}

impl<I> ParseError<I> for PcapError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        PcapError::NomError(kind)
    }
    fn append(_input: I, kind: ErrorKind, _other: Self) -> Self {
        PcapError::NomError(kind)
    }
}

impl fmt::Display for PcapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PcapError::UnexpectedEof => write!(f, "unexpected end of file"),
            PcapError::ReadError => write!(f, "read error"),
            PcapError::BlockTooLarge(len) => {
                write!(f, "block of {} bytes exceeds maximum buffer size", len)
            }
            PcapError::HeaderNotRecognized => {
                write!(f, "format not recognized (invalid byte-order magic)")
            }
            PcapError::InvalidBlockLength(len) => write!(f, "invalid block length {}", len),
            PcapError::BlockLengthMismatch { leading, trailing } => write!(
                f,
                "block length mismatch (leading {}, trailing {})",
                leading, trailing
            ),
            PcapError::NomError(e) => write!(f, "internal parser error {:?}", e),
        }
    }
}

impl std::error::Error for PcapError {}
