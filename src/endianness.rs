//! Byte-order codec
//!
//! All multi-byte integers of a pcap-ng section are encoded using the byte order announced by
//! the byte-order magic of its Section Header Block.

use nom::error::ParseError;
use nom::number::complete::{be_i64, be_u16, be_u32, be_u64, le_i64, le_u16, le_u32, le_u64};
use nom::IResult;

/// Byte order of a pcap-ng section
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Endianness {
    Big,
    Little,
}

/// Byte-order magic, as stored by a big-endian writer
pub const BOM_BYTES_BE: [u8; 4] = [0x1a, 0x2b, 0x3c, 0x4d];

/// Reverse a byte array end to end
#[inline]
pub fn swap_bytes<const N: usize>(mut b: [u8; N]) -> [u8; N] {
    b.reverse();
    b
}

impl Endianness {
    /// Classify the 4 bytes of a byte-order magic field
    ///
    /// Returns `None` if the bytes are neither the big-endian nor the byte-swapped magic.
    pub fn from_bom(b: [u8; 4]) -> Option<Endianness> {
        if b == BOM_BYTES_BE {
            Some(Endianness::Big)
        } else if b == swap_bytes(BOM_BYTES_BE) {
            Some(Endianness::Little)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_big_endian(self) -> bool {
        self == Endianness::Big
    }

    /// Return the byte order of the machine running the decoder
    #[inline]
    pub fn native() -> Endianness {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    #[inline]
    pub fn u16_from_bytes(self, b: [u8; 2]) -> u16 {
        match self {
            Endianness::Big => u16::from_be_bytes(b),
            Endianness::Little => u16::from_le_bytes(b),
        }
    }

    #[inline]
    pub fn u32_from_bytes(self, b: [u8; 4]) -> u32 {
        match self {
            Endianness::Big => u32::from_be_bytes(b),
            Endianness::Little => u32::from_le_bytes(b),
        }
    }

    #[inline]
    pub fn u64_from_bytes(self, b: [u8; 8]) -> u64 {
        match self {
            Endianness::Big => u64::from_be_bytes(b),
            Endianness::Little => u64::from_le_bytes(b),
        }
    }

    /// Assemble a 64-bit value stored as two 32-bit words, high word first
    ///
    /// Each word is converted on its own before the two are concatenated, so the result does
    /// not depend on the section byte order.
    #[inline]
    pub fn u64_from_halves(self, high: [u8; 4], low: [u8; 4]) -> u64 {
        (u64::from(self.u32_from_bytes(high)) << 32) | u64::from(self.u32_from_bytes(low))
    }

    #[inline]
    pub fn u16_to_bytes(self, n: u16) -> [u8; 2] {
        match self {
            Endianness::Big => n.to_be_bytes(),
            Endianness::Little => n.to_le_bytes(),
        }
    }

    #[inline]
    pub fn u32_to_bytes(self, n: u32) -> [u8; 4] {
        match self {
            Endianness::Big => n.to_be_bytes(),
            Endianness::Little => n.to_le_bytes(),
        }
    }

    #[inline]
    pub fn u64_to_bytes(self, n: u64) -> [u8; 8] {
        match self {
            Endianness::Big => n.to_be_bytes(),
            Endianness::Little => n.to_le_bytes(),
        }
    }

    /// Split a 64-bit value into its high and low 32-bit words, each encoded in this byte order
    #[inline]
    pub fn u64_to_halves(self, n: u64) -> ([u8; 4], [u8; 4]) {
        (
            self.u32_to_bytes((n >> 32) as u32),
            self.u32_to_bytes(n as u32),
        )
    }
}

pub(crate) struct PcapBE;
pub(crate) struct PcapLE;

pub(crate) trait PcapEndianness {
    const ENDIANNESS: Endianness;

    fn parse_u16<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u16, E>;
    fn parse_u32<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u32, E>;
    fn parse_u64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u64, E>;
    fn parse_i64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], i64, E>;

    /// Parse a timestamp stored as high and low 32-bit words
    #[inline]
    fn parse_ts<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u64, E> {
        let (i, ts_high) = Self::parse_u32(i)?;
        let (i, ts_low) = Self::parse_u32(i)?;
        Ok((i, (u64::from(ts_high) << 32) | u64::from(ts_low)))
    }
}

impl PcapEndianness for PcapBE {
    const ENDIANNESS: Endianness = Endianness::Big;

    #[inline]
    fn parse_u16<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u16, E> {
        be_u16(i)
    }

    #[inline]
    fn parse_u32<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u32, E> {
        be_u32(i)
    }

    #[inline]
    fn parse_u64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u64, E> {
        be_u64(i)
    }

    #[inline]
    fn parse_i64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], i64, E> {
        be_i64(i)
    }
}

impl PcapEndianness for PcapLE {
    const ENDIANNESS: Endianness = Endianness::Little;

    #[inline]
    fn parse_u16<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u16, E> {
        le_u16(i)
    }

    #[inline]
    fn parse_u32<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u32, E> {
        le_u32(i)
    }

    #[inline]
    fn parse_u64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], u64, E> {
        le_u64(i)
    }

    #[inline]
    fn parse_i64<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], i64, E> {
        le_i64(i)
    }
}
