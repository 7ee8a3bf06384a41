use std::convert::TryFrom;

use log::{debug, trace};
use nom::bytes::complete::take;
use nom::error::ParseError;
use nom::IResult;
use rusticata_macros::newtype_enum;

use crate::endianness::{Endianness, PcapEndianness};
use crate::PcapError;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
    ShbHardware = 2,
    ShbOs = 3,
    ShbUserAppl = 4,
    IfName = 2,
    IfDescription = 3,
    IfIpv4Addr = 4,
    IfIpv6Addr = 5,
    IfMacAddr = 6,
    IfEuiAddr = 7,
    IfSpeed = 8,
    IfTsresol = 9,
    IfTzone = 10,
    IfFilter = 11,
    IfOs = 12,
    IfFcslen = 13,
    IfTsoffset = 14,
    IfHardware = 15,
    IfTxSpeed = 16,
    IfRxSpeed = 17,
    EpbFlags = 2,
    EpbHash = 3,
    EpbDropcount = 4,
    EpbPacketId = 5,
    EpbQueue = 6,
    NsDnsName = 2,
    NsDnsIpv4Addr = 3,
    NsDnsIpv6Addr = 4,
    IsbStartTime = 2,
    IsbEndTime = 3,
    IsbIfRecv = 4,
    IsbIfDrop = 5,
    IsbFilterAccept = 6,
    IsbOsDrop = 7,
    IsbUsrDeliv = 8,
    Custom2988 = 2988,
    Custom2989 = 2989,
    Custom19372 = 19372,
    Custom19373 = 19373,
}
}

/// A pcap-ng option, borrowed from the block being decoded
///
/// `value` holds exactly `len` bytes: the alignment padding is not included.
#[derive(Debug)]
pub struct PcapNGOption<'a> {
    pub code: OptionCode,
    pub len: u16,
    pub value: &'a [u8],
}

impl<'a> PcapNGOption<'a> {
    /// Return the option value as UTF-8 text, or None
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.value).ok()
    }

    /// Return the option value as a single byte, or None
    pub fn as_u8(&self) -> Option<u8> {
        if self.value.len() == 1 {
            Some(self.value[0])
        } else {
            None
        }
    }

    /// Return the option value interpreted as u32, or None
    ///
    /// Option data length must be exactly 4 bytes
    pub fn as_u32(&self, endianness: Endianness) -> Option<u32> {
        <[u8; 4]>::try_from(self.value)
            .ok()
            .map(|b| endianness.u32_from_bytes(b))
    }

    /// Return the option value interpreted as i32, or None
    pub fn as_i32(&self, endianness: Endianness) -> Option<i32> {
        self.as_u32(endianness).map(|n| n as i32)
    }

    /// Return the option value interpreted as u64, or None
    ///
    /// Option data length must be exactly 8 bytes
    pub fn as_u64(&self, endianness: Endianness) -> Option<u64> {
        <[u8; 8]>::try_from(self.value)
            .ok()
            .map(|b| endianness.u64_from_bytes(b))
    }

    /// Return the option value interpreted as i64, or None
    pub fn as_i64(&self, endianness: Endianness) -> Option<i64> {
        self.as_u64(endianness).map(|n| n as i64)
    }

    /// Return the option value interpreted as a timestamp (high and low 32-bit words), or None
    pub fn as_ts(&self, endianness: Endianness) -> Option<u64> {
        if self.value.len() == 8 {
            let high = <[u8; 4]>::try_from(&self.value[..4]).ok()?;
            let low = <[u8; 4]>::try_from(&self.value[4..]).ok()?;
            Some(endianness.u64_from_halves(high, low))
        } else {
            None
        }
    }

    /// Copy this option into an opaque `RawOption`
    pub fn to_raw(&self) -> RawOption {
        RawOption {
            code: self.code.0,
            value: self.value.to_vec(),
        }
    }
}

/// An option kept as raw bytes
///
/// Used for codes not part of the schema of a block kind, and for known codes whose value
/// could not be interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawOption {
    pub code: u16,
    pub value: Vec<u8>,
}

/// Parse a pcap-ng Option (code, length, value and padding)
///
/// The padding may be missing after the last option of a block.
pub(crate) fn parse_option<'i, En: PcapEndianness, E: ParseError<&'i [u8]>>(
    i: &'i [u8],
) -> IResult<&'i [u8], PcapNGOption<'i>, E> {
    let (i, code) = En::parse_u16(i)?;
    let (i, len) = En::parse_u16(i)?;
    let (i, value) = take(len as usize)(i)?;
    let pad = crate::utils::padding_len(len as usize).min(i.len());
    let (i, _) = take(pad)(i)?;
    let option = PcapNGOption {
        code: OptionCode(code),
        len,
        value,
    };
    Ok((i, option))
}

/// Scan an option stream
///
/// Scanning stops at the end-of-options marker, or when input is exhausted. A truncated last
/// option is dropped.
pub(crate) fn parse_options<En: PcapEndianness>(mut i: &[u8]) -> Vec<PcapNGOption> {
    let mut options = Vec::new();
    while !i.is_empty() {
        match parse_option::<En, PcapError>(i) {
            Ok((_, opt)) if opt.code == OptionCode::EndOfOpt => break,
            Ok((rem, opt)) => {
                trace!("option {:?} ({} bytes)", opt.code, opt.len);
                options.push(opt);
                i = rem;
            }
            Err(_) => {
                debug!("truncated option stream, ignoring last {} bytes", i.len());
                break;
            }
        }
    }
    options
}

/// Typed option record of one block kind
pub(crate) trait OptionSet: Default {
    /// Store a decoded option
    ///
    /// Returns false if the code is not part of this schema, or if the value could not be
    /// interpreted. The option is then kept as raw bytes.
    fn set_option(&mut self, option: &PcapNGOption, endianness: Endianness) -> bool;

    fn unknown_mut(&mut self) -> &mut Vec<RawOption>;
}

/// Decode an option stream into the option record of a block kind
pub(crate) fn decode_options<En: PcapEndianness, S: OptionSet>(i: &[u8]) -> S {
    let mut set = S::default();
    for opt in parse_options::<En>(i) {
        if !set.set_option(&opt, En::ENDIANNESS) {
            debug!("keeping option {:?} as raw bytes", opt.code);
            set.unknown_mut().push(opt.to_raw());
        }
    }
    set
}

/// Helper for string options
#[inline]
pub(crate) fn set_str(field: &mut Option<String>, option: &PcapNGOption) -> bool {
    match option.as_str() {
        Some(s) => {
            *field = Some(s.to_owned());
            true
        }
        None => false,
    }
}

/// Helper for comments, which can be repeated
#[inline]
pub(crate) fn push_comment(comments: &mut Vec<String>, option: &PcapNGOption) -> bool {
    match option.as_str() {
        Some(s) => {
            comments.push(s.to_owned());
            true
        }
        None => false,
    }
}

/// Helper for options with a fixed-width value
#[inline]
pub(crate) fn set_value<T>(field: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *field = Some(v);
            true
        }
        None => false,
    }
}
