use nom::error::ParseError;
use nom::IResult;

use crate::endianness::{Endianness, PcapEndianness};
use crate::utils::array4;

use super::*;

/// The Section Header Block (SHB) identifies the
/// beginning of a section of the capture capture file.
///
/// The
/// Section Header Block does not contain data but it rather identifies a
/// list of blocks (interfaces, packets) that are logically correlated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionHeaderBlock {
    /// Byte order of the section, as given by the byte-order magic
    pub endianness: Endianness,
    pub major_version: u16,
    pub minor_version: u16,
    /// Length of the section in bytes, or -1 if not specified
    pub section_len: i64,
    pub options: SectionHeaderOptions,
}

impl SectionHeaderBlock {
    pub fn big_endian(&self) -> bool {
        self.endianness.is_big_endian()
    }
}

/// Options of a Section Header Block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionHeaderOptions {
    pub comments: Vec<String>,
    pub hardware: Option<String>,
    pub os: Option<String>,
    pub user_appl: Option<String>,
    pub unknown: Vec<RawOption>,
}

impl OptionSet for SectionHeaderOptions {
    fn set_option(&mut self, option: &PcapNGOption, _endianness: Endianness) -> bool {
        match option.code {
            OptionCode::Comment => push_comment(&mut self.comments, option),
            OptionCode::ShbHardware => set_str(&mut self.hardware, option),
            OptionCode::ShbOs => set_str(&mut self.os, option),
            OptionCode::ShbUserAppl => set_str(&mut self.user_appl, option),
            _ => false,
        }
    }

    fn unknown_mut(&mut self) -> &mut Vec<RawOption> {
        &mut self.unknown
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for SectionHeaderBlock {
    const BODY_MIN_SZ: usize = 16;
    const MAGIC: u32 = SHB_MAGIC;

    fn inner_parse<'a, E: ParseError<&'a [u8]>>(
        i: &'a [u8],
    ) -> IResult<&'a [u8], SectionHeaderBlock, E> {
        // the decoder already validated the magic, so the section byte order is `En`
        let bom = array4(i, 0);
        let endianness = Endianness::from_bom(bom).unwrap_or(En::ENDIANNESS);
        let (i, _bom) = En::parse_u32(i)?;
        let (i, major_version) = En::parse_u16(i)?;
        let (i, minor_version) = En::parse_u16(i)?;
        let (i, section_len) = En::parse_i64(i)?;
        let options = decode_options::<En, SectionHeaderOptions>(i);
        let block = SectionHeaderBlock {
            endianness,
            major_version,
            minor_version,
            section_len,
            options,
        };
        Ok((&i[i.len()..], block))
    }
}
