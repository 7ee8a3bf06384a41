use nom::error::ParseError;
use nom::IResult;

use crate::endianness::{Endianness, PcapEndianness};

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceStatisticsBlock {
    pub if_id: u32,
    pub timestamp: u64,
    pub options: InterfaceStatisticsOptions,
}

impl InterfaceStatisticsBlock {
    #[inline]
    pub fn decode_ts(&self, ts_offset: u64, resolution: u64) -> (u32, u32) {
        build_ts(self.timestamp, ts_offset, resolution)
    }
}

/// Options of an Interface Statistics Block
///
/// Timestamps use the resolution of the interface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfaceStatisticsOptions {
    pub comments: Vec<String>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub if_recv: Option<u64>,
    pub if_drop: Option<u64>,
    pub filter_accept: Option<u64>,
    pub os_drop: Option<u64>,
    pub usr_deliv: Option<u64>,
    pub unknown: Vec<RawOption>,
}

impl OptionSet for InterfaceStatisticsOptions {
    fn set_option(&mut self, option: &PcapNGOption, endianness: Endianness) -> bool {
        match option.code {
            OptionCode::Comment => push_comment(&mut self.comments, option),
            OptionCode::IsbStartTime => set_value(&mut self.start_time, option.as_ts(endianness)),
            OptionCode::IsbEndTime => set_value(&mut self.end_time, option.as_ts(endianness)),
            OptionCode::IsbIfRecv => set_value(&mut self.if_recv, option.as_u64(endianness)),
            OptionCode::IsbIfDrop => set_value(&mut self.if_drop, option.as_u64(endianness)),
            OptionCode::IsbFilterAccept => {
                set_value(&mut self.filter_accept, option.as_u64(endianness))
            }
            OptionCode::IsbOsDrop => set_value(&mut self.os_drop, option.as_u64(endianness)),
            OptionCode::IsbUsrDeliv => set_value(&mut self.usr_deliv, option.as_u64(endianness)),
            _ => false,
        }
    }

    fn unknown_mut(&mut self) -> &mut Vec<RawOption> {
        &mut self.unknown
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for InterfaceStatisticsBlock {
    const BODY_MIN_SZ: usize = 12;
    const MAGIC: u32 = ISB_MAGIC;

    fn inner_parse<'a, E: ParseError<&'a [u8]>>(
        i: &'a [u8],
    ) -> IResult<&'a [u8], InterfaceStatisticsBlock, E> {
        let (i, if_id) = En::parse_u32(i)?;
        let (i, timestamp) = En::parse_ts(i)?;
        let options = decode_options::<En, InterfaceStatisticsOptions>(i);
        let block = InterfaceStatisticsBlock {
            if_id,
            timestamp,
            options,
        };
        Ok((&i[i.len()..], block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endianness::PcapLE;
    use crate::PcapError;
    use hex_literal::hex;

    #[test]
    fn isb_le() {
        // isb_starttime example from the pcapng format description
        let body = hex!(
            "
            00 00 00 00 97 c3 04 00 aa 47 ca 64
            02 00 08 00 97 c3 04 00 aa 47 ca 64
            04 00 08 00 50 00 00 00 00 00 00 00
            05 00 04 00 01 00 00 00
            00 00 00 00"
        );
        let (_, isb) = ng_block_parser::<InterfaceStatisticsBlock, PcapLE, PcapError>()(&body)
            .expect("could not parse ISB");
        assert_eq!(isb.timestamp, 0x0004_c397_64ca_47aa);
        assert_eq!(isb.options.start_time, Some(0x0004_c397_64ca_47aa));
        assert_eq!(isb.options.if_recv, Some(80));
        // isb_ifdrop must be 8 bytes long
        assert_eq!(isb.options.if_drop, None);
        assert_eq!(isb.options.unknown.len(), 1);
        assert_eq!(isb.decode_ts(0, 1_000_000), (1_340_954_905, 298_858));
    }
}
