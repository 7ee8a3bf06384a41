use nom::error::ParseError;
use nom::IResult;

use crate::endianness::PcapEndianness;
use crate::traits::PcapNGPacketBlock;

use super::*;

/// The Packet Block (PB) is obsolete, and superseded by the Enhanced Packet Block.
///
/// It is still found in files written by old tools, and differs from the EPB by its 16-bit
/// interface identifier and the drops counter stored in the fixed header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketBlock {
    pub if_id: u16,
    /// Packets dropped by the interface since the previous packet
    pub drops_count: u16,
    pub timestamp: u64,
    pub caplen: u32,
    pub origlen: u32,
    pub data: Vec<u8>,
    pub options: PacketOptions,
}

impl PacketBlock {
    #[inline]
    pub fn decode_ts(&self, ts_offset: u64, resolution: u64) -> (u32, u32) {
        build_ts(self.timestamp, ts_offset, resolution)
    }
}

impl PcapNGPacketBlock for PacketBlock {
    fn interface_id(&self) -> u32 {
        u32::from(self.if_id)
    }
    fn truncated(&self) -> bool {
        self.origlen != self.caplen
    }
    fn orig_len(&self) -> u32 {
        self.origlen
    }
    fn packet_data(&self) -> &[u8] {
        &self.data
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for PacketBlock {
    const BODY_MIN_SZ: usize = 20;
    const MAGIC: u32 = PB_MAGIC;

    fn inner_parse<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], PacketBlock, E> {
        let (i, if_id) = En::parse_u16(i)?;
        let (i, drops_count) = En::parse_u16(i)?;
        let (i, timestamp) = En::parse_ts(i)?;
        let (i, caplen) = En::parse_u32(i)?;
        let (i, origlen) = En::parse_u32(i)?;
        let (i, (data, options)) = parse_packet_data_and_options::<En, E>(i, caplen)?;
        let block = PacketBlock {
            if_id,
            drops_count,
            timestamp,
            caplen,
            origlen,
            data,
            options,
        };
        Ok((i, block))
    }
}
