use nom::error::ParseError;
use nom::IResult;

use crate::endianness::PcapEndianness;
use crate::traits::PcapNGPacketBlock;

use super::*;

/// The Simple Packet Block (SPB) is a lightweight container for storing
/// the packets coming from the network.
///
/// The block has no captured length field: the captured data is the smallest of the original
/// length and the space available in the block. Since the padding cannot be told apart from
/// data when the packet was truncated, it may be included in `data` in that case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplePacketBlock {
    /// Original packet length
    pub origlen: u32,
    pub data: Vec<u8>,
}

impl PcapNGPacketBlock for SimplePacketBlock {
    fn interface_id(&self) -> u32 {
        0
    }
    fn truncated(&self) -> bool {
        (self.origlen as usize) > self.data.len()
    }
    fn orig_len(&self) -> u32 {
        self.origlen
    }
    fn packet_data(&self) -> &[u8] {
        &self.data
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for SimplePacketBlock {
    const BODY_MIN_SZ: usize = 4;
    const MAGIC: u32 = SPB_MAGIC;

    fn inner_parse<'a, E: ParseError<&'a [u8]>>(
        i: &'a [u8],
    ) -> IResult<&'a [u8], SimplePacketBlock, E> {
        let (i, origlen) = En::parse_u32(i)?;
        let caplen = (origlen as usize).min(i.len());
        let block = SimplePacketBlock {
            origlen,
            data: i[..caplen].to_vec(),
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
    fn spb_padding_removed() {
        let body = hex!("03 00 00 00 0a 0b 0c 00");
        let (_, spb) = ng_block_parser::<SimplePacketBlock, PcapLE, PcapError>()(&body)
            .expect("could not parse SPB");
        assert_eq!(spb.origlen, 3);
        assert_eq!(spb.data, vec![0x0a, 0x0b, 0x0c]);
        assert!(!spb.truncated());
    }

    #[test]
    fn spb_truncated() {
        let body = hex!("00 01 00 00 0a 0b 0c 0d");
        let (_, spb) = ng_block_parser::<SimplePacketBlock, PcapLE, PcapError>()(&body)
            .expect("could not parse SPB");
        assert_eq!(spb.origlen, 256);
        assert_eq!(spb.data.len(), 4);
        assert!(spb.truncated());
    }
}
