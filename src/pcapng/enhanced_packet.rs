use nom::bytes::complete::take;
use nom::error::{ErrorKind, ParseError};
use nom::{Err, IResult};

use crate::endianness::PcapEndianness;
use crate::traits::PcapNGPacketBlock;
use crate::utils::padding_len;

use super::*;

/// An Enhanced Packet Block (EPB) is the standard container for storing
/// the packets coming from the network.
///
/// `data` holds exactly `caplen` bytes: the alignment padding is removed.
///
/// ## Examples
///
/// ```rust
/// use pcapng_decode::{decode_all, Block};
/// use pcapng_decode::traits::PcapNGPacketBlock;
///
/// # let input = [
/// #     0x0a, 0x0d, 0x0d, 0x0a, 0x1c, 0, 0, 0, 0x4d, 0x3c, 0x2b, 0x1a, 1, 0, 0, 0,
/// #     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x1c, 0, 0, 0,
/// #     6, 0, 0, 0, 0x24, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0,
/// #     2, 0, 0, 0, 8, 0, 0, 0, 0xde, 0xad, 0, 0, 0x24, 0, 0, 0,
/// # ];
/// let blocks = decode_all(&input).expect("could not decode capture");
/// for block in &blocks {
///     if let Block::EnhancedPacket(epb) = block {
///         if epb.truncated() {
///             // packet was truncated
///         } else {
///             // we have a full packet
///         }
///     }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnhancedPacketBlock {
    pub if_id: u32,
    /// Timestamp, in units of the interface resolution
    pub timestamp: u64,
    /// Captured packet length
    pub caplen: u32,
    /// Original packet length
    pub origlen: u32,
    /// Packet data (without padding)
    pub data: Vec<u8>,
    pub options: PacketOptions,
}

impl EnhancedPacketBlock {
    #[inline]
    pub fn ts_high(&self) -> u32 {
        (self.timestamp >> 32) as u32
    }

    #[inline]
    pub fn ts_low(&self) -> u32 {
        self.timestamp as u32
    }

    /// Decode the packet timestamp
    ///
    /// To decode the timestamp, the raw values if_tsresol and if_tsoffset are required.
    /// These values are stored as options in the [`InterfaceDescriptionBlock`]
    /// matching the interface ID.
    ///
    /// Return the timestamp seconds and fractional part (in resolution units)
    #[inline]
    pub fn decode_ts(&self, ts_offset: u64, resolution: u64) -> (u32, u32) {
        build_ts(self.timestamp, ts_offset, resolution)
    }

    /// Decode the packet timestamp as `f64`
    #[inline]
    pub fn decode_ts_f64(&self, ts_offset: u64, resolution: u64) -> f64 {
        build_ts_f64(self.timestamp, ts_offset, resolution)
    }
}

impl PcapNGPacketBlock for EnhancedPacketBlock {
    fn interface_id(&self) -> u32 {
        self.if_id
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

/// Read captured data and the following options, shared by EPB and PB
///
/// Options start at the next 4-byte boundary after the packet data.
pub(crate) fn parse_packet_data_and_options<'a, En: PcapEndianness, E: ParseError<&'a [u8]>>(
    i: &'a [u8],
    caplen: u32,
) -> IResult<&'a [u8], (Vec<u8>, PacketOptions), E> {
    let caplen = caplen as usize;
    if caplen > i.len() {
        return Err(Err::Error(E::from_error_kind(i, ErrorKind::Verify)));
    }
    let (i, data) = take(caplen)(i)?;
    let pad = padding_len(caplen).min(i.len());
    let (i, _) = take(pad)(i)?;
    let options = decode_options::<En, PacketOptions>(i);
    Ok((&i[i.len()..], (data.to_vec(), options)))
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for EnhancedPacketBlock {
    const BODY_MIN_SZ: usize = 20;
    const MAGIC: u32 = EPB_MAGIC;

    fn inner_parse<'a, E: ParseError<&'a [u8]>>(
        i: &'a [u8],
    ) -> IResult<&'a [u8], EnhancedPacketBlock, E> {
        let (i, if_id) = En::parse_u32(i)?;
        let (i, timestamp) = En::parse_ts(i)?;
        let (i, caplen) = En::parse_u32(i)?;
        let (i, origlen) = En::parse_u32(i)?;
        let (i, (data, options)) = parse_packet_data_and_options::<En, E>(i, caplen)?;
        let block = EnhancedPacketBlock {
            if_id,
            timestamp,
            caplen,
            origlen,
            data,
            options,
        };
        Ok((i, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endianness::{PcapBE, PcapLE};
    use crate::PcapError;
    use hex_literal::hex;

    fn parse_le(body: &[u8]) -> EnhancedPacketBlock {
        let (_, epb) = ng_block_parser::<EnhancedPacketBlock, PcapLE, PcapError>()(body)
            .expect("could not parse EPB");
        epb
    }

    #[test]
    fn epb_without_options() {
        let body = hex!(
            "
            01 00 00 00 97 c3 04 00 aa 47 ca 64
            03 00 00 00 10 00 00 00
            01 02 03 00"
        );
        let epb = parse_le(&body);
        assert_eq!(epb.if_id, 1);
        assert_eq!(epb.timestamp, 0x0004_c397_64ca_47aa);
        assert_eq!(epb.ts_high(), 0x0004_c397);
        assert_eq!(epb.caplen, 3);
        assert_eq!(epb.origlen, 16);
        assert!(epb.truncated());
        assert_eq!(epb.data, vec![1, 2, 3]);
        assert_eq!(epb.options, PacketOptions::default());
    }

    #[test]
    fn epb_empty_payload() {
        let body = hex!("00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00");
        let epb = parse_le(&body);
        assert_eq!(epb.caplen, 0);
        assert!(epb.data.is_empty());
    }

    #[test]
    fn epb_caplen_larger_than_origlen_is_kept() {
        let body = hex!("00 00 00 00 00 00 00 00 00 00 00 00 04 00 00 00 02 00 00 00 aa bb cc dd");
        let epb = parse_le(&body);
        assert_eq!(epb.caplen, 4);
        assert_eq!(epb.origlen, 2);
        assert_eq!(epb.data.len(), 4);
    }

    #[test]
    fn epb_caplen_exceeds_body() {
        let body = hex!("00 00 00 00 00 00 00 00 00 00 00 00 08 00 00 00 08 00 00 00 aa bb cc dd");
        let res = ng_block_parser::<EnhancedPacketBlock, PcapLE, PcapError>()(&body);
        assert!(res.is_err());
    }

    #[test]
    fn epb_options_be() {
        let body = hex!(
            "
            00 00 00 02 00 00 00 01 00 00 00 02
            00 00 00 05 00 00 00 05
            01 02 03 04 05 00 00 00
            00 02 00 04 00 00 00 05
            00 03 00 05 02 de ad be ef 00 00 00
            00 04 00 08 00 00 00 00 00 00 00 07
            0b b8 00 02 ca fe 00 00
            00 00 00 00
            00 01 00 04 6c 6f 73 74"
        );
        let (_, epb) = ng_block_parser::<EnhancedPacketBlock, PcapBE, PcapError>()(&body)
            .expect("could not parse EPB");
        assert_eq!(epb.if_id, 2);
        assert_eq!(epb.timestamp, (1 << 32) | 2);
        assert_eq!(epb.data, vec![1, 2, 3, 4, 5]);
        let opts = &epb.options;
        assert_eq!(opts.direction, PacketDirection::Inbound);
        assert_eq!(opts.reception_type, ReceptionType::Unicast);
        assert_eq!(
            opts.hash,
            Some(PacketHash {
                algorithm: HashAlgorithm::Crc32,
                value: vec![0xde, 0xad, 0xbe, 0xef],
            })
        );
        assert_eq!(opts.drop_count, Some(7));
        // unknown code 3000 is kept, scanning stops at end of options
        assert_eq!(
            opts.unknown,
            vec![RawOption {
                code: 3000,
                value: vec![0xca, 0xfe]
            }]
        );
        assert!(opts.comments.is_empty());
    }
}
