use std::convert::TryFrom;
use std::net::{Ipv4Addr, Ipv6Addr};

use nom::error::ParseError;
use nom::IResult;

use crate::endianness::{Endianness, PcapEndianness};
use crate::Linktype;

use super::*;

/// An Interface Description Block (IDB) is the container for information
/// describing an interface on which packet data is captured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceDescriptionBlock {
    pub linktype: Linktype,
    pub reserved: u16,
    pub snaplen: u32,
    pub options: InterfaceDescriptionOptions,
}

impl InterfaceDescriptionBlock {
    /// Decode the interface time resolution, in units per second
    ///
    /// If the `if_tsresol` option is absent, the default resolution (microseconds) is used.
    /// Return the resolution, or `None` if the resolution is invalid (for ex. greater than `2^64`)
    #[inline]
    pub fn ts_resolution(&self) -> Option<u64> {
        build_ts_resolution(self.options.tsresol.unwrap_or(DEFAULT_TSRESOL))
    }

    /// Return the interface timestamp offset, in seconds
    #[inline]
    pub fn ts_offset(&self) -> i64 {
        self.options.tsoffset.unwrap_or(0)
    }
}

/// Options of an Interface Description Block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfaceDescriptionOptions {
    pub comments: Vec<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Pairs of `(address, netmask)`
    pub ipv4_addrs: Vec<(Ipv4Addr, Ipv4Addr)>,
    /// Pairs of `(address, prefix length)`
    pub ipv6_addrs: Vec<(Ipv6Addr, u8)>,
    pub mac_addr: Option<[u8; 6]>,
    pub eui_addr: Option<[u8; 8]>,
    /// Interface speed, in bits per second
    pub speed: Option<u64>,
    pub tsresol: Option<u8>,
    pub tzone: Option<i32>,
    /// Filter type (first byte) followed by the filter itself
    pub filter: Option<Vec<u8>>,
    pub os: Option<String>,
    pub fcslen: Option<u8>,
    pub tsoffset: Option<i64>,
    pub hardware: Option<String>,
    pub tx_speed: Option<u64>,
    pub rx_speed: Option<u64>,
    pub unknown: Vec<RawOption>,
}

impl OptionSet for InterfaceDescriptionOptions {
    fn set_option(&mut self, option: &PcapNGOption, endianness: Endianness) -> bool {
        let value = option.value;
        match option.code {
            OptionCode::Comment => push_comment(&mut self.comments, option),
            OptionCode::IfName => set_str(&mut self.name, option),
            OptionCode::IfDescription => set_str(&mut self.description, option),
            OptionCode::IfIpv4Addr => {
                if value.len() != 8 {
                    return false;
                }
                let addr = Ipv4Addr::new(value[0], value[1], value[2], value[3]);
                let mask = Ipv4Addr::new(value[4], value[5], value[6], value[7]);
                self.ipv4_addrs.push((addr, mask));
                true
            }
            OptionCode::IfIpv6Addr => {
                if value.len() != 17 {
                    return false;
                }
                match <[u8; 16]>::try_from(&value[..16]) {
                    Ok(b) => {
                        self.ipv6_addrs.push((Ipv6Addr::from(b), value[16]));
                        true
                    }
                    Err(_) => false,
                }
            }
            OptionCode::IfMacAddr => set_value(&mut self.mac_addr, <[u8; 6]>::try_from(value).ok()),
            OptionCode::IfEuiAddr => set_value(&mut self.eui_addr, <[u8; 8]>::try_from(value).ok()),
            OptionCode::IfSpeed => set_value(&mut self.speed, option.as_u64(endianness)),
            OptionCode::IfTsresol => set_value(&mut self.tsresol, option.as_u8()),
            OptionCode::IfTzone => set_value(&mut self.tzone, option.as_i32(endianness)),
            OptionCode::IfFilter => {
                if value.is_empty() {
                    return false;
                }
                self.filter = Some(value.to_vec());
                true
            }
            OptionCode::IfOs => set_str(&mut self.os, option),
            OptionCode::IfFcslen => set_value(&mut self.fcslen, option.as_u8()),
            OptionCode::IfTsoffset => set_value(&mut self.tsoffset, option.as_i64(endianness)),
            OptionCode::IfHardware => set_str(&mut self.hardware, option),
            OptionCode::IfTxSpeed => set_value(&mut self.tx_speed, option.as_u64(endianness)),
            OptionCode::IfRxSpeed => set_value(&mut self.rx_speed, option.as_u64(endianness)),
            _ => false,
        }
    }

    fn unknown_mut(&mut self) -> &mut Vec<RawOption> {
        &mut self.unknown
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for InterfaceDescriptionBlock {
    const BODY_MIN_SZ: usize = 8;
    const MAGIC: u32 = IDB_MAGIC;

    fn inner_parse<'a, E: ParseError<&'a [u8]>>(
        i: &'a [u8],
    ) -> IResult<&'a [u8], InterfaceDescriptionBlock, E> {
        let (i, linktype) = En::parse_u16(i)?;
        let (i, reserved) = En::parse_u16(i)?;
        let (i, snaplen) = En::parse_u32(i)?;
        // read options
        let options = decode_options::<En, InterfaceDescriptionOptions>(i);
        let block = InterfaceDescriptionBlock {
            linktype: Linktype(i32::from(linktype)),
            reserved,
            snaplen,
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
    fn idb_options_le() {
        let body = hex!(
            "
            01 00 00 00 00 00 04 00
            02 00 04 00 65 74 68 30
            06 00 06 00 00 11 22 33 44 55 00 00
            09 00 01 00 09 00 00 00
            08 00 08 00 00 e1 f5 05 00 00 00 00
            0d 00 03 00 01 02 03 00
            00 00 00 00"
        );
        let (_, idb) = ng_block_parser::<InterfaceDescriptionBlock, PcapLE, PcapError>()(&body)
            .expect("could not parse IDB");
        assert_eq!(idb.linktype, Linktype::ETHERNET);
        assert_eq!(idb.snaplen, 0x40000);
        assert_eq!(idb.options.name.as_deref(), Some("eth0"));
        assert_eq!(idb.options.mac_addr, Some(hex!("00 11 22 33 44 55")));
        assert_eq!(idb.options.tsresol, Some(9));
        assert_eq!(idb.ts_resolution(), Some(1_000_000_000));
        assert_eq!(idb.options.speed, Some(100_000_000));
        // if_fcslen must be one byte long
        assert_eq!(idb.options.fcslen, None);
        assert_eq!(
            idb.options.unknown,
            vec![RawOption {
                code: 13,
                value: vec![1, 2, 3]
            }]
        );
    }
}
