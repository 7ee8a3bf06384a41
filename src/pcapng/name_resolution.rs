use std::convert::TryFrom;
use std::net::{Ipv4Addr, Ipv6Addr};

use nom::bytes::complete::take;
use nom::error::ParseError;
use nom::IResult;
use rusticata_macros::newtype_enum;

use crate::endianness::{Endianness, PcapEndianness};
use crate::utils::padding_len;

use super::*;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct NameRecordType(pub u16);

newtype_enum! {
    impl debug NameRecordType {
        End = 0,
        Ipv4 = 1,
        Ipv6 = 2
    }
}

/// A name resolution record: an address and the names associated with it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameRecord {
    Ipv4 { addr: Ipv4Addr, names: Vec<String> },
    Ipv6 { addr: Ipv6Addr, names: Vec<String> },
    /// Record of unknown type, or with an invalid value
    Unknown { record_type: u16, value: Vec<u8> },
}

impl NameRecord {
    pub fn record_type(&self) -> NameRecordType {
        match self {
            NameRecord::Ipv4 { .. } => NameRecordType::Ipv4,
            NameRecord::Ipv6 { .. } => NameRecordType::Ipv6,
            NameRecord::Unknown { record_type, .. } => NameRecordType(*record_type),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameResolutionBlock {
    pub records: Vec<NameRecord>,
    pub options: NameResolutionOptions,
}

/// Options of a Name Resolution Block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameResolutionOptions {
    pub comments: Vec<String>,
    pub dns_name: Option<String>,
    pub dns_ipv4: Option<Ipv4Addr>,
    pub dns_ipv6: Option<Ipv6Addr>,
    pub unknown: Vec<RawOption>,
}

impl OptionSet for NameResolutionOptions {
    fn set_option(&mut self, option: &PcapNGOption, _endianness: Endianness) -> bool {
        match option.code {
            OptionCode::Comment => push_comment(&mut self.comments, option),
            OptionCode::NsDnsName => set_str(&mut self.dns_name, option),
            OptionCode::NsDnsIpv4Addr => set_value(
                &mut self.dns_ipv4,
                <[u8; 4]>::try_from(option.value).ok().map(Ipv4Addr::from),
            ),
            OptionCode::NsDnsIpv6Addr => set_value(
                &mut self.dns_ipv6,
                <[u8; 16]>::try_from(option.value).ok().map(Ipv6Addr::from),
            ),
            _ => false,
        }
    }

    fn unknown_mut(&mut self) -> &mut Vec<RawOption> {
        &mut self.unknown
    }
}

impl<En: PcapEndianness> PcapNGBlockParser<En> for NameResolutionBlock {
    const BODY_MIN_SZ: usize = 0;
    const MAGIC: u32 = NRB_MAGIC;

    fn inner_parse<'a, E: ParseError<&'a [u8]>>(
        i: &'a [u8],
    ) -> IResult<&'a [u8], NameResolutionBlock, E> {
        let (i, records) = parse_name_record_list::<En, E>(i)?;
        let options = decode_options::<En, NameResolutionOptions>(i);
        let block = NameResolutionBlock { records, options };
        Ok((&i[i.len()..], block))
    }
}

/// Split a list of NUL-terminated names
fn split_names(i: &[u8]) -> Option<Vec<String>> {
    i.split(|&b| b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| std::str::from_utf8(s).ok().map(str::to_owned))
        .collect()
}

fn decode_name_record(record_type: u16, value: &[u8]) -> NameRecord {
    let decoded = match NameRecordType(record_type) {
        NameRecordType::Ipv4 if value.len() >= 4 => {
            let addr = <[u8; 4]>::try_from(&value[..4]).ok().map(Ipv4Addr::from);
            match (addr, split_names(&value[4..])) {
                (Some(addr), Some(names)) => Some(NameRecord::Ipv4 { addr, names }),
                _ => None,
            }
        }
        NameRecordType::Ipv6 if value.len() >= 16 => {
            let addr = <[u8; 16]>::try_from(&value[..16]).ok().map(Ipv6Addr::from);
            match (addr, split_names(&value[16..])) {
                (Some(addr), Some(names)) => Some(NameRecord::Ipv6 { addr, names }),
                _ => None,
            }
        }
        _ => None,
    };
    decoded.unwrap_or_else(|| NameRecord::Unknown {
        record_type,
        value: value.to_vec(),
    })
}

fn parse_name_record_list<'a, En: PcapEndianness, E: ParseError<&'a [u8]>>(
    mut i: &'a [u8],
) -> IResult<&'a [u8], Vec<NameRecord>, E> {
    let mut records = Vec::new();
    // the list ends with a nrb_record_end record, or with the block
    while !i.is_empty() {
        let (rem, record_type) = En::parse_u16(i)?;
        let (rem, record_len) = En::parse_u16(rem)?;
        if record_type == NameRecordType::End.0 {
            i = rem;
            break;
        }
        let (rem, value) = take(record_len as usize)(rem)?;
        let pad = padding_len(record_len as usize).min(rem.len());
        let (rem, _) = take(pad)(rem)?;
        records.push(decode_name_record(record_type, value));
        i = rem;
    }
    Ok((i, records))
}
