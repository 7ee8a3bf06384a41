use std::io::Write;

use cookie_factory::combinator::slice;
use cookie_factory::multi::many_ref;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, GenError, SerializeFn};
use rusticata_macros::align32;

use crate::endianness::Endianness;
use crate::pcapng::*;
use crate::utils::padding_len;

/// Common trait for all serialization functions
pub trait ToVec {
    /// Serialize to bytes representation, using the given byte order.
    /// Check values and fix all fields before serializing.
    fn to_vec(&mut self, endianness: Endianness) -> Result<Vec<u8>, GenError> {
        self.fix(endianness);
        self.to_vec_raw(endianness)
    }

    /// Check and correct all fields: fix lengths fields and other values if possible.
    fn fix(&mut self, _endianness: Endianness) {}

    /// Serialize to bytes representation, using the given byte order. Do not check values
    fn to_vec_raw(&self, endianness: Endianness) -> Result<Vec<u8>, GenError>;
}

static PADDING: [u8; 3] = [0; 3];

fn padding_for<'a, W: Write + 'a>(unaligned_length: usize) -> impl SerializeFn<W> + 'a {
    slice(&PADDING[..padding_len(unaligned_length)])
}

fn raw_option<'a, W: Write + 'a>(o: &'a RawOption, en: Endianness) -> impl SerializeFn<W> + 'a {
    tuple((
        slice(en.u16_to_bytes(o.code)),
        slice(en.u16_to_bytes(o.value.len() as u16)),
        slice(&o.value),
        padding_for(o.value.len()),
    ))
}

fn raw_options<'a, W: Write + 'a>(
    options: &'a [RawOption],
    en: Endianness,
) -> impl SerializeFn<W> + 'a {
    many_ref(options, move |o| raw_option(o, en))
}

fn options_length(options: &[RawOption]) -> usize {
    options.iter().map(|o| 4 + align32!(o.value.len())).sum()
}

/// Build the option list of a block, as written on disk
///
/// Known fields come first, in code order, followed by the options kept as raw bytes.
/// An end-of-options marker is added if the list is not empty.
trait ToRawOptions {
    fn known_options(&self, en: Endianness) -> Vec<RawOption>;

    fn unknown(&self) -> &[RawOption];

    fn to_raw_options(&self, en: Endianness) -> Vec<RawOption> {
        let mut options = self.known_options(en);
        options.extend(
            self.unknown()
                .iter()
                .filter(|o| o.code != OptionCode::EndOfOpt.0)
                .cloned(),
        );
        if !options.is_empty() {
            options.push(RawOption {
                code: OptionCode::EndOfOpt.0,
                value: Vec::new(),
            });
        }
        options
    }
}

fn push(options: &mut Vec<RawOption>, code: OptionCode, value: &[u8]) {
    options.push(RawOption {
        code: code.0,
        value: value.to_vec(),
    });
}

fn push_comments(options: &mut Vec<RawOption>, comments: &[String]) {
    for c in comments {
        push(options, OptionCode::Comment, c.as_bytes());
    }
}

fn push_str(options: &mut Vec<RawOption>, code: OptionCode, s: &Option<String>) {
    if let Some(s) = s {
        push(options, code, s.as_bytes());
    }
}

fn push_u64(options: &mut Vec<RawOption>, code: OptionCode, n: Option<u64>, en: Endianness) {
    if let Some(n) = n {
        push(options, code, &en.u64_to_bytes(n));
    }
}

fn push_ts(options: &mut Vec<RawOption>, code: OptionCode, ts: Option<u64>, en: Endianness) {
    if let Some(ts) = ts {
        let (high, low) = en.u64_to_halves(ts);
        let mut value = high.to_vec();
        value.extend_from_slice(&low);
        push(options, code, &value);
    }
}

impl ToRawOptions for SectionHeaderOptions {
    fn known_options(&self, _en: Endianness) -> Vec<RawOption> {
        let mut v = Vec::new();
        push_comments(&mut v, &self.comments);
        push_str(&mut v, OptionCode::ShbHardware, &self.hardware);
        push_str(&mut v, OptionCode::ShbOs, &self.os);
        push_str(&mut v, OptionCode::ShbUserAppl, &self.user_appl);
        v
    }

    fn unknown(&self) -> &[RawOption] {
        &self.unknown
    }
}

impl ToRawOptions for InterfaceDescriptionOptions {
    fn known_options(&self, en: Endianness) -> Vec<RawOption> {
        let mut v = Vec::new();
        push_comments(&mut v, &self.comments);
        push_str(&mut v, OptionCode::IfName, &self.name);
        push_str(&mut v, OptionCode::IfDescription, &self.description);
        for (addr, mask) in &self.ipv4_addrs {
            let mut value = addr.octets().to_vec();
            value.extend_from_slice(&mask.octets());
            push(&mut v, OptionCode::IfIpv4Addr, &value);
        }
        for (addr, prefix_len) in &self.ipv6_addrs {
            let mut value = addr.octets().to_vec();
            value.push(*prefix_len);
            push(&mut v, OptionCode::IfIpv6Addr, &value);
        }
        if let Some(mac) = &self.mac_addr {
            push(&mut v, OptionCode::IfMacAddr, mac);
        }
        if let Some(eui) = &self.eui_addr {
            push(&mut v, OptionCode::IfEuiAddr, eui);
        }
        push_u64(&mut v, OptionCode::IfSpeed, self.speed, en);
        if let Some(tsresol) = self.tsresol {
            push(&mut v, OptionCode::IfTsresol, &[tsresol]);
        }
        if let Some(tzone) = self.tzone {
            push(&mut v, OptionCode::IfTzone, &en.u32_to_bytes(tzone as u32));
        }
        if let Some(filter) = &self.filter {
            push(&mut v, OptionCode::IfFilter, filter);
        }
        push_str(&mut v, OptionCode::IfOs, &self.os);
        if let Some(fcslen) = self.fcslen {
            push(&mut v, OptionCode::IfFcslen, &[fcslen]);
        }
        push_u64(
            &mut v,
            OptionCode::IfTsoffset,
            self.tsoffset.map(|n| n as u64),
            en,
        );
        push_str(&mut v, OptionCode::IfHardware, &self.hardware);
        push_u64(&mut v, OptionCode::IfTxSpeed, self.tx_speed, en);
        push_u64(&mut v, OptionCode::IfRxSpeed, self.rx_speed, en);
        v
    }

    fn unknown(&self) -> &[RawOption] {
        &self.unknown
    }
}

impl ToRawOptions for PacketOptions {
    fn known_options(&self, en: Endianness) -> Vec<RawOption> {
        let mut v = Vec::new();
        push_comments(&mut v, &self.comments);
        if let Some(flags) = self.flags() {
            push(&mut v, OptionCode::EpbFlags, &en.u32_to_bytes(flags));
        }
        if let Some(hash) = &self.hash {
            let mut value = vec![u8::from(hash.algorithm)];
            value.extend_from_slice(&hash.value);
            push(&mut v, OptionCode::EpbHash, &value);
        }
        push_u64(&mut v, OptionCode::EpbDropcount, self.drop_count, en);
        push_u64(&mut v, OptionCode::EpbPacketId, self.packet_id, en);
        if let Some(queue) = self.queue {
            push(&mut v, OptionCode::EpbQueue, &en.u32_to_bytes(queue));
        }
        v
    }

    fn unknown(&self) -> &[RawOption] {
        &self.unknown
    }
}

impl ToRawOptions for NameResolutionOptions {
    fn known_options(&self, _en: Endianness) -> Vec<RawOption> {
        let mut v = Vec::new();
        push_comments(&mut v, &self.comments);
        push_str(&mut v, OptionCode::NsDnsName, &self.dns_name);
        if let Some(addr) = &self.dns_ipv4 {
            push(&mut v, OptionCode::NsDnsIpv4Addr, &addr.octets());
        }
        if let Some(addr) = &self.dns_ipv6 {
            push(&mut v, OptionCode::NsDnsIpv6Addr, &addr.octets());
        }
        v
    }

    fn unknown(&self) -> &[RawOption] {
        &self.unknown
    }
}

impl ToRawOptions for InterfaceStatisticsOptions {
    fn known_options(&self, en: Endianness) -> Vec<RawOption> {
        let mut v = Vec::new();
        push_comments(&mut v, &self.comments);
        push_ts(&mut v, OptionCode::IsbStartTime, self.start_time, en);
        push_ts(&mut v, OptionCode::IsbEndTime, self.end_time, en);
        push_u64(&mut v, OptionCode::IsbIfRecv, self.if_recv, en);
        push_u64(&mut v, OptionCode::IsbIfDrop, self.if_drop, en);
        push_u64(&mut v, OptionCode::IsbFilterAccept, self.filter_accept, en);
        push_u64(&mut v, OptionCode::IsbOsDrop, self.os_drop, en);
        push_u64(&mut v, OptionCode::IsbUsrDeliv, self.usr_deliv, en);
        v
    }

    fn unknown(&self) -> &[RawOption] {
        &self.unknown
    }
}

impl ToVec for SectionHeaderBlock {
    /// Check and correct all fields: set version and byte order
    fn fix(&mut self, endianness: Endianness) {
        self.endianness = endianness;
        self.major_version = 1;
        self.minor_version = 0;
    }

    fn to_vec_raw(&self, en: Endianness) -> Result<Vec<u8>, GenError> {
        let options = self.options.to_raw_options(en);
        let block_len = (28 + options_length(&options)) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                slice(en.u32_to_bytes(SHB_MAGIC)),
                slice(en.u32_to_bytes(block_len)),
                slice(en.u32_to_bytes(BOM_MAGIC)),
                slice(en.u16_to_bytes(self.major_version)),
                slice(en.u16_to_bytes(self.minor_version)),
                slice(en.u64_to_bytes(self.section_len as u64)),
                raw_options(&options, en),
                slice(en.u32_to_bytes(block_len)),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for InterfaceDescriptionBlock {
    fn fix(&mut self, _endianness: Endianness) {
        self.reserved = 0;
    }

    fn to_vec_raw(&self, en: Endianness) -> Result<Vec<u8>, GenError> {
        let options = self.options.to_raw_options(en);
        let block_len = (20 + options_length(&options)) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                slice(en.u32_to_bytes(IDB_MAGIC)),
                slice(en.u32_to_bytes(block_len)),
                slice(en.u16_to_bytes(self.linktype.0 as u16)),
                slice(en.u16_to_bytes(self.reserved)),
                slice(en.u32_to_bytes(self.snaplen)),
                raw_options(&options, en),
                slice(en.u32_to_bytes(block_len)),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for EnhancedPacketBlock {
    /// Check and correct all fields: set captured length
    fn fix(&mut self, _endianness: Endianness) {
        self.caplen = self.data.len() as u32;
    }

    fn to_vec_raw(&self, en: Endianness) -> Result<Vec<u8>, GenError> {
        let options = self.options.to_raw_options(en);
        let block_len = (32 + align32!(self.data.len()) + options_length(&options)) as u32;
        let (ts_high, ts_low) = en.u64_to_halves(self.timestamp);
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                slice(en.u32_to_bytes(EPB_MAGIC)),
                slice(en.u32_to_bytes(block_len)),
                slice(en.u32_to_bytes(self.if_id)),
                slice(ts_high),
                slice(ts_low),
                slice(en.u32_to_bytes(self.caplen)),
                slice(en.u32_to_bytes(self.origlen)),
                slice(&self.data),
                padding_for(self.data.len()),
                raw_options(&options, en),
                slice(en.u32_to_bytes(block_len)),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for PacketBlock {
    /// Check and correct all fields: set captured length
    fn fix(&mut self, _endianness: Endianness) {
        self.caplen = self.data.len() as u32;
    }

    fn to_vec_raw(&self, en: Endianness) -> Result<Vec<u8>, GenError> {
        let options = self.options.to_raw_options(en);
        let block_len = (32 + align32!(self.data.len()) + options_length(&options)) as u32;
        let (ts_high, ts_low) = en.u64_to_halves(self.timestamp);
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                slice(en.u32_to_bytes(PB_MAGIC)),
                slice(en.u32_to_bytes(block_len)),
                slice(en.u16_to_bytes(self.if_id)),
                slice(en.u16_to_bytes(self.drops_count)),
                slice(ts_high),
                slice(ts_low),
                slice(en.u32_to_bytes(self.caplen)),
                slice(en.u32_to_bytes(self.origlen)),
                slice(&self.data),
                padding_for(self.data.len()),
                raw_options(&options, en),
                slice(en.u32_to_bytes(block_len)),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for SimplePacketBlock {
    fn to_vec_raw(&self, en: Endianness) -> Result<Vec<u8>, GenError> {
        let block_len = (16 + align32!(self.data.len())) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                slice(en.u32_to_bytes(SPB_MAGIC)),
                slice(en.u32_to_bytes(block_len)),
                slice(en.u32_to_bytes(self.origlen)),
                slice(&self.data),
                padding_for(self.data.len()),
                slice(en.u32_to_bytes(block_len)),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

// name records share the layout of options
fn name_records(records: &[NameRecord]) -> Vec<RawOption> {
    fn names_value(addr: &[u8], names: &[String]) -> Vec<u8> {
        let mut value = addr.to_vec();
        for name in names {
            value.extend_from_slice(name.as_bytes());
            value.push(0);
        }
        value
    }
    let mut v: Vec<RawOption> = records
        .iter()
        .map(|r| {
            let value = match r {
                NameRecord::Ipv4 { addr, names } => names_value(&addr.octets(), names),
                NameRecord::Ipv6 { addr, names } => names_value(&addr.octets(), names),
                NameRecord::Unknown { value, .. } => value.clone(),
            };
            RawOption {
                code: r.record_type().0,
                value,
            }
        })
        .collect();
    v.push(RawOption {
        code: NameRecordType::End.0,
        value: Vec::new(),
    });
    v
}

impl ToVec for NameResolutionBlock {
    fn to_vec_raw(&self, en: Endianness) -> Result<Vec<u8>, GenError> {
        let records = name_records(&self.records);
        let options = self.options.to_raw_options(en);
        let block_len = (12 + options_length(&records) + options_length(&options)) as u32;
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                slice(en.u32_to_bytes(NRB_MAGIC)),
                slice(en.u32_to_bytes(block_len)),
                raw_options(&records, en),
                raw_options(&options, en),
                slice(en.u32_to_bytes(block_len)),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for InterfaceStatisticsBlock {
    fn to_vec_raw(&self, en: Endianness) -> Result<Vec<u8>, GenError> {
        let options = self.options.to_raw_options(en);
        let block_len = (24 + options_length(&options)) as u32;
        let (ts_high, ts_low) = en.u64_to_halves(self.timestamp);
        let mut v = Vec::with_capacity(block_len as usize);
        gen(
            tuple((
                slice(en.u32_to_bytes(ISB_MAGIC)),
                slice(en.u32_to_bytes(block_len)),
                slice(en.u32_to_bytes(self.if_id)),
                slice(ts_high),
                slice(ts_low),
                raw_options(&options, en),
                slice(en.u32_to_bytes(block_len)),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for Block {
    fn fix(&mut self, endianness: Endianness) {
        match self {
            Block::SectionHeader(b) => b.fix(endianness),
            Block::InterfaceDescription(b) => b.fix(endianness),
            Block::EnhancedPacket(b) => b.fix(endianness),
            Block::SimplePacket(b) => b.fix(endianness),
            Block::NameResolution(b) => b.fix(endianness),
            Block::InterfaceStatistics(b) => b.fix(endianness),
            Block::Packet(b) => b.fix(endianness),
        }
    }

    fn to_vec_raw(&self, endianness: Endianness) -> Result<Vec<u8>, GenError> {
        match self {
            Block::SectionHeader(b) => b.to_vec_raw(endianness),
            Block::InterfaceDescription(b) => b.to_vec_raw(endianness),
            Block::EnhancedPacket(b) => b.to_vec_raw(endianness),
            Block::SimplePacket(b) => b.to_vec_raw(endianness),
            Block::NameResolution(b) => b.to_vec_raw(endianness),
            Block::InterfaceStatistics(b) => b.to_vec_raw(endianness),
            Block::Packet(b) => b.to_vec_raw(endianness),
        }
    }
}
