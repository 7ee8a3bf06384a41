//! Options shared by the Enhanced Packet Block and the obsolete Packet Block

use crate::endianness::Endianness;

use super::*;

/// Direction of a packet, from the `epb_flags` option (bits 0-1)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PacketDirection {
    Unknown,
    Inbound,
    Outbound,
}

impl Default for PacketDirection {
    fn default() -> Self {
        PacketDirection::Unknown
    }
}

impl From<u32> for PacketDirection {
    fn from(v: u32) -> Self {
        match v {
            1 => PacketDirection::Inbound,
            2 => PacketDirection::Outbound,
            _ => PacketDirection::Unknown,
        }
    }
}

impl From<PacketDirection> for u32 {
    fn from(d: PacketDirection) -> u32 {
        match d {
            PacketDirection::Unknown => 0,
            PacketDirection::Inbound => 1,
            PacketDirection::Outbound => 2,
        }
    }
}

/// Reception type of a packet, from the `epb_flags` option (bits 2-4)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReceptionType {
    Unknown,
    Unicast,
    Multicast,
    Broadcast,
    Promiscuous,
}

impl Default for ReceptionType {
    fn default() -> Self {
        ReceptionType::Unknown
    }
}

impl From<u32> for ReceptionType {
    fn from(v: u32) -> Self {
        match v {
            1 => ReceptionType::Unicast,
            2 => ReceptionType::Multicast,
            3 => ReceptionType::Broadcast,
            4 => ReceptionType::Promiscuous,
            _ => ReceptionType::Unknown,
        }
    }
}

impl From<ReceptionType> for u32 {
    fn from(r: ReceptionType) -> u32 {
        match r {
            ReceptionType::Unknown => 0,
            ReceptionType::Unicast => 1,
            ReceptionType::Multicast => 2,
            ReceptionType::Broadcast => 3,
            ReceptionType::Promiscuous => 4,
        }
    }
}

/// Link-layer errors, from the `epb_flags` option (bits 24-31)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkLayerError {
    Symbol,
    Preamble,
    StartFrameDelimiter,
    UnalignedFrame,
    WrongInterFrameGap,
    PacketTooShort,
    PacketTooLong,
    Crc,
}

impl LinkLayerError {
    /// All errors, in the order they are reported (bit 31 down to bit 24)
    pub const ALL: [LinkLayerError; 8] = [
        LinkLayerError::Symbol,
        LinkLayerError::Preamble,
        LinkLayerError::StartFrameDelimiter,
        LinkLayerError::UnalignedFrame,
        LinkLayerError::WrongInterFrameGap,
        LinkLayerError::PacketTooShort,
        LinkLayerError::PacketTooLong,
        LinkLayerError::Crc,
    ];

    /// Bit of this error in the `epb_flags` word
    pub fn mask(self) -> u32 {
        let bit = match self {
            LinkLayerError::Symbol => 31,
            LinkLayerError::Preamble => 30,
            LinkLayerError::StartFrameDelimiter => 29,
            LinkLayerError::UnalignedFrame => 28,
            LinkLayerError::WrongInterFrameGap => 27,
            LinkLayerError::PacketTooShort => 26,
            LinkLayerError::PacketTooLong => 25,
            LinkLayerError::Crc => 24,
        };
        1 << bit
    }
}

/// Hash algorithm of the `epb_hash` option
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HashAlgorithm {
    TwosComplement,
    Xor,
    Crc32,
    Md5,
    Sha1,
    Toeplitz,
    Unknown(u8),
}

impl From<u8> for HashAlgorithm {
    fn from(v: u8) -> Self {
        match v {
            0 => HashAlgorithm::TwosComplement,
            1 => HashAlgorithm::Xor,
            2 => HashAlgorithm::Crc32,
            3 => HashAlgorithm::Md5,
            4 => HashAlgorithm::Sha1,
            5 => HashAlgorithm::Toeplitz,
            n => HashAlgorithm::Unknown(n),
        }
    }
}

impl From<HashAlgorithm> for u8 {
    fn from(h: HashAlgorithm) -> u8 {
        match h {
            HashAlgorithm::TwosComplement => 0,
            HashAlgorithm::Xor => 1,
            HashAlgorithm::Crc32 => 2,
            HashAlgorithm::Md5 => 3,
            HashAlgorithm::Sha1 => 4,
            HashAlgorithm::Toeplitz => 5,
            HashAlgorithm::Unknown(n) => n,
        }
    }
}

/// Packet hash, with its algorithm
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PacketHash {
    pub algorithm: HashAlgorithm,
    /// Hash value, in the byte order of the algorithm (not of the section)
    pub value: Vec<u8>,
}

const FLAGS_DIRECTION_MASK: u32 = 0b11;
const FLAGS_RECEPTION_SHIFT: u32 = 2;
const FLAGS_RECEPTION_MASK: u32 = 0b111;
const FLAGS_FCS_SHIFT: u32 = 5;
const FLAGS_FCS_MASK: u32 = 0b1111;

/// Options of packet blocks (Enhanced Packet Block and Packet Block)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PacketOptions {
    pub comments: Vec<String>,
    pub direction: PacketDirection,
    pub reception_type: ReceptionType,
    /// Length of the Frame Check Sequence, in octets
    pub fcs_len: Option<u8>,
    pub link_layer_errors: Vec<LinkLayerError>,
    pub hash: Option<PacketHash>,
    /// Number of packets lost between this packet and the preceding one
    pub drop_count: Option<u64>,
    pub packet_id: Option<u64>,
    pub queue: Option<u32>,
    pub unknown: Vec<RawOption>,
}

impl PacketOptions {
    /// Return the first comment, if any
    pub fn comment(&self) -> Option<&str> {
        self.comments.first().map(String::as_str)
    }

    /// Store the fields of an `epb_flags` word
    pub fn set_flags(&mut self, flags: u32) {
        self.direction = PacketDirection::from(flags & FLAGS_DIRECTION_MASK);
        self.reception_type =
            ReceptionType::from((flags >> FLAGS_RECEPTION_SHIFT) & FLAGS_RECEPTION_MASK);
        let fcs_len = ((flags >> FLAGS_FCS_SHIFT) & FLAGS_FCS_MASK) as u8;
        self.fcs_len = if fcs_len == 0 { None } else { Some(fcs_len) };
        self.link_layer_errors = LinkLayerError::ALL
            .iter()
            .copied()
            .filter(|e| flags & e.mask() != 0)
            .collect();
    }

    /// Build the `epb_flags` word, or `None` if no flag is set
    pub fn flags(&self) -> Option<u32> {
        let mut flags = u32::from(self.direction)
            | (u32::from(self.reception_type) << FLAGS_RECEPTION_SHIFT)
            | (u32::from(self.fcs_len.unwrap_or(0)) & FLAGS_FCS_MASK) << FLAGS_FCS_SHIFT;
        for e in &self.link_layer_errors {
            flags |= e.mask();
        }
        if flags == 0 {
            None
        } else {
            Some(flags)
        }
    }
}

impl OptionSet for PacketOptions {
    fn set_option(&mut self, option: &PcapNGOption, endianness: Endianness) -> bool {
        match option.code {
            OptionCode::Comment => push_comment(&mut self.comments, option),
            OptionCode::EpbFlags => match option.as_u32(endianness) {
                Some(flags) => {
                    self.set_flags(flags);
                    true
                }
                None => false,
            },
            OptionCode::EpbHash => match option.value.split_first() {
                Some((algorithm, value)) => {
                    self.hash = Some(PacketHash {
                        algorithm: HashAlgorithm::from(*algorithm),
                        value: value.to_vec(),
                    });
                    true
                }
                None => false,
            },
            OptionCode::EpbDropcount => set_value(&mut self.drop_count, option.as_u64(endianness)),
            OptionCode::EpbPacketId => set_value(&mut self.packet_id, option.as_u64(endianness)),
            OptionCode::EpbQueue => set_value(&mut self.queue, option.as_u32(endianness)),
            _ => false,
        }
    }

    fn unknown_mut(&mut self) -> &mut Vec<RawOption> {
        &mut self.unknown
    }
}
