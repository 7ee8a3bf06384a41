use log::trace;
use nom::combinator::map;
use nom::error::{ErrorKind, ParseError};
use nom::{Err, IResult};

use crate::endianness::PcapEndianness;
use crate::PcapError;

use super::*;

/// A block from a PcapNG file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    SectionHeader(SectionHeaderBlock),
    InterfaceDescription(InterfaceDescriptionBlock),
    EnhancedPacket(EnhancedPacketBlock),
    SimplePacket(SimplePacketBlock),
    NameResolution(NameResolutionBlock),
    InterfaceStatistics(InterfaceStatisticsBlock),
    Packet(PacketBlock),
}

impl Block {
    /// Returns true if blocks contains a network packet
    pub fn is_data_block(&self) -> bool {
        matches!(
            self,
            &Block::EnhancedPacket(_) | &Block::SimplePacket(_) | &Block::Packet(_)
        )
    }

    /// Return the normalized magic number of the block
    pub fn magic(&self) -> u32 {
        match self {
            Block::SectionHeader(_) => SHB_MAGIC,
            Block::InterfaceDescription(_) => IDB_MAGIC,
            Block::EnhancedPacket(_) => EPB_MAGIC,
            Block::SimplePacket(_) => SPB_MAGIC,
            Block::NameResolution(_) => NRB_MAGIC,
            Block::InterfaceStatistics(_) => ISB_MAGIC,
            Block::Packet(_) => PB_MAGIC,
        }
    }
}

/// Returns true if `block_type` is one of the block kinds this crate decodes
pub fn is_known_block_type(block_type: u32) -> bool {
    matches!(
        block_type,
        SHB_MAGIC | IDB_MAGIC | PB_MAGIC | SPB_MAGIC | NRB_MAGIC | ISB_MAGIC | EPB_MAGIC
    )
}

/// Decode the body of a block (the bytes between the leading and trailing length fields)
///
/// Returns `None` if the block type is not known.
pub(crate) fn parse_block_body<En: PcapEndianness>(
    block_type: u32,
    body: &[u8],
) -> Option<Result<Block, PcapError>> {
    let res = match block_type {
        SHB_MAGIC => map(
            ng_block_parser::<SectionHeaderBlock, En, _>(),
            Block::SectionHeader,
        )(body),
        IDB_MAGIC => map(
            ng_block_parser::<InterfaceDescriptionBlock, En, _>(),
            Block::InterfaceDescription,
        )(body),
        EPB_MAGIC => map(
            ng_block_parser::<EnhancedPacketBlock, En, _>(),
            Block::EnhancedPacket,
        )(body),
        SPB_MAGIC => map(
            ng_block_parser::<SimplePacketBlock, En, _>(),
            Block::SimplePacket,
        )(body),
        NRB_MAGIC => map(
            ng_block_parser::<NameResolutionBlock, En, _>(),
            Block::NameResolution,
        )(body),
        ISB_MAGIC => map(
            ng_block_parser::<InterfaceStatisticsBlock, En, _>(),
            Block::InterfaceStatistics,
        )(body),
        PB_MAGIC => map(ng_block_parser::<PacketBlock, En, _>(), Block::Packet)(body),
        _ => return None,
    };
    Some(match res {
        Ok((_, block)) => Ok(block),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => Err(e),
        Err(Err::Incomplete(_)) => Err(PcapError::NomError(ErrorKind::Eof)),
    })
}

pub(crate) trait PcapNGBlockParser<En: PcapEndianness>: Sized {
    /// Minimum body size, in bytes
    const BODY_MIN_SZ: usize;
    /// Block type
    const MAGIC: u32;

    // caller function must have tested body length
    fn inner_parse<'a, E: ParseError<&'a [u8]>>(i: &'a [u8]) -> IResult<&'a [u8], Self, E>;
}

/// Create a block body parser function, given the parameters (block object and endianness)
pub(crate) fn ng_block_parser<'a, P, En, E>() -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], P, E>
where
    P: PcapNGBlockParser<En>,
    En: PcapEndianness,
    E: ParseError<&'a [u8]>,
{
    move |i: &'a [u8]| {
        if i.len() < P::BODY_MIN_SZ {
            return Err(Err::Error(E::from_error_kind(i, ErrorKind::Verify)));
        }
        trace!("block body {:#010x}, {} bytes", P::MAGIC, i.len());
        P::inner_parse(i)
    }
}
