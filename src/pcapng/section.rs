use crate::endianness::Endianness;
use crate::PcapError;

use super::*;

/// A Section (including all blocks) from a PcapNG file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// The list of blocks, starting with the section header
    pub blocks: Vec<Block>,
    /// Byte order of the section
    pub endianness: Endianness,
}

impl Section {
    /// Returns the section header
    pub fn header(&self) -> Option<&SectionHeaderBlock> {
        if let Some(Block::SectionHeader(ref b)) = self.blocks.first() {
            Some(b)
        } else {
            None
        }
    }

    /// Returns an iterator over the section blocks
    pub fn iter(&self) -> std::slice::Iter<Block> {
        self.blocks.iter()
    }

    /// Returns an iterator over the interface description blocks
    pub fn iter_interfaces(&self) -> impl Iterator<Item = &InterfaceDescriptionBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::InterfaceDescription(idb) => Some(idb),
            _ => None,
        })
    }

    /// Returns the interface with index `if_id`, as used by packet blocks
    pub fn interface(&self, if_id: u32) -> Option<&InterfaceDescriptionBlock> {
        self.iter_interfaces().nth(if_id as usize)
    }
}

/// Decode an in-memory capture, and group blocks by section
///
/// Blocks found before the first Section Header Block are put in a section of their own,
/// read as big-endian.
pub fn decode_sections(data: &[u8]) -> Result<Vec<Section>, PcapError> {
    let blocks = decode_all(data)?;
    let mut sections: Vec<Section> = Vec::new();
    for block in blocks {
        if let Block::SectionHeader(ref shb) = block {
            sections.push(Section {
                blocks: Vec::new(),
                endianness: shb.endianness,
            });
        } else if sections.is_empty() {
            sections.push(Section {
                blocks: Vec::new(),
                endianness: Endianness::Big,
            });
        }
        if let Some(section) = sections.last_mut() {
            section.blocks.push(block);
        }
    }
    Ok(sections)
}
