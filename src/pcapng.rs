//! PCAPNG file format
//!
//! See <https://github.com/pcapng/pcapng> for details.
//!
//! There are two ways of decoding a PCAPNG capture. The first method is to use
//! [`decode_all`](../fn.decode_all.html). This method requires to load the entire
//! capture to memory, and thus may not be good for large files.
//!
//! The second (and prefered) method is to use a [`PcapNGReader`](../struct.PcapNGReader.html)
//! object, which pulls blocks one at a time from any input providing the `Read` trait.
//!
//! Both methods share the same block decoding logic, implemented by
//! [`PcapNGDecoder`](../struct.PcapNGDecoder.html).
//!
//! ## File format and parsing
//!
//! A capture file is organized in blocks. Blocks are organized in sections, each section
//! starting with a Section Header Block (SHB), and followed by blocks (interface description,
//! statistics, packets, etc.).
//! A file is usually composed of one section, but can contain multiple sections. When a SHB is
//! encountered, this means a new section starts (and all information about previous section has to
//! be flushed, like interfaces).
//!
//! Each block starts with its type and total length, and ends with a copy of the total length.
//! The block body ends with a list of options (type-length-value attributes), decoded into a
//! typed structure specific to each block kind. Unknown options are kept as raw bytes.
//!
//! ## Endianness
//!
//! The endianness of a block is indicated by the Section Header Block that started the section
//! containing this block. Since a file can contain several sections, a single file can contain
//! both endianness variants.

mod block;
mod decoder;
mod enhanced_packet;
mod interface_description;
mod interface_statistics;
mod name_resolution;
mod option;
mod packet;
mod packet_options;
mod reader;
mod section;
mod section_header;
mod simple_packet;
mod time;

pub use block::*;
pub use decoder::*;
pub use enhanced_packet::*;
pub use interface_description::*;
pub use interface_statistics::*;
pub use name_resolution::*;
pub use option::{OptionCode, PcapNGOption, RawOption};
pub(crate) use option::{decode_options, push_comment, set_str, set_value, OptionSet};
pub use packet::*;
pub use packet_options::*;
pub use reader::*;
pub use section::*;
pub use section_header::*;
pub use simple_packet::*;
pub use time::*;

/// Section Header Block magic
pub const SHB_MAGIC: u32 = 0x0A0D_0D0A;
/// Interface Description Block magic
pub const IDB_MAGIC: u32 = 0x0000_0001;
/// Packet Block magic (obsolete)
pub const PB_MAGIC: u32 = 0x0000_0002;
/// Simple Packet Block magic
pub const SPB_MAGIC: u32 = 0x0000_0003;
/// Name Resolution Block magic
pub const NRB_MAGIC: u32 = 0x0000_0004;
/// Interface Statistic Block magic
pub const ISB_MAGIC: u32 = 0x0000_0005;
/// Enhanced Packet Block magic
pub const EPB_MAGIC: u32 = 0x0000_0006;

/// Byte Order magic
pub const BOM_MAGIC: u32 = 0x1A2B_3C4D;

/// Block header length: block type and leading total length
pub const BLOCK_HEADER_LEN: usize = 8;
/// Minimum total length of a block: type, leading and trailing lengths
pub const MIN_BLOCK_LEN: usize = 12;
