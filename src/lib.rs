//! # PCAPNG block decoder
//!
//! This crate decodes capture files in the PCAPNG format: it splits the input into blocks,
//! determines the byte order of each section, decodes the body of each known block kind and
//! interprets the options attached to it.
//!
//! A capture can contain several sections, each with its own byte order. The byte order is
//! announced by the Section Header Block starting the section, and is tracked by the decoder
//! (see [PcapNGDecoder](struct.PcapNGDecoder.html)). Blocks of unknown type are skipped, so
//! capture files written by newer tools can still be read.
//!
//! Decoded records own their data: they can be kept after the input buffer is released.
//!
//! # Example: in-memory decoding
//!
//! ```rust
//! use pcapng_decode::*;
//!
//! # let data: &[u8] = &[
//! #     0x0a, 0x0d, 0x0d, 0x0a, 0, 0, 0, 0x1c, 0x1a, 0x2b, 0x3c, 0x4d, 0, 1, 0, 0,
//! #     0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0x1c,
//! # ];
//! let blocks = decode_all(data).expect("could not decode capture");
//! for block in &blocks {
//!     match block {
//!         Block::SectionHeader(shb) => println!("section, {:?} endian", shb.endianness),
//!         Block::EnhancedPacket(epb) => println!("packet, {} bytes", epb.data.len()),
//!         _ => (),
//!     }
//! }
//! # assert_eq!(blocks.len(), 1);
//! ```
//!
//! # Example: streaming decoding
//!
//! For large files, use the [PcapNGReader](struct.PcapNGReader.html) streaming decoder, which
//! reads one block at a time from any input providing the `Read` trait:
//!
//! ```rust,no_run
//! use pcapng_decode::*;
//! use std::fs::File;
//!
//! let file = File::open("capture.pcapng").unwrap();
//! let mut num_blocks = 0;
//! for block in PcapNGReader::new(65536, file) {
//!     match block {
//!         Ok(_) => num_blocks += 1,
//!         Err(e) => panic!("error while reading: {}", e),
//!     }
//! }
//! println!("num_blocks: {}", num_blocks);
//! ```

mod utils;

mod endianness;
mod error;
mod linktype;
pub use endianness::{swap_bytes, Endianness, BOM_BYTES_BE};
pub use error::*;
pub use linktype::*;

pub mod pcapng;
pub use pcapng::*;

pub mod traits;

#[cfg(feature = "serialize")]
mod serialize;
#[cfg(feature = "serialize")]
pub use serialize::*;
