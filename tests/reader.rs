use std::io::{self, Read};

use hex_literal::hex;
use pcapng_decode::*;

const SHB_LE: &[u8] = &hex!(
    "0a 0d 0d 0a 1c 00 00 00 4d 3c 2b 1a 01 00 00 00
     ff ff ff ff ff ff ff ff 1c 00 00 00"
);
const IDB_LE: &[u8] = &hex!("01 00 00 00 14 00 00 00 01 00 00 00 00 00 04 00 14 00 00 00");
const EPB_LE: &[u8] = &hex!(
    "06 00 00 00 38 00 00 00 00 00 00 00 01 00 00 00
     02 00 00 00 04 00 00 00 04 00 00 00 de ad be ef
     01 00 0a 00 68 65 6c 6c 6f 20 70 63 61 70 00 00
     00 00 00 00 38 00 00 00"
);
const SHB_BE: &[u8] = &hex!(
    "0a 0d 0d 0a 00 00 00 1c 1a 2b 3c 4d 00 01 00 00
     ff ff ff ff ff ff ff ff 00 00 00 1c"
);

fn capture() -> Vec<u8> {
    [SHB_LE, IDB_LE, EPB_LE, SHB_BE]
        .iter()
        .flat_map(|p| p.iter().copied())
        .collect()
}

/// Reader returning at most 5 bytes per call
struct SlowReader<'a>(&'a [u8]);

impl<'a> Read for SlowReader<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let sz = buf.len().min(5).min(self.0.len());
        buf[..sz].copy_from_slice(&self.0[..sz]);
        self.0 = &self.0[sz..];
        Ok(sz)
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "device unplugged"))
    }
}

#[test]
fn test_reader_small_buffer() {
    let data = capture();
    // smaller than every block: the buffer has to grow
    let mut reader = PcapNGReader::new(16, &data[..]);
    let mut kinds = Vec::new();
    loop {
        match reader.decode_next() {
            Ok(Some(block)) => kinds.push(block.magic()),
            Ok(None) => break,
            Err(e) => panic!("error while reading: {}", e),
        }
    }
    assert_eq!(kinds, vec![SHB_MAGIC, IDB_MAGIC, EPB_MAGIC, SHB_MAGIC]);
    assert_eq!(reader.consumed(), data.len());
    assert_eq!(reader.endianness(), Some(Endianness::Big));
    assert_eq!(reader.skipped_blocks(), 0);
    // end of stream is sticky
    assert_eq!(reader.decode_next(), Ok(None));
}

#[test]
fn test_reader_short_reads() {
    let data = capture();
    let reader = PcapNGReader::new(65536, SlowReader(&data));
    let blocks: Result<Vec<_>, _> = reader.collect();
    let blocks = blocks.expect("could not read capture");
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks, decode_all(&data).expect("could not decode capture"));
}

#[test]
fn test_reader_empty_input() {
    let empty: &[u8] = &[];
    let mut reader = PcapNGReader::new(1024, empty);
    assert_eq!(reader.decode_next(), Ok(None));
    assert_eq!(reader.endianness(), None);
}

#[test]
fn test_reader_truncated_input() {
    let data = capture();
    let mut reader = PcapNGReader::new(1024, &data[..data.len() - 3]);
    let mut count = 0;
    let mut last_error = None;
    for block in reader.by_ref() {
        match block {
            Ok(_) => count += 1,
            Err(e) => last_error = Some(e),
        }
    }
    assert_eq!(count, 3);
    assert_eq!(last_error, Some(PcapError::UnexpectedEof));
    // iteration stops after an error
    assert!(reader.next().is_none());
}

#[test]
fn test_reader_max_block_len() {
    let data = capture();
    let mut reader = PcapNGReader::new(16, &data[..]).with_max_block_len(32);
    assert!(matches!(reader.decode_next(), Ok(Some(Block::SectionHeader(_)))));
    assert!(matches!(reader.decode_next(), Ok(Some(Block::InterfaceDescription(_)))));
    assert_eq!(reader.decode_next(), Err(PcapError::BlockTooLarge(56)));
}

#[test]
fn test_reader_read_error() {
    let mut reader = PcapNGReader::new(1024, FailingReader);
    assert_eq!(reader.decode_next(), Err(PcapError::ReadError));
}
