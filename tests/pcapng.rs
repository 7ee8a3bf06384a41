use hex_literal::hex;
use pcapng_decode::traits::PcapNGPacketBlock;
use pcapng_decode::*;

const SHB_BE: &[u8] = &hex!(
    "0a 0d 0d 0a 00 00 00 1c 1a 2b 3c 4d 00 01 00 00
     ff ff ff ff ff ff ff ff 00 00 00 1c"
);
const IDB_BE: &[u8] = &hex!("00 00 00 01 00 00 00 14 00 01 00 00 00 04 00 00 00 00 00 14");
const EPB_BE: &[u8] = &hex!(
    "00 00 00 06 00 00 00 38 00 00 00 00 00 00 00 01
     00 00 00 02 00 00 00 04 00 00 00 04 de ad be ef
     00 01 00 0a 68 65 6c 6c 6f 20 70 63 61 70 00 00
     00 00 00 00 00 00 00 38"
);

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

fn concat(parts: &[&[u8]]) -> Vec<u8> {
    parts.iter().flat_map(|p| p.iter().copied()).collect()
}

fn two_sections() -> Vec<u8> {
    concat(&[SHB_BE, IDB_BE, EPB_BE, SHB_LE, IDB_LE, EPB_LE])
}

#[test]
fn test_pcapng_two_sections_mixed_endianness() {
    let data = two_sections();
    let blocks = decode_all(&data).expect("could not decode capture");
    assert_eq!(blocks.len(), 6);
    let mut shb_count = 0;
    let mut idb_count = 0;
    let mut comments = Vec::new();
    for block in &blocks {
        match block {
            Block::SectionHeader(_) => shb_count += 1,
            Block::InterfaceDescription(idb) => {
                idb_count += 1;
                assert_eq!(idb.linktype, Linktype::ETHERNET);
                assert_eq!(idb.snaplen, 0x40000);
            }
            Block::EnhancedPacket(epb) => {
                assert_eq!(epb.timestamp, (1 << 32) | 2);
                assert_eq!(epb.packet_data(), &hex!("de ad be ef"));
                assert!(!epb.truncated());
                comments.push(epb.options.comment().map(str::to_owned));
            }
            b => panic!("unexpected block {:?}", b),
        }
    }
    assert_eq!(shb_count, 2);
    assert_eq!(idb_count, 2);
    assert_eq!(
        comments,
        vec![Some("hello pcap".to_owned()), Some("hello pcap".to_owned())]
    );
    match (&blocks[0], &blocks[3]) {
        (Block::SectionHeader(be), Block::SectionHeader(le)) => {
            assert_eq!(be.endianness, Endianness::Big);
            assert!(be.big_endian());
            assert_eq!(le.endianness, Endianness::Little);
            assert_eq!(be.section_len, -1);
            assert_eq!((le.major_version, le.minor_version), (1, 0));
        }
        _ => panic!("sections should start with a section header"),
    }
    // both sections decode to the same records
    assert_eq!(blocks[1], blocks[4]);
    assert_eq!(blocks[2], blocks[5]);
}

#[test]
fn test_pcapng_sections() {
    let data = two_sections();
    let sections = decode_sections(&data).expect("could not decode sections");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].endianness, Endianness::Big);
    assert_eq!(sections[1].endianness, Endianness::Little);
    for section in &sections {
        assert!(section.header().is_some());
        assert_eq!(section.iter_interfaces().count(), 1);
        assert_eq!(section.blocks.len(), 3);
        let packet = section
            .iter()
            .find_map(|b| match b {
                Block::EnhancedPacket(epb) => Some(epb),
                _ => None,
            })
            .expect("no packet in section");
        let idb = section
            .interface(packet.interface_id())
            .expect("unknown interface");
        assert_eq!(idb.ts_resolution(), Some(1_000_000));
        assert_eq!(packet.decode_ts(0, 1_000_000), (4294, 967_298));
        assert!(section.interface(1).is_none());
    }
}

#[test]
fn test_pcapng_byte_order_magic() {
    let blocks = decode_all(SHB_BE).expect("could not decode BE header");
    assert!(matches!(&blocks[0], Block::SectionHeader(shb) if shb.endianness == Endianness::Big));
    let blocks = decode_all(SHB_LE).expect("could not decode LE header");
    assert!(
        matches!(&blocks[0], Block::SectionHeader(shb) if shb.endianness == Endianness::Little)
    );

    let mut bad = SHB_LE.to_vec();
    bad[8..12].copy_from_slice(&hex!("1a 2b 4d 3c"));
    assert_eq!(decode_all(&bad), Err(PcapError::HeaderNotRecognized));
}

#[test]
fn test_pcapng_length_mismatch() {
    let mut data = SHB_LE.to_vec();
    data[24..28].copy_from_slice(&hex!("20 00 00 00"));
    assert_eq!(
        decode_all(&data),
        Err(PcapError::BlockLengthMismatch {
            leading: 28,
            trailing: 32
        })
    );
}

#[test]
fn test_pcapng_truncated_block() {
    let data = two_sections();
    let res = decode_all(&data[..data.len() - 2]);
    assert_eq!(res, Err(PcapError::UnexpectedEof));
}

#[test]
fn test_pcapng_end_of_options() {
    // comment "a", end-of-options, then comment "b" which must be ignored
    let data = hex!(
        "0a 0d 0d 0a 30 00 00 00 4d 3c 2b 1a 01 00 00 00
         ff ff ff ff ff ff ff ff 01 00 01 00 61 00 00 00
         00 00 00 00 01 00 01 00 62 00 00 00 30 00 00 00"
    );
    let blocks = decode_all(&data).expect("could not decode");
    match &blocks[0] {
        Block::SectionHeader(shb) => {
            assert_eq!(shb.options.comments, vec!["a".to_owned()]);
            assert!(shb.options.unknown.is_empty());
        }
        b => panic!("unexpected block {:?}", b),
    }
}

#[test]
fn test_pcapng_empty_options() {
    let data = concat(&[SHB_LE, IDB_LE]);
    let blocks = decode_all(&data).expect("could not decode");
    match (&blocks[0], &blocks[1]) {
        (Block::SectionHeader(shb), Block::InterfaceDescription(idb)) => {
            assert_eq!(shb.options, SectionHeaderOptions::default());
            assert_eq!(idb.options, InterfaceDescriptionOptions::default());
            assert_eq!(idb.ts_offset(), 0);
        }
        _ => panic!("unexpected blocks"),
    }
}

#[test]
fn test_pcapng_caplen_larger_than_origlen() {
    let epb = hex!(
        "06 00 00 00 24 00 00 00 00 00 00 00 00 00 00 00
         00 00 00 00 04 00 00 00 02 00 00 00 01 02 03 04
         24 00 00 00"
    );
    let data = concat(&[SHB_LE, IDB_LE, &epb]);
    let blocks = decode_all(&data).expect("could not decode");
    match &blocks[2] {
        Block::EnhancedPacket(epb) => {
            assert_eq!(epb.caplen, 4);
            assert_eq!(epb.origlen, 2);
            assert_eq!(epb.data, vec![1, 2, 3, 4]);
            assert_eq!(epb.options, PacketOptions::default());
        }
        b => panic!("unexpected block {:?}", b),
    }
}

#[test]
fn test_pcapng_skip_unknown_and_malformed() {
    let unknown = hex!("ad 0b 00 00 10 00 00 00 01 02 03 04 10 00 00 00");
    // interface description without body
    let short_idb = hex!("01 00 00 00 0c 00 00 00 0c 00 00 00");
    let data = concat(&[SHB_LE, &unknown, &short_idb, IDB_LE, EPB_LE]);
    let mut decoder = PcapNGDecoder::new();
    let blocks = decoder.decode_all(&data).expect("could not decode");
    assert_eq!(blocks.len(), 3);
    assert_eq!(decoder.skipped_blocks(), 2);
    assert_eq!(decoder.endianness(), Some(Endianness::Little));
    assert!(blocks[2].is_data_block());
    assert_eq!(blocks[2].magic(), EPB_MAGIC);
    assert!(!is_known_block_type(0xbad));
    assert!(is_known_block_type(PB_MAGIC));
}

#[test]
fn test_pcapng_no_section_header() {
    // blocks before any section header are read as big-endian
    let data = concat(&[IDB_BE, SHB_LE, IDB_LE]);
    let mut decoder = PcapNGDecoder::new();
    let mut source = SliceSource::new(&data);
    let first = decoder
        .decode_block(&mut source)
        .expect("could not decode first block");
    assert!(matches!(first, Some(Block::InterfaceDescription(_))));
    assert_eq!(decoder.endianness(), None);
    assert_eq!(source.offset(), IDB_BE.len());

    let sections = decode_sections(&data).expect("could not decode sections");
    assert_eq!(sections.len(), 2);
    assert!(sections[0].header().is_none());
    assert_eq!(sections[0].endianness, Endianness::Big);
    assert_eq!(sections[1].endianness, Endianness::Little);
}

#[test]
fn test_pcapng_short_buffer() {
    assert_eq!(decode_all(&[]), Err(PcapError::UnexpectedEof));
    assert_eq!(decode_all(&SHB_LE[..8]), Err(PcapError::UnexpectedEof));
}
