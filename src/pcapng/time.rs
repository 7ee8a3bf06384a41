/// Resolution used when an interface has no `if_tsresol` option (microseconds)
pub const DEFAULT_TSRESOL: u8 = 6;

/// Compute the timestamp resolution, in units per second
///
/// Return the resolution, or `None` if the resolution is invalid (for ex. greater than `2^64`)
pub fn build_ts_resolution(ts_resol: u8) -> Option<u64> {
    let ts_mode = ts_resol & 0x80;
    let unit = if ts_mode == 0 {
        // 10^if_tsresol
        // check that if_tsresol <= 19 (10^19 is the largest power of 10 to fit in a u64)
        if ts_resol > 19 {
            return None;
        }
        10u64.pow(ts_resol as u32)
    } else {
        // 2^if_tsresol
        // check that if_tsresol <= 63
        let exp = ts_resol & 0x7f;
        if exp > 63 {
            return None;
        }
        1 << (exp as u64)
    };
    Some(unit)
}

/// Given the timestamp parameters, return the timestamp seconds and fractional part (in resolution
/// units)
pub fn build_ts(ts: u64, ts_offset: u64, resolution: u64) -> (u32, u32) {
    let ts_sec = (ts_offset + (ts / resolution)) as u32;
    let ts_fractional = (ts % resolution) as u32;
    (ts_sec, ts_fractional)
}

/// Given the timestamp parameters, return the timestamp as a `f64` value.
///
/// The resolution is given in units per second. In pcap-ng files, it is stored in the
/// Interface Description Block, and can be obtained using [`crate::InterfaceDescriptionBlock::ts_resolution`]
pub fn build_ts_f64(ts: u64, ts_offset: u64, resolution: u64) -> f64 {
    let (ts_sec, ts_fractional) = build_ts(ts, ts_offset, resolution);
    ts_sec as f64 + ((ts_fractional as f64) / (resolution as f64))
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn decode_ts() {
        // '97 c3 04 00 aa 47 ca 64', in Little Endian, decodes to 2012-06-29 07:28:25.298858 UTC.
        let ts_high = u32::from_le_bytes(hex!("97 c3 04 00"));
        let ts_low = u32::from_le_bytes(hex!("aa 47 ca 64"));
        let ts = (u64::from(ts_high) << 32) | u64::from(ts_low);
        let resolution = build_ts_resolution(DEFAULT_TSRESOL).unwrap();

        let (ts_sec, ts_usec) = build_ts(ts, 0, resolution);
        assert_eq!(ts_sec, 1340954905);
        assert_eq!(ts_usec, 298858);
    }

    #[test]
    fn resolution_power_of_two() {
        assert_eq!(build_ts_resolution(0x80 | 10), Some(1024));
        assert_eq!(build_ts_resolution(20), None);
        assert_eq!(build_ts_resolution(0xff), None);
    }
}
