/// Copy the 4 bytes at `offset`
///
/// Callers must check the length of `i` first.
#[inline]
pub(crate) fn array4(i: &[u8], offset: usize) -> [u8; 4] {
    [i[offset], i[offset + 1], i[offset + 2], i[offset + 3]]
}

/// Number of zero bytes needed to align `len` to the next multiple of 4
#[inline]
pub(crate) fn padding_len(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding() {
        assert_eq!(padding_len(0), 0);
        assert_eq!(padding_len(1), 3);
        assert_eq!(padding_len(10), 2);
        assert_eq!(padding_len(12), 0);
    }
}
