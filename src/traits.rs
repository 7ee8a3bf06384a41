/// Common methods for PcapNG blocks containing a network packet
pub trait PcapNGPacketBlock {
    /// Index of the interface the packet was captured on
    fn interface_id(&self) -> u32;
    /// Returns true if the packet was truncated (captured length differs from original length)
    fn truncated(&self) -> bool;
    /// The length of the packet as it appeared on the network
    fn orig_len(&self) -> u32;
    /// Captured packet data (without padding)
    fn packet_data(&self) -> &[u8];
}
