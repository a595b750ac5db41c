/// Corpus constants the receiver needs, exposed as overridable limits so
/// scaled-down test scenarios can run the same session code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverLimits {
    pub total_blocks: u32,
    pub samples_per_block: usize,
    pub block_header_len: usize,
    pub raw_payload_len: usize,
    pub ack_interval: u32,
    pub block_size_bound: usize,
}

impl Default for ReceiverLimits {
    fn default() -> Self {
        Self {
            total_blocks: uwlink_wire::T,
            samples_per_block: uwlink_wire::S,
            block_header_len: uwlink_wire::BLOCK_HEADER_LEN,
            raw_payload_len: uwlink_wire::R,
            ack_interval: uwlink_wire::ACK_INTERVAL,
            block_size_bound: uwlink_wire::BLOCK_SIZE_BOUND,
        }
    }
}
