//! Word-length channel.

use wordrdm_spec::{ChannelKind, PairwiseChannel, RdmResult};

/// Absolute difference in character count. Needs no assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordLengthChannel;

impl PairwiseChannel for WordLengthChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::WordLength
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        let a = first.chars().count() as f64;
        let b = second.chars().count() as f64;
        Ok((a - b).abs())
    }
}
