//! Visual joint channel.

use log::debug;
use wordrdm_spec::{BitVector, ChannelKind, JointChannel, RdmResult, VisualParams, WordSet};

use crate::canvas::word_mask;

/// Renders each word and compares ink masks by correlation distance.
///
/// Masks live on a fixed canvas, so a word's vector does not depend on the
/// rest of the list.
#[derive(Debug, Clone, Default)]
pub struct VisualChannel {
    params: VisualParams,
}

impl VisualChannel {
    /// Creates a channel for the given canvas.
    pub fn new(params: VisualParams) -> Self {
        Self { params }
    }

    /// Canvas parameters.
    pub fn params(&self) -> &VisualParams {
        &self.params
    }
}

impl JointChannel for VisualChannel {
    type Feature = BitVector;

    fn kind(&self) -> ChannelKind {
        ChannelKind::Visual
    }

    fn features(&self, words: &WordSet) -> RdmResult<Vec<BitVector>> {
        words
            .iter()
            .map(|word| {
                let mask = word_mask(word, &self.params)?;
                debug!("visual: '{}' has {} ink pixels", word, mask.count_ones());
                Ok(mask)
            })
            .collect()
    }
}
