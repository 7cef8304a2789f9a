//! WordRDM core library
//!
//! This crate provides the types shared by every WordRDM channel backend:
//! normalized word sets, ordered pair enumeration, distance matrices, the
//! pairwise and joint channel contracts, and the assembler that turns a
//! channel into a representational dissimilarity matrix (RDM).
//!
//! # Example
//!
//! ```
//! use wordrdm_spec::{build_pairwise, ChannelKind, PairwiseChannel, RdmResult, WordSet};
//!
//! struct Length;
//!
//! impl PairwiseChannel for Length {
//!     fn kind(&self) -> ChannelKind {
//!         ChannelKind::WordLength
//!     }
//!
//!     fn distance(&self, a: &str, b: &str) -> RdmResult<f64> {
//!         Ok((a.chars().count() as f64 - b.chars().count() as f64).abs())
//!     }
//! }
//!
//! let words = WordSet::new(["elephant", "cat", "dog"]).unwrap();
//! let rdm = build_pairwise(&words, &Length).unwrap();
//! assert_eq!(rdm.get_by_word("cat", "elephant"), Some(5.0));
//! assert_eq!(rdm.get_by_word("dog", "dog"), Some(0.0));
//! ```
//!
//! # Modules
//!
//! - [`words`]: word-set normalization and word-list files
//! - [`pairs`]: ordered pair enumeration
//! - [`matrix`]: distance matrices and their CSV form
//! - [`channel`]: channel identities and contracts
//! - [`correlation`]: correlation distance over dense and bit features
//! - [`assemble`]: matrix assembly
//! - [`config`]: study configuration
//! - [`table`]: delimited-text parsing
//! - [`error`]: error types

pub mod assemble;
pub mod channel;
pub mod config;
pub mod correlation;
pub mod error;
pub mod matrix;
pub mod pairs;
pub mod table;
pub mod words;

// Re-export commonly used types at the crate root
pub use assemble::{build_joint, build_pairwise, build_pairwise_with_progress, prepare_words};
pub use channel::{
    ChannelKind, ChannelShape, JointChannel, PairwiseChannel, IMAGEABILITY_EXCLUDED,
};
pub use config::{
    AcousticParams, AudioConfig, ConditionConfig, DtwNormalization, EmbeddingConfig, G2pConfig,
    PhoneticCorpusConfig, RatingTableConfig, SpeakerConfig, StudyConfig, VisualParams,
};
pub use correlation::{BitVector, CorrelationFeature, DenseFeatures};
pub use error::{ErrorCode, RdmError, RdmResult};
pub use matrix::DistanceMatrix;
pub use pairs::{Pairs, WordPair};
pub use table::DelimitedTable;
pub use words::WordSet;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    struct ByteSum;

    impl PairwiseChannel for ByteSum {
        fn kind(&self) -> ChannelKind {
            ChannelKind::WordLength
        }

        fn distance(&self, a: &str, b: &str) -> RdmResult<f64> {
            let sum = |w: &str| w.bytes().map(f64::from).sum::<f64>();
            Ok((sum(a) - sum(b)).abs())
        }
    }

    proptest! {
        #[test]
        fn prop_diagonal_zero_and_full(words in proptest::collection::vec("[a-z]{1,8}", 1..12)) {
            let set = WordSet::new(words.clone()).unwrap();
            let rdm = build_pairwise(&set, &ByteSum).unwrap();
            let n = words.len();
            prop_assert_eq!(rdm.size(), n);
            prop_assert_eq!(rdm.filled_cells(), n * n);
            for i in 0..n {
                prop_assert_eq!(rdm.get(i, i), Some(0.0));
            }
        }

        #[test]
        fn prop_pair_count(n in 1usize..30) {
            let set = WordSet::new((0..n).map(|i| format!("w{i}"))).unwrap();
            prop_assert_eq!(set.pairs().count(), n * (n - 1));
        }
    }
}
