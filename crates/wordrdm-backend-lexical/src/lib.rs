//! Lexical channels for WordRDM.
//!
//! Every channel here works from text and lookup tables alone:
//!
//! - [`ArticulatoryChannel`]: phonological edit distance over a [`PhoneticCorpus`]
//! - [`OrthographicChannel`]: open-bigram correlation distance
//! - [`PhonologicalChannel`]: grapheme-to-phoneme consistency vectors
//! - [`SemanticChannel`]: `1 - cosine` over an [`EmbeddingStore`]
//! - [`RatingChannel`]: concreteness, imageability, morphology, syntactic category
//! - [`WordLengthChannel`]: character-count difference
//!
//! Channels borrow their assets, so one loaded corpus or table can serve
//! several builds.

pub mod articulatory;
pub mod corpus;
pub mod embeddings;
pub mod g2p;
pub mod length;
pub mod orthographic;
pub mod ratings;

pub use articulatory::ArticulatoryChannel;
pub use corpus::{FeatureSystem, FeatureValue, PhoneticCorpus, Transcription};
pub use embeddings::{EmbeddingStore, SemanticChannel};
pub use g2p::{ConsistencyTable, PhonologicalChannel};
pub use length::WordLengthChannel;
pub use orthographic::{open_bigrams, OrthographicChannel};
pub use ratings::{RatingChannel, RatingTable};
