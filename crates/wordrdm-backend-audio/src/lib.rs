//! Acoustic channel for WordRDM.
//!
//! Recordings are read with `hound`, turned into 12 MFCCs (first replaced by
//! log energy) plus deltas and delta-deltas, normalized per recording, and
//! aligned with dynamic time warping. One matrix is built per speaker and
//! session; [`AcousticChannel::build`] averages them cell by cell.
//!
//! ```no_run
//! use std::path::Path;
//! use wordrdm_backend_audio::file_distance;
//! use wordrdm_spec::AcousticParams;
//!
//! let d = file_distance(
//!     Path::new("vol1/auto_find_labels/cat1.wav"),
//!     Path::new("vol1/auto_find_labels/dog1.wav"),
//!     &AcousticParams::default(),
//! )?;
//! println!("cat/dog: {d:.3}");
//! # Ok::<(), wordrdm_backend_audio::AudioError>(())
//! ```

pub mod aggregate;
pub mod distance;
pub mod dtw;
pub mod error;
pub mod features;
pub mod mfcc;
pub mod wav;

pub use aggregate::{AcousticChannel, SessionFeatures};
pub use distance::{acoustic_distance, file_distance};
pub use dtw::dtw_distance;
pub use error::{AudioError, AudioResult};
pub use features::{acoustic_features, stack_and_normalize, FeatureMatrix};
pub use mfcc::MfccExtractor;
pub use wav::{read_wav, Recording};
