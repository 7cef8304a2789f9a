//! Acoustic matrices averaged over speakers and sessions.
//!
//! Each (speaker, session) with at least one recording yields its own matrix.
//! A missing recording leaves that word's cells empty in that session only.
//! The final matrix is the per-cell mean over the sessions that hold a value.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, info, warn};
use wordrdm_spec::{
    build_pairwise, prepare_words, AcousticParams, AudioConfig, ChannelKind, DistanceMatrix,
    PairwiseChannel, RdmError, RdmResult, WordSet,
};

use crate::distance::acoustic_distance;
use crate::error::{AudioError, AudioResult};
use crate::features::{stack_and_normalize, FeatureMatrix};
use crate::mfcc::MfccExtractor;
use crate::wav::read_wav;

/// Features of every available recording in one session.
pub struct SessionFeatures<'a> {
    params: &'a AcousticParams,
    features: HashMap<String, FeatureMatrix>,
}

impl SessionFeatures<'_> {
    /// Number of words with a recording.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no recording was found.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Whether a word has a recording in this session.
    pub fn contains(&self, word: &str) -> bool {
        self.features.contains_key(word)
    }
}

impl PairwiseChannel for SessionFeatures<'_> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Acoustic
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        match (self.features.get(first), self.features.get(second)) {
            (Some(a), Some(b)) => Ok(acoustic_distance(a, b, self.params)),
            _ => Ok(f64::NAN),
        }
    }
}

/// Acoustic channel over a recorded corpus.
#[derive(Debug, Clone, Copy)]
pub struct AcousticChannel<'a> {
    config: &'a AudioConfig,
}

impl<'a> AcousticChannel<'a> {
    /// Creates the channel.
    pub fn new(config: &'a AudioConfig) -> Self {
        Self { config }
    }

    /// Always [`ChannelKind::Acoustic`].
    pub fn kind(&self) -> ChannelKind {
        ChannelKind::Acoustic
    }

    /// Extracts features for every word recorded by `speaker` in `session`.
    /// Missing recordings are logged and skipped.
    pub fn session_features(
        &self,
        words: &WordSet,
        speaker: &str,
        session: u32,
    ) -> AudioResult<SessionFeatures<'a>> {
        let params = &self.config.params;
        let mut extractors: HashMap<u32, MfccExtractor> = HashMap::new();
        let mut features = HashMap::new();

        for word in words {
            if features.contains_key(word) {
                continue;
            }
            let path = self.config.recording_path(speaker, word, session);
            if !path.is_file() {
                warn!("{}: {}", speaker, RdmError::RecordingMissing { path });
                continue;
            }
            let recording = read_wav(&path)?;
            let extractor = match extractors.entry(recording.sample_rate) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    entry.insert(MfccExtractor::new(params, recording.sample_rate)?)
                }
            };
            let cepstra = extractor.compute(&recording.samples);
            debug!("{}: {} -> {} frames", speaker, path.display(), cepstra.rows());
            features.insert(
                word.clone(),
                stack_and_normalize(&cepstra, params.delta_width),
            );
        }

        Ok(SessionFeatures { params, features })
    }

    /// Matrix for one (speaker, session); `None` when it has no recordings.
    pub fn session_matrix(
        &self,
        words: &WordSet,
        speaker: &str,
        session: u32,
    ) -> AudioResult<Option<DistanceMatrix>> {
        let session_features = self.session_features(words, speaker, session)?;
        if session_features.is_empty() {
            warn!("{}: no recordings for session {}", speaker, session);
            return Ok(None);
        }
        info!(
            "{}: session {} has {}/{} recordings",
            speaker,
            session,
            session_features.len(),
            words.len()
        );
        Ok(Some(build_pairwise(words, &session_features)?))
    }

    /// Builds the averaged acoustic matrix.
    pub fn build(&self, words: &WordSet) -> AudioResult<DistanceMatrix> {
        self.build_with_progress(words, |_, _| {})
    }

    /// Like [`AcousticChannel::build`], reporting `(done, total)` sessions.
    pub fn build_with_progress<F>(
        &self,
        words: &WordSet,
        mut progress: F,
    ) -> AudioResult<DistanceMatrix>
    where
        F: FnMut(usize, usize),
    {
        if self.config.speakers.is_empty() {
            return Err(AudioError::invalid_param(
                "speakers",
                "at least one speaker is required",
            ));
        }
        let words = prepare_words(words, ChannelKind::Acoustic)?;
        let total: usize = self.config.speakers.iter().map(|s| s.sessions.len()).sum();

        let mut matrices = Vec::new();
        let mut done = 0;
        for speaker in &self.config.speakers {
            for &session in &speaker.sessions {
                if let Some(matrix) = self.session_matrix(&words, &speaker.name, session)? {
                    matrices.push(matrix);
                }
                done += 1;
                progress(done, total);
            }
        }

        if matrices.is_empty() {
            return Err(AudioError::NoRecordings {
                root: self.config.root.clone(),
            });
        }

        let mut mean = DistanceMatrix::mean_of(&matrices)?;
        mean.zero_diagonal();
        info!(
            "acoustic: averaged {} session matrices over {} words",
            matrices.len(),
            words.len()
        );
        Ok(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::Recording;
    use std::f64::consts::PI;
    use std::path::Path;
    use wordrdm_spec::SpeakerConfig;

    fn write_tone(root: &Path, speaker: &str, word: &str, session: u32, freq: f64) {
        let dir = root.join(speaker).join("auto_find_labels");
        std::fs::create_dir_all(&dir).unwrap();
        let samples = (0..4800)
            .map(|i| {
                let t = i as f64 / 16000.0;
                4000.0 * (2.0 * PI * freq * t).sin() + 1500.0 * (2.0 * PI * 3.0 * freq * t).sin()
            })
            .collect();
        Recording::new(samples, 16000)
            .write_pcm16(&dir.join(format!("{word}{session}.wav")))
            .unwrap();
    }

    fn config(root: &Path, speakers: &[(&str, &[u32])]) -> AudioConfig {
        AudioConfig {
            root: root.to_path_buf(),
            subdir: "auto_find_labels".to_string(),
            speakers: speakers
                .iter()
                .map(|(name, sessions)| SpeakerConfig {
                    name: name.to_string(),
                    sessions: sessions.to_vec(),
                })
                .collect(),
            params: AcousticParams::default(),
        }
    }

    #[test]
    fn test_missing_recording_leaves_cells_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_tone(dir.path(), "vol1", "cat", 1, 220.0);
        write_tone(dir.path(), "vol1", "dog", 1, 440.0);

        let config = config(dir.path(), &[("vol1", &[1])]);
        let words = WordSet::new(["cat", "dog", "owl"]).unwrap();
        let rdm = AcousticChannel::new(&config).build(&words).unwrap();

        assert!(rdm.get_by_word("cat", "dog").is_some());
        assert_eq!(rdm.get_by_word("cat", "owl"), None);
        assert_eq!(rdm.get_by_word("owl", "dog"), None);
        assert_eq!(rdm.get_by_word("owl", "owl"), Some(0.0));
    }

    #[test]
    fn test_session_without_recordings_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_tone(dir.path(), "vol1", "cat", 1, 220.0);
        write_tone(dir.path(), "vol1", "dog", 1, 440.0);

        let words = WordSet::new(["cat", "dog"]).unwrap();
        let one = config(dir.path(), &[("vol1", &[1])]);
        let with_empty = config(dir.path(), &[("vol1", &[1, 2]), ("vol9", &[1])]);

        let mut reports = Vec::new();
        let a = AcousticChannel::new(&one).build(&words).unwrap();
        let b = AcousticChannel::new(&with_empty)
            .build_with_progress(&words, |done, total| reports.push((done, total)))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(reports, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_mean_over_available_sessions() {
        let dir = tempfile::tempdir().unwrap();
        write_tone(dir.path(), "vol1", "cat", 1, 220.0);
        write_tone(dir.path(), "vol1", "dog", 1, 440.0);
        write_tone(dir.path(), "vol2", "cat", 1, 330.0);
        write_tone(dir.path(), "vol2", "dog", 1, 990.0);
        write_tone(dir.path(), "vol2", "cat", 2, 250.0);

        let words = WordSet::new(["cat", "dog"]).unwrap();
        let channel_config = config(dir.path(), &[("vol1", &[1]), ("vol2", &[1, 2])]);
        let channel = AcousticChannel::new(&channel_config);

        let v1 = channel.session_matrix(&words, "vol1", 1).unwrap().unwrap();
        let v2 = channel.session_matrix(&words, "vol2", 1).unwrap().unwrap();
        let partial = channel.session_matrix(&words, "vol2", 2).unwrap().unwrap();
        assert_eq!(partial.get_by_word("cat", "dog"), None);

        let rdm = channel.build(&words).unwrap();
        let expected = (v1.get_by_word("cat", "dog").unwrap()
            + v2.get_by_word("cat", "dog").unwrap())
            / 2.0;
        assert!((rdm.get_by_word("cat", "dog").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_recordings_at_all() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &[("vol1", &[1, 2])]);
        let words = WordSet::new(["cat", "dog"]).unwrap();
        let err = AcousticChannel::new(&config).build(&words).unwrap_err();
        assert!(matches!(err, AudioError::NoRecordings { .. }));
    }

    #[test]
    fn test_requires_speakers() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &[]);
        let words = WordSet::new(["cat"]).unwrap();
        assert!(AcousticChannel::new(&config).build(&words).is_err());
    }
}
