//! Study configuration.
//!
//! A study file is a JSON document naming the assets each channel needs, the
//! word-list conditions to build, and where to write the matrices. Every
//! section is optional; a channel whose section is absent is rejected by
//! [`StudyConfig::validate_channels`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::channel::ChannelKind;
use crate::error::{RdmError, RdmResult};

/// Top-level study configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyConfig {
    /// Base directory for relative asset paths (default: the study file's directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<PathBuf>,

    /// Phonetic corpus for the articulatory channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic_corpus: Option<PhoneticCorpusConfig>,

    /// Word embeddings for the semantic channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<EmbeddingConfig>,

    /// Concreteness norms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concreteness: Option<RatingTableConfig>,

    /// Imageability norms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageability: Option<RatingTableConfig>,

    /// Morpheme counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morphology: Option<RatingTableConfig>,

    /// Noun-only (0) / noun-and-verb (1) assignments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntactic_category: Option<RatingTableConfig>,

    /// Grapheme-to-phoneme consistency norms for the phonological channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g2p_consistency: Option<G2pConfig>,

    /// Audio recordings for the acoustic channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioConfig>,

    /// Canvas used by the visual channel.
    #[serde(default)]
    pub visual: VisualParams,

    /// Named word-list conditions built by `batch`.
    #[serde(default)]
    pub conditions: Vec<ConditionConfig>,

    /// Channels built by `batch`.
    #[serde(default)]
    pub channels: Vec<ChannelKind>,

    /// Output directory for `batch`.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("rdms")
}

/// Phonetic corpus location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneticCorpusConfig {
    /// Tab-separated `word<TAB>transcription` file.
    pub path: PathBuf,
    /// Optional segment feature table (symbol column plus +/-/0 features).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<PathBuf>,
}

/// Embedding store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// word2vec/GloVe text file.
    pub path: PathBuf,
}

/// A word → rating table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatingTableConfig {
    /// Delimited text file.
    pub path: PathBuf,
    /// Word column (default depends on the channel).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_column: Option<String>,
    /// Rating column (default depends on the channel).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_column: Option<String>,
    /// Field delimiter (default `,`).
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl RatingTableConfig {
    /// Creates a config with channel-default columns.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            word_column: None,
            rating_column: None,
            delimiter: default_delimiter(),
        }
    }

    /// Word and rating column names, falling back to the norms' usual headers.
    pub fn columns_for(&self, kind: ChannelKind) -> (String, String) {
        let (word, rating) = match kind {
            ChannelKind::Concreteness => ("Word", "Conc.M"),
            ChannelKind::Imageability => ("Words", "IMAG"),
            ChannelKind::Morphology => ("WORD", "N_MORPHEMES"),
            _ => ("WORD", "RATING"),
        };
        (
            self.word_column.clone().unwrap_or_else(|| word.to_string()),
            self.rating_column
                .clone()
                .unwrap_or_else(|| rating.to_string()),
        )
    }
}

fn default_delimiter() -> char {
    ','
}

/// Grapheme-to-phoneme consistency table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct G2pConfig {
    /// Delimited text file.
    pub path: PathBuf,
    /// Word column.
    #[serde(default = "default_g2p_word_column")]
    pub word_column: String,
    /// Columns forming the consistency vector.
    #[serde(default = "default_g2p_columns")]
    pub columns: Vec<String>,
    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl G2pConfig {
    /// Creates a config with the default `WORD`, `O`, `N`, `C` columns.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            word_column: default_g2p_word_column(),
            columns: default_g2p_columns(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_g2p_word_column() -> String {
    "WORD".to_string()
}

fn default_g2p_columns() -> Vec<String> {
    vec!["O".to_string(), "N".to_string(), "C".to_string()]
}

/// One speaker and the recording sessions to look for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeakerConfig {
    /// Directory name under the audio root.
    pub name: String,
    /// Session numbers, appended to each word in file names.
    #[serde(default = "default_sessions")]
    pub sessions: Vec<u32>,
}

fn default_sessions() -> Vec<u32> {
    vec![1, 2]
}

/// Audio corpus layout and acoustic parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioConfig {
    /// Root directory holding one directory per speaker.
    pub root: PathBuf,
    /// Sub-directory inside each speaker directory.
    #[serde(default = "default_audio_subdir")]
    pub subdir: String,
    /// Speakers to average over.
    pub speakers: Vec<SpeakerConfig>,
    /// Feature extraction and alignment parameters.
    #[serde(default)]
    pub params: AcousticParams,
}

fn default_audio_subdir() -> String {
    "auto_find_labels".to_string()
}

impl AudioConfig {
    /// Path of one recording: `{root}/{speaker}/{subdir}/{word}{session}.wav`.
    pub fn recording_path(&self, speaker: &str, word: &str, session: u32) -> PathBuf {
        let mut path = self.root.join(speaker);
        if !self.subdir.is_empty() {
            path = path.join(&self.subdir);
        }
        path.join(format!("{}{}.wav", word, session))
    }
}

/// How the DTW cost is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DtwNormalization {
    /// Divide by the sum of both sequences' feature dimensions.
    #[default]
    FeatureWidth,
    /// Divide by the sum of both sequences' frame counts.
    FrameCount,
}

/// MFCC, delta, CMVN and DTW parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcousticParams {
    /// Analysis window length in seconds.
    pub window_seconds: f64,
    /// Step between windows in seconds.
    pub step_seconds: f64,
    /// Pre-emphasis coefficient.
    pub preemphasis: f64,
    /// Number of cepstral coefficients kept.
    pub num_cepstra: usize,
    /// Number of mel filters.
    pub num_filters: usize,
    /// FFT size.
    pub fft_size: usize,
    /// Cepstral lifter coefficient (0 disables liftering).
    pub cepstral_lifter: f64,
    /// Replace the first coefficient with log frame energy.
    pub append_energy: bool,
    /// Half-width of the delta regression window.
    pub delta_width: usize,
    /// Slanted-band width in frames.
    pub dtw_window: usize,
    /// Normalization of the DTW cost.
    pub normalization: DtwNormalization,
}

impl Default for AcousticParams {
    fn default() -> Self {
        Self {
            window_seconds: 0.025,
            step_seconds: 0.01,
            preemphasis: 0.97,
            num_cepstra: 12,
            num_filters: 26,
            fft_size: 2048,
            cepstral_lifter: 22.0,
            append_energy: true,
            delta_width: 2,
            dtw_window: 200,
            normalization: DtwNormalization::FeatureWidth,
        }
    }
}

/// Canvas used to render words for the visual channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualParams {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background gray level.
    pub background: u8,
    /// Ink gray level.
    pub ink: u8,
    /// Letter height as a fraction of canvas height.
    pub letter_height: f64,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: 128,
            ink: 255,
            letter_height: 0.1,
        }
    }
}

/// A named word-list condition (e.g. aloud + silent words of one list).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionConfig {
    /// Condition name, used in output file names.
    pub name: String,
    /// Word-list files concatenated into the condition's word set.
    pub word_lists: Vec<PathBuf>,
}

impl StudyConfig {
    /// Parses a study from JSON without resolving paths.
    pub fn from_json(json: &str) -> RdmResult<Self> {
        serde_json::from_str(json).map_err(|e| RdmError::Parse {
            line: e.line(),
            message: e.to_string(),
        })
    }

    /// Loads a study file and resolves relative paths.
    ///
    /// Asset paths resolve against `assets_dir` (itself relative to the study
    /// file); word lists and `out_dir` resolve against the study file's directory.
    pub fn load(path: &Path) -> RdmResult<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| RdmError::asset_load(path, e.to_string()))?;
        let mut config = Self::from_json(&text)
            .map_err(|e| RdmError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        let base = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        config.resolve_paths(&base);
        Ok(config)
    }

    /// Resolves every relative path against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let assets = match &self.assets_dir {
            Some(dir) => resolve(base, dir),
            None => base.to_path_buf(),
        };
        self.assets_dir = Some(assets.clone());

        if let Some(corpus) = &mut self.phonetic_corpus {
            corpus.path = resolve(&assets, &corpus.path);
            if let Some(features) = &mut corpus.features {
                *features = resolve(&assets, features);
            }
        }
        if let Some(embeddings) = &mut self.embeddings {
            embeddings.path = resolve(&assets, &embeddings.path);
        }
        for table in [
            &mut self.concreteness,
            &mut self.imageability,
            &mut self.morphology,
            &mut self.syntactic_category,
        ]
        .into_iter()
        .flatten()
        {
            table.path = resolve(&assets, &table.path);
        }
        if let Some(g2p) = &mut self.g2p_consistency {
            g2p.path = resolve(&assets, &g2p.path);
        }
        if let Some(audio) = &mut self.audio {
            audio.root = resolve(&assets, &audio.root);
        }
        for condition in &mut self.conditions {
            for list in &mut condition.word_lists {
                *list = resolve(base, list);
            }
        }
        self.out_dir = resolve(base, &self.out_dir);
    }

    /// Rating-table section for a rating channel.
    pub fn rating_table(&self, kind: ChannelKind) -> Option<&RatingTableConfig> {
        match kind {
            ChannelKind::Concreteness => self.concreteness.as_ref(),
            ChannelKind::Imageability => self.imageability.as_ref(),
            ChannelKind::Morphology => self.morphology.as_ref(),
            ChannelKind::SyntacticCategory => self.syntactic_category.as_ref(),
            _ => None,
        }
    }

    /// True when the asset section a channel needs is present.
    pub fn has_asset_for(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::Articulatory => self.phonetic_corpus.is_some(),
            ChannelKind::Phonological => self.g2p_consistency.is_some(),
            ChannelKind::Acoustic => self.audio.is_some(),
            ChannelKind::Semantic => self.embeddings.is_some(),
            ChannelKind::Concreteness
            | ChannelKind::Imageability
            | ChannelKind::Morphology
            | ChannelKind::SyntacticCategory => self.rating_table(kind).is_some(),
            ChannelKind::Orthographic | ChannelKind::Visual | ChannelKind::WordLength => true,
        }
    }

    /// Checks that every requested channel has its asset section.
    pub fn validate_channels(&self, channels: &[ChannelKind]) -> RdmResult<()> {
        for &kind in channels {
            if !self.has_asset_for(kind) {
                return Err(RdmError::InvalidConfig(format!(
                    "channel '{}' requires the '{}' section",
                    kind,
                    kind.required_asset().unwrap_or("?")
                )));
            }
        }
        if let Some(audio) = &self.audio {
            if channels.contains(&ChannelKind::Acoustic) && audio.speakers.is_empty() {
                return Err(RdmError::InvalidConfig(
                    "audio.speakers must name at least one speaker".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Checks the batch sections: conditions, channels, and their assets.
    pub fn validate_batch(&self) -> RdmResult<()> {
        if self.conditions.is_empty() {
            return Err(RdmError::InvalidConfig(
                "no conditions declared".to_string(),
            ));
        }
        if self.channels.is_empty() {
            return Err(RdmError::InvalidConfig("no channels declared".to_string()));
        }
        let mut names = HashSet::new();
        for condition in &self.conditions {
            if condition.name.trim().is_empty() {
                return Err(RdmError::InvalidConfig(
                    "condition name must not be empty".to_string(),
                ));
            }
            if !names.insert(condition.name.as_str()) {
                return Err(RdmError::InvalidConfig(format!(
                    "duplicate condition '{}'",
                    condition.name
                )));
            }
            if condition.word_lists.is_empty() {
                return Err(RdmError::InvalidConfig(format!(
                    "condition '{}' has no word lists",
                    condition.name
                )));
            }
        }
        self.validate_channels(&self.channels)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
