//! Loaded assets and channel dispatch.
//!
//! Every asset a run needs is loaded up front, so a missing or corrupt file
//! fails the run before any matrix is built. Channels then borrow from the
//! registry.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use wordrdm_backend_audio::AcousticChannel;
use wordrdm_backend_lexical::{
    ArticulatoryChannel, ConsistencyTable, EmbeddingStore, OrthographicChannel,
    PhonologicalChannel, PhoneticCorpus, RatingChannel, RatingTable, SemanticChannel,
    WordLengthChannel,
};
use wordrdm_backend_visual::glyphs::glyph;
use wordrdm_backend_visual::VisualChannel;
use wordrdm_spec::{
    build_joint, build_pairwise_with_progress, prepare_words, ChannelKind, ChannelShape,
    DistanceMatrix, PairwiseChannel, StudyConfig, WordSet,
};

/// Immutable assets shared by every build in a run.
#[derive(Debug, Default)]
pub struct Assets {
    corpus: Option<PhoneticCorpus>,
    embeddings: Option<EmbeddingStore>,
    consistency: Option<ConsistencyTable>,
    ratings: BTreeMap<ChannelKind, RatingTable>,
}

impl Assets {
    /// Loads the assets needed by `channels`.
    pub fn load(config: &StudyConfig, channels: &[ChannelKind]) -> Result<Self> {
        config.validate_channels(channels)?;
        let mut assets = Self::default();

        for &kind in channels {
            match kind {
                ChannelKind::Articulatory if assets.corpus.is_none() => {
                    let section = config
                        .phonetic_corpus
                        .as_ref()
                        .ok_or_else(|| missing_section(kind))?;
                    let corpus = PhoneticCorpus::load(&section.path, section.features.as_deref())
                        .context("failed to load phonetic corpus")?;
                    info!("phonetic corpus: {} entries", corpus.len());
                    assets.corpus = Some(corpus);
                }
                ChannelKind::Semantic if assets.embeddings.is_none() => {
                    let section = config
                        .embeddings
                        .as_ref()
                        .ok_or_else(|| missing_section(kind))?;
                    let store = EmbeddingStore::load(&section.path)
                        .context("failed to load embeddings")?;
                    info!("embeddings: {} words x {}", store.len(), store.dimension());
                    assets.embeddings = Some(store);
                }
                ChannelKind::Phonological if assets.consistency.is_none() => {
                    let section = config
                        .g2p_consistency
                        .as_ref()
                        .ok_or_else(|| missing_section(kind))?;
                    let table = ConsistencyTable::load(section)
                        .context("failed to load g2p consistency table")?;
                    info!("g2p consistency: {} words", table.len());
                    assets.consistency = Some(table);
                }
                ChannelKind::Concreteness
                | ChannelKind::Imageability
                | ChannelKind::Morphology
                | ChannelKind::SyntacticCategory
                    if !assets.ratings.contains_key(&kind) =>
                {
                    let section = config
                        .rating_table(kind)
                        .ok_or_else(|| missing_section(kind))?;
                    let table = RatingTable::load(section, kind)
                        .with_context(|| format!("failed to load {} ratings", kind))?;
                    info!("{}: {} rated words", kind, table.len());
                    assets.ratings.insert(kind, table);
                }
                _ => {}
            }
        }

        Ok(assets)
    }

    fn corpus(&self) -> Result<&PhoneticCorpus> {
        self.corpus
            .as_ref()
            .ok_or_else(|| anyhow!("phonetic corpus not loaded"))
    }

    fn embeddings(&self) -> Result<&EmbeddingStore> {
        self.embeddings
            .as_ref()
            .ok_or_else(|| anyhow!("embeddings not loaded"))
    }

    fn consistency(&self) -> Result<&ConsistencyTable> {
        self.consistency
            .as_ref()
            .ok_or_else(|| anyhow!("g2p consistency table not loaded"))
    }

    fn ratings(&self, kind: ChannelKind) -> Result<&RatingTable> {
        self.ratings
            .get(&kind)
            .ok_or_else(|| anyhow!("{} ratings not loaded", kind))
    }

    fn pairwise_channel(&self, kind: ChannelKind) -> Result<Box<dyn PairwiseChannel + '_>> {
        let channel: Box<dyn PairwiseChannel + '_> = match kind {
            ChannelKind::Articulatory => Box::new(ArticulatoryChannel::new(self.corpus()?)),
            ChannelKind::Phonological => Box::new(PhonologicalChannel::new(self.consistency()?)),
            ChannelKind::Semantic => Box::new(SemanticChannel::new(self.embeddings()?)),
            ChannelKind::WordLength => Box::new(WordLengthChannel),
            ChannelKind::Concreteness
            | ChannelKind::Imageability
            | ChannelKind::Morphology
            | ChannelKind::SyntacticCategory => {
                Box::new(RatingChannel::new(kind, self.ratings(kind)?))
            }
            other => bail!("{} is not a pairwise channel", other),
        };
        Ok(channel)
    }

    /// Builds one channel's matrix, reporting `(done, total)` progress.
    pub fn build<F>(
        &self,
        config: &StudyConfig,
        kind: ChannelKind,
        words: &WordSet,
        mut progress: F,
    ) -> Result<DistanceMatrix>
    where
        F: FnMut(usize, usize),
    {
        let matrix = match kind.shape() {
            ChannelShape::Pairwise => {
                let channel = self.pairwise_channel(kind)?;
                build_pairwise_with_progress(words, channel.as_ref(), &mut progress)?
            }
            ChannelShape::Joint => match kind {
                ChannelKind::Orthographic => build_joint(words, &OrthographicChannel)?,
                ChannelKind::Visual => {
                    build_joint(words, &VisualChannel::new(config.visual.clone()))?
                }
                other => bail!("{} is not a joint channel", other),
            },
            ChannelShape::Aggregated => {
                let audio = config.audio.as_ref().ok_or_else(|| missing_section(kind))?;
                AcousticChannel::new(audio).build_with_progress(words, &mut progress)?
            }
        };
        Ok(matrix)
    }

    /// Words a channel cannot resolve: lookup misses, missing glyphs, or
    /// words without any recording.
    pub fn unresolved_words(
        &self,
        config: &StudyConfig,
        kind: ChannelKind,
        words: &WordSet,
    ) -> Result<Vec<String>> {
        let words = prepare_words(words, kind)?;
        let missing: Vec<String> = match kind {
            ChannelKind::Articulatory => {
                let channel = ArticulatoryChannel::new(self.corpus()?);
                words
                    .iter()
                    .filter(|w| channel.transcription(w).is_err())
                    .map(str::to_string)
                    .collect()
            }
            ChannelKind::Semantic => {
                let store = self.embeddings()?;
                words.iter().filter(|w| store.get(w).is_none()).map(str::to_string).collect()
            }
            ChannelKind::Phonological => {
                let table = self.consistency()?;
                words.iter().filter(|w| table.get(w).is_none()).map(str::to_string).collect()
            }
            ChannelKind::Concreteness
            | ChannelKind::Imageability
            | ChannelKind::Morphology
            | ChannelKind::SyntacticCategory => {
                let table = self.ratings(kind)?;
                words.iter().filter(|w| table.get(w).is_none()).map(str::to_string).collect()
            }
            ChannelKind::Visual => words
                .iter()
                .filter(|w| w.chars().any(|c| glyph(c).is_none()))
                .map(str::to_string)
                .collect(),
            ChannelKind::Acoustic => {
                let audio = config.audio.as_ref().ok_or_else(|| missing_section(kind))?;
                words
                    .iter()
                    .filter(|w| {
                        !audio.speakers.iter().any(|speaker| {
                            speaker.sessions.iter().any(|&session| {
                                audio.recording_path(&speaker.name, w, session).is_file()
                            })
                        })
                    })
                    .map(str::to_string)
                    .collect()
            }
            ChannelKind::Orthographic | ChannelKind::WordLength => Vec::new(),
        };
        Ok(missing)
    }
}

fn missing_section(kind: ChannelKind) -> anyhow::Error {
    anyhow!(
        "channel '{}' requires the '{}' section in the study file",
        kind,
        kind.required_asset().unwrap_or("?")
    )
}
