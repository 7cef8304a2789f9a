//! Articulatory channel: length-normalized phonological edit distance.

use wordrdm_spec::{ChannelKind, PairwiseChannel, RdmError, RdmResult};

use crate::corpus::{PhoneticCorpus, Transcription};

/// Phonological edit distance divided by the longer word's character count.
#[derive(Debug, Clone, Copy)]
pub struct ArticulatoryChannel<'a> {
    corpus: &'a PhoneticCorpus,
}

impl<'a> ArticulatoryChannel<'a> {
    /// Creates a channel over a loaded corpus.
    pub fn new(corpus: &'a PhoneticCorpus) -> Self {
        Self { corpus }
    }

    /// Finds a word's transcription, retrying once with the first letter
    /// capitalized (proper nouns and month names are stored that way).
    pub fn transcription(&self, word: &str) -> RdmResult<&'a Transcription> {
        if let Some(found) = self.corpus.find(word) {
            return Ok(found);
        }
        let capitalized = capitalize(word);
        self.corpus.find(&capitalized).ok_or_else(|| {
            RdmError::lookup_miss(
                ChannelKind::Articulatory.as_str(),
                word,
                format!("phonetic corpus (also tried '{}')", capitalized),
            )
        })
    }
}

impl PairwiseChannel for ArticulatoryChannel<'_> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Articulatory
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        let a = self.transcription(first)?;
        let b = self.transcription(second)?;
        let raw = self.corpus.phono_edit_distance(a, b);
        let longest = first.chars().count().max(second.chars().count()).max(1);
        Ok(raw / longest as f64)
    }
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordrdm_spec::{build_pairwise, WordSet};

    fn corpus() -> PhoneticCorpus {
        PhoneticCorpus::parse("cat\tK.AE1.T\nbat\tB.AE1.T\nJune\tJH.UW1.N\nelephant\tEH1.L.AH0.F.AH0.N.T\n")
            .unwrap()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("june"), "June");
        assert_eq!(capitalize("JUNE"), "June");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_normalized_by_longer_word() {
        let corpus = corpus();
        let channel = ArticulatoryChannel::new(&corpus);
        let d = channel.distance("cat", "bat").unwrap();
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_capitalization_fallback() {
        let corpus = corpus();
        let channel = ArticulatoryChannel::new(&corpus);
        assert!(channel.transcription("june").is_ok());
        let d = channel.distance("june", "cat").unwrap();
        assert!((d - 3.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_miss_names_word() {
        let corpus = corpus();
        let channel = ArticulatoryChannel::new(&corpus);
        let err = channel.distance("cat", "zorp").unwrap_err();
        match err {
            RdmError::LookupMiss { word, channel, .. } => {
                assert_eq!(word, "zorp");
                assert_eq!(channel, "articulatory");
            }
            other => panic!("expected lookup miss, got {other}"),
        }
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let corpus = corpus();
        let words = WordSet::new(["elephant", "cat", "bat", "june"]).unwrap();
        let rdm = build_pairwise(&words, &ArticulatoryChannel::new(&corpus)).unwrap();
        assert!(rdm.is_symmetric(1e-12));
        assert_eq!(rdm.get_by_word("cat", "cat"), Some(0.0));
    }
}
