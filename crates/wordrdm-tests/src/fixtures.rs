//! Test fixture utilities for creating synthetic study directories.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Phonetic corpus covering the fixture vocabulary. `April` is stored
/// capitalized, as month names are.
pub const CORPUS: &str = "# word\ttranscription\n\
                          cat\tk.a.t\n\
                          cap\tk.a.p\n\
                          dog\td.o.g\n\
                          apple\ta.p.l\n\
                          April\te.p.r.l\n\
                          stone\ts.t.o.n\n";

/// Segment features for the corpus symbols.
pub const FEATURES: &str = "symbol,voice,cont,labial\n\
                            k,-,-,-\n\
                            a,+,+,-\n\
                            t,-,-,-\n\
                            p,-,-,+\n\
                            d,+,-,-\n\
                            o,+,+,+\n\
                            g,+,-,-\n\
                            l,+,+,-\n\
                            e,+,+,-\n\
                            r,+,+,-\n\
                            s,-,+,-\n\
                            n,+,-,-\n";

/// Embeddings with a `count dim` header.
pub const EMBEDDINGS: &str = "6 3\n\
                              cat 0.9 0.1 0.0\n\
                              cap 0.1 0.9 0.2\n\
                              dog 0.8 0.2 0.1\n\
                              apple 0.0 0.3 0.9\n\
                              april 0.1 0.1 0.8\n\
                              stone 0.2 0.8 0.4\n";

/// Imageability norms, including two always-excluded words.
pub const IMAGEABILITY: &str = "Words,IMAG\n\
                                cat,6.2\n\
                                cap,5.1\n\
                                dog,6.4\n\
                                apple,6.5\n\
                                april,3.0\n\
                                stone,5.8\n\
                                account,2.9\n\
                                turnip,5.5\n";

/// Grapheme-to-phoneme consistency norms.
pub const G2P: &str = "WORD,O,N,C\n\
                       cat,0.9,0.8,1.0\n\
                       cap,0.9,0.7,0.6\n\
                       dog,1.0,0.5,0.9\n\
                       apple,0.4,0.6,0.7\n\
                       april,0.3,0.2,0.8\n\
                       stone,0.8,0.9,0.9\n";

/// A temporary study directory.
pub struct StudyFixture {
    pub root: TempDir,
}

impl Default for StudyFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyFixture {
    /// Create an empty study directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Create a study directory holding every lexical asset:
    /// `corpus.tsv`, `features.csv`, `vectors.txt`, `imageability.csv`, `g2p.csv`.
    pub fn with_lexical_assets() -> Self {
        let fixture = Self::new();
        fixture.add_file("corpus.tsv", CORPUS);
        fixture.add_file("features.csv", FEATURES);
        fixture.add_file("vectors.txt", EMBEDDINGS);
        fixture.add_file("imageability.csv", IMAGEABILITY);
        fixture.add_file("g2p.csv", G2P);
        fixture
    }

    /// Get the study root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Write a word list, one word per line.
    pub fn add_word_list(&self, name: &str, words: &[&str]) -> PathBuf {
        let mut content = words.join("\n");
        content.push('\n');
        self.add_file(name, &content)
    }

    /// Write `study.json` and return its path.
    pub fn write_study(&self, study: &serde_json::Value) -> PathBuf {
        let text = serde_json::to_string_pretty(study).expect("Failed to serialize study");
        self.add_file("study.json", &text)
    }

    /// Write a synthetic recording at
    /// `audio/{speaker}/auto_find_labels/{word}{session}.wav`: a 0.3 s,
    /// 16 kHz, 16-bit tone at `freq` Hz with its third harmonic.
    pub fn add_recording(&self, speaker: &str, word: &str, session: u32, freq: f64) -> PathBuf {
        let dir = self
            .path()
            .join("audio")
            .join(speaker)
            .join("auto_find_labels");
        fs::create_dir_all(&dir).expect("Failed to create recording dir");
        let path = dir.join(format!("{}{}.wav", word, session));

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
        for i in 0..4800 {
            let t = i as f64 / 16000.0;
            let value =
                6000.0 * (2.0 * PI * freq * t).sin() + 2000.0 * (2.0 * PI * 3.0 * freq * t).sin();
            writer
                .write_sample(value.round() as i16)
                .expect("Failed to write sample");
        }
        writer.finalize().expect("Failed to finalize WAV");
        path
    }
}
