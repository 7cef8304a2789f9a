//! End-to-end tests for `wordrdm build` over the lexical channels.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wordrdm-tests --test e2e_build
//! ```

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use wordrdm_cli::commands::build;
use wordrdm_spec::{DistanceMatrix, IMAGEABILITY_EXCLUDED};
use wordrdm_tests::StudyFixture;

fn lexical_study() -> (StudyFixture, PathBuf) {
    let fixture = StudyFixture::with_lexical_assets();
    let study = fixture.write_study(&json!({
        "phonetic_corpus": {"path": "corpus.tsv", "features": "features.csv"},
        "embeddings": {"path": "vectors.txt"},
        "imageability": {"path": "imageability.csv"},
        "g2p_consistency": {"path": "g2p.csv"}
    }));
    (fixture, study)
}

fn build_to_csv(
    fixture: &StudyFixture,
    study: &PathBuf,
    channel: &str,
    words: &[&str],
) -> DistanceMatrix {
    let list = fixture.add_word_list("words.txt", words);
    let out = fixture.path().join(format!("out/{}.csv", channel));
    let code = build::run(
        channel,
        &[list.to_string_lossy().to_string()],
        Some(study.to_str().unwrap()),
        Some(out.to_str().unwrap()),
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    DistanceMatrix::from_csv(&fs::read_to_string(out).unwrap()).unwrap()
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("cell should have a value");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn articulatory_uses_feature_costs_and_capitalized_fallback() {
    let (fixture, study) = lexical_study();
    let rdm = build_to_csv(&fixture, &study, "articulatory", &["cat", "cap", "april"]);

    assert_eq!(rdm.labels(), &["april", "cap", "cat"]);
    // t and p differ only in [labial]; divided by three letters
    assert_close(rdm.get_by_word("cat", "cap"), 1.0 / 3.0);
    assert_close(rdm.get_by_word("cap", "cat"), 1.0 / 3.0);
    assert!(rdm.get_by_word("april", "cat").unwrap() > 0.0);
    for word in rdm.labels() {
        assert_eq!(rdm.get_by_word(word, word), Some(0.0));
    }
}

#[test]
fn semantic_distances_are_one_minus_cosine() {
    let (fixture, study) = lexical_study();
    let rdm = build_to_csv(&fixture, &study, "semantic", &["cat", "dog", "apple", "stone"]);

    for row in rdm.labels() {
        for col in rdm.labels() {
            let d = rdm.get_by_word(row, col).unwrap();
            assert!((0.0..=2.0).contains(&d), "{}/{} = {}", row, col, d);
        }
    }
    let cat = [0.9, 0.1, 0.0];
    let dog = [0.8, 0.2, 0.1];
    let dot: f64 = cat.iter().zip(&dog).map(|(a, b)| a * b).sum();
    let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();
    assert_close(rdm.get_by_word("cat", "dog"), 1.0 - dot / (norm(&cat) * norm(&dog)));
    assert!(rdm.get_by_word("cat", "dog") < rdm.get_by_word("cat", "apple"));
}

#[test]
fn imageability_drops_excluded_words() {
    let (fixture, study) = lexical_study();
    let rdm = build_to_csv(
        &fixture,
        &study,
        "imageability",
        &["cat", "account", "dog", "turnip", "stone"],
    );

    assert_eq!(rdm.labels(), &["cat", "dog", "stone"]);
    for excluded in IMAGEABILITY_EXCLUDED {
        assert!(!rdm.labels().iter().any(|w| w == excluded));
    }
    assert_close(rdm.get_by_word("cat", "stone"), 0.4);
}

#[test]
fn phonological_is_euclidean_over_consistency() {
    let (fixture, study) = lexical_study();
    let rdm = build_to_csv(&fixture, &study, "phonological", &["cat", "cap"]);
    assert_close(rdm.get_by_word("cat", "cap"), (0.01f64 + 0.16).sqrt());
}

#[test]
fn word_length_needs_no_study() {
    let fixture = StudyFixture::new();
    let list = fixture.add_word_list("words.txt", &["elephant", "cat", "dog"]);
    let out = fixture.path().join("length.csv");
    build::run(
        "word_length",
        &[list.to_string_lossy().to_string()],
        None,
        Some(out.to_str().unwrap()),
    )
    .unwrap();

    let text = fs::read_to_string(out).unwrap();
    assert_eq!(text.lines().next().unwrap(), ",cat,dog,elephant");
    let rdm = DistanceMatrix::from_csv(&text).unwrap();
    assert_eq!(rdm.get_by_word("cat", "dog"), Some(0.0));
    assert_eq!(rdm.get_by_word("cat", "elephant"), Some(5.0));
}

#[test]
fn lookup_miss_aborts_the_build() {
    let (fixture, study) = lexical_study();
    let list = fixture.add_word_list("words.txt", &["cat", "zebra"]);
    let out = fixture.path().join("semantic.csv");
    let err = build::run(
        "semantic",
        &[list.to_string_lossy().to_string()],
        Some(study.to_str().unwrap()),
        Some(out.to_str().unwrap()),
    )
    .unwrap_err();

    assert!(err.to_string().contains("zebra"), "{}", err);
    assert!(!out.exists());
}

#[test]
fn corrupt_asset_fails_before_building() {
    let fixture = StudyFixture::new();
    fixture.add_file("vectors.txt", "cat 0.1 0.2\ndog 0.3\n");
    let study = fixture.write_study(&json!({"embeddings": {"path": "vectors.txt"}}));
    let list = fixture.add_word_list("words.txt", &["cat", "dog"]);

    let err = build::run(
        "semantic",
        &[list.to_string_lossy().to_string()],
        Some(study.to_str().unwrap()),
        None,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("embeddings"));
}
