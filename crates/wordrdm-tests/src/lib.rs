//! WordRDM End-to-End Test Infrastructure
//!
//! Builds throwaway study directories (word lists, norm tables, embeddings,
//! a phonetic corpus and synthetic recordings) and runs the CLI commands and
//! channel builders against them.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wordrdm-tests
//! ```

pub mod fixtures;

pub use fixtures::{StudyFixture, CORPUS, EMBEDDINGS, FEATURES, G2P, IMAGEABILITY};
