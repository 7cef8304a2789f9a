//! WordRDM CLI library.
//!
//! Holds the command implementations and the asset registry that loads every
//! asset a run needs before any matrix is built.

pub mod commands;
pub mod registry;

pub use registry::Assets;
