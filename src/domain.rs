//! Domain logic for link rewriting.
//!
//! This module contains the pure, filesystem-agnostic parts of the tool:
//! the rewrite engine and the configuration model.

mod config;
pub use config::Config;

/// Link pattern matching and substitution.
pub mod rewrite;
pub use rewrite::{LinkStyle, Rewriter, Rewritten, UnknownStyleError};
