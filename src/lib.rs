//! Tiergate core library.
//!
//! This crate classifies component dataset folders from an upstream
//! validation report into confidence tiers, scores their weakness, and
//! produces a checklist of what still needs a human decision.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `pipeline`: Entry point tying the components together.
//! - `evaluate`: Tier 1/2/3 evaluators.
//! - `files`: Required-file presence checks and conversation loading.
//! - `schema`: Component-to-schema matching and flexibility.
//! - `issues`: Safe vs. review-worthy issue classification.
//! - `weakness`: Weakness signals, scoring, and ranking.
//! - `checklist`: Markdown review checklist.
//! - `emit`: Artifact writing.
//! - `models`: Report input and analysis output structs.
//! - `output`: Human/JSON printers.
//! - `error`: Error types.
//! - `utils`: Supporting helpers.
pub mod checklist;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod evaluate;
pub mod files;
pub mod issues;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod utils;
pub mod weakness;
