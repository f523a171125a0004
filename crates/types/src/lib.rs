#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the drvup update agent
//!
//! This crate provides fundamental types used throughout the system,
//! including update items, per-item installation results, and the
//! aggregate outcome types consumed by the CLI renderer.

pub mod item;
pub mod outcome;
pub mod reports;

// Re-export commonly used types
pub use item::{SelectedSet, UpdateCategory, UpdateId, UpdateItem};
pub use outcome::{InstallOutcome, ItemResult, ResultCode};
pub use reports::{DryRunReport, ItemReport, UpdateReport};

use serde::{Deserialize, Serialize};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Tty,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Tty
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}

/// Update service backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Catalog-driven simulated service bundled with the binary
    Sim,
}

impl clap::ValueEnum for BackendKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Sim]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Sim => clap::builder::PossibleValue::new("sim"),
        })
    }
}

impl Default for BackendKind {
    fn default() -> Self {
        Self::Sim
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sim => write!(f, "sim"),
        }
    }
}
