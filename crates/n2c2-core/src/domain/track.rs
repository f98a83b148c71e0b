//! Evaluation track and comparison mode selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shared-task track being scored.
///
/// The two tracks have unrelated comparison semantics: Track 1 compares
/// document-level criterion labels, Track 2 would match annotated spans.
/// Only Track 1 has an aggregator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Cohort selection: `met` / `not met` per criterion, `*.xml` files.
    #[default]
    Track1,
    /// Adverse drug event spans, `*.ann` files.
    Track2,
}

impl Track {
    /// File extension (without the dot) of annotation files for this track.
    pub fn extension(self) -> &'static str {
        match self {
            Track::Track1 => "xml",
            Track::Track2 => "ann",
        }
    }

    /// Track number as used in report banners.
    pub fn number(self) -> u8 {
        match self {
            Track::Track1 => 1,
            Track::Track2 => 2,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.number())
    }
}

/// Label compatibility mode.
///
/// `Lenient` exists for span-based comparison; criterion labels are always
/// compared exactly, whatever the mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Strict,
    Lenient,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Strict => f.write_str("strict"),
            MatchMode::Lenient => f.write_str("lenient"),
        }
    }
}

/// Options for one evaluation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EvalOptions {
    pub track: Track,
    pub mode: MatchMode,
}

impl EvalOptions {
    /// Override the comparison mode.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}
