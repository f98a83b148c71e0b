//! Domain models for N2C2 evaluation.
//!
//! - `Criterion` / `CriterionValue` / `CriterionRecord`: single labeled judgments
//! - `Document` / `DocumentPair`: one annotation file, and gold/system pairs
//! - `Track` / `MatchMode` / `EvalOptions`: run selection
//! - `EvalError`: error taxonomy

pub mod criterion;
pub mod document;
pub mod error;
pub mod track;

pub use criterion::{Criterion, CriterionRecord, CriterionValue, CRITERIA};
pub use document::{Document, DocumentPair};
pub use error::{EvalError, Result};
pub use track::{EvalOptions, MatchMode, Track};
