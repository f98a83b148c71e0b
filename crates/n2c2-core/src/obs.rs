//! Structured lifecycle events for evaluation runs.
//!
//! Events are emitted at `info!` (or `warn!`) level with an `event` field so
//! JSON log consumers can filter on them.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::track::Track;

/// RAII guard that enters an evaluation-scoped span.
///
/// ```ignore
/// let _span = EvalSpan::enter(Track::Track1, "gold", "system");
/// ```
pub struct EvalSpan {
    _span: tracing::span::EnteredSpan,
}

impl EvalSpan {
    pub fn enter(track: Track, gold: &Path, system: &Path) -> Self {
        let span = tracing::info_span!(
            "n2c2.eval",
            track = %track,
            gold = %gold.display(),
            system = %system.display(),
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: folders listed and intersected.
pub fn emit_corpus_matched(common: usize, skipped_gold: usize, skipped_system: usize) {
    info!(
        event = "corpus.matched",
        common = common,
        skipped_gold = skipped_gold,
        skipped_system = skipped_system,
    );
}

/// Emit event: no file name is shared by the two folders.
pub fn emit_no_matching_files(gold: &Path, system: &Path) {
    warn!(
        event = "corpus.no_match",
        gold = %gold.display(),
        system = %system.display(),
    );
}

/// Emit event: one annotation file parsed.
pub fn emit_document_loaded(path: &Path, tags: usize) {
    info!(event = "document.loaded", path = %path.display(), tags = tags);
}

/// Emit event: scoring completed.
pub fn emit_evaluation_finished(track: Track, pairs: usize, micro_f1: f64, macro_f1: f64) {
    info!(
        event = "evaluation.finished",
        track = %track,
        pairs = pairs,
        micro_f1 = micro_f1,
        macro_f1 = macro_f1,
    );
}
