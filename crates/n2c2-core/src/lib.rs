//! N2C2 Track 1 Evaluation Library
//!
//! Scores clinical-trial eligibility annotations (`met` / `not met` per
//! criterion) against a gold standard and reports per-criterion, micro and
//! macro precision, recall, specificity, F1 and AUC.

pub mod corpus;
pub mod domain;
pub mod measures;
pub mod metrics;
pub mod obs;
pub mod reporting;
pub mod telemetry;
pub mod track1;

pub use corpus::{Corpus, CorpusMatch};
pub use domain::{
    Criterion, CriterionRecord, CriterionValue, Document, DocumentPair, EvalError, EvalOptions,
    MatchMode, Result, Track, CRITERIA,
};
pub use measures::{Measures, Metric, Outcome};
pub use metrics::{Counter, Metrics, MetricsSnapshot, METRICS};
pub use obs::{
    emit_corpus_matched, emit_document_loaded, emit_evaluation_finished, emit_no_matching_files,
    EvalSpan,
};
pub use reporting::{
    render_match_summary, render_track1_table, write_score_report_json, CriterionScores,
    LabelScores, ScoreReportArtifact, SummaryScores, NO_MATCH_MESSAGE,
};
pub use telemetry::{init_tracing, log_filter};
pub use track1::{pair_agreement, Scope, ScoreTable, Track1Counts, Track1Evaluation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
