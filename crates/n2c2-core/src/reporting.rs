//! Report artifacts for a Track 1 run.
//!
//! - the fixed-column console table (per-criterion rows plus micro and macro
//!   summary rows)
//! - skipped-file diagnostics
//! - a machine-readable JSON artifact (`--json-out`)

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::corpus::CorpusMatch;
use crate::domain::criterion::{Criterion, CriterionValue};
use crate::domain::track::{EvalOptions, MatchMode, Track};
use crate::measures::{Measures, Metric};
use crate::track1::{Scope, Track1Evaluation};

/// Printed when the two folders share no file name.
pub const NO_MATCH_MESSAGE: &str = "ERROR: None of the files match.";

/// Version of the JSON artifact layout.
pub const SCHEMA_VERSION: &str = "1.0";

// ── console table ─────────────────────────────────────────────────────────

/// Skipped-file diagnostics, or the no-match error line.
///
/// Returns an empty string when every file was matched.
pub fn render_match_summary(matched: &CorpusMatch) -> String {
    if matched.is_empty() {
        return format!("{}\n", NO_MATCH_MESSAGE);
    }

    let mut out = String::new();
    for (dir, skipped) in [
        (&matched.gold_dir, &matched.skipped_gold),
        (&matched.system_dir, &matched.skipped_system),
    ] {
        if !skipped.is_empty() {
            out.push_str(&format!("Files skipped in {}:\n", dir.display()));
            out.push_str(&skipped.join(", "));
            out.push('\n');
        }
    }
    out
}

/// Render the Track 1 score table.
pub fn render_track1_table(eval: &Track1Evaluation, track: Track) -> String {
    let mut out = String::new();
    let banner = format!(" TRACK {} ", track.number());
    out.push_str(&format!("{:*^96}\n", banner));
    out.push_str(&format!(
        "{:20}  {:-^30}    {:-^22}    {:-^14}\n",
        "", " met ", " not met ", " overall "
    ));
    out.push_str(&format!(
        "{:20}  {:6}  {:6}  {:6}  {:6}    {:6}  {:6}  {:6}    {:6}  {:6}\n",
        "", "Prec.", "Rec.", "Speci.", "F(b=1)", "Prec.", "Rec.", "F(b=1)", "F(b=1)", "AUC"
    ));

    for criterion in eval.criteria() {
        let scope = Scope::Criterion(*criterion);
        let met = |metric| eval.score(scope, CriterionValue::Met, metric);
        let not_met = |metric| eval.score(scope, CriterionValue::NotMet, metric);
        out.push_str(&score_row(
            &criterion.display_name(),
            [
                met(Metric::Precision),
                met(Metric::Recall),
                met(Metric::Specificity),
                met(Metric::F1),
                not_met(Metric::Precision),
                not_met(Metric::Recall),
                not_met(Metric::F1),
                eval.criterion_overall_f1(*criterion),
                met(Metric::Auc),
            ],
        ));
    }

    out.push_str(&format!(
        "{:20}  {:-^30}    {:-^22}    {:-^14}\n",
        "", "", "", ""
    ));

    let m = eval.micro(CriterionValue::Met);
    let nm = eval.micro(CriterionValue::NotMet);
    out.push_str(&score_row(
        "Overall (micro)",
        [
            m.precision(),
            m.recall(),
            m.specificity(),
            m.f1(),
            nm.precision(),
            nm.recall(),
            nm.f1(),
            eval.micro_overall_f1(),
            m.auc(),
        ],
    ));

    let macro_met = |metric| eval.score(Scope::Macro, CriterionValue::Met, metric);
    let macro_not_met = |metric| eval.score(Scope::Macro, CriterionValue::NotMet, metric);
    out.push_str(&score_row(
        "Overall (macro)",
        [
            macro_met(Metric::Precision),
            macro_met(Metric::Recall),
            macro_met(Metric::Specificity),
            macro_met(Metric::F1),
            macro_not_met(Metric::Precision),
            macro_not_met(Metric::Recall),
            macro_not_met(Metric::F1),
            eval.macro_overall_f1(),
            macro_met(Metric::Auc),
        ],
    ));

    out.push('\n');
    let found = format!("  {} files found  ", eval.pair_count());
    out.push_str(&format!("{:>20}  {:^74}\n", "", found));
    out
}

fn score_row(label: &str, v: [f64; 9]) -> String {
    format!(
        "{:>20}  {:<5.4}  {:<5.4}  {:<5.4}  {:<5.4}    {:<5.4}  {:<5.4}  {:<5.4}    {:<5.4}  {:<5.4}\n",
        label, v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8]
    )
}

// ── scores.json ───────────────────────────────────────────────────────────

/// Metrics for one label, with the counts they came from when available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelScores {
    pub precision: f64,
    pub recall: f64,
    pub specificity: f64,
    pub f1: f64,
    pub auc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<Measures>,
}

impl LabelScores {
    fn from_measures(m: &Measures) -> Self {
        Self {
            precision: m.precision(),
            recall: m.recall(),
            specificity: m.specificity(),
            f1: m.f1(),
            auc: m.auc(),
            counts: Some(*m),
        }
    }

    fn from_table(eval: &Track1Evaluation, scope: Scope, value: CriterionValue) -> Self {
        let get = |metric| eval.score(scope, value, metric);
        Self {
            precision: get(Metric::Precision),
            recall: get(Metric::Recall),
            specificity: get(Metric::Specificity),
            f1: get(Metric::F1),
            auc: get(Metric::Auc),
            counts: None,
        }
    }
}

/// Per-criterion row of the JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriterionScores {
    pub criterion: Criterion,
    pub met: LabelScores,
    pub not_met: LabelScores,
    pub overall_f1: f64,
}

/// Micro or macro summary row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryScores {
    pub met: LabelScores,
    pub not_met: LabelScores,
    pub overall_f1: f64,
}

/// Canonical score artifact written next to the console table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreReportArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub track: Track,
    pub mode: MatchMode,
    pub pair_count: usize,
    pub skipped_gold: Vec<String>,
    pub skipped_system: Vec<String>,
    pub criteria: Vec<CriterionScores>,
    pub micro: SummaryScores,
    #[serde(rename = "macro")]
    pub macro_avg: SummaryScores,
}

impl ScoreReportArtifact {
    pub fn new(eval: &Track1Evaluation, matched: &CorpusMatch, options: &EvalOptions) -> Self {
        let counts = eval.counts();
        let criteria = eval
            .criteria()
            .iter()
            .map(|c| CriterionScores {
                criterion: *c,
                met: LabelScores::from_measures(&counts.cell(*c, CriterionValue::Met)),
                not_met: LabelScores::from_measures(&counts.cell(*c, CriterionValue::NotMet)),
                overall_f1: eval.criterion_overall_f1(*c),
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            track: options.track,
            mode: options.mode,
            pair_count: eval.pair_count(),
            skipped_gold: matched.skipped_gold.clone(),
            skipped_system: matched.skipped_system.clone(),
            criteria,
            micro: SummaryScores {
                met: LabelScores::from_measures(&eval.micro(CriterionValue::Met)),
                not_met: LabelScores::from_measures(&eval.micro(CriterionValue::NotMet)),
                overall_f1: eval.micro_overall_f1(),
            },
            macro_avg: SummaryScores {
                met: LabelScores::from_table(eval, Scope::Macro, CriterionValue::Met),
                not_met: LabelScores::from_table(eval, Scope::Macro, CriterionValue::NotMet),
                overall_f1: eval.macro_overall_f1(),
            },
        }
    }
}

/// Write the score artifact as pretty JSON.
pub fn write_score_report_json(path: &Path, artifact: &ScoreReportArtifact) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize score artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
