//! Track 1 scoring: per-criterion, per-label confusion counts over a corpus.
//!
//! For every criterion in [`CRITERIA`] and every label `v`, each document
//! pair lands in exactly one cell:
//!
//! | gold == v | system == v | cell |
//! |-----------|-------------|------|
//! | yes       | yes         | tp   |
//! | no        | yes         | fp   |
//! | no        | no          | tn   |
//! | yes       | no          | fn   |
//!
//! Micro scores pool the cells of all criteria per label. Macro scores are
//! the unweighted mean of the per-criterion scores.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::criterion::{Criterion, CriterionRecord, CriterionValue, CRITERIA};
use crate::domain::document::{Document, DocumentPair};
use crate::domain::error::Result;
use crate::domain::track::MatchMode;
use crate::measures::{Measures, Metric, Outcome};
use crate::metrics::{Counter, METRICS};

/// Row key of a score table entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Criterion(Criterion),
    Macro,
}

/// Scores keyed by (criterion or macro, label, metric).
///
/// Built once per evaluation and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    scores: BTreeMap<(Scope, CriterionValue, Metric), f64>,
}

impl ScoreTable {
    fn insert(&mut self, scope: Scope, value: CriterionValue, metric: Metric, score: f64) {
        self.scores.insert((scope, value, metric), score);
    }

    pub fn get(&self, scope: Scope, value: CriterionValue, metric: Metric) -> Option<f64> {
        self.scores.get(&(scope, value, metric)).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Scope, CriterionValue, Metric), &f64)> {
        self.scores.iter()
    }
}

/// Confusion counts per (criterion, label).
///
/// Counts for separate pairs can be built independently and merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track1Counts {
    cells: BTreeMap<(Criterion, CriterionValue), Measures>,
}

impl Track1Counts {
    /// Classify one document pair for every criterion and label.
    pub fn from_pair(pair: &DocumentPair) -> Result<Self> {
        let mut counts = Self::default();
        for criterion in CRITERIA {
            let gold = pair.gold().criterion(criterion)?.value;
            let system = pair.system().criterion(criterion)?.value;
            for value in CriterionValue::ALL {
                counts
                    .cells
                    .entry((criterion, value))
                    .or_default()
                    .record(Outcome::classify(gold == value, system == value));
            }
        }
        Ok(counts)
    }

    pub fn merge(&mut self, other: &Track1Counts) {
        for (key, measures) in &other.cells {
            *self.cells.entry(*key).or_default() += measures;
        }
    }

    /// Counts for one criterion and label (all zero when never seen).
    pub fn cell(&self, criterion: Criterion, value: CriterionValue) -> Measures {
        self.cells
            .get(&(criterion, value))
            .copied()
            .unwrap_or_default()
    }

    /// Counts for one label pooled over all criteria.
    pub fn micro(&self, value: CriterionValue) -> Measures {
        let mut pooled = Measures::default();
        for criterion in CRITERIA {
            pooled += &self.cell(criterion, value);
        }
        pooled
    }
}

/// Result of scoring a Track 1 corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Track1Evaluation {
    counts: Track1Counts,
    scores: ScoreTable,
    pair_count: usize,
}

impl Track1Evaluation {
    /// Score all pairs.
    ///
    /// Fails on the first pair lacking a criterion on either side; no
    /// partial result is returned.
    pub fn evaluate(pairs: &[DocumentPair], mode: MatchMode) -> Result<Self> {
        let mut counts = Track1Counts::default();
        for pair in pairs {
            let partial = Track1Counts::from_pair(pair)?;
            counts.merge(&partial);
            METRICS.incr(Counter::PairsEvaluated);

            if tracing::enabled!(tracing::Level::DEBUG) {
                let agreement = pair_agreement(pair, None, mode);
                tracing::debug!(
                    document = %pair.basename(),
                    agree = agreement.true_positive,
                    disagree = agreement.false_negative,
                    "pair scored"
                );
            }
        }

        let scores = build_scores(&counts);
        Ok(Self {
            counts,
            scores,
            pair_count: pairs.len(),
        })
    }

    /// Criteria in report order.
    pub fn criteria(&self) -> &'static [Criterion] {
        &CRITERIA
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn counts(&self) -> &Track1Counts {
        &self.counts
    }

    /// Number of document pairs scored.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Score of one criterion (or the macro row) for a label and metric.
    pub fn score(&self, scope: Scope, value: CriterionValue, metric: Metric) -> f64 {
        self.scores.get(scope, value, metric).unwrap_or(0.0)
    }

    /// Pooled counts for `value` across all criteria.
    pub fn micro(&self, value: CriterionValue) -> Measures {
        self.counts.micro(value)
    }

    /// Mean of the `met` and `not met` F1 of one criterion.
    pub fn criterion_overall_f1(&self, criterion: Criterion) -> f64 {
        let scope = Scope::Criterion(criterion);
        (self.score(scope, CriterionValue::Met, Metric::F1)
            + self.score(scope, CriterionValue::NotMet, Metric::F1))
            / 2.0
    }

    /// Mean of the pooled `met` and `not met` F1.
    pub fn micro_overall_f1(&self) -> f64 {
        (self.micro(CriterionValue::Met).f1() + self.micro(CriterionValue::NotMet).f1()) / 2.0
    }

    /// Mean over criteria of each criterion's overall F1.
    pub fn macro_overall_f1(&self) -> f64 {
        let sum: f64 = CRITERIA
            .iter()
            .map(|c| self.criterion_overall_f1(*c))
            .sum();
        sum / CRITERIA.len() as f64
    }
}

fn build_scores(counts: &Track1Counts) -> ScoreTable {
    let mut table = ScoreTable::default();
    for value in CriterionValue::ALL {
        for criterion in CRITERIA {
            let measures = counts.cell(criterion, value);
            for metric in Metric::ALL {
                table.insert(
                    Scope::Criterion(criterion),
                    value,
                    metric,
                    measures.metric(metric),
                );
            }
        }
    }

    for metric in Metric::ALL {
        for value in CriterionValue::ALL {
            let sum: f64 = CRITERIA
                .iter()
                .filter_map(|c| table.get(Scope::Criterion(*c), value, metric))
                .sum();
            table.insert(Scope::Macro, value, metric, sum / CRITERIA.len() as f64);
        }
    }
    table
}

/// Tag-level agreement between the two documents of a pair.
///
/// `true_positive` counts distinct system identifiers matching a gold
/// record; `false_positive` and `false_negative` are the remaining system
/// and gold identifiers. `true_negative` is always zero. When `key` is set
/// only that criterion's records take part.
pub fn pair_agreement(pair: &DocumentPair, key: Option<Criterion>, mode: MatchMode) -> Measures {
    let gold = select_records(pair.gold(), key);
    let system = select_records(pair.system(), key);

    let matched: BTreeSet<&str> = system
        .iter()
        .filter(|s| gold.iter().any(|g| g.equals(s, mode)))
        .map(|s| s.id.as_str())
        .collect();
    let system_ids: BTreeSet<&str> = system.iter().map(|s| s.id.as_str()).collect();
    let gold_ids: BTreeSet<&str> = gold.iter().map(|g| g.id.as_str()).collect();

    let tp = matched.len() as u64;
    Measures::new(
        tp,
        0,
        system_ids.len() as u64 - tp,
        gold_ids.len() as u64 - tp,
    )
}

fn select_records(doc: &Document, key: Option<Criterion>) -> Vec<&CriterionRecord> {
    doc.tags()
        .values()
        .filter(|r| key.map_or(true, |k| r.id == k.as_str()))
        .collect()
}
