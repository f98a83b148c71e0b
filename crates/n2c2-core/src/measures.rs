//! Confusion-matrix counts and the metrics derived from them.
//!
//! Every ratio with an empty denominator evaluates to `0.0`. A criterion can
//! legitimately have no positive (or no negative) instance in a corpus, and
//! aggregate reporting must still produce a number for it.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::domain::error::{EvalError, Result};

/// Cell of the confusion matrix a single comparison falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    TrueNegative,
    FalseNegative,
}

impl Outcome {
    /// Classify one comparison given whether gold and system carry the
    /// label under evaluation.
    pub fn classify(gold_has_label: bool, system_has_label: bool) -> Self {
        match (gold_has_label, system_has_label) {
            (true, true) => Outcome::TruePositive,
            (false, true) => Outcome::FalsePositive,
            (false, false) => Outcome::TrueNegative,
            (true, false) => Outcome::FalseNegative,
        }
    }
}

/// Metric names stored in a score table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Precision,
    Recall,
    F1,
    Specificity,
    Auc,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Precision,
        Metric::Recall,
        Metric::F1,
        Metric::Specificity,
        Metric::Auc,
    ];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Precision => "precision",
            Metric::Recall => "recall",
            Metric::F1 => "f1",
            Metric::Specificity => "specificity",
            Metric::Auc => "auc",
        };
        f.write_str(name)
    }
}

/// tp / tn / fp / fn counts for one binary comparison.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Measures {
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl Measures {
    pub fn new(
        true_positive: u64,
        true_negative: u64,
        false_positive: u64,
        false_negative: u64,
    ) -> Self {
        Self {
            true_positive,
            true_negative,
            false_positive,
            false_negative,
        }
    }

    /// Count one comparison.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TruePositive => self.true_positive += 1,
            Outcome::FalsePositive => self.false_positive += 1,
            Outcome::TrueNegative => self.true_negative += 1,
            Outcome::FalseNegative => self.false_negative += 1,
        }
    }

    /// Add another counter's cells to this one.
    pub fn merge(&mut self, other: &Measures) {
        self.true_positive += other.true_positive;
        self.true_negative += other.true_negative;
        self.false_positive += other.false_positive;
        self.false_negative += other.false_negative;
    }

    /// Number of comparisons counted.
    pub fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// tp / (tp + fp)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// tp / (tp + fn)
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// tn / (fp + tn)
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negative, self.false_positive + self.true_negative)
    }

    pub fn sensitivity(&self) -> f64 {
        self.recall()
    }

    /// Weighted harmonic mean of precision and recall.
    ///
    /// `beta` must be greater than zero with a finite square.
    pub fn f_score(&self, beta: f64) -> Result<f64> {
        if !(beta * beta).is_finite() || beta <= 0.0 {
            return Err(EvalError::InvalidBeta(beta));
        }
        Ok(self.f_measure(beta))
    }

    pub fn f1(&self) -> f64 {
        self.f_measure(1.0)
    }

    /// Mean of sensitivity and specificity at the single operating point.
    ///
    /// This is not an integral over a ROC curve. Published Track 1 scores
    /// use this formula, so it is kept as is.
    pub fn auc(&self) -> f64 {
        (self.sensitivity() + self.specificity()) / 2.0
    }

    /// Value of `metric` for these counts.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Precision => self.precision(),
            Metric::Recall => self.recall(),
            Metric::F1 => self.f1(),
            Metric::Specificity => self.specificity(),
            Metric::Auc => self.auc(),
        }
    }

    fn f_measure(&self, beta: f64) -> f64 {
        let p = self.precision();
        let r = self.recall();
        let beta2 = beta * beta;
        let den = beta2 * p + r;
        if den == 0.0 {
            0.0
        } else {
            (1.0 + beta2) * p * r / den
        }
    }
}

impl AddAssign<&Measures> for Measures {
    fn add_assign(&mut self, rhs: &Measures) {
        self.merge(rhs);
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
