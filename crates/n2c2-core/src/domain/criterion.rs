//! Clinical criteria, their labels, and single labeled judgments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{EvalError, Result};
use crate::domain::track::MatchMode;

/// One of the 13 cohort-selection criteria scored in Track 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Criterion {
    Abdominal,
    AdvancedCad,
    AlcoholAbuse,
    AspForMi,
    Creatinine,
    #[serde(rename = "DIETSUPP-2MOS")]
    Dietsupp2mos,
    DrugAbuse,
    English,
    #[serde(rename = "HBA1C")]
    Hba1c,
    #[serde(rename = "KETO-1YR")]
    Keto1yr,
    MajorDiabetes,
    MakesDecisions,
    #[serde(rename = "MI-6MOS")]
    Mi6mos,
}

/// The scored criteria, in report order.
///
/// Macro averages and table rows both iterate this sequence.
pub const CRITERIA: [Criterion; 13] = [
    Criterion::Abdominal,
    Criterion::AdvancedCad,
    Criterion::AlcoholAbuse,
    Criterion::AspForMi,
    Criterion::Creatinine,
    Criterion::Dietsupp2mos,
    Criterion::DrugAbuse,
    Criterion::English,
    Criterion::Hba1c,
    Criterion::Keto1yr,
    Criterion::MajorDiabetes,
    Criterion::MakesDecisions,
    Criterion::Mi6mos,
];

impl Criterion {
    /// Canonical tag name as it appears in annotation files.
    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Abdominal => "ABDOMINAL",
            Criterion::AdvancedCad => "ADVANCED-CAD",
            Criterion::AlcoholAbuse => "ALCOHOL-ABUSE",
            Criterion::AspForMi => "ASP-FOR-MI",
            Criterion::Creatinine => "CREATININE",
            Criterion::Dietsupp2mos => "DIETSUPP-2MOS",
            Criterion::DrugAbuse => "DRUG-ABUSE",
            Criterion::English => "ENGLISH",
            Criterion::Hba1c => "HBA1C",
            Criterion::Keto1yr => "KETO-1YR",
            Criterion::MajorDiabetes => "MAJOR-DIABETES",
            Criterion::MakesDecisions => "MAKES-DECISIONS",
            Criterion::Mi6mos => "MI-6MOS",
        }
    }

    /// Row label used in the report: first letter upper case, rest lower.
    pub fn display_name(self) -> String {
        let lower = self.as_str().to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Look up a criterion by tag name, ignoring case and surrounding whitespace.
    pub fn from_tag(tag: &str) -> Option<Criterion> {
        let normalized = tag.trim().to_uppercase();
        CRITERIA.into_iter().find(|c| c.as_str() == normalized)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label assigned to a criterion for one document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CriterionValue {
    #[serde(rename = "met")]
    Met,
    #[serde(rename = "not met")]
    NotMet,
}

impl CriterionValue {
    /// Both labels, in report column order.
    pub const ALL: [CriterionValue; 2] = [CriterionValue::Met, CriterionValue::NotMet];

    pub fn as_str(self) -> &'static str {
        match self {
            CriterionValue::Met => "met",
            CriterionValue::NotMet => "not met",
        }
    }
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriterionValue {
    type Err = EvalError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "met" => Ok(CriterionValue::Met),
            "not met" => Ok(CriterionValue::NotMet),
            _ => Err(EvalError::UnknownValue(raw.to_string())),
        }
    }
}

/// A single labeled judgment: tag identifier plus its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriterionRecord {
    /// Tag identifier, trimmed and upper-cased.
    pub id: String,
    pub value: CriterionValue,
}

impl CriterionRecord {
    /// Build a record from raw file strings.
    ///
    /// Fails with [`EvalError::UnknownValue`] when the value is neither
    /// `met` nor `not met` after normalization.
    pub fn parse(raw_id: &str, raw_value: &str) -> Result<Self> {
        Ok(Self {
            id: raw_id.trim().to_uppercase(),
            value: raw_value.parse()?,
        })
    }

    /// The scored criterion this record belongs to, if any.
    pub fn criterion(&self) -> Option<Criterion> {
        Criterion::from_tag(&self.id)
    }

    /// Whether both records carry the same identifier and value.
    ///
    /// Criterion labels have no partial credit, so `mode` does not change
    /// the outcome.
    pub fn equals(&self, other: &CriterionRecord, _mode: MatchMode) -> bool {
        self.id == other.id && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_normalizes_identifier_and_value() {
        let record = CriterionRecord::parse("  english ", " NOT MET\n").expect("valid record");
        assert_eq!(record.id, "ENGLISH");
        assert_eq!(record.value, CriterionValue::NotMet);
        assert_eq!(record.criterion(), Some(Criterion::English));
    }

    #[test]
    fn test_record_rejects_unknown_value() {
        let err = CriterionRecord::parse("ENGLISH", "maybe").unwrap_err();
        assert!(matches!(err, EvalError::UnknownValue(ref v) if v == "maybe"));
    }

    #[test]
    fn test_equals_requires_same_id_and_value() {
        let a = CriterionRecord::parse("HBA1C", "met").unwrap();
        let b = CriterionRecord::parse("hba1c", "Met").unwrap();
        let c = CriterionRecord::parse("HBA1C", "not met").unwrap();
        let d = CriterionRecord::parse("CREATININE", "met").unwrap();

        assert!(a.equals(&b, MatchMode::Strict));
        assert!(!a.equals(&c, MatchMode::Strict));
        assert!(!a.equals(&d, MatchMode::Strict));
    }

    #[test]
    fn test_lenient_mode_is_still_exact() {
        let a = CriterionRecord::parse("HBA1C", "met").unwrap();
        let c = CriterionRecord::parse("HBA1C", "not met").unwrap();
        assert!(!a.equals(&c, MatchMode::Lenient));
        assert!(a.equals(&a.clone(), MatchMode::Lenient));
    }

    #[test]
    fn test_unknown_tag_has_no_criterion() {
        let record = CriterionRecord::parse("SMOKER", "met").unwrap();
        assert_eq!(record.criterion(), None);
    }

    #[test]
    fn test_criteria_order_and_names() {
        let names: Vec<&str> = CRITERIA.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ABDOMINAL",
                "ADVANCED-CAD",
                "ALCOHOL-ABUSE",
                "ASP-FOR-MI",
                "CREATININE",
                "DIETSUPP-2MOS",
                "DRUG-ABUSE",
                "ENGLISH",
                "HBA1C",
                "KETO-1YR",
                "MAJOR-DIABETES",
                "MAKES-DECISIONS",
                "MI-6MOS",
            ]
        );
    }

    #[test]
    fn test_display_name_capitalizes_first_letter_only() {
        assert_eq!(Criterion::AdvancedCad.display_name(), "Advanced-cad");
        assert_eq!(Criterion::Hba1c.display_name(), "Hba1c");
        assert_eq!(Criterion::Mi6mos.display_name(), "Mi-6mos");
    }

    #[test]
    fn test_criterion_serde_uses_tag_names() {
        for criterion in CRITERIA {
            let json = serde_json::to_string(&criterion).expect("serialize");
            assert_eq!(json, format!("\"{}\"", criterion.as_str()));
            let back: Criterion = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, criterion);
        }
    }

    #[test]
    fn test_value_serde_uses_labels() {
        let json = serde_json::to_string(&CriterionValue::NotMet).expect("serialize");
        assert_eq!(json, "\"not met\"");
    }
}
