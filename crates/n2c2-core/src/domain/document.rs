//! Annotated documents and gold/system document pairs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::criterion::{Criterion, CriterionRecord};
use crate::domain::error::{EvalError, Result};

/// Attribute carrying the label on each criterion tag.
const MET_ATTRIBUTE: &str = "met";

/// Element whose children are the criterion tags.
const TAGS_ELEMENT: &str = "TAGS";

/// One annotation file's criterion records, keyed by tag identifier.
///
/// Built once at load time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: PathBuf,
    basename: String,
    tags: BTreeMap<String, CriterionRecord>,
}

impl Document {
    /// Read and parse an annotation file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::parse(path, &text)?;
        tracing::debug!(path = %path.display(), tags = doc.tags.len(), "document parsed");
        Ok(doc)
    }

    /// Parse annotation XML already read from `path`.
    ///
    /// Element children of a `TAGS` element named after a scored criterion
    /// are criterion tags; any other tag is skipped unread. A criterion tag
    /// without a `met` attribute, or with a value other than `met` /
    /// `not met`, rejects the whole document.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let xml = roxmltree::Document::parse(text).map_err(|source| EvalError::Xml {
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = Vec::new();
        for tags in xml
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == TAGS_ELEMENT)
        {
            for tag in tags.children().filter(|n| n.is_element()) {
                let name = tag.tag_name().name();
                if Criterion::from_tag(name).is_none() {
                    tracing::debug!(path = %path.display(), tag = name, "tag ignored");
                    continue;
                }
                let raw_value =
                    tag.attribute(MET_ATTRIBUTE)
                        .ok_or_else(|| EvalError::MissingAttribute {
                            path: path.to_path_buf(),
                            tag: name.to_uppercase(),
                            attribute: MET_ATTRIBUTE.to_string(),
                        })?;
                let record = CriterionRecord::parse(name, raw_value).map_err(|_| {
                    EvalError::MalformedLabel {
                        path: path.to_path_buf(),
                        criterion: name.to_uppercase(),
                        value: raw_value.to_string(),
                    }
                })?;
                records.push(record);
            }
        }

        Ok(Self::from_records(path, records))
    }

    /// Build a document from records that were already validated.
    ///
    /// A later record with the same identifier replaces an earlier one.
    pub fn from_records(path: &Path, records: impl IntoIterator<Item = CriterionRecord>) -> Self {
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            basename,
            tags: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its directory, used to pair gold and system files.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// All criterion records in the document.
    pub fn tags(&self) -> &BTreeMap<String, CriterionRecord> {
        &self.tags
    }

    /// Record for a scored criterion.
    ///
    /// A missing criterion is an error; it is never defaulted to a label.
    pub fn criterion(&self, criterion: Criterion) -> Result<&CriterionRecord> {
        self.tags
            .get(criterion.as_str())
            .ok_or_else(|| EvalError::MissingCriterion {
                document: self.path.display().to_string(),
                criterion: criterion.as_str().to_string(),
            })
    }
}

/// Gold and system annotations of the same file.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPair {
    gold: Document,
    system: Document,
}

impl DocumentPair {
    /// Pair two documents; their base filenames must match.
    pub fn new(gold: Document, system: Document) -> Result<Self> {
        if gold.basename() != system.basename() {
            return Err(EvalError::PairMismatch {
                gold: gold.basename().to_string(),
                system: system.basename().to_string(),
            });
        }
        Ok(Self { gold, system })
    }

    pub fn gold(&self) -> &Document {
        &self.gold
    }

    pub fn system(&self) -> &Document {
        &self.system
    }

    pub fn basename(&self) -> &str {
        self.gold.basename()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criterion::CriterionValue;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<PatientMatching>
  <TEXT><![CDATA[Record date: 2069-04-07]]></TEXT>
  <TAGS>
    <ABDOMINAL met="not met" />
    <english met=" Met " />
    <SMOKER met="met" />
  </TAGS>
</PatientMatching>"#;

    #[test]
    fn test_parse_collects_tags_with_normalized_values() {
        let doc = Document::parse(Path::new("gold/100.xml"), SAMPLE).expect("valid document");
        assert_eq!(doc.basename(), "100.xml");
        assert_eq!(doc.tags().len(), 2);

        let english = doc.criterion(Criterion::English).expect("english present");
        assert_eq!(english.value, CriterionValue::Met);
        let abdominal = doc.criterion(Criterion::Abdominal).expect("abdominal present");
        assert_eq!(abdominal.value, CriterionValue::NotMet);
        assert!(!doc.tags().contains_key("SMOKER"));
    }

    #[test]
    fn test_missing_criterion_is_an_error() {
        let doc = Document::parse(Path::new("gold/100.xml"), SAMPLE).unwrap();
        let err = doc.criterion(Criterion::Hba1c).unwrap_err();
        match err {
            EvalError::MissingCriterion { criterion, document } => {
                assert_eq!(criterion, "HBA1C");
                assert!(document.contains("100.xml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_label_names_file_and_tag() {
        let text = r#"<PatientMatching><TAGS><HBA1C met="maybe"/></TAGS></PatientMatching>"#;
        let err = Document::parse(Path::new("sys/7.xml"), text).unwrap_err();
        match err {
            EvalError::MalformedLabel {
                path,
                criterion,
                value,
            } => {
                assert_eq!(path, PathBuf::from("sys/7.xml"));
                assert_eq!(criterion, "HBA1C");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_met_attribute_is_an_error() {
        let text = r#"<PatientMatching><TAGS><HBA1C/></TAGS></PatientMatching>"#;
        let err = Document::parse(Path::new("sys/7.xml"), text).unwrap_err();
        assert!(matches!(err, EvalError::MissingAttribute { ref tag, .. } if tag == "HBA1C"));
    }

    #[test]
    fn test_invalid_xml_is_an_error() {
        let err = Document::parse(Path::new("sys/7.xml"), "<PatientMatching><TAGS>").unwrap_err();
        assert!(matches!(err, EvalError::Xml { .. }));
    }

    #[test]
    fn test_non_criterion_tags_are_not_validated() {
        let mut text = String::from("<PatientMatching><TAGS>");
        for c in crate::domain::criterion::CRITERIA {
            text.push_str(&format!("<{} met=\"met\"/>", c.as_str()));
        }
        text.push_str(r#"<NOTE/><NOTE met="unknown"/></TAGS></PatientMatching>"#);

        let doc = Document::parse(Path::new("gold/5.xml"), &text).expect("extra tags ignored");
        assert_eq!(doc.tags().len(), 13);
        assert!(!doc.tags().contains_key("NOTE"));
        assert_eq!(
            doc.criterion(Criterion::Mi6mos).unwrap().value,
            CriterionValue::Met
        );
    }

    #[test]
    fn test_pair_requires_same_basename() {
        let gold = Document::parse(Path::new("gold/100.xml"), SAMPLE).unwrap();
        let system = Document::parse(Path::new("sys/101.xml"), SAMPLE).unwrap();
        let err = DocumentPair::new(gold, system).unwrap_err();
        assert!(matches!(err, EvalError::PairMismatch { .. }));
    }

    #[test]
    fn test_pair_accepts_same_basename_in_different_folders() {
        let gold = Document::parse(Path::new("gold/100.xml"), SAMPLE).unwrap();
        let system = Document::parse(Path::new("sys/100.xml"), SAMPLE).unwrap();
        let pair = DocumentPair::new(gold, system).expect("matching pair");
        assert_eq!(pair.basename(), "100.xml");
        assert_eq!(pair.gold().path(), Path::new("gold/100.xml"));
        assert_eq!(pair.system().path(), Path::new("sys/100.xml"));
    }
}
