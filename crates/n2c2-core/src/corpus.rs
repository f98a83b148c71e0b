//! Gold/system folder matching and corpus loading.
//!
//! Files are paired by base filename. Names present in only one folder are
//! skipped (informational); an empty intersection leaves the corpus with no
//! pairs and the caller decides what to report. Any file that fails to load
//! aborts the whole load.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::document::{Document, DocumentPair};
use crate::domain::error::{EvalError, Result};
use crate::domain::track::{EvalOptions, Track};
use crate::metrics::{Counter, METRICS};
use crate::obs;
use crate::track1::Track1Evaluation;

/// Outcome of intersecting the file names of two folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusMatch {
    pub gold_dir: PathBuf,
    pub system_dir: PathBuf,
    /// Names present in both folders, sorted.
    pub common: Vec<String>,
    /// Names only in the gold folder, sorted.
    pub skipped_gold: Vec<String>,
    /// Names only in the system folder, sorted.
    pub skipped_system: Vec<String>,
}

impl CorpusMatch {
    /// List both folders and intersect the names of files with `extension`.
    pub fn discover(gold_dir: &Path, system_dir: &Path, extension: &str) -> Result<Self> {
        let gold = list_files(gold_dir, extension)?;
        let system = list_files(system_dir, extension)?;
        Ok(Self::from_names(gold_dir, system_dir, gold, system))
    }

    /// Intersect two sets of file names.
    pub fn from_names(
        gold_dir: &Path,
        system_dir: &Path,
        gold: impl IntoIterator<Item = String>,
        system: impl IntoIterator<Item = String>,
    ) -> Self {
        let gold: BTreeSet<String> = gold.into_iter().collect();
        let system: BTreeSet<String> = system.into_iter().collect();

        Self {
            gold_dir: gold_dir.to_path_buf(),
            system_dir: system_dir.to_path_buf(),
            common: gold.intersection(&system).cloned().collect(),
            skipped_gold: gold.difference(&system).cloned().collect(),
            skipped_system: system.difference(&gold).cloned().collect(),
        }
    }

    /// True when no file name is shared by the two folders.
    pub fn is_empty(&self) -> bool {
        self.common.is_empty()
    }
}

/// Loaded document pairs plus the matching that produced them.
#[derive(Debug, Clone)]
pub struct Corpus {
    matched: CorpusMatch,
    pairs: Vec<DocumentPair>,
}

impl Corpus {
    /// Match the folders for `track` and load every common file.
    ///
    /// With no common file the corpus is empty and nothing is loaded. Only
    /// Track 1 documents can be loaded; Track 2 fails before any listing.
    pub fn load(gold_dir: &Path, system_dir: &Path, track: Track) -> Result<Self> {
        if track != Track::Track1 {
            return Err(EvalError::UnsupportedTrack(track));
        }

        let matched = CorpusMatch::discover(gold_dir, system_dir, track.extension())?;
        METRICS.add(
            Counter::FilesSkipped,
            (matched.skipped_gold.len() + matched.skipped_system.len()) as u64,
        );

        if matched.is_empty() {
            obs::emit_no_matching_files(gold_dir, system_dir);
            return Ok(Self {
                matched,
                pairs: Vec::new(),
            });
        }

        obs::emit_corpus_matched(
            matched.common.len(),
            matched.skipped_gold.len(),
            matched.skipped_system.len(),
        );

        let pairs = matched
            .common
            .iter()
            .map(|name| {
                let gold = load_document(&gold_dir.join(name))?;
                let system = load_document(&system_dir.join(name))?;
                DocumentPair::new(gold, system)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { matched, pairs })
    }

    /// Build a corpus from pairs already in memory.
    pub fn from_pairs(matched: CorpusMatch, pairs: Vec<DocumentPair>) -> Self {
        Self { matched, pairs }
    }

    pub fn matched(&self) -> &CorpusMatch {
        &self.matched
    }

    pub fn pairs(&self) -> &[DocumentPair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Score the corpus for the selected track.
    pub fn evaluate(&self, options: &EvalOptions) -> Result<Track1Evaluation> {
        match options.track {
            Track::Track1 => Track1Evaluation::evaluate(&self.pairs, options.mode),
            Track::Track2 => Err(EvalError::UnsupportedTrack(Track::Track2)),
        }
    }
}

fn load_document(path: &Path) -> Result<Document> {
    let doc = Document::load(path)?;
    METRICS.incr(Counter::DocumentsLoaded);
    obs::emit_document_loaded(doc.path(), doc.tags().len());
    Ok(doc)
}

/// Names of regular, non-hidden files in `dir` with the given extension.
fn list_files(dir: &Path, extension: &str) -> Result<BTreeSet<String>> {
    let io_err = |source: std::io::Error| EvalError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with('.') => {}
            Some(name) => {
                names.insert(name.to_string());
            }
            None => {
                tracing::warn!(path = %path.display(), "file name is not valid UTF-8, ignored");
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_intersection_and_skipped_files() {
        let m = CorpusMatch::from_names(
            Path::new("gold"),
            Path::new("sys"),
            names(&["a.xml", "b.xml"]),
            names(&["b.xml", "c.xml"]),
        );
        assert_eq!(m.common, names(&["b.xml"]));
        assert_eq!(m.skipped_gold, names(&["a.xml"]));
        assert_eq!(m.skipped_system, names(&["c.xml"]));
        assert!(!m.is_empty());
    }

    #[test]
    fn test_disjoint_folders_match_nothing() {
        let m = CorpusMatch::from_names(
            Path::new("gold"),
            Path::new("sys"),
            names(&["a.xml"]),
            names(&["c.xml"]),
        );
        assert!(m.is_empty());
        assert_eq!(m.skipped_gold, names(&["a.xml"]));
        assert_eq!(m.skipped_system, names(&["c.xml"]));
    }

    #[test]
    fn test_common_names_are_sorted() {
        let m = CorpusMatch::from_names(
            Path::new("gold"),
            Path::new("sys"),
            names(&["20.xml", "100.xml", "3.xml"]),
            names(&["3.xml", "20.xml", "100.xml"]),
        );
        assert_eq!(m.common, names(&["100.xml", "20.xml", "3.xml"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_names_are_ignored() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xml"), "<TAGS/>").unwrap();
        let bad = OsStr::from_bytes(b"b\xff.xml");
        if std::fs::write(dir.path().join(bad), "<TAGS/>").is_err() {
            // filesystem refuses non-UTF-8 names
            return;
        }

        let listed = list_files(dir.path(), "xml").unwrap();
        assert_eq!(listed.into_iter().collect::<Vec<_>>(), names(&["a.xml"]));
    }

    #[test]
    fn test_track2_evaluation_is_unsupported() {
        let corpus = Corpus::from_pairs(
            CorpusMatch::from_names(Path::new("g"), Path::new("s"), vec![], vec![]),
            Vec::new(),
        );
        let opts = EvalOptions {
            track: Track::Track2,
            ..EvalOptions::default()
        };
        assert!(matches!(
            corpus.evaluate(&opts),
            Err(EvalError::UnsupportedTrack(Track::Track2))
        ));
    }
}
