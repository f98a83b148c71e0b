//! N2C2 Track 1 evaluation CLI
//!
//! `n2c2-eval <GOLD_DIR> <SYSTEM_DIR>` pairs annotation files by name,
//! prints skipped-file diagnostics and the per-criterion score table.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use n2c2_core::{
    emit_evaluation_finished, render_match_summary, render_track1_table, write_score_report_json,
    Corpus, EvalOptions, EvalSpan, MatchMode, ScoreReportArtifact, Track1Evaluation, METRICS,
};

#[derive(Parser)]
#[command(name = "n2c2-eval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "n2c2: Track 1 evaluation script", long_about = None)]
struct Cli {
    /// First data folder path (gold)
    gold: PathBuf,

    /// Second data folder path (system)
    system: PathBuf,

    /// Label comparison mode
    #[arg(long, value_enum, default_value_t = ModeArg::Strict)]
    mode: ModeArg,

    /// Also write the scores as JSON to this path
    #[arg(long, env = "N2C2_JSON_OUT")]
    json_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, env = "N2C2_LOG_JSON")]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Strict,
    Lenient,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => MatchMode::Strict,
            ModeArg::Lenient => MatchMode::Lenient,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    n2c2_core::init_tracing(cli.log_json, level);

    let options = EvalOptions::default().with_mode(cli.mode.into());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cmd_evaluate(
        &cli.gold,
        &cli.system,
        &options,
        cli.json_out.as_deref(),
        &mut out,
    )?;

    METRICS.flush();
    Ok(())
}

/// Load, score and print one corpus.
///
/// Returns `None` when the folders share no file; nothing is scored then.
fn cmd_evaluate(
    gold: &Path,
    system: &Path,
    options: &EvalOptions,
    json_out: Option<&Path>,
    out: &mut dyn Write,
) -> Result<Option<Track1Evaluation>> {
    let _span = EvalSpan::enter(options.track, gold, system);

    let corpus = Corpus::load(gold, system, options.track)
        .with_context(|| format!("Failed to load annotations from {:?} and {:?}", gold, system))?;

    write!(out, "{}", render_match_summary(corpus.matched()))?;
    if corpus.is_empty() {
        return Ok(None);
    }

    let eval = corpus
        .evaluate(options)
        .context("Failed to score annotations")?;

    write!(out, "{}", render_track1_table(&eval, options.track))?;
    out.flush()?;

    emit_evaluation_finished(
        options.track,
        eval.pair_count(),
        eval.micro_overall_f1(),
        eval.macro_overall_f1(),
    );

    if let Some(path) = json_out {
        let artifact = ScoreReportArtifact::new(&eval, corpus.matched(), options);
        write_score_report_json(path, &artifact)?;
        info!("Wrote scores to {:?}", path);
    }

    Ok(Some(eval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use n2c2_core::{CriterionValue, CRITERIA};

    fn write_doc(dir: &Path, name: &str, value: &str) {
        let mut xml = String::from("<PatientMatching>\n<TEXT><![CDATA[]]></TEXT>\n<TAGS>\n");
        for c in CRITERIA {
            xml.push_str(&format!("<{} met=\"{}\" />\n", c.as_str(), value));
        }
        xml.push_str("</TAGS>\n</PatientMatching>\n");
        std::fs::write(dir.join(name), xml).unwrap();
    }

    #[test]
    fn test_cli_parses_positional_folders_and_flags() {
        let cli = Cli::try_parse_from([
            "n2c2-eval",
            "gold",
            "system",
            "--mode",
            "lenient",
            "--json-out",
            "scores.json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.gold, PathBuf::from("gold"));
        assert_eq!(cli.system, PathBuf::from("system"));
        assert_eq!(cli.mode, ModeArg::Lenient);
        assert_eq!(cli.json_out, Some(PathBuf::from("scores.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_requires_both_folders() {
        assert!(Cli::try_parse_from(["n2c2-eval", "gold"]).is_err());
    }

    #[test]
    fn test_evaluate_prints_skipped_files_and_table() {
        let gold = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        write_doc(gold.path(), "a.xml", "met");
        write_doc(gold.path(), "b.xml", "met");
        write_doc(system.path(), "b.xml", "met");

        let mut out = Vec::new();
        let eval = cmd_evaluate(
            gold.path(),
            system.path(),
            &EvalOptions::default(),
            None,
            &mut out,
        )
        .unwrap()
        .expect("scored");

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&format!(
            "Files skipped in {}:\na.xml\n",
            gold.path().display()
        )));
        assert!(text.contains(" TRACK 1 "));
        assert!(text.contains("Overall (micro)"));
        assert!(text.contains("  1 files found  "));
        assert_eq!(eval.micro(CriterionValue::Met).true_positive, 13);
    }

    #[test]
    fn test_evaluate_without_matches_prints_error_only() {
        let gold = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        write_doc(gold.path(), "a.xml", "met");
        write_doc(system.path(), "b.xml", "met");

        let mut out = Vec::new();
        let result = cmd_evaluate(
            gold.path(),
            system.path(),
            &EvalOptions::default(),
            None,
            &mut out,
        )
        .unwrap();

        assert!(result.is_none());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ERROR: None of the files match.\n"
        );
    }

    #[test]
    fn test_malformed_label_aborts_before_table() {
        let gold = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        write_doc(gold.path(), "a.xml", "met");
        write_doc(system.path(), "a.xml", "maybe");

        let mut out = Vec::new();
        let err = cmd_evaluate(
            gold.path(),
            system.path(),
            &EvalOptions::default(),
            None,
            &mut out,
        )
        .unwrap_err();

        let msg = format!("{err:#}");
        assert!(msg.contains("maybe"), "unexpected error: {msg}");
        assert!(out.is_empty());
    }

    #[test]
    fn test_evaluate_writes_json_artifact() {
        let gold = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        write_doc(gold.path(), "a.xml", "met");
        write_doc(system.path(), "a.xml", "not met");
        let json_path = gold.path().join("scores.json");

        let mut out = Vec::new();
        cmd_evaluate(
            gold.path(),
            system.path(),
            &EvalOptions::default().with_mode(MatchMode::Lenient),
            Some(json_path.as_path()),
            &mut out,
        )
        .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(raw["mode"], "lenient");
        assert_eq!(raw["pair_count"], 1);
        assert_eq!(raw["micro"]["met"]["counts"]["false_negative"], 13);
    }
}
