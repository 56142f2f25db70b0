//! File output: overwrite/create policy, writing, and per-file outcomes.
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use serde::Serialize;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// What to do with a file that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Neither `--overwrite` nor `--no-overwrite`: overwrite, noted in the debug log.
    #[default]
    Unspecified,
    Always,
    Never,
}

/// Precondition on the destination's existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateCondition {
    #[default]
    Any,
    IfExists,
    IfNotExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WritePolicy {
    pub overwrite: OverwritePolicy,
    pub condition: CreateCondition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// `replacing` is set when an existing file is overwritten without `--overwrite`.
    Write { replacing: bool },
    Skip(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    Written,
    Skipped { reason: String },
    Failed { error: String },
}

/// Result of one target. Recorded once, never retried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: Status,
    pub duration_ms: f64,
}

/// Aggregate of a run, serialized for `--report`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_ms: f64,
    pub outcomes: Vec<GenerationOutcome>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl WritePolicy {
    pub fn decide(&self, path: &Path) -> Decision {
        let exists = path.exists();
        match self.condition {
            CreateCondition::IfExists if !exists => {
                return Decision::Skip("file does not exist (--if-exists specified)");
            }
            CreateCondition::IfNotExists if exists => {
                return Decision::Skip("file already exists (--if-not-exists specified)");
            }
            _ => {}
        }
        if !exists {
            return Decision::Write { replacing: false };
        }
        match self.overwrite {
            OverwritePolicy::Never => Decision::Skip("file exists and --no-overwrite specified"),
            OverwritePolicy::Always => Decision::Write { replacing: false },
            OverwritePolicy::Unspecified => Decision::Write { replacing: true },
        }
    }
}

/// Write `content` to `path` if the policy allows, creating parent directories.
///
/// Failures are captured in the outcome, never returned.
pub fn write_file(path: &Path, content: &str, decision: &Decision) -> GenerationOutcome {
    let started = Instant::now();
    let status = match decision {
        Decision::Skip(reason) => Status::Skipped { reason: reason.to_string() },
        Decision::Write { .. } => match write_with_parents(path, content) {
            Ok(()) => Status::Written,
            Err(error) => Status::Failed { error: format!("{error:#}") },
        },
    };
    GenerationOutcome {
        path: path.to_path_buf(),
        status,
        duration_ms: started.elapsed().as_secs_f64() * 1000.0,
    }
}

fn write_with_parents(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

impl RunSummary {
    pub fn record(&mut self, outcome: GenerationOutcome) {
        match outcome.status {
            Status::Written => self.written += 1,
            Status::Skipped { .. } => self.skipped += 1,
            Status::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Every target was written or deliberately skipped.
    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn write_report(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_with_parents(path, &json).with_context(|| format!("writing report {}", path.display()))
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(overwrite: OverwritePolicy, condition: CreateCondition) -> WritePolicy {
        WritePolicy { overwrite, condition }
    }

    #[test]
    fn decisions_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.h");
        assert_eq!(WritePolicy::default().decide(&path), Decision::Write { replacing: false });
        assert_eq!(
            policy(OverwritePolicy::Never, CreateCondition::IfExists).decide(&path),
            Decision::Skip("file does not exist (--if-exists specified)")
        );
        assert_eq!(
            policy(OverwritePolicy::Never, CreateCondition::IfNotExists).decide(&path),
            Decision::Write { replacing: false }
        );
    }

    #[test]
    fn decisions_for_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.h");
        std::fs::write(&path, "old").unwrap();
        assert_eq!(WritePolicy::default().decide(&path), Decision::Write { replacing: true });
        assert_eq!(
            policy(OverwritePolicy::Always, CreateCondition::Any).decide(&path),
            Decision::Write { replacing: false }
        );
        assert_eq!(
            policy(OverwritePolicy::Never, CreateCondition::Any).decide(&path),
            Decision::Skip("file exists and --no-overwrite specified")
        );
        assert_eq!(
            policy(OverwritePolicy::Always, CreateCondition::IfNotExists).decide(&path),
            Decision::Skip("file already exists (--if-not-exists specified)")
        );
        assert_eq!(
            policy(OverwritePolicy::Always, CreateCondition::IfExists).decide(&path),
            Decision::Write { replacing: false }
        );
    }

    #[test]
    fn writes_into_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/a.h");
        let outcome = write_file(&path, "#define X 1\n", &Decision::Write { replacing: false });
        assert_eq!(outcome.status, Status::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#define X 1\n");
    }

    #[test]
    fn failure_is_recorded_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let mut summary = RunSummary::default();
        summary.record(write_file(&blocker.join("a.h"), "x", &Decision::Write { replacing: false }));
        summary.record(write_file(&dir.path().join("b.h"), "y", &Decision::Write { replacing: false }));
        summary.record(write_file(&dir.path().join("c.h"), "z", &Decision::Skip("file exists and --no-overwrite specified")));

        assert!(matches!(summary.outcomes[0].status, Status::Failed { .. }));
        assert_eq!((summary.written, summary.skipped, summary.failed), (1, 1, 1));
        assert!(!summary.succeeded());
        assert!(!dir.path().join("c.h").exists());
    }

    #[test]
    fn report_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut summary = RunSummary::default();
        summary.record(GenerationOutcome {
            path: PathBuf::from("out/a.h"),
            status: Status::Skipped { reason: "file already exists (--if-not-exists specified)".into() },
            duration_ms: 0.5,
        });
        let report = dir.path().join("report/run.json");
        summary.write_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["outcomes"][0]["status"], "skipped");
        assert_eq!(value["outcomes"][0]["reason"], "file already exists (--if-not-exists specified)");
        assert_eq!(value["outcomes"][0]["path"], "out/a.h");
    }
}
