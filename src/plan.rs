//! Output planning: targets × arities → an ordered list of documents to write.
use std::path::{Path, PathBuf};

use crate::arity::Selector;
use crate::cascade;
use crate::config::GeneratorConfig;
use crate::document::build_document;
use crate::error::ConfigResult;
use crate::interval::Target;
use crate::ir::Document;
use crate::lower::CountRange;
use crate::naming;

/// One file to write.
#[derive(Debug, Clone)]
pub struct Job {
    pub path: PathBuf,
    pub document: Document,
    /// Short description for the log line, e.g. `tuple=4, 0..64`.
    pub summary: String,
}

/// Plan every document for the run, in write order.
///
/// Order is target-major, except in cascade mode where each arity's chain is
/// planned in full before the next arity.
pub fn plan_jobs(config: &GeneratorConfig, targets: &[Target]) -> ConfigResult<Vec<Job>> {
    if !config.tuple_per_file {
        return targets
            .iter()
            .map(|target| -> ConfigResult<Job> {
                let path = relocate(&target.path, config.destination(&[Selector::All]));
                let range = CountRange::full(target.n);
                Ok(Job {
                    path,
                    document: build_document(config, &config.tuple_arities, range, None)?,
                    summary: describe(None, range),
                })
            })
            .collect();
    }

    let mut jobs = Vec::<Job>::new();

    if config.cascade {
        for &k in &config.tuple_arities {
            let chain: Vec<Target> = targets
                .iter()
                .map(|t| Target { path: tuple_path(config, &t.path, k), n: t.n })
                .collect();
            for segment in cascade::plan_cascade(&chain)? {
                jobs.push(Job {
                    document: build_document(config, &[k], segment.range, segment.include)?,
                    summary: describe(Some(k), segment.range),
                    path: segment.path,
                });
            }
        }
        return Ok(jobs);
    }

    for target in targets {
        for &k in &config.tuple_arities {
            let range = CountRange::full(target.n);
            jobs.push(Job {
                path: tuple_path(config, &target.path, k),
                document: build_document(config, &[k], range, None)?,
                summary: describe(Some(k), range),
            });
        }
    }
    Ok(jobs)
}

fn tuple_path(config: &GeneratorConfig, base: &Path, k: usize) -> PathBuf {
    let path = naming::apply_tuple_to_path(base, k);
    relocate(&path, config.destination(&[Selector::Tuple(k), Selector::All]))
}

/// Move `path` into `dir`, keeping its file name.
fn relocate(path: &Path, dir: Option<&Path>) -> PathBuf {
    match (dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn describe(arity: Option<usize>, range: CountRange) -> String {
    let span = if range.is_first() {
        format!("0..{}", range.through)
    } else {
        format!("{}..{}", range.after + 1, range.through)
    };
    match arity {
        Some(k) => format!("tuple={k}, {span}"),
        None => span,
    }
}

// ------------------------------- Tests ------------------------------------ //
