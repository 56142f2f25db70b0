//! Cascade planning: one arity's targets become a chain of segments, each emitting only
//! `(previous N, this N]` and including the previous segment's file.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::interval::Target;
use crate::lower::CountRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeSegment {
    pub path: PathBuf,
    pub range: CountRange,
    /// File name of the previous segment, for `#include`.
    pub include: Option<String>,
}

/// Plan the chain for targets already resolved to this arity's paths.
///
/// Targets must be strictly increasing in N and resolve to distinct files; the chain
/// depends on adjacency.
pub fn plan_cascade(targets: &[Target]) -> ConfigResult<Vec<CascadeSegment>> {
    let mut segments = Vec::<CascadeSegment>::with_capacity(targets.len());
    let mut seen = HashSet::<&Path>::new();
    let mut previous: Option<&Target> = None;

    for target in targets {
        if let Some(prev) = previous {
            if target.n <= prev.n {
                return Err(ConfigError::CascadeOrder { previous: prev.n, next: target.n });
            }
        }
        if !seen.insert(target.path.as_path()) {
            return Err(ConfigError::CascadePath(target.path.display().to_string()));
        }
        let range = match previous {
            None => CountRange::full(target.n),
            Some(prev) => CountRange::following(prev.n, target.n),
        };
        segments.push(CascadeSegment {
            path: target.path.clone(),
            range,
            include: previous.map(|p| include_name(&p.path)),
        });
        previous = Some(target);
    }
    Ok(segments)
}

fn include_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::lower::{FamilyShape, lower_family};

    fn targets(ns: &[usize]) -> Vec<Target> {
        ns.iter()
            .map(|&n| Target { path: PathBuf::from(format!("out/fe_2_{n}.h")), n })
            .collect()
    }

    fn emitted_counts(k: usize, include_zero: bool, segments: &[CascadeSegment]) -> Vec<usize> {
        let shape = FamilyShape::tuple(k, "T_%_#", include_zero).unwrap();
        let prefix = format!("T_{k}_");
        segments
            .iter()
            .flat_map(|seg| lower_family(&shape, seg.range).defines().cloned().collect::<Vec<_>>())
            .map(|d| d.name.strip_prefix(&prefix).unwrap().parse::<usize>().unwrap())
            .collect()
    }

    #[test]
    fn two_segments_for_pairs() {
        let segments = plan_cascade(&targets(&[4, 8])).unwrap();
        assert_eq!(segments[0].range, CountRange::full(4));
        assert_eq!(segments[0].include, None);
        assert_eq!(segments[1].range, CountRange::following(4, 8));
        assert_eq!(segments[1].include.as_deref(), Some("fe_2_4.h"));

        assert_eq!(emitted_counts(2, false, &segments[..1]), vec![2, 4]);
        assert_eq!(emitted_counts(2, true, &segments[..1]), vec![0, 2, 4]);
        assert_eq!(emitted_counts(2, true, &segments[1..]), vec![6, 8]);
    }

    #[test]
    fn coverage_is_lossless_and_disjoint() {
        let chains: [&[usize]; 7] = [
            &[4, 8],
            &[1, 2, 3],
            &[5, 17, 18, 40],
            &[64],
            &[0, 4],
            &[0, 8, 16, 24, 32, 40, 48, 56, 64],
            &[0],
        ];
        for ns in chains {
            let segments = plan_cascade(&targets(ns)).unwrap();
            let last = *ns.last().unwrap();
            for k in 1..=6 {
                for include_zero in [false, true] {
                    let counts = emitted_counts(k, include_zero, &segments);
                    let unique: BTreeSet<usize> = counts.iter().copied().collect();
                    assert_eq!(unique.len(), counts.len(), "duplicate N for k={k}, chain {ns:?}");
                    let expected: BTreeSet<usize> = (0..=last)
                        .filter(|n| n % k == 0 && (include_zero || *n != 0))
                        .collect();
                    assert_eq!(unique, expected, "k={k}, chain {ns:?}");
                }
            }
        }
    }

    #[test]
    fn rejects_non_increasing() {
        assert_eq!(
            plan_cascade(&targets(&[8, 4])),
            Err(ConfigError::CascadeOrder { previous: 8, next: 4 })
        );
        assert!(plan_cascade(&targets(&[4, 4])).is_err());
    }

    #[test]
    fn chain_from_zero_has_one_first_link() {
        let segments = plan_cascade(&targets(&[0, 4])).unwrap();
        assert!(segments[0].range.is_first());
        assert!(!segments[1].range.is_first());
        assert_eq!(segments[1].range.after, 0);
        assert_eq!(emitted_counts(2, true, &segments), vec![0, 2, 4]);
    }

    #[test]
    fn rejects_shared_paths() {
        let same = vec![
            Target { path: PathBuf::from("out/fixed_tuple2.h"), n: 4 },
            Target { path: PathBuf::from("out/fixed_tuple2.h"), n: 8 },
        ];
        assert_eq!(
            plan_cascade(&same),
            Err(ConfigError::CascadePath(PathBuf::from("out/fixed_tuple2.h").display().to_string()))
        );

        let revisit = vec![
            Target { path: PathBuf::from("a.h"), n: 1 },
            Target { path: PathBuf::from("b.h"), n: 2 },
            Target { path: PathBuf::from("a.h"), n: 3 },
        ];
        assert!(matches!(plan_cascade(&revisit), Err(ConfigError::CascadePath(_))));
    }

    #[test]
    fn empty_chain() {
        assert!(plan_cascade(&[]).unwrap().is_empty());
    }
}
