//! Interval resolution: `(start,end,step)` progressions → ordered, deduplicated targets.
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConfigError, ConfigResult};
use crate::naming::COUNT_MARKER;

static INTERVAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(\s*([^,]+?)\s*,\s*([^,]+?)\s*,\s*([^,]+?)\s*\)$").unwrap()
});

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Arithmetic progression, both ends inclusive as reached by stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

/// Which count a progression contributes to the output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Substitute {
    /// one target per interval, using its largest value
    #[default]
    Max,
    /// one target per value in the interval
    Each,
}

/// One file's worth of macros for one N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub n: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Interval {
    pub fn parse(src: &str) -> ConfigResult<Self> {
        let src = src.trim();
        let caps = INTERVAL_RE
            .captures(src)
            .ok_or_else(|| ConfigError::MalformedInterval(src.to_string()))?;
        let num = |i: usize| {
            caps[i]
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::MalformedInterval(src.to_string()))
        };
        let (start, end, step) = (num(1)?, num(2)?, num(3)?);
        if step == 0 {
            return Err(ConfigError::ZeroStep(src.to_string()));
        }
        Ok(Self { start, end, step })
    }

    /// Ascending when `step > 0`, descending when `step < 0`. Stops at the `i64` bounds.
    pub fn values(&self) -> Vec<i64> {
        let in_range = |x: i64| if self.step > 0 { x <= self.end } else { x >= self.end };
        let mut out = Vec::new();
        let mut next = Some(self.start);
        while let Some(x) = next.filter(|&x| in_range(x)) {
            out.push(x);
            next = x.checked_add(self.step);
        }
        out
    }
}

/// Resolve the output targets for a run.
///
/// With no intervals the single `fallback_max` target is produced; with intervals,
/// each progression contributes its max (or each of its values). Negative counts are
/// meaningless for macro arity and are dropped. Duplicates by (absolute path, N) keep
/// their first position.
pub fn compute_targets(
    name_pattern: &str,
    outdir: &Path,
    intervals: &[Interval],
    substitute: Substitute,
    fallback_max: Option<usize>,
) -> ConfigResult<Vec<Target>> {
    let mut targets = Vec::<Target>::new();
    let mut push = |n: usize| {
        targets.push(Target {
            path: outdir.join(substitute_count(name_pattern, n)),
            n,
        });
    };

    if intervals.is_empty() {
        push(fallback_max.ok_or(ConfigError::MissingCount)?);
    } else {
        for iv in intervals {
            let values: Vec<usize> = iv
                .values()
                .into_iter()
                .filter_map(|v| usize::try_from(v).ok())
                .collect();
            match substitute {
                Substitute::Max => {
                    if let Some(n) = values.iter().copied().max() {
                        push(n);
                    }
                }
                Substitute::Each => values.into_iter().for_each(&mut push),
            }
        }
    }

    let mut seen = IndexSet::<(PathBuf, usize)>::new();
    targets.retain(|t| seen.insert((absolute(&t.path), t.n)));
    Ok(targets)
}

fn substitute_count(name_pattern: &str, n: usize) -> String {
    name_pattern.replace(COUNT_MARKER, &n.to_string())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(s: &str) -> Interval {
        Interval::parse(s).unwrap()
    }

    #[test]
    fn parses_with_whitespace_and_negative_step() {
        assert_eq!(iv(" ( 1 , 64 , 1 ) "), Interval { start: 1, end: 64, step: 1 });
        assert_eq!(iv("(64,8,-8)"), Interval { start: 64, end: 8, step: -8 });
    }

    #[test]
    fn rejects_malformed_and_zero_step() {
        assert!(matches!(Interval::parse("1,2,3"), Err(ConfigError::MalformedInterval(_))));
        assert!(matches!(Interval::parse("(1,2)"), Err(ConfigError::MalformedInterval(_))));
        assert!(matches!(Interval::parse("(a,2,1)"), Err(ConfigError::MalformedInterval(_))));
        assert!(matches!(Interval::parse("(1,2,0)"), Err(ConfigError::ZeroStep(_))));
    }

    #[test]
    fn stepping_is_inclusive_both_ways() {
        assert_eq!(iv("(8,32,8)").values(), vec![8, 16, 24, 32]);
        assert_eq!(iv("(8,30,8)").values(), vec![8, 16, 24]);
        assert_eq!(iv("(32,8,-8)").values(), vec![32, 24, 16, 8]);
        assert!(iv("(5,1,1)").values().is_empty());
    }

    #[test]
    fn stepping_stops_at_i64_bounds() {
        assert_eq!(
            iv("(9223372036854775806,9223372036854775807,1)").values(),
            vec![i64::MAX - 1, i64::MAX]
        );
        assert_eq!(
            iv("(-9223372036854775807,-9223372036854775808,-1)").values(),
            vec![i64::MIN + 1, i64::MIN]
        );
        assert_eq!(iv("(9223372036854775800,9223372036854775807,5)").values(), vec![i64::MAX - 7, i64::MAX - 2]);
    }

    #[test]
    fn max_and_each_substitution() {
        let out = Path::new("out");
        let ivs = [iv("(8,32,8)")];
        let max = compute_targets("fe_#.h", out, &ivs, Substitute::Max, None).unwrap();
        assert_eq!(max, vec![Target { path: out.join("fe_32.h"), n: 32 }]);

        let each = compute_targets("fe_#.h", out, &ivs, Substitute::Each, None).unwrap();
        let ns: Vec<usize> = each.iter().map(|t| t.n).collect();
        assert_eq!(ns, vec![8, 16, 24, 32]);
        assert_eq!(each[1].path, out.join("fe_16.h"));
    }

    #[test]
    fn overlapping_progressions_dedupe() {
        let out = Path::new("out");
        let ivs = [iv("(2,8,2)"), iv("(4,8,4)")];
        let each = compute_targets("fe_#.h", out, &ivs, Substitute::Each, None).unwrap();
        let ns: Vec<usize> = each.iter().map(|t| t.n).collect();
        assert_eq!(ns, vec![2, 4, 6, 8]);
    }

    #[test]
    fn same_name_different_n_is_kept() {
        let out = Path::new("out");
        let ivs = [iv("(1,4,1)")];
        let each = compute_targets("fixed.h", out, &ivs, Substitute::Each, None).unwrap();
        assert_eq!(each.len(), 4);
    }

    #[test]
    fn fallback_requires_max() {
        let out = Path::new(".");
        assert_eq!(
            compute_targets("a.h", out, &[], Substitute::Max, None),
            Err(ConfigError::MissingCount)
        );
        let t = compute_targets("a_#.h", out, &[], Substitute::Max, Some(0)).unwrap();
        assert_eq!(t[0].n, 0);
        assert_eq!(t[0].path, out.join("a_0.h"));
    }
}
