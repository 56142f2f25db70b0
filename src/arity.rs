//! Tuple arity selection and the selector keys shared by filters and overrides.
use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConfigError, ConfigResult};
use crate::family::Family;

pub const MIN_ARITY: usize = 1;
pub const MAX_ARITY: usize = 16;

static TUPLE_RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").unwrap());

// ————————————————————————————————————————————————————————————————————————————
// SELECTORS
// ————————————————————————————————————————————————————————————————————————————

/// Stable key for filters and per-target overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selector {
    All,
    Family(Family),
    Tuple(usize),
}

impl Selector {
    /// `all`, `tuple<k>`, a bare `k`, or a family name.
    pub fn parse(src: &str) -> ConfigResult<Self> {
        let key = src.trim();
        if key.eq_ignore_ascii_case("all") {
            return Ok(Selector::All);
        }
        let lowered = key.to_ascii_lowercase();
        let digits = lowered
            .strip_prefix("tuple")
            .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            .or_else(|| Some(key).filter(|k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit())));
        if let Some(digits) = digits {
            let k: usize = digits
                .parse()
                .map_err(|_| ConfigError::UnknownSelector(key.to_string()))?;
            if !(MIN_ARITY..=MAX_ARITY).contains(&k) {
                return Err(ConfigError::ArityOutOfRange(k));
            }
            return Ok(Selector::Tuple(k));
        }
        Family::parse(key)
            .map(Selector::Family)
            .ok_or_else(|| ConfigError::UnknownSelector(key.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all"),
            Selector::Family(family) => write!(f, "{family}"),
            Selector::Tuple(k) => write!(f, "tuple{k}"),
        }
    }
}

/// Include/exclude sets. An empty include admits everything; exclude always wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter<T: Ord> {
    pub include: BTreeSet<T>,
    pub exclude: BTreeSet<T>,
}

impl<T: Ord> Default for Filter<T> {
    fn default() -> Self {
        Self { include: BTreeSet::new(), exclude: BTreeSet::new() }
    }
}

impl<T: Ord> Filter<T> {
    pub fn admits(&self, item: &T) -> bool {
        (self.include.is_empty() || self.include.contains(item)) && !self.exclude.contains(item)
    }
}

/// Split `--only`/`--exclude` selectors into family and tuple filters.
pub fn build_filters(only: &[String], exclude: &[String]) -> ConfigResult<(Filter<Family>, Filter<usize>)> {
    let mut families = Filter::<Family>::default();
    let mut tuples = Filter::<usize>::default();
    for (items, include) in [(only, true), (exclude, false)] {
        for item in items {
            match Selector::parse(item)? {
                Selector::Family(f) if include => { families.include.insert(f); }
                Selector::Family(f) => { families.exclude.insert(f); }
                Selector::Tuple(k) if include => { tuples.include.insert(k); }
                Selector::Tuple(k) => { tuples.exclude.insert(k); }
                Selector::All => return Err(ConfigError::UnknownSelector(item.clone())),
            }
        }
    }
    // `--only pair tuple2` means the pair family and the 2-tuple family
    if !families.include.is_empty() && !tuples.include.is_empty() {
        families.include.insert(Family::Tuple);
    }
    Ok((families, tuples))
}

// ————————————————————————————————————————————————————————————————————————————
// ARITY RESOLUTION
// ————————————————————————————————————————————————————————————————————————————

/// Raw arity inputs, before resolution.
#[derive(Debug, Clone)]
pub struct ArityRequest {
    pub no_tuples: bool,
    /// Per-arity flags (`--3-tuple`).
    pub flags: Vec<usize>,
    /// Inclusive `lo-hi` ranges, either order.
    pub ranges: Vec<String>,
    /// Explicit list; replaces flags and ranges when non-empty.
    pub explicit: Option<Vec<usize>>,
    pub fallback_min: usize,
    pub fallback_max: usize,
}

impl Default for ArityRequest {
    fn default() -> Self {
        Self {
            no_tuples: false,
            flags: Vec::new(),
            ranges: Vec::new(),
            explicit: None,
            fallback_min: 4,
            fallback_max: MAX_ARITY,
        }
    }
}

pub fn parse_tuple_range(tok: &str) -> ConfigResult<(usize, usize)> {
    let caps = TUPLE_RANGE_RE
        .captures(tok)
        .ok_or_else(|| ConfigError::MalformedTupleRange(tok.to_string()))?;
    let bound = |i: usize| {
        caps[i]
            .parse::<usize>()
            .map_err(|_| ConfigError::MalformedTupleRange(tok.to_string()))
    };
    let (a, b) = (bound(1)?, bound(2)?);
    Ok(if a <= b { (a, b) } else { (b, a) })
}

/// Sorted, deduplicated arities within `1..=16`; anything outside is dropped.
pub fn resolve_tuple_arities(req: &ArityRequest) -> ConfigResult<Vec<usize>> {
    if req.no_tuples {
        return Ok(Vec::new());
    }

    let mut chosen = BTreeSet::<usize>::new();
    chosen.extend(req.flags.iter().copied());
    for tok in &req.ranges {
        let (lo, hi) = parse_tuple_range(tok)?;
        chosen.extend(lo..=hi);
    }
    if let Some(explicit) = req.explicit.as_ref().filter(|xs| !xs.is_empty()) {
        chosen = explicit.iter().copied().collect();
    }
    if chosen.is_empty() {
        chosen.extend(req.fallback_min..=req.fallback_max);
    }

    Ok(chosen
        .into_iter()
        .filter(|k| (MIN_ARITY..=MAX_ARITY).contains(k))
        .collect())
}

// ------------------------------- Tests ------------------------------------ //
