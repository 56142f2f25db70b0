//! Macro families: a closed set of macro shapes and their fixed properties.
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// Process-wide name → family table. Built once, read-only afterwards.
static FAMILY_NAMES: Lazy<HashMap<&'static str, Family>> = Lazy::new(|| {
    HashMap::from([
        ("for_each", Family::ForEach),
        ("foreach", Family::ForEach),
        ("separator", Family::Separator),
        ("for_each_separator", Family::Separator),
        ("pair", Family::Pair),
        ("for_each_pair", Family::Pair),
        ("pair_separator", Family::PairSeparator),
        ("for_each_pair_separator", Family::PairSeparator),
        ("triple", Family::Triple),
        ("for_each_triple", Family::Triple),
        ("triple_separator", Family::TripleSeparator),
        ("for_each_triple_separator", Family::TripleSeparator),
        ("data_separator", Family::DataSeparator),
        ("for_each_data_separator", Family::DataSeparator),
        ("tuple", Family::Tuple),
        ("tuples", Family::Tuple),
        ("wrappers", Family::Wrappers),
        ("wrapper", Family::Wrappers),
    ])
});

pub const PAIR_ERROR_TOKEN: &str = "D_INTERNAL_FOR_EACH_PAIR__ODD_ARG_COUNT_ERROR";
pub const TRIPLE_ERROR_TOKEN: &str = "D_INTERNAL_FOR_EACH_TRIPLE__BAD_ARG_COUNT_ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    ForEach,
    Separator,
    Pair,
    PairSeparator,
    Triple,
    TripleSeparator,
    DataSeparator,
    /// Generic tuple-of-arity-k; the arity travels separately.
    Tuple,
    /// Convenience dispatchers over the other families.
    Wrappers,
}

impl Family {
    /// Families with an `N`-indexed macro set, in emission order (tuples excluded).
    pub const INDEXED: [Family; 7] = [
        Family::ForEach,
        Family::Separator,
        Family::Pair,
        Family::PairSeparator,
        Family::Triple,
        Family::TripleSeparator,
        Family::DataSeparator,
    ];

    /// Case-insensitive; `-` and `_` are interchangeable.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        FAMILY_NAMES.get(normalized.as_str()).copied()
    }

    /// Leading non-variadic parameters of every macro in the family.
    pub fn fixed_params(self) -> &'static [&'static str] {
        match self {
            Family::ForEach | Family::Pair | Family::Triple => &["_fn"],
            Family::Separator | Family::PairSeparator | Family::TripleSeparator | Family::Tuple => {
                &["_fn", "_sep"]
            }
            Family::DataSeparator => &["_fn", "_sep", "_data"],
            Family::Wrappers => &[],
        }
    }

    pub fn fixed_args(self) -> usize {
        self.fixed_params().len()
    }

    /// Parameters consumed per call. `None` for tuples, whose group size is their arity.
    pub fn group_size(self) -> Option<usize> {
        match self {
            Family::Pair | Family::PairSeparator => Some(2),
            Family::Triple | Family::TripleSeparator => Some(3),
            Family::Tuple => None,
            _ => Some(1),
        }
    }

    pub fn separated(self) -> bool {
        matches!(
            self,
            Family::Separator
                | Family::PairSeparator
                | Family::TripleSeparator
                | Family::DataSeparator
                | Family::Tuple
        )
    }

    /// Body substituted for counts the family cannot group.
    pub fn error_token(self) -> Option<&'static str> {
        match self {
            Family::Pair | Family::PairSeparator => Some(PAIR_ERROR_TOKEN),
            Family::Triple | Family::TripleSeparator => Some(TRIPLE_ERROR_TOKEN),
            _ => None,
        }
    }

    /// Name fragment between `D_INTERNAL_` and the count; replaced by family aliases.
    pub fn stem(self) -> Option<&'static str> {
        match self {
            Family::ForEach => Some("FOR_EACH"),
            Family::Separator => Some("FOR_EACH_SEPARATOR"),
            Family::Pair => Some("FOR_EACH_PAIR"),
            Family::PairSeparator => Some("FOR_EACH_PAIR_SEPARATOR"),
            Family::Triple => Some("FOR_EACH_TRIPLE"),
            Family::TripleSeparator => Some("FOR_EACH_TRIPLE_SEPARATOR"),
            Family::DataSeparator => Some("FOR_EACH_DATA_SEPARATOR"),
            Family::Tuple | Family::Wrappers => None,
        }
    }

    /// Public dispatcher name emitted among the wrappers.
    pub fn wrapper_name(self) -> Option<&'static str> {
        match self {
            Family::ForEach => Some("D_FOR_EACH"),
            Family::Separator => Some("D_FOR_EACH_SEPARATOR"),
            Family::Pair => Some("D_FOR_EACH_PAIR"),
            Family::PairSeparator => Some("D_FOR_EACH_PAIR_SEPARATOR"),
            Family::Triple => Some("D_FOR_EACH_TRIPLE"),
            Family::TripleSeparator => Some("D_FOR_EACH_TRIPLE_SEPARATOR"),
            Family::DataSeparator => Some("D_FOR_EACH_DATA_SEPARATOR"),
            Family::Tuple | Family::Wrappers => None,
        }
    }

    /// Section title suffix and the note that follows the zero-case.
    pub fn annotations(self) -> (&'static str, Option<&'static str>) {
        match self {
            Family::Pair | Family::PairSeparator => (
                " (even only)",
                Some("odd counts expand to an undefined token to force a diagnostic"),
            ),
            Family::Triple | Family::TripleSeparator => (
                " (divisible by 3 only)",
                Some("non-multiples of 3 expand to an undefined token to force a diagnostic"),
            ),
            _ => ("", None),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::ForEach => "for_each",
            Family::Separator => "separator",
            Family::Pair => "pair",
            Family::PairSeparator => "pair_separator",
            Family::Triple => "triple",
            Family::TripleSeparator => "triple_separator",
            Family::DataSeparator => "data_separator",
            Family::Tuple => "tuple",
            Family::Wrappers => "wrappers",
        };
        f.write_str(name)
    }
}
