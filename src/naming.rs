//! Naming templates: `%` is the tuple arity, `#` is the argument count.
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, is_c_ident};

pub const ARITY_MARKER: char = '%';
pub const COUNT_MARKER: char = '#';

pub const DEFAULT_TUPLE_NAMING: &str = "D_INTERNAL_FOR_EACH_%_TUPLE_SEPARATOR_#";

/// A validated tuple naming template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTemplate(String);

impl NamingTemplate {
    /// `arity_count` is how many tuple arities will share this template.
    pub fn new(template: &str, arity_count: usize) -> ConfigResult<Self> {
        let counts = template.matches(COUNT_MARKER).count();
        if counts != 1 {
            return Err(ConfigError::CountPlaceholder {
                template: template.to_string(),
                marker: COUNT_MARKER,
                found: counts,
            });
        }
        let arities = template.matches(ARITY_MARKER).count();
        if arities > 1 {
            return Err(ConfigError::ArityPlaceholder {
                template: template.to_string(),
                marker: ARITY_MARKER,
                found: arities,
            });
        }
        if arity_count > 1 && arities == 0 {
            return Err(ConfigError::AmbiguousNaming {
                template: template.to_string(),
                marker: ARITY_MARKER,
            });
        }
        let probe = substitute(template, 1, "1");
        if !is_c_ident(&probe) {
            return Err(ConfigError::NotIdentifier {
                what: "--tuple-naming-convention",
                value: template.to_string(),
            });
        }
        Ok(Self(template.to_string()))
    }

    /// A template no tuple family will be named from; accepted as given.
    pub fn unused(template: &str) -> Self {
        Self(template.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Template for one arity, with its alias applied.
    ///
    /// The arity is substituted first, then the literal fragment `_<k>_TUPLE_` is rewritten
    /// into `_<alias>_`. Returns `None` when that fragment is absent, so callers can warn.
    pub fn aliased(&self, arity: usize, alias: &str) -> Option<String> {
        let fragment = format!("_{arity}_TUPLE_");
        let resolved = substitute_arity(&self.0, arity);
        if !resolved.contains(&fragment) {
            return None;
        }
        Some(resolved.replace(&fragment, &format!("_{alias}_")))
    }
}

/// Arity first, then count; count digits are never re-substituted.
pub fn substitute(template: &str, arity: usize, count: &str) -> String {
    substitute_arity(template, arity).replace(COUNT_MARKER, count)
}

fn substitute_arity(template: &str, arity: usize) -> String {
    template.replace(ARITY_MARKER, &arity.to_string())
}

/// File path for one tuple arity: `%` is substituted, or `_tuple<k>` is appended before
/// the extension.
pub fn apply_tuple_to_path(path: &Path, arity: usize) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.contains(ARITY_MARKER) {
        return PathBuf::from(substitute_arity(&raw, arity));
    }
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}_tuple{arity}.{}", ext.to_string_lossy()),
        None => format!("{stem}_tuple{arity}"),
    };
    path.with_file_name(file_name)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_then_count() {
        assert_eq!(substitute("FOO_%_BAR_#", 3, "9"), "FOO_3_BAR_9");
        assert_eq!(substitute(DEFAULT_TUPLE_NAMING, 2, ""), "D_INTERNAL_FOR_EACH_2_TUPLE_SEPARATOR_");
    }

    #[test]
    fn injective_over_counts_and_arities() {
        let mut seen = std::collections::BTreeSet::new();
        for k in 1..=16 {
            for n in 0..=40 {
                assert!(seen.insert(substitute("T_%_N_#", k, &n.to_string())));
            }
        }
    }

    #[test]
    fn validation() {
        assert!(NamingTemplate::new("FOO_%_BAR_#", 5).is_ok());
        assert!(NamingTemplate::new("PAIRS_#", 1).is_ok());
        assert!(matches!(
            NamingTemplate::new("PAIRS_#", 2),
            Err(ConfigError::AmbiguousNaming { .. })
        ));
        assert!(matches!(
            NamingTemplate::new("FOO_%", 1),
            Err(ConfigError::CountPlaceholder { found: 0, .. })
        ));
        assert!(matches!(
            NamingTemplate::new("FOO_#_#", 1),
            Err(ConfigError::CountPlaceholder { found: 2, .. })
        ));
        assert!(matches!(
            NamingTemplate::new("F_%_%_#", 1),
            Err(ConfigError::ArityPlaceholder { .. })
        ));
        assert!(matches!(
            NamingTemplate::new("FOO-%-#", 1),
            Err(ConfigError::NotIdentifier { .. })
        ));
    }

    #[test]
    fn alias_rewrites_tuple_fragment() {
        let t = NamingTemplate::new(DEFAULT_TUPLE_NAMING, 2).unwrap();
        let aliased = t.aliased(2, "PAIRWISE").unwrap();
        assert_eq!(substitute(&aliased, 2, "4"), "D_INTERNAL_FOR_EACH_PAIRWISE_SEPARATOR_4");
    }

    #[test]
    fn alias_without_fragment_is_reported() {
        let t = NamingTemplate::new("MY_%_GROUPS_#", 2).unwrap();
        assert_eq!(t.aliased(2, "PAIRWISE"), None);
    }

    #[test]
    fn alias_on_fixed_template() {
        let t = NamingTemplate::new("X_3_TUPLE_#", 1).unwrap();
        assert_eq!(t.aliased(3, "TRI").as_deref(), Some("X_TRI_#"));
        assert_eq!(t.aliased(4, "QUAD"), None);
    }

    #[test]
    fn tuple_paths() {
        assert_eq!(apply_tuple_to_path(Path::new("out/fe_%_#.h"), 4), PathBuf::from("out/fe_4_#.h"));
        assert_eq!(apply_tuple_to_path(Path::new("out/fe_64.h"), 4), PathBuf::from("out/fe_64_tuple4.h"));
        assert_eq!(apply_tuple_to_path(Path::new("fe"), 2), PathBuf::from("fe_tuple2"));
    }
}
