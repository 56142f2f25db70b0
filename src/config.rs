//! Generator configuration: raw settings in, validated immutable config out.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::arity::{self, ArityRequest, Filter, Selector};
use crate::error::{ConfigError, ConfigResult, is_c_ident};
use crate::family::Family;
use crate::lower::FamilyShape;
use crate::naming::{self, NamingTemplate};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Which families a document carries at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Full,
    /// The separator base family plus tuples.
    TuplesOnly,
    /// Tuples and nothing else.
    PureTuples,
}

/// Unvalidated inputs, as gathered by the CLI.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub strict: bool,
    pub layout: Layout,
    pub no_wrappers: bool,
    pub force_wrappers: bool,
    pub include_zero_tuple: bool,
    pub arities: ArityRequest,
    pub tuple_naming: String,
    pub tuple_per_file: bool,
    pub cascade: bool,
    pub only: Vec<String>,
    pub exclude: Vec<String>,
    /// `selector=ALIAS`
    pub aliases: Vec<String>,
    /// `selector=DIR`
    pub destinations: Vec<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            strict: false,
            layout: Layout::Full,
            no_wrappers: false,
            force_wrappers: false,
            include_zero_tuple: false,
            arities: ArityRequest::default(),
            tuple_naming: naming::DEFAULT_TUPLE_NAMING.to_string(),
            tuple_per_file: false,
            cascade: false,
            only: Vec::new(),
            exclude: Vec::new(),
            aliases: Vec::new(),
            destinations: Vec::new(),
        }
    }
}

/// Resolved selection, cap, naming and cascade decisions. Read-only once built.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub strict: bool,
    pub layout: Layout,
    pub wrappers: bool,
    /// Final tuple arities: resolved, bounded, filtered, ascending.
    pub tuple_arities: Vec<usize>,
    pub tuple_per_file: bool,
    pub cascade: bool,
    pub include_zero_tuple: bool,
    families: Filter<Family>,
    tuple_naming: NamingTemplate,
    aliases: IndexMap<Selector, String>,
    destinations: IndexMap<Selector, PathBuf>,
    /// Accepted but suspicious settings, for the caller to report.
    pub warnings: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// BUILD
// ————————————————————————————————————————————————————————————————————————————

impl GeneratorConfig {
    pub fn build(settings: &GeneratorSettings) -> ConfigResult<Self> {
        let mut warnings = Vec::<String>::new();

        let (families, tuples) = arity::build_filters(&settings.only, &settings.exclude)?;
        let tuple_arities: Vec<usize> = if families.admits(&Family::Tuple) {
            arity::resolve_tuple_arities(&settings.arities)?
                .into_iter()
                .filter(|k| tuples.admits(k))
                .collect()
        } else {
            Vec::new()
        };

        // only checked when some tuple family will actually be named from it
        let tuple_naming = if tuple_arities.is_empty() {
            NamingTemplate::unused(&settings.tuple_naming)
        } else {
            NamingTemplate::new(&settings.tuple_naming, tuple_arities.len())?
        };

        let mut aliases = IndexMap::<Selector, String>::new();
        for raw in &settings.aliases {
            let (selector, alias) = split_pair("alias", raw)?;
            match selector {
                Selector::All | Selector::Family(Family::Tuple) | Selector::Family(Family::Wrappers) => {
                    return Err(ConfigError::NotAliasable(selector.to_string()));
                }
                _ => {}
            }
            if !is_c_ident(&alias) {
                return Err(ConfigError::NotIdentifier { what: "--alias value", value: alias });
            }
            if let Selector::Tuple(k) = selector {
                if !tuple_arities.contains(&k) {
                    warnings.push(format!("alias for tuple{k} has no effect: arity {k} is not generated"));
                } else if tuple_naming.aliased(k, &alias).is_none() {
                    warnings.push(format!(
                        "alias for tuple{k} has no effect: naming '{}' has no '_{k}_TUPLE_' fragment",
                        tuple_naming.as_str()
                    ));
                }
            }
            aliases.insert(selector, alias);
        }

        let mut destinations = IndexMap::<Selector, PathBuf>::new();
        for raw in &settings.destinations {
            let (selector, dir) = split_pair("destination", raw)?;
            if let Selector::Family(family) = selector {
                warnings.push(format!(
                    "destination for family '{family}' has no effect: families share one document"
                ));
            }
            destinations.insert(selector, PathBuf::from(dir));
        }

        if settings.cascade && !settings.tuple_per_file {
            warnings.push("--cascade has no effect without --tuple-per-file".to_string());
        }
        if settings.tuple_per_file && tuple_arities.is_empty() {
            warnings.push("--tuple-per-file with no tuple arities selected produces no files".to_string());
        }

        let wrappers = if settings.force_wrappers {
            true
        } else {
            !settings.no_wrappers && !settings.strict
        };

        Ok(Self {
            strict: settings.strict,
            layout: settings.layout,
            wrappers,
            tuple_arities,
            tuple_per_file: settings.tuple_per_file,
            cascade: settings.cascade && settings.tuple_per_file,
            include_zero_tuple: settings.include_zero_tuple,
            families,
            tuple_naming,
            aliases,
            destinations,
            warnings,
        })
    }
}

fn split_pair(what: &'static str, raw: &str) -> ConfigResult<(Selector, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::MalformedPair { what, value: raw.to_string() })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MalformedPair { what, value: raw.to_string() });
    }
    Ok((Selector::parse(key)?, value.to_string()))
}

// ————————————————————————————————————————————————————————————————————————————
// LOOKUPS
// ————————————————————————————————————————————————————————————————————————————

impl GeneratorConfig {
    /// Whether `family` appears in generated documents.
    pub fn includes(&self, family: Family) -> bool {
        if !self.families.admits(&family) {
            return false;
        }
        match (family, self.layout) {
            (Family::Tuple, _) => !self.tuple_arities.is_empty(),
            (_, Layout::PureTuples) => false,
            (Family::Separator, Layout::TuplesOnly) => true,
            (_, Layout::TuplesOnly) => false,
            (Family::Wrappers, Layout::Full) => self.wrappers,
            (_, Layout::Full) => true,
        }
    }

    /// `D_INTERNAL_<stem>_`, with the family alias in place of the stem.
    pub fn family_base(&self, family: Family) -> String {
        let stem = self
            .aliases
            .get(&Selector::Family(family))
            .map(String::as_str)
            .or(family.stem())
            .unwrap_or_default();
        format!("D_INTERNAL_{stem}_")
    }

    /// Naming template for one arity, alias applied when it matches.
    pub fn tuple_template(&self, arity: usize) -> String {
        self.aliases
            .get(&Selector::Tuple(arity))
            .and_then(|alias| self.tuple_naming.aliased(arity, alias))
            .unwrap_or_else(|| self.tuple_naming.as_str().to_string())
    }

    pub fn tuple_shape(&self, arity: usize) -> ConfigResult<FamilyShape> {
        FamilyShape::tuple(arity, self.tuple_template(arity), self.include_zero_tuple)
    }

    pub fn indexed_shape(&self, family: Family) -> FamilyShape {
        FamilyShape::indexed(family, self.family_base(family))
    }

    /// First destination override among `keys`.
    pub fn destination(&self, keys: &[Selector]) -> Option<&Path> {
        keys.iter()
            .find_map(|key| self.destinations.get(key))
            .map(PathBuf::as_path)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn build(f: impl FnOnce(&mut GeneratorSettings)) -> ConfigResult<GeneratorConfig> {
        let mut settings = GeneratorSettings::default();
        f(&mut settings);
        GeneratorConfig::build(&settings)
    }

    #[test]
    fn defaults() {
        let config = build(|_| {}).unwrap();
        assert_eq!(config.tuple_arities, (4..=16).collect::<Vec<_>>());
        assert!(config.wrappers);
        assert!(config.includes(Family::Pair));
        assert!(config.includes(Family::Tuple));
        assert!(config.includes(Family::Wrappers));
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn strict_disables_wrappers_unless_forced() {
        assert!(!build(|s| s.strict = true).unwrap().wrappers);
        let forced = build(|s| {
            s.strict = true;
            s.force_wrappers = true;
        })
        .unwrap();
        assert!(forced.wrappers);
        assert!(!build(|s| s.no_wrappers = true).unwrap().wrappers);
    }

    #[test]
    fn layouts() {
        let tuples_only = build(|s| s.layout = Layout::TuplesOnly).unwrap();
        assert!(tuples_only.includes(Family::Separator));
        assert!(!tuples_only.includes(Family::ForEach));
        assert!(!tuples_only.includes(Family::Wrappers));
        assert!(tuples_only.includes(Family::Tuple));

        let pure = build(|s| s.layout = Layout::PureTuples).unwrap();
        assert!(!pure.includes(Family::Separator));
        assert!(pure.includes(Family::Tuple));
    }

    #[test]
    fn filters_feed_arities() {
        let config = build(|s| {
            s.only = vec!["tuple".into(), "tuple2".into(), "tuple5".into()];
            s.arities.explicit = Some(vec![2, 3, 5]);
        })
        .unwrap();
        assert_eq!(config.tuple_arities, vec![2, 5]);
        assert!(!config.includes(Family::ForEach));

        let no_tuple_family = build(|s| s.exclude = vec!["tuples".into()]).unwrap();
        assert!(no_tuple_family.tuple_arities.is_empty());
        assert!(!no_tuple_family.includes(Family::Tuple));
        assert!(no_tuple_family.includes(Family::ForEach));
    }

    #[test]
    fn naming_checked_against_final_arities() {
        let err = build(|s| s.tuple_naming = "T_#".into()).unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousNaming { .. }));

        let single = build(|s| {
            s.tuple_naming = "T_#".into();
            s.arities.explicit = Some(vec![4]);
        });
        assert!(single.is_ok());

        let no_count = build(|s| s.tuple_naming = "T_%".into());
        assert!(matches!(no_count, Err(ConfigError::CountPlaceholder { .. })));

        let no_tuples = build(|s| {
            s.tuple_naming = "T_%".into();
            s.arities.no_tuples = true;
        });
        assert!(no_tuples.is_ok());

        let excluded = build(|s| {
            s.tuple_naming = "not an identifier".into();
            s.exclude = vec!["tuples".into()];
        });
        assert!(excluded.is_ok());
    }

    #[test]
    fn family_alias_renames_stem() {
        let config = build(|s| s.aliases = vec!["pair=MY_PAIR".into()]).unwrap();
        assert_eq!(config.family_base(Family::Pair), "D_INTERNAL_MY_PAIR_");
        assert_eq!(config.family_base(Family::Triple), "D_INTERNAL_FOR_EACH_TRIPLE_");
    }

    #[test]
    fn tuple_alias_and_warning() {
        let config = build(|s| {
            s.arities.explicit = Some(vec![2, 3]);
            s.aliases = vec!["tuple2=PAIRWISE".into()];
        })
        .unwrap();
        assert_eq!(config.tuple_template(2), "D_INTERNAL_FOR_EACH_PAIRWISE_SEPARATOR_#");
        assert_eq!(config.tuple_template(3), naming::DEFAULT_TUPLE_NAMING);
        assert!(config.warnings.is_empty());

        let custom = build(|s| {
            s.arities.explicit = Some(vec![2, 3]);
            s.tuple_naming = "G_%_#".into();
            s.aliases = vec!["tuple2=PAIRWISE".into()];
        })
        .unwrap();
        assert_eq!(custom.tuple_template(2), "G_%_#");
        assert_eq!(custom.warnings.len(), 1);
        assert!(custom.warnings[0].contains("_2_TUPLE_"));
    }

    #[test]
    fn alias_errors() {
        assert!(matches!(
            build(|s| s.aliases = vec!["pair".into()]),
            Err(ConfigError::MalformedPair { .. })
        ));
        assert!(matches!(
            build(|s| s.aliases = vec!["wrappers=W".into()]),
            Err(ConfigError::NotAliasable(_))
        ));
        assert!(matches!(
            build(|s| s.aliases = vec!["pair=MY PAIR".into()]),
            Err(ConfigError::NotIdentifier { .. })
        ));
        assert!(matches!(
            build(|s| s.aliases = vec!["tuple40=X".into()]),
            Err(ConfigError::ArityOutOfRange(40))
        ));
    }

    #[test]
    fn destinations_fall_back() {
        let config = build(|s| {
            s.destinations = vec!["tuple2=pairs".into(), "all=misc".into(), "pair=x".into()];
        })
        .unwrap();
        assert_eq!(
            config.destination(&[Selector::Tuple(2), Selector::All]),
            Some(Path::new("pairs"))
        );
        assert_eq!(
            config.destination(&[Selector::Tuple(3), Selector::All]),
            Some(Path::new("misc"))
        );
        assert_eq!(config.warnings.len(), 1);
    }

    #[test]
    fn cascade_needs_tuple_per_file() {
        let config = build(|s| s.cascade = true).unwrap();
        assert!(!config.cascade);
        assert_eq!(config.warnings.len(), 1);
    }
}
