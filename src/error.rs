//! Configuration errors. Everything here is raised before any output is produced.

/// A rejected generator configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid interval '{0}': expected format (start,end,step)")]
    MalformedInterval(String),

    #[error("interval step cannot be 0 (in '{0}')")]
    ZeroStep(String),

    #[error("invalid tuple range '{0}': expected like 4-16")]
    MalformedTupleRange(String),

    #[error("either --max or --intervals must be provided")]
    MissingCount,

    #[error("naming template '{template}' must contain exactly one '{marker}' ({found} found)")]
    CountPlaceholder { template: String, marker: char, found: usize },

    #[error("naming template '{template}' may contain at most one '{marker}' ({found} found)")]
    ArityPlaceholder { template: String, marker: char, found: usize },

    #[error("naming template '{template}' must contain '{marker}' when generating multiple tuple arities")]
    AmbiguousNaming { template: String, marker: char },

    #[error("{what} must be a C identifier (got {value:?})")]
    NotIdentifier { what: &'static str, value: String },

    #[error("tuple arity {0} is out of range (supported: 1..=16)")]
    ArityOutOfRange(usize),

    #[error("tuple arity must be >= 1")]
    ZeroArity,

    #[error("unknown family or tuple selector '{0}'")]
    UnknownSelector(String),

    #[error("'{0}' cannot be aliased as a family; use tuple<k>=ALIAS for tuple arities")]
    NotAliasable(String),

    #[error("invalid {what} '{value}': expected 'key=value'")]
    MalformedPair { what: &'static str, value: String },

    #[error("cascade targets must be strictly increasing in N ({previous} is followed by {next})")]
    CascadeOrder { previous: usize, next: usize },

    #[error("cascade targets must resolve to distinct files ('{0}' appears more than once)")]
    CascadePath(String),

    #[error("{0}")]
    Bound(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Simple "good enough" C identifier check.
pub fn is_c_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn require_ident(what: &'static str, value: &str) -> ConfigResult<()> {
    if is_c_ident(value) {
        Ok(())
    } else {
        Err(ConfigError::NotIdentifier { what, value: value.to_string() })
    }
}

/// A macro prefix like `D_INTERNAL_INC_`: trailing underscores aside, it must start an identifier.
pub fn require_prefix(what: &'static str, value: &str) -> ConfigResult<()> {
    if is_c_ident(value.trim_end_matches('_')) {
        Ok(())
    } else {
        Err(ConfigError::NotIdentifier { what, value: value.to_string() })
    }
}
