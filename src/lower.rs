use crate::error::{ConfigError, ConfigResult};
use crate::family::Family;
use crate::ir::{Body, Define, Item, Section};
use crate::naming;

/// Count range `(after, through]` of one document.
///
/// Zero-cases, diagnostics notes and wrappers belong to the first document of a chain
/// only. A chain may start at N = 0, so `after == 0` alone does not make a range first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    pub after: usize,
    pub through: usize,
    first: bool,
}

impl CountRange {
    /// Everything up to `through`, zero-case included.
    pub fn full(through: usize) -> Self {
        Self { after: 0, through, first: true }
    }

    /// A later link of a chain: only `after + 1..=through`.
    pub fn following(after: usize, through: usize) -> Self {
        Self { after, through, first: false }
    }

    pub fn is_first(&self) -> bool {
        self.first
    }

    /// Same start, end clamped to a family cap.
    pub fn capped(&self, cap: usize) -> Self {
        Self { through: self.through.min(cap), ..*self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroName {
    /// `<prefix><N>`, e.g. `D_INTERNAL_FOR_EACH_PAIR_`.
    Prefixed(String),
    /// Naming template (`%`, `#`) for a tuple arity.
    Templated { template: String, arity: usize },
}

impl MacroName {
    pub fn for_count(&self, count: &str) -> String {
        match self {
            MacroName::Prefixed(prefix) => format!("{prefix}{count}"),
            MacroName::Templated { template, arity } => naming::substitute(template, *arity, count),
        }
    }
}

/// One family instance: tag, naming, and group size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyShape {
    pub family: Family,
    pub name: MacroName,
    pub group: usize,
    pub emit_zero: bool,
}

impl FamilyShape {
    /// A non-tuple family under the given base name (`D_INTERNAL_<stem>_`).
    pub fn indexed(family: Family, base: impl Into<String>) -> Self {
        Self {
            family,
            name: MacroName::Prefixed(base.into()),
            group: family.group_size().unwrap_or(1),
            emit_zero: true,
        }
    }

    pub fn tuple(arity: usize, template: impl Into<String>, include_zero: bool) -> ConfigResult<Self> {
        if arity < 1 {
            return Err(ConfigError::ZeroArity);
        }
        Ok(Self {
            family: Family::Tuple,
            name: MacroName::Templated { template: template.into(), arity },
            group: arity,
            emit_zero: include_zero,
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FAMILY BODIES
// ————————————————————————————————————————————————————————————————————————————

pub fn lower_family(shape: &FamilyShape, range: CountRange) -> Section {
    let mut items = Vec::<Item>::new();

    if range.is_first() {
        if shape.emit_zero {
            items.push(Item::Define(variadic_define(shape, 0, Body::Nothing)));
        }
        if let (_, Some(note)) = shape.family.annotations() {
            items.push(Item::Comment(note.to_string()));
        }
    }

    for n in (range.after + 1)..=range.through {
        if let Some(define) = lower_count(shape, n) {
            items.push(Item::Define(define));
        }
    }
    items.push(Item::Blank);

    Section { title: section_title(shape), items }
}

/// The macro for a single N, or `None` when the family omits invalid counts.
pub fn lower_count(shape: &FamilyShape, n: usize) -> Option<Define> {
    if n == 0 {
        return Some(variadic_define(shape, 0, Body::Nothing));
    }
    if n % shape.group != 0 {
        let token = shape.family.error_token()?;
        return Some(variadic_define(shape, n, Body::ErrorToken(token)));
    }

    let mut params: Vec<String> = fixed_params(shape);
    params.extend((1..=n).map(|i| format!("_{i}")));

    let calls: Vec<String> = (1..=n)
        .step_by(shape.group)
        .map(|first| {
            let mut args = Vec::<String>::with_capacity(shape.group + 1);
            if shape.family == Family::DataSeparator {
                args.push("_data".into());
            }
            args.extend((first..first + shape.group).map(|j| format!("_{j}")));
            format!("_fn({})", args.join(", "))
        })
        .collect();

    let joiner = if shape.family.separated() { " _sep " } else { " " };
    let name = shape.name.for_count(&n.to_string());
    Some(Define::new(name, params, Body::Expansion(calls.join(joiner))))
}

fn fixed_params(shape: &FamilyShape) -> Vec<String> {
    shape.family.fixed_params().iter().map(|p| p.to_string()).collect()
}

/// Fixed parameters plus `...`: keeps the name definable without binding N parameters.
fn variadic_define(shape: &FamilyShape, n: usize, body: Body) -> Define {
    let mut params = fixed_params(shape);
    params.push("...".into());
    Define::new(shape.name.for_count(&n.to_string()), params, body)
}

fn section_title(shape: &FamilyShape) -> Vec<String> {
    let generic = shape.name.for_count("N");
    match shape.family {
        Family::Tuple => vec![
            format!("--- {generic} (counts divisible by {}) ---", shape.group),
            "Only valid counts are emitted.".to_string(),
        ],
        family => {
            let (suffix, _) = family.annotations();
            vec![format!("--- {generic}{suffix} ---")]
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONVENIENCE WRAPPERS
// ————————————————————————————————————————————————————————————————————————————

/// Dispatchers over `D_CONCAT(<base>, D_VARG_COUNT(__VA_ARGS__))`.
///
/// `families` pairs each emitted family with its (possibly aliased) base name;
/// `tuples` pairs each arity with its resolved tuple name prefix.
pub fn lower_wrappers(families: &[(Family, String)], tuples: &[(usize, String)]) -> Section {
    let mut items = vec![Item::Raw(vec![
        "#define D_SEPARATOR_COMMA     ,".to_string(),
        "#define D_SEPARATOR_SEMICOLON ;".to_string(),
        "#define D_SEPARATOR_SPACE     ".to_string(),
    ])];

    let mut push = |lines: Vec<String>| {
        items.push(Item::Blank);
        items.push(Item::Raw(lines));
    };

    for (family, base) in families {
        let Some(public) = family.wrapper_name() else { continue };
        push(dispatcher(public, family.fixed_params(), base));
        if *family == Family::Separator {
            for (suffix, sep) in [("COMMA", "D_SEPARATOR_COMMA"), ("SEMICOLON", "D_SEPARATOR_SEMICOLON")] {
                push(vec![
                    format!("#define D_FOR_EACH_{suffix}(_fn, ...) \\"),
                    format!("    D_FOR_EACH_SEPARATOR(_fn, {sep}, __VA_ARGS__)"),
                ]);
            }
        }
    }
    for (k, base) in tuples {
        let public = format!("D_FOR_EACH_{k}_TUPLE_SEPARATOR");
        push(dispatcher(&public, Family::Tuple.fixed_params(), base));
    }
    items.push(Item::Blank);

    Section {
        title: vec!["--- Convenience wrappers (require D_CONCAT + D_VARG_COUNT) ---".to_string()],
        items,
    }
}

fn dispatcher(public: &str, fixed: &[&str], base: &str) -> Vec<String> {
    let params = fixed.iter().copied().chain(["..."]).collect::<Vec<_>>().join(", ");
    let args = fixed.iter().copied().chain(["__VA_ARGS__"]).collect::<Vec<_>>().join(", ");
    vec![
        format!("#define {public}({params}) \\"),
        format!("    D_CONCAT({base}, D_VARG_COUNT(__VA_ARGS__))({args})"),
    ]
}

// ------------------------------- Tests ------------------------------------ //
