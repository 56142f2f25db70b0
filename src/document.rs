//! One output document: families in fixed order, each capped and bounded to the count range.
use crate::cap;
use crate::config::GeneratorConfig;
use crate::error::ConfigResult;
use crate::family::Family;
use crate::ir::{Document, Section};
use crate::lower::{CountRange, lower_family, lower_wrappers};
use crate::naming;

/// Families emitted before the tuple sections.
const LEADING: [Family; 6] = [
    Family::ForEach,
    Family::Separator,
    Family::Pair,
    Family::PairSeparator,
    Family::Triple,
    Family::TripleSeparator,
];

/// Assemble the document for `range`, carrying tuple sections for `arities`.
///
/// `include` names the previous cascade segment. Wrappers are only emitted by the
/// first document of a chain.
pub fn build_document(
    config: &GeneratorConfig,
    arities: &[usize],
    range: CountRange,
    include: Option<String>,
) -> ConfigResult<Document> {
    let mut sections = Vec::<Section>::new();

    for family in LEADING {
        if config.includes(family) {
            sections.push(indexed_section(config, family, range));
        }
    }

    let mut tuple_bases = Vec::<(usize, String)>::new();
    if config.includes(Family::Tuple) {
        for &k in arities {
            let shape = config.tuple_shape(k)?;
            let cap = cap::family_max(Family::Tuple, k, range.through, config.strict);
            sections.push(lower_family(&shape, range.capped(cap)));
            tuple_bases.push((k, naming::substitute(&config.tuple_template(k), k, "")));
        }
    }

    if config.includes(Family::DataSeparator) {
        sections.push(indexed_section(config, Family::DataSeparator, range));
    }

    if config.includes(Family::Wrappers) && range.is_first() {
        let families: Vec<(Family, String)> = Family::INDEXED
            .into_iter()
            .filter(|f| config.includes(*f))
            .map(|f| (f, config.family_base(f)))
            .collect();
        sections.push(lower_wrappers(&families, &tuple_bases));
    }

    Ok(Document { preamble: Vec::new(), include, sections })
}

fn indexed_section(config: &GeneratorConfig, family: Family, range: CountRange) -> Section {
    let cap = cap::family_max(family, 0, range.through, config.strict);
    lower_family(&config.indexed_shape(family), range.capped(cap))
}

// ------------------------------- Tests ------------------------------------ //
