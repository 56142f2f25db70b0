//! Variadic helper tables: `D_VARG_COUNT`, `D_VARG_GET_ARG_XX`, `D_HAS_ARGS`, increment macros.
//!
//! Each generator validates its own inputs and yields a [`Document`] for the shared
//! codegen and output path.
use clap::Args;

use crate::error::{ConfigError, ConfigResult, require_ident, require_prefix};
use crate::ir::{Document, Item, Section};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Args, Debug, Clone)]
pub struct VargCount {
    /// maximum count supported (e.g. 127 for 0..127)
    pub max: usize,

    /// helper macro name
    #[arg(long, default_value = "D_INTERNAL_VARG_COUNT_HELPER")]
    pub helper_name: String,

    /// public count macro name
    #[arg(long, default_value = "D_VARG_COUNT")]
    pub count_name: String,

    /// leading placeholder argument (may be empty)
    #[arg(long, default_value = "_")]
    pub placeholder: String,

    /// helper parameters per line
    #[arg(long, default_value_t = 12)]
    pub params_per_line: usize,

    /// descending numbers per line
    #[arg(long, default_value_t = 13)]
    pub nums_per_line: usize,

    /// prefix for parameter names
    #[arg(long, default_value = "_")]
    pub param_prefix: String,

    /// first parameter index
    #[arg(long, default_value_t = 0)]
    pub param_start: usize,

    /// step between parameter indices
    #[arg(long, default_value_t = 1)]
    pub param_step: usize,
}

#[derive(Args, Debug, Clone)]
pub struct GetArg {
    /// first N (inclusive)
    pub start: usize,

    /// last N (inclusive)
    pub max: usize,

    /// macro name prefix
    #[arg(long, default_value = "D_VARG_GET_ARG_")]
    pub macro_prefix: String,

    /// parameters per line before wrapping
    #[arg(long, default_value_t = 10)]
    pub per_line: usize,

    /// prefix for parameter names
    #[arg(long, default_value = "_")]
    pub param_prefix: String,

    /// first parameter index
    #[arg(long, default_value_t = 1)]
    pub param_start: usize,

    /// step between parameter indices
    #[arg(long, default_value_t = 1)]
    pub param_step: usize,
}

#[derive(Args, Debug, Clone)]
pub struct HasArgs {
    /// maximum argument count to support (e.g. 64, 128, 256)
    pub max: usize,

    /// macro name to generate
    #[arg(long, default_value = "D_HAS_ARGS")]
    pub macro_name: String,

    /// helper macro to call
    #[arg(long, default_value = "D_INTERNAL_HAS_ARGS_HELPER")]
    pub helper_name: String,

    /// numbers per line
    #[arg(long, default_value_t = 16)]
    pub per_line: usize,

    /// helper placeholders start at _1 instead of _0
    #[arg(long)]
    pub msvc: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Inc {
    /// first N (inclusive)
    pub start: usize,

    /// last N (inclusive)
    pub max: usize,

    /// macro name prefix
    #[arg(long, default_value = "D_INTERNAL_INC_")]
    pub macro_prefix: String,

    /// value added to each index (negative to decrement)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub offset: i64,

    /// first index
    #[arg(long, default_value_t = 0)]
    pub param_start: usize,

    /// step between indices
    #[arg(long, default_value_t = 1)]
    pub param_step: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// GENERATORS
// ————————————————————————————————————————————————————————————————————————————

impl VargCount {
    pub fn document(&self) -> ConfigResult<Document> {
        require_ident("--helper-name", &self.helper_name)?;
        require_ident("--count-name", &self.count_name)?;
        if !self.placeholder.is_empty() {
            require_ident("--placeholder", &self.placeholder)?;
        }
        at_least("--params-per-line", self.params_per_line, 1)?;
        at_least("--nums-per-line", self.nums_per_line, 1)?;
        require_ident("--param-prefix", &self.param_prefix)?;
        at_least("--param-step", self.param_step, 1)?;

        let mut params = indexed_params(&self.param_prefix, self.param_start, self.param_step, self.max + 1);
        params.extend(["N".to_string(), "...".to_string()]);

        let mut helper = vec![format!("#define {}( \\", self.helper_name)];
        helper.extend(wrapped("    ", &params, self.params_per_line, ") N"));

        let nums: Vec<String> = (0..=self.max).rev().map(|n| n.to_string()).collect();
        let mut count = vec![
            format!("#define {}(...) \\", self.count_name),
            format!("    {}({}, __VA_ARGS__, \\", self.helper_name, self.placeholder),
        ];
        count.extend(wrapped("        ", &nums, self.nums_per_line, ")"));

        Ok(single_section(
            Vec::new(),
            format!("--- {} + {} ---", self.helper_name, self.count_name),
            vec![Item::Raw(helper), Item::Blank, Item::Raw(count)],
        ))
    }

    pub fn summary(&self) -> String {
        format!(
            "max={}, helper={}, count={}, param_prefix={}, param_start={}, param_step={}",
            self.max, self.helper_name, self.count_name, self.param_prefix, self.param_start, self.param_step
        )
    }
}

impl GetArg {
    pub fn document(&self) -> ConfigResult<Document> {
        at_least("start", self.start, 1)?;
        at_least("max", self.max, self.start)?;
        require_prefix("--macro-prefix", &self.macro_prefix)?;
        require_ident("--param-prefix", &self.param_prefix)?;
        at_least("--per-line", self.per_line, 1)?;
        at_least("--param-step", self.param_step, 1)?;

        let width = self.max.to_string().len().max(2);
        let mut items = Vec::<Item>::new();
        for i in self.start..=self.max {
            if !items.is_empty() {
                items.push(Item::Blank);
            }
            items.push(Item::Raw(self.macro_lines(i, width)));
        }

        Ok(single_section(Vec::new(), format!("--- {}XX ---", self.macro_prefix), items))
    }

    /// Parameters continue aligned under the opening parenthesis; the body sits on its own line.
    fn macro_lines(&self, i: usize, width: usize) -> Vec<String> {
        let head = format!("#define {}{:0width$}(", self.macro_prefix, i);
        let mut params = indexed_params(&self.param_prefix, self.param_start, self.param_step, i);
        let body = params.last().cloned().unwrap_or_default();
        params.push("...".to_string());

        let indent = " ".repeat(head.len());
        let mut lines = wrapped(&indent, &params, self.per_line, ") \\");
        if let Some(first) = lines.first_mut() {
            *first = format!("{head}{}", &first[indent.len()..]);
        }
        lines.push(format!("    {body}"));
        lines
    }

    pub fn summary(&self) -> String {
        format!(
            "N={}..{}, prefix={}, param_prefix={}, param_start={}, param_step={}",
            self.start, self.max, self.macro_prefix, self.param_prefix, self.param_start, self.param_step
        )
    }
}

impl HasArgs {
    /// Helper placeholders: `_0.._max`, or `_1.._max` under `--msvc`.
    pub fn placeholders(&self) -> usize {
        if self.msvc { self.max } else { self.max + 1 }
    }

    pub fn document(&self) -> ConfigResult<Document> {
        at_least("max", self.max, 1)?;
        require_ident("--macro-name", &self.macro_name)?;
        require_ident("--helper-name", &self.helper_name)?;
        at_least("--per-line", self.per_line, 1)?;

        // one trailing 1 per helper placeholder, then the 0
        let ones = self.placeholders();
        let nums: Vec<String> = std::iter::repeat_n("1".to_string(), ones)
            .chain(["0".to_string()])
            .collect();

        let mut lines = vec![
            format!("#define {}(...) \\", self.macro_name),
            format!("    {}(__VA_ARGS__, \\", self.helper_name),
        ];
        lines.extend(wrapped("        ", &nums, self.per_line, ")"));

        let preamble = vec![format!(
            "D_HAS_ARGS: max={}, placeholders={ones}, trailing_ones={ones}",
            self.max
        )];
        Ok(single_section(preamble, format!("--- {} ---", self.macro_name), vec![Item::Raw(lines)]))
    }

    pub fn summary(&self) -> String {
        let first = if self.msvc { 1 } else { 0 };
        format!(
            "max={}, mode={}, placeholders={} (_{first} through _{}), trailing_ones={}",
            self.max,
            if self.msvc { "MSVC" } else { "standard" },
            self.placeholders(),
            self.max,
            self.placeholders()
        )
    }
}

impl Inc {
    pub fn document(&self) -> ConfigResult<Document> {
        at_least("max", self.max, self.start)?;
        require_prefix("--macro-prefix", &self.macro_prefix)?;
        at_least("--param-step", self.param_step, 1)?;

        let lines: Vec<String> = self
            .indices()
            .map(|idx| format!("#define {}{idx} {}", self.macro_prefix, idx as i64 + self.offset))
            .collect();

        Ok(single_section(
            Vec::new(),
            format!("--- {}N (offset: {:+}) ---", self.macro_prefix, self.offset),
            vec![Item::Raw(lines)],
        ))
    }

    /// `max - start + 1` indices from `param_start`, `param_step` apart.
    fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..=self.max.saturating_sub(self.start)).map(|i| self.param_start + i * self.param_step)
    }

    pub fn summary(&self) -> String {
        let first = self.param_start;
        let last = self.indices().last().unwrap_or(first);
        format!(
            "N={}..{}, prefix={}, offset={:+}, {p}{first} -> {}, ..., {p}{last} -> {}",
            self.start,
            self.max,
            self.macro_prefix,
            self.offset,
            first as i64 + self.offset,
            last as i64 + self.offset,
            p = self.macro_prefix,
        )
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn at_least(what: &str, value: usize, min: usize) -> ConfigResult<()> {
    if value < min {
        return Err(ConfigError::Bound(format!("{what} must be >= {min} (got {value})")));
    }
    Ok(())
}

fn indexed_params(prefix: &str, start: usize, step: usize, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{}", start + i * step)).collect()
}

/// `items` in lines of `per_line`, each prefixed by `indent`; every line but the last
/// ends in `, \`, the last ends in `last_tail`.
fn wrapped(indent: &str, items: &[String], per_line: usize, last_tail: &str) -> Vec<String> {
    let chunks: Vec<&[String]> = items.chunks(per_line.max(1)).collect();
    let last = chunks.len().saturating_sub(1);
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let tail = if i == last { last_tail } else { ", \\" };
            format!("{indent}{}{tail}", chunk.join(", "))
        })
        .collect()
}

fn single_section(preamble: Vec<String>, title: String, items: Vec<Item>) -> Document {
    Document {
        preamble,
        include: None,
        sections: vec![Section { title: vec![title], items }],
    }
}

// ------------------------------- Tests ------------------------------------ //
