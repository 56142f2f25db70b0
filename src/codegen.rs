//! IR → header text. Output is consumed by C preprocessors, so layout is exact:
//! one `#define NAME(PARAMS) BODY` per line, parameters joined with `, `.
use crate::ir::{Body, Define, Document, Item, Section};

pub const BANNER: &str = "/* Auto-generated. Do not edit by hand. */";

pub struct Codegen {
    out: String,
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn emit(&mut self, doc: &Document) {
        self.line(BANNER);
        for line in &doc.preamble {
            self.comment(line);
        }
        self.out.push('\n');
        if let Some(include) = &doc.include {
            self.out.push_str(&format!("#include \"{include}\"\n\n"));
        }
        for section in &doc.sections {
            self.emit_section(section);
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn emit_section(&mut self, section: &Section) {
        for line in &section.title {
            self.comment(line);
        }
        self.out.push('\n');
        for item in &section.items {
            match item {
                Item::Define(d) => {
                    let rendered = render_define(d);
                    self.line(&rendered);
                }
                Item::Comment(c) => self.comment(c),
                Item::Raw(lines) => lines.iter().for_each(|l| self.line(l)),
                Item::Blank => self.out.push('\n'),
            }
        }
    }

    fn comment(&mut self, text: &str) {
        self.out.push_str(&format!("/* {text} */\n"));
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_define(d: &Define) -> String {
    let body = match &d.body {
        Body::Nothing => "/* nothing */",
        Body::Expansion(s) => s.as_str(),
        Body::ErrorToken(tok) => tok,
    };
    format!("#define {}({}) {}", d.name, d.params.join(", "), body)
}

/// Render one document to text.
pub fn render(doc: &Document) -> String {
    let mut cg = Codegen::new();
    cg.emit(doc);
    cg.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Family;
    use crate::lower::{CountRange, FamilyShape, lower_family};

    #[test]
    fn plain_family_text() {
        let shape = FamilyShape::indexed(Family::ForEach, "D_INTERNAL_FOR_EACH_");
        let doc = Document {
            sections: vec![lower_family(&shape, CountRange::full(2))],
            ..Document::default()
        };
        let expected = "\
/* Auto-generated. Do not edit by hand. */

/* --- D_INTERNAL_FOR_EACH_N --- */

#define D_INTERNAL_FOR_EACH_0(_fn, ...) /* nothing */
#define D_INTERNAL_FOR_EACH_1(_fn, _1) _fn(_1)
#define D_INTERNAL_FOR_EACH_2(_fn, _1, _2) _fn(_1) _fn(_2)

";
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn pair_family_text_with_include() {
        let shape = FamilyShape::indexed(Family::PairSeparator, "D_INTERNAL_FOR_EACH_PAIR_SEPARATOR_");
        let doc = Document {
            include: Some("prev.h".into()),
            sections: vec![lower_family(&shape, CountRange::following(1, 3))],
            ..Document::default()
        };
        let expected = "\
/* Auto-generated. Do not edit by hand. */

#include \"prev.h\"

/* --- D_INTERNAL_FOR_EACH_PAIR_SEPARATOR_N (even only) --- */

#define D_INTERNAL_FOR_EACH_PAIR_SEPARATOR_2(_fn, _sep, _1, _2) _fn(_1, _2)
#define D_INTERNAL_FOR_EACH_PAIR_SEPARATOR_3(_fn, _sep, ...) D_INTERNAL_FOR_EACH_PAIR__ODD_ARG_COUNT_ERROR

";
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn preamble_lines_are_comments() {
        let doc = Document { preamble: vec!["max=4".into()], ..Document::default() };
        assert_eq!(render(&doc), format!("{BANNER}\n/* max=4 */\n\n"));
    }
}
