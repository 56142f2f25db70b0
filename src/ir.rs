// Strongly-typed IR for the emitted header text. No string assembly here.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub params: Vec<String>,   // rendered comma-and-space joined
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Nothing,                   // `/* nothing */`
    Expansion(String),
    ErrorToken(&'static str),  // deliberately undefined identifier
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Define(Define),
    Comment(String),           // `/* ... */` on its own line
    Raw(Vec<String>),          // pre-laid-out lines (continuations, wrappers)
    Blank,
}

/// A titled group of items, e.g. one macro family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: Vec<String>,    // comment lines; the first is usually `--- NAME ---`
    pub items: Vec<Item>,
}

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub preamble: Vec<String>,    // extra comment lines under the auto-generated banner
    pub include: Option<String>,  // previous cascade segment
    pub sections: Vec<Section>,
}

impl Define {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Body) -> Self {
        Self { name: name.into(), params, body }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.body, Body::ErrorToken(_))
    }
}

impl Section {
    pub fn defines(&self) -> impl Iterator<Item = &Define> {
        self.items.iter().filter_map(|item| match item {
            Item::Define(d) => Some(d),
            _ => None,
        })
    }
}

impl Document {
    pub fn defines(&self) -> impl Iterator<Item = &Define> {
        self.sections.iter().flat_map(Section::defines)
    }
}
