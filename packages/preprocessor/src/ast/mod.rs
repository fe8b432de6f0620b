//! Template AST
//!
//! Typed view of a parsed component template. Parsing itself happens outside
//! this crate; hosts either build these nodes directly or convert the Svelte
//! compiler's JSON output with [`Template::from_svelte_json`].
//!
//! All offsets are byte offsets into the original source text.

pub mod query;
mod svelte_json;

use serde::{Deserialize, Serialize};

/// Tag name used by elements whose effective tag is computed at runtime.
pub const DYNAMIC_ELEMENT_TAG: &str = "svelte:element";

/// Half-open byte range `[start, end)` into the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The source text covered by this span, if it is a valid range of `source`.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        if self.start > self.end {
            return None;
        }
        source.get(self.start..self.end)
    }
}

/// A parsed component file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Top level markup nodes.
    pub fragment: Vec<Node>,
    /// The instance `<script>` (component logic), if any.
    pub instance: Option<Script>,
    /// The `<script context="module">` block, if any.
    pub module: Option<Script>,
}

impl Template {
    pub fn new(fragment: Vec<Node>) -> Self {
        Template {
            fragment,
            instance: None,
            module: None,
        }
    }

    pub fn with_instance(mut self, script: Script) -> Self {
        self.instance = Some(script);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// The whole `<script ...>...</script>` element.
    pub span: Span,
    /// Everything between the opening and closing tag.
    pub content: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text(Text),
    /// `{expression}` in text position.
    Expression(ExpressionTag),
    /// Control flow blocks, components, slots: containers this crate only
    /// walks through.
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub data: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionTag {
    pub expression: Span,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Node type as reported by the parser (`IfBlock`, `InlineComponent`, ...).
    pub kind: String,
    pub span: Span,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: ElementName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub span: Span,
}

impl Element {
    /// The tag as written in the source (`a`, `svelte:element`, ...).
    pub fn tag_name(&self) -> &str {
        match &self.name {
            ElementName::Static(name) => name,
            ElementName::Dynamic(_) => DYNAMIC_ELEMENT_TAG,
        }
    }

    /// Offset directly after the tag name of the opening tag.
    pub fn tag_name_end(&self) -> usize {
        self.span.start + 1 + self.tag_name().len()
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.name, ElementName::Dynamic(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementName {
    Static(String),
    /// `<svelte:element this=...>`
    Dynamic(DynamicTag),
}

/// The `this` value of a dynamic element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DynamicTag {
    /// `this="a"`
    Literal(String),
    /// `this={expression}`; the span covers the expression only.
    Expression(Span),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    Plain(PlainAttribute),
    Spread(SpreadAttribute),
    /// `on:`, `bind:`, `class:`, `use:` and friends.
    Directive(Directive),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainAttribute {
    pub name: String,
    pub value: AttributeValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadAttribute {
    /// The spread expression without the surrounding `{...` and `}`.
    pub expression: Span,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub kind: String,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// A bare attribute such as `<a download>`.
    Boolean,
    Fragments(Vec<ValueFragment>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueFragment {
    Text { data: String, span: Span },
    /// `{expression}` inside an attribute value, or a `{name}` shorthand.
    Expression { expression: Span, span: Span },
}
